//! TrustPay instant bank transfers.

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec, SigningScheme},
	},
	message::{Environment, HttpMethod, PaymentStatus},
	signature::SignatureEngine,
};

const ENGINE: SignatureEngine = SignatureEngine::hmac_sha256();

/// TrustPay merchant API.
pub static TRUSTPAY: GatewayDescriptor = GatewayDescriptor {
	handle: "trustpay",
	endpoints: &[
		Endpoint::new(Environment::Production, "sk", "https://ib.trustpay.eu/mapi/pay.aspx"),
		Endpoint::new(Environment::Sandbox, "sk", "https://test.trustpay.eu/mapi/pay.aspx"),
	],
	credentials: &["account id", "secret key"],
	secret: Some(1),
	method: HttpMethod::Get,
	request_fields: &[
		FieldSpec::credential("AID", 0),
		FieldSpec::required("AMT", FieldKind::Amount, &["amount"]),
		FieldSpec::defaulted("CUR", FieldKind::AlphaCurrency, &["currency"], "EUR"),
		FieldSpec::required("REF", FieldKind::Text, &["reference"]),
		FieldSpec::optional("URL", FieldKind::Url, &["return_url"]),
		FieldSpec::optional("RURL", FieldKind::Url, &["success_url"]),
		FieldSpec::optional("CURL", FieldKind::Url, &["cancel_url"]),
		FieldSpec::optional("EURL", FieldKind::Url, &["error_url"]),
		FieldSpec::optional("NURL", FieldKind::Url, &["notify_url"]),
		FieldSpec::optional("LNG", FieldKind::Text, &["language"]),
		FieldSpec::optional("CNT", FieldKind::Text, &["country"]),
		FieldSpec::optional("DSC", FieldKind::Text, &["description"]),
		FieldSpec::optional("EMA", FieldKind::Text, &["email"]),
	],
	request_signature: Some(SigningScheme {
		fields: &["AID", "AMT", "CUR", "REF"],
		signature_field: "SIG",
		skip_absent: false,
		engine: ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["AID", "TYP", "AMT", "CUR", "REF", "RES", "TID", "OID", "TSS"],
		signature_field: "SIG",
		skip_absent: false,
		engine: ENGINE,
	}),
	response: ResponseSpec {
		status_field: "RES",
		status: result_status,
		reference_field: Some("REF"),
		transaction_field: Some("TID"),
		amount_field: Some("AMT"),
		currency_field: Some("CUR"),
	},
};

fn result_status(value: &str) -> Option<PaymentStatus> {
	match value.parse::<u16>().ok()? {
		0 => Some(PaymentStatus::Success),
		1..=5 => Some(PaymentStatus::Pending),
		_ => Some(PaymentStatus::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		driver::{Driver, GatewayDriver},
		error::Error,
		message::{Attributes, Authorization, MessageContext, Options},
	};

	fn driver() -> GatewayDriver {
		GatewayDriver::new(
			&TRUSTPAY,
			MessageContext::new(Authorization::new(["4107111111", "abcd1234"]), Options::sandbox()),
		)
		.expect("TrustPay driver should construct.")
	}

	#[test]
	fn request_uses_alphabetic_currency_and_uppercase_signature() {
		let request = driver()
			.request(Attributes::from_iter([
				("amount", "1.5"),
				("currency", "978"),
				("reference", "R-1"),
			]))
			.expect("TrustPay request should build.");

		assert_eq!(request.field("CUR"), Some("EUR"));
		assert_eq!(
			request.field("SIG"),
			Some("0393706B49CF98B5154E8F6E5F5BF869A052073D80ACA9CC687D2C128AC52028")
		);
	}

	#[test]
	fn result_codes_map_to_statuses() {
		assert_eq!(result_status("0"), Some(PaymentStatus::Success));
		assert_eq!(result_status("3"), Some(PaymentStatus::Pending));
		assert_eq!(result_status("1005"), Some(PaymentStatus::Failure));
		assert_eq!(result_status("OK"), None);
	}

	#[test]
	fn lowercase_signatures_still_verify() {
		let values = ["4107111111", "CRDT", "1.50", "EUR", "R-1", "0", "991", "", ""];
		let signature = ENGINE.sign(&values, "abcd1234").expect("Signature should compute.");
		let response = driver()
			.response(Attributes::from_iter([
				("AID", "4107111111"),
				("TYP", "CRDT"),
				("AMT", "1.50"),
				("CUR", "EUR"),
				("REF", "R-1"),
				("RES", "0"),
				("TID", "991"),
				("SIG", signature.to_ascii_lowercase().as_str()),
			]))
			.expect("Hex signatures compare case-insensitively.");

		assert!(response.is_success());
		assert_eq!(response.transaction_id.as_deref(), Some("991"));

		let forged = driver()
			.response(Attributes::from_iter([("REF", "R-1"), ("RES", "0"), ("SIG", "00")]))
			.expect_err("Forged signatures must be rejected.");

		assert!(matches!(forged, Error::SignatureMismatch { driver } if driver == "trustpay"));
	}
}
