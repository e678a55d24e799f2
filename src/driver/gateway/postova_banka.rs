//! Poštová banka iTerminal card gateway.

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec, SigningScheme},
	},
	message::{Environment, HttpMethod, PaymentStatus},
	signature::SignatureEngine,
};

const ENGINE: SignatureEngine = SignatureEngine::sha256_chain();

/// iTerminal card payments.
pub static ITERMINAL: GatewayDescriptor = GatewayDescriptor {
	handle: "iterminal",
	endpoints: &[
		Endpoint::new(Environment::Production, "sk", "https://iterminal.postovabanka.sk/payment"),
		Endpoint::new(Environment::Sandbox, "sk", "https://iterminal-test.postovabanka.sk/payment"),
	],
	credentials: &["merchant id", "secret key"],
	secret: Some(1),
	method: HttpMethod::Post,
	request_fields: &[
		FieldSpec::credential("MID", 0),
		FieldSpec::required("AMT", FieldKind::Amount, &["amount"]),
		FieldSpec::defaulted("CURR", FieldKind::NumericCurrency, &["currency"], "978"),
		FieldSpec::required("VS", FieldKind::Text, &["reference", "variable_symbol"]),
		FieldSpec::required("RURL", FieldKind::Url, &["return_url"]),
		FieldSpec::optional("LANG", FieldKind::Text, &["language"]),
		FieldSpec::required("TIMESTAMP", FieldKind::Timestamp, &["timestamp"]),
	],
	request_signature: Some(SigningScheme {
		fields: &["MID", "AMT", "CURR", "VS", "RURL", "TIMESTAMP"],
		signature_field: "SIGN",
		skip_absent: false,
		engine: ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["VS", "RES", "TID", "TIMESTAMP"],
		signature_field: "SIGN",
		skip_absent: false,
		engine: ENGINE,
	}),
	response: ResponseSpec {
		status_field: "RES",
		status: result_status,
		reference_field: Some("VS"),
		transaction_field: Some("TID"),
		amount_field: None,
		currency_field: None,
	},
};

fn result_status(value: &str) -> Option<PaymentStatus> {
	match value {
		"OK" => Some(PaymentStatus::Success),
		"FAIL" => Some(PaymentStatus::Failure),
		"CANCEL" => Some(PaymentStatus::Cancelled),
		_ => None,
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
		let authorization = Authorization::new(["PB01", "chain-key"]);

		GatewayDriver::new(&ITERMINAL, MessageContext::new(authorization, Options::sandbox()))
			.expect("iTerminal driver should construct.")
	}

	#[test]
	fn requests_chain_the_secret_after_the_fields() {
		let request = driver()
			.request(Attributes::from_iter([
				("amount", "15"),
				("reference", "900"),
				("return_url", "https://shop.example.com/pb"),
				("timestamp", "01092024101500"),
			]))
			.expect("iTerminal request should build.");

		assert_eq!(
			request.field("SIGN"),
			Some("2F9FF8FED7E3078482CDA8882F98C40E6D0402E5E1E072DEFDE6D191F287B44B")
		);
	}

	#[test]
	fn generated_timestamps_are_signed() {
		let request = driver()
			.request(Attributes::from_iter([
				("amount", "15"),
				("reference", "900"),
				("return_url", "https://shop.example.com/pb"),
			]))
			.expect("iTerminal request should build.");
		let timestamp = request.field("TIMESTAMP").expect("Timestamp should be generated.");
		let fields = ["PB01", "15.00", "978", "900", "https://shop.example.com/pb", timestamp];
		let expected = ENGINE.sign(&fields, "chain-key").expect("Signature should compute.");

		assert_eq!(timestamp.len(), 14);
		assert_eq!(request.field("SIGN"), Some(expected.as_str()));
	}

	#[test]
	fn cancelled_notifications_verify() {
		let sign = "A0DA972A26B3109A8DD4C865CAD3A750ECBB567625824E1BE3869B0FFC084ACA";
		let attributes = |sign: &str| {
			Attributes::from_iter([
				("VS", "900"),
				("RES", "CANCEL"),
				("TIMESTAMP", "01092024101500"),
				("SIGN", sign),
			])
		};
		let response =
			driver().response(attributes(sign)).expect("Signed notification should verify.");

		assert_eq!(response.status, PaymentStatus::Cancelled);

		let tampered = driver()
			.response(attributes(&sign.replace('A', "B")))
			.expect_err("Altered signatures must be rejected.");

		assert!(matches!(tampered, Error::SignatureMismatch { .. }));
	}
}
