//! Global Payments GP webpay card gateway.

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec, SigningScheme},
	},
	message::{Environment, HttpMethod, PaymentStatus},
	signature::{OutputEncoding, SignatureEngine},
};

const ENGINE: SignatureEngine =
	SignatureEngine::hmac_sha256().output(OutputEncoding::Base64).separator("|");

/// GP webpay HTTP API.
pub static GP_WEBPAY: GatewayDescriptor = GatewayDescriptor {
	handle: "gpwebpay",
	endpoints: &[
		Endpoint::new(Environment::Production, "cz", "https://3dsecure.gpwebpay.com/pgw/order.do"),
		Endpoint::new(
			Environment::Sandbox,
			"cz",
			"https://test.3dsecure.gpwebpay.com/pgw/order.do",
		),
	],
	credentials: &["merchant number", "secret key"],
	secret: Some(1),
	method: HttpMethod::Get,
	request_fields: &[
		FieldSpec::credential("MERCHANTNUMBER", 0),
		FieldSpec::defaulted("OPERATION", FieldKind::Text, &[], "CREATE_ORDER"),
		FieldSpec::required("ORDERNUMBER", FieldKind::Text, &["reference", "order_number"]),
		FieldSpec::required("AMOUNT", FieldKind::MinorAmount, &["amount"]),
		FieldSpec::defaulted("CURRENCY", FieldKind::NumericCurrency, &["currency"], "203"),
		FieldSpec::defaulted("DEPOSITFLAG", FieldKind::Text, &["deposit_flag"], "1"),
		FieldSpec::optional("MERORDERNUM", FieldKind::Text, &["merchant_reference"]),
		FieldSpec::required("URL", FieldKind::Url, &["return_url"]),
		FieldSpec::optional("DESCRIPTION", FieldKind::Text, &["description"]),
		FieldSpec::optional("EMAIL", FieldKind::Text, &["email"]),
	],
	request_signature: Some(SigningScheme {
		fields: &[
			"MERCHANTNUMBER",
			"OPERATION",
			"ORDERNUMBER",
			"AMOUNT",
			"CURRENCY",
			"DEPOSITFLAG",
			"MERORDERNUM",
			"URL",
			"DESCRIPTION",
			"EMAIL",
		],
		signature_field: "DIGEST",
		skip_absent: true,
		engine: ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["OPERATION", "ORDERNUMBER", "MERORDERNUM", "PRCODE", "SRCODE", "RESULTTEXT"],
		signature_field: "DIGEST",
		skip_absent: true,
		engine: ENGINE,
	}),
	response: ResponseSpec {
		status_field: "PRCODE",
		status: primary_code_status,
		reference_field: Some("ORDERNUMBER"),
		transaction_field: None,
		amount_field: None,
		currency_field: None,
	},
};

fn primary_code_status(value: &str) -> Option<PaymentStatus> {
	match value.parse::<u16>().ok()? {
		0 => Some(PaymentStatus::Success),
		50 => Some(PaymentStatus::Cancelled),
		_ => Some(PaymentStatus::Failure),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		driver::{Driver, GatewayDriver},
		error::{Error, OptionsError},
		message::{Attributes, Authorization, MessageContext, Options},
	};

	fn driver() -> GatewayDriver {
		GatewayDriver::new(
			&GP_WEBPAY,
			MessageContext::new(Authorization::new(["8888888", "gp-secret"]), Options::sandbox()),
		)
		.expect("GP webpay driver should construct.")
	}

	#[test]
	fn amounts_are_sent_in_minor_units_and_absent_fields_are_not_signed() {
		let request = driver()
			.request(Attributes::from_iter([
				("reference", "123456"),
				("amount", "99.99"),
				("return_url", "https://shop.example.com/gp"),
			]))
			.expect("GP webpay request should build.");

		assert_eq!(request.field("AMOUNT"), Some("9999"));
		assert_eq!(request.field("CURRENCY"), Some("203"));
		assert_eq!(request.field("DIGEST"), Some("LKEKqnscqo2s9kn3oaFWXTV9v5D8B/ODb6FsqIMgsHE="));
	}

	#[test]
	fn amounts_beyond_minor_unit_range_are_rejected() {
		let err = driver()
			.request(Attributes::from_iter([
				("reference", "123456"),
				("amount", "79228162514264337593543950335"),
				("return_url", "https://shop.example.com/gp"),
			]))
			.expect_err("Oversized amounts must be reported, not overflow.");

		assert!(matches!(
			err,
			Error::InvalidOptions(OptionsError::InvalidAttribute { name, .. }) if name == "AMOUNT"
		));
	}

	#[test]
	fn cancelled_orders_are_reported() {
		let digest = ENGINE
			.sign(&["CREATE_ORDER", "123456", "50", "0", "Cancelled"], "gp-secret")
			.expect("Signature should compute.");
		let response = driver()
			.response(Attributes::from_iter([
				("OPERATION", "CREATE_ORDER"),
				("ORDERNUMBER", "123456"),
				("PRCODE", "50"),
				("SRCODE", "0"),
				("RESULTTEXT", "Cancelled"),
				("DIGEST", digest.as_str()),
			]))
			.expect("Signed notification should verify.");

		assert_eq!(response.status, PaymentStatus::Cancelled);
		assert_eq!(response.reference.as_deref(), Some("123456"));
	}
}
