//! Tatra banka CardPay (card payments) and TatraPay (internet banking).

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec, SigningScheme},
	},
	message::{Environment, HttpMethod, PaymentStatus},
	signature::{KeyEncoding, OutputEncoding, SignatureEngine},
};

const ENGINE: SignatureEngine =
	SignatureEngine::hmac_sha256().key_encoding(KeyEncoding::Hex).output(OutputEncoding::HexLower);
const CREDENTIALS: &[&str] = &["merchant id", "secret key"];

/// Card payments through the Tatra banka e-commerce gateway.
pub static CARDPAY: GatewayDescriptor = GatewayDescriptor {
	handle: "cardpay",
	endpoints: &[
		Endpoint::new(
			Environment::Production,
			"sk",
			"https://moja.tatrabanka.sk/cgi-bin/e-commerce/start/cardpay",
		),
		Endpoint::new(Environment::Sandbox, "sk", "https://platby.tatrabanka.sk/sandbox/cardpay"),
	],
	credentials: CREDENTIALS,
	secret: Some(1),
	method: HttpMethod::Get,
	request_fields: &[
		FieldSpec::credential("MID", 0),
		FieldSpec::required("AMT", FieldKind::Amount, &["amount"]),
		FieldSpec::defaulted("CURR", FieldKind::NumericCurrency, &["currency"], "978"),
		FieldSpec::required("VS", FieldKind::Text, &["reference", "variable_symbol"]),
		FieldSpec::required("RURL", FieldKind::Url, &["return_url"]),
		FieldSpec::required("IPC", FieldKind::Text, &["ip", "client_ip"]),
		FieldSpec::required("NAME", FieldKind::Text, &["name", "customer_name"]),
		FieldSpec::optional("REM", FieldKind::Text, &["email", "notify_email"]),
		FieldSpec::optional("LANG", FieldKind::Text, &["language"]),
		FieldSpec::required("TIMESTAMP", FieldKind::Timestamp, &["timestamp"]),
	],
	request_signature: Some(SigningScheme {
		fields: &["MID", "AMT", "CURR", "VS", "RURL", "IPC", "NAME", "TIMESTAMP"],
		signature_field: "HMAC",
		skip_absent: false,
		engine: ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["AMT", "CURR", "VS", "RES", "AC", "TID", "TIMESTAMP"],
		signature_field: "HMAC",
		skip_absent: false,
		engine: ENGINE,
	}),
	response: ResponseSpec {
		status_field: "RES",
		status: result_status,
		reference_field: Some("VS"),
		transaction_field: Some("TID"),
		amount_field: Some("AMT"),
		currency_field: Some("CURR"),
	},
};

/// Internet-banking transfers through TatraPay.
pub static TATRAPAY: GatewayDescriptor = GatewayDescriptor {
	handle: "tatrapay",
	endpoints: &[
		Endpoint::new(
			Environment::Production,
			"sk",
			"https://moja.tatrabanka.sk/cgi-bin/e-commerce/start/tatrapay",
		),
		Endpoint::new(Environment::Sandbox, "sk", "https://platby.tatrabanka.sk/sandbox/tatrapay"),
	],
	credentials: CREDENTIALS,
	secret: Some(1),
	method: HttpMethod::Get,
	request_fields: &[
		FieldSpec::credential("MID", 0),
		FieldSpec::required("AMT", FieldKind::Amount, &["amount"]),
		FieldSpec::defaulted("CURR", FieldKind::NumericCurrency, &["currency"], "978"),
		FieldSpec::required("VS", FieldKind::Text, &["reference", "variable_symbol"]),
		FieldSpec::optional("CS", FieldKind::Text, &["constant_symbol"]),
		FieldSpec::required("RURL", FieldKind::Url, &["return_url"]),
		FieldSpec::optional("REM", FieldKind::Text, &["email", "notify_email"]),
		FieldSpec::optional("DESC", FieldKind::Text, &["description"]),
		FieldSpec::optional("LANG", FieldKind::Text, &["language"]),
		FieldSpec::required("TIMESTAMP", FieldKind::Timestamp, &["timestamp"]),
	],
	request_signature: Some(SigningScheme {
		fields: &["MID", "AMT", "CURR", "VS", "RURL", "TIMESTAMP"],
		signature_field: "HMAC",
		skip_absent: false,
		engine: ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["AMT", "CURR", "VS", "RES", "TID", "TIMESTAMP"],
		signature_field: "HMAC",
		skip_absent: false,
		engine: ENGINE,
	}),
	response: ResponseSpec {
		status_field: "RES",
		status: result_status,
		reference_field: Some("VS"),
		transaction_field: Some("TID"),
		amount_field: Some("AMT"),
		currency_field: Some("CURR"),
	},
};

fn result_status(value: &str) -> Option<PaymentStatus> {
	match value {
		"OK" => Some(PaymentStatus::Success),
		"FAIL" => Some(PaymentStatus::Failure),
		"TOUT" => Some(PaymentStatus::Timeout),
		_ => None,
	}
}
