//! VÚB banka ePlatby (internet banking) and eCard (card payments).

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec, SigningScheme},
	},
	message::{Environment, HttpMethod, PaymentStatus},
	signature::{OutputEncoding, SignatureEngine},
};

const EPLATBY_ENGINE: SignatureEngine = SignatureEngine::hmac_sha256();
const ECARD_ENGINE: SignatureEngine =
	SignatureEngine::sha256_chain().output(OutputEncoding::Base64).separator("|");

/// VÚB ePlatby transfers.
pub static EPLATBY: GatewayDescriptor = GatewayDescriptor {
	handle: "eplatby",
	endpoints: &[
		Endpoint::new(Environment::Production, "sk", "https://ib.vub.sk/e-platbyeuro.aspx"),
		Endpoint::new(
			Environment::Sandbox,
			"sk",
			"https://epaymentsimulator.monogram.sk/VUB_EPlatba2_HMAC.aspx",
		),
	],
	credentials: &["merchant id", "secret key"],
	secret: Some(1),
	method: HttpMethod::Post,
	request_fields: &[
		FieldSpec::credential("MID", 0),
		FieldSpec::required("AMT", FieldKind::Amount, &["amount"]),
		FieldSpec::required("VS", FieldKind::Text, &["reference", "variable_symbol"]),
		FieldSpec::defaulted("CS", FieldKind::Text, &["constant_symbol"], "0308"),
		FieldSpec::optional("SS", FieldKind::Text, &["specific_symbol"]),
		FieldSpec::required("RURL", FieldKind::Url, &["return_url"]),
		FieldSpec::optional("REM", FieldKind::Text, &["email", "notify_email"]),
		FieldSpec::optional("DESC", FieldKind::Text, &["description"]),
	],
	request_signature: Some(SigningScheme {
		fields: &["MID", "AMT", "VS", "CS", "RURL"],
		signature_field: "SIGN",
		skip_absent: false,
		engine: EPLATBY_ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["VS", "SS", "RES"],
		signature_field: "SIGN",
		skip_absent: false,
		engine: EPLATBY_ENGINE,
	}),
	response: ResponseSpec {
		status_field: "RES",
		status: eplatby_status,
		reference_field: Some("VS"),
		transaction_field: None,
		amount_field: None,
		currency_field: None,
	},
};

/// VÚB eCard 3-D Secure card payments.
pub static ECARD: GatewayDescriptor = GatewayDescriptor {
	handle: "ecard",
	endpoints: &[
		Endpoint::new(Environment::Production, "sk", "https://vub.eway2u.com/fim/est3Dgate"),
		Endpoint::new(Environment::Sandbox, "sk", "https://testsecurepay.eway2u.com/fim/est3Dgate"),
	],
	credentials: &["client id", "store key"],
	secret: Some(1),
	method: HttpMethod::Post,
	request_fields: &[
		FieldSpec::credential("clientid", 0),
		FieldSpec::required("oid", FieldKind::Text, &["reference", "order_id"]),
		FieldSpec::required("amount", FieldKind::Amount, &[]),
		FieldSpec::defaulted("currency", FieldKind::NumericCurrency, &[], "978"),
		FieldSpec::required("okUrl", FieldKind::Url, &["return_url"]),
		FieldSpec::required("failUrl", FieldKind::Url, &["cancel_url", "return_url"]),
		FieldSpec::defaulted("trantype", FieldKind::Text, &["transaction_type"], "Auth"),
		FieldSpec::optional("instalment", FieldKind::Text, &[]),
		FieldSpec::required("rnd", FieldKind::Nonce, &["nonce"]),
		FieldSpec::defaulted("storetype", FieldKind::Text, &["store_type"], "3d_pay_hosting"),
		FieldSpec::defaulted("hashAlgorithm", FieldKind::Text, &[], "ver2"),
		FieldSpec::defaulted("lang", FieldKind::Text, &["language"], "sk"),
		FieldSpec::defaulted("encoding", FieldKind::Text, &[], "utf-8"),
	],
	request_signature: Some(SigningScheme {
		fields: &[
			"clientid",
			"oid",
			"amount",
			"okUrl",
			"failUrl",
			"trantype",
			"instalment",
			"rnd",
			"currency",
		],
		signature_field: "HASH",
		skip_absent: false,
		engine: ECARD_ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &["clientid", "oid", "AuthCode", "ProcReturnCode", "Response", "mdStatus", "rnd"],
		signature_field: "HASH",
		skip_absent: false,
		engine: ECARD_ENGINE,
	}),
	response: ResponseSpec {
		status_field: "Response",
		status: ecard_status,
		reference_field: Some("oid"),
		transaction_field: Some("TransId"),
		amount_field: Some("amount"),
		currency_field: Some("currency"),
	},
};

fn eplatby_status(value: &str) -> Option<PaymentStatus> {
	match value {
		"OK" => Some(PaymentStatus::Success),
		"FAIL" => Some(PaymentStatus::Failure),
		_ => None,
	}
}

fn ecard_status(value: &str) -> Option<PaymentStatus> {
	match value {
		"Approved" => Some(PaymentStatus::Success),
		"Declined" | "Error" => Some(PaymentStatus::Failure),
		_ => None,
	}
}
