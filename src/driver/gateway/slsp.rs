//! Slovenská sporiteľňa SporoPay.

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec, SigningScheme},
	},
	message::{Environment, HttpMethod, PaymentStatus},
	signature::{KeyEncoding, OutputEncoding, SignatureEngine},
};

const ENGINE: SignatureEngine = SignatureEngine::hmac_sha256()
	.key_encoding(KeyEncoding::Base64)
	.output(OutputEncoding::Base64)
	.separator(";");

/// SporoPay internet-banking transfers.
pub static SPOROPAY: GatewayDescriptor = GatewayDescriptor {
	handle: "sporopay",
	endpoints: &[
		Endpoint::new(
			Environment::Production,
			"sk",
			"https://ib.slsp.sk/epayment/epayment/epayment.xml",
		),
		Endpoint::new(
			Environment::Sandbox,
			"sk",
			"https://epaymentsimulator.monogram.sk/SLSP_SporoPay.aspx",
		),
	],
	credentials: &["account prefix", "account number", "secret key"],
	secret: Some(2),
	method: HttpMethod::Get,
	request_fields: &[
		FieldSpec::credential("pu_predcislo", 0),
		FieldSpec::credential("pu_cislo", 1),
		FieldSpec::defaulted("pu_kbanky", FieldKind::Text, &["bank_code"], "0900"),
		FieldSpec::required("suma", FieldKind::Amount, &["amount"]),
		FieldSpec::defaulted("mena", FieldKind::AlphaCurrency, &["currency"], "EUR"),
		FieldSpec::required("vs", FieldKind::Text, &["reference", "variable_symbol"]),
		FieldSpec::defaulted("ss", FieldKind::Text, &["specific_symbol"], "0"),
		FieldSpec::required("url", FieldKind::Url, &["return_url"]),
		FieldSpec::defaulted("param", FieldKind::Text, &["param"], "abc=defgh"),
	],
	request_signature: Some(SigningScheme {
		fields: &[
			"pu_predcislo",
			"pu_cislo",
			"pu_kbanky",
			"suma",
			"mena",
			"vs",
			"ss",
			"url",
			"param",
		],
		signature_field: "sign1",
		skip_absent: false,
		engine: ENGINE,
	}),
	response_signature: Some(SigningScheme {
		fields: &[
			"u_predcislo",
			"u_cislo",
			"u_kbanky",
			"pu_predcislo",
			"pu_cislo",
			"pu_kbanky",
			"suma",
			"mena",
			"vs",
			"ss",
			"url",
			"param",
			"result",
			"real_result",
		],
		signature_field: "SIGN2",
		skip_absent: false,
		engine: ENGINE,
	}),
	response: ResponseSpec {
		status_field: "real_result",
		status: result_status,
		reference_field: Some("vs"),
		transaction_field: None,
		amount_field: Some("suma"),
		currency_field: Some("mena"),
	},
};

fn result_status(value: &str) -> Option<PaymentStatus> {
	match value {
		"OK" => Some(PaymentStatus::Success),
		"FAIL" => Some(PaymentStatus::Failure),
		_ => None,
	}
}
