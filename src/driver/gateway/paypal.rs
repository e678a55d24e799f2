//! PayPal Payments Standard (`_xclick` buy-now buttons).
//!
//! PayPal does not sign the redirect form and its IPN notifications are validated by
//! posting them back to PayPal, so neither direction carries a signing scheme here.

// self
use crate::{
	driver::{
		Endpoint,
		gateway::{FieldKind, FieldSpec, GatewayDescriptor, ResponseSpec},
	},
	message::{Environment, HttpMethod, PaymentStatus},
};

/// PayPal Payments Standard.
pub static PAYPAL: GatewayDescriptor = GatewayDescriptor {
	handle: "paypal",
	endpoints: &[
		Endpoint::new(Environment::Production, "global", "https://www.paypal.com/cgi-bin/webscr"),
		Endpoint::new(
			Environment::Sandbox,
			"global",
			"https://www.sandbox.paypal.com/cgi-bin/webscr",
		),
	],
	credentials: &["business account"],
	secret: None,
	method: HttpMethod::Post,
	request_fields: &[
		FieldSpec::defaulted("cmd", FieldKind::Text, &[], "_xclick"),
		FieldSpec::credential("business", 0),
		FieldSpec::required("item_name", FieldKind::Text, &["description", "name"]),
		FieldSpec::required("invoice", FieldKind::Text, &["reference"]),
		FieldSpec::required("amount", FieldKind::Amount, &[]),
		FieldSpec::defaulted("currency_code", FieldKind::AlphaCurrency, &["currency"], "EUR"),
		FieldSpec::required("return", FieldKind::Url, &["return_url"]),
		FieldSpec::optional("cancel_return", FieldKind::Url, &["cancel_url"]),
		FieldSpec::optional("notify_url", FieldKind::Url, &[]),
		FieldSpec::optional("custom", FieldKind::Text, &[]),
		FieldSpec::optional("lc", FieldKind::Text, &["language"]),
		FieldSpec::defaulted("no_shipping", FieldKind::Text, &[], "1"),
		FieldSpec::defaulted("charset", FieldKind::Text, &[], "utf-8"),
	],
	request_signature: None,
	response_signature: None,
	response: ResponseSpec {
		status_field: "payment_status",
		status: payment_status,
		reference_field: Some("invoice"),
		transaction_field: Some("txn_id"),
		amount_field: Some("mc_gross"),
		currency_field: Some("mc_currency"),
	},
};

fn payment_status(value: &str) -> Option<PaymentStatus> {
	match value {
		"Completed" | "Processed" => Some(PaymentStatus::Success),
		"Pending" | "In-Progress" => Some(PaymentStatus::Pending),
		"Denied" | "Failed" | "Expired" | "Refunded" | "Reversed" => Some(PaymentStatus::Failure),
		"Canceled_Reversal" | "Voided" => Some(PaymentStatus::Cancelled),
		_ => None,
	}
}
