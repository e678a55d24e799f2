//! Normalized gateway notifications.

// self
use crate::{_prelude::*, message::Attributes};

/// Normalized payment outcome reported by a gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
	/// Funds were captured or the payment was approved.
	Success,
	/// The gateway accepted the payment but has not settled it yet.
	Pending,
	/// The payment was declined or failed.
	Failure,
	/// The customer did not finish before the gateway gave up.
	Timeout,
	/// The customer or the merchant cancelled the payment.
	Cancelled,
}
impl PaymentStatus {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			PaymentStatus::Success => "success",
			PaymentStatus::Pending => "pending",
			PaymentStatus::Failure => "failure",
			PaymentStatus::Timeout => "timeout",
			PaymentStatus::Cancelled => "cancelled",
		}
	}
}
impl Display for PaymentStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Parsed and, where the gateway signs notifications, verified response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
	/// Handle of the driver that parsed the response.
	pub driver: String,
	/// Normalized outcome.
	pub status: PaymentStatus,
	/// Merchant reference (order number, variable symbol).
	pub reference: Option<String>,
	/// Gateway transaction identifier.
	pub transaction_id: Option<String>,
	/// Amount echoed by the gateway.
	pub amount: Option<String>,
	/// Currency echoed by the gateway.
	pub currency: Option<String>,
	/// True when a gateway signature was present and verified.
	pub signature_verified: bool,
	/// Raw notification fields.
	pub fields: Attributes,
}
impl PaymentResponse {
	/// Creates a response with the given outcome and raw fields.
	pub fn new(driver: impl Into<String>, status: PaymentStatus, fields: Attributes) -> Self {
		Self {
			driver: driver.into(),
			status,
			reference: None,
			transaction_id: None,
			amount: None,
			currency: None,
			signature_verified: false,
			fields,
		}
	}

	/// Returns true when the payment succeeded.
	pub fn is_success(&self) -> bool {
		self.status == PaymentStatus::Success
	}

	/// Looks up a raw notification field.
	pub fn field(&self, name: &str) -> Option<&str> {
		self.fields.get(name)
	}
}
