//! Optional observability helpers for driver construction and message building.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `chaching.driver` with the `driver`
//!   (handle) and `kind` (construct, request or response) fields, plus warnings for shadowed
//!   registrations and failed operations.
//! - Enable `metrics` to increment the `chaching_message_total` counter for every
//!   attempt/success/failure, labeled by `driver`, `kind` and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Driver operations observed by the facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
	/// Driver construction (including token acquisition).
	Construct,
	/// Outgoing payment request.
	Request,
	/// Incoming gateway notification.
	Response,
}
impl MessageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			MessageKind::Construct => "construct",
			MessageKind::Request => "request",
			MessageKind::Response => "response",
		}
	}
}
impl Display for MessageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageOutcome {
	/// Entry to a facade operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl MessageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			MessageOutcome::Attempt => "attempt",
			MessageOutcome::Success => "success",
			MessageOutcome::Failure => "failure",
		}
	}
}
impl Display for MessageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `op` inside a driver span and records attempt plus success/failure outcomes.
pub(crate) fn observe<T>(
	driver: &str,
	kind: MessageKind,
	op: impl FnOnce() -> Result<T>,
) -> Result<T> {
	let _span = DriverSpan::new(driver, kind).entered();

	record_message_outcome(driver, kind, MessageOutcome::Attempt);

	let result = op();

	match &result {
		Ok(_) => record_message_outcome(driver, kind, MessageOutcome::Success),
		Err(e) => {
			record_message_outcome(driver, kind, MessageOutcome::Failure);
			warn_failure(driver, kind, e);
		},
	}

	result
}
