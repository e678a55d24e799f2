// self
use crate::{_prelude::*, obs::MessageKind};

/// `chaching.driver` span opened around one facade operation.
#[derive(Clone, Debug)]
pub struct DriverSpan {
	kind: MessageKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl DriverSpan {
	/// Opens a span for `kind` on the driver registered under `driver`.
	pub fn new(driver: &str, kind: MessageKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("chaching.driver", driver, kind = kind.as_str());

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = driver;

			Self { kind }
		}
	}

	/// Operation the span covers.
	pub fn kind(&self) -> MessageKind {
		self.kind
	}

	/// Enters the span for the remainder of the current scope.
	pub fn entered(self) -> DriverSpanGuard {
		#[cfg(feature = "tracing")]
		{
			DriverSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			DriverSpanGuard {}
		}
	}
}

/// RAII guard returned by [`DriverSpan::entered`].
pub struct DriverSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for DriverSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("DriverSpanGuard(..)")
	}
}

/// Emits a warning when a registration targets a natively supported handle.
pub fn warn_shadowed_registration(handle: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			handle,
			"external driver registered under a native handle; the native driver keeps priority"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = handle;
	}
}

pub(crate) fn warn_failure(driver: &str, kind: MessageKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(driver, kind = kind.as_str(), error = %error, "driver operation failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (driver, kind, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn spans_remember_the_operation() {
		let span = DriverSpan::new("paypal", MessageKind::Response);

		assert_eq!(span.kind(), MessageKind::Response);

		let guard = span.entered();

		assert_eq!(format!("{guard:?}"), "DriverSpanGuard(..)");
	}

	#[test]
	fn warnings_need_no_subscriber() {
		warn_shadowed_registration("tatrapay");
		warn_failure("tatrapay", MessageKind::Request, &Error::not_implemented("refund"));
	}
}
