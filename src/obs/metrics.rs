// self
use crate::obs::{MessageKind, MessageOutcome};

/// Records a message outcome via the global metrics recorder (when enabled).
pub fn record_message_outcome(driver: &str, kind: MessageKind, outcome: MessageOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"chaching_message_total",
			"driver" => driver.to_owned(),
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (driver, kind, outcome);
	}
}
