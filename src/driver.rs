//! Driver contract (data) and the bundled gateway implementations (behavior).
//!
//! `gateway` exposes the table-driven [`GatewayDriver`] together with one static
//! [`GatewayDescriptor`] per redirect-style bank gateway. `home_credit` implements the
//! token-based consumer-loan gateway that authenticates over HTTP during construction.

pub mod gateway;
pub mod home_credit;

pub use gateway::*;
pub use home_credit::*;

// self
use crate::{
	_prelude::*,
	error::OptionsError,
	message::{Attributes, Environment, PaymentRequest, PaymentResponse},
};

/// Capability set every payment driver exposes.
///
/// `request` and `response` are memoized: the first successful result is returned for
/// every later call on the same instance, whatever attributes are passed. This mirrors the
/// behavior existing integrations rely on, but callers building several payments should
/// construct one facade per payment. Failed builds are not cached.
pub trait Driver
where
	Self: Send + Sync,
{
	/// Environment selected at construction.
	fn environment(&self) -> Environment;

	/// Gateway base URL selected from the environment × region table.
	fn base_url(&self) -> &Url;

	/// Builds (once) the signed payment request.
	fn request(&self, attributes: Attributes) -> Result<Arc<PaymentRequest>>;

	/// Parses and verifies (once) the gateway notification.
	fn response(&self, attributes: Attributes) -> Result<Arc<PaymentResponse>>;

	/// Hook for driver-specific operations forwarded by the facade.
	///
	/// The default implementation reports the operation as not implemented.
	fn invoke(&self, method: &str, _arguments: &Attributes) -> Result<serde_json::Value> {
		Err(Error::not_implemented(method))
	}
}

/// One memo slot per message direction.
#[derive(Debug, Default)]
pub struct MessageCache {
	request: Mutex<Option<Arc<PaymentRequest>>>,
	response: Mutex<Option<Arc<PaymentResponse>>>,
}
impl MessageCache {
	/// Returns the cached request or stores the result of `build`.
	pub fn request_or_try_insert_with<F>(&self, build: F) -> Result<Arc<PaymentRequest>>
	where
		F: FnOnce() -> Result<PaymentRequest>,
	{
		memoize(&self.request, build)
	}

	/// Returns the cached response or stores the result of `build`.
	pub fn response_or_try_insert_with<F>(&self, build: F) -> Result<Arc<PaymentResponse>>
	where
		F: FnOnce() -> Result<PaymentResponse>,
	{
		memoize(&self.response, build)
	}
}

fn memoize<T, F>(slot: &Mutex<Option<Arc<T>>>, build: F) -> Result<Arc<T>>
where
	F: FnOnce() -> Result<T>,
{
	let mut guard = slot.lock();

	if let Some(cached) = guard.as_ref() {
		return Ok(Arc::clone(cached));
	}

	let built = Arc::new(build()?);

	*guard = Some(Arc::clone(&built));

	Ok(built)
}

/// One row of a driver's environment × region endpoint table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
	/// Environment the URL belongs to.
	pub environment: Environment,
	/// Region served by the URL.
	pub region: &'static str,
	/// Absolute base URL.
	pub url: &'static str,
}
impl Endpoint {
	/// Declares a table row.
	pub const fn new(environment: Environment, region: &'static str, url: &'static str) -> Self {
		Self { environment, region, url }
	}
}

/// Selects the endpoint for `environment`, honoring the requested region.
///
/// Without a requested region the first row for the environment wins. Unknown regions fail
/// with [`OptionsError::InvalidRegion`].
pub fn select_endpoint(
	table: &'static [Endpoint],
	environment: Environment,
	region: Option<&str>,
) -> Result<&'static Endpoint, OptionsError> {
	let mut rows = table.iter().filter(|row| row.environment == environment);
	let found = match region {
		Some(wanted) => rows.find(|row| row.region.eq_ignore_ascii_case(wanted)),
		None => rows.next(),
	};

	found.ok_or_else(|| OptionsError::InvalidRegion {
		value: region.unwrap_or(environment.as_str()).to_owned(),
	})
}

/// Parses a static endpoint URL.
pub(crate) fn parse_endpoint(url: &str) -> Result<Url, OptionsError> {
	Url::parse(url).map_err(|e| OptionsError::invalid_attribute("endpoint", e.to_string()))
}
