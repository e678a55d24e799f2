//! Driver-selecting facade.
//!
//! [`Chaching`] resolves a handle (native drivers first, then external registrations),
//! constructs the driver once, and forwards every message operation to it.

// self
use crate::{
	_prelude::*,
	driver::Driver,
	error::OptionsError,
	http::AccessTokenClient,
	message::{
		Attributes, Authorization, Environment, MessageContext, Options, PaymentRequest,
		PaymentResponse,
	},
	obs::{self, MessageKind},
	registry::{DriverContext, DriverFactory, DriverHandle, DriverRegistry, NativeDriver},
};

/// Entry point selecting and wrapping one payment driver.
pub struct Chaching {
	handle: DriverHandle,
	implementation: &'static str,
	driver: Box<dyn Driver>,
}
impl Chaching {
	/// Library version.
	pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
	/// Library edition.
	pub const EDITION: &'static str = "basic";

	/// Constructs the driver registered under `handle` using the process-wide registry.
	///
	/// Options are raw string pairs; `environment` accepts `production` (default) or
	/// `sandbox`, and `server_location` selects a gateway region.
	pub fn new<I, K, V>(handle: &str, authorization: Authorization, options: I) -> Result<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let options = Options::from_pairs(options)?;

		Self::builder(handle).authorization(authorization).options(options).build()
	}

	/// Starts a builder for explicit registry or HTTP client injection.
	pub fn builder(handle: impl Into<String>) -> ChachingBuilder {
		ChachingBuilder::new(handle)
	}

	/// Registers an external driver in the process-wide registry.
	pub fn support_driver<F>(factory: F, handle: &str) -> Result<DriverHandle>
	where
		F: 'static + DriverFactory,
	{
		DriverRegistry::global().support_driver(factory, handle)
	}

	/// Handles of the natively supported drivers.
	pub fn native_drivers() -> Vec<&'static str> {
		NativeDriver::ALL.iter().map(|native| native.handle()).collect()
	}

	/// Handle the facade was constructed with.
	pub fn handle(&self) -> &DriverHandle {
		&self.handle
	}

	/// Implementation name of the wrapped driver.
	pub fn implementation(&self) -> &'static str {
		self.implementation
	}

	/// Environment the driver was constructed for.
	pub fn environment(&self) -> Environment {
		self.driver.environment()
	}

	/// Gateway base URL.
	pub fn base_url(&self) -> &Url {
		self.driver.base_url()
	}

	/// Wrapped driver.
	pub fn driver(&self) -> &dyn Driver {
		self.driver.as_ref()
	}

	/// Builds the signed payment request (memoized by the driver).
	pub fn request<I, K, V>(&self, attributes: I) -> Result<Arc<PaymentRequest>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let attributes = Attributes::from_iter(attributes);

		obs::observe(&self.handle, MessageKind::Request, || self.driver.request(attributes))
	}

	/// Parses and verifies a gateway notification (memoized by the driver).
	pub fn response<I, K, V>(&self, attributes: I) -> Result<Arc<PaymentResponse>>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let attributes = Attributes::from_iter(attributes);

		obs::observe(&self.handle, MessageKind::Response, || self.driver.response(attributes))
	}

	/// Dispatches an operation by name.
	///
	/// Facade accessors (`handle`, `implementation`, `environment`, `base_url`) answer first,
	/// then the driver's own operations. Anything else fails with
	/// [`Error::MethodNotImplemented`].
	pub fn call<I, K, V>(&self, method: &str, arguments: I) -> Result<serde_json::Value>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		match method {
			"handle" => Ok(self.handle.to_string().into()),
			"implementation" => Ok(self.implementation.into()),
			"environment" => Ok(self.environment().as_str().into()),
			"base_url" => Ok(self.base_url().as_str().into()),
			_ => self.driver.invoke(method, &Attributes::from_iter(arguments)),
		}
	}
}
impl Debug for Chaching {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Chaching")
			.field("handle", &self.handle)
			.field("implementation", &self.implementation)
			.field("environment", &self.environment())
			.field("base_url", &self.base_url().as_str())
			.finish()
	}
}

/// Builder for [`Chaching`].
///
/// Raw option pairs added with [`ChachingBuilder::option`] are validated by
/// [`ChachingBuilder::build`].
pub struct ChachingBuilder {
	handle: String,
	authorization: Authorization,
	options: Options,
	raw_options: Vec<(String, String)>,
	registry: Option<DriverRegistry>,
	http_client: Option<Arc<dyn AccessTokenClient>>,
}
impl ChachingBuilder {
	fn new(handle: impl Into<String>) -> Self {
		Self {
			handle: handle.into(),
			authorization: Authorization::default(),
			options: Options::default(),
			raw_options: Vec::new(),
			registry: None,
			http_client: None,
		}
	}

	/// Sets the positional credentials.
	pub fn authorization(mut self, authorization: Authorization) -> Self {
		self.authorization = authorization;

		self
	}

	/// Replaces the parsed options.
	pub fn options(mut self, options: Options) -> Self {
		self.options = options;

		self
	}

	/// Adds a raw option pair.
	pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.raw_options.push((key.into(), value.into()));

		self
	}

	/// Resolves external drivers against `registry` instead of the process-wide one.
	pub fn registry(mut self, registry: DriverRegistry) -> Self {
		self.registry = Some(registry);

		self
	}

	/// Supplies the HTTP collaborator used by token-authenticated drivers.
	pub fn http_client(mut self, client: Arc<dyn AccessTokenClient>) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Validates the inputs and constructs the driver.
	pub fn build(self) -> Result<Chaching> {
		let handle = DriverHandle::new(&self.handle).map_err(OptionsError::from)?;
		let mut options = self.options;

		for (key, value) in self.raw_options {
			options.set(key, value)?;
		}

		let registry = match &self.registry {
			Some(registry) => registry,
			None => DriverRegistry::global(),
		};
		let resolved = registry.resolve(&handle)?;
		let context = DriverContext {
			handle: handle.clone(),
			message: MessageContext::new(self.authorization, options),
			http_client: self.http_client,
		};
		let driver = obs::observe(&handle, MessageKind::Construct, || resolved.build(context))?;

		Ok(Chaching { handle, implementation: resolved.implementation(), driver })
	}
}
impl Debug for ChachingBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ChachingBuilder")
			.field("handle", &self.handle)
			.field("authorization", &self.authorization)
			.field("options", &self.options)
			.field("raw_options", &self.raw_options.len())
			.field("registry", &self.registry)
			.field("http_client", &self.http_client.is_some())
			.finish()
	}
}
