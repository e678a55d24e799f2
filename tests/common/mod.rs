//! Shared fixtures for integration tests.

#![allow(dead_code)]

// crates.io
use chaching::{
	Chaching, Result,
	driver::{Driver, MessageCache},
	http::{AccessToken, AccessTokenClient, AccessTokenRequest},
	message::{
		Attributes, Authorization, Environment, HttpMethod, PaymentRequest, PaymentResponse,
		PaymentStatus,
	},
	registry::{DriverContext, DriverFactory},
	url::Url,
};

/// Hex secret accepted by the Tatra banka drivers.
pub const TATRA_KEY: &str = "31323334353637383930313233343536";
/// Base64 secret accepted by SporoPay.
pub const SPOROPAY_KEY: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTI=";

/// Token client that always succeeds without touching the network.
#[derive(Clone, Debug)]
pub struct StaticTokenClient(pub &'static str);
impl AccessTokenClient for StaticTokenClient {
	fn obtain_access_token(&self, _: &AccessTokenRequest) -> Result<AccessToken> {
		Ok(AccessToken::new(self.0))
	}
}

/// Credentials that construct each native driver.
pub fn native_authorization(handle: &str) -> Authorization {
	match handle {
		"cardpay" | "tatrapay" => Authorization::new(["9999", TATRA_KEY]),
		"sporopay" => Authorization::new(["000000", "0013662162", SPOROPAY_KEY]),
		"paypal" => Authorization::new(["shop@example.com"]),
		"homecredit" => Authorization::default(),
		_ => Authorization::new(["1001", "secret"]),
	}
}

/// Constructs a native driver in the sandbox with [`native_authorization`].
pub fn sandbox(handle: &str) -> Result<Chaching> {
	Chaching::new(handle, native_authorization(handle), [("environment", "sandbox")])
}

/// Complete TatraPay payment attributes.
pub fn tatrapay_attributes(reference: &str) -> Vec<(&'static str, String)> {
	vec![
		("amount", "12.50".into()),
		("currency", "EUR".into()),
		("reference", reference.into()),
		("return_url", "https://shop.example.com/return".into()),
	]
}

/// External driver echoing its attributes into an unsigned form.
#[derive(Debug)]
pub struct EchoDriver {
	environment: Environment,
	base_url: Url,
	cache: MessageCache,
}
impl EchoDriver {
	pub fn new(context: DriverContext) -> Result<Self> {
		Ok(Self {
			environment: context.message.environment(),
			base_url: Url::parse("https://pay.acme.example/checkout")
				.expect("Echo endpoint should parse."),
			cache: MessageCache::default(),
		})
	}
}
impl Driver for EchoDriver {
	fn environment(&self) -> Environment {
		self.environment
	}

	fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn request(&self, attributes: Attributes) -> Result<std::sync::Arc<PaymentRequest>> {
		self.cache.request_or_try_insert_with(|| {
			let fields = attributes.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect();

			Ok(PaymentRequest::form(
				"echo",
				self.environment,
				self.base_url.clone(),
				HttpMethod::Get,
				fields,
			))
		})
	}

	fn response(&self, attributes: Attributes) -> Result<std::sync::Arc<PaymentResponse>> {
		self.cache.response_or_try_insert_with(|| {
			Ok(PaymentResponse::new("echo", PaymentStatus::Success, attributes))
		})
	}
}

/// Factory producing [`EchoDriver`]s under a fixed implementation name.
#[derive(Clone, Copy, Debug)]
pub struct EchoFactory(pub &'static str);
impl DriverFactory for EchoFactory {
	fn build(&self, context: DriverContext) -> Result<Box<dyn Driver>> {
		Ok(Box::new(EchoDriver::new(context)?))
	}

	fn implementation(&self) -> &'static str {
		self.0
	}
}
