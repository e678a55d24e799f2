//! Home Credit consumer-loan gateway.
//!
//! Unlike the redirect gateways, Home Credit authenticates the merchant with an access
//! token issued by its partner API. The token is obtained while the driver is constructed
//! and attached as a bearer header to the JSON loan application.

// self
use crate::{
	_prelude::*,
	driver::{Driver, Endpoint, MessageCache, parse_endpoint, select_endpoint},
	error::OptionsError,
	http::{AccessToken, AccessTokenClient, AccessTokenRequest},
	message::{
		self, Attributes, Environment, MessageContext, PaymentRequest, PaymentResponse,
		PaymentStatus,
	},
};

/// Driver handle.
pub const HOME_CREDIT: &str = "homecredit";

const ENDPOINTS: &[Endpoint] = &[
	Endpoint::new(Environment::Production, "cz", "https://api.homecredit.cz"),
	Endpoint::new(Environment::Production, "sk", "https://api.homecredit.sk"),
	Endpoint::new(Environment::Sandbox, "cz", "https://apicz-test.homecredit.net/verdun-train"),
	Endpoint::new(Environment::Sandbox, "sk", "https://apisk-test.homecredit.net/verdun-train"),
];
const AUTHENTICATION_PATH: &str = "/authentication/v1/partner/";
const APPLICATIONS_PATH: &str = "/financing/v1/applications";
const SANDBOX_USERNAME: &str = "024243tech";
const SANDBOX_PASSWORD: &str = "024243tech";

/// Token-authenticated Home Credit driver.
pub struct HomeCreditDriver {
	context: MessageContext,
	region: &'static str,
	base_url: Url,
	access_token: AccessToken,
	cache: MessageCache,
}
impl HomeCreditDriver {
	/// Selects the regional endpoint and exchanges the partner credentials for a token.
	///
	/// Sandbox drivers without credentials use the publicly documented test partner.
	pub fn new(context: MessageContext, client: &dyn AccessTokenClient) -> Result<Self> {
		let endpoint = select_endpoint(
			ENDPOINTS,
			context.environment(),
			context.options().server_location.as_deref(),
		)?;
		let base_url = parse_endpoint(endpoint.url)?;
		let (username, password) = match context.environment() {
			Environment::Sandbox if context.authorization().is_empty() =>
				(SANDBOX_USERNAME.to_owned(), SANDBOX_PASSWORD.to_owned()),
			_ => (
				context.credential(0, "username")?.to_owned(),
				context.credential(1, "password")?.to_owned(),
			),
		};
		let request =
			AccessTokenRequest { url: join(&base_url, AUTHENTICATION_PATH)?, username, password };
		let access_token = client.obtain_access_token(&request)?;

		Ok(Self {
			context,
			region: endpoint.region,
			base_url,
			access_token,
			cache: MessageCache::default(),
		})
	}

	/// Token issued during construction.
	pub fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	/// Region the driver talks to.
	pub fn server_location(&self) -> &'static str {
		self.region
	}

	fn build_request(&self, attributes: &Attributes) -> Result<PaymentRequest> {
		let amount = message::parse_amount("amount", message::require(attributes, "amount")?)?;
		let currency = message::currency_alpha(
			"currency",
			attributes.get("currency").unwrap_or(self.default_currency()),
		)?;
		let reference = message::require(attributes, "reference")?;
		let return_url =
			message::absolute_url("return_url", message::require(attributes, "return_url")?)?;
		let rejected_url = match attributes.get("cancel_url") {
			Some(value) => message::absolute_url("cancel_url", value)?,
			None => return_url.clone(),
		};
		let notify_url =
			message::absolute_url("notify_url", message::require(attributes, "notify_url")?)?;
		let minor_amount = message::minor_units("amount", amount)?;
		let mut customer = serde_json::Map::new();

		for (attribute, key) in [
			("first_name", "firstName"),
			("last_name", "lastName"),
			("email", "email"),
			("phone", "phone"),
		] {
			if let Some(value) = attributes.get(attribute) {
				customer.insert(key.to_owned(), value.into());
			}
		}

		let body = serde_json::json!({
			"customer": customer,
			"order": {
				"number": reference,
				"totalPrice": {
					"amount": minor_amount,
					"currency": currency,
				},
			},
			"type": "INSTALLMENT",
			"merchantUrls": {
				"approvedRedirect": return_url.as_str(),
				"rejectedRedirect": rejected_url.as_str(),
				"notificationEndpoint": notify_url.as_str(),
			},
		});

		let endpoint = join(&self.base_url, APPLICATIONS_PATH)?;

		Ok(PaymentRequest::json(HOME_CREDIT, self.context.environment(), endpoint, body)
			.with_bearer(self.access_token.clone()))
	}

	fn parse_response(&self, attributes: Attributes) -> Result<PaymentResponse> {
		let state = attributes
			.get("state")
			.ok_or_else(|| Error::malformed(HOME_CREDIT, "missing state field"))?;
		let status = application_status(state)
			.ok_or_else(|| Error::malformed(HOME_CREDIT, format!("unknown state '{state}'")))?;
		let reference = attributes.get("orderNumber").map(str::to_owned);
		let transaction_id = attributes.get("id").map(str::to_owned);
		let mut response = PaymentResponse::new(HOME_CREDIT, status, attributes);

		response.reference = reference;
		response.transaction_id = transaction_id;

		Ok(response)
	}

	fn default_currency(&self) -> &'static str {
		if self.region == "cz" { "CZK" } else { "EUR" }
	}
}
impl Debug for HomeCreditDriver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HomeCreditDriver")
			.field("environment", &self.context.environment())
			.field("region", &self.region)
			.field("base_url", &self.base_url.as_str())
			.field("access_token", &self.access_token)
			.finish()
	}
}
impl Driver for HomeCreditDriver {
	fn environment(&self) -> Environment {
		self.context.environment()
	}

	fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn request(&self, attributes: Attributes) -> Result<Arc<PaymentRequest>> {
		self.cache.request_or_try_insert_with(|| self.build_request(&attributes))
	}

	fn response(&self, attributes: Attributes) -> Result<Arc<PaymentResponse>> {
		self.cache.response_or_try_insert_with(|| self.parse_response(attributes))
	}

	fn invoke(&self, method: &str, _arguments: &Attributes) -> Result<serde_json::Value> {
		match method {
			"access_token" => Ok(self.access_token.expose().into()),
			"server_location" => Ok(self.region.into()),
			_ => Err(Error::not_implemented(method)),
		}
	}
}

fn application_status(state: &str) -> Option<PaymentStatus> {
	match state {
		"APPROVED" | "READY_TO_SHIP" | "READY_DELIVERED" | "READY_PAID" | "PAID" =>
			Some(PaymentStatus::Success),
		"PROCESSING" => Some(PaymentStatus::Pending),
		"REJECTED" => Some(PaymentStatus::Failure),
		"CANCELLED" => Some(PaymentStatus::Cancelled),
		_ => None,
	}
}

fn join(base: &Url, path: &str) -> Result<Url, OptionsError> {
	parse_endpoint(&format!("{}{path}", base.as_str().trim_end_matches('/')))
}
