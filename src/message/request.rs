//! Outgoing payment-initiation requests produced by drivers.

// crates.io
use url::form_urlencoded::Serializer;
// self
use crate::{_prelude::*, http::AccessToken, message::Environment};

/// HTTP method the caller should use to hand the request to the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// Redirect the customer with the fields in the query string.
	Get,
	/// Submit the payload in the request body.
	Post,
}
impl HttpMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request body shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Payload {
	/// Ordered form fields (`application/x-www-form-urlencoded`).
	Form(Vec<(String, String)>),
	/// JSON document (`application/json`).
	Json(serde_json::Value),
}

/// Signed payment request ready to be sent to (or redirected towards) the gateway.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
	/// Handle of the driver that built the request.
	pub driver: String,
	/// Environment the endpoint belongs to.
	pub environment: Environment,
	/// Gateway endpoint receiving the request.
	pub endpoint: Url,
	/// HTTP method expected by the gateway.
	pub method: HttpMethod,
	/// Request body or query fields.
	pub payload: Payload,
	/// Signature attached to the payload, when the gateway signs requests.
	pub signature: Option<String>,
	/// Bearer token for gateways that authenticate with access tokens.
	#[serde(skip)]
	pub bearer: Option<AccessToken>,
}
impl PaymentRequest {
	/// Builds a form-encoded request.
	pub fn form(
		driver: impl Into<String>,
		environment: Environment,
		endpoint: Url,
		method: HttpMethod,
		fields: Vec<(String, String)>,
	) -> Self {
		Self {
			driver: driver.into(),
			environment,
			endpoint,
			method,
			payload: Payload::Form(fields),
			signature: None,
			bearer: None,
		}
	}

	/// Builds a JSON request sent with `POST`.
	pub fn json(
		driver: impl Into<String>,
		environment: Environment,
		endpoint: Url,
		body: serde_json::Value,
	) -> Self {
		Self {
			driver: driver.into(),
			environment,
			endpoint,
			method: HttpMethod::Post,
			payload: Payload::Json(body),
			signature: None,
			bearer: None,
		}
	}

	/// Records the signature carried by the payload.
	pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
		self.signature = Some(signature.into());

		self
	}

	/// Attaches a bearer token.
	pub fn with_bearer(mut self, token: AccessToken) -> Self {
		self.bearer = Some(token);

		self
	}

	/// `Content-Type` header value matching the payload.
	pub fn content_type(&self) -> &'static str {
		match self.payload {
			Payload::Form(_) => "application/x-www-form-urlencoded",
			Payload::Json(_) => "application/json",
		}
	}

	/// Ordered form fields; empty for JSON payloads.
	pub fn fields(&self) -> &[(String, String)] {
		match &self.payload {
			Payload::Form(fields) => fields,
			Payload::Json(_) => &[],
		}
	}

	/// Looks up a form field by name.
	pub fn field(&self, name: &str) -> Option<&str> {
		self.fields().iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// JSON document, when the payload is JSON.
	pub fn json_body(&self) -> Option<&serde_json::Value> {
		match &self.payload {
			Payload::Json(body) => Some(body),
			Payload::Form(_) => None,
		}
	}

	/// URL-encoded form body, when the payload is a form.
	pub fn form_body(&self) -> Option<String> {
		match &self.payload {
			Payload::Form(fields) =>
				Some(Serializer::new(String::new()).extend_pairs(fields).finish()),
			Payload::Json(_) => None,
		}
	}

	/// Customer redirect URL with the form fields in the query string.
	///
	/// Returns `None` for JSON payloads, which must be posted server-to-server.
	pub fn redirect_url(&self) -> Option<Url> {
		let Payload::Form(fields) = &self.payload else {
			return None;
		};
		let mut url = self.endpoint.clone();

		url.query_pairs_mut().extend_pairs(fields);

		Some(url)
	}

	/// Headers the caller should send alongside the payload.
	pub fn headers(&self) -> Vec<(&'static str, String)> {
		let mut headers = vec![("Content-Type", self.content_type().to_owned())];

		if let Some(token) = &self.bearer {
			headers.push(("Authorization", format!("Bearer {}", token.expose())));
		}

		headers
	}
}
