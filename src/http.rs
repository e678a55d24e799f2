//! HTTP collaborator used by drivers that authenticate with access tokens.
//!
//! The crate never owns transport policy: retries, timeouts and proxies belong to the
//! [`AccessTokenClient`] implementation. Failures are propagated unchanged so callers can
//! wrap construction in their own retry loop.

// self
use crate::{
	_prelude::*,
	error::{AuthenticationError, TransportError},
};

/// Redacted access token wrapper keeping bearer material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Credentials posted to a gateway authentication endpoint.
#[derive(Clone)]
pub struct AccessTokenRequest {
	/// Authentication endpoint.
	pub url: Url,
	/// Partner username.
	pub username: String,
	/// Partner password.
	pub password: String,
}
impl AccessTokenRequest {
	/// JSON document posted to the endpoint.
	pub fn body(&self) -> serde_json::Value {
		serde_json::json!({ "username": self.username, "password": self.password })
	}
}
impl Debug for AccessTokenRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenRequest")
			.field("url", &self.url.as_str())
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Synchronous collaborator that exchanges partner credentials for an access token.
///
/// Implementations map refused credentials (HTTP 401/403) to
/// [`AuthenticationError::Rejected`], other failures to [`TransportError`], and must not
/// retry on their own.
pub trait AccessTokenClient
where
	Self: Send + Sync,
{
	/// Performs the round trip and returns the issued token.
	fn obtain_access_token(&self, request: &AccessTokenRequest) -> Result<AccessToken>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
	access_token: String,
}

/// Parses an authentication endpoint body into an [`AccessToken`].
pub fn parse_token_payload(body: &[u8]) -> Result<AccessToken> {
	let mut de = serde_json::Deserializer::from_slice(body);
	let payload: TokenPayload = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| AuthenticationError::MalformedToken { source })?;

	if payload.access_token.trim().is_empty() {
		return Err(AuthenticationError::EmptyToken.into());
	}

	Ok(AccessToken::new(payload.access_token))
}

/// Classifies an HTTP status returned by an authentication endpoint.
pub fn check_token_status(url: &Url, status: u16) -> Result<()> {
	match status {
		200..=299 => Ok(()),
		401 | 403 => Err(AuthenticationError::Rejected { status }.into()),
		status => Err(TransportError::UnexpectedStatus { url: url.to_string(), status }.into()),
	}
}

/// Thin wrapper around the blocking [`ReqwestClient`] so token calls live in one place.
///
/// Configure timeouts on the wrapped client; the driver waits for completion.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing blocking reqwest client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that does not follow redirects, matching token endpoint semantics.
	pub fn try_new() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(TransportError::client_build)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AccessTokenClient for ReqwestHttpClient {
	fn obtain_access_token(&self, request: &AccessTokenRequest) -> Result<AccessToken> {
		let body = request.body().to_string();
		let response = self
			.0
			.post(request.url.clone())
			.header(reqwest::header::CONTENT_TYPE, "application/json")
			.header("Charset", "utf-8")
			.body(body)
			.send()
			.map_err(|e| TransportError::network(&request.url, e))?;

		check_token_status(&request.url, response.status().as_u16())?;

		let bytes = response.bytes().map_err(|e| TransportError::network(&request.url, e))?;

		parse_token_payload(&bytes)
	}
}
