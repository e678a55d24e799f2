//! Crate-level error types shared by the facade, the registry, and every driver.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Constructor arguments, options, or attributes are invalid.
	#[error(transparent)]
	InvalidOptions(#[from] OptionsError),
	/// External driver registration was refused.
	#[error(transparent)]
	Registration(#[from] RegistrationError),
	/// The HTTP collaborator failed (DNS, TCP, TLS, unexpected status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The gateway refused the supplied credentials.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),

	/// Neither the facade nor the driver exposes the requested operation.
	#[error("Method {method} not implemented in driver.")]
	MethodNotImplemented {
		/// Name of the operation that was requested.
		method: String,
	},
	/// A gateway notification carried a signature that does not match its fields.
	#[error("Signature of the `{driver}` response does not match its fields.")]
	SignatureMismatch {
		/// Driver handle that verified the response.
		driver: String,
	},
	/// A gateway notification is missing fields or carries unparseable values.
	#[error("Malformed `{driver}` response: {reason}.")]
	MalformedResponse {
		/// Driver handle that parsed the response.
		driver: String,
		/// Human-readable description of the defect.
		reason: String,
	},
}
impl Error {
	/// Builds a [`Error::MethodNotImplemented`] for the provided operation name.
	pub fn not_implemented(method: impl Into<String>) -> Self {
		Self::MethodNotImplemented { method: method.into() }
	}

	/// Builds a [`Error::MalformedResponse`] for the provided driver.
	pub fn malformed(driver: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::MalformedResponse { driver: driver.into(), reason: reason.into() }
	}
}

/// Construction and validation failures (the `InvalidOptions` family).
#[derive(Debug, ThisError)]
pub enum OptionsError {
	/// Driver handle failed validation.
	#[error("Driver handle is invalid: {0}")]
	InvalidHandle(#[from] crate::registry::HandleError),
	/// Handle is neither natively supported nor externally registered.
	#[error("Invalid driver '{handle}' in use. Valid drivers are '{valid}'.")]
	UnknownDriver {
		/// Requested handle.
		handle: String,
		/// Natively supported handles joined for display.
		valid: String,
	},
	/// `environment` option carries an unsupported value.
	#[error("Environment '{value}' is invalid. Use 'production' or 'sandbox'.")]
	InvalidEnvironment {
		/// Rejected value.
		value: String,
	},
	/// `server_location` option names a region the driver does not serve.
	#[error("Server location '{value}' is invalid.")]
	InvalidRegion {
		/// Rejected value.
		value: String,
	},
	/// Authorization does not carry the credential at the expected position.
	#[error("Authorization is missing the {name} credential (position {index}).")]
	MissingCredential {
		/// Zero-based position inside the authorization sequence.
		index: usize,
		/// Credential label.
		name: &'static str,
	},
	/// Secret key cannot be decoded with the driver's key encoding.
	#[error("Secret key is not valid {encoding}.")]
	InvalidKey {
		/// Expected key encoding label.
		encoding: &'static str,
	},
	/// Required payment attribute was not supplied.
	#[error("Missing required attribute `{name}`.")]
	MissingAttribute {
		/// Attribute name.
		name: String,
	},
	/// Payment attribute carries a malformed value.
	#[error("Attribute `{name}` is invalid: {reason}.")]
	InvalidAttribute {
		/// Attribute name.
		name: String,
		/// Human-readable description of the defect.
		reason: String,
	},
	/// No HTTP collaborator is available for a driver that needs one.
	#[error("Driver `{driver}` requires an HTTP client.")]
	MissingHttpClient {
		/// Driver handle.
		driver: String,
	},
}
impl OptionsError {
	/// Builds an [`OptionsError::InvalidAttribute`].
	pub fn invalid_attribute(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidAttribute { name: name.into(), reason: reason.into() }
	}
}

/// Failures raised while registering external drivers.
#[derive(Debug, ThisError)]
pub enum RegistrationError {
	/// Handle failed validation.
	#[error("Cannot register driver: {0}")]
	InvalidHandle(#[from] crate::registry::HandleError),
}

/// Transport-level failures (network, IO, unexpected HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	ClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Endpoint that was called.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Endpoint answered with a status that is neither success nor an auth refusal.
	#[error("{url} responded with HTTP {status}.")]
	UnexpectedStatus {
		/// Endpoint that was called.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the gateway.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}

	/// Wraps a transport's builder failure.
	pub fn client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::ClientBuild { source: Box::new(src) }
	}
}

/// Access-token acquisition failures.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Authentication endpoint refused the credentials.
	#[error("Authentication endpoint rejected the credentials (HTTP {status}).")]
	Rejected {
		/// HTTP status code.
		status: u16,
	},
	/// Authentication endpoint returned a body without a usable token.
	#[error("Authentication endpoint returned a malformed token payload.")]
	MalformedToken {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Authentication endpoint returned an empty token.
	#[error("Authentication endpoint returned an empty access token.")]
	EmptyToken,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn options_errors_convert_into_invalid_options() {
		let err: Error = OptionsError::MissingAttribute { name: "AMT".into() }.into();

		assert!(matches!(err, Error::InvalidOptions(OptionsError::MissingAttribute { .. })));
		assert_eq!(err.to_string(), "Missing required attribute `AMT`.");
	}

	#[test]
	fn not_implemented_names_the_method() {
		let err = Error::not_implemented("refund");

		assert_eq!(err.to_string(), "Method refund not implemented in driver.");
	}

	#[test]
	fn transport_errors_expose_their_source() {
		let url =
			Url::parse("https://gateway.example.com/auth").expect("Fixture URL should parse.");
		let io = std::io::Error::other("connection reset");
		let err: Error = TransportError::network(&url, io).into();
		let source =
			StdError::source(&err).expect("Transport error should expose the network failure.");

		assert!(err.to_string().contains("https://gateway.example.com/auth"));
		assert_eq!(source.to_string(), "connection reset");
	}
}
