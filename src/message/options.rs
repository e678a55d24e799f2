//! Driver options: environment selection plus provider-specific extras.

// self
use crate::{_prelude::*, error::OptionsError};

/// Gateway environment selecting production or sandbox endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	/// Live endpoints that move real money.
	Production,
	/// Test endpoints published by the provider.
	Sandbox,
}
impl Environment {
	/// Returns the option value naming the environment.
	pub const fn as_str(self) -> &'static str {
		match self {
			Environment::Production => "production",
			Environment::Sandbox => "sandbox",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Environment {
	type Err = OptionsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"production" => Ok(Environment::Production),
			"sandbox" => Ok(Environment::Sandbox),
			other => Err(OptionsError::InvalidEnvironment { value: other.to_owned() }),
		}
	}
}

/// Validated driver options.
///
/// `environment` is parsed eagerly. `server_location` is kept verbatim because only the
/// driver knows which regions it serves. Any other key lands in the extras map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
	/// Selected environment; production unless specified.
	pub environment: Environment,
	/// Requested gateway region (e.g. `sk`, `cz`).
	pub server_location: Option<String>,
	/// Unrecognized keys, available to external drivers.
	pub extras: BTreeMap<String, String>,
}
impl Options {
	/// Option key selecting the environment.
	pub const ENVIRONMENT: &'static str = "environment";
	/// Option key selecting the gateway region.
	pub const SERVER_LOCATION: &'static str = "server_location";

	/// Parses raw option pairs, failing on invalid environment values.
	pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, OptionsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut options = Self::default();

		for (key, value) in pairs {
			options.set(key, value)?;
		}

		Ok(options)
	}

	/// Applies one raw option pair.
	pub fn set(
		&mut self,
		key: impl Into<String>,
		value: impl Into<String>,
	) -> Result<(), OptionsError> {
		let key = key.into();
		let value = value.into();

		match key.as_str() {
			Self::ENVIRONMENT => self.environment = value.parse()?,
			Self::SERVER_LOCATION => self.server_location = Some(value),
			_ => {
				self.extras.insert(key, value);
			},
		}

		Ok(())
	}

	/// Shorthand for sandbox options without extras.
	pub fn sandbox() -> Self {
		Self { environment: Environment::Sandbox, ..Self::default() }
	}

	/// Overrides the gateway region.
	pub fn with_server_location(mut self, location: impl Into<String>) -> Self {
		self.server_location = Some(location.into());

		self
	}

	/// Returns an extra option by key.
	pub fn extra(&self, key: &str) -> Option<&str> {
		self.extras.get(key).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn environment_defaults_to_production() {
		let options = Options::from_pairs(Vec::<(String, String)>::new())
			.expect("Empty options should be accepted.");

		assert_eq!(options.environment, Environment::Production);
		assert!(options.server_location.is_none());
	}

	#[test]
	fn recognized_keys_are_parsed_and_extras_kept() {
		let options = Options::from_pairs([
			("environment", "sandbox"),
			("server_location", "cz"),
			("language", "sk"),
		])
		.expect("Well-formed options should parse.");

		assert_eq!(options.environment, Environment::Sandbox);
		assert_eq!(options.server_location.as_deref(), Some("cz"));
		assert_eq!(options.extra("language"), Some("sk"));
	}

	#[test]
	fn invalid_environment_fails_eagerly() {
		let err = Options::from_pairs([("environment", "staging")])
			.expect_err("Unknown environments must be rejected.");

		assert!(matches!(err, OptionsError::InvalidEnvironment { value } if value == "staging"));
	}

	#[test]
	fn environment_serializes_as_snake_case() {
		let payload = serde_json::to_string(&Environment::Sandbox)
			.expect("Environment should serialize to JSON.");

		assert_eq!(payload, "\"sandbox\"");
	}
}
