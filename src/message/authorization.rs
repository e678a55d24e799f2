//! Provider credentials that stay redacted in every formatter.

// self
use crate::{_prelude::*, error::OptionsError};

/// Ordered provider credentials (merchant id, secret key, username/password, ...).
///
/// Each driver documents which position carries which credential. Values never appear in
/// `Debug` or `Display` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authorization(Vec<String>);
impl Authorization {
	/// Wraps the provided credentials, keeping their order.
	pub fn new<I, S>(credentials: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(credentials.into_iter().map(Into::into).collect())
	}

	/// Returns the credential at `index`. Callers must avoid logging the value.
	pub fn expose(&self, index: usize) -> Option<&str> {
		self.0.get(index).map(String::as_str)
	}

	/// Returns the credential at `index` or fails naming the missing credential.
	pub fn require(&self, index: usize, name: &'static str) -> Result<&str, OptionsError> {
		self.expose(index)
			.filter(|value| !value.is_empty())
			.ok_or(OptionsError::MissingCredential { index, name })
	}

	/// Number of supplied credentials.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no credential was supplied.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<S> FromIterator<S> for Authorization
where
	S: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter)
	}
}
impl Debug for Authorization {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Authorization").field(&format_args!("<{} redacted>", self.0.len())).finish()
	}
}
impl Display for Authorization {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
