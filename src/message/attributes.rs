//! Per-call payment attributes.

// self
use crate::_prelude::*;

/// Payment fields supplied for a single request or response call.
///
/// Keys are either provider field names (`AMT`, `VS`, ...) or the normalized aliases each
/// driver maps onto them (`amount`, `reference`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);
impl Attributes {
	/// Creates an empty attribute map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces an attribute.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	/// Builder-style variant of [`Attributes::insert`].
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(name, value);

		self
	}

	/// Returns the attribute value, treating empty strings as absent.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str).filter(|value| !value.is_empty())
	}

	/// Returns the first present value among `names`.
	pub fn first_of<'a>(&'a self, names: &[&str]) -> Option<&'a str> {
		names.iter().find_map(|name| self.get(name))
	}

	/// Returns true when the attribute is present and non-empty.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Iterates over attributes in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Number of attributes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no attribute is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Consumes the attributes into the underlying map.
	pub fn into_inner(self) -> BTreeMap<String, String> {
		self.0
	}
}
impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}
impl From<BTreeMap<String, String>> for Attributes {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}
impl From<HashMap<String, String>> for Attributes {
	fn from(map: HashMap<String, String>) -> Self {
		Self(map.into_iter().collect())
	}
}
