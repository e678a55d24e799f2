//! Message base shared by every driver: credentials, options, attributes, and the
//! validation helpers applied before a payload is signed.

pub mod attributes;
pub mod authorization;
pub mod options;
pub mod request;
pub mod response;

pub use attributes::*;
pub use authorization::*;
pub use options::*;
pub use request::*;
pub use response::*;

// crates.io
use rust_decimal::{Decimal, prelude::ToPrimitive};
// self
use crate::{_prelude::*, error::OptionsError};

/// ISO 4217 currencies accepted by the bundled gateways (alphabetic, numeric).
pub const CURRENCIES: &[(&str, &str)] = &[
	("EUR", "978"),
	("CZK", "203"),
	("USD", "840"),
	("GBP", "826"),
	("HUF", "348"),
	("PLN", "985"),
	("CHF", "756"),
];

/// Authorization and options a driver was constructed with.
///
/// Both values are fixed for the lifetime of the driver; only attributes vary per call.
#[derive(Clone, Debug, Default)]
pub struct MessageContext {
	authorization: Authorization,
	options: Options,
}
impl MessageContext {
	/// Bundles the provided credentials and options.
	pub fn new(authorization: Authorization, options: Options) -> Self {
		Self { authorization, options }
	}

	/// Credentials supplied at construction.
	pub fn authorization(&self) -> &Authorization {
		&self.authorization
	}

	/// Options supplied at construction.
	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Selected environment (production when absent).
	pub fn environment(&self) -> Environment {
		self.options.environment
	}

	/// Returns the credential at `index`, failing when it is missing or empty.
	pub fn credential(&self, index: usize, name: &'static str) -> Result<&str, OptionsError> {
		self.authorization.require(index, name)
	}
}

/// Returns the attribute value or fails with [`OptionsError::MissingAttribute`].
pub fn require<'a>(attributes: &'a Attributes, name: &str) -> Result<&'a str, OptionsError> {
	attributes.get(name).ok_or_else(|| OptionsError::MissingAttribute { name: name.to_owned() })
}

/// Parses a non-negative amount with at most two decimal places.
pub fn parse_amount(name: &str, value: &str) -> Result<Decimal, OptionsError> {
	let amount = Decimal::from_str(value.trim())
		.map_err(|_| OptionsError::invalid_attribute(name, format!("'{value}' is not numeric")))?;

	if amount.is_sign_negative() {
		return Err(OptionsError::invalid_attribute(name, "amount must not be negative"));
	}
	if amount.normalize().scale() > 2 {
		return Err(OptionsError::invalid_attribute(name, "amount has more than two decimals"));
	}

	Ok(amount)
}

/// Formats an amount with exactly two decimal places (`12.5` → `12.50`).
pub fn format_amount(amount: Decimal) -> String {
	format!("{:.2}", amount)
}

/// Converts an amount into minor currency units (`12.50` → `1250`).
pub fn minor_units(name: &str, amount: Decimal) -> Result<i64, OptionsError> {
	amount
		.checked_mul(Decimal::ONE_HUNDRED)
		.and_then(|minor| minor.trunc().to_i64())
		.ok_or_else(|| OptionsError::invalid_attribute(name, "amount is out of range"))
}

/// Resolves an alphabetic or numeric currency code into its numeric form.
pub fn currency_numeric(name: &str, value: &str) -> Result<&'static str, OptionsError> {
	lookup_currency(name, value).map(|(_, numeric)| numeric)
}

/// Resolves an alphabetic or numeric currency code into its alphabetic form.
pub fn currency_alpha(name: &str, value: &str) -> Result<&'static str, OptionsError> {
	lookup_currency(name, value).map(|(alpha, _)| alpha)
}

/// Parses an absolute `http`/`https` URL.
pub fn absolute_url(name: &str, value: &str) -> Result<Url, OptionsError> {
	let url = Url::parse(value).map_err(|e| {
		OptionsError::invalid_attribute(name, format!("'{value}' is not a URL: {e}"))
	})?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme =>
			Err(OptionsError::invalid_attribute(name, format!("unsupported scheme {scheme}"))),
	}
}

fn lookup_currency(name: &str, value: &str) -> Result<(&'static str, &'static str), OptionsError> {
	let wanted = value.trim();

	CURRENCIES
		.iter()
		.copied()
		.find(|(alpha, numeric)| alpha.eq_ignore_ascii_case(wanted) || *numeric == wanted)
		.ok_or_else(|| {
			OptionsError::invalid_attribute(name, format!("unsupported currency {value}"))
		})
}
