//! Table-driven driver for redirect-style bank gateways.
//!
//! Every bundled bank gateway follows the same contract: the merchant sends a form with an
//! ordered set of fields plus a signature over a provider-mandated subset of them, and the
//! bank notifies the merchant with another signed field set. [`GatewayDescriptor`] captures
//! those differences as data; [`GatewayDriver`] applies them.

mod gp_webpay;
mod paypal;
mod postova_banka;
mod slsp;
mod tatra_banka;
mod trustpay;
mod vub;

pub use gp_webpay::GP_WEBPAY;
pub use paypal::PAYPAL;
pub use postova_banka::ITERMINAL;
pub use slsp::SPOROPAY;
pub use tatra_banka::{CARDPAY, TATRAPAY};
pub use trustpay::TRUSTPAY;
pub use vub::{ECARD, EPLATBY};

// crates.io
use rand::{Rng, distr::Alphanumeric};
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{
	_prelude::*,
	driver::{Driver, Endpoint, MessageCache, parse_endpoint, select_endpoint},
	error::OptionsError,
	message::{
		self, Attributes, Environment, HttpMethod, MessageContext, PaymentRequest, PaymentResponse,
		PaymentStatus,
	},
	signature::SignatureEngine,
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[day][month][year][hour][minute][second]");
const NONCE_LEN: usize = 20;

/// How a request field value is produced and shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
	/// Value copied verbatim.
	Text,
	/// Decimal amount with two places (`12.50`).
	Amount,
	/// Amount in minor units (`1250`).
	MinorAmount,
	/// ISO 4217 numeric currency (`978`).
	NumericCurrency,
	/// ISO 4217 alphabetic currency (`EUR`).
	AlphaCurrency,
	/// Absolute `http`/`https` URL.
	Url,
	/// UTC timestamp `ddMMyyyyHHmmss`, generated when absent.
	Timestamp,
	/// Random alphanumeric nonce, generated when absent.
	Nonce,
	/// Authorization credential at the given position; attributes cannot override it.
	Credential(usize),
}

/// Whether a request field must be supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
	/// Missing values fail with [`OptionsError::MissingAttribute`].
	Required,
	/// Missing values are omitted from the payload.
	Optional,
	/// Missing values fall back to the given default.
	Default(&'static str),
}

/// One request field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
	/// Provider field name.
	pub name: &'static str,
	/// Normalized attribute names accepted for the field.
	pub aliases: &'static [&'static str],
	/// Value shaping.
	pub kind: FieldKind,
	/// Presence rule.
	pub presence: Presence,
}
impl FieldSpec {
	/// Declares a required field.
	pub const fn required(
		name: &'static str,
		kind: FieldKind,
		aliases: &'static [&'static str],
	) -> Self {
		Self { name, aliases, kind, presence: Presence::Required }
	}

	/// Declares an optional field.
	pub const fn optional(
		name: &'static str,
		kind: FieldKind,
		aliases: &'static [&'static str],
	) -> Self {
		Self { name, aliases, kind, presence: Presence::Optional }
	}

	/// Declares a field with a default value.
	pub const fn defaulted(
		name: &'static str,
		kind: FieldKind,
		aliases: &'static [&'static str],
		value: &'static str,
	) -> Self {
		Self { name, aliases, kind, presence: Presence::Default(value) }
	}

	/// Declares a field filled from the authorization.
	pub const fn credential(name: &'static str, index: usize) -> Self {
		Self {
			name,
			aliases: &[],
			kind: FieldKind::Credential(index),
			presence: Presence::Required,
		}
	}
}

/// Ordered signing contract for one message direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigningScheme {
	/// Fields whose values are signed, in provider-mandated order.
	pub fields: &'static [&'static str],
	/// Field carrying the signature.
	pub signature_field: &'static str,
	/// Drop absent fields instead of signing them as empty strings.
	pub skip_absent: bool,
	/// Algorithm and encodings.
	pub engine: SignatureEngine,
}
impl SigningScheme {
	/// Collects the values to sign from `lookup`, in scheme order.
	pub fn values<'a>(&self, lookup: impl Fn(&str) -> Option<&'a str>) -> Vec<&'a str> {
		self.fields
			.iter()
			.filter_map(|name| match lookup(name) {
				Some(value) => Some(value),
				None if self.skip_absent => None,
				None => Some(""),
			})
			.collect()
	}

	/// Signs values collected with [`SigningScheme::values`].
	pub fn sign(&self, values: &[&str], secret: &str) -> Result<String, OptionsError> {
		self.engine.sign(values, secret)
	}

	/// Verifies `received` against values collected with [`SigningScheme::values`].
	pub fn verify(
		&self,
		received: &str,
		values: &[&str],
		secret: &str,
	) -> Result<bool, OptionsError> {
		self.engine.verify(received, values, secret)
	}
}

/// How a notification is normalized.
#[derive(Clone, Copy, Debug)]
pub struct ResponseSpec {
	/// Field carrying the outcome.
	pub status_field: &'static str,
	/// Maps the outcome value; `None` marks an unknown value.
	pub status: fn(&str) -> Option<PaymentStatus>,
	/// Merchant reference field.
	pub reference_field: Option<&'static str>,
	/// Gateway transaction id field.
	pub transaction_field: Option<&'static str>,
	/// Amount field.
	pub amount_field: Option<&'static str>,
	/// Currency field.
	pub currency_field: Option<&'static str>,
}

/// Static description of a redirect-style gateway.
#[derive(Clone, Copy, Debug)]
pub struct GatewayDescriptor {
	/// Driver handle.
	pub handle: &'static str,
	/// Environment × region endpoint table.
	pub endpoints: &'static [Endpoint],
	/// Credential labels by authorization position.
	pub credentials: &'static [&'static str],
	/// Position of the shared secret, when the gateway signs messages.
	pub secret: Option<usize>,
	/// HTTP method used to hand the request over.
	pub method: HttpMethod,
	/// Ordered request fields.
	pub request_fields: &'static [FieldSpec],
	/// Request signing contract.
	pub request_signature: Option<SigningScheme>,
	/// Response signing contract.
	pub response_signature: Option<SigningScheme>,
	/// Response normalization.
	pub response: ResponseSpec,
}
impl GatewayDescriptor {
	/// Credential position holding the shared secret.
	///
	/// Signing descriptors without one fail instead of keying with another credential.
	pub fn secret_index(&self) -> Result<usize, OptionsError> {
		self.secret.ok_or(OptionsError::MissingCredential {
			index: self.credentials.len(),
			name: "secret key",
		})
	}

	fn credential_label(&self, index: usize) -> &'static str {
		self.credentials.get(index).copied().unwrap_or("credential")
	}

	fn signature_engines(&self) -> impl Iterator<Item = &SignatureEngine> {
		self.request_signature
			.iter()
			.chain(self.response_signature.iter())
			.map(|scheme| &scheme.engine)
	}
}

/// Driver applying a [`GatewayDescriptor`].
#[derive(Debug)]
pub struct GatewayDriver {
	descriptor: &'static GatewayDescriptor,
	context: MessageContext,
	base_url: Url,
	cache: MessageCache,
}
impl GatewayDriver {
	/// Validates credentials and options eagerly, then selects the endpoint.
	pub fn new(descriptor: &'static GatewayDescriptor, context: MessageContext) -> Result<Self> {
		let endpoint = select_endpoint(
			descriptor.endpoints,
			context.environment(),
			context.options().server_location.as_deref(),
		)?;
		let base_url = parse_endpoint(endpoint.url)?;

		for spec in descriptor.request_fields {
			if let FieldKind::Credential(index) = spec.kind {
				context.credential(index, descriptor.credential_label(index))?;
			}
		}
		if descriptor.signature_engines().next().is_some() {
			let index = descriptor.secret_index()?;
			let secret = context.credential(index, descriptor.credential_label(index))?;

			for engine in descriptor.signature_engines() {
				engine.key_encoding.decode(secret)?;
			}
		}

		Ok(Self { descriptor, context, base_url, cache: MessageCache::default() })
	}

	/// Descriptor backing the driver.
	pub fn descriptor(&self) -> &'static GatewayDescriptor {
		self.descriptor
	}

	fn secret(&self) -> Result<&str, OptionsError> {
		let index = self.descriptor.secret_index()?;

		self.context.credential(index, self.descriptor.credential_label(index))
	}

	fn build_request(&self, attributes: &Attributes) -> Result<PaymentRequest> {
		let mut fields = Vec::with_capacity(self.descriptor.request_fields.len() + 1);

		for spec in self.descriptor.request_fields {
			if let Some(value) = self.field_value(spec, attributes)? {
				fields.push((spec.name.to_owned(), value));
			}
		}

		let signature = match &self.descriptor.request_signature {
			Some(scheme) => {
				let values = scheme.values(|name| {
					fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
				});
				let signature = scheme.sign(&values, self.secret()?)?;

				fields.push((scheme.signature_field.to_owned(), signature.clone()));

				Some(signature)
			},
			None => None,
		};
		let request = PaymentRequest::form(
			self.descriptor.handle,
			self.context.environment(),
			self.base_url.clone(),
			self.descriptor.method,
			fields,
		);

		Ok(match signature {
			Some(signature) => request.with_signature(signature),
			None => request,
		})
	}

	fn field_value(&self, spec: &FieldSpec, attributes: &Attributes) -> Result<Option<String>> {
		if let FieldKind::Credential(index) = spec.kind {
			let value = self.context.credential(index, self.descriptor.credential_label(index))?;

			return Ok(Some(value.to_owned()));
		}

		let supplied = attributes.get(spec.name).or_else(|| attributes.first_of(spec.aliases));
		let raw = match (supplied, spec.presence) {
			(Some(value), _) => value,
			(None, _) if matches!(spec.kind, FieldKind::Timestamp) =>
				return Ok(Some(current_timestamp(spec.name)?)),
			(None, _) if matches!(spec.kind, FieldKind::Nonce) => return Ok(Some(nonce())),
			(None, Presence::Default(value)) => value,
			(None, Presence::Optional) => return Ok(None),
			(None, Presence::Required) =>
				return Err(OptionsError::MissingAttribute { name: spec.name.to_owned() }.into()),
		};

		shape(spec, raw).map(Some).map_err(Error::from)
	}

	fn parse_response(&self, attributes: Attributes) -> Result<PaymentResponse> {
		let handle = self.descriptor.handle;
		let spec = &self.descriptor.response;
		let mut signature_verified = false;

		if let Some(scheme) = &self.descriptor.response_signature {
			let received = attributes.get(scheme.signature_field).ok_or_else(|| {
				let field = scheme.signature_field;

				Error::malformed(handle, format!("missing signature field {field}"))
			})?;
			let values = scheme.values(|name| attributes.get(name));

			if !scheme.verify(received, &values, self.secret()?)? {
				return Err(Error::SignatureMismatch { driver: handle.to_owned() });
			}

			signature_verified = true;
		}

		let raw_status = attributes
			.get(spec.status_field)
			.ok_or_else(|| {
				Error::malformed(handle, format!("missing {} field", spec.status_field))
			})?;
		let status = (spec.status)(raw_status).ok_or_else(|| {
			Error::malformed(handle, format!("unknown {} value '{raw_status}'", spec.status_field))
		})?;
		let pick = |field: Option<&'static str>| {
			field.and_then(|name| attributes.get(name)).map(str::to_owned)
		};
		let reference = pick(spec.reference_field);
		let transaction_id = pick(spec.transaction_field);
		let amount = pick(spec.amount_field);
		let currency = pick(spec.currency_field);
		let mut response = PaymentResponse::new(handle, status, attributes);

		response.reference = reference;
		response.transaction_id = transaction_id;
		response.amount = amount;
		response.currency = currency;
		response.signature_verified = signature_verified;

		Ok(response)
	}
}
impl Driver for GatewayDriver {
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
		let scheme = match method {
			"request_signing_fields" => self.descriptor.request_signature,
			"response_signing_fields" => self.descriptor.response_signature,
			_ => return Err(Error::not_implemented(method)),
		};

		Ok(scheme.map(|scheme| serde_json::json!(scheme.fields)).unwrap_or_default())
	}
}

fn shape(spec: &FieldSpec, raw: &str) -> Result<String, OptionsError> {
	let name = spec.name;

	match spec.kind {
		FieldKind::Text | FieldKind::Nonce | FieldKind::Credential(_) => Ok(raw.to_owned()),
		FieldKind::Amount => Ok(message::format_amount(message::parse_amount(name, raw)?)),
		FieldKind::MinorAmount =>
			Ok(message::minor_units(name, message::parse_amount(name, raw)?)?.to_string()),
		FieldKind::NumericCurrency => message::currency_numeric(name, raw).map(str::to_owned),
		FieldKind::AlphaCurrency => message::currency_alpha(name, raw).map(str::to_owned),
		FieldKind::Url => message::absolute_url(name, raw).map(String::from),
		FieldKind::Timestamp => {
			if raw.len() == 14 && raw.bytes().all(|b| b.is_ascii_digit()) {
				Ok(raw.to_owned())
			} else {
				Err(OptionsError::invalid_attribute(name, "expected ddMMyyyyHHmmss"))
			}
		},
	}
}

fn current_timestamp(name: &str) -> Result<String, OptionsError> {
	OffsetDateTime::now_utc()
		.format(TIMESTAMP_FORMAT)
		.map_err(|e| OptionsError::invalid_attribute(name, e.to_string()))
}

fn nonce() -> String {
	rand::rng().sample_iter(&Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}
