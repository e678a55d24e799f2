//! Driver handles, the native driver table, and the registry of external drivers.
//!
//! Resolution always consults the native table first. External factories registered under a
//! native handle are stored but never shadow the bundled driver.

// std
use std::{borrow::Borrow, ops::Deref, sync::LazyLock};
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	driver::{
		CARDPAY, Driver, ECARD, EPLATBY, GP_WEBPAY, GatewayDescriptor, GatewayDriver, HOME_CREDIT,
		HomeCreditDriver, ITERMINAL, PAYPAL, SPOROPAY, TATRAPAY, TRUSTPAY,
	},
	error::{OptionsError, RegistrationError},
	http::AccessTokenClient,
	message::MessageContext,
	obs,
};

const HANDLE_MAX_LEN: usize = 64;

static GLOBAL: LazyLock<DriverRegistry> = LazyLock::new(DriverRegistry::new);

/// Error returned when handle validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum HandleError {
	/// The handle was empty.
	#[error("Driver handle cannot be empty.")]
	Empty,
	/// The handle contains whitespace characters.
	#[error("Driver handle contains whitespace.")]
	ContainsWhitespace,
	/// The handle exceeded the allowed character count.
	#[error("Driver handle exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Validated, case-sensitive driver name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DriverHandle(String);
impl DriverHandle {
	/// Creates a new handle after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, HandleError> {
		let view = value.as_ref();

		validate_handle(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for DriverHandle {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for DriverHandle {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for DriverHandle {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<DriverHandle> for String {
	fn from(value: DriverHandle) -> Self {
		value.0
	}
}
impl TryFrom<String> for DriverHandle {
	type Error = HandleError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_handle(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for DriverHandle {
	type Err = HandleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for DriverHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "DriverHandle({})", self.0)
	}
}
impl Display for DriverHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Drivers bundled with the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeDriver {
	/// Slovenská sporiteľňa SporoPay.
	SporoPay,
	/// Tatra banka CardPay.
	CardPay,
	/// Tatra banka TatraPay.
	TatraPay,
	/// TrustPay.
	TrustPay,
	/// VÚB ePlatby.
	EPlatby,
	/// VÚB eCard.
	ECard,
	/// PayPal Payments Standard.
	PayPal,
	/// GP webpay.
	GpWebpay,
	/// Poštová banka iTerminal.
	ITerminal,
	/// Home Credit.
	HomeCredit,
}
impl NativeDriver {
	/// Every bundled driver, in listing order.
	pub const ALL: [NativeDriver; 10] = [
		NativeDriver::SporoPay,
		NativeDriver::CardPay,
		NativeDriver::TatraPay,
		NativeDriver::TrustPay,
		NativeDriver::EPlatby,
		NativeDriver::ECard,
		NativeDriver::PayPal,
		NativeDriver::GpWebpay,
		NativeDriver::ITerminal,
		NativeDriver::HomeCredit,
	];

	/// Looks up a bundled driver by its exact handle.
	pub fn from_handle(handle: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|native| native.handle() == handle)
	}

	/// Handle the driver is selected with.
	pub const fn handle(self) -> &'static str {
		match self {
			NativeDriver::SporoPay => "sporopay",
			NativeDriver::CardPay => "cardpay",
			NativeDriver::TatraPay => "tatrapay",
			NativeDriver::TrustPay => "trustpay",
			NativeDriver::EPlatby => "eplatby",
			NativeDriver::ECard => "ecard",
			NativeDriver::PayPal => "paypal",
			NativeDriver::GpWebpay => "gpwebpay",
			NativeDriver::ITerminal => "iterminal",
			NativeDriver::HomeCredit => HOME_CREDIT,
		}
	}

	/// Implementation name reported by the facade.
	pub const fn implementation(self) -> &'static str {
		match self {
			NativeDriver::SporoPay => "SLSPSporoPay",
			NativeDriver::CardPay => "TBCardPay",
			NativeDriver::TatraPay => "TBTatraPay",
			NativeDriver::TrustPay => "TrustPay",
			NativeDriver::EPlatby => "VUBePlatby",
			NativeDriver::ECard => "VUBeCard",
			NativeDriver::PayPal => "PayPal",
			NativeDriver::GpWebpay => "GPwebpay",
			NativeDriver::ITerminal => "PBiTerminal",
			NativeDriver::HomeCredit => "HomeCredit",
		}
	}

	/// Static descriptor of table-driven drivers.
	pub fn descriptor(self) -> Option<&'static GatewayDescriptor> {
		match self {
			NativeDriver::SporoPay => Some(&SPOROPAY),
			NativeDriver::CardPay => Some(&CARDPAY),
			NativeDriver::TatraPay => Some(&TATRAPAY),
			NativeDriver::TrustPay => Some(&TRUSTPAY),
			NativeDriver::EPlatby => Some(&EPLATBY),
			NativeDriver::ECard => Some(&ECARD),
			NativeDriver::PayPal => Some(&PAYPAL),
			NativeDriver::GpWebpay => Some(&GP_WEBPAY),
			NativeDriver::ITerminal => Some(&ITERMINAL),
			NativeDriver::HomeCredit => None,
		}
	}

	/// Constructs the driver.
	pub fn build(self, context: DriverContext) -> Result<Box<dyn Driver>> {
		if let Some(descriptor) = self.descriptor() {
			return Ok(Box::new(GatewayDriver::new(descriptor, context.message)?));
		}

		let client = match context.http_client {
			Some(client) => client,
			None => default_http_client()?,
		};

		Ok(Box::new(HomeCreditDriver::new(context.message, client.as_ref())?))
	}
}

#[cfg(feature = "reqwest")]
fn default_http_client() -> Result<Arc<dyn AccessTokenClient>> {
	Ok(Arc::new(ReqwestHttpClient::try_new()?))
}

#[cfg(not(feature = "reqwest"))]
fn default_http_client() -> Result<Arc<dyn AccessTokenClient>> {
	Err(OptionsError::MissingHttpClient { driver: HOME_CREDIT.to_owned() }.into())
}

/// Everything a factory needs to construct a driver.
#[derive(Clone)]
pub struct DriverContext {
	/// Handle the driver was selected with.
	pub handle: DriverHandle,
	/// Credentials and options.
	pub message: MessageContext,
	/// HTTP collaborator for drivers that authenticate with tokens.
	pub http_client: Option<Arc<dyn AccessTokenClient>>,
}
impl Debug for DriverContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DriverContext")
			.field("handle", &self.handle)
			.field("message", &self.message)
			.field("http_client", &self.http_client.is_some())
			.finish()
	}
}

/// Constructs drivers registered under an external handle.
///
/// Closures `Fn(DriverContext) -> Result<Box<dyn Driver>>` implement the trait directly.
pub trait DriverFactory
where
	Self: Send + Sync,
{
	/// Constructs a driver for the provided context.
	fn build(&self, context: DriverContext) -> Result<Box<dyn Driver>>;

	/// Implementation name reported by the facade.
	fn implementation(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}
impl<F> DriverFactory for F
where
	F: Fn(DriverContext) -> Result<Box<dyn Driver>> + Send + Sync,
{
	fn build(&self, context: DriverContext) -> Result<Box<dyn Driver>> {
		self(context)
	}
}

/// Outcome of handle resolution.
#[derive(Clone)]
pub enum ResolvedDriver {
	/// Bundled driver.
	Native(NativeDriver),
	/// Externally registered factory.
	External(Arc<dyn DriverFactory>),
}
impl ResolvedDriver {
	/// Implementation name reported by the facade.
	pub fn implementation(&self) -> &'static str {
		match self {
			ResolvedDriver::Native(native) => native.implementation(),
			ResolvedDriver::External(factory) => factory.implementation(),
		}
	}

	/// Constructs the driver.
	pub fn build(&self, context: DriverContext) -> Result<Box<dyn Driver>> {
		match self {
			ResolvedDriver::Native(native) => native.build(context),
			ResolvedDriver::External(factory) => factory.build(context),
		}
	}
}
impl Debug for ResolvedDriver {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			ResolvedDriver::Native(native) => f.debug_tuple("Native").field(native).finish(),
			ResolvedDriver::External(factory) =>
				f.debug_tuple("External").field(&factory.implementation()).finish(),
		}
	}
}

type FactoryMap = Arc<RwLock<HashMap<String, Arc<dyn DriverFactory>>>>;

/// Thread-safe map from handle to external driver factory.
///
/// Clones share the same map. [`DriverRegistry::global`] is the process-wide instance used by
/// [`crate::Chaching::new`]; tests and embedders can build isolated registries instead.
#[derive(Clone, Default)]
pub struct DriverRegistry(FactoryMap);
impl DriverRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Process-wide registry.
	pub fn global() -> &'static DriverRegistry {
		&GLOBAL
	}

	/// Registers `factory` under `handle`, replacing any earlier external registration.
	///
	/// Registering under a native handle succeeds, but the native driver keeps priority.
	pub fn support_driver<F>(&self, factory: F, handle: &str) -> Result<DriverHandle>
	where
		F: 'static + DriverFactory,
	{
		let handle = DriverHandle::new(handle).map_err(RegistrationError::from)?;

		if NativeDriver::from_handle(&handle).is_some() {
			obs::warn_shadowed_registration(&handle);
		}

		self.0.write().insert(handle.to_string(), Arc::new(factory));

		Ok(handle)
	}

	/// Removes an external registration, returning whether one existed.
	pub fn unregister(&self, handle: &str) -> bool {
		self.0.write().remove(handle).is_some()
	}

	/// Returns the external factory registered under `handle`.
	pub fn external(&self, handle: &str) -> Option<Arc<dyn DriverFactory>> {
		self.0.read().get(handle).cloned()
	}

	/// Externally registered handles, sorted.
	pub fn handles(&self) -> Vec<String> {
		let mut handles = self.0.read().keys().cloned().collect::<Vec<_>>();

		handles.sort();

		handles
	}

	/// Resolves `handle` against the native table, then the external registrations.
	pub fn resolve(&self, handle: &DriverHandle) -> Result<ResolvedDriver, OptionsError> {
		if let Some(native) = NativeDriver::from_handle(handle) {
			return Ok(ResolvedDriver::Native(native));
		}

		self.external(handle).map(ResolvedDriver::External).ok_or_else(|| {
			OptionsError::UnknownDriver {
				handle: handle.to_string(),
				valid: NativeDriver::ALL.map(NativeDriver::handle).join("', '"),
			}
		})
	}
}
impl Debug for DriverRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("DriverRegistry").field(&self.handles()).finish()
	}
}

fn validate_handle(view: &str) -> Result<(), HandleError> {
	if view.is_empty() {
		return Err(HandleError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(HandleError::ContainsWhitespace);
	}
	if view.len() > HANDLE_MAX_LEN {
		return Err(HandleError::TooLong { max: HANDLE_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::message::{Authorization, Options};

	fn context(handle: &str) -> DriverContext {
		DriverContext {
			handle: DriverHandle::new(handle).expect("Fixture handle should be valid."),
			message: MessageContext::new(Authorization::new(["1", "2"]), Options::sandbox()),
			http_client: None,
		}
	}

	#[test]
	fn handles_are_validated() {
		assert_eq!(DriverHandle::new(""), Err(HandleError::Empty));
		assert_eq!(DriverHandle::new("card pay"), Err(HandleError::ContainsWhitespace));
		assert_eq!(DriverHandle::new("x".repeat(65)), Err(HandleError::TooLong { max: 64 }));
		assert_eq!(DriverHandle::new("cardpay").map(String::from), Ok("cardpay".to_owned()));
	}

	#[test]
	fn native_table_is_consistent() {
		for native in NativeDriver::ALL {
			assert_eq!(NativeDriver::from_handle(native.handle()), Some(native));

			if let Some(descriptor) = native.descriptor() {
				let signed = descriptor.request_signature.is_some()
					|| descriptor.response_signature.is_some();

				assert_eq!(descriptor.handle, native.handle());
				assert_eq!(signed, descriptor.secret.is_some(), "{}", native.handle());
			}
		}

		assert_eq!(NativeDriver::HomeCredit.handle(), "homecredit");
		assert_eq!(NativeDriver::GpWebpay.handle(), "gpwebpay");
		assert!(NativeDriver::from_handle("CardPay").is_none(), "Handles are case-sensitive.");
	}

	#[test]
	fn unknown_handles_list_native_drivers() {
		let registry = DriverRegistry::new();
		let err = registry
			.resolve(&DriverHandle::new("doesnotexist").expect("Fixture handle should be valid."))
			.expect_err("Unknown handles must be rejected.");
		let message = err.to_string();

		assert!(message.starts_with(
			"Invalid driver 'doesnotexist' in use. Valid drivers are 'sporopay', 'cardpay'"
		));
		assert!(message.ends_with("'homecredit'."));
	}

	#[test]
	fn native_handles_are_never_shadowed() {
		let registry = DriverRegistry::new();

		registry
			.support_driver(
				|_: DriverContext| -> Result<Box<dyn Driver>> {
					Err(Error::not_implemented("build"))
				},
				"paypal",
			)
			.expect("Registration under a native handle is accepted.");

		let resolved = registry
			.resolve(&DriverHandle::new("paypal").expect("Fixture handle should be valid."))
			.expect("Native handles always resolve.");

		assert!(matches!(resolved, ResolvedDriver::Native(NativeDriver::PayPal)));
		assert_eq!(resolved.implementation(), "PayPal");
		assert!(resolved.build(context("paypal")).is_ok());
		assert_eq!(registry.handles(), vec!["paypal".to_owned()]);
	}

	#[test]
	fn registration_rejects_malformed_handles_and_supports_removal() {
		let registry = DriverRegistry::new();
		let factory = |_: DriverContext| -> Result<Box<dyn Driver>> {
			Err(Error::not_implemented("build"))
		};

		assert!(matches!(
			registry.support_driver(factory, " "),
			Err(Error::Registration(RegistrationError::InvalidHandle(
				HandleError::ContainsWhitespace
			)))
		));

		registry.support_driver(factory, "acme").expect("Valid handles should register.");

		assert!(registry.external("acme").is_some());
		assert!(registry.unregister("acme"));
		assert!(!registry.unregister("acme"));
	}
}
