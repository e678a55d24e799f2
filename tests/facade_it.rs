mod common;

// std
use std::{sync::Arc, thread};
// crates.io
use chaching::{
	Chaching, Error,
	error::OptionsError,
	message::{Authorization, Environment, PaymentStatus},
	registry::{DriverHandle, DriverRegistry, ResolvedDriver},
	signature::{KeyEncoding, OutputEncoding, SignatureEngine},
};
// self
use common::*;

fn no_arguments() -> Vec<(String, String)> {
	Vec::new()
}

#[test]
fn every_native_driver_constructs() {
	for handle in Chaching::native_drivers() {
		let chaching = Chaching::builder(handle)
			.authorization(native_authorization(handle))
			.option("environment", "sandbox")
			.http_client(Arc::new(StaticTokenClient("native")))
			.registry(DriverRegistry::new())
			.build()
			.unwrap_or_else(|e| panic!("Native driver {handle} should construct: {e}."));

		assert_eq!(chaching.handle().to_string(), handle);
		assert_eq!(chaching.environment(), Environment::Sandbox);
		assert!(matches!(chaching.base_url().scheme(), "https"));
	}
}

#[test]
fn unknown_handles_are_rejected_with_the_native_list() {
	let err = Chaching::new("doesnotexist", Authorization::default(), no_arguments())
		.expect_err("Unknown handles must be rejected.");

	match &err {
		Error::InvalidOptions(OptionsError::UnknownDriver { handle, valid }) => {
			assert_eq!(handle, "doesnotexist");

			for native in Chaching::native_drivers() {
				assert!(valid.contains(native), "{native} should be listed as valid.");
			}
		},
		other => panic!("Unexpected error: {other:?}."),
	}
	assert!(err.to_string().starts_with("Invalid driver 'doesnotexist' in use."));
}

#[test]
fn external_drivers_register_globally() {
	Chaching::support_driver(EchoFactory("AcmePay"), "acme-global")
		.expect("External driver should register.");

	let chaching =
		Chaching::new("acme-global", Authorization::default(), [("environment", "sandbox")])
			.expect("Registered external driver should construct.");
	let request = chaching
		.request([("amount", "1.00"), ("reference", "A-1")])
		.expect("Echo driver should build requests.");

	assert_eq!(chaching.implementation(), "AcmePay");
	assert_eq!(request.field("reference"), Some("A-1"));
	assert!(matches!(
		Chaching::support_driver(EchoFactory("Broken"), "has space"),
		Err(Error::Registration(_))
	));
}

#[test]
fn native_handles_win_over_external_registrations() {
	Chaching::support_driver(EchoFactory("Impostor"), "cardpay")
		.expect("Registration under a native handle is accepted.");

	let chaching = sandbox("cardpay").expect("CardPay should construct.");

	assert_eq!(chaching.implementation(), "TBCardPay");
}

#[test]
fn concurrent_registrations_leave_exactly_one_winner() {
	let registry = DriverRegistry::new();
	let workers = ["First", "Second"].map(|name| {
		let registry = registry.clone();

		thread::spawn(move || registry.support_driver(EchoFactory(name), "racy").map(|_| ()))
	});

	for worker in workers {
		worker.join().expect("Worker should not panic.").expect("Registration should succeed.");
	}

	let resolved = registry
		.resolve(&DriverHandle::new("racy").expect("Fixture handle should be valid."))
		.expect("Registered handle should resolve.");

	assert_eq!(registry.handles(), vec!["racy".to_owned()]);
	assert!(matches!(&resolved, ResolvedDriver::External(_)));
	assert!(["First", "Second"].contains(&resolved.implementation()));
}

#[test]
fn requests_are_memoized_per_instance() {
	let chaching = sandbox("tatrapay").expect("TatraPay should construct.");
	let first = chaching.request(tatrapay_attributes("111")).expect("First request should build.");
	let second =
		chaching.request(tatrapay_attributes("222")).expect("Cached request should return.");

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(second.field("VS"), Some("111"));

	let fresh = sandbox("tatrapay")
		.expect("TatraPay should construct.")
		.request(tatrapay_attributes("222"))
		.expect("New instances build new requests.");

	assert_eq!(fresh.field("VS"), Some("222"));
}

#[test]
fn call_dispatches_to_facade_then_driver() {
	let chaching = sandbox("tatrapay").expect("TatraPay should construct.");

	assert_eq!(
		chaching.call("implementation", no_arguments()).expect("Facade operation."),
		"TBTatraPay"
	);
	assert_eq!(
		chaching.call("request_signing_fields", no_arguments()).expect("Driver operation."),
		serde_json::json!(["MID", "AMT", "CURR", "VS", "RURL", "TIMESTAMP"])
	);

	let err = chaching.call("refund", no_arguments()).expect_err("Unknown operations must fail.");

	assert_eq!(err.to_string(), "Method refund not implemented in driver.");
}

#[test]
fn paypal_sandbox_uses_the_sandbox_endpoint() {
	let chaching = sandbox("paypal").expect("PayPal should construct.");

	assert_eq!(chaching.base_url().as_str(), "https://www.sandbox.paypal.com/cgi-bin/webscr");
	assert_eq!(
		chaching.call("base_url", no_arguments()).expect("Facade operation."),
		"https://www.sandbox.paypal.com/cgi-bin/webscr"
	);
}

#[test]
fn invalid_options_fail_construction() {
	assert!(matches!(
		Chaching::new("paypal", native_authorization("paypal"), [("environment", "staging")]),
		Err(Error::InvalidOptions(OptionsError::InvalidEnvironment { .. }))
	));
	assert!(matches!(
		Chaching::new("cardpay", Authorization::new(["9999"]), no_arguments()),
		Err(Error::InvalidOptions(OptionsError::MissingCredential { index: 1, .. }))
	));
	assert!(matches!(
		Chaching::new("", Authorization::default(), no_arguments()),
		Err(Error::InvalidOptions(OptionsError::InvalidHandle(_)))
	));
}

#[test]
fn signed_notifications_verify_and_tampering_is_detected() {
	let engine = SignatureEngine::hmac_sha256()
		.key_encoding(KeyEncoding::Hex)
		.output(OutputEncoding::HexLower);
	let values = ["12.50", "978", "111", "OK", "AC1", "TID9", "01092024101500"];
	let signature = engine.sign(&values, TATRA_KEY).expect("Reference signature should compute.");
	let foreign = engine.sign(&values, "0badc0de").expect("Foreign signature should compute.");
	let notification = |amount: &'static str, signature: &str| {
		vec![
			("AMT", amount.to_owned()),
			("CURR", "978".to_owned()),
			("VS", "111".to_owned()),
			("RES", "OK".to_owned()),
			("AC", "AC1".to_owned()),
			("TID", "TID9".to_owned()),
			("TIMESTAMP", "01092024101500".to_owned()),
			("HMAC", signature.to_owned()),
		]
	};
	let chaching = || sandbox("cardpay").expect("CardPay should construct.");
	let response = chaching()
		.response(notification("12.50", &signature))
		.expect("Genuine notification should verify.");

	assert_eq!(response.status, PaymentStatus::Success);
	assert_eq!(response.transaction_id.as_deref(), Some("TID9"));
	assert!(response.signature_verified);
	assert!(matches!(
		chaching().response(notification("99.99", &signature)),
		Err(Error::SignatureMismatch { driver }) if driver == "cardpay"
	));
	assert!(matches!(
		chaching().response(notification("12.50", &foreign)),
		Err(Error::SignatureMismatch { .. })
	));
}

#[test]
fn version_constants_are_exposed() {
	assert_eq!(Chaching::VERSION, env!("CARGO_PKG_VERSION"));
	assert_eq!(Chaching::EDITION, "basic");
}
