//! Multi-provider payment gateway integration: build signed payment requests and verify
//! asynchronous gateway notifications through one driver facade.
//!
//! ```no_run
//! use chaching::{Chaching, message::Authorization};
//!
//! let chaching = Chaching::new(
//! 	"tatrapay",
//! 	Authorization::new(["9999", "31323334353637383930313233343536"]),
//! 	[("environment", "sandbox")],
//! )?;
//! let request = chaching.request([
//! 	("amount", "12.50"),
//! 	("currency", "EUR"),
//! 	("reference", "1234567890"),
//! 	("return_url", "https://shop.example.com/return"),
//! ])?;
//!
//! if let Some(url) = request.redirect_url() {
//! 	println!("{url}");
//! }
//! # Ok::<(), chaching::Error>(())
//! ```

#![deny(clippy::all, unused_crate_dependencies)]
#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod facade;
pub mod http;
pub mod message;
pub mod obs;
pub mod registry;
pub mod signature;

pub use error::{Error, Result};
pub use facade::*;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::blocking::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
