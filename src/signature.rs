//! Signature engine shared by every signing gateway.
//!
//! A gateway signs the values of a provider-mandated, ordered field subset. The values are
//! joined with the gateway's separator and either fed to HMAC-SHA256 keyed with the shared
//! secret, or hashed with SHA-256 after appending the secret (the hash-chain scheme older
//! card gateways use). Verification recomputes the signature and compares in constant time.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
// self
use crate::{_prelude::*, error::OptionsError};

type HmacSha256 = Hmac<Sha256>;

/// MAC or digest computed over the joined fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
	/// HMAC-SHA256 keyed with the decoded secret.
	HmacSha256,
	/// SHA-256 over the joined fields followed by the separator and the decoded secret.
	Sha256Chain,
}

/// How the shared secret is written in the merchant's credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
	/// Secret bytes are the UTF-8 credential itself.
	Raw,
	/// Credential is a hex string.
	Hex,
	/// Credential is standard base64.
	Base64,
}
impl KeyEncoding {
	const fn label(self) -> &'static str {
		match self {
			KeyEncoding::Raw => "raw text",
			KeyEncoding::Hex => "hex",
			KeyEncoding::Base64 => "base64",
		}
	}

	/// Decodes the credential into key bytes.
	pub fn decode(self, secret: &str) -> Result<Vec<u8>, OptionsError> {
		match self {
			KeyEncoding::Raw => Ok(secret.as_bytes().to_vec()),
			KeyEncoding::Hex => hex::decode(secret.trim())
				.map_err(|_| OptionsError::InvalidKey { encoding: self.label() }),
			KeyEncoding::Base64 => BASE64
				.decode(secret.trim())
				.map_err(|_| OptionsError::InvalidKey { encoding: self.label() }),
		}
	}
}

/// Text form of the computed signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputEncoding {
	/// Lowercase hex.
	HexLower,
	/// Uppercase hex.
	HexUpper,
	/// Standard base64.
	Base64,
}
impl OutputEncoding {
	fn encode(self, bytes: &[u8]) -> String {
		match self {
			OutputEncoding::HexLower => hex::encode(bytes),
			OutputEncoding::HexUpper => hex::encode_upper(bytes),
			OutputEncoding::Base64 => BASE64.encode(bytes),
		}
	}

	fn normalize(self, signature: &str) -> String {
		match self {
			OutputEncoding::HexLower | OutputEncoding::HexUpper =>
				signature.trim().to_ascii_lowercase(),
			OutputEncoding::Base64 => signature.trim().to_owned(),
		}
	}
}

/// Deterministic signer: same ordered fields and secret always yield the same signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureEngine {
	/// MAC or digest algorithm.
	pub algorithm: Algorithm,
	/// Encoding of the shared secret.
	pub key_encoding: KeyEncoding,
	/// Encoding of the produced signature.
	pub output: OutputEncoding,
	/// Separator placed between field values.
	pub separator: &'static str,
}
impl SignatureEngine {
	/// HMAC-SHA256 over the plain concatenation, raw key, uppercase hex output.
	pub const fn hmac_sha256() -> Self {
		Self {
			algorithm: Algorithm::HmacSha256,
			key_encoding: KeyEncoding::Raw,
			output: OutputEncoding::HexUpper,
			separator: "",
		}
	}

	/// SHA-256 hash chain over the concatenation, raw key, uppercase hex output.
	pub const fn sha256_chain() -> Self {
		Self {
			algorithm: Algorithm::Sha256Chain,
			key_encoding: KeyEncoding::Raw,
			output: OutputEncoding::HexUpper,
			separator: "",
		}
	}

	/// Overrides the key encoding.
	pub const fn key_encoding(mut self, key_encoding: KeyEncoding) -> Self {
		self.key_encoding = key_encoding;

		self
	}

	/// Overrides the output encoding.
	pub const fn output(mut self, output: OutputEncoding) -> Self {
		self.output = output;

		self
	}

	/// Overrides the field separator.
	pub const fn separator(mut self, separator: &'static str) -> Self {
		self.separator = separator;

		self
	}

	/// Joins field values into the signed message.
	pub fn message<S>(&self, fields: &[S]) -> String
	where
		S: AsRef<str>,
	{
		let mut buf = String::new();

		for (idx, value) in fields.iter().enumerate() {
			if idx > 0 {
				buf.push_str(self.separator);
			}

			buf.push_str(value.as_ref());
		}

		buf
	}

	/// Signs the ordered field values with the shared secret.
	pub fn sign<S>(&self, fields: &[S], secret: &str) -> Result<String, OptionsError>
	where
		S: AsRef<str>,
	{
		let key = self.key_encoding.decode(secret)?;
		let message = self.message(fields);
		let digest = match self.algorithm {
			Algorithm::HmacSha256 => {
				let mut mac = HmacSha256::new_from_slice(&key)
					.map_err(|_| OptionsError::InvalidKey { encoding: self.key_encoding.label() })?;

				mac.update(message.as_bytes());

				mac.finalize().into_bytes().to_vec()
			},
			Algorithm::Sha256Chain => {
				let mut hasher = Sha256::new();

				hasher.update(message.as_bytes());
				hasher.update(self.separator.as_bytes());
				hasher.update(&key);

				hasher.finalize().to_vec()
			},
		};

		Ok(self.output.encode(&digest))
	}

	/// Recomputes the signature and compares it with `received` in constant time.
	///
	/// Hex signatures compare case-insensitively.
	pub fn verify<S>(
		&self,
		received: &str,
		fields: &[S],
		secret: &str,
	) -> Result<bool, OptionsError>
	where
		S: AsRef<str>,
	{
		let expected = self.output.normalize(&self.sign(fields, secret)?);
		let received = self.output.normalize(received);

		Ok(expected.as_bytes().ct_eq(received.as_bytes()).into())
	}
}
