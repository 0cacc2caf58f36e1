//! Argon2 password hashes stored for resource owners.

// crates.io
use argon2::{
	Argon2, PasswordHasher, PasswordVerifier,
	password_hash::{self, SaltString},
};
use rand::Rng;
// self
use crate::_prelude::*;

/// Errors produced while hashing or parsing stored credentials.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// The password could not be hashed.
	#[error("Password hashing failed: {message}.")]
	Hash {
		/// Hasher-supplied message.
		message: String,
	},
	/// The stored value is not a PHC-formatted hash.
	#[error("Stored password hash is malformed: {message}.")]
	Malformed {
		/// Parser-supplied message.
		message: String,
	},
}

/// PHC-formatted argon2 hash of a user password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);
impl PasswordHash {
	const SALT_LEN: usize = 16;

	/// Hashes `password` with the default argon2id parameters.
	pub fn new(password: &str) -> Result<Self, CredentialError> {
		Self::with_hasher(&Argon2::default(), password)
	}

	/// Hashes `password` with a caller-provided argon2 instance.
	pub fn with_hasher(hasher: &Argon2<'_>, password: &str) -> Result<Self, CredentialError> {
		let mut salt = [0_u8; Self::SALT_LEN];

		rand::rng().fill(&mut salt);

		let salt = SaltString::encode_b64(&salt).map_err(hash_error)?;
		let hash = hasher.hash_password(password.as_bytes(), &salt).map_err(hash_error)?;

		Ok(Self(hash.to_string()))
	}

	/// Wraps an existing PHC string after validating its shape.
	pub fn from_phc(value: impl Into<String>) -> Result<Self, CredentialError> {
		let value = value.into();

		password_hash::PasswordHash::new(&value)
			.map_err(|e| CredentialError::Malformed { message: e.to_string() })?;

		Ok(Self(value))
	}

	/// Verifies `password` against the stored hash.
	pub fn verify(&self, password: &str) -> bool {
		match password_hash::PasswordHash::new(&self.0) {
			Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
			Err(_) => false,
		}
	}

	/// Returns the PHC string.
	pub fn as_phc(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for PasswordHash {
	type Error = CredentialError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::from_phc(value)
	}
}
impl From<PasswordHash> for String {
	fn from(value: PasswordHash) -> Self {
		value.0
	}
}
impl Debug for PasswordHash {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("PasswordHash").field(&"<redacted>").finish()
	}
}

fn hash_error(e: password_hash::Error) -> CredentialError {
	CredentialError::Hash { message: e.to_string() }
}
