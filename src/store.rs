//! Storage contracts and built-in store implementations for clients, users, and token records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRecord, Client, ScopeSet, User},
};

/// Boxed future returned by every [`CredentialStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Query contract the authority consumes.
///
/// Only `find_*` and `save_access_token` are required. The credential and scope checks have
/// default implementations built on top of them that backends may override (e.g. to push the
/// comparison into a database). `purge_expired` defaults to keeping everything.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Looks up a registered client.
	fn find_client<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>>;

	/// Looks up a resource owner by login name.
	fn find_user<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<User>>;

	/// Returns `true` when the user exists and the password verifies.
	fn validate_user_credentials<'a>(
		&'a self,
		username: &'a str,
		password: &'a str,
	) -> StoreFuture<'a, bool> {
		Box::pin(async move {
			Ok(self.find_user(username).await?.is_some_and(|user| user.password.verify(password)))
		})
	}

	/// Returns `true` when every requested scope is allowed for the client.
	fn client_has_scope<'a>(
		&'a self,
		client: &'a Client,
		scope: &'a ScopeSet,
	) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(client.has_scope(scope)) })
	}

	/// Looks up the record persisted for a raw token string.
	fn find_access_token<'a>(
		&'a self,
		access_token: &'a str,
	) -> StoreFuture<'a, Option<AccessTokenRecord>>;

	/// Inserts or replaces the record for `record.access_token`.
	fn save_access_token(&self, record: AccessTokenRecord) -> StoreFuture<'_, ()>;

	/// Drops records whose token is past `exp` at `now` and returns how many were removed.
	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		let _ = now;

		Box::pin(async { Ok(0) })
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Storage key for token records: URL-safe base64 of the SHA-256 digest of the raw token.
///
/// Keeps raw bearer tokens out of index structures and snapshot keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDigest(String);
impl TokenDigest {
	/// Digests a raw token string.
	pub fn of(access_token: &str) -> Self {
		Self(URL_SAFE_NO_PAD.encode(Sha256::digest(access_token.as_bytes())))
	}

	/// Digest of the record's token.
	pub fn of_record(record: &AccessTokenRecord) -> Self {
		Self::of(record.access_token.expose())
	}

	/// Encoded digest.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
