//! Password-grant OAuth 2.0 authority: issue RS256 bearer tokens, introspect and revoke them,
//! and authenticate inbound requests through bearer/basic strategies over any credential store.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod store;
pub mod strategy;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use argon2::{Algorithm, Argon2, Params, Version};
	// self
	use crate::{
		auth::{Client, PasswordHash, ScopeSet, User},
		config::AuthConfig,
		flows::Authority,
		store::{CredentialStore, MemoryStore},
	};

	/// PEM-encoded RSA private key used to sign fixture tokens.
	pub const TEST_PRIVATE_KEY: &str = include_str!("../tests/fixtures/rsa_private.pem");
	/// PEM-encoded public half of [`TEST_PRIVATE_KEY`].
	pub const TEST_PUBLIC_KEY: &str = include_str!("../tests/fixtures/rsa_public.pem");
	/// Unrelated RSA private key used to forge signatures in tests.
	pub const ROGUE_PRIVATE_KEY: &str = include_str!("../tests/fixtures/rogue_private.pem");
	/// Fixture client identifier.
	pub const TEST_CLIENT_ID: &str = "C1";
	/// Fixture client secret.
	pub const TEST_CLIENT_SECRET: &str = "S1";
	/// Fixture username.
	pub const TEST_USERNAME: &str = "alexis.rees@example.com";
	/// Fixture password.
	pub const TEST_PASSWORD: &str = "secret";

	/// Cheap argon2 profile so fixture hashing stays fast in debug builds.
	pub fn test_hasher() -> Argon2<'static> {
		let params = Params::new(1024, 1, 1, None).expect("Fixture argon2 params should be valid.");

		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	/// Hashes a fixture password with [`test_hasher`].
	pub fn test_password_hash(password: &str) -> PasswordHash {
		PasswordHash::with_hasher(&test_hasher(), password)
			.expect("Fixture password should hash successfully.")
	}

	/// Builds the fixture client (`C1`/`S1`, scopes `email profile`).
	pub fn test_client() -> Client {
		Client::new(
			TEST_CLIENT_ID,
			TEST_CLIENT_SECRET,
			ScopeSet::new(["profile", "email"]).expect("Fixture scopes should be valid."),
		)
		.expect("Fixture client should be valid.")
	}

	/// Builds an enabled fixture user.
	pub fn test_user(id: u64, name: &str, password: &str) -> User {
		User::new(id, name, test_password_hash(password))
			.expect("Fixture user should be valid.")
			.with_description(format!("Fixture user {id}"))
	}

	/// Configuration signed with the fixture key pair and the default timeout.
	pub fn test_config() -> AuthConfig {
		AuthConfig::builder()
			.private_key_pem(TEST_PRIVATE_KEY)
			.public_key_pem(TEST_PUBLIC_KEY)
			.build()
			.expect("Fixture configuration should build successfully.")
	}

	/// Constructs an [`Authority`] over a seeded in-memory store.
	pub fn build_test_authority() -> (Authority, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());

		store_backend.insert_client(test_client());
		store_backend.insert_user(test_user(1, TEST_USERNAME, TEST_PASSWORD));

		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let authority =
			Authority::new(store, test_config()).expect("Fixture authority should build.");

		(authority, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use jsonwebtoken;
pub use url;
#[cfg(test)] use color_eyre as _;
