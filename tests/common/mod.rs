//! Fixtures shared by the integration suites.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use argon2::{Algorithm, Argon2, Params, Version};
use time::OffsetDateTime;
// self
use oauth2_authority::{
	auth::{Client, PasswordHash, ScopeSet, TokenEnvelope, User},
	config::AuthConfig,
	flows::{Authority, TokenRequest},
	store::{CredentialStore, MemoryStore},
};

pub const PRIVATE_KEY: &str = include_str!("../fixtures/rsa_private.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/rsa_public.pem");
pub const ROGUE_PRIVATE_KEY: &str = include_str!("../fixtures/rogue_private.pem");
pub const CLIENT_ID: &str = "C1";
pub const CLIENT_SECRET: &str = "S1";
pub const USERNAME: &str = "alexis.rees@example.com";
pub const PASSWORD: &str = "secret";

pub fn password_hash(password: &str) -> PasswordHash {
	let params = Params::new(1024, 1, 1, None).expect("Fixture argon2 params should be valid.");
	let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

	PasswordHash::with_hasher(&hasher, password).expect("Fixture password should hash.")
}

pub fn client() -> Client {
	Client::new(
		CLIENT_ID,
		CLIENT_SECRET,
		ScopeSet::new(["profile", "email"]).expect("Fixture scopes should be valid."),
	)
	.expect("Fixture client should be valid.")
}

pub fn user(id: u64, name: &str, password: &str) -> User {
	User::new(id, name, password_hash(password))
		.expect("Fixture user should be valid.")
		.with_description("Alexis Rees")
}

pub fn config() -> AuthConfig {
	AuthConfig::builder()
		.private_key_pem(PRIVATE_KEY)
		.public_key_pem(PUBLIC_KEY)
		.build()
		.expect("Fixture configuration should build.")
}

pub fn authority() -> (Authority, Arc<MemoryStore>) {
	let backend = Arc::new(MemoryStore::default());

	backend.insert_client(client());
	backend.insert_user(user(1, USERNAME, PASSWORD));

	let store: Arc<dyn CredentialStore> = backend.clone();
	let authority = Authority::new(store, config()).expect("Fixture authority should build.");

	(authority, backend)
}

pub fn password_request(scope: &str) -> TokenRequest {
	TokenRequest::password(CLIENT_ID, CLIENT_SECRET, USERNAME, PASSWORD, scope)
}

pub async fn issue_at(authority: &Authority, scope: &str, now: OffsetDateTime) -> TokenEnvelope {
	authority
		.authenticate_at(&password_request(scope), now)
		.await
		.expect("Fixture issuance should succeed.")
}

pub async fn issue(authority: &Authority, scope: &str) -> String {
	issue_at(authority, scope, OffsetDateTime::now_utc()).await.access_token.expose().to_owned()
}
