//! Walks a password grant end to end over the in-memory store: issue a token, resolve it
//! through the bearer strategy, introspect it, log out, and introspect again.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use oauth2_authority::{
	auth::{Client, PasswordHash, ScopeSet, User},
	config::AuthConfig,
	flows::{Authority, TokenRequest},
	store::{CredentialStore, MemoryStore},
	strategy::{AuthStrategy, BearerStrategy},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let backend = Arc::new(MemoryStore::default());

	backend.insert_client(Client::new("demo-client", "demo-secret", ScopeSet::new(["profile"])?)?);
	backend.insert_user(
		User::new(1, "alexis.rees@example.com", PasswordHash::new("secret")?)?
			.with_description("Alexis Rees"),
	);

	let store: Arc<dyn CredentialStore> = backend;
	let config = AuthConfig::builder()
		.private_key_pem(include_str!("../tests/fixtures/rsa_private.pem"))
		.public_key_pem(include_str!("../tests/fixtures/rsa_public.pem"))
		.timeout_minutes(15)
		.build()?;
	let authority = Authority::new(store, config)?;
	let envelope = authority
		.authenticate(&TokenRequest::password(
			"demo-client",
			"demo-secret",
			"alexis.rees@example.com",
			"secret",
			"profile",
		))
		.await?;

	println!("Issued token expiring in {}s for scope `{}`.", envelope.expires_in, envelope.scope);

	let header = format!("Bearer {}", envelope.access_token.expose());
	let identity = BearerStrategy::new(authority.clone()).authenticate(Some(&header)).await?;

	println!("Bearer identity: {}", serde_json::to_string_pretty(&identity)?);

	let before = authority.introspect(Some(envelope.access_token.expose())).await?;

	println!("Active before logout: {}", before.active);

	authority.logout(Some(&header), None).await?;

	let after = authority.introspect(Some(envelope.access_token.expose())).await?;

	println!("Active after logout: {}", after.active);

	Ok(())
}
