//! High-level flows powered by the [`Authority`] facade.

pub mod common;
pub mod introspect;
pub mod login;
pub mod password;
pub mod profile;
pub mod revoke;

pub use introspect::*;
pub use login::*;
pub use password::*;
pub use revoke::*;

// self
use crate::{_prelude::*, codec::TokenCodec, config::AuthConfig, store::CredentialStore};

/// Issues, introspects, and revokes bearer tokens over a single credential store.
///
/// The authority owns the store handle, the parsed key pair, and the validated
/// configuration so individual flows only carry request-specific logic. Cloning is cheap;
/// every field sits behind an [`Arc`].
#[derive(Clone)]
pub struct Authority {
	/// Store that resolves clients, users, and token records.
	pub store: Arc<dyn CredentialStore>,
	/// RS256 signer/verifier built from the configured key pair.
	pub codec: Arc<TokenCodec>,
	/// Validated configuration.
	pub config: Arc<AuthConfig>,
}
impl Authority {
	/// Parses the configured key pair and assembles the authority.
	pub fn new(store: Arc<dyn CredentialStore>, config: AuthConfig) -> Result<Self> {
		let codec = TokenCodec::from_pem(&config.private_key, &config.public_key)?;

		Ok(Self { store, codec: Arc::new(codec), config: Arc::new(config) })
	}
}
impl Debug for Authority {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authority")
			.field("codec", &self.codec)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
