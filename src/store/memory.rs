//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRecord, Client, ClientId, User, Username},
	store::{CredentialStore, StoreFuture, TokenDigest},
};

#[derive(Debug, Default)]
struct Tables {
	clients: HashMap<ClientId, Client>,
	users: HashMap<Username, User>,
	tokens: HashMap<TokenDigest, AccessTokenRecord>,
}

/// Thread-safe storage backend that keeps everything in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Tables>>);
impl MemoryStore {
	/// Provisions (or replaces) a client.
	pub fn insert_client(&self, client: Client) {
		self.0.write().clients.insert(client.client_id.clone(), client);
	}

	/// Provisions (or replaces) a user.
	pub fn insert_user(&self, user: User) {
		self.0.write().users.insert(user.name.clone(), user);
	}

	/// Flips the enabled flag of an existing user. Returns `false` if the user is unknown.
	pub fn set_user_enabled(&self, username: &str, enabled: bool) -> bool {
		match self.0.write().users.get_mut(username) {
			Some(user) => {
				user.enabled = enabled;

				true
			},
			None => false,
		}
	}

	/// Number of persisted token records.
	pub fn token_count(&self) -> usize {
		self.0.read().tokens.len()
	}
}
impl CredentialStore for MemoryStore {
	fn find_client<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>> {
		Box::pin(async move { Ok(self.0.read().clients.get(client_id).cloned()) })
	}

	fn find_user<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<User>> {
		Box::pin(async move { Ok(self.0.read().users.get(username).cloned()) })
	}

	fn find_access_token<'a>(
		&'a self,
		access_token: &'a str,
	) -> StoreFuture<'a, Option<AccessTokenRecord>> {
		let key = TokenDigest::of(access_token);

		Box::pin(async move { Ok(self.0.read().tokens.get(&key).cloned()) })
	}

	fn save_access_token(&self, record: AccessTokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.0.write().tokens.insert(TokenDigest::of_record(&record), record);

			Ok(())
		})
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			let mut guard = self.0.write();
			let before = guard.tokens.len();

			guard.tokens.retain(|_, record| !record.is_purgeable_at(now));

			Ok(before - guard.tokens.len())
		})
	}
}
