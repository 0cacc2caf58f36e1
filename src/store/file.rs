//! Simple file-backed [`CredentialStore`] for lightweight deployments and fixtures.

// std
use std::{
	fs::{self, File},
	io::Write,
};
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRecord, Client, ClientId, User, Username},
	store::{CredentialStore, StoreError, StoreFuture, TokenDigest},
};

#[derive(Clone, Debug, Default)]
struct Tables {
	clients: HashMap<ClientId, Client>,
	users: HashMap<Username, User>,
	tokens: HashMap<TokenDigest, AccessTokenRecord>,
}

// On-disk layout; token records are keyed by digest so raw tokens never appear as keys.
#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
	#[serde(default)]
	clients: Vec<Client>,
	#[serde(default)]
	users: Vec<User>,
	#[serde(default)]
	tokens: Vec<(TokenDigest, AccessTokenRecord)>,
}

/// Persists clients, users, and token records to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Tables>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let tables = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(tables)) })
	}

	/// Provisions (or replaces) a client and persists the snapshot.
	pub fn insert_client(&self, client: Client) -> Result<(), StoreError> {
		self.mutate(|tables| {
			tables.clients.insert(client.client_id.clone(), client);

			true
		})
		.map(drop)
	}

	/// Provisions (or replaces) a user and persists the snapshot.
	pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
		self.mutate(|tables| {
			tables.users.insert(user.name.clone(), user);

			true
		})
		.map(drop)
	}

	/// Flips the enabled flag of an existing user. Returns `Ok(false)` if the user is unknown.
	pub fn set_user_enabled(&self, username: &str, enabled: bool) -> Result<bool, StoreError> {
		self.mutate(|tables| match tables.users.get_mut(username) {
			Some(user) => {
				user.enabled = enabled;

				true
			},
			None => false,
		})
	}

	/// Applies `f` to a copy of the tables and, when it reports a change, persists the copy
	/// before swapping it in. A failed write leaves memory matching disk.
	fn mutate<F>(&self, f: F) -> Result<bool, StoreError>
	where
		F: FnOnce(&mut Tables) -> bool,
	{
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		if !f(&mut next) {
			return Ok(false);
		}

		self.persist(&next)?;
		*guard = next;

		Ok(true)
	}

	fn load_snapshot(path: &Path) -> Result<Tables, StoreError> {
		if !path.exists() {
			return Ok(Tables::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(Tables::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let snapshot: Snapshot =
			serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {} at {}: {}", path.display(), e.path(), e.inner()),
			})?;

		Ok(Tables {
			clients: snapshot.clients.into_iter().map(|c| (c.client_id.clone(), c)).collect(),
			users: snapshot.users.into_iter().map(|u| (u.name.clone(), u)).collect(),
			tokens: snapshot.tokens.into_iter().collect(),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut snapshot = Snapshot {
			clients: tables.clients.values().cloned().collect(),
			users: tables.users.values().cloned().collect(),
			tokens: tables.tokens.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
		};

		// Stable ordering keeps diffs of the snapshot readable.
		snapshot.clients.sort_by(|a, b| a.client_id.cmp(&b.client_id));
		snapshot.users.sort_by_key(|u| u.id);
		snapshot.tokens.sort_by(|a, b| a.0.cmp(&b.0));

		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn find_client<'a>(&'a self, client_id: &'a str) -> StoreFuture<'a, Option<Client>> {
		Box::pin(async move { Ok(self.inner.read().clients.get(client_id).cloned()) })
	}

	fn find_user<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<User>> {
		Box::pin(async move { Ok(self.inner.read().users.get(username).cloned()) })
	}

	fn find_access_token<'a>(
		&'a self,
		access_token: &'a str,
	) -> StoreFuture<'a, Option<AccessTokenRecord>> {
		Box::pin(async move {
			let key = TokenDigest::of(access_token);

			Ok(self.inner.read().tokens.get(&key).cloned())
		})
	}

	fn save_access_token(&self, record: AccessTokenRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.mutate(|tables| {
				tables.tokens.insert(TokenDigest::of_record(&record), record);

				true
			})?;

			Ok(())
		})
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			let mut removed = 0;

			self.mutate(|tables| {
				let before = tables.tokens.len();

				tables.tokens.retain(|_, record| !record.is_purgeable_at(now));
				removed = before - tables.tokens.len();

				removed > 0
			})?;

			Ok(removed)
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::_preludet::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"oauth2_authority_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let record = AccessTokenRecord::builder("access-token")
			.expires(OffsetDateTime::now_utc() + Duration::hours(1))
			.scope("profile")
			.build()
			.expect("Failed to build file-store test record.");

		store.insert_client(test_client()).expect("Failed to persist fixture client.");
		store
			.insert_user(test_user(1, TEST_USERNAME, TEST_PASSWORD))
			.expect("Failed to persist fixture user.");
		rt.block_on(store.save_access_token(record.clone()))
			.expect("Failed to save fixture record to file store.");
		assert!(store.set_user_enabled(TEST_USERNAME, false).expect("Update should persist."));
		drop(store);

		let raw = fs::read_to_string(&path).expect("Snapshot should be readable.");

		assert!(!raw.contains("\"access-token\":"), "Raw tokens must not be used as keys.");

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.find_access_token("access-token"))
			.expect("Failed to fetch fixture record from file store.")
			.expect("File store lost record after reopen.");
		let user = rt
			.block_on(reopened.find_user(TEST_USERNAME))
			.expect("Failed to fetch fixture user.")
			.expect("File store lost user after reopen.");

		assert_eq!(fetched.access_token.expose(), record.access_token.expose());
		assert_eq!(fetched.expires, record.expires);
		assert!(!user.enabled);
		assert!(user.password.verify(TEST_PASSWORD));
		assert!(
			rt.block_on(reopened.find_client(TEST_CLIENT_ID))
				.expect("Failed to fetch fixture client.")
				.is_some()
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn purge_persists_only_when_something_expired() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let now = OffsetDateTime::now_utc();
		let stale = AccessTokenRecord::builder("stale-token")
			.issued_at(now - Duration::hours(2))
			.expires(now - Duration::hours(1))
			.build()
			.expect("Failed to build stale record.");

		rt.block_on(store.save_access_token(stale)).expect("Failed to save stale record.");

		assert_eq!(rt.block_on(store.purge_expired(now)).expect("Purge should succeed."), 1);
		assert_eq!(rt.block_on(store.purge_expired(now)).expect("Purge should succeed."), 0);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert!(
			rt.block_on(reopened.find_access_token("stale-token"))
				.expect("Lookup should succeed.")
				.is_none()
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn failed_writes_leave_memory_unchanged() {
		let dir = temp_path();
		let path = dir.join("store.json");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");

		store.insert_user(test_user(1, TEST_USERNAME, TEST_PASSWORD)).expect("Seed should persist.");
		// Occupying the temp path with a directory makes the next write fail.
		fs::create_dir_all(path.with_extension("tmp")).expect("Failed to block temp path.");

		assert!(store.set_user_enabled(TEST_USERNAME, false).is_err());
		assert!(store.inner.read().users[TEST_USERNAME].enabled);

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn corrupt_snapshots_are_reported() {
		let path = temp_path();

		fs::write(&path, br#"{"clients":[{"client_id":""}]}"#).expect("Failed to seed snapshot.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot must be rejected.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
