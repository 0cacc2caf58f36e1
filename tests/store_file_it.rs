mod common;

// std
use std::{env, fs, path::PathBuf, process, sync::Arc};
// crates.io
use time::OffsetDateTime;
// self
use oauth2_authority::{
	flows::Authority,
	store::{CredentialStore, FileStore},
};

fn temp_path() -> PathBuf {
	let unique = format!(
		"oauth2_authority_file_store_it_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}

#[tokio::test]
async fn revocation_survives_a_restart() {
	let path = temp_path();
	let store = FileStore::open(&path).expect("Store should open.");

	store.insert_client(common::client()).expect("Client should persist.");
	store
		.insert_user(common::user(1, common::USERNAME, common::PASSWORD))
		.expect("User should persist.");

	let authority = Authority::new(Arc::new(store), common::config()).expect("Authority builds.");
	let token = common::issue(&authority, "profile").await;

	authority.logout(Some(&format!("Bearer {token}")), None).await.expect("Logout succeeds.");
	drop(authority);

	let reopened: Arc<dyn CredentialStore> =
		Arc::new(FileStore::open(&path).expect("Store should reopen."));
	let authority = Authority::new(reopened, common::config()).expect("Authority rebuilds.");

	assert!(!authority.introspect(Some(&token)).await.expect("Introspection runs.").active);

	let fresh = common::issue(&authority, "profile").await;

	assert!(authority.introspect(Some(&fresh)).await.expect("Introspection runs.").active);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
	});
}
