mod common;

// std
use std::sync::Arc;
// self
use oauth2_authority::{
	auth::{AccessTokenRecord, Client, User},
	error::Error,
	flows::Authority,
	store::{CredentialStore, StoreError, StoreFuture},
	strategy::{AuthStrategy, BasicCredentials, BasicStrategy, BearerStrategy},
};

// Every operation fails the way an unreachable database would.
struct UnavailableStore;
impl UnavailableStore {
	fn down<'a, T>() -> StoreFuture<'a, T>
	where
		T: 'a + Send,
	{
		Box::pin(async { Err(StoreError::Backend { message: "store unavailable".into() }) })
	}
}
impl CredentialStore for UnavailableStore {
	fn find_client<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<Client>> {
		Self::down()
	}

	fn find_user<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<User>> {
		Self::down()
	}

	fn find_access_token<'a>(&'a self, _: &'a str) -> StoreFuture<'a, Option<AccessTokenRecord>> {
		Self::down()
	}

	fn save_access_token(&self, _: AccessTokenRecord) -> StoreFuture<'_, ()> {
		Self::down()
	}
}

fn unavailable_authority() -> Authority {
	Authority::new(Arc::new(UnavailableStore), common::config())
		.expect("Authority over a failing store should still build.")
}

fn is_storage(result: Result<impl Sized, Error>) -> bool {
	matches!(result, Err(Error::Storage(StoreError::Backend { .. })))
}

#[tokio::test]
async fn issuance_surfaces_store_failures() {
	let authority = unavailable_authority();

	assert!(is_storage(authority.authenticate(&common::password_request("profile")).await));
}

#[tokio::test]
async fn introspection_never_downgrades_store_failures_to_inactive() {
	let (healthy, _) = common::authority();
	let token = common::issue(&healthy, "profile").await;
	let authority = unavailable_authority();
	let err = authority
		.introspect(Some(&token))
		.await
		.expect_err("A verified token whose record cannot be read must not be answered.");

	assert!(err.is_internal());
	assert_eq!(err.status(), 500);
}

#[tokio::test]
async fn strategies_and_logout_surface_store_failures() {
	let (healthy, _) = common::authority();
	let token = common::issue(&healthy, "profile").await;
	let header = format!("Bearer {token}");
	let authority = unavailable_authority();
	let basic = BasicCredentials {
		client_id: common::CLIENT_ID.into(),
		client_secret: common::CLIENT_SECRET.into(),
	}
	.to_header();

	assert!(is_storage(BearerStrategy::new(authority.clone()).authenticate(Some(&header)).await));
	assert!(is_storage(BasicStrategy::new(authority.clone()).authenticate(Some(&basic)).await));
	assert!(is_storage(authority.logout(Some(&header), None).await));
}
