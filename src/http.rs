//! Framework-agnostic endpoint adapter.
//!
//! [`AuthEndpoints`] exposes one handler per route (`POST /token`, `POST /token_info`,
//! `GET /me`, `GET /logout`, `POST /login`). Handlers take raw header values, query strings
//! and body bytes, and return either a typed success value or an [`ErrorResponse`] carrying
//! the HTTP status and an RFC 6749 error body, so any HTTP server can mount them without
//! this crate depending on one.
//!
//! Bodies are read as `application/x-www-form-urlencoded` when the `Content-Type` says so
//! and as JSON otherwise.

// crates.io
use oauth2::{
	StandardErrorResponse,
	basic::{BasicErrorResponse, BasicErrorResponseType},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{TokenEnvelope, UserProfile},
	flows::{Authority, Introspection, LoginRequest, LogoutOutcome, TokenRequest},
	strategy::{AuthStrategy, BasicStrategy, BearerStrategy},
};

/// Error reply: HTTP status plus an RFC 6749 error object.
#[derive(Clone, Debug, Serialize)]
pub struct ErrorResponse {
	/// HTTP status code.
	pub status: u16,
	/// `{ "error": ..., "error_description": ... }` body.
	pub body: BasicErrorResponse,
}
impl From<&Error> for ErrorResponse {
	fn from(error: &Error) -> Self {
		// Infrastructure details stay in the logs.
		let description =
			if error.is_internal() { "Internal server error.".to_owned() } else { error.to_string() };

		Self {
			status: error.status(),
			body: StandardErrorResponse::new(error.oauth_error(), Some(description), None),
		}
	}
}
impl From<Error> for ErrorResponse {
	fn from(error: Error) -> Self {
		Self::from(&error)
	}
}
impl ErrorResponse {
	/// OAuth `error` code of the body.
	pub fn error(&self) -> &BasicErrorResponseType {
		self.body.error()
	}
}

/// Media type of HTML form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body of `POST /token_info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenInfoRequest {
	/// Token to introspect.
	#[serde(default)]
	pub token: Option<String>,
}

/// Route handlers over a shared [`Authority`].
#[derive(Clone, Debug)]
pub struct AuthEndpoints {
	authority: Authority,
	bearer: BearerStrategy,
	basic: BasicStrategy,
}
impl AuthEndpoints {
	/// Wires both strategies to `authority`.
	pub fn new(authority: Authority) -> Self {
		Self {
			bearer: BearerStrategy::new(authority.clone()),
			basic: BasicStrategy::new(authority.clone()),
			authority,
		}
	}

	/// `POST /token` with a password-grant body.
	pub async fn post_token(
		&self,
		content_type: Option<&str>,
		body: &[u8],
	) -> Result<TokenEnvelope, ErrorResponse> {
		let request = parse_body::<TokenRequest>(content_type, body, "token")?;

		Ok(self.authority.authenticate(&request).await?)
	}

	/// `POST /token_info`, gated by client Basic credentials.
	pub async fn post_token_info(
		&self,
		authorization: Option<&str>,
		content_type: Option<&str>,
		body: &[u8],
	) -> Result<Introspection, ErrorResponse> {
		self.basic.authenticate(authorization).await?;

		let request = parse_body::<TokenInfoRequest>(content_type, body, "token info")?;

		Ok(self.authority.introspect(request.token.as_deref()).await?)
	}

	/// `GET /me`, gated by a bearer token.
	pub async fn get_me(&self, authorization: Option<&str>) -> Result<UserProfile, ErrorResponse> {
		let identity = self.bearer.authenticate(authorization).await?;

		Ok(self.authority.profile(&identity).await?)
	}

	/// `GET /logout?continue=<target>`.
	pub async fn get_logout(
		&self,
		authorization: Option<&str>,
		continue_to: Option<&str>,
	) -> Result<LogoutOutcome, ErrorResponse> {
		Ok(self.authority.logout(authorization, continue_to).await?)
	}

	/// `POST /login?client_id=..&redirect_uri=..[&scope=..][&state=..]` with the user's
	/// credentials in the body; success is a `302` to the returned target.
	///
	/// Client fields missing from the query fall back to the body.
	pub async fn post_login(
		&self,
		query: Option<&str>,
		content_type: Option<&str>,
		body: &[u8],
	) -> Result<String, ErrorResponse> {
		let from_query: LoginRequest = serde_urlencoded::from_str(query.unwrap_or_default())
			.map_err(|e| Error::bad_request(format!("Malformed login query: {e}")))?;
		let from_body = parse_body::<LoginRequest>(content_type, body, "login")?;
		let request = LoginRequest {
			client_id: from_query.client_id.or(from_body.client_id),
			redirect_uri: from_query.redirect_uri.or(from_body.redirect_uri),
			scope: from_query.scope.or(from_body.scope),
			state: from_query.state.or(from_body.state),
			username: from_body.username,
			password: from_body.password,
		};

		Ok(self.authority.login(&request).await?)
	}
}

fn is_form(content_type: Option<&str>) -> bool {
	content_type
		.and_then(|value| value.split(';').next())
		.is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

fn parse_body<T>(content_type: Option<&str>, body: &[u8], what: &str) -> Result<T>
where
	T: DeserializeOwned + Default,
{
	if body.is_empty() {
		return Ok(T::default());
	}
	if is_form(content_type) {
		return serde_urlencoded::from_bytes(body)
			.map_err(|e| Error::bad_request(format!("Malformed {what} form: {e}")));
	}

	let de = &mut serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(de).map_err(|e| {
		Error::bad_request(format!("Malformed {what} request at `{}`: {}", e.path(), e.inner()))
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, store::StoreError, strategy::BasicCredentials};

	const JSON: Option<&str> = Some("application/json");
	const FORM: Option<&str> = Some("application/x-www-form-urlencoded; charset=utf-8");

	fn basic_header() -> String {
		BasicCredentials {
			client_id: TEST_CLIENT_ID.into(),
			client_secret: TEST_CLIENT_SECRET.into(),
		}
		.to_header()
	}

	fn token_body() -> Vec<u8> {
		serde_json::to_vec(&TokenRequest::password(
			TEST_CLIENT_ID,
			TEST_CLIENT_SECRET,
			TEST_USERNAME,
			TEST_PASSWORD,
			"profile",
		))
		.expect("Token request should serialize.")
	}

	fn form(pairs: &[(&str, &str)]) -> String {
		serde_urlencoded::to_string(pairs).expect("Form pairs should encode.")
	}

	#[test]
	fn error_response_maps_status_and_code() {
		let response = ErrorResponse::from(Error::UnauthorizedUser);
		let json = serde_json::to_value(&response.body).expect("Error body should serialize.");

		assert_eq!(response.status, 401);
		assert_eq!(json["error"], "invalid_grant");
		assert_eq!(json["error_description"], "Invalid user credentials.");

		let internal =
			ErrorResponse::from(Error::from(StoreError::Backend { message: "db down".into() }));

		assert_eq!(internal.status, 500);
		assert_eq!(internal.error().as_ref(), "server_error");
		assert!(!internal.body.error_description().is_some_and(|d| d.contains("db down")));
	}

	#[tokio::test]
	async fn token_then_me_then_logout() {
		let (authority, _) = build_test_authority();
		let endpoints = AuthEndpoints::new(authority);
		let envelope =
			endpoints.post_token(JSON, &token_body()).await.expect("Token should be issued.");
		let bearer = format!("Bearer {}", envelope.access_token.expose());
		let profile = endpoints.get_me(Some(&bearer)).await.expect("Profile should resolve.");

		assert_eq!(profile.name.as_ref(), TEST_USERNAME);
		assert_eq!(
			endpoints.get_logout(Some(&bearer), None).await.expect("Logout should succeed."),
			LogoutOutcome::NoContent
		);

		let err = endpoints.get_me(Some(&bearer)).await.expect_err("Revoked token must fail.");

		assert_eq!(err.status, 498);
	}

	#[tokio::test]
	async fn token_accepts_form_bodies() {
		let (authority, _) = build_test_authority();
		let endpoints = AuthEndpoints::new(authority);
		let body = form(&[
			("grant_type", "password"),
			("client_id", TEST_CLIENT_ID),
			("client_secret", TEST_CLIENT_SECRET),
			("username", TEST_USERNAME),
			("password", TEST_PASSWORD),
			("scope", "profile email"),
		]);
		let envelope = endpoints
			.post_token(FORM, body.as_bytes())
			.await
			.expect("Form-encoded grants should be issued.");

		assert_eq!(envelope.scope, "profile email");

		let info = form(&[("token", envelope.access_token.expose())]);
		let introspection = endpoints
			.post_token_info(Some(&basic_header()), FORM, info.as_bytes())
			.await
			.expect("Form-encoded introspection should succeed.");

		assert!(introspection.active);
	}

	#[tokio::test]
	async fn token_info_requires_client_credentials() {
		let (authority, _) = build_test_authority();
		let endpoints = AuthEndpoints::new(authority);
		let envelope =
			endpoints.post_token(JSON, &token_body()).await.expect("Token should be issued.");
		let body = serde_json::to_vec(&serde_json::json!({ "token": envelope.access_token }))
			.expect("Body should serialize.");
		let info = endpoints
			.post_token_info(Some(&basic_header()), JSON, &body)
			.await
			.expect("Introspection should succeed.");

		assert!(info.active);
		assert_eq!(
			endpoints.post_token_info(None, JSON, &body).await.expect_err("Missing credentials").status,
			401
		);

		let empty = endpoints
			.post_token_info(Some(&basic_header()), None, b"")
			.await
			.expect("Empty body introspects as no token.");

		assert!(!empty.active);
	}

	#[tokio::test]
	async fn login_reads_client_fields_from_query_and_credentials_from_body() {
		let (authority, _) = build_test_authority();
		let endpoints = AuthEndpoints::new(authority);
		let query = form(&[
			("client_id", TEST_CLIENT_ID),
			("redirect_uri", "/callback"),
			("state", "opaque"),
		]);
		let body = form(&[("username", TEST_USERNAME), ("password", TEST_PASSWORD)]);
		let target = endpoints
			.post_login(Some(&query), FORM, body.as_bytes())
			.await
			.expect("Login should redirect.");

		assert!(target.starts_with("/callback?access_token="), "unexpected target {target}");
		assert!(target.ends_with("&scope=profile&state=opaque"));

		// Credentials are never taken from the query string.
		let leaked = form(&[
			("client_id", TEST_CLIENT_ID),
			("redirect_uri", "/callback"),
			("username", TEST_USERNAME),
			("password", TEST_PASSWORD),
		]);
		let err = endpoints
			.post_login(Some(&leaked), FORM, b"")
			.await
			.expect_err("Query credentials must be ignored.");

		assert_eq!(err.status, 400);
	}

	#[tokio::test]
	async fn malformed_bodies_are_bad_requests() {
		let (authority, _) = build_test_authority();
		let endpoints = AuthEndpoints::new(authority);
		let err =
			endpoints.post_token(JSON, b"{not json").await.expect_err("Malformed JSON must fail.");

		assert_eq!(err.status, 400);
		assert_eq!(err.error().as_ref(), "invalid_request");

		let err = endpoints
			.post_token(None, br#"{"client_id":42}"#)
			.await
			.expect_err("Non-string fields must be rejected.");

		assert!(
			err.body.error_description().is_some_and(|d| d.contains("client_id")),
			"description should name the offending path: {err:?}"
		);
	}
}
