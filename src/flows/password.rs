//! Resource-owner password grant.
//!
//! [`Authority::authenticate`] validates the request in a fixed order (grant type, client,
//! client secret, scope, user credentials) so the first violated check decides the error,
//! then signs a token, persists its revocation record, and returns the envelope. Records of
//! tokens already past `exp` are purged on each issuance.

// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRecord, ScopeSet, TokenClaims, TokenEnvelope},
	flows::{Authority, common},
	obs::{self, FlowKind},
};

/// The only grant type this authority issues tokens for.
pub const PASSWORD_GRANT_TYPE: &str = "password";

/// Body of a token request. Every field is optional so validation can report the first
/// missing one in grant order.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
	/// Must equal [`PASSWORD_GRANT_TYPE`].
	#[serde(default)]
	pub grant_type: Option<String>,
	/// Registered client identifier.
	#[serde(default)]
	pub client_id: Option<String>,
	/// Client secret.
	#[serde(default)]
	pub client_secret: Option<String>,
	/// Resource-owner login name.
	#[serde(default)]
	pub username: Option<String>,
	/// Resource-owner password.
	#[serde(default)]
	pub password: Option<String>,
	/// Space-delimited requested scope.
	#[serde(default)]
	pub scope: Option<String>,
}
impl TokenRequest {
	/// Builds a complete password-grant request.
	pub fn password(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
		scope: impl Into<String>,
	) -> Self {
		Self {
			grant_type: Some(PASSWORD_GRANT_TYPE.into()),
			client_id: Some(client_id.into()),
			client_secret: Some(client_secret.into()),
			username: Some(username.into()),
			password: Some(password.into()),
			scope: Some(scope.into()),
		}
	}
}
impl Debug for TokenRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRequest")
			.field("grant_type", &self.grant_type)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("username", &self.username)
			.field("password_set", &self.password.is_some())
			.field("scope", &self.scope)
			.finish()
	}
}

impl Authority {
	/// Runs the password grant against the current wall clock.
	pub async fn authenticate(&self, request: &TokenRequest) -> Result<TokenEnvelope> {
		self.authenticate_at(request, OffsetDateTime::now_utc()).await
	}

	/// Runs the password grant as if the current instant were `now`.
	pub async fn authenticate_at(
		&self,
		request: &TokenRequest,
		now: OffsetDateTime,
	) -> Result<TokenEnvelope> {
		obs::observe(FlowKind::PasswordGrant, "authenticate", async move {
			let grant_type = common::required("grant_type", request.grant_type.as_deref())?;

			if grant_type != PASSWORD_GRANT_TYPE {
				return Err(Error::InvalidGrant {
					reason: format!("Expected grant type `{PASSWORD_GRANT_TYPE}`"),
				});
			}

			let client_id = common::required("client_id", request.client_id.as_deref())?;
			let client = self
				.store
				.find_client(client_id)
				.await?
				.ok_or_else(|| Error::InvalidClient { reason: "Unknown client".into() })?;
			let client_secret =
				common::required("client_secret", request.client_secret.as_deref())?;

			if !client.secret_matches(client_secret) {
				return Err(Error::unauthorized_client("Invalid client credentials"));
			}

			let scope = request
				.scope
				.as_deref()
				.ok_or_else(|| Error::bad_request("Missing required field `scope`"))?;
			let requested = ScopeSet::from_str(scope)
				.map_err(|e| Error::InvalidScope { reason: e.to_string() })?;

			if requested.is_empty() || !self.store.client_has_scope(&client, &requested).await? {
				return Err(Error::InvalidScope { reason: "Invalid client scope".into() });
			}

			let username = common::required("username", request.username.as_deref())?;
			let password = common::required("password", request.password.as_deref())?;

			if !self.store.validate_user_credentials(username, password).await? {
				return Err(Error::UnauthorizedUser);
			}

			// Credentials verified above; a missing row means it vanished in between.
			let user = self.store.find_user(username).await?.ok_or(Error::UnauthorizedUser)?;
			let expires_at = now + self.config.timeout;
			let claims = TokenClaims::for_user(
				&user,
				scope,
				&self.config.issuer,
				&self.config.audience,
				expires_at,
			);
			let access_token = self.codec.sign(&claims)?;
			let record = AccessTokenRecord::builder(access_token.expose())
				.token_id(claims.jti.clone())
				.username(user.name.clone())
				.client_id(client.client_id.clone())
				.scope(scope)
				.issued_at(now)
				.expires(expires_at)
				.build()?;

			self.store.purge_expired(now).await?;
			self.store.save_access_token(record).await?;

			Ok(TokenEnvelope::bearer(access_token, self.config.timeout, scope))
		})
		.await
	}
}
