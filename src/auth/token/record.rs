//! Persisted access-token records used as the revocation side channel.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, TokenId, Username, token::secret::TokenSecret},
};

/// Errors produced by [`AccessTokenRecordBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AccessTokenRecordBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry was configured.
	#[error("Expiry is required.")]
	MissingExpiry,
}

/// Stored record of an issued access token.
///
/// The signed token stays verifiable until its `exp`; `revoked_at` is the store-side cut-off
/// that logout sets to end it early.
#[derive(Serialize, Deserialize, Clone)]
pub struct AccessTokenRecord {
	/// Raw token string; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// `jti` of the token, when known.
	pub token_id: Option<TokenId>,
	/// Owner of the token.
	pub username: Option<Username>,
	/// Client the token was issued to.
	pub client_id: Option<ClientId>,
	/// Granted scope string.
	pub scope: Option<String>,
	/// Issued-at instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant, equal to the token's `exp`.
	pub expires: OffsetDateTime,
	/// Revocation instant, if the token was logged out.
	#[serde(default)]
	pub revoked_at: Option<OffsetDateTime>,
}
impl AccessTokenRecord {
	/// Returns a builder for the provided token string.
	pub fn builder(access_token: impl Into<String>) -> AccessTokenRecordBuilder {
		AccessTokenRecordBuilder::new(access_token)
	}

	/// Returns `true` once `instant` has reached either the expiry or the revocation instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires || self.revoked_at.is_some_and(|revoked| instant >= revoked)
	}

	/// Returns `true` when the token itself is past `exp`, so the record no longer decides
	/// anything and can be dropped.
	pub fn is_purgeable_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires
	}

	/// Revokes the token at `instant`. An earlier revocation is kept.
	pub fn revoke(&mut self, instant: OffsetDateTime) {
		self.revoked_at = Some(self.revoked_at.map_or(instant, |revoked| revoked.min(instant)));
	}
}
impl Debug for AccessTokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenRecord")
			.field("access_token", &"<redacted>")
			.field("token_id", &self.token_id)
			.field("username", &self.username)
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires", &self.expires)
			.field("revoked_at", &self.revoked_at)
			.finish()
	}
}

/// Builder for [`AccessTokenRecord`].
#[derive(Clone, Debug)]
pub struct AccessTokenRecordBuilder {
	access_token: Option<TokenSecret>,
	token_id: Option<TokenId>,
	username: Option<Username>,
	client_id: Option<ClientId>,
	scope: Option<String>,
	issued_at: Option<OffsetDateTime>,
	expires: Option<OffsetDateTime>,
}
impl AccessTokenRecordBuilder {
	fn new(access_token: impl Into<String>) -> Self {
		let access_token = access_token.into();

		Self {
			access_token: (!access_token.is_empty()).then(|| TokenSecret::new(access_token)),
			token_id: None,
			username: None,
			client_id: None,
			scope: None,
			issued_at: None,
			expires: None,
		}
	}

	/// Sets the `jti` of the token.
	pub fn token_id(mut self, token_id: TokenId) -> Self {
		self.token_id = Some(token_id);

		self
	}

	/// Sets the owner of the token.
	pub fn username(mut self, username: Username) -> Self {
		self.username = Some(username);

		self
	}

	/// Sets the client the token was issued to.
	pub fn client_id(mut self, client_id: ClientId) -> Self {
		self.client_id = Some(client_id);

		self
	}

	/// Sets the granted scope string.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires(mut self, instant: OffsetDateTime) -> Self {
		self.expires = Some(instant);

		self
	}

	/// Consumes the builder and produces an [`AccessTokenRecord`].
	pub fn build(self) -> Result<AccessTokenRecord, AccessTokenRecordBuilderError> {
		let access_token =
			self.access_token.ok_or(AccessTokenRecordBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires = self.expires.ok_or(AccessTokenRecordBuilderError::MissingExpiry)?;

		Ok(AccessTokenRecord {
			access_token,
			token_id: self.token_id,
			username: self.username,
			client_id: self.client_id,
			scope: self.scope,
			issued_at,
			expires,
			revoked_at: None,
		})
	}
}
