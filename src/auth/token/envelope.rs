//! Token envelope returned to callers of the password grant.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Value of the `token_type` field in every envelope.
pub const ENVELOPE_TOKEN_TYPE: &str = "bearer";

/// Response body of a successful password grant. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEnvelope {
	/// Signed bearer token.
	pub access_token: TokenSecret,
	/// Always [`ENVELOPE_TOKEN_TYPE`].
	pub token_type: String,
	/// Lifetime of the token in seconds.
	pub expires_in: i64,
	/// Granted scope, identical to the requested scope.
	pub scope: String,
}
impl TokenEnvelope {
	/// Wraps a freshly signed token.
	pub fn bearer(access_token: TokenSecret, lifetime: Duration, scope: impl Into<String>) -> Self {
		Self {
			access_token,
			token_type: ENVELOPE_TOKEN_TYPE.into(),
			expires_in: lifetime.whole_seconds(),
			scope: scope.into(),
		}
	}
}
