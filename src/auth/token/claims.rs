//! Claims embedded inside signed bearer tokens.

// self
use crate::{
	_prelude::*,
	auth::{TokenId, User},
};

/// Value of the `typ` claim carried by every issued token.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Claim set signed into every access token.
///
/// Field names follow the JWT registered claims (`sub`, `jti`, `aud`, `exp`, `iss`); `exp` is
/// an absolute instant in unix seconds and is never extended after issuance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Subject: the user's numeric identifier rendered as a string.
	pub sub: String,
	/// Unique per-issuance identifier.
	pub jti: TokenId,
	/// Intended audience.
	pub aud: String,
	/// Absolute expiry in unix seconds.
	pub exp: i64,
	/// Token type marker, always [`BEARER_TOKEN_TYPE`].
	pub typ: String,
	/// Issuer string.
	pub iss: String,
	/// Space-delimited granted scope.
	pub scope: String,
	/// Display name of the user.
	pub name: String,
	/// Login name of the user.
	pub username: String,
	/// Mirrors `username` for OIDC-style consumers.
	pub preferred_username: String,
}
impl TokenClaims {
	/// Builds claims for `user` expiring at `expires_at`.
	pub fn for_user(
		user: &User,
		scope: impl Into<String>,
		issuer: impl Into<String>,
		audience: impl Into<String>,
		expires_at: OffsetDateTime,
	) -> Self {
		Self {
			sub: user.id.to_string(),
			jti: TokenId::generate(),
			aud: audience.into(),
			exp: expires_at.unix_timestamp(),
			typ: BEARER_TOKEN_TYPE.into(),
			iss: issuer.into(),
			scope: scope.into(),
			name: user.display_name().to_owned(),
			username: user.name.to_string(),
			preferred_username: user.name.to_string(),
		}
	}

	/// Expiry instant embedded in the token.
	pub fn expires_at(&self) -> OffsetDateTime {
		// Out-of-range instants count as expired.
		OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}

	/// Returns `true` once `instant` has reached the embedded expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::_preludet::test_user;

	#[test]
	fn claims_carry_user_identity() {
		let user = test_user(7, "alexis.rees@example.com", "secret");
		let expires = macros::datetime!(2025-01-01 01:00 UTC);
		let claims = TokenClaims::for_user(&user, "profile", "urn:test", "account", expires);

		assert_eq!(claims.sub, "7");
		assert_eq!(claims.username, "alexis.rees@example.com");
		assert_eq!(claims.preferred_username, claims.username);
		assert_eq!(claims.name, "Fixture user 7");
		assert_eq!(claims.typ, BEARER_TOKEN_TYPE);
		assert_eq!(claims.expires_at(), expires);
	}

	#[test]
	fn expiry_is_a_one_way_transition() {
		let user = test_user(1, "u", "p");
		let expires = macros::datetime!(2025-01-01 01:00 UTC);
		let claims = TokenClaims::for_user(&user, "profile", "urn:test", "account", expires);

		assert!(!claims.is_expired_at(macros::datetime!(2025-01-01 00:59:59 UTC)));
		assert!(claims.is_expired_at(expires));
		assert!(claims.is_expired_at(macros::datetime!(2030-01-01 00:00 UTC)));
	}

	#[test]
	fn each_issuance_gets_a_distinct_jti() {
		let user = test_user(1, "u", "p");
		let expires = macros::datetime!(2025-01-01 01:00 UTC);
		let first = TokenClaims::for_user(&user, "profile", "urn:test", "account", expires);
		let second = TokenClaims::for_user(&user, "profile", "urn:test", "account", expires);

		assert_ne!(first.jti, second.jti);
	}
}
