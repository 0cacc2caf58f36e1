//! Token introspection.
//!
//! Inactive tokens are a value, not an error: a token that is absent, fails signature
//! verification, or has reached its effective expiry yields `{ "active": false }`. The
//! effective expiry is the earlier of the embedded `exp` and the persisted record's
//! revocation instant, which is how logout ends an otherwise valid signature.

// self
use crate::{
	_prelude::*,
	auth::TokenClaims,
	flows::Authority,
	obs::{self, FlowKind},
};

/// Introspection result. Claims are flattened into the JSON object when active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introspection {
	/// Whether the token is currently usable.
	pub active: bool,
	/// Verified claims; present only for active tokens.
	#[serde(flatten)]
	pub claims: Option<TokenClaims>,
}
impl Introspection {
	/// Result for an unusable token.
	pub const fn inactive() -> Self {
		Self { active: false, claims: None }
	}

	/// Result for a verified, unexpired token.
	pub fn active(claims: TokenClaims) -> Self {
		Self { active: true, claims: Some(claims) }
	}
}

impl Authority {
	/// Introspects `token` against the current wall clock.
	pub async fn introspect(&self, token: Option<&str>) -> Result<Introspection> {
		self.introspect_at(token, OffsetDateTime::now_utc()).await
	}

	/// Introspects `token` as if the current instant were `now`. Only store failures are
	/// returned as errors.
	pub async fn introspect_at(
		&self,
		token: Option<&str>,
		now: OffsetDateTime,
	) -> Result<Introspection> {
		const KIND: FlowKind = FlowKind::Introspection;

		obs::observe(KIND, "introspect", async move {
			let Some(token) = token.filter(|t| !t.is_empty()) else {
				obs::log_token_rejection(KIND, &"no token presented");

				return Ok(Introspection::inactive());
			};
			let claims = match self.codec.verify(token) {
				Ok(claims) => claims,
				Err(e) => {
					let reason = StdError::source(&e).map_or_else(|| e.to_string(), ToString::to_string);

					obs::log_token_rejection(KIND, &reason);

					return Ok(Introspection::inactive());
				},
			};
			let record = self.store.find_access_token(token).await?;

			if claims.is_expired_at(now) || record.is_some_and(|r| r.is_expired_at(now)) {
				obs::log_token_rejection(KIND, &"token expired or revoked");

				return Ok(Introspection::inactive());
			}

			Ok(Introspection::active(claims))
		})
		.await
	}
}
