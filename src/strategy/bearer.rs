//! Bearer strategy: resolves `Authorization: Bearer <token>` into a resource-owner identity.

// self
use crate::{
	_prelude::*,
	auth::{AuthenticatedIdentity, AuthenticationType, TokenSecret},
	flows::{Authority, common},
	obs::{self, FlowKind},
	strategy::{AuthStrategy, StrategyFuture},
};

/// Authenticates resource owners by bearer token.
#[derive(Clone, Debug)]
pub struct BearerStrategy {
	authority: Authority,
}
impl BearerStrategy {
	/// Wraps an authority.
	pub fn new(authority: Authority) -> Self {
		Self { authority }
	}

	async fn resolve(&self, authorization: Option<&str>) -> Result<AuthenticatedIdentity> {
		let header = authorization.ok_or(Error::TokenRequired)?;
		let token = common::parse_bearer(header)
			.ok_or_else(|| Error::bad_request("Invalid authorization header"))?;

		if token.is_empty() {
			return Err(Error::TokenRequired);
		}

		let claims = self
			.authority
			.introspect(Some(token))
			.await?
			.claims
			.ok_or(Error::TokenExpired)?;
		let user = self
			.authority
			.store
			.find_user(&claims.username)
			.await?
			.ok_or_else(|| Error::forbidden("unknown user"))?;

		if !user.enabled {
			return Err(Error::forbidden("user account is disabled"));
		}

		Ok(AuthenticatedIdentity::bearer(
			user.name.to_string(),
			user.id,
			TokenSecret::new(token),
			claims.scope,
		))
	}
}
impl AuthStrategy for BearerStrategy {
	fn scheme(&self) -> AuthenticationType {
		AuthenticationType::Bearer
	}

	fn authenticate<'a>(&'a self, authorization: Option<&'a str>) -> StrategyFuture<'a> {
		Box::pin(obs::observe(FlowKind::Bearer, "bearer", self.resolve(authorization)))
	}
}
