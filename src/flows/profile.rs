//! Profile lookup behind the bearer strategy.

// self
use crate::{
	_prelude::*,
	auth::{AuthenticatedIdentity, AuthenticationType, UserProfile},
	flows::Authority,
	obs::{self, FlowKind},
};

impl Authority {
	/// Returns the password-free profile of the user behind a bearer identity.
	pub async fn profile(&self, identity: &AuthenticatedIdentity) -> Result<UserProfile> {
		obs::observe(FlowKind::Profile, "profile", async move {
			if identity.authentication_type != AuthenticationType::Bearer {
				return Err(Error::forbidden("Profile lookup requires a bearer identity"));
			}

			let user = self
				.store
				.find_user(&identity.name)
				.await?
				.ok_or_else(|| Error::forbidden("Unknown user"))?;

			Ok(user.profile())
		})
		.await
	}
}
