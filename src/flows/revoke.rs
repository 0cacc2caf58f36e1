//! Logout: revokes a bearer token by stamping its persisted record with the current instant.

// self
use crate::{
	_prelude::*,
	flows::{
		Authority,
		common::{self, RedirectTarget},
	},
	obs::{self, FlowKind},
};

/// What the caller should send back after a successful logout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoutOutcome {
	/// `204 No Content`.
	NoContent,
	/// `302 Found` to the validated `continue` target, absolute or relative.
	Redirect(String),
}
impl LogoutOutcome {
	/// HTTP status for the outcome.
	pub const fn status(&self) -> u16 {
		match self {
			Self::NoContent => 204,
			Self::Redirect(_) => 302,
		}
	}
}

impl Authority {
	/// Revokes the bearer token in `authorization` at the current wall clock.
	pub async fn logout(
		&self,
		authorization: Option<&str>,
		continue_to: Option<&str>,
	) -> Result<LogoutOutcome> {
		self.logout_at(authorization, continue_to, OffsetDateTime::now_utc()).await
	}

	/// Revokes the bearer token in `authorization` as if the current instant were `now`.
	///
	/// Every input is validated before the store is touched, so a rejected request never
	/// revokes anything.
	pub async fn logout_at(
		&self,
		authorization: Option<&str>,
		continue_to: Option<&str>,
		now: OffsetDateTime,
	) -> Result<LogoutOutcome> {
		obs::observe(FlowKind::Revocation, "logout", async move {
			let header =
				authorization.ok_or_else(|| Error::unauthorized_client("Missing client credentials"))?;
			let token = common::parse_bearer(header)
				.ok_or_else(|| Error::bad_request("Invalid authorization header"))?;
			let redirect = continue_to
				.filter(|c| !c.is_empty())
				.map(|target| RedirectTarget::parse("continue", target).map(|_| target.to_owned()))
				.transpose()?;
			let mut record = self
				.store
				.find_access_token(token)
				.await?
				.ok_or_else(|| Error::bad_request("Invalid token"))?;

			record.revoke(now);
			self.store.save_access_token(record).await?;

			Ok(redirect.map_or(LogoutOutcome::NoContent, LogoutOutcome::Redirect))
		})
		.await
	}
}
