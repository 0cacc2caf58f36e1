//! Resource owners and their public profile view.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, PasswordHash, Username},
};

/// Resource owner provisioned out-of-band.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Numeric identifier; becomes the `sub` claim.
	pub id: u64,
	/// Unique login name.
	pub name: Username,
	/// Argon2 hash of the password.
	pub password: PasswordHash,
	/// Disabled users keep their tokens verifiable but are refused at bearer resolution.
	pub enabled: bool,
	/// Optional display name.
	pub description: Option<String>,
}
impl User {
	/// Creates an enabled user without a description.
	pub fn new(
		id: u64,
		name: impl AsRef<str>,
		password: PasswordHash,
	) -> Result<Self, IdentifierError> {
		Ok(Self { id, name: Username::new(name)?, password, enabled: true, description: None })
	}

	/// Sets the display name.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Overrides the enabled flag.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;

		self
	}

	/// Description when present, otherwise the login name.
	pub fn display_name(&self) -> &str {
		self.description.as_deref().unwrap_or(self.name.as_ref())
	}

	/// Public view without the password hash.
	pub fn profile(&self) -> UserProfile {
		UserProfile {
			id: self.id,
			name: self.name.clone(),
			description: self.description.clone(),
			enabled: self.enabled,
		}
	}
}

/// Password-free projection of a [`User`], returned by the profile endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Numeric identifier.
	pub id: u64,
	/// Login name.
	pub name: Username,
	/// Optional display name.
	pub description: Option<String>,
	/// Account state.
	pub enabled: bool,
}
