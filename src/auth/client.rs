//! Registered client applications.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, IdentifierError, ScopeSet, TokenSecret},
};

/// Client application provisioned out-of-band. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
	/// Public identifier.
	pub client_id: ClientId,
	/// Shared secret; compared in constant time.
	pub client_secret: TokenSecret,
	/// Scopes this client may request.
	pub allowed_scopes: ScopeSet,
}
impl Client {
	/// Creates a client after validating its identifier.
	pub fn new(
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
		allowed_scopes: ScopeSet,
	) -> Result<Self, IdentifierError> {
		Ok(Self {
			client_id: ClientId::new(client_id)?,
			client_secret: TokenSecret::new(client_secret),
			allowed_scopes,
		})
	}

	/// Returns `true` if the presented secret matches.
	pub fn secret_matches(&self, presented: &str) -> bool {
		self.client_secret.matches(presented)
	}

	/// Returns `true` if every requested scope is allowed for this client.
	pub fn has_scope(&self, requested: &ScopeSet) -> bool {
		!requested.is_empty() && requested.is_subset_of(&self.allowed_scopes)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::test_client;

	#[test]
	fn has_scope_requires_non_empty_subset() {
		let client = test_client();

		assert!(client.has_scope(&ScopeSet::from_str("profile").expect("Scope should parse.")));
		assert!(
			client.has_scope(&ScopeSet::from_str("email profile").expect("Scope should parse."))
		);
		assert!(!client.has_scope(&ScopeSet::from_str("admin").expect("Scope should parse.")));
		assert!(!client.has_scope(&ScopeSet::default()), "Empty requests are never authorized.");
	}

	#[test]
	fn secret_comparison_is_exact() {
		let client = test_client();

		assert!(client.secret_matches("S1"));
		assert!(!client.secret_matches("s1"));
	}
}
