//! Authenticated identities produced by request strategies.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Scheme through which an identity was authenticated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthenticationType {
	/// Resource owner presenting a bearer token.
	Bearer,
	/// Client presenting HTTP Basic credentials.
	Basic,
}
impl AuthenticationType {
	/// Returns the scheme label used in `Authorization` headers.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthenticationType::Bearer => "Bearer",
			AuthenticationType::Basic => "Basic",
		}
	}
}
impl Display for AuthenticationType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Identity handed to the request-routing layer after a strategy succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
	/// User login name (bearer) or client identifier (basic).
	pub name: String,
	/// Numeric user identifier; bearer identities only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authentication_provider_key: Option<u64>,
	/// Scheme used to authenticate.
	pub authentication_type: AuthenticationType,
	/// Presented token; bearer identities only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authentication_token: Option<TokenSecret>,
	/// Scope carried by the token; bearer identities only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub authentication_scope: Option<String>,
}
impl AuthenticatedIdentity {
	/// Identity for a resolved bearer token.
	pub fn bearer(
		name: impl Into<String>,
		user_id: u64,
		token: TokenSecret,
		scope: impl Into<String>,
	) -> Self {
		Self {
			name: name.into(),
			authentication_provider_key: Some(user_id),
			authentication_type: AuthenticationType::Bearer,
			authentication_token: Some(token),
			authentication_scope: Some(scope.into()),
		}
	}

	/// Identity for a client authenticated with HTTP Basic.
	pub fn basic(client_id: impl Into<String>) -> Self {
		Self {
			name: client_id.into(),
			authentication_provider_key: None,
			authentication_type: AuthenticationType::Basic,
			authentication_token: None,
			authentication_scope: None,
		}
	}
}
