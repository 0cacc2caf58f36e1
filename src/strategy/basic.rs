//! Basic strategy: validates a client id/secret pair sent as HTTP Basic credentials.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{AuthenticatedIdentity, AuthenticationType},
	flows::Authority,
	obs::{self, FlowKind},
	strategy::{AuthStrategy, StrategyFuture},
};

const BASIC_SCHEME: &str = "Basic";

/// Client id/secret pair decoded from a Basic header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
	/// Client identifier (before the first `:`).
	pub client_id: String,
	/// Client secret (after the first `:`).
	pub client_secret: String,
}
impl BasicCredentials {
	/// Decodes `Basic <base64(id:secret)>`. Returns `None` for any other shape.
	pub fn parse(header: &str) -> Option<Self> {
		let (scheme, encoded) = header.split_once(char::is_whitespace)?;

		if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
			return None;
		}

		let decoded = STANDARD.decode(encoded.trim()).ok()?;
		let decoded = String::from_utf8(decoded).ok()?;
		let (client_id, client_secret) = decoded.split_once(':')?;

		Some(Self { client_id: client_id.to_owned(), client_secret: client_secret.to_owned() })
	}

	/// Encodes the pair as a header value.
	pub fn to_header(&self) -> String {
		format!(
			"{BASIC_SCHEME} {}",
			STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
		)
	}
}
impl Debug for BasicCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BasicCredentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.finish()
	}
}

/// Authenticates client applications by id and secret.
#[derive(Clone, Debug)]
pub struct BasicStrategy {
	authority: Authority,
}
impl BasicStrategy {
	/// Wraps an authority.
	pub fn new(authority: Authority) -> Self {
		Self { authority }
	}

	/// Validates an already-decoded client id/secret pair.
	pub async fn authenticate_credentials(
		&self,
		client_id: &str,
		client_secret: &str,
	) -> Result<AuthenticatedIdentity> {
		let client = self.authority.store.find_client(client_id).await?;

		match client {
			Some(client) if client.secret_matches(client_secret) =>
				Ok(AuthenticatedIdentity::basic(client.client_id.to_string())),
			_ => Err(Error::forbidden("invalid client credentials")),
		}
	}

	async fn resolve(&self, authorization: Option<&str>) -> Result<AuthenticatedIdentity> {
		let header =
			authorization.ok_or_else(|| Error::unauthorized_client("Missing client credentials"))?;
		let credentials = BasicCredentials::parse(header)
			.ok_or_else(|| Error::bad_request("Invalid authorization header"))?;

		self.authenticate_credentials(&credentials.client_id, &credentials.client_secret).await
	}
}
impl AuthStrategy for BasicStrategy {
	fn scheme(&self) -> AuthenticationType {
		AuthenticationType::Basic
	}

	fn authenticate<'a>(&'a self, authorization: Option<&'a str>) -> StrategyFuture<'a> {
		Box::pin(obs::observe(FlowKind::Basic, "basic", self.resolve(authorization)))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn header(id: &str, secret: &str) -> String {
		BasicCredentials { client_id: id.into(), client_secret: secret.into() }.to_header()
	}

	#[test]
	fn parse_splits_on_the_first_colon() {
		let parsed = BasicCredentials::parse(&header("C1", "a:b")).expect("Header should parse.");

		assert_eq!(parsed.client_id, "C1");
		assert_eq!(parsed.client_secret, "a:b");
		assert!(BasicCredentials::parse("basic QzE6UzE=").is_some());
		assert!(BasicCredentials::parse("Bearer QzE6UzE=").is_none());
		assert!(BasicCredentials::parse("Basic !!!").is_none());
		assert!(BasicCredentials::parse(&format!("Basic {}", STANDARD.encode("no-colon"))).is_none());
		assert!(BasicCredentials::parse("Basic").is_none());
	}

	#[tokio::test]
	async fn matching_pair_yields_basic_identity() {
		let (authority, _) = build_test_authority();
		let identity = BasicStrategy::new(authority)
			.authenticate(Some(&header(TEST_CLIENT_ID, TEST_CLIENT_SECRET)))
			.await
			.expect("Basic authentication should succeed.");

		assert_eq!(identity, AuthenticatedIdentity::basic(TEST_CLIENT_ID));
	}

	#[tokio::test]
	async fn errors_follow_header_state() {
		let (authority, _) = build_test_authority();
		let strategy = BasicStrategy::new(authority);

		assert!(matches!(strategy.authenticate(None).await, Err(Error::UnauthorizedClient { .. })));
		assert!(matches!(
			strategy.authenticate(Some("Basic ???")).await,
			Err(Error::BadRequest { .. })
		));
		assert!(matches!(
			strategy.authenticate(Some(&header(TEST_CLIENT_ID, "wrong"))).await,
			Err(Error::Forbidden { .. })
		));
		assert!(matches!(
			strategy.authenticate(Some(&header("C9", TEST_CLIENT_SECRET))).await,
			Err(Error::Forbidden { .. })
		));
	}
}
