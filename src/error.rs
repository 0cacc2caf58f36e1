//! Authority-level error types shared across flows, strategies, and stores.

// crates.io
use oauth2::basic::BasicErrorResponseType;
// self
use crate::_prelude::*;

/// Authority-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical authority error exposed by public APIs.
///
/// The domain variants map one-to-one onto HTTP statuses via [`Error::status`]. Storage,
/// configuration, codec and record-assembly failures are infrastructure faults and surface as
/// 500 responses without being reinterpreted.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token signing or key handling failure.
	#[error(transparent)]
	Codec(#[from] crate::codec::CodecError),
	/// An issued token could not be turned into a store record.
	#[error("Access token record could not be assembled: {0}")]
	TokenRecord(#[from] crate::auth::AccessTokenRecordBuilderError),

	/// Malformed input (missing field, missing or invalid header).
	#[error("Bad request: {reason}.")]
	BadRequest {
		/// Human-readable reason string.
		reason: String,
	},
	/// Grant type is not `password`.
	#[error("Invalid grant type: {reason}.")]
	InvalidGrant {
		/// Human-readable reason string.
		reason: String,
	},
	/// Client is not registered.
	#[error("Invalid client: {reason}.")]
	InvalidClient {
		/// Human-readable reason string.
		reason: String,
	},
	/// Client credentials do not match.
	#[error("Unauthorized client: {reason}.")]
	UnauthorizedClient {
		/// Human-readable reason string.
		reason: String,
	},
	/// Client is not entitled to the requested scope.
	#[error("Invalid scope: {reason}.")]
	InvalidScope {
		/// Human-readable reason string.
		reason: String,
	},
	/// Resource-owner credentials do not match.
	#[error("Invalid user credentials.")]
	UnauthorizedUser,
	/// No token was presented where one is mandatory.
	#[error("Token is required.")]
	TokenRequired,
	/// Token was presented but is inactive (expired, revoked, or not verifiable).
	#[error("Token has expired or is invalid.")]
	TokenExpired,
	/// Authenticated but disallowed.
	#[error("Access is denied: {reason}.")]
	Forbidden {
		/// Human-readable reason string.
		reason: String,
	},
}
impl Error {
	/// Builds a [`Error::BadRequest`].
	pub fn bad_request(reason: impl Into<String>) -> Self {
		Self::BadRequest { reason: reason.into() }
	}

	/// Builds a [`Error::Forbidden`].
	pub fn forbidden(reason: impl Into<String>) -> Self {
		Self::Forbidden { reason: reason.into() }
	}

	/// Builds a [`Error::UnauthorizedClient`].
	pub fn unauthorized_client(reason: impl Into<String>) -> Self {
		Self::UnauthorizedClient { reason: reason.into() }
	}

	/// HTTP status code that matches the failure kind.
	pub const fn status(&self) -> u16 {
		match self {
			Self::BadRequest { .. }
			| Self::InvalidGrant { .. }
			| Self::InvalidClient { .. }
			| Self::InvalidScope { .. } => 400,
			Self::UnauthorizedClient { .. } | Self::UnauthorizedUser => 401,
			Self::Forbidden { .. } => 403,
			Self::TokenExpired => 498,
			Self::TokenRequired => 499,
			Self::Storage(_) | Self::Config(_) | Self::Codec(_) | Self::TokenRecord(_) => 500,
		}
	}

	/// RFC 6749 error code for the failure kind.
	pub fn oauth_error(&self) -> BasicErrorResponseType {
		match self {
			Self::BadRequest { .. } => BasicErrorResponseType::InvalidRequest,
			Self::InvalidGrant { .. } => BasicErrorResponseType::UnsupportedGrantType,
			Self::InvalidClient { .. } => BasicErrorResponseType::InvalidClient,
			Self::UnauthorizedClient { .. } => BasicErrorResponseType::UnauthorizedClient,
			Self::InvalidScope { .. } => BasicErrorResponseType::InvalidScope,
			Self::UnauthorizedUser => BasicErrorResponseType::InvalidGrant,
			Self::TokenRequired => BasicErrorResponseType::Extension("token_required".into()),
			Self::TokenExpired => BasicErrorResponseType::Extension("token_expired".into()),
			Self::Forbidden { .. } => BasicErrorResponseType::Extension("access_denied".into()),
			Self::Storage(_) | Self::Config(_) | Self::Codec(_) | Self::TokenRecord(_) =>
				BasicErrorResponseType::Extension("server_error".into()),
		}
	}

	/// Returns `true` for infrastructure failures that are not part of the domain taxonomy.
	pub const fn is_internal(&self) -> bool {
		matches!(self, Self::Storage(_) | Self::Config(_) | Self::Codec(_) | Self::TokenRecord(_))
	}
}

/// Configuration and validation failures raised while assembling an authority.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No private key was supplied.
	#[error("Private key is required.")]
	MissingPrivateKey,
	/// No public key was supplied.
	#[error("Public key is required.")]
	MissingPublicKey,
	/// Token timeout must be at least one minute.
	#[error("Token timeout must be positive.")]
	NonPositiveTimeout,
	/// Token timeout exceeds the supported range.
	#[error("Token timeout of {minutes} minutes exceeds the supported range.")]
	TimeoutOutOfRange {
		/// Rejected timeout, in minutes.
		minutes: u64,
	},
	/// Issuer string is empty.
	#[error("Token issuer cannot be empty.")]
	EmptyIssuer,
	/// Audience string is empty.
	#[error("Token audience cannot be empty.")]
	EmptyAudience,
	/// A key file could not be read.
	#[error("Failed to read key file {path}.")]
	ReadKey {
		/// Resolved path of the key file.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Settings document could not be parsed.
	#[error("Authority settings are malformed.")]
	Settings(#[from] serde_path_to_error::Error<serde_json::Error>),
}
