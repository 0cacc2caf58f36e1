//! Authority configuration: key material, token lifetime, issuer, and audience.
//!
//! [`AuthConfig`] is built once at startup (directly through [`AuthConfigBuilder`] or from an
//! [`AuthSettings`] document that points at key files) and shared read-only afterwards.

// std
use std::fs;
// self
use crate::{_prelude::*, error::ConfigError};

/// Default token lifetime, in minutes.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 60;
/// Default `iss` claim.
pub const DEFAULT_ISSUER: &str = "urn:oauth2-authority";
/// Default `aud` claim.
pub const DEFAULT_AUDIENCE: &str = "account";

// Keeps `now + timeout` comfortably inside `OffsetDateTime`'s range.
const MAX_TIMEOUT_MINUTES: u64 = 60 * 24 * 366 * 100;

/// Validated authority configuration.
#[derive(Clone)]
pub struct AuthConfig {
	/// PEM-encoded RSA private key used for signing.
	pub private_key: Vec<u8>,
	/// PEM-encoded RSA public key used for verification.
	pub public_key: Vec<u8>,
	/// Token lifetime.
	pub timeout: Duration,
	/// `iss` claim value.
	pub issuer: String,
	/// `aud` claim value.
	pub audience: String,
}
impl AuthConfig {
	/// Returns a builder seeded with the defaults.
	pub fn builder() -> AuthConfigBuilder {
		AuthConfigBuilder::default()
	}
}
impl Debug for AuthConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthConfig")
			.field("private_key", &"<redacted>")
			.field("public_key_len", &self.public_key.len())
			.field("timeout", &self.timeout)
			.field("issuer", &self.issuer)
			.field("audience", &self.audience)
			.finish()
	}
}

/// Builder for [`AuthConfig`] values.
#[derive(Debug)]
pub struct AuthConfigBuilder {
	/// PEM private key bytes.
	pub private_key: Option<Vec<u8>>,
	/// PEM public key bytes.
	pub public_key: Option<Vec<u8>>,
	/// Token lifetime in minutes.
	pub timeout_minutes: u64,
	/// `iss` claim value.
	pub issuer: String,
	/// `aud` claim value.
	pub audience: String,
}
impl Default for AuthConfigBuilder {
	fn default() -> Self {
		Self {
			private_key: None,
			public_key: None,
			timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
			issuer: DEFAULT_ISSUER.into(),
			audience: DEFAULT_AUDIENCE.into(),
		}
	}
}
impl AuthConfigBuilder {
	/// Sets the PEM-encoded private key.
	pub fn private_key_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
		self.private_key = Some(pem.into());

		self
	}

	/// Sets the PEM-encoded public key.
	pub fn public_key_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
		self.public_key = Some(pem.into());

		self
	}

	/// Overrides the token lifetime (minutes).
	pub fn timeout_minutes(mut self, minutes: u64) -> Self {
		self.timeout_minutes = minutes;

		self
	}

	/// Overrides the `iss` claim.
	pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
		self.issuer = issuer.into();

		self
	}

	/// Overrides the `aud` claim.
	pub fn audience(mut self, audience: impl Into<String>) -> Self {
		self.audience = audience.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<AuthConfig, ConfigError> {
		let private_key =
			self.private_key.filter(|k| !k.is_empty()).ok_or(ConfigError::MissingPrivateKey)?;
		let public_key =
			self.public_key.filter(|k| !k.is_empty()).ok_or(ConfigError::MissingPublicKey)?;

		if self.timeout_minutes == 0 {
			return Err(ConfigError::NonPositiveTimeout);
		}
		if self.timeout_minutes > MAX_TIMEOUT_MINUTES {
			return Err(ConfigError::TimeoutOutOfRange { minutes: self.timeout_minutes });
		}
		if self.issuer.trim().is_empty() {
			return Err(ConfigError::EmptyIssuer);
		}
		if self.audience.trim().is_empty() {
			return Err(ConfigError::EmptyAudience);
		}

		let minutes = i64::try_from(self.timeout_minutes)
			.map_err(|_| ConfigError::TimeoutOutOfRange { minutes: self.timeout_minutes })?;

		Ok(AuthConfig {
			private_key,
			public_key,
			timeout: Duration::minutes(minutes),
			issuer: self.issuer,
			audience: self.audience,
		})
	}
}

/// On-disk settings document pointing at key files.
///
/// ```json
/// { "private_key": "~/keys/private.pem", "public_key": "~/keys/public.pem", "timeout": 60 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
	/// Private key path; a leading `~/` resolves against the execution directory.
	pub private_key: PathBuf,
	/// Public key path; a leading `~/` resolves against the execution directory.
	pub public_key: PathBuf,
	/// Token lifetime in minutes.
	#[serde(default)]
	pub timeout: Option<u64>,
	/// `iss` claim override.
	#[serde(default)]
	pub issuer: Option<String>,
	/// `aud` claim override.
	#[serde(default)]
	pub audience: Option<String>,
}
impl AuthSettings {
	/// Parses a JSON settings document, reporting the failing path on error.
	pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);

		Ok(serde_path_to_error::deserialize(de)?)
	}

	/// Reads both key files relative to `execution_path` and builds an [`AuthConfig`].
	pub fn load(&self, execution_path: &Path) -> Result<AuthConfig, ConfigError> {
		let private_key = read_key(&resolve(execution_path, &self.private_key))?;
		let public_key = read_key(&resolve(execution_path, &self.public_key))?;
		let mut builder = AuthConfig::builder()
			.private_key_pem(private_key)
			.public_key_pem(public_key)
			.timeout_minutes(self.timeout.unwrap_or(DEFAULT_TIMEOUT_MINUTES));

		if let Some(issuer) = &self.issuer {
			builder = builder.issuer(issuer);
		}
		if let Some(audience) = &self.audience {
			builder = builder.audience(audience);
		}

		builder.build()
	}
}

fn resolve(execution_path: &Path, configured: &Path) -> PathBuf {
	match configured.strip_prefix("~") {
		Ok(rest) => execution_path.join(rest),
		Err(_) if configured.is_absolute() => configured.to_path_buf(),
		Err(_) => execution_path.join(configured),
	}
}

fn read_key(path: &Path) -> Result<Vec<u8>, ConfigError> {
	fs::read(path).map_err(|source| ConfigError::ReadKey { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;
	use crate::_preludet::*;

	fn temp_dir() -> PathBuf {
		let unique = format!(
			"oauth2_authority_config_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);
		let dir = env::temp_dir().join(unique);

		fs::create_dir_all(dir.join("keys")).expect("Failed to create temporary key directory.");

		dir
	}

	#[test]
	fn builder_applies_defaults() {
		let config = test_config();

		assert_eq!(config.timeout, Duration::minutes(60));
		assert_eq!(config.issuer, DEFAULT_ISSUER);
		assert_eq!(config.audience, DEFAULT_AUDIENCE);
		assert!(!format!("{config:?}").contains("PRIVATE KEY"));
	}

	#[test]
	fn builder_rejects_invalid_values() {
		let base = || AuthConfig::builder().private_key_pem("a").public_key_pem("b");

		assert!(matches!(
			AuthConfig::builder().public_key_pem("b").build(),
			Err(ConfigError::MissingPrivateKey)
		));
		assert!(matches!(
			AuthConfig::builder().private_key_pem("a").build(),
			Err(ConfigError::MissingPublicKey)
		));
		assert!(matches!(base().timeout_minutes(0).build(), Err(ConfigError::NonPositiveTimeout)));
		assert!(matches!(
			base().timeout_minutes(u64::MAX).build(),
			Err(ConfigError::TimeoutOutOfRange { .. })
		));
		assert!(matches!(base().issuer(" ").build(), Err(ConfigError::EmptyIssuer)));
		assert!(matches!(base().audience("").build(), Err(ConfigError::EmptyAudience)));
	}

	#[test]
	fn settings_resolve_home_relative_paths() {
		let dir = temp_dir();

		fs::write(dir.join("keys/private.pem"), TEST_PRIVATE_KEY)
			.expect("Failed to write private key fixture.");
		fs::write(dir.join("keys/public.pem"), TEST_PUBLIC_KEY)
			.expect("Failed to write public key fixture.");

		let settings = AuthSettings::from_json(
			br#"{"private_key":"~/keys/private.pem","public_key":"keys/public.pem","timeout":15,"issuer":"urn:demo"}"#,
		)
		.expect("Settings should parse.");
		let config = settings.load(&dir).expect("Settings should load key files.");

		assert_eq!(config.timeout, Duration::minutes(15));
		assert_eq!(config.issuer, "urn:demo");
		assert_eq!(config.audience, DEFAULT_AUDIENCE);
		assert_eq!(config.private_key, TEST_PRIVATE_KEY.as_bytes());

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn settings_report_missing_files_and_bad_json() {
		let settings = AuthSettings::from_json(
			br#"{"private_key":"/nonexistent/private.pem","public_key":"/nonexistent/public.pem"}"#,
		)
		.expect("Settings should parse.");

		assert!(matches!(
			settings.load(Path::new("/")),
			Err(ConfigError::ReadKey { path, .. }) if path == Path::new("/nonexistent/private.pem")
		));

		let err = AuthSettings::from_json(br#"{"private_key":"a","public_key":"b","timeout":"x"}"#)
			.expect_err("Invalid timeout must be rejected.");

		match err {
			ConfigError::Settings(inner) => assert_eq!(inner.path().to_string(), "timeout"),
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
