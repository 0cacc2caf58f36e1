//! RS256 token codec.
//!
//! The private key signs, the public key verifies. Verification covers the signature only;
//! expiry is judged by the introspection flow so callers can tell forged tokens from stale
//! ones internally without exposing the difference.

// std
use std::collections::HashSet;
// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
// self
use crate::{
	_prelude::*,
	auth::{TokenClaims, TokenSecret},
};

/// Errors raised while loading keys or processing tokens.
#[derive(Debug, ThisError)]
pub enum CodecError {
	/// A PEM key could not be parsed.
	#[error("The {which} key is not a valid RSA PEM key.")]
	InvalidKey {
		/// Which half of the key pair failed.
		which: &'static str,
		/// Underlying parser failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Signing failed.
	#[error("Failed to sign token claims.")]
	Sign(#[source] jsonwebtoken::errors::Error),
	/// Signature or payload verification failed.
	#[error("Token verification failed.")]
	Verify(#[source] jsonwebtoken::errors::Error),
}

/// Signs and verifies bearer tokens with an RSA key pair.
#[derive(Clone)]
pub struct TokenCodec {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
}
impl TokenCodec {
	const ALGORITHM: Algorithm = Algorithm::RS256;

	/// Parses a PEM-encoded private/public key pair.
	pub fn from_pem(private_key: &[u8], public_key: &[u8]) -> Result<Self, CodecError> {
		let encoding = EncodingKey::from_rsa_pem(private_key)
			.map_err(|source| CodecError::InvalidKey { which: "private", source })?;
		let decoding = DecodingKey::from_rsa_pem(public_key)
			.map_err(|source| CodecError::InvalidKey { which: "public", source })?;
		let mut validation = Validation::new(Self::ALGORITHM);

		validation.validate_exp = false;
		validation.validate_nbf = false;
		validation.validate_aud = false;
		validation.required_spec_claims = HashSet::new();

		Ok(Self { encoding, decoding, validation })
	}

	/// Signs the claim set.
	pub fn sign(&self, claims: &TokenClaims) -> Result<TokenSecret, CodecError> {
		let token = jsonwebtoken::encode(&Header::new(Self::ALGORITHM), claims, &self.encoding)
			.map_err(CodecError::Sign)?;

		Ok(TokenSecret::new(token))
	}

	/// Verifies the signature and decodes the claims. Expiry is not checked.
	pub fn verify(&self, token: &str) -> Result<TokenClaims, CodecError> {
		jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
			.map(|data| data.claims)
			.map_err(CodecError::Verify)
	}
}
impl Debug for TokenCodec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCodec").field("algorithm", &Self::ALGORITHM).finish()
	}
}
