//! Request-time authentication strategies.
//!
//! A strategy turns the raw `Authorization` header of an inbound request into an
//! [`AuthenticatedIdentity`] or an error carrying the HTTP status to respond with. The two
//! built-in strategies are distinct types wired explicitly by the caller; neither ever stands
//! in for the other.

pub mod basic;
pub mod bearer;

pub use basic::*;
pub use bearer::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthenticatedIdentity, AuthenticationType},
};

/// Boxed future returned by [`AuthStrategy::authenticate`].
pub type StrategyFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AuthenticatedIdentity>> + 'a + Send>>;

/// Strategy hook resolving an `Authorization` header into an identity.
pub trait AuthStrategy: Send + Sync {
	/// Scheme this strategy accepts.
	fn scheme(&self) -> AuthenticationType;

	/// Authenticates the raw header value (`None` when the header is absent).
	fn authenticate<'a>(&'a self, authorization: Option<&'a str>) -> StrategyFuture<'a>;
}
