//! Auth-domain identifiers, scope sets, principals, and token models.

pub mod client;
pub mod credential;
pub mod id;
pub mod identity;
pub mod scope;
pub mod token;
pub mod user;

pub use client::*;
pub use credential::*;
pub use id::*;
pub use identity::*;
pub use scope::*;
pub use token::{claims::*, envelope::*, record::*, secret::*};
pub use user::*;
