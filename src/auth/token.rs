//! Token models: signed claims, caller envelopes, persisted records, and redacted secrets.

pub mod claims;
pub mod envelope;
pub mod record;
pub mod secret;
