//! Auth-domain models: redacted secrets, client credentials, and authenticated identities.

pub mod credentials;
pub mod identity;
pub mod secret;

pub use credentials::*;
pub use identity::*;
pub use secret::*;
