//! Provider-facing endpoint metadata.
//!
//! `endpoint` names every HTTP surface the strategy touches, and [`ProviderEndpoints`] holds the
//! two hosts those surfaces live on (the REST API host and the OAuth host). Both default to the
//! public OPSkins hosts; tests and staging deployments point them elsewhere via
//! [`ProviderEndpointsBuilder`].

/// Builder API for assembling provider endpoints.
pub mod builder;
/// Endpoint identifiers and their relative paths.
pub mod endpoint;

pub use builder::*;
pub use endpoint::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Default REST API host.
pub const DEFAULT_API_BASE: &str = "https://api.opskins.com/";
/// Default OAuth host.
pub const DEFAULT_OAUTH_BASE: &str = "https://oauth.opskins.com/";

/// Base URLs for the provider's API and OAuth hosts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// REST API host (client registration, profile).
	pub api_base: Url,
	/// OAuth host (authorize, access token).
	pub oauth_base: Url,
}
impl ProviderEndpoints {
	/// Creates a new builder seeded with the public OPSkins hosts.
	pub fn builder() -> ProviderEndpointsBuilder {
		ProviderEndpointsBuilder::new()
	}

	/// Endpoints for the public OPSkins hosts.
	pub fn opskins() -> Result<Self, ProviderEndpointsError> {
		ProviderEndpointsBuilder::new().build()
	}

	/// Resolves the absolute URL for `endpoint`.
	pub fn url(&self, endpoint: ProviderEndpoint) -> Result<Url, ConfigError> {
		let base = if endpoint.on_oauth_host() { &self.oauth_base } else { &self.api_base };

		base.join(endpoint.path())
			.map_err(|source| ConfigError::InvalidEndpoint { path: endpoint.path(), source })
	}
}
