// self
use crate::{
	_prelude::*,
	provider::{DEFAULT_API_BASE, DEFAULT_OAUTH_BASE, ProviderEndpoints},
};

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Errors raised while constructing or validating provider endpoints.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderEndpointsError {
	/// A host URL cannot be parsed.
	#[error("The {endpoint} host is not a valid URL.")]
	InvalidUrl {
		/// Which host failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} host must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which host failed validation.
		endpoint: &'static str,
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URLs cannot carry a query string or fragment.
	#[error("The {endpoint} host must not carry a query or fragment: {url}.")]
	UnexpectedComponents {
		/// Which host failed validation.
		endpoint: &'static str,
		/// Base URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderEndpoints`] values.
#[derive(Debug)]
pub struct ProviderEndpointsBuilder {
	/// REST API host override.
	pub api_base: Option<Url>,
	/// OAuth host override.
	pub oauth_base: Option<Url>,
}
impl ProviderEndpointsBuilder {
	/// Creates a new builder without overrides.
	pub fn new() -> Self {
		Self { api_base: None, oauth_base: None }
	}

	/// Overrides the REST API host.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Overrides the OAuth host.
	pub fn oauth_base(mut self, url: Url) -> Self {
		self.oauth_base = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting endpoints.
	pub fn build(self) -> Result<ProviderEndpoints, ProviderEndpointsError> {
		let api_base = normalize_base(or_default("api", self.api_base, DEFAULT_API_BASE)?);
		let oauth_base = normalize_base(or_default("oauth", self.oauth_base, DEFAULT_OAUTH_BASE)?);

		validate_base("api", &api_base)?;
		validate_base("oauth", &oauth_base)?;

		Ok(ProviderEndpoints { api_base, oauth_base })
	}
}
impl Default for ProviderEndpointsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn or_default(
	name: &'static str,
	url: Option<Url>,
	default: &str,
) -> Result<Url, ProviderEndpointsError> {
	match url {
		Some(url) => Ok(url),
		None => Url::parse(default)
			.map_err(|source| ProviderEndpointsError::InvalidUrl { endpoint: name, source }),
	}
}

// Relative joins replace the last path segment unless the base ends with a slash.
fn normalize_base(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}

fn validate_base(name: &'static str, url: &Url) -> Result<(), ProviderEndpointsError> {
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ProviderEndpointsError::UnexpectedComponents {
			endpoint: name,
			url: url.to_string(),
		});
	}
	if url.scheme() == "https" || is_loopback(url) {
		Ok(())
	} else {
		Err(ProviderEndpointsError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	url.scheme() == "http" && url.host_str().is_some_and(|host| LOOPBACK_HOSTS.contains(&host))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::provider::ProviderEndpoint;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse endpoint fixture URL.")
	}

	#[test]
	fn defaults_match_public_hosts() {
		let endpoints = ProviderEndpoints::builder().build().expect("Defaults should validate.");

		assert_eq!(endpoints.api_base.as_str(), DEFAULT_API_BASE);
		assert_eq!(endpoints.oauth_base.as_str(), DEFAULT_OAUTH_BASE);
	}

	#[test]
	fn rejects_plain_http_for_remote_hosts() {
		let err = ProviderEndpoints::builder()
			.api_base(url("http://api.example.com/"))
			.build()
			.expect_err("Remote plain HTTP hosts should be rejected.");

		assert!(matches!(err, ProviderEndpointsError::InsecureEndpoint { endpoint: "api", .. }));
	}

	#[test]
	fn allows_loopback_http_and_appends_trailing_slash() {
		let endpoints = ProviderEndpoints::builder()
			.api_base(url("http://127.0.0.1:8080/mock"))
			.oauth_base(url("http://localhost:8080"))
			.build()
			.expect("Loopback hosts should be accepted over plain HTTP.");

		assert_eq!(
			endpoints
				.url(ProviderEndpoint::Profile)
				.expect("Profile endpoint should resolve.")
				.as_str(),
			"http://127.0.0.1:8080/mock/IUser/GetProfile/v1/"
		);
		assert_eq!(
			endpoints
				.url(ProviderEndpoint::AccessToken)
				.expect("Token endpoint should resolve.")
				.as_str(),
			"http://localhost:8080/v1/access_token"
		);
	}

	#[test]
	fn rejects_query_components() {
		let err = ProviderEndpoints::builder()
			.oauth_base(url("https://oauth.example.com/?tenant=1"))
			.build()
			.expect_err("Query strings on base URLs should be rejected.");

		assert!(matches!(err, ProviderEndpointsError::UnexpectedComponents { .. }));
	}
}
