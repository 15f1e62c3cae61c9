//! Strategy configuration surface.
//!
//! [`StrategyOptions`] mirrors the constructor options a host passes in (and can be deserialized
//! straight from a config file); [`StrategyConfig`] is the validated, immutable form the strategy
//! keeps for its lifetime.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Scope requested when the host does not configure one.
pub const DEFAULT_SCOPES: &str = "identity";

/// Raw constructor options; every field is optional until validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
	/// Display name registered with the provider for the OAuth client.
	pub name: Option<String>,
	/// Absolute callback URL the provider redirects back to.
	#[serde(alias = "returnURL")]
	pub return_url: Option<String>,
	/// Provider API key used for client registration calls.
	#[serde(alias = "apiKey")]
	pub api_key: Option<String>,
	/// Space-delimited scope string.
	pub scopes: Option<String>,
	/// Suppresses the provider's mobile UI chrome.
	pub mobile: bool,
	/// Requests a non-expiring grant.
	pub permanent: bool,
	/// Routes failures to the visible error channel instead of the silent one.
	pub debug: bool,
}
impl StrategyOptions {
	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the callback URL.
	pub fn return_url(mut self, url: impl Into<String>) -> Self {
		self.return_url = Some(url.into());

		self
	}

	/// Sets the provider API key.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());

		self
	}

	/// Overrides the requested scopes.
	pub fn scopes(mut self, scopes: impl Into<String>) -> Self {
		self.scopes = Some(scopes.into());

		self
	}

	/// Toggles mobile UI suppression.
	pub fn mobile(mut self, mobile: bool) -> Self {
		self.mobile = mobile;

		self
	}

	/// Toggles the permanent grant flag.
	pub fn permanent(mut self, permanent: bool) -> Self {
		self.permanent = permanent;

		self
	}

	/// Toggles debug routing.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;

		self
	}

	/// Validates the options into a [`StrategyConfig`].
	pub fn build(self) -> Result<StrategyConfig, ConfigError> {
		StrategyConfig::try_from(self)
	}
}

/// Validated, immutable strategy configuration.
#[derive(Clone, Debug)]
pub struct StrategyConfig {
	/// Display name registered with the provider.
	pub name: String,
	/// Absolute callback URL.
	pub return_url: Url,
	/// Provider API key; callers must avoid logging it.
	pub api_key: TokenSecret,
	/// Space-delimited scope string.
	pub scopes: String,
	/// Suppresses the provider's mobile UI chrome.
	pub mobile: bool,
	/// Requests a non-expiring grant.
	pub permanent: bool,
	/// Routes failures to the visible error channel.
	pub debug: bool,
}
impl StrategyConfig {
	/// Returns an empty options builder.
	pub fn builder() -> StrategyOptions {
		StrategyOptions::default()
	}

	/// Path component of the callback URL, compared against incoming request paths.
	pub fn return_path(&self) -> &str {
		self.return_url.path()
	}
}
impl TryFrom<StrategyOptions> for StrategyConfig {
	type Error = ConfigError;

	fn try_from(options: StrategyOptions) -> Result<Self, Self::Error> {
		let name = required("name", options.name)?;
		let return_url = required("return_url", options.return_url)?;
		let api_key = required("api_key", options.api_key)?;
		let return_url =
			Url::parse(&return_url).map_err(|source| ConfigError::InvalidReturnUrl { source })?;
		let scopes = options
			.scopes
			.filter(|scopes| !scopes.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_SCOPES.into());

		Ok(Self {
			name,
			return_url,
			api_key: TokenSecret::new(api_key),
			scopes,
			mobile: options.mobile,
			permanent: options.permanent,
			debug: options.debug,
		})
	}
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value.filter(|value| !value.is_empty()).ok_or(ConfigError::MissingField { field })
}
