//! The OPSkins login strategy and the flows it drives.
//!
//! [`Strategy`] owns the configuration, transport, client store, pending state set, and the host's
//! verify callback. Each flow lives in its own submodule as an `impl` block:
//!
//! - `registration`: reconcile persisted OAuth clients with the provider (create or reuse).
//! - `login`: issue a state token and build the authorize redirect.
//! - `callback`: validate state, exchange the code, fetch the profile.
//! - `authenticate`: per-request driver routing between the two and into framework channels.
//! - `refresh`: standalone refresh-token grant.

pub mod authenticate;
pub mod callback;
mod common;
pub mod login;
pub mod refresh;
pub mod registration;

pub use login::*;
pub use registration::*;

// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	config::StrategyConfig,
	host::VerifyIdentity,
	http::ProviderHttpClient,
	provider::ProviderEndpoints,
	state::PendingStates,
	store::ClientStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Name the strategy registers under in the host framework.
pub const STRATEGY_NAME: &str = "opskins";

#[cfg(feature = "reqwest")]
/// Strategy specialized for the crate's default reqwest transport.
pub type ReqwestStrategy<U> = Strategy<U, ReqwestHttpClient>;

/// OAuth 2.0 authorization code login against OPSkins.
///
/// Cloning is cheap: clones share the transport, store, credentials, and pending states, so a
/// state issued through one clone is accepted by a callback handled through another.
pub struct Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Validated configuration.
	pub config: Arc<StrategyConfig>,
	/// Provider hosts.
	pub endpoints: ProviderEndpoints,
	/// HTTP client used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Store persisting registered OAuth clients.
	pub store: Arc<dyn ClientStore>,
	verify: Arc<dyn VerifyIdentity<U>>,
	credentials: Arc<OnceCell<ClientCredentials>>,
	states: Arc<PendingStates>,
}
impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Creates a strategy that reuses the caller-provided transport.
	///
	/// Credentials start unset; call [`Strategy::register_client`] (or supply them with
	/// [`Strategy::with_credentials`]) before serving logins.
	pub fn with_http_client(
		config: StrategyConfig,
		endpoints: ProviderEndpoints,
		store: Arc<dyn ClientStore>,
		http_client: impl Into<Arc<C>>,
		verify: impl 'static + VerifyIdentity<U>,
	) -> Self {
		Self {
			config: Arc::new(config),
			endpoints,
			http_client: http_client.into(),
			store,
			verify: Arc::new(verify),
			credentials: Default::default(),
			states: Default::default(),
		}
	}

	/// Uses known client credentials instead of registering through the provider API.
	pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
		self.credentials = Arc::new(OnceCell::from(credentials));

		self
	}

	/// Replaces the pending state set (e.g., to use a custom lifetime).
	pub fn with_pending_states(mut self, states: PendingStates) -> Self {
		self.states = Arc::new(states);

		self
	}

	/// Framework-facing strategy name.
	pub fn name(&self) -> &'static str {
		STRATEGY_NAME
	}

	/// Registered client credentials, if registration has completed.
	pub fn credentials(&self) -> Option<&ClientCredentials> {
		self.credentials.get()
	}

	/// Returns `true` once client credentials are available.
	pub fn is_ready(&self) -> bool {
		self.credentials.is_initialized()
	}

	/// Waits until client credentials become available.
	pub async fn ready(&self) -> &ClientCredentials {
		self.credentials.wait().await
	}

	/// Pending anti-forgery states issued by this strategy and its clones.
	pub fn pending_states(&self) -> &PendingStates {
		&self.states
	}

	pub(crate) fn require_credentials(&self) -> Result<&ClientCredentials> {
		self.credentials.get().ok_or(Error::NotReady)
	}
}
#[cfg(feature = "reqwest")]
impl<U> Strategy<U, ReqwestHttpClient> {
	/// Creates a strategy against the public OPSkins hosts using a redirect-free reqwest client.
	pub fn new(
		config: StrategyConfig,
		store: Arc<dyn ClientStore>,
		verify: impl 'static + VerifyIdentity<U>,
	) -> Result<Self> {
		Ok(Self::with_http_client(
			config,
			ProviderEndpoints::opskins()?,
			store,
			ReqwestHttpClient::new()?,
			verify,
		))
	}
}
impl<U, C> Clone for Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			endpoints: self.endpoints.clone(),
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			verify: self.verify.clone(),
			credentials: self.credentials.clone(),
			states: self.states.clone(),
		}
	}
}
impl<U, C> Debug for Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Strategy")
			.field("config", &self.config)
			.field("endpoints", &self.endpoints)
			.field("client_id", &self.credentials.get().map(|creds| creds.client_id.as_str()))
			.field("pending_states", &self.states.len())
			.finish()
	}
}
