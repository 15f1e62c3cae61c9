//! OPSkins OAuth 2.0 login strategy: state-guarded authorization code flow, client
//! registration, and refresh helpers that plug into a host web framework's request lifecycle.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod host;
pub mod http;
pub mod obs;
pub mod provider;
pub mod state;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{StrategyConfig, StrategyOptions},
		flows::Strategy,
		http::ReqwestHttpClient,
		provider::ProviderEndpoints,
		store::{ClientStore, MemoryClientStore},
	};

	/// Strategy type alias used by reqwest-backed integration tests.
	pub type ReqwestTestStrategy<U> = Strategy<U, ReqwestHttpClient>;

	/// API key used by the mock provider fixtures.
	pub const TEST_API_KEY: &str = "api-key-it";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Points both provider hosts at the same mock server base URL.
	pub fn test_endpoints(base_url: &str) -> ProviderEndpoints {
		let base = Url::parse(base_url).expect("Mock server base URL should parse successfully.");

		ProviderEndpoints::builder()
			.api_base(base.clone())
			.oauth_base(base)
			.build()
			.expect("Loopback mock endpoints should pass validation.")
	}

	/// Returns options for a strategy whose callback lives at `/auth/opskins/return`.
	pub fn test_options() -> StrategyOptions {
		StrategyOptions::default()
			.name("integration-site")
			.return_url("https://app.example.com/auth/opskins/return")
			.api_key(TEST_API_KEY)
	}

	/// Constructs a [`Strategy`] backed by an in-memory client store, the provided config, and
	/// the reqwest transport used across integration tests.
	pub fn build_reqwest_test_strategy<U, V>(
		base_url: &str,
		config: StrategyConfig,
		verify: V,
	) -> (ReqwestTestStrategy<U>, Arc<MemoryClientStore>)
	where
		U: 'static + Send,
		V: 'static + crate::host::VerifyIdentity<U>,
	{
		let store_backend = Arc::new(MemoryClientStore::default());
		let store: Arc<dyn ClientStore> = store_backend.clone();
		let strategy = Strategy::with_http_client(
			config,
			test_endpoints(base_url),
			store,
			test_reqwest_http_client(),
			verify,
		);

		(strategy, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::OnceCell;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{BoxError, Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
