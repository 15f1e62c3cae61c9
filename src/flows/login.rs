//! Login initiation: issues a state token and builds the provider authorize URL.

// self
use crate::{
	_prelude::*,
	flows::Strategy,
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, FlowStage},
	provider::ProviderEndpoint,
};

/// Redirect produced for a login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRedirect {
	/// Anti-forgery token registered for this attempt.
	pub state: String,
	/// Provider authorize URL embedding the state, client id, scopes, and flags.
	pub authorize_url: Url,
}

impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Registers a fresh state token and returns the authorize redirect carrying it.
	pub fn start_login(&self) -> Result<LoginRedirect> {
		const KIND: FlowKind = FlowKind::Login;

		let _guard = FlowSpan::new(KIND, "start_login").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.authorize_redirect();

		match &result {
			Ok(_) => {
				obs::record_stage(KIND, FlowStage::AwaitingRedirect);
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn authorize_redirect(&self) -> Result<LoginRedirect> {
		let credentials = self.require_credentials()?;
		let mut authorize_url = self.endpoints.url(ProviderEndpoint::Authorize)?;
		let state = self.states.issue();

		{
			let mut query = authorize_url.query_pairs_mut();

			query
				.append_pair("state", &state)
				.append_pair("client_id", &credentials.client_id)
				.append_pair("response_type", "code")
				.append_pair("scope", &self.config.scopes);

			if self.config.mobile {
				query.append_pair("mobile", "1");
			}
			if self.config.permanent {
				query.append_pair("duration", "permanent");
			}
		}

		Ok(LoginRedirect { state, authorize_url })
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		auth::{ClientCredentials, UserIdentity},
		config::StrategyConfig,
	};

	fn strategy(config: StrategyConfig) -> ReqwestTestStrategy<JsonValue> {
		let (strategy, _) = build_reqwest_test_strategy(
			"https://oauth.example.com",
			config,
			|identity: UserIdentity| async move {
				Ok::<JsonValue, BoxError>(JsonValue::Object(identity.profile))
			},
		);

		strategy
	}

	#[test]
	fn login_requires_credentials() {
		let strategy = strategy(test_options().build().expect("Test options should validate."));
		let err = strategy.start_login().expect_err("Unregistered strategies cannot redirect.");

		assert!(matches!(err, Error::NotReady));
		assert!(strategy.pending_states().is_empty());
	}

	#[test]
	fn authorize_url_carries_state_and_flags() {
		let config = test_options()
			.scopes("identity trades")
			.mobile(true)
			.permanent(true)
			.build()
			.expect("Test options should validate.");
		let strategy =
			strategy(config).with_credentials(ClientCredentials::new("client-1", "secret-1"));
		let redirect = strategy.start_login().expect("Registered strategies should redirect.");
		let pairs = redirect.authorize_url.query_pairs().into_owned().collect::<Vec<_>>();

		assert_eq!(redirect.authorize_url.path(), "/v1/authorize");
		assert_eq!(pairs, [
			("state".to_owned(), redirect.state.clone()),
			("client_id".to_owned(), "client-1".to_owned()),
			("response_type".to_owned(), "code".to_owned()),
			("scope".to_owned(), "identity trades".to_owned()),
			("mobile".to_owned(), "1".to_owned()),
			("duration".to_owned(), "permanent".to_owned()),
		]);
		assert!(strategy.pending_states().contains(&redirect.state));
	}

	#[test]
	fn flags_are_omitted_when_disabled() {
		let strategy = strategy(test_options().build().expect("Test options should validate."))
			.with_credentials(ClientCredentials::new("client-1", "secret-1"));
		let first = strategy.start_login().expect("Registered strategies should redirect.");
		let second = strategy.start_login().expect("Registered strategies should redirect.");
		let query = first.authorize_url.query().unwrap_or_default();

		assert!(!query.contains("mobile"));
		assert!(!query.contains("duration"));
		assert_ne!(first.state, second.state);
		assert_eq!(strategy.pending_states().len(), 2);
	}
}
