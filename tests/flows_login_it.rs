#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_opskins::{
	_preludet::*,
	auth::{ClientCredentials, UserIdentity, basic_authorization},
	config::StrategyConfig,
	error::ProtocolError,
	host::AuthOutcome,
	obs::FlowStage,
	provider::ProviderEndpoint,
};

const CLIENT_ID: &str = "client-login";
const CLIENT_SECRET: &str = "secret-login";
const RETURN_URL: &str = "https://app.example.com/auth/opskins/return";

fn config(debug: bool) -> StrategyConfig {
	test_options().debug(debug).build().expect("Test options should validate.")
}

fn registered_strategy(server: &MockServer, debug: bool) -> ReqwestTestStrategy<UserIdentity> {
	let (strategy, _) = build_reqwest_test_strategy(
		&server.base_url(),
		config(debug),
		|identity: UserIdentity| async move { Ok::<_, BoxError>(identity) },
	);

	strategy.with_credentials(ClientCredentials::new(CLIENT_ID, CLIENT_SECRET))
}

fn request(path_and_query: &str) -> Url {
	Url::parse("https://app.example.com")
		.and_then(|base| base.join(path_and_query))
		.expect("Request URL should parse.")
}

async fn begin_login<U>(strategy: &ReqwestTestStrategy<U>) -> String
where
	U: Debug,
{
	match strategy.authenticate(&request("/auth/opskins")).await {
		AuthOutcome::Redirect(location) => location
			.query_pairs()
			.find(|(key, _)| key == "state")
			.map(|(_, value)| value.into_owned())
			.expect("Authorize URL should carry a state."),
		other => panic!("Expected a redirect, got {other:?}."),
	}
}

fn callback(state: &str, code: &str) -> Url {
	let mut url = Url::parse(RETURN_URL).expect("Return URL should parse.");

	url.query_pairs_mut().append_pair("state", state).append_pair("code", code);

	url
}

#[tokio::test]
async fn non_callback_paths_redirect_to_authorize() {
	let server = MockServer::start_async().await;
	let strategy = registered_strategy(&server, false);
	let outcome = strategy.authenticate(&request("/auth/opskins?next=/home")).await;

	assert_eq!(outcome.stage(), FlowStage::AwaitingRedirect);

	let AuthOutcome::Redirect(location) = outcome else {
		panic!("Non-callback requests should redirect.");
	};
	let pairs: HashMap<_, _> = location.query_pairs().into_owned().collect();

	assert!(location.as_str().starts_with(&server.url("/v1/authorize")));
	assert_eq!(pairs.get("client_id"), Some(&CLIENT_ID.into()));
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("scope"), Some(&"identity".into()));
	assert!(strategy.pending_states().contains(&pairs["state"]));
}

#[tokio::test]
async fn successful_callback_yields_identity() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/access_token")
				.header("authorization", basic_authorization(CLIENT_ID, CLIENT_SECRET))
				.header("content-type", "application/x-www-form-urlencoded")
				.body("grant_type=authorization_code&code=code-1");
			then.status(200).json_body(json!({ "access_token": "T", "refresh_token": "R" }));
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/IUser/GetProfile/v1/").header("authorization", "Bearer T");
			then.status(200).json_body(json!({ "status": 1, "response": { "id": 1, "name": "A" } }));
		})
		.await;
	let strategy = registered_strategy(&server, false);
	let state = begin_login(&strategy).await;
	let outcome = strategy.authenticate(&callback(&state, "code-1")).await;

	token.assert_calls_async(1).await;
	profile.assert_calls_async(1).await;

	assert_eq!(outcome.stage(), FlowStage::Success);

	let AuthOutcome::Success(identity) = outcome else {
		panic!("The login should succeed.");
	};

	assert_eq!(
		serde_json::to_value(&identity).expect("Identities should serialize."),
		json!({
			"id": 1,
			"name": "A",
			"access": { "access_token": "T", "refresh_token": "R", "code": "code-1" },
		})
	);

	let replay = strategy.authenticate(&callback(&state, "code-1")).await;

	assert!(matches!(replay, AuthOutcome::Fail(Error::Csrf)), "States are single-use.");
	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn unknown_state_never_reaches_token_endpoint() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/access_token");
			then.status(200).json_body(json!({ "access_token": "T" }));
		})
		.await;
	let strategy = registered_strategy(&server, false);

	begin_login(&strategy).await;

	for target in [callback("forged", "code"), request("/auth/opskins/return?code=code")] {
		let outcome = strategy.authenticate(&target).await;

		assert!(matches!(outcome, AuthOutcome::Fail(Error::Csrf)), "Unexpected outcome: {outcome:?}.");
	}

	token.assert_calls_async(0).await;
	assert_eq!(strategy.pending_states().len(), 1, "Forged states must not consume real ones.");
}

#[tokio::test]
async fn debug_mode_routes_failures_to_error_channel() {
	let server = MockServer::start_async().await;
	let strategy = registered_strategy(&server, true);

	begin_login(&strategy).await;

	let outcome = strategy.authenticate(&callback("forged", "code")).await;

	assert!(matches!(outcome, AuthOutcome::Error(Error::Csrf)), "Unexpected outcome: {outcome:?}.");
	assert_eq!(outcome.stage(), FlowStage::Failed);
}

#[tokio::test]
async fn token_error_field_stops_before_profile() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/access_token");
			then.status(400).json_body(json!({ "error": "x" }));
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/IUser/GetProfile/v1/");
			then.status(200).json_body(json!({ "response": { "id": 1 } }));
		})
		.await;
	let strategy = registered_strategy(&server, false);
	let state = begin_login(&strategy).await;
	let outcome = strategy.authenticate(&callback(&state, "code")).await;

	token.assert_calls_async(1).await;
	profile.assert_calls_async(0).await;

	match outcome {
		AuthOutcome::Fail(Error::Provider { endpoint, reason }) => {
			assert_eq!(endpoint, ProviderEndpoint::AccessToken);
			assert_eq!(reason, "x");
		},
		other => panic!("Unexpected outcome: {other:?}."),
	}
}

#[tokio::test]
async fn profile_without_response_is_a_protocol_error() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/access_token");
			then.status(200).json_body(json!({ "access_token": "T" }));
		})
		.await;
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/IUser/GetProfile/v1/");
			then.status(200).json_body(json!({ "status": 0, "message": "Account locked" }));
		})
		.await;
	let strategy = registered_strategy(&server, true);
	let state = begin_login(&strategy).await;
	let outcome = strategy.authenticate(&callback(&state, "code")).await;

	match outcome {
		AuthOutcome::Error(Error::Protocol(ProtocolError::MissingField {
			endpoint: ProviderEndpoint::Profile,
			field: "response",
			message,
		})) => assert_eq!(message.as_deref(), Some("Account locked")),
		other => panic!("Unexpected outcome: {other:?}."),
	}
}

#[tokio::test]
async fn provider_denial_on_callback_is_reported() {
	let server = MockServer::start_async().await;
	let strategy = registered_strategy(&server, true);
	let state = begin_login(&strategy).await;
	let target = request(&format!(
		"/auth/opskins/return?state={state}&error=access_denied&error_description=User+cancelled"
	));
	let outcome = strategy.authenticate(&target).await;

	match outcome {
		AuthOutcome::Error(Error::Provider { endpoint: ProviderEndpoint::Authorize, reason }) =>
			assert_eq!(reason, "access_denied: User cancelled"),
		other => panic!("Unexpected outcome: {other:?}."),
	}
}

#[tokio::test]
async fn verify_rejection_is_routed_as_failure() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/access_token");
			then.status(200).json_body(json!({ "access_token": "T" }));
		})
		.await;
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/IUser/GetProfile/v1/");
			then.status(200).json_body(json!({ "response": { "id": 9 } }));
		})
		.await;
	let (strategy, _) = build_reqwest_test_strategy(
		&server.base_url(),
		config(false),
		|identity: UserIdentity| async move {
			Err::<u64, BoxError>(format!("user {} is banned", identity.profile["id"]).into())
		},
	);
	let strategy = strategy.with_credentials(ClientCredentials::new(CLIENT_ID, CLIENT_SECRET));
	let state = begin_login(&strategy).await;
	let outcome = strategy.authenticate(&callback(&state, "code")).await;

	match outcome {
		AuthOutcome::Fail(err @ Error::Rejected { .. }) => assert_eq!(
			StdError::source(&err).map(ToString::to_string),
			Some("user 9 is banned".into())
		),
		other => panic!("Unexpected outcome: {other:?}."),
	}
}

#[tokio::test]
async fn unregistered_strategy_rejects_requests() {
	let server = MockServer::start_async().await;
	let (strategy, _) = build_reqwest_test_strategy(
		&server.base_url(),
		config(false),
		|identity: UserIdentity| async move { Ok::<_, BoxError>(identity) },
	);

	for target in [request("/auth/opskins"), callback("any", "code")] {
		let outcome = strategy.authenticate(&target).await;

		assert!(matches!(outcome, AuthOutcome::Fail(Error::NotReady)), "Unexpected outcome: {outcome:?}.");
		assert_eq!(outcome.stage(), FlowStage::NoCredentials);
	}

	assert!(strategy.pending_states().is_empty());
}
