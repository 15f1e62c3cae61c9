#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_opskins::{
	_preludet::*,
	auth::{ClientCredentials, UserIdentity, basic_authorization},
	provider::ProviderEndpoint,
};

const CLIENT_ID: &str = "client-refresh";
const CLIENT_SECRET: &str = "secret-refresh";

fn strategy(server: &MockServer) -> ReqwestTestStrategy<UserIdentity> {
	let (strategy, _) = build_reqwest_test_strategy(
		&server.base_url(),
		test_options().build().expect("Test options should validate."),
		|identity: UserIdentity| async move { Ok::<_, BoxError>(identity) },
	);

	strategy.with_credentials(ClientCredentials::new(CLIENT_ID, CLIENT_SECRET))
}

#[tokio::test]
async fn refresh_returns_new_access_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/access_token")
				.header("authorization", basic_authorization(CLIENT_ID, CLIENT_SECRET))
				.body("grant_type=refresh_token&refresh_token=refresh-1");
			then.status(200).json_body(json!({ "access_token": "NEW", "expires_in": 1800 }));
		})
		.await;
	let strategy = strategy(&server);
	let token =
		strategy.refresh_access_token("refresh-1").await.expect("Refresh should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(token.expose(), "NEW");
	assert!(strategy.pending_states().is_empty(), "Refresh never touches pending states.");
}

#[tokio::test]
async fn refresh_error_field_is_returned() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/access_token");
			then.status(400).json_body(json!({ "error": "bad_grant" }));
		})
		.await;
	let strategy = strategy(&server);
	let err = strategy
		.refresh_access_token("revoked")
		.await
		.expect_err("Provider errors should be returned to the caller.");

	mock.assert_calls_async(1).await;

	match err {
		Error::Provider { endpoint, reason } => {
			assert_eq!(endpoint, ProviderEndpoint::AccessToken);
			assert_eq!(reason, "bad_grant");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn refresh_requires_registered_client() {
	let server = MockServer::start_async().await;
	let (strategy, _) = build_reqwest_test_strategy(
		&server.base_url(),
		test_options().build().expect("Test options should validate."),
		|identity: UserIdentity| async move { Ok::<_, BoxError>(identity) },
	);
	let err = strategy
		.refresh_access_token("refresh")
		.await
		.expect_err("Refresh needs client credentials.");

	assert!(matches!(err, Error::NotReady));
}
