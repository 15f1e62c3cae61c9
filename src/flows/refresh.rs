//! Standalone refresh-token grant.
//!
//! [`Strategy::refresh_access_token`] is decoupled from the login flow: it never touches the
//! pending state set or the framework channels, and its failures go straight back to the caller.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::ProtocolError,
	flows::{
		Strategy,
		common::{self, Body},
	},
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderEndpoint,
};

#[derive(Deserialize)]
struct RefreshResponse {
	access_token: Option<TokenSecret>,
}

impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Exchanges `refresh_token` for a new access token.
	pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::Refresh;
		const ENDPOINT: ProviderEndpoint = ProviderEndpoint::AccessToken;

		let span = FlowSpan::new(KIND, "refresh_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let authorization = self.require_credentials()?.basic_authorization();
				let body = self
					.call_json(
						ENDPOINT,
						Method::POST,
						&authorization,
						Body::Form(vec![
							("grant_type", "refresh_token".into()),
							("refresh_token", refresh_token.into()),
						]),
					)
					.await?;

				common::reject_error_field(ENDPOINT, &body)?;

				let message = common::provider_message(&body);
				let RefreshResponse { access_token } = common::decode(ENDPOINT, body)?;

				access_token.ok_or_else(|| {
					ProtocolError::MissingField { endpoint: ENDPOINT, field: "access_token", message }
						.into()
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
