//! Callback handling: state validation, code exchange, and profile fetch.
//!
//! The steps run strictly in order and stop at the first failure. An unknown state never reaches
//! the token endpoint, and a rejected token exchange never reaches the profile endpoint.

// crates.io
use oauth2::http::Method;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessGrant, TokenSecret, UserIdentity},
	error::ProtocolError,
	flows::{
		Strategy,
		common::{self, Body},
	},
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, FlowStage},
	provider::ProviderEndpoint,
};

/// Query parameters the provider appends to the return URL.
#[derive(Debug, Default)]
struct CallbackParams {
	state: Option<String>,
	code: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}
impl CallbackParams {
	fn parse(query: Option<&str>) -> Self {
		let mut params = Self::default();

		for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
			let slot = match key.as_ref() {
				"state" => &mut params.state,
				"code" => &mut params.code,
				"error" => &mut params.error,
				"error_description" => &mut params.error_description,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		params
	}
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: TokenSecret,
	#[serde(default)]
	refresh_token: Option<TokenSecret>,
	#[serde(flatten)]
	extra: JsonMap<String, JsonValue>,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
	#[serde(default)]
	response: Option<JsonMap<String, JsonValue>>,
}

impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Completes a login from the callback query string and returns the authenticated identity.
	///
	/// The state token is consumed by this call whether or not the rest of the exchange
	/// succeeds.
	pub async fn complete_callback(&self, query: Option<&str>) -> Result<UserIdentity> {
		const KIND: FlowKind = FlowKind::Callback;

		let span = FlowSpan::new(KIND, "complete_callback");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.require_credentials()?;
				obs::record_stage(KIND, FlowStage::AwaitingCallback);

				let params = CallbackParams::parse(query);

				match params.state.as_deref() {
					Some(state) if self.states.consume(state) => {},
					_ => return Err(Error::Csrf),
				}

				if let Some(reason) = params.error.filter(|error| !error.is_empty()) {
					let reason = match params.error_description {
						Some(description) if !description.is_empty() =>
							format!("{reason}: {description}"),
						_ => reason,
					};

					return Err(Error::Provider { endpoint: ProviderEndpoint::Authorize, reason });
				}

				let code = params.code.filter(|code| !code.is_empty()).ok_or(
					ProtocolError::MissingField {
						endpoint: ProviderEndpoint::Authorize,
						field: "code",
						message: None,
					},
				)?;

				obs::record_stage(KIND, FlowStage::ExchangingCode);

				let access = self.exchange_code(code).await?;

				obs::record_stage(KIND, FlowStage::FetchingProfile);

				let profile = self.fetch_profile(&access.access_token).await?;

				Ok(UserIdentity::new(profile, access))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange_code(&self, code: String) -> Result<AccessGrant> {
		const ENDPOINT: ProviderEndpoint = ProviderEndpoint::AccessToken;

		let authorization = self.require_credentials()?.basic_authorization();
		let body = self
			.call_json(
				ENDPOINT,
				Method::POST,
				&authorization,
				Body::Form(vec![
					("grant_type", "authorization_code".into()),
					("code", code.clone()),
				]),
			)
			.await?;

		common::reject_error_field(ENDPOINT, &body)?;

		if body.get("access_token").is_none_or(JsonValue::is_null) {
			return Err(ProtocolError::MissingField {
				endpoint: ENDPOINT,
				field: "access_token",
				message: common::provider_message(&body),
			}
			.into());
		}

		let TokenResponse { access_token, refresh_token, mut extra } =
			common::decode(ENDPOINT, body)?;

		extra.remove("code");

		Ok(AccessGrant { access_token, refresh_token, code, extra })
	}

	async fn fetch_profile(&self, access_token: &TokenSecret) -> Result<JsonMap<String, JsonValue>> {
		const ENDPOINT: ProviderEndpoint = ProviderEndpoint::Profile;

		let body = self
			.call_json(ENDPOINT, Method::GET, &access_token.bearer_authorization(), Body::Empty)
			.await?;

		common::reject_error_field(ENDPOINT, &body)?;

		let message = common::provider_message(&body);
		let ProfileEnvelope { response } = common::decode(ENDPOINT, body)?;

		response.ok_or_else(|| {
			ProtocolError::MissingField { endpoint: ENDPOINT, field: "response", message }.into()
		})
	}
}
