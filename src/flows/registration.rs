//! OAuth client registration against the provider API.
//!
//! The strategy needs a client id/secret before it can serve any login. At startup the host
//! calls [`Strategy::register_client`], which reconciles the clients persisted in the
//! [`ClientStore`] with the ones the API key owns on the provider: a persisted client the provider
//! still knows is reused, otherwise a new client is created, persisted, and adopted. Stale
//! clients are never deleted here; [`Strategy::delete_client`] is available for explicit cleanup.
//!
//! [`ClientStore`]: crate::store::ClientStore

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	auth::{self, ClientCredentials, RegisteredClient},
	error::ProtocolError,
	flows::{
		Strategy,
		common::{self, Body},
	},
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderEndpoint,
};

const STATUS_OK: i64 = 1;

/// Client entry from the provider's owned-client listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnedClient {
	/// OAuth client identifier.
	pub client_id: String,
	/// Remaining provider fields (name, redirect URI, timestamps, ...).
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

#[derive(Deserialize)]
struct OwnedClientsEnvelope {
	response: OwnedClientsResponse,
}

#[derive(Deserialize)]
struct OwnedClientsResponse {
	#[serde(default)]
	clients: Vec<OwnedClient>,
}

#[derive(Deserialize)]
struct CreatedClientEnvelope {
	#[serde(default)]
	response: Option<CreatedClientResponse>,
}

#[derive(Deserialize)]
struct CreatedClientResponse {
	#[serde(default)]
	client: Option<JsonMap<String, JsonValue>>,
	#[serde(default)]
	secret: Option<String>,
}

impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Ensures client credentials are available, registering a client with the provider if
	/// needed.
	///
	/// Runs at most once: concurrent callers wait on the same attempt, and later callers get the
	/// cached credentials. A failed attempt is logged and leaves the strategy unregistered, so the
	/// host may call this again.
	pub async fn register_client(&self) -> Result<&ClientCredentials> {
		self.credentials.get_or_try_init(|| self.reconcile_client()).await
	}

	/// Lists the OAuth clients owned by the configured API key.
	pub async fn owned_clients(&self) -> Result<Vec<OwnedClient>> {
		const ENDPOINT: ProviderEndpoint = ProviderEndpoint::OwnedClientList;

		let body =
			self.call_json(ENDPOINT, Method::GET, &self.api_authorization(), Body::Empty).await?;

		ensure_status_ok(ENDPOINT, &body)?;

		let OwnedClientsEnvelope { response } = common::decode(ENDPOINT, body)?;

		Ok(response.clients)
	}

	/// Creates a new OAuth client named after the configured site, pointing at the return URL.
	///
	/// The returned record has the provider's `secret` merged into the client object, which is the
	/// shape persisted by client stores.
	pub async fn create_client(&self) -> Result<RegisteredClient> {
		const ENDPOINT: ProviderEndpoint = ProviderEndpoint::CreateClient;

		let payload = serde_json::json!({
			"name": self.config.name,
			"redirect_uri": self.config.return_url.as_str(),
		});
		let body = self
			.call_json(ENDPOINT, Method::POST, &self.api_authorization(), Body::Json(payload))
			.await?;

		common::reject_error_field(ENDPOINT, &body)?;

		let message = common::provider_message(&body);
		let missing = |field| ProtocolError::MissingField {
			endpoint: ENDPOINT,
			field,
			message: message.clone(),
		};
		let CreatedClientEnvelope { response } = common::decode(ENDPOINT, body)?;
		let CreatedClientResponse { client, secret } = response.ok_or_else(|| missing("response"))?;
		let mut client = client.ok_or_else(|| missing("client"))?;
		let secret = secret.filter(|secret| !secret.is_empty()).ok_or_else(|| missing("secret"))?;

		match client.get("client_id") {
			Some(JsonValue::String(id)) if !id.is_empty() => {},
			_ => return Err(missing("client_id").into()),
		}

		client.insert("secret".into(), JsonValue::String(secret));

		common::decode(ENDPOINT, JsonValue::Object(client))
	}

	/// Deletes an OAuth client owned by the configured API key.
	pub async fn delete_client(&self, client_id: &str) -> Result<()> {
		const ENDPOINT: ProviderEndpoint = ProviderEndpoint::DeleteClient;

		let result = async {
			let body = self
				.call_json(
					ENDPOINT,
					Method::POST,
					&self.api_authorization(),
					Body::Form(vec![("client_id", client_id.into())]),
				)
				.await?;

			common::reject_error_field(ENDPOINT, &body)?;

			if body.get("status").is_some() {
				ensure_status_ok(ENDPOINT, &body)?;
			}

			Ok(())
		}
		.await;

		if let Err(e) = &result {
			obs::log_failure(FlowKind::Registration, e);
		}

		result
	}

	async fn reconcile_client(&self) -> Result<ClientCredentials> {
		const KIND: FlowKind = FlowKind::Registration;

		let span = FlowSpan::new(KIND, "register_client");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let local = self.store.load().await?;
				let owned = self.owned_clients().await?;

				if let Some(existing) = local
					.iter()
					.rev()
					.find(|client| owned.iter().any(|remote| remote.client_id == client.client_id))
				{
					return Ok(ClientCredentials::from(existing));
				}

				let created = self.create_client().await?;

				self.store.append(created.clone()).await?;

				Ok(ClientCredentials::from(&created))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(e) => {
				obs::log_failure(KIND, e);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
			},
		}

		result
	}

	fn api_authorization(&self) -> String {
		auth::basic_authorization(self.config.api_key.expose(), "")
	}
}

fn ensure_status_ok(endpoint: ProviderEndpoint, body: &JsonValue) -> Result<()> {
	match body.get("status").and_then(JsonValue::as_i64) {
		Some(STATUS_OK) => Ok(()),
		status => Err(Error::Provider {
			endpoint,
			reason: common::provider_message(body).unwrap_or_else(|| match status {
				Some(status) => format!("unexpected status {status}"),
				None => "missing status".into(),
			}),
		}),
	}
}
