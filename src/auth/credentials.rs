//! OAuth client credentials and the persisted client records they come from.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Client id/secret pair used for HTTP Basic authentication against the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
}
impl ClientCredentials {
	/// Creates a new credential pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: TokenSecret::new(client_secret) }
	}

	/// Builds the `Authorization: Basic ...` header value for token endpoint calls.
	pub fn basic_authorization(&self) -> String {
		basic_authorization(&self.client_id, self.client_secret.expose())
	}
}
impl From<&RegisteredClient> for ClientCredentials {
	fn from(client: &RegisteredClient) -> Self {
		Self { client_id: client.client_id.clone(), client_secret: client.secret.clone() }
	}
}

/// Client record as returned by the provider and persisted by a [`ClientStore`].
///
/// Fields the strategy does not interpret (name, redirect URI, timestamps, etc.) are kept in
/// `extra` so persisted records round-trip untouched.
///
/// [`ClientStore`]: crate::store::ClientStore
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisteredClient {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub secret: TokenSecret,
	/// Remaining provider fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl RegisteredClient {
	/// Creates a record without extra provider fields.
	pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), secret: TokenSecret::new(secret), extra: JsonMap::new() }
	}
}

/// Formats `user:password` as an HTTP Basic authorization header value.
pub fn basic_authorization(user: &str, password: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}
