//! Shared helpers for flow implementations (request building, JSON decoding, error fields).

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ProtocolError},
	flows::Strategy,
	http::{self, ProviderHttpClient},
	provider::ProviderEndpoint,
};

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Request body variants used by provider calls.
pub(crate) enum Body {
	Empty,
	Form(Vec<(&'static str, String)>),
	Json(JsonValue),
}

impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Sends a request to `endpoint` and decodes the body as JSON, regardless of HTTP status.
	pub(crate) async fn call_json(
		&self,
		endpoint: ProviderEndpoint,
		method: Method,
		authorization: &str,
		body: Body,
	) -> Result<JsonValue> {
		let url = self.endpoints.url(endpoint)?;
		let request = build_request(endpoint, &url, method, authorization, body)?;
		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|err| http::map_transport_error(endpoint, err))?;

		read_json(endpoint, &response)
	}
}

pub(crate) fn build_request(
	endpoint: ProviderEndpoint,
	url: &Url,
	method: Method,
	authorization: &str,
	body: Body,
) -> Result<HttpRequest> {
	let builder = oauth2::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(ACCEPT, "application/json")
		.header(AUTHORIZATION, authorization);
	let request = match body {
		Body::Empty => builder.body(Vec::new()),
		Body::Form(pairs) => builder
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.body(FormSerializer::new(String::new()).extend_pairs(pairs).finish().into_bytes()),
		Body::Json(value) => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(
			serde_json::to_vec(&value)
				.map_err(|source| ProtocolError::InvalidJson { endpoint, source })?,
		),
	};

	request.map_err(|e| ConfigError::from(e).into())
}

pub(crate) fn read_json(endpoint: ProviderEndpoint, response: &HttpResponse) -> Result<JsonValue> {
	serde_json::from_slice(response.body())
		.map_err(|source| ProtocolError::InvalidJson { endpoint, source }.into())
}

/// Decodes `value` into `T`, reporting the JSON path of any mismatch.
pub(crate) fn decode<T>(endpoint: ProviderEndpoint, value: JsonValue) -> Result<T>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value)
		.map_err(|source| ProtocolError::UnexpectedShape { endpoint, source }.into())
}

/// Fails when the body carries a truthy `error` field.
pub(crate) fn reject_error_field(endpoint: ProviderEndpoint, body: &JsonValue) -> Result<()> {
	match error_reason(body) {
		Some(reason) => Err(Error::Provider { endpoint, reason }),
		None => Ok(()),
	}
}

/// Extracts the provider's `error` (and `error_description`) as a reason string.
///
/// `null`, `false`, `0`, and `""` count as "no error".
pub(crate) fn error_reason(body: &JsonValue) -> Option<String> {
	let reason = match body.get("error")? {
		JsonValue::Null | JsonValue::Bool(false) => return None,
		JsonValue::Number(n) if n.as_f64() == Some(0.0) => return None,
		JsonValue::String(s) if s.is_empty() => return None,
		JsonValue::String(s) => s.clone(),
		other => other.to_string(),
	};

	match body.get("error_description").and_then(JsonValue::as_str) {
		Some(description) if !description.is_empty() => Some(format!("{reason}: {description}")),
		_ => Some(reason),
	}
}

/// Provider-supplied `message` field, used to enrich protocol errors.
pub(crate) fn provider_message(body: &JsonValue) -> Option<String> {
	body.get("message").and_then(JsonValue::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn error_reason_follows_truthiness() {
		assert_eq!(error_reason(&json!({ "error": "x" })), Some("x".into()));
		assert_eq!(
			error_reason(&json!({ "error": "invalid_grant", "error_description": "expired" })),
			Some("invalid_grant: expired".into())
		);
		assert_eq!(error_reason(&json!({ "error": 5 })), Some("5".into()));
		assert_eq!(error_reason(&json!({ "error": null })), None);
		assert_eq!(error_reason(&json!({ "error": "" })), None);
		assert_eq!(error_reason(&json!({ "error": 0 })), None);
		assert_eq!(error_reason(&json!({ "access_token": "T" })), None);
	}

	#[test]
	fn form_requests_are_urlencoded() {
		let url = Url::parse("https://oauth.example.com/v1/access_token").expect("Fixture URL.");
		let request = build_request(
			ProviderEndpoint::AccessToken,
			&url,
			Method::POST,
			"Basic abc",
			Body::Form(vec![("grant_type", "authorization_code".into()), ("code", "a b&c".into())]),
		)
		.expect("Form requests should build.");

		assert_eq!(request.method(), &Method::POST);
		assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
		assert_eq!(request.headers()[AUTHORIZATION], "Basic abc");
		assert_eq!(request.body().as_slice(), b"grant_type=authorization_code&code=a+b%26c");
	}

	#[test]
	fn non_json_bodies_are_protocol_errors() {
		let response = HttpResponse::new(b"<html>".to_vec());
		let err = read_json(ProviderEndpoint::Profile, &response)
			.expect_err("HTML bodies should be rejected.");

		assert!(matches!(
			err,
			Error::Protocol(ProtocolError::InvalidJson { endpoint: ProviderEndpoint::Profile, .. })
		));
	}

	#[test]
	fn decode_reports_offending_path() {
		#[derive(Debug, Deserialize)]
		struct Envelope {
			#[allow(dead_code)]
			response: Inner,
		}
		#[derive(Debug, Deserialize)]
		struct Inner {
			#[allow(dead_code)]
			clients: Vec<String>,
		}

		let err = decode::<Envelope>(
			ProviderEndpoint::OwnedClientList,
			json!({ "response": { "clients": [1] } }),
		)
		.expect_err("Numbers are not strings.");

		match err {
			Error::Protocol(ProtocolError::UnexpectedShape { source, .. }) =>
				assert_eq!(source.path().to_string(), "response.clients[0]"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
