//! Strategy-level error types shared across flows, registration, and stores.

// self
use crate::{
	_prelude::*,
	provider::{ProviderEndpoint, ProviderEndpointsError},
};

/// Strategy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type used for transport sources and host callback rejections.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical strategy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Client store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider answered with a body that is not the JSON shape we expect.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	/// Provider answered with an explicit `error` field or a non-success status.
	#[error("Provider rejected the {endpoint} request: {reason}.")]
	Provider {
		/// Endpoint that produced the rejection.
		endpoint: ProviderEndpoint,
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Callback state is missing, unknown, or expired.
	#[error("Authentication did not originate on this server.")]
	Csrf,
	/// Client credentials have not been registered yet.
	#[error("OAuth client credentials are not registered yet.")]
	NotReady,
	/// Host verify callback refused the identity.
	#[error("Host application rejected the authenticated identity.")]
	Rejected {
		/// Error returned by the host callback.
		#[source]
		source: BoxError,
	},
}
impl From<ProviderEndpointsError> for Error {
	fn from(e: ProviderEndpointsError) -> Self {
		Self::Config(e.into())
	}
}
impl Error {
	/// Wraps a host callback failure.
	pub fn rejected(src: impl Into<BoxError>) -> Self {
		Self::Rejected { source: src.into() }
	}
}

/// Configuration and validation failures raised at construction time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required constructor option was not supplied.
	#[error("Missing `{field}` option; `name`, `return_url`, and `api_key` are required.")]
	MissingField {
		/// Name of the missing option.
		field: &'static str,
	},
	/// The configured return URL cannot be parsed.
	#[error("Return URL is invalid.")]
	InvalidReturnUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Provider host overrides failed validation.
	#[error(transparent)]
	InvalidEndpoints(#[from] ProviderEndpointsError),
	/// A provider endpoint cannot be derived from the configured base URL.
	#[error("Provider endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative path that failed to join.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: ProviderEndpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {endpoint} endpoint.")]
	Io {
		/// Endpoint being called.
		endpoint: ProviderEndpoint,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: ProviderEndpoint,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Malformed provider responses.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Response body is not valid JSON.
	#[error("The {endpoint} endpoint returned an invalid JSON response.")]
	InvalidJson {
		/// Endpoint that produced the body.
		endpoint: ProviderEndpoint,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Response body is JSON but does not match the expected shape.
	#[error("The {endpoint} endpoint returned an unexpected JSON shape.")]
	UnexpectedShape {
		/// Endpoint that produced the body.
		endpoint: ProviderEndpoint,
		/// Structured decoding failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A field the flow depends on is absent.
	#[error("The {endpoint} response is missing `{field}`{}.", describe_message(.message))]
	MissingField {
		/// Endpoint that produced the body.
		endpoint: ProviderEndpoint,
		/// Missing field name.
		field: &'static str,
		/// Provider `message`, when supplied.
		message: Option<String>,
	},
}

fn describe_message(message: &Option<String>) -> String {
	match message {
		Some(message) => format!(" ({message})"),
		None => String::new(),
	}
}
