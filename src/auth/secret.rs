//! Redacted wrapper for API keys, client secrets, and provider tokens.

// self
use crate::_prelude::*;

/// Sensitive string that never prints its value through `Debug` or `Display`.
///
/// Serializes as the bare string so persisted client records keep the provider's
/// `{"client_id": .., "secret": ".."}` shape.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw value. Never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Authorization` header value presenting this secret as a bearer token.
	pub fn bearer_authorization(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(<redacted>)")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
