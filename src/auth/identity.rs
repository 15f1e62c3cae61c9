//! Identity handed to the host application after a successful login.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Token exchange result embedded in a [`UserIdentity`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessGrant {
	/// Access token issued by the token endpoint.
	pub access_token: TokenSecret,
	/// Refresh token, when the provider issued one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Authorization code the grant was exchanged from.
	pub code: String,
	/// Remaining token response fields (`token_type`, `expires_in`, ...).
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}

/// Authenticated provider identity: the profile fields plus the grant that fetched them.
///
/// Serializes flat, e.g. `{"id":1,"username":"A","access":{"access_token":...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
	/// Profile fields returned by the provider.
	#[serde(flatten)]
	pub profile: JsonMap<String, JsonValue>,
	/// Grant used to fetch the profile.
	pub access: AccessGrant,
}
impl UserIdentity {
	/// Merges a profile object with its access grant.
	///
	/// A provider-supplied `access` profile field is dropped in favor of the grant.
	pub fn new(mut profile: JsonMap<String, JsonValue>, access: AccessGrant) -> Self {
		profile.remove("access");

		Self { profile, access }
	}

	/// Returns a profile field by name.
	pub fn get(&self, field: &str) -> Option<&JsonValue> {
		self.profile.get(field)
	}

	/// Provider user id, when present.
	pub fn id(&self) -> Option<&JsonValue> {
		self.get("id")
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn grant() -> AccessGrant {
		AccessGrant {
			access_token: TokenSecret::new("T"),
			refresh_token: Some(TokenSecret::new("R")),
			code: "C".into(),
			extra: JsonMap::new(),
		}
	}

	#[test]
	fn identity_serializes_flat_with_access() {
		let profile = json!({ "id": 1, "name": "A" });
		let JsonValue::Object(profile) = profile else { unreachable!() };
		let identity = UserIdentity::new(profile, grant());

		assert_eq!(identity.id(), Some(&json!(1)));
		assert_eq!(
			serde_json::to_value(&identity).expect("Identities should serialize."),
			json!({
				"id": 1,
				"name": "A",
				"access": { "access_token": "T", "refresh_token": "R", "code": "C" },
			})
		);
	}

	#[test]
	fn profile_access_field_is_replaced_by_grant() {
		let JsonValue::Object(profile) = json!({ "id": 7, "access": "spoofed" }) else {
			unreachable!()
		};
		let identity = UserIdentity::new(profile, grant());

		assert!(identity.get("access").is_none());
		assert_eq!(identity.access.code, "C");
	}
}
