// self
use crate::_prelude::*;

/// Provider endpoints the strategy talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderEndpoint {
	/// `POST /IOAuth/CreateClient/v1/`.
	CreateClient,
	/// `GET /IOAuth/GetOwnedClientList/v1/`.
	OwnedClientList,
	/// `POST /IOAuth/DeleteClient/v1/`.
	DeleteClient,
	/// `GET /v1/authorize` on the OAuth host.
	Authorize,
	/// `POST /v1/access_token` on the OAuth host.
	AccessToken,
	/// `GET /IUser/GetProfile/v1/`.
	Profile,
}
impl ProviderEndpoint {
	/// Returns a stable label suitable for errors and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderEndpoint::CreateClient => "create_client",
			ProviderEndpoint::OwnedClientList => "owned_client_list",
			ProviderEndpoint::DeleteClient => "delete_client",
			ProviderEndpoint::Authorize => "authorize",
			ProviderEndpoint::AccessToken => "access_token",
			ProviderEndpoint::Profile => "profile",
		}
	}

	/// Path relative to the host the endpoint lives on.
	pub const fn path(self) -> &'static str {
		match self {
			ProviderEndpoint::CreateClient => "IOAuth/CreateClient/v1/",
			ProviderEndpoint::OwnedClientList => "IOAuth/GetOwnedClientList/v1/",
			ProviderEndpoint::DeleteClient => "IOAuth/DeleteClient/v1/",
			ProviderEndpoint::Authorize => "v1/authorize",
			ProviderEndpoint::AccessToken => "v1/access_token",
			ProviderEndpoint::Profile => "IUser/GetProfile/v1/",
		}
	}

	/// Returns `true` when the endpoint is served by the OAuth host rather than the API host.
	pub const fn on_oauth_host(self) -> bool {
		matches!(self, ProviderEndpoint::Authorize | ProviderEndpoint::AccessToken)
	}
}
impl Display for ProviderEndpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
