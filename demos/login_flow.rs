//! Builds a strategy with known client credentials and prints the authorize redirect a host
//! would send the browser to, without contacting the provider.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use oauth2_opskins::{
	auth::{ClientCredentials, UserIdentity},
	config::StrategyConfig,
	error::BoxError,
	flows::ReqwestStrategy,
	store::{ClientStore, FileClientStore},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = StrategyConfig::builder()
		.name("Demo Site")
		.return_url("https://app.example.com/auth/opskins/return")
		.api_key("demo-api-key")
		.mobile(true)
		.build()?;
	let store: Arc<dyn ClientStore> =
		Arc::new(FileClientStore::open(env::temp_dir().join("oauth2_opskins_demo_clients.json"))?);
	let strategy = ReqwestStrategy::new(config, store, |identity: UserIdentity| async move {
		Ok::<_, BoxError>(identity.id().cloned())
	})?
	.with_credentials(ClientCredentials::new("demo-client", "demo-secret"));
	let redirect = strategy.start_login()?;

	println!("Strategy `{}` is ready: {}.", strategy.name(), strategy.is_ready());
	println!("Send your user to {}.", redirect.authorize_url);
	println!(
		"The callback must reach {} with state `{}` within {} minutes.",
		strategy.config.return_url,
		redirect.state,
		strategy.pending_states().ttl().whole_minutes()
	);

	Ok(())
}
