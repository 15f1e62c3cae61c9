//! Thread-safe in-memory [`ClientStore`] implementation for tests and ephemeral deployments.

// self
use crate::{
	_prelude::*,
	auth::RegisteredClient,
	store::{ClientStore, StoreFuture},
};

/// Keeps registered clients in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryClientStore(Arc<RwLock<Vec<RegisteredClient>>>);
impl MemoryClientStore {
	/// Creates a store pre-seeded with `clients`.
	pub fn with_clients(clients: impl IntoIterator<Item = RegisteredClient>) -> Self {
		Self(Arc::new(RwLock::new(clients.into_iter().collect())))
	}

	/// Returns a copy of the stored clients.
	pub fn snapshot(&self) -> Vec<RegisteredClient> {
		self.0.read().clone()
	}
}
impl ClientStore for MemoryClientStore {
	fn load(&self) -> StoreFuture<'_, Vec<RegisteredClient>> {
		let clients = self.snapshot();

		Box::pin(async move { Ok(clients) })
	}

	fn append(&self, client: RegisteredClient) -> StoreFuture<'_, ()> {
		let inner = self.0.clone();

		Box::pin(async move {
			inner.write().push(client);

			Ok(())
		})
	}
}
