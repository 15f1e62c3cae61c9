//! Storage contracts and built-in backends for registered OAuth clients.

pub mod file;
pub mod memory;

pub use file::FileClientStore;
pub use memory::MemoryClientStore;

// self
use crate::{_prelude::*, auth::RegisteredClient};

/// Boxed future returned by [`ClientStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for clients the strategy registered with the provider.
pub trait ClientStore
where
	Self: Send + Sync,
{
	/// Loads every client persisted so far.
	///
	/// Missing or unreadable snapshots are reported as an empty list, never as an error.
	fn load(&self) -> StoreFuture<'_, Vec<RegisteredClient>>;

	/// Appends a newly created client.
	fn append(&self, client: RegisteredClient) -> StoreFuture<'_, ()>;
}

/// On-disk layout shared by persistent backends: `{"clients": [...]}`.
///
/// Entries stay raw JSON: an entry that does not decode as a [`RegisteredClient`] is skipped on
/// load and written back untouched on append. Unknown top-level keys are preserved as well.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSnapshot {
	/// Persisted client records in creation order.
	#[serde(default)]
	pub clients: Vec<JsonValue>,
	/// Remaining top-level fields.
	#[serde(flatten)]
	pub extra: JsonMap<String, JsonValue>,
}
impl ClientSnapshot {
	/// Decodes every entry shaped like a [`RegisteredClient`], skipping the others.
	pub fn registered_clients(&self) -> Vec<RegisteredClient> {
		self.clients
			.iter()
			.enumerate()
			.filter_map(|(_index, entry)| {
				serde_json::from_value(entry.clone())
					.map_err(|_e| {
						#[cfg(feature = "tracing")]
						tracing::warn!(
							index = _index,
							error = %_e,
							"Skipping malformed client store entry."
						);
					})
					.ok()
			})
			.collect()
	}

	/// Appends `client` after the existing entries.
	pub fn push(&mut self, client: &RegisteredClient) -> Result<(), StoreError> {
		let entry = serde_json::to_value(client).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize client {}: {e}", client.client_id),
		})?;

		self.clients.push(entry);

		Ok(())
	}
}

/// Error type produced by [`ClientStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
