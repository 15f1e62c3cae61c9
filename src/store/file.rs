//! File-backed [`ClientStore`] keeping registered clients across restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::RegisteredClient,
	store::{ClientSnapshot, ClientStore, StoreError, StoreFuture},
};

/// Persists registered clients to a JSON file shaped as `{"clients": [...]}`.
///
/// The file is re-read on every load so several processes sharing it observe each other's
/// registrations. An absent, empty, or corrupt file reads as "no clients"; appending to a corrupt
/// file starts a fresh snapshot. Entries that are valid JSON but not client records are skipped
/// on load and kept on append.
#[derive(Clone, Debug)]
pub struct FileClientStore {
	path: PathBuf,
	write_lock: Arc<Mutex<()>>,
}
impl FileClientStore {
	/// Opens a store at the provided path, creating its parent directory on demand.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path, write_lock: Default::default() })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_snapshot(path: &Path) -> Result<ClientSnapshot, StoreError> {
		if !path.exists() {
			return Ok(ClientSnapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(ClientSnapshot::default());
		}

		Ok(serde_json::from_slice(&bytes).unwrap_or_else(|_e| {
			#[cfg(feature = "tracing")]
			tracing::warn!(path = %path.display(), error = %_e, "Ignoring corrupt client store.");

			ClientSnapshot::default()
		}))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, snapshot: &ClientSnapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize client snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl ClientStore for FileClientStore {
	fn load(&self) -> StoreFuture<'_, Vec<RegisteredClient>> {
		Box::pin(async move {
			let snapshot = Self::read_snapshot(&self.path).unwrap_or_else(|_e| {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "Client store is unreadable; treating it as empty.");

				ClientSnapshot::default()
			});

			Ok(snapshot.registered_clients())
		})
	}

	fn append(&self, client: RegisteredClient) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let _guard = self.write_lock.lock();
			let mut snapshot = Self::read_snapshot(&self.path)?;

			snapshot.push(&client)?;
			self.persist(&snapshot)
		})
	}
}
