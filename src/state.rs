//! Anti-forgery state tokens bound to in-flight login attempts.
//!
//! Every redirect to the provider registers a fresh token in [`PendingStates`]. The callback must
//! present one of them; a token is consumed by its first matching callback and is dead after
//! [`STATE_TTL`] regardless. Expiry is checked lazily on lookup, and expired entries are swept on
//! every issue so abandoned attempts cannot grow the set without bound.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

/// Lifetime of a pending state token.
pub const STATE_TTL: Duration = Duration::minutes(10);

const STATE_LEN: usize = 32;

/// Thread-safe set of pending state tokens with per-entry expiry.
#[derive(Debug)]
pub struct PendingStates {
	ttl: Duration,
	entries: Mutex<HashMap<String, OffsetDateTime>>,
}
impl PendingStates {
	/// Creates an empty set using [`STATE_TTL`].
	pub fn new() -> Self {
		Self::with_ttl(STATE_TTL)
	}

	/// Creates an empty set with a custom lifetime.
	pub fn with_ttl(ttl: Duration) -> Self {
		Self { ttl, entries: Mutex::new(HashMap::new()) }
	}

	/// Lifetime applied to newly issued tokens.
	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Issues a new token valid from now.
	pub fn issue(&self) -> String {
		self.issue_at(OffsetDateTime::now_utc())
	}

	/// Issues a new token valid from `now`, sweeping entries that expired before it.
	pub fn issue_at(&self, now: OffsetDateTime) -> String {
		let state = random_state();
		let mut entries = self.entries.lock();

		entries.retain(|_, expires_at| *expires_at > now);
		entries.insert(state.clone(), now + self.ttl);

		state
	}

	/// Consumes `state` if it is pending and unexpired as of now.
	pub fn consume(&self, state: &str) -> bool {
		self.consume_at(state, OffsetDateTime::now_utc())
	}

	/// Consumes `state` if it is pending and unexpired as of `now`.
	///
	/// The entry is removed either way, so an expired token can never be revived.
	pub fn consume_at(&self, state: &str, now: OffsetDateTime) -> bool {
		self.entries.lock().remove(state).is_some_and(|expires_at| expires_at > now)
	}

	/// Returns `true` if `state` is pending and unexpired as of now.
	pub fn contains(&self, state: &str) -> bool {
		self.contains_at(state, OffsetDateTime::now_utc())
	}

	/// Returns `true` if `state` is pending and unexpired as of `now`.
	pub fn contains_at(&self, state: &str, now: OffsetDateTime) -> bool {
		self.entries.lock().get(state).is_some_and(|expires_at| *expires_at > now)
	}

	/// Drops every entry that expired as of `now`, returning how many were removed.
	pub fn sweep_at(&self, now: OffsetDateTime) -> usize {
		let mut entries = self.entries.lock();
		let before = entries.len();

		entries.retain(|_, expires_at| *expires_at > now);

		before - entries.len()
	}

	/// Number of tracked entries, including ones that expired but were not swept yet.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Returns `true` when no entries are tracked.
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}
impl Default for PendingStates {
	fn default() -> Self {
		Self::new()
	}
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
