//! Optional observability helpers for strategy flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `oauth2_opskins.flow` with
//!   the `flow` and `stage` fields, stage-transition debug events, and error events for
//!   failures that are swallowed into the silent channel.
//! - Enable `metrics` to increment the `oauth2_opskins_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod tracing;

pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Redirect to the provider's authorize page.
	Login,
	/// Callback handling: state check, code exchange, profile fetch.
	Callback,
	/// Refresh token grant.
	Refresh,
	/// Client registration against the provider API.
	Registration,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Login => "login",
			FlowKind::Callback => "callback",
			FlowKind::Refresh => "refresh",
			FlowKind::Registration => "registration",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a strategy helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// States of the per-request login state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// Client credentials are not registered yet.
	NoCredentials,
	/// A redirect to the authorize page was issued.
	AwaitingRedirect,
	/// The callback arrived and its state is being checked.
	AwaitingCallback,
	/// The authorization code is being exchanged for tokens.
	ExchangingCode,
	/// The profile is being fetched with the new access token.
	FetchingProfile,
	/// The host accepted the identity.
	Success,
	/// The attempt ended in an error.
	Failed,
}
impl FlowStage {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::NoCredentials => "no_credentials",
			FlowStage::AwaitingRedirect => "awaiting_redirect",
			FlowStage::AwaitingCallback => "awaiting_callback",
			FlowStage::ExchangingCode => "exchanging_code",
			FlowStage::FetchingProfile => "fetching_profile",
			FlowStage::Success => "success",
			FlowStage::Failed => "failed",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Bumps `oauth2_opskins_flow_total{flow, outcome}`; a no-op without the `metrics` feature.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_opskins_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
