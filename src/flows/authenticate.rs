//! Per-request driver: routes a request to a redirect or to the callback exchange.

// self
use crate::{
	_prelude::*,
	flows::Strategy,
	host::{AuthOutcome, AuthRequest},
	http::ProviderHttpClient,
	obs::{self, FlowKind, FlowStage},
};

impl<U, C> Strategy<U, C>
where
	C: ?Sized + ProviderHttpClient,
{
	/// Handles one framework request.
	///
	/// Requests outside the return path start a new login and yield [`AuthOutcome::Redirect`].
	/// Requests on the return path complete the callback and pass the identity to the host's
	/// verify callback. Failures never escape as `Err`: they are routed to
	/// [`AuthOutcome::Error`] in debug mode and to [`AuthOutcome::Fail`] (after being logged)
	/// otherwise.
	pub async fn authenticate<R>(&self, request: &R) -> AuthOutcome<U>
	where
		R: ?Sized + AuthRequest,
	{
		if !self.is_ready() {
			return self.route_failure(FlowKind::Login, Error::NotReady);
		}
		if request.path() != self.config.return_path() {
			return match self.start_login() {
				Ok(redirect) => AuthOutcome::Redirect(redirect.authorize_url),
				Err(e) => self.route_failure(FlowKind::Login, e),
			};
		}

		let identity = match self.complete_callback(request.query()).await {
			Ok(identity) => identity,
			Err(e) => return self.route_failure(FlowKind::Callback, e),
		};

		match self.verify.verify(identity).await {
			Ok(user) => {
				obs::record_stage(FlowKind::Callback, FlowStage::Success);

				AuthOutcome::Success(user)
			},
			Err(e) => self.route_failure(FlowKind::Callback, Error::rejected(e)),
		}
	}

	fn route_failure(&self, kind: FlowKind, err: Error) -> AuthOutcome<U> {
		let stage =
			if matches!(err, Error::NotReady) { FlowStage::NoCredentials } else { FlowStage::Failed };

		obs::record_stage(kind, stage);

		if self.config.debug {
			AuthOutcome::Error(err)
		} else {
			obs::log_failure(kind, &err);

			AuthOutcome::Fail(err)
		}
	}
}
