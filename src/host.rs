//! Host framework contract.
//!
//! A host calls [`Strategy::authenticate`] once per request with anything implementing
//! [`AuthRequest`]. The strategy answers with an [`AuthOutcome`], which the host either matches on
//! directly or hands to its own [`AuthChannels`] implementation via [`AuthOutcome::dispatch`].
//! After a successful exchange the strategy passes the [`UserIdentity`] to the host's
//! [`VerifyIdentity`] callback, which decides what user value (if any) the login produces.
//!
//! [`Strategy::authenticate`]: crate::flows::Strategy::authenticate

// crates.io
use oauth2::http::Request as HttpRequest;
// self
use crate::{_prelude::*, auth::UserIdentity, obs::FlowStage};

/// Boxed future returned by [`VerifyIdentity::verify`].
pub type VerifyFuture<'a, U> = Pin<Box<dyn Future<Output = Result<U, BoxError>> + 'a + Send>>;

/// Read access to the incoming request.
pub trait AuthRequest {
	/// Request path, without the query string.
	fn path(&self) -> &str;

	/// Raw query string, without the leading `?`.
	fn query(&self) -> Option<&str>;
}
impl AuthRequest for Url {
	fn path(&self) -> &str {
		Url::path(self)
	}

	fn query(&self) -> Option<&str> {
		Url::query(self)
	}
}
impl<B> AuthRequest for HttpRequest<B> {
	fn path(&self) -> &str {
		self.uri().path()
	}

	fn query(&self) -> Option<&str> {
		self.uri().query()
	}
}

/// Framework channels a finished attempt is reported through.
pub trait AuthChannels<U> {
	/// Sends the browser to `url`.
	fn redirect(&mut self, url: Url);

	/// Completes the login with `user`.
	fn success(&mut self, user: U);

	/// Silent authentication failure (debug off).
	fn fail(&mut self, err: Error);

	/// Visible error (debug on).
	fn error(&mut self, err: Error);
}

/// Host callback turning an authenticated identity into the application's user value.
pub trait VerifyIdentity<U>
where
	Self: Send + Sync,
{
	/// Accepts or rejects `identity`; the strategy keeps no reference to it afterward.
	fn verify(&self, identity: UserIdentity) -> VerifyFuture<'_, U>;
}
impl<U, F, Fut> VerifyIdentity<U> for F
where
	F: Send + Sync + Fn(UserIdentity) -> Fut,
	Fut: 'static + Send + Future<Output = Result<U, BoxError>>,
{
	fn verify(&self, identity: UserIdentity) -> VerifyFuture<'_, U> {
		Box::pin(self(identity))
	}
}

/// Result of a single [`Strategy::authenticate`] call.
///
/// [`Strategy::authenticate`]: crate::flows::Strategy::authenticate
#[derive(Debug)]
pub enum AuthOutcome<U> {
	/// The request did not hit the callback path; send the browser to the provider.
	Redirect(Url),
	/// The host accepted the identity.
	Success(U),
	/// Silent failure, used when debug mode is off.
	Fail(Error),
	/// Visible failure, used when debug mode is on.
	Error(Error),
}
impl<U> AuthOutcome<U> {
	/// Final state-machine stage this outcome represents.
	pub fn stage(&self) -> FlowStage {
		match self {
			AuthOutcome::Redirect(_) => FlowStage::AwaitingRedirect,
			AuthOutcome::Success(_) => FlowStage::Success,
			AuthOutcome::Fail(Error::NotReady) | AuthOutcome::Error(Error::NotReady) =>
				FlowStage::NoCredentials,
			AuthOutcome::Fail(_) | AuthOutcome::Error(_) => FlowStage::Failed,
		}
	}

	/// Returns the failure carried by the outcome, if any.
	pub fn err(&self) -> Option<&Error> {
		match self {
			AuthOutcome::Fail(err) | AuthOutcome::Error(err) => Some(err),
			_ => None,
		}
	}

	/// Reports the outcome through the matching framework channel.
	pub fn dispatch<Ch>(self, channels: &mut Ch)
	where
		Ch: ?Sized + AuthChannels<U>,
	{
		match self {
			AuthOutcome::Redirect(url) => channels.redirect(url),
			AuthOutcome::Success(user) => channels.success(user),
			AuthOutcome::Fail(err) => channels.fail(err),
			AuthOutcome::Error(err) => channels.error(err),
		}
	}
}
