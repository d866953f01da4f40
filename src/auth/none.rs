//! Authenticator that leaves requests untouched.

// self
use crate::{
	_prelude::*,
	auth::{AuthFuture, Authenticator},
};

/// Performs no authentication; the default for every client.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuthenticator;
impl Authenticator for NoAuthenticator {
	fn authenticate<'a>(&'a self, _request: &'a mut ReqwestRequest) -> AuthFuture<'a> {
		Box::pin(async { Ok(()) })
	}

	fn kind(&self) -> &'static str {
		"none"
	}
}
