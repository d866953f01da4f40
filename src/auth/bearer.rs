//! Static bearer token authenticator.

// crates.io
use reqwest::header::HeaderValue;
// self
use crate::{
	_prelude::*,
	auth::{
		AuthFuture, Authenticator, Secret,
		strategy::{authorization_value, set_authorization},
	},
	error::ConfigError,
};

/// Adds `Authorization: Bearer <token>` to every request.
#[derive(Clone, Debug)]
pub struct BearerTokenAuthenticator {
	token: Secret,
	header: HeaderValue,
}
impl BearerTokenAuthenticator {
	pub(crate) const EXPECTED: &'static str = "a non-empty token string";

	/// Creates the authenticator, rejecting blank tokens and tokens that are not valid
	/// header text.
	pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
		let token = Secret::new(token);

		if token.expose().trim().is_empty() {
			return Err(ConfigError::InvalidOptions { auth_type: "Bearer", expected: Self::EXPECTED });
		}

		let header = authorization_value("Bearer", token.expose())
			.map_err(|_| ConfigError::InvalidHeaderValue { auth_type: "Bearer" })?;

		Ok(Self { token, header })
	}

	/// Token attached to requests.
	pub fn token(&self) -> &Secret {
		&self.token
	}
}
impl Authenticator for BearerTokenAuthenticator {
	fn authenticate<'a>(&'a self, request: &'a mut ReqwestRequest) -> AuthFuture<'a> {
		set_authorization(request, self.header.clone());

		Box::pin(async { Ok(()) })
	}

	fn kind(&self) -> &'static str {
		"bearer"
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::strategy::{authorization_of, test_request};

	#[tokio::test]
	async fn sets_bearer_header_verbatim() {
		let authenticator =
			BearerTokenAuthenticator::new("abc").expect("Non-empty token should be accepted.");
		let mut request = test_request();

		authenticator.authenticate(&mut request).await.expect("Bearer authentication is infallible.");

		assert_eq!(authorization_of(&request), Some("Bearer abc"));
	}

	#[test]
	fn rejects_blank_and_unrepresentable_tokens() {
		assert!(matches!(
			BearerTokenAuthenticator::new("   "),
			Err(ConfigError::InvalidOptions { auth_type: "Bearer", .. })
		));
		assert!(matches!(
			BearerTokenAuthenticator::new("abc\ndef"),
			Err(ConfigError::InvalidHeaderValue { auth_type: "Bearer" })
		));
	}

	#[test]
	fn debug_output_redacts_token() {
		let authenticator =
			BearerTokenAuthenticator::new("top-secret").expect("Token should be accepted.");

		assert!(!format!("{authenticator:?}").contains("top-secret"));
	}
}
