//! HTTP Basic authenticator.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
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

/// Adds `Authorization: Basic <base64(username:password)>` to every request.
#[derive(Clone, Debug)]
pub struct BasicAuthenticator {
	username: String,
	password: Secret,
	header: HeaderValue,
}
impl BasicAuthenticator {
	pub(crate) const EXPECTED: &'static str = "a (username, password) tuple with non-empty values";

	/// Creates the authenticator, rejecting blank usernames or passwords.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
		let username = username.into();
		let password = Secret::new(password);

		if username.trim().is_empty() || password.expose().trim().is_empty() {
			return Err(ConfigError::InvalidOptions { auth_type: "Basic", expected: Self::EXPECTED });
		}

		let encoded = STANDARD.encode(format!("{username}:{}", password.expose()));
		// Base64 output is plain ASCII, so this only fails on a logic error.
		let header = authorization_value("Basic", &encoded)
			.map_err(|_| ConfigError::InvalidHeaderValue { auth_type: "Basic" })?;

		Ok(Self { username, password, header })
	}

	/// Username sent with every request.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// Password sent with every request.
	pub fn password(&self) -> &Secret {
		&self.password
	}
}
impl Authenticator for BasicAuthenticator {
	fn authenticate<'a>(&'a self, request: &'a mut ReqwestRequest) -> AuthFuture<'a> {
		set_authorization(request, self.header.clone());

		Box::pin(async { Ok(()) })
	}

	fn kind(&self) -> &'static str {
		"basic"
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::strategy::{authorization_of, test_request};

	#[tokio::test]
	async fn encodes_credentials_as_base64() {
		let authenticator =
			BasicAuthenticator::new("user", "pass").expect("Credentials should be accepted.");
		let mut request = test_request();

		authenticator.authenticate(&mut request).await.expect("Basic authentication is infallible.");

		assert_eq!(authorization_of(&request), Some("Basic dXNlcjpwYXNz"));
	}

	#[tokio::test]
	async fn encodes_utf8_credentials() {
		let authenticator =
			BasicAuthenticator::new("jürgen", "pässword").expect("Credentials should be accepted.");
		let mut request = test_request();

		authenticator.authenticate(&mut request).await.expect("Basic authentication is infallible.");

		let expected = format!("Basic {}", STANDARD.encode("jürgen:pässword".as_bytes()));

		assert_eq!(authorization_of(&request), Some(expected.as_str()));
	}

	#[test]
	fn rejects_blank_credentials() {
		assert!(BasicAuthenticator::new("", "pass").is_err());
		assert!(BasicAuthenticator::new("user", " ").is_err());
	}
}
