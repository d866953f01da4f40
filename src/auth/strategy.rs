//! The authenticator contract shared by built-in and custom strategies.

// crates.io
use reqwest::header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue};
// self
use crate::_prelude::*;

/// Boxed future returned by [`Authenticator::authenticate`].
pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;

/// Strategy that attaches credentials to an outgoing request.
///
/// The client calls [`authenticate`](Self::authenticate) once per request, after the URL,
/// method, and body are final and before anything is sent. An error aborts the request.
/// Implementations must be `Send + Sync` because one instance serves every request the
/// client issues until it is replaced.
pub trait Authenticator
where
	Self: Send + Sync,
{
	/// Mutates `request` so it carries this strategy's credentials.
	fn authenticate<'a>(&'a self, request: &'a mut ReqwestRequest) -> AuthFuture<'a>;

	/// Stable label used in spans and `Debug` output.
	fn kind(&self) -> &'static str {
		"custom"
	}
}

/// Builds a sensitive `Authorization` header value from a scheme and credentials.
pub(crate) fn authorization_value(
	scheme: &str,
	credentials: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
	let mut value = HeaderValue::from_str(&format!("{scheme} {credentials}"))?;

	value.set_sensitive(true);

	Ok(value)
}

/// Replaces any existing `Authorization` header on `request`.
pub(crate) fn set_authorization(request: &mut ReqwestRequest, value: HeaderValue) {
	request.headers_mut().insert(AUTHORIZATION, value);
}

#[cfg(test)]
pub(crate) fn test_request() -> ReqwestRequest {
	let url = Url::parse("https://api.example.com/v1/items").expect("Test URL should parse.");

	ReqwestRequest::new(reqwest::Method::GET, url)
}

#[cfg(test)]
pub(crate) fn authorization_of(request: &ReqwestRequest) -> Option<&str> {
	request.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}
