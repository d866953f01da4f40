//! Transport primitives for REST calls.
//!
//! [`ReqwestHttpClient`] wraps the reqwest client built from a [`ClientConfig`] and turns
//! raw responses into [`ResponseEnvelope`] values so callers never see reqwest's response
//! type. [`resolve_resource`] joins resource paths onto the configured base URL.

mod envelope;

pub use envelope::*;

// std
use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	client::ClientConfig,
	error::{ConfigError, TransportError},
};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the timeout in `config`.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.timeout {
			builder = builder.timeout(timeout);
		}

		builder.build().map(Self).map_err(ConfigError::http_client_build)
	}

	/// Sends `request` and maps the response into a [`ResponseEnvelope`].
	///
	/// Non-success statuses are returned as envelopes; only failures to complete the
	/// exchange (connect, DNS, TLS, timeout, body read) are errors.
	pub async fn execute(&self, request: ReqwestRequest) -> Result<ResponseEnvelope, TransportError> {
		let response = self.0.execute(request).await?;

		ResponseEnvelope::from_response(response).await
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Resolves `resource` against `base`.
///
/// Absolute `http`/`https` resources are used as-is. Otherwise the resource path is
/// appended to the base path with exactly one `/` between them, and a query string on the
/// resource replaces the base query.
pub fn resolve_resource(base: &Url, resource: &str) -> Result<Url, ConfigError> {
	if let Some(absolute) = Url::parse(resource)
		.ok()
		.filter(|absolute| matches!(absolute.scheme(), "http" | "https"))
	{
		return Ok(absolute);
	}
	if base.cannot_be_a_base() {
		return Err(ConfigError::InvalidResource {
			resource: resource.to_owned(),
			source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
		});
	}

	let (path, query) = match resource.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (resource, None),
	};
	let path = path.trim_start_matches('/');
	let mut url = base.clone();

	if !path.is_empty() {
		url.set_path(&format!("{}/{path}", base.path().trim_end_matches('/')));
	}
	if query.is_some() {
		url.set_query(query);
	}

	url.set_fragment(None);

	Ok(url)
}
