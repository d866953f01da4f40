//! Client configuration and the host settings it is read from.

// std
use std::time::Duration as StdDuration;
// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, error::ConfigError};

/// Settings key holding the request timeout in whole seconds.
pub const DEFAULT_TIMEOUT_KEY: &str = "DefaultTimeout";

/// Connection settings owned by one [`RestClient`](crate::RestClient).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL every resource path is resolved against; required before any request.
	pub base_url: Option<Url>,
	/// Per-request timeout; `None` leaves reqwest's default (no timeout).
	pub timeout: Option<StdDuration>,
}
impl ClientConfig {
	/// Sets the base URL.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Sets the request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Validates and parses a base URL supplied by the host.
	pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
		if raw.trim().is_empty() {
			return Err(ConfigError::EmptyBaseUrl);
		}

		let url = Url::parse(raw.trim())
			.map_err(|source| ConfigError::InvalidBaseUrl { url: raw.to_owned(), source })?;

		if url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl {
				url: raw.to_owned(),
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		Ok(url)
	}

	/// Reads [`DEFAULT_TIMEOUT_KEY`] from host settings.
	///
	/// Accepts a JSON integer or a string holding one; the value must be a positive number
	/// of seconds. Anything else yields `None`.
	pub fn timeout_from_settings(settings: &HashMap<String, Value>) -> Option<StdDuration> {
		let seconds = match settings.get(DEFAULT_TIMEOUT_KEY)? {
			Value::Number(number) => number.as_u64(),
			Value::String(text) => text.trim().parse::<u64>().ok(),
			_ => None,
		};

		seconds.filter(|secs| *secs > 0).map(StdDuration::from_secs)
	}
}
