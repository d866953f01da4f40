//! Transport-independent response envelope.

// crates.io
use reqwest::{Response, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransportError};

/// Normalized result of an HTTP call, decoupled from reqwest's response type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
	/// HTTP status code.
	pub status_code: u16,
	/// Response body text; empty when the server sent none.
	pub body: String,
	/// `true` for 2xx statuses.
	pub is_success: bool,
	/// Response headers keyed by lowercase name; repeated headers are joined with `", "` in
	/// the order they were received.
	///
	/// A server's `X-Trace` is stored as `x-trace`; use [`header`](Self::header) to look up a
	/// name in any casing.
	pub headers: BTreeMap<String, String>,
}
impl ResponseEnvelope {
	/// Builds an envelope from already-read response parts.
	pub fn from_parts(status: StatusCode, headers: &HeaderMap, body: impl Into<String>) -> Self {
		Self {
			status_code: status.as_u16(),
			body: body.into(),
			is_success: status.is_success(),
			headers: merge_headers(headers),
		}
	}

	/// Reads the body of `response` and builds an envelope from it.
	pub async fn from_response(response: Response) -> Result<Self, TransportError> {
		let status = response.status();
		let headers = response.headers().to_owned();
		let body = response.text().await?;

		Ok(Self::from_parts(status, &headers, body))
	}

	/// Looks up a header value by name, ignoring ASCII case.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Deserializes the body as JSON.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_str(&self.body);

		Ok(serde_path_to_error::deserialize(&mut de)?)
	}
}

/// Collapses a header map into one comma-joined value per name.
pub fn merge_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
	headers
		.keys()
		.map(|name| {
			let joined = headers
				.get_all(name)
				.iter()
				.map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
				.collect::<Vec<_>>()
				.join(", ");

			(name.as_str().to_owned(), joined)
		})
		.collect()
}
