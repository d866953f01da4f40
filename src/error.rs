//! Client-level error types shared across authenticators, the registry, and the transport.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem (invalid argument).
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Authenticator could not attach credentials to the request.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A verb was called before a base URL was configured.
	#[error("Base URL has not been set; call `set_base_url` before making requests.")]
	BaseUrlNotSet,
	/// Response body could not be decoded into the requested type.
	#[error("Response body could not be decoded.")]
	Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
}

/// Configuration and validation failures (invalid arguments).
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL was empty or whitespace.
	#[error("Base URL cannot be empty.")]
	EmptyBaseUrl,
	/// Base URL could not be parsed as an absolute URL.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Resource path could not be joined onto the base URL.
	#[error("Resource `{resource}` does not form a valid URL.")]
	InvalidResource {
		/// Rejected resource path.
		resource: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// OAuth 2.0 token URL could not be parsed as an absolute URL.
	#[error("Token URL `{url}` is invalid.")]
	InvalidTokenUrl {
		/// Rejected input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Authentication type name was empty or whitespace.
	#[error("Auth type cannot be empty.")]
	EmptyAuthType,
	/// No authenticator is registered under the requested name.
	#[error("Unsupported authentication type: {auth_type}.")]
	UnsupportedAuthType {
		/// Requested type name.
		auth_type: String,
	},
	/// An authenticator is already registered under the requested name.
	#[error("Authenticator for type `{auth_type}` is already registered.")]
	DuplicateAuthType {
		/// Requested type name.
		auth_type: String,
	},
	/// Options passed to a built-in authenticator have the wrong shape or blank values.
	#[error("{auth_type} authentication requires {expected}.")]
	InvalidOptions {
		/// Built-in type name.
		auth_type: &'static str,
		/// Human readable description of the accepted shape.
		expected: &'static str,
	},
	/// Request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	InvalidBody(#[source] serde_json::Error),
	/// Request could not be assembled from its parts.
	#[error("Request could not be built.")]
	InvalidRequest {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Credentials cannot be represented as an HTTP header value.
	#[error("Credentials for {auth_type} authentication contain characters not allowed in a header.")]
	InvalidHeaderValue {
		/// Built-in type name.
		auth_type: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Failures raised while an authenticator prepares a request.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint answered with a non-success status or an OAuth `error` field.
	#[error("Failed to get access token: {detail}.")]
	TokenEndpoint {
		/// Provider-supplied error detail (`error` and `error_description`, or a body preview).
		detail: String,
		/// HTTP status code returned by the token endpoint.
		status: u16,
	},
	/// Token endpoint could not be reached.
	#[error("Failed to get access token: the token endpoint could not be reached.")]
	TokenRequest(#[source] TransportError),
	/// Token endpoint responded with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code returned by the token endpoint.
		status: u16,
	},
	/// Exchange succeeded but produced no access token.
	#[error("Access token is empty after token retrieval.")]
	EmptyAccessToken,
	/// Issued access token cannot be sent as an HTTP header value.
	#[error("Access token contains characters not allowed in a header.")]
	MalformedAccessToken,
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Request did not complete within the configured timeout.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns `true` when the failure was a timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout { source: Box::new(e) } } else { Self::network(e) }
	}
}
