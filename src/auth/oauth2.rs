//! OAuth 2.0 client-credentials authenticator with an in-process token cache.
//!
//! The first [`Authenticator::authenticate`] call exchanges the configured client id and
//! secret for an access token at the token endpoint and caches it on the instance; later
//! calls reuse the cached token. The cache lock is held across the exchange, so concurrent
//! callers on the same instance piggy-back on one in-flight request instead of stampeding
//! the token endpoint. When the provider reports `expires_in`, the token is re-fetched once
//! it enters a short leeway window before expiry; tokens without a lifetime are kept until
//! [`OAuth2Authenticator::invalidate`] is called.

// crates.io
use reqwest::{
	RequestBuilder, StatusCode,
	header::{ACCEPT, HeaderValue},
	redirect::Policy,
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{
		AuthFuture, Authenticator, Secret,
		strategy::{authorization_value, set_authorization},
	},
	error::{AuthenticationError, ConfigError},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

const GRANT_TYPE: &str = "client_credentials";
const BODY_PREVIEW_LIMIT: usize = 256;

/// Access token held by an [`OAuth2Authenticator`].
#[derive(Clone, Debug)]
pub struct CachedToken {
	/// Access token issued by the provider.
	pub access_token: Secret,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Expiry derived from `expires_in`, when the provider sent one.
	pub expires_at: Option<OffsetDateTime>,
	header: HeaderValue,
}
impl CachedToken {
	/// Tokens this close to expiry are treated as expired.
	pub const EXPIRY_LEEWAY: Duration = Duration::seconds(30);

	/// Returns `true` while the token may still be attached to requests at `now`.
	pub fn is_usable_at(&self, now: OffsetDateTime) -> bool {
		match self.expires_at {
			Some(expires_at) => now < expires_at - Self::EXPIRY_LEEWAY,
			None => true,
		}
	}
}

/// Authenticator that obtains tokens through the client-credentials grant.
pub struct OAuth2Authenticator {
	token_url: Url,
	client_id: String,
	client_secret: Secret,
	scope: String,
	http_client: ReqwestClient,
	cache: AsyncMutex<Option<CachedToken>>,
}
impl OAuth2Authenticator {
	pub(crate) const EXPECTED: &'static str =
		"a (tokenUrl, clientId, clientSecret, scope) tuple with non-empty values";

	/// Creates the authenticator, rejecting blank values and token URLs that are not
	/// absolute.
	///
	/// The token endpoint is called through a dedicated reqwest client that does not
	/// follow redirects; use [`with_http_client`](Self::with_http_client) to supply another.
	pub fn new(
		token_url: &str,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		scope: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = Secret::new(client_secret);
		let scope = scope.into();

		if [token_url, client_id.as_str(), client_secret.expose(), scope.as_str()]
			.iter()
			.any(|value| value.trim().is_empty())
		{
			return Err(ConfigError::InvalidOptions { auth_type: "OAuth2", expected: Self::EXPECTED });
		}

		let token_url = Url::parse(token_url)
			.map_err(|source| ConfigError::InvalidTokenUrl { url: token_url.to_owned(), source })?;
		let http_client = ReqwestClient::builder()
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self {
			token_url,
			client_id,
			client_secret,
			scope,
			http_client,
			cache: AsyncMutex::new(None),
		})
	}

	/// Replaces the HTTP client used for token exchanges.
	pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = client;

		self
	}

	/// Token endpoint URL.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Requested scope string.
	pub fn scope(&self) -> &str {
		&self.scope
	}

	/// Returns a snapshot of the cached token, if any.
	pub async fn cached_token(&self) -> Option<CachedToken> {
		self.cache.lock().await.clone()
	}

	/// Drops the cached token so the next call performs a fresh exchange.
	pub async fn invalidate(&self) {
		self.cache.lock().await.take();
	}

	/// Returns a usable access token, exchanging credentials when the cache is empty or
	/// stale.
	pub async fn access_token(&self) -> Result<CachedToken> {
		let mut cache = self.cache.lock().await;
		let now = OffsetDateTime::now_utc();

		if let Some(current) = cache.as_ref().filter(|token| token.is_usable_at(now)) {
			return Ok(current.clone());
		}

		let token = self.exchange().await?;

		*cache = Some(token.clone());

		Ok(token)
	}

	fn token_request(&self) -> RequestBuilder {
		let form = [
			("grant_type", GRANT_TYPE),
			("client_id", self.client_id.as_str()),
			("client_secret", self.client_secret.expose()),
			("scope", self.scope.as_str()),
		];

		self.http_client
			.post(self.token_url.clone())
			.header(ACCEPT, "application/json")
			.form(&form)
	}

	async fn exchange(&self) -> Result<CachedToken> {
		const KIND: CallKind = CallKind::TokenExchange;

		let span = CallSpan::new(KIND, "oauth2_client_credentials");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self
					.token_request()
					.send()
					.await
					.map_err(|e| AuthenticationError::TokenRequest(e.into()))?;
				let status = response.status();
				let body = response
					.bytes()
					.await
					.map_err(|e| AuthenticationError::TokenRequest(e.into()))?;

				parse_token_response(status, &body, OffsetDateTime::now_utc()).map_err(Error::from)
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}
}
impl Authenticator for OAuth2Authenticator {
	fn authenticate<'a>(&'a self, request: &'a mut ReqwestRequest) -> AuthFuture<'a> {
		Box::pin(async move {
			let token = self.access_token().await?;

			set_authorization(request, token.header);

			Ok(())
		})
	}

	fn kind(&self) -> &'static str {
		"oauth2"
	}
}
impl Debug for OAuth2Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Authenticator")
			.field("token_url", &self.token_url.as_str())
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("scope", &self.scope)
			.finish()
	}
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
	access_token: Option<String>,
	expires_in: Option<Value>,
	error: Option<String>,
	error_description: Option<String>,
}

/// Reads `expires_in` as whole seconds; anything that is not a positive finite number
/// (or a string holding one) means the token carries no lifetime.
fn expires_in_seconds(value: &Value) -> Option<i64> {
	let secs = match value {
		Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(seconds_from_f64)),
		Value::String(text) => {
			let text = text.trim();

			text.parse::<i64>().ok().or_else(|| text.parse::<f64>().ok().map(seconds_from_f64))
		},
		_ => None,
	};

	secs.filter(|secs| *secs > 0)
}

// `as` saturates at the `i64` bounds.
fn seconds_from_f64(value: f64) -> i64 {
	value as i64
}

fn parse_token_response(
	status: StatusCode,
	body: &[u8],
	issued_at: OffsetDateTime,
) -> Result<CachedToken, AuthenticationError> {
	let mut de = serde_json::Deserializer::from_slice(body);
	let parsed: TokenEndpointResponse = match serde_path_to_error::deserialize(&mut de) {
		Ok(parsed) => parsed,
		Err(source) if status.is_success() =>
			return Err(AuthenticationError::TokenResponseParse { source, status: status.as_u16() }),
		Err(_) =>
			return Err(AuthenticationError::TokenEndpoint {
				detail: describe_status(status, body),
				status: status.as_u16(),
			}),
	};

	if let Some(error) = parsed.error.filter(|error| !error.trim().is_empty()) {
		let detail = match parsed.error_description {
			Some(description) if !description.trim().is_empty() => format!("{error} ({description})"),
			_ => error,
		};

		return Err(AuthenticationError::TokenEndpoint { detail, status: status.as_u16() });
	}
	if !status.is_success() {
		return Err(AuthenticationError::TokenEndpoint {
			detail: describe_status(status, body),
			status: status.as_u16(),
		});
	}

	let access_token = parsed
		.access_token
		.filter(|token| !token.is_empty())
		.ok_or(AuthenticationError::EmptyAccessToken)?;
	let header = authorization_value("Bearer", &access_token)
		.map_err(|_| AuthenticationError::MalformedAccessToken)?;
	// Lifetimes past the representable range are treated as never expiring.
	let expires_at = parsed
		.expires_in
		.as_ref()
		.and_then(expires_in_seconds)
		.and_then(|secs| issued_at.checked_add(Duration::seconds(secs)));

	Ok(CachedToken { access_token: Secret::new(access_token), issued_at, expires_at, header })
}

fn describe_status(status: StatusCode, body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() {
		return format!("token endpoint returned HTTP {status}");
	}

	let mut preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();

	if text.chars().count() > BODY_PREVIEW_LIMIT {
		preview.push('…');
	}

	format!("token endpoint returned HTTP {status}: {preview}")
}
