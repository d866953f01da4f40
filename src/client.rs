//! The REST client: configuration state, the current authenticator, and the verb methods.
//!
//! A [`RestClient`] starts unconfigured. The first successful
//! [`set_base_url`](RestClient::set_base_url) builds the transport; until then every verb
//! fails with [`Error::BaseUrlNotSet`] without touching the network. Each verb resolves the
//! resource against the base URL, attaches the JSON body (POST/PUT), lets the current
//! [`Authenticator`] add credentials, sends the request, and returns a
//! [`ResponseEnvelope`].
//!
//! Configuration methods take `&mut self` and verbs take `&self`, so sharing one client
//! across tasks requires external synchronization (for example a `RwLock`) whenever it may
//! be reconfigured.

pub mod config;

pub use config::*;

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::{
	Method,
	header::{CONTENT_TYPE, HeaderValue},
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{AuthOptions, Authenticator, AuthenticatorRegistry, NoAuthenticator},
	error::ConfigError,
	http::{ReqwestHttpClient, ResponseEnvelope, resolve_resource},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// REST client with a swappable authentication strategy.
pub struct RestClient {
	registry: Arc<AuthenticatorRegistry>,
	config: ClientConfig,
	http_client: Option<ReqwestHttpClient>,
	authenticator: Arc<dyn Authenticator>,
}
impl RestClient {
	/// Creates an unconfigured client backed by the process-wide registry.
	pub fn new() -> Self {
		Self::with_registry(AuthenticatorRegistry::shared())
	}

	/// Creates an unconfigured client backed by `registry`.
	pub fn with_registry(registry: Arc<AuthenticatorRegistry>) -> Self {
		Self {
			registry,
			config: ClientConfig::default(),
			http_client: None,
			authenticator: Arc::new(NoAuthenticator),
		}
	}

	/// Creates a client from a prepared configuration, building the transport right away
	/// when a base URL is present.
	pub fn with_config(config: ClientConfig) -> Result<Self> {
		Self::with_config_and_registry(config, AuthenticatorRegistry::shared())
	}

	/// Same as [`with_config`](Self::with_config), backed by `registry` instead of the
	/// process-wide one.
	pub fn with_config_and_registry(
		config: ClientConfig,
		registry: Arc<AuthenticatorRegistry>,
	) -> Result<Self> {
		let mut client = Self::with_registry(registry);

		client.http_client = match config.base_url {
			Some(_) => Some(ReqwestHttpClient::from_config(&config)?),
			None => None,
		};
		client.config = config;

		Ok(client)
	}

	/// Registry used by [`set_authentication`](Self::set_authentication).
	pub fn registry(&self) -> &Arc<AuthenticatorRegistry> {
		&self.registry
	}

	/// Current configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Configured base URL, if any.
	pub fn base_url(&self) -> Option<&Url> {
		self.config.base_url.as_ref()
	}

	/// Configured request timeout, if any.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.config.timeout
	}

	/// Returns `true` once a base URL has been set.
	pub fn is_configured(&self) -> bool {
		self.http_client.is_some()
	}

	/// Authenticator applied to every request.
	pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
		&self.authenticator
	}

	/// Registers a custom authenticator constructor with this client's registry.
	pub fn register_authenticator<F>(&self, type_name: &str, constructor: F) -> Result<()>
	where
		F: 'static + Send + Sync + Fn(Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>>,
	{
		self.registry.register(type_name, constructor)
	}

	/// Sets the base URL and rebuilds the transport, keeping the configured timeout.
	pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
		let url = ClientConfig::parse_base_url(base_url)?;
		let config = self.config.clone().with_base_url(url);
		let http_client = ReqwestHttpClient::from_config(&config)?;

		obs::record_config_event("base_url", &base_url);

		self.config = config;
		self.http_client = Some(http_client);

		Ok(())
	}

	/// Replaces the authenticator with one built by the registry.
	///
	/// When `options` is `None` the call does nothing and the current authenticator,
	/// including the default no-op one, stays in place. This holds for every type name, so
	/// `set_authentication("none", None)` does not clear an earlier bearer or basic
	/// authenticator; pass `Some` options (any value works for `none`) to switch.
	pub fn set_authentication(&mut self, auth_type: &str, options: Option<AuthOptions>) -> Result<()> {
		let Some(options) = options else {
			obs::record_config_event("authentication", &"no options supplied; unchanged");

			return Ok(());
		};

		self.authenticator = self.registry.create(auth_type, Some(&options))?;

		obs::record_config_event("authentication", &self.authenticator.kind());

		Ok(())
	}

	/// Installs an already-built authenticator.
	pub fn set_authenticator(&mut self, authenticator: Arc<dyn Authenticator>) {
		obs::record_config_event("authentication", &authenticator.kind());

		self.authenticator = authenticator;
	}

	/// Applies host settings; currently only [`DEFAULT_TIMEOUT_KEY`].
	///
	/// A positive integer timeout (JSON number or numeric string) replaces the current one
	/// and rebuilds the transport when a base URL is set. Missing or unparsable values are
	/// ignored, and so is a transport rebuild failure. This never fails.
	pub fn initialize(&mut self, configuration: &HashMap<String, Value>) {
		let Some(timeout) = ClientConfig::timeout_from_settings(configuration) else {
			if let Some(raw) = configuration.get(DEFAULT_TIMEOUT_KEY) {
				obs::record_config_event("timeout", &format_args!("ignored unparsable value {raw}"));
			}

			return;
		};
		let config = self.config.clone().with_timeout(timeout);

		if config.base_url.is_some() {
			match ReqwestHttpClient::from_config(&config) {
				Ok(http_client) => self.http_client = Some(http_client),
				Err(e) => {
					obs::record_config_event("timeout", &e);

					return;
				},
			}
		}

		obs::record_config_event("timeout", &format_args!("{}s", timeout.as_secs()));

		self.config = config;
	}

	/// Sends a `GET` request for `resource`.
	pub async fn get(&self, resource: &str) -> Result<ResponseEnvelope> {
		self.send::<()>(CallKind::Get, Method::GET, resource, None).await
	}

	/// Sends a `POST` request for `resource` with `body` serialized as JSON.
	pub async fn post<B>(&self, resource: &str, body: &B) -> Result<ResponseEnvelope>
	where
		B: ?Sized + Serialize,
	{
		self.send(CallKind::Post, Method::POST, resource, Some(body)).await
	}

	/// Sends a `PUT` request for `resource` with `body` serialized as JSON.
	pub async fn put<B>(&self, resource: &str, body: &B) -> Result<ResponseEnvelope>
	where
		B: ?Sized + Serialize,
	{
		self.send(CallKind::Put, Method::PUT, resource, Some(body)).await
	}

	/// Sends a `DELETE` request for `resource`.
	pub async fn delete(&self, resource: &str) -> Result<ResponseEnvelope> {
		self.send::<()>(CallKind::Delete, Method::DELETE, resource, None).await
	}

	async fn send<B>(
		&self,
		kind: CallKind,
		method: Method,
		resource: &str,
		body: Option<&B>,
	) -> Result<ResponseEnvelope>
	where
		B: ?Sized + Serialize,
	{
		let span = CallSpan::new(kind, "rest_client");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let (Some(http_client), Some(base_url)) =
					(self.http_client.as_ref(), self.config.base_url.as_ref())
				else {
					return Err(Error::BaseUrlNotSet);
				};
				let url = resolve_resource(base_url, resource)?;
				let mut builder = http_client.request(method, url);

				if let Some(body) = body {
					let payload = serde_json::to_vec(body).map_err(ConfigError::InvalidBody)?;

					builder = builder
						.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
						.body(payload);
				}

				let mut request = builder
					.build()
					.map_err(|e| ConfigError::InvalidRequest { source: Box::new(e) })?;

				self.authenticator.authenticate(&mut request).await?;

				Ok(http_client.execute(request).await?)
			})
			.await;

		obs::record_call_outcome(kind, CallOutcome::of(&result));

		result
	}
}
impl Default for RestClient {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for RestClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("config", &self.config)
			.field("authenticator", &self.authenticator.kind())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn isolated_client() -> RestClient {
		RestClient::with_registry(Arc::new(AuthenticatorRegistry::new()))
	}

	#[tokio::test]
	async fn verbs_require_a_base_url() {
		let client = isolated_client();

		assert!(!client.is_configured());
		assert!(matches!(client.get("users").await, Err(Error::BaseUrlNotSet)));
		assert!(matches!(client.post("users", &json!({ "a": 1 })).await, Err(Error::BaseUrlNotSet)));
		assert!(matches!(client.put("users/1", &json!({})).await, Err(Error::BaseUrlNotSet)));
		assert!(matches!(client.delete("users/1").await, Err(Error::BaseUrlNotSet)));
	}

	#[test]
	fn set_base_url_rejects_blank_and_relative_urls() {
		let mut client = isolated_client();

		assert!(matches!(client.set_base_url(" "), Err(Error::Config(ConfigError::EmptyBaseUrl))));
		assert!(matches!(
			client.set_base_url("not a url"),
			Err(Error::Config(ConfigError::InvalidBaseUrl { .. }))
		));
		assert!(!client.is_configured());

		client.set_base_url("https://api.example.com/v1").expect("Absolute URL should be accepted.");

		assert!(client.is_configured());
	}

	#[test]
	fn set_authentication_without_options_keeps_current_authenticator() {
		let mut client = isolated_client();

		client
			.set_authentication("bearer", Some(AuthOptions::bearer("abc")))
			.expect("Bearer options should be accepted.");
		client.set_authentication("basic", None).expect("Missing options are a no-op.");
		client.set_authentication("none", None).expect("Missing options are a no-op.");

		assert_eq!(client.authenticator().kind(), "bearer");

		client
			.set_authentication("none", Some(AuthOptions::from(json!(null))))
			.expect("None ignores its options.");

		assert_eq!(client.authenticator().kind(), "none");
	}

	#[test]
	fn failed_set_authentication_keeps_current_authenticator() {
		let mut client = isolated_client();

		client
			.set_authentication("basic", Some(AuthOptions::basic("user", "pass")))
			.expect("Basic options should be accepted.");

		assert!(client.set_authentication("basic", Some(AuthOptions::from("user:pass"))).is_err());
		assert!(client.set_authentication("kerberos", Some(AuthOptions::from("x"))).is_err());
		assert_eq!(client.authenticator().kind(), "basic");
	}

	#[test]
	fn initialize_sets_timeout_and_keeps_base_url() {
		let mut client = isolated_client();

		client.set_base_url("https://api.example.com/v1").expect("Absolute URL should be accepted.");
		client.initialize(&HashMap::from_iter([(DEFAULT_TIMEOUT_KEY.to_owned(), json!("5"))]));

		assert_eq!(client.timeout(), Some(StdDuration::from_secs(5)));
		assert_eq!(client.base_url().map(Url::as_str), Some("https://api.example.com/v1"));

		client.initialize(&HashMap::from_iter([(DEFAULT_TIMEOUT_KEY.to_owned(), json!("abc"))]));

		assert_eq!(client.timeout(), Some(StdDuration::from_secs(5)));

		client.set_base_url("https://api.example.com/v2").expect("Absolute URL should be accepted.");

		assert_eq!(client.timeout(), Some(StdDuration::from_secs(5)));
	}

	#[tokio::test]
	async fn initialize_alone_does_not_configure_the_client() {
		let mut client = isolated_client();

		client.initialize(&HashMap::from_iter([(DEFAULT_TIMEOUT_KEY.to_owned(), json!(10))]));

		assert_eq!(client.timeout(), Some(StdDuration::from_secs(10)));
		assert!(!client.is_configured());
		assert!(matches!(client.get("users").await, Err(Error::BaseUrlNotSet)));
	}

	#[test]
	fn with_config_and_registry_uses_the_given_registry() {
		let registry = Arc::new(AuthenticatorRegistry::new());

		registry
			.register("Token", |_| Ok(Arc::new(NoAuthenticator) as Arc<dyn Authenticator>))
			.expect("A new type name should register.");

		let config = ClientConfig::default()
			.with_base_url(
				ClientConfig::parse_base_url("https://api.example.com/v1")
					.expect("Absolute URL should be accepted."),
			)
			.with_timeout(StdDuration::from_secs(7));
		let client = RestClient::with_config_and_registry(config, registry.clone())
			.expect("A valid config should build a client.");

		assert!(Arc::ptr_eq(client.registry(), &registry));
		assert!(client.registry().contains("token"));
		assert!(!AuthenticatorRegistry::shared().contains("token"));
		assert!(client.is_configured());
		assert_eq!(client.timeout(), Some(StdDuration::from_secs(7)));
	}

	#[test]
	fn with_config_without_base_url_stays_unconfigured() {
		let client =
			RestClient::with_config(ClientConfig::default()).expect("An empty config is valid.");

		assert!(!client.is_configured());
		assert!(Arc::ptr_eq(client.registry(), &AuthenticatorRegistry::shared()));
	}

	#[test]
	fn debug_output_names_the_authenticator() {
		let mut client = isolated_client();

		client
			.set_authentication("bearer", Some(AuthOptions::bearer("very-secret")))
			.expect("Bearer options should be accepted.");

		let rendered = format!("{client:?}");

		assert!(rendered.contains("bearer"));
		assert!(!rendered.contains("very-secret"));
	}
}
