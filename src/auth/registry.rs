//! Name-based authenticator registry and factory.

// std
use std::{collections::hash_map::Entry, sync::LazyLock};
// self
use crate::{
	_prelude::*,
	auth::{
		AuthOptions, AuthTypeName, Authenticator, BasicAuthenticator, BearerTokenAuthenticator,
		NoAuthenticator, OAuth2Authenticator,
	},
	error::ConfigError,
};

/// Constructor stored in the registry.
pub type AuthenticatorConstructor =
	Arc<dyn Fn(Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>> + Send + Sync>;

static SHARED: LazyLock<Arc<AuthenticatorRegistry>> =
	LazyLock::new(|| Arc::new(AuthenticatorRegistry::new()));

/// Case-insensitive map from authenticator type names to constructors.
///
/// A fresh registry holds the built-ins `none`, `bearer`, `basic`, and `oauth2`. Names
/// registered later share the same case-folded key space, so registering `"Bearer"`
/// collides with the built-in `bearer`. Registrations are never overwritten.
pub struct AuthenticatorRegistry {
	constructors: RwLock<HashMap<AuthTypeName, AuthenticatorConstructor>>,
}
impl AuthenticatorRegistry {
	/// Creates an isolated registry holding only the built-in authenticators.
	pub fn new() -> Self {
		let builtins: [(&str, AuthenticatorConstructor); 4] = [
			("none", Arc::new(create_none)),
			("bearer", Arc::new(create_bearer)),
			("basic", Arc::new(create_basic)),
			("oauth2", Arc::new(create_oauth2)),
		];
		let constructors = builtins
			.into_iter()
			.filter_map(|(name, constructor)| {
				AuthTypeName::new(name).ok().map(|name| (name, constructor))
			})
			.collect();

		Self { constructors: RwLock::new(constructors) }
	}

	/// Process-wide registry used by [`RestClient::new`](crate::RestClient::new).
	pub fn shared() -> Arc<Self> {
		SHARED.clone()
	}

	/// Registers a custom constructor under `type_name`.
	///
	/// Fails when the name is blank or already registered under any casing.
	pub fn register<F>(&self, type_name: &str, constructor: F) -> Result<()>
	where
		F: 'static + Send + Sync + Fn(Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>>,
	{
		let name = AuthTypeName::new(type_name)?;

		match self.constructors.write().entry(name) {
			Entry::Occupied(_) =>
				Err(ConfigError::DuplicateAuthType { auth_type: type_name.to_owned() }.into()),
			Entry::Vacant(slot) => {
				slot.insert(Arc::new(constructor));

				Ok(())
			},
		}
	}

	/// Builds the authenticator registered under `type_name` (case-insensitive).
	pub fn create(
		&self,
		type_name: &str,
		options: Option<&AuthOptions>,
	) -> Result<Arc<dyn Authenticator>> {
		let constructor = self
			.constructors
			.read()
			.get(AuthTypeName::fold(type_name).as_str())
			.cloned()
			.ok_or_else(|| ConfigError::UnsupportedAuthType { auth_type: type_name.to_owned() })?;

		// Lock released; constructors may call back into the registry.
		constructor(options)
	}

	/// Returns `true` when `type_name` is registered under any casing.
	pub fn contains(&self, type_name: &str) -> bool {
		self.constructors.read().contains_key(AuthTypeName::fold(type_name).as_str())
	}

	/// Registered names as spelled at registration, sorted by key.
	pub fn registered(&self) -> Vec<String> {
		let guard = self.constructors.read();
		let mut names = guard.keys().collect::<Vec<_>>();

		names.sort_by(|a, b| a.key().cmp(b.key()));

		names.into_iter().map(ToString::to_string).collect()
	}
}
impl Default for AuthenticatorRegistry {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for AuthenticatorRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatorRegistry").field("registered", &self.registered()).finish()
	}
}

fn create_none(_options: Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>> {
	Ok(Arc::new(NoAuthenticator))
}

fn create_bearer(options: Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>> {
	let token = options.and_then(AuthOptions::as_text).ok_or(ConfigError::InvalidOptions {
		auth_type: "Bearer",
		expected: BearerTokenAuthenticator::EXPECTED,
	})?;

	Ok(Arc::new(BearerTokenAuthenticator::new(token)?))
}

fn create_basic(options: Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>> {
	let [username, password] = options.and_then(AuthOptions::as_tuple::<2>).ok_or(
		ConfigError::InvalidOptions { auth_type: "Basic", expected: BasicAuthenticator::EXPECTED },
	)?;

	Ok(Arc::new(BasicAuthenticator::new(username, password)?))
}

fn create_oauth2(options: Option<&AuthOptions>) -> Result<Arc<dyn Authenticator>> {
	let [token_url, client_id, client_secret, scope] =
		options.and_then(AuthOptions::as_tuple::<4>).ok_or(ConfigError::InvalidOptions {
			auth_type: "OAuth2",
			expected: OAuth2Authenticator::EXPECTED,
		})?;

	Ok(Arc::new(OAuth2Authenticator::new(token_url, client_id, client_secret, scope)?))
}
