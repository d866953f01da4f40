//! Case-insensitive authenticator type names used as registry keys.

// std
use std::{
	borrow::Borrow,
	hash::{Hash, Hasher},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Validated authenticator type name.
///
/// Equality and hashing use the case-folded key, so `Bearer`, `bearer`, and `BEARER`
/// name the same registry slot while [`Display`] keeps the spelling used at
/// registration.
#[derive(Clone)]
pub struct AuthTypeName {
	display: String,
	key: String,
}
impl AuthTypeName {
	/// Creates a new name after rejecting empty or whitespace-only input.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ConfigError> {
		let view = value.as_ref();

		if view.trim().is_empty() {
			return Err(ConfigError::EmptyAuthType);
		}

		Ok(Self { display: view.to_owned(), key: Self::fold(view) })
	}

	/// Case-folds a raw type name into its registry key.
	pub fn fold(value: &str) -> String {
		value.to_lowercase()
	}

	/// Case-folded registry key.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Spelling supplied by the caller.
	pub fn as_str(&self) -> &str {
		&self.display
	}
}
impl PartialEq for AuthTypeName {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}
impl Eq for AuthTypeName {}
impl Hash for AuthTypeName {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}
impl Borrow<str> for AuthTypeName {
	fn borrow(&self) -> &str {
		&self.key
	}
}
impl Debug for AuthTypeName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AuthType({})", self.display)
	}
}
impl Display for AuthTypeName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.display)
	}
}
impl FromStr for AuthTypeName {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
