//! Discriminated option payloads handed to authenticator constructors.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Options supplied alongside an authenticator type name.
///
/// Built-in constructors accept exactly one shape each: `bearer` takes [`Text`](Self::Text),
/// `basic` takes a two-element [`Tuple`](Self::Tuple), and `oauth2` takes a four-element
/// tuple. [`Value`](Self::Value) carries any other JSON payload for custom constructors.
/// Converting from [`serde_json::Value`] normalizes JSON strings to `Text` and arrays of
/// strings to `Tuple`, so hosts passing loosely-typed data land on the same shapes.
#[derive(Clone, PartialEq)]
pub enum AuthOptions {
	/// A single string, e.g. a bearer token.
	Text(String),
	/// An ordered tuple of strings, e.g. `(username, password)`.
	Tuple(Vec<String>),
	/// Any other JSON payload.
	Value(Value),
}
impl AuthOptions {
	/// Options for the `bearer` authenticator.
	pub fn bearer(token: impl Into<String>) -> Self {
		Self::Text(token.into())
	}

	/// Options for the `basic` authenticator.
	pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self::Tuple(vec![username.into(), password.into()])
	}

	/// Options for the `oauth2` authenticator, in the fixed order token URL, client id,
	/// client secret, scope.
	pub fn oauth2(
		token_url: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		scope: impl Into<String>,
	) -> Self {
		Self::Tuple(vec![token_url.into(), client_id.into(), client_secret.into(), scope.into()])
	}

	/// Returns the string when the payload is [`Text`](Self::Text).
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the elements when the payload is a [`Tuple`](Self::Tuple) of exactly `N`
	/// strings.
	pub fn as_tuple<const N: usize>(&self) -> Option<[&str; N]> {
		let Self::Tuple(items) = self else {
			return None;
		};

		if items.len() != N {
			return None;
		}

		Some(std::array::from_fn(|idx| items[idx].as_str()))
	}

	/// Returns the raw JSON payload when the options are [`Value`](Self::Value).
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Stable label describing the payload shape.
	pub fn shape(&self) -> &'static str {
		match self {
			Self::Text(_) => "text",
			Self::Tuple(_) => "tuple",
			Self::Value(_) => "value",
		}
	}
}
// Option values never reach `Debug` output.
impl Debug for AuthOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text(_) => f.write_str("AuthOptions::Text(<redacted>)"),
			Self::Tuple(items) => write!(f, "AuthOptions::Tuple(<{} redacted>)", items.len()),
			Self::Value(_) => f.write_str("AuthOptions::Value(<redacted>)"),
		}
	}
}
impl From<&str> for AuthOptions {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}
impl From<String> for AuthOptions {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<Vec<String>> for AuthOptions {
	fn from(value: Vec<String>) -> Self {
		Self::Tuple(value)
	}
}
impl<A, B> From<(A, B)> for AuthOptions
where
	A: Into<String>,
	B: Into<String>,
{
	fn from((a, b): (A, B)) -> Self {
		Self::Tuple(vec![a.into(), b.into()])
	}
}
impl<A, B, C, D> From<(A, B, C, D)> for AuthOptions
where
	A: Into<String>,
	B: Into<String>,
	C: Into<String>,
	D: Into<String>,
{
	fn from((a, b, c, d): (A, B, C, D)) -> Self {
		Self::Tuple(vec![a.into(), b.into(), c.into(), d.into()])
	}
}
impl From<Value> for AuthOptions {
	fn from(value: Value) -> Self {
		match value {
			Value::String(text) => Self::Text(text),
			Value::Array(items) if items.iter().all(Value::is_string) => Self::Tuple(
				items
					.into_iter()
					.filter_map(|item| match item {
						Value::String(text) => Some(text),
						_ => None,
					})
					.collect(),
			),
			other => Self::Value(other),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn json_payloads_normalize_to_shapes() {
		assert_eq!(AuthOptions::from(json!("abc")), AuthOptions::Text("abc".into()));
		assert_eq!(AuthOptions::from(json!(["u", "p"])), AuthOptions::basic("u", "p"));
		assert!(matches!(AuthOptions::from(json!(["u", 1])), AuthOptions::Value(_)));
		assert!(matches!(
			AuthOptions::from(json!({ "username": "u", "password": "p" })),
			AuthOptions::Value(_)
		));
	}

	#[test]
	fn tuple_accessor_checks_arity() {
		let options = AuthOptions::from(("user", "pass"));

		assert_eq!(options.as_tuple::<2>(), Some(["user", "pass"]));
		assert_eq!(options.as_tuple::<4>(), None);
		assert_eq!(options.as_text(), None);
		assert_eq!(AuthOptions::from("token").as_tuple::<1>(), None);
	}

	#[test]
	fn debug_output_hides_values() {
		let options = AuthOptions::basic("user", "hunter2");

		assert_eq!(format!("{options:?}"), "AuthOptions::Tuple(<2 redacted>)");
	}
}
