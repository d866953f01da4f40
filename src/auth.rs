//! Authenticator strategies, their option payloads, and the name-based registry.
//!
//! Every strategy implements [`Authenticator`]: it receives a fully built
//! [`reqwest::Request`] right before dispatch and attaches whatever credentials it
//! owns. The [`AuthenticatorRegistry`] maps case-insensitive type names (`none`,
//! `bearer`, `basic`, `oauth2`, plus custom registrations) to constructors.

pub mod basic;
pub mod bearer;
pub mod name;
pub mod none;
pub mod oauth2;
pub mod options;
pub mod registry;
pub mod secret;
pub mod strategy;

pub use basic::*;
pub use bearer::*;
pub use name::*;
pub use none::*;
pub use oauth2::*;
pub use options::*;
pub use registry::*;
pub use secret::*;
pub use strategy::*;
