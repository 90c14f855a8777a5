//! Identity module: registration, activation, login and user administration
//!
//! Contains the `UserService` which orchestrates the credential store,
//! password hasher, token issuers and the activation notifier.

pub mod service;

pub use service::{AuthResult, IdentitySettings, UserService};
