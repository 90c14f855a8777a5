//! Application ports (hexagonal architecture boundaries)
//!
//! Outbound capabilities the use-cases depend on. Adapters live in
//! `infrastructure`; tests substitute fakes.

pub mod outbound;

pub use outbound::{ActivationMessage, Notifier, NotifyError};
