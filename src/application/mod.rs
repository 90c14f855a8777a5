//! Application layer: use-case orchestration over the domain ports

pub mod catalog;
pub mod identity;
pub mod ports;

pub use catalog::ModuleInfoService;
pub use identity::{AuthResult, IdentitySettings, UserService};
pub use ports::{ActivationMessage, Notifier, NotifyError};
