//! Outbound ports: side effects triggered by use-cases
//!
//! [`Notifier`] delivers the activation link to a newly registered user.
//! Delivery is fire-and-forget from the caller's point of view: the
//! registration is already committed when the notifier runs, and a failed
//! delivery never rolls it back.

use async_trait::async_trait;
use thiserror::Error;

/// Activation link addressed to a freshly registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationMessage {
    pub email: String,
    pub name: String,
    pub link: String,
}

impl ActivationMessage {
    pub fn subject(&self) -> &'static str {
        "Activate your account"
    }

    pub fn body(&self) -> String {
        format!(
            "Hello {},\n\nPlease confirm your email address by opening the link below:\n\n{}\n",
            self.name, self.link
        )
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),

    #[error("notification rejected by provider with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_activation(&self, message: &ActivationMessage) -> Result<(), NotifyError>;
}
