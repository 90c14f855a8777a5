use async_trait::async_trait;
use tracing::info;

use crate::application::ports::{ActivationMessage, Notifier, NotifyError};

/// Writes the activation link to the log instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_activation(&self, message: &ActivationMessage) -> Result<(), NotifyError> {
        info!(to = %message.email, link = %message.link, "Activation link (mail delivery disabled)");
        Ok(())
    }
}
