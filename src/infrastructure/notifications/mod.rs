//! Notification adapters implementing the [`Notifier`] port

mod http_mailer;
mod log_notifier;

use std::sync::Arc;
use std::time::Duration;

pub use http_mailer::HttpMailer;
pub use log_notifier::LogNotifier;

use crate::application::ports::{Notifier, NotifyError};
use crate::config::{MailConfig, MailProvider};

/// Pick the notifier configured under `[mail]`.
pub fn build_notifier(config: &MailConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.provider {
        MailProvider::Log => Ok(Arc::new(LogNotifier)),
        MailProvider::Http => {
            let mailer = HttpMailer::new(
                &config.api_url,
                &config.api_key,
                &config.from,
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Arc::new(mailer))
        }
    }
}
