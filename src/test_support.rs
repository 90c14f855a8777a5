//! Shared fixtures for unit tests

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::application::ports::{ActivationMessage, Notifier, NotifyError};
use crate::application::IdentitySettings;
use crate::infrastructure::crypto::password::MIN_COST;
use crate::infrastructure::crypto::{JwtConfig, PasswordHasher};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::{init_database, DatabaseConfig};

/// Fresh, migrated in-memory database private to the calling test
pub async fn memory_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "modinfo-service-test".to_string(),
    }
}

pub fn test_settings() -> IdentitySettings {
    IdentitySettings {
        jwt: test_jwt_config(),
        hasher: PasswordHasher::new(MIN_COST),
        public_base_url: "http://test.local".to_string(),
        notify_timeout: Duration::from_secs(1),
    }
}

/// Captures every activation message it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<ActivationMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<ActivationMessage> {
        self.sent.lock().expect("notifier lock").clone()
    }

    /// Delivery runs on a spawned task; poll until `count` messages arrived.
    pub async fn wait_for(&self, count: usize) -> Vec<ActivationMessage> {
        for _ in 0..200 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} activation message(s), got {}", count, self.sent().len());
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_activation(&self, message: &ActivationMessage) -> Result<(), NotifyError> {
        self.sent.lock().expect("notifier lock").push(message.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_activation(&self, _message: &ActivationMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".into()))
    }
}

/// Takes the given time before reporting success
pub struct SlowNotifier(pub Duration);

#[async_trait]
impl Notifier for SlowNotifier {
    async fn send_activation(&self, _message: &ActivationMessage) -> Result<(), NotifyError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}
