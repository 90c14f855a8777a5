use async_trait::async_trait;

use super::{ActivationOutcome, CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

/// Credential store port.
///
/// Email uniqueness is enforced here, at the store boundary: of two
/// concurrent `create_user` calls with the same email exactly one succeeds and
/// the other gets `DomainError::DuplicateEmail`.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_activation_token(&self, token: &str) -> DomainResult<Option<User>>;

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<User>;

    /// Atomically flip `activated` for the owner of `token`.
    ///
    /// Fails with `DomainError::InvalidToken` when no user was ever issued
    /// the token.
    async fn mark_activated(&self, token: &str) -> DomainResult<ActivationOutcome>;

    async fn delete_user(&self, id: &str) -> DomainResult<()>;
}
