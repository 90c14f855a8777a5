//! Domain error taxonomy
//!
//! Every failure a use-case can report maps onto exactly one of these
//! variants. The HTTP layer turns them into status codes; nothing below it
//! knows about HTTP.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation: {0}")]
    Validation(String),

    #[error("Email is already registered")]
    DuplicateEmail,

    /// Unknown email and wrong password both end up here.
    #[error("Invalid email or password")]
    AuthenticationFailed,

    #[error("Account has not been activated")]
    AccountNotActivated,

    #[error("Invalid activation token")]
    InvalidToken,

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Store or crypto subsystem fault. The message is for logs only.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn module_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "ModuleInfo",
            field: "id",
            value: id.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
