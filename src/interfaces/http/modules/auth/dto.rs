//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AuthResult;
use crate::interfaces::http::modules::users::UserDto;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    /// Display name. `fname` is accepted as well.
    #[serde(alias = "fname")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// Plaintext password. `password_hash` is accepted as well.
    #[serde(alias = "password_hash")]
    #[validate(length(min = 1, max = 72, message = "password must be 1-72 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(alias = "password_hash")]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Every value is a string; existing clients decode this body as a flat
/// string map.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
}

impl From<AuthResult> for LoginResponse {
    fn from(auth: AuthResult) -> Self {
        Self {
            token: auth.token,
            token_type: auth.token_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivationResponse {
    pub message: String,
    /// True when the link had already been used; nothing changed
    pub already_used: bool,
    pub user: UserDto,
}
