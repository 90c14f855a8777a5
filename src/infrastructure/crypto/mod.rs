//! Credential primitives: password hashing, activation tokens, session tokens

pub mod activation;
pub mod jwt;
pub mod password;

pub use activation::{activation_link, generate_activation_token, is_well_formed_token};
pub use jwt::{create_token, verify_token, JwtConfig, SessionClaims, TokenError};
pub use password::{PasswordError, PasswordHasher};
