//! Session token handling
//!
//! Tokens are stateless HS256 JWTs. Validity is decided by signature and
//! expiry alone; there is no server-side session table, so a token cannot be
//! revoked before it expires.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::UserRole;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            issuer: "modinfo-service".to_string(),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    pub role: UserRole,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub iss: String,
}

impl SessionClaims {
    pub fn new(user_id: &str, role: UserRole, config: &JwtConfig) -> Result<Self, TokenError> {
        Self::issued_at(user_id, role, config, Utc::now())
    }

    /// Fails with [`TokenError::Signing`] when the configured lifetime does
    /// not fit in a timestamp.
    pub fn issued_at(
        user_id: &str,
        role: UserRole,
        config: &JwtConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        let exp = Duration::try_hours(config.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(TokenError::Signing)?;

        Ok(Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: config.issuer.clone(),
        })
    }
}

/// Why a token could not be issued or accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("failed to sign token")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::InvalidSignature,
            _ => Self::Malformed,
        }
    }
}

/// Issue a session token for a user
pub fn create_token(user_id: &str, role: UserRole, config: &JwtConfig) -> Result<String, TokenError> {
    encode_claims(&SessionClaims::new(user_id, role, config)?, config)
}

/// Sign an arbitrary set of claims with the configured secret
pub fn encode_claims(claims: &SessionClaims, config: &JwtConfig) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|_| TokenError::Signing)
}

/// Verify and decode a session token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 24,
            issuer: "modinfo-test".to_string(),
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = config();
        let token = create_token("user-123", UserRole::Admin, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token() {
        let config = config();
        let claims = SessionClaims::issued_at(
            "user-123",
            UserRole::User,
            &config,
            Utc::now() - Duration::hours(25),
        )
        .unwrap();
        let token = encode_claims(&claims, &config).unwrap();

        assert_eq!(verify_token(&token, &config), Err(TokenError::Expired));
    }

    #[test]
    fn test_out_of_range_lifetime_is_refused() {
        let config = JwtConfig {
            expiration_hours: i64::MAX,
            ..config()
        };

        assert_eq!(
            create_token("user-123", UserRole::User, &config),
            Err(TokenError::Signing)
        );
    }

    #[test]
    fn test_foreign_signature() {
        let token = create_token("user-123", UserRole::User, &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            ..config()
        };

        assert_eq!(verify_token(&token, &other), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token() {
        assert_eq!(
            verify_token("invalid-token", &config()),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_wrong_issuer() {
        let token = create_token("user-123", UserRole::User, &config()).unwrap();
        let other = JwtConfig {
            issuer: "someone-else".to_string(),
            ..config()
        };

        assert_eq!(verify_token(&token, &other), Err(TokenError::Malformed));
    }

    #[test]
    fn test_debug_redacts_secret() {
        assert!(!format!("{:?}", config()).contains("test-secret"));
    }
}
