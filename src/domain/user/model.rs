use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Coarse authorization tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether a holder of `self` may access a route that requires `required`.
    pub fn satisfies(&self, required: UserRole) -> bool {
        match (self, required) {
            (Self::Admin, _) => true,
            (Self::User, UserRole::User) => true,
            (Self::User, UserRole::Admin) => false,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!("unknown role '{}'", other))),
        }
    }
}

/// User model
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub activated: bool,
    /// Retained after activation so that revisiting the link is a no-op.
    pub activation_token: Option<String>,
    /// Set the first time the account is activated; never cleared. Once set,
    /// the activation link is spent even if an admin later deactivates the
    /// account.
    pub activated_at: Option<DateTime<Utc>>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Credentials stay out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("activated", &self.activated)
            .field("activated_at", &self.activated_at)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Result of visiting an activation link
#[derive(Debug, Clone)]
pub enum ActivationOutcome {
    /// The visit flipped the account to activated.
    Activated(User),
    /// The link was spent by an earlier visit; nothing changed.
    AlreadyUsed(User),
}

impl ActivationOutcome {
    pub fn user(&self) -> &User {
        match self {
            Self::Activated(user) | Self::AlreadyUsed(user) => user,
        }
    }
}

/// Canonical form of an email address: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_satisfies_every_requirement() {
        assert!(UserRole::Admin.satisfies(UserRole::Admin));
        assert!(UserRole::Admin.satisfies(UserRole::User));
        assert!(UserRole::User.satisfies(UserRole::User));
        assert!(!UserRole::User.satisfies(UserRole::Admin));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" USER ".parse::<UserRole>().unwrap(), UserRole::User);
        assert!(matches!(
            "root".parse::<UserRole>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, UserRole::User);
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[test]
    fn debug_output_hides_credentials() {
        let now = Utc::now();
        let user = User {
            id: "u1".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            password_hash: "$2b$04$secret-hash".into(),
            activated: false,
            activation_token: Some("tok".into()),
            activated_at: None,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        let printed = format!("{:?}", user);
        assert!(!printed.contains("secret-hash"));
        assert!(!printed.contains("tok\""));
    }
}
