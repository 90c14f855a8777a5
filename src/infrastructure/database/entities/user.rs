//! User entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Stored role value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserRole {
    #[default]
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub activated: bool,
    #[sea_orm(unique, nullable)]
    pub activation_link: Option<String>,
    #[sea_orm(nullable)]
    pub activated_at: Option<DateTime<Utc>>,
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_role_defaults_to_user() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserRole::default().to_value(), "USER");
    }
}
