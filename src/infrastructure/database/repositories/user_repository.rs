use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::error;

use crate::domain::{
    ActivationOutcome, CreateUserDto, DomainError, DomainResult, UpdateUserDto, User,
    UserRepositoryInterface, UserRole,
};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        activated: model.activated,
        activation_token: model.activation_link,
        activated_at: model.activated_at,
        role: entity_role_to_domain(model.user_role),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    error!(error = %e, "User store failure");
    DomainError::Internal(format!("Database error: {}", e))
}

/// Writes can only collide on `email` in practice; activation tokens carry
/// 256 random bits.
fn write_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::DuplicateEmail,
        _ => db_err(e),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(dto.email),
            name: Set(dto.name),
            password_hash: Set(dto.password_hash),
            activated: Set(dto.activated),
            activation_link: Set(dto.activation_token),
            activated_at: Set(dto.activated.then_some(now)),
            user_role: Set(domain_role_to_entity(dto.role)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user.insert(&self.db).await.map_err(write_err)?;
        Ok(user_model_to_domain(model))
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_activation_token(&self, token: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::ActivationLink.eq(token))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<User> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let existing_activated_at = existing.activated_at;
        let mut active: user::ActiveModel = existing.into();

        if let Some(name) = dto.name {
            active.name = Set(name);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(role) = dto.role {
            active.user_role = Set(domain_role_to_entity(role));
        }
        let now = Utc::now();
        if let Some(activated) = dto.activated {
            if activated && existing_activated_at.is_none() {
                active.activated_at = Set(Some(now));
            }
            active.activated = Set(activated);
        }

        active.updated_at = Set(now);

        let updated = active.update(&self.db).await.map_err(write_err)?;
        Ok(user_model_to_domain(updated))
    }

    async fn mark_activated(&self, token: &str) -> DomainResult<ActivationOutcome> {
        // Single conditional UPDATE: concurrent visits see exactly one winner.
        // Keyed on `activated_at` so a spent link stays spent after an admin
        // deactivates the account.
        let now = Utc::now();
        let result = user::Entity::update_many()
            .col_expr(user::Column::Activated, Expr::value(true))
            .col_expr(user::Column::ActivatedAt, Expr::value(Some(now)))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::ActivationLink.eq(token))
            .filter(user::Column::ActivatedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let user = self
            .get_user_by_activation_token(token)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        if result.rows_affected > 0 {
            Ok(ActivationOutcome::Activated(user))
        } else {
            Ok(ActivationOutcome::AlreadyUsed(user))
        }
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }
}
