//! User service: application-layer orchestration
//!
//! Register, activate and login flows plus the admin-only user management
//! use-cases. HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use validator::ValidateEmail;

use crate::application::ports::{ActivationMessage, Notifier};
use crate::domain::{
    normalize_email, ActivationOutcome, CreateUserDto, DomainError, DomainResult,
    UpdateUserDto, User, UserRepositoryInterface, UserRole,
};
use crate::infrastructure::crypto::{
    activation_link, create_token, generate_activation_token, is_well_formed_token, JwtConfig,
    PasswordError, PasswordHasher,
};

/// bcrypt only looks at the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub user: User,
}

/// Knobs the identity flows need besides their collaborators
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub jwt: JwtConfig,
    pub hasher: PasswordHasher,
    /// Base URL activation links are built on, e.g. `https://api.example.com`
    pub public_base_url: String,
    /// Upper bound on a single activation notification
    pub notify_timeout: Duration,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            hasher: PasswordHasher::default(),
            public_base_url: "http://localhost:8080".to_string(),
            notify_timeout: Duration::from_secs(10),
        }
    }
}

/// User service: orchestrates all identity / user-management use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    notifier: Arc<dyn Notifier>,
    settings: IdentitySettings,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>, notifier: Arc<dyn Notifier>, settings: IdentitySettings) -> Self {
        Self {
            repo,
            notifier,
            settings,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.settings.jwt
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new, not yet activated user and mail them an activation link.
    pub async fn register(&self, email: &str, name: &str, password: &str) -> DomainResult<User> {
        let email = normalize_email(email);
        let name = name.trim().to_string();
        validate_email(&email)?;
        validate_name(&name)?;
        validate_password(password)?;

        // Fast path; the unique constraint in the store is what actually
        // settles concurrent registrations.
        if self.repo.get_user_by_email(&email).await?.is_some() {
            return Err(DomainError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;
        let token = generate_activation_token();

        let user = self
            .repo
            .create_user(CreateUserDto {
                email,
                name,
                password_hash,
                activation_token: Some(token.clone()),
                activated: false,
                role: UserRole::User,
            })
            .await?;

        metrics::counter!("auth_registrations_total").increment(1);
        info!(user_id = %user.id, "New user registered");

        self.dispatch_activation(ActivationMessage {
            email: user.email.clone(),
            name: user.name.clone(),
            link: activation_link(&self.settings.public_base_url, &token),
        });

        Ok(user)
    }

    /// Hand the activation message to the notifier without waiting for it.
    fn dispatch_activation(&self, message: ActivationMessage) {
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.settings.notify_timeout;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, notifier.send_activation(&message)).await {
                Ok(Ok(())) => debug!("Activation notification delivered"),
                Ok(Err(e)) => warn!(error = %e, "Activation notification failed"),
                Err(_) => warn!(timeout_secs = timeout.as_secs(), "Activation notification timed out"),
            }
        });
    }

    // ── Activation ──────────────────────────────────────────────

    /// Visit an activation link. Revisiting an already used link succeeds
    /// without changing anything, even if the account was deactivated since.
    pub async fn activate(&self, token: &str) -> DomainResult<ActivationOutcome> {
        if !is_well_formed_token(token) {
            metrics::counter!("auth_activations_total", "outcome" => "invalid").increment(1);
            return Err(DomainError::InvalidToken);
        }

        let outcome = match self.repo.mark_activated(token).await {
            Ok(outcome) => outcome,
            Err(DomainError::InvalidToken) => {
                metrics::counter!("auth_activations_total", "outcome" => "invalid").increment(1);
                return Err(DomainError::InvalidToken);
            }
            Err(e) => return Err(e),
        };

        match &outcome {
            ActivationOutcome::Activated(user) => {
                metrics::counter!("auth_activations_total", "outcome" => "activated").increment(1);
                info!(user_id = %user.id, "Account activated");
            }
            ActivationOutcome::AlreadyUsed(user) => {
                metrics::counter!("auth_activations_total", "outcome" => "repeat").increment(1);
                debug!(user_id = %user.id, "Activation link revisited");
            }
        }

        Ok(outcome)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and issue a session token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let email = normalize_email(email);

        let Some(user) = self.repo.get_user_by_email(&email).await? else {
            let hasher = self.settings.hasher.clone();
            let password = password.to_string();
            run_blocking(move || hasher.verify_dummy(&password)).await?;
            metrics::counter!("auth_logins_total", "outcome" => "failed").increment(1);
            return Err(DomainError::AuthenticationFailed);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            metrics::counter!("auth_logins_total", "outcome" => "failed").increment(1);
            return Err(DomainError::AuthenticationFailed);
        }

        if !user.activated {
            metrics::counter!("auth_logins_total", "outcome" => "not_activated").increment(1);
            return Err(DomainError::AccountNotActivated);
        }

        let token = create_token(&user.id, user.role, &self.settings.jwt)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            user,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list_users().await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Admin edit of profile, role and activation state.
    pub async fn update_user(&self, id: &str, mut dto: UpdateUserDto) -> DomainResult<User> {
        if let Some(email) = dto.email.as_deref() {
            let email = normalize_email(email);
            validate_email(&email)?;
            dto.email = Some(email);
        }
        if let Some(name) = dto.name.as_deref() {
            let name = name.trim().to_string();
            validate_name(&name)?;
            dto.name = Some(name);
        }

        let user = self.repo.update_user(id, dto).await?;
        info!(user_id = %user.id, role = %user.role, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.repo.delete_user(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Create an already activated administrator. Used to bootstrap a fresh
    /// deployment; an existing account with the same email is left untouched.
    pub async fn ensure_admin(&self, email: &str, name: &str, password: &str) -> DomainResult<bool> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_name(name.trim())?;
        validate_password(password)?;

        if self.repo.get_user_by_email(&email).await?.is_some() {
            return Ok(false);
        }

        let password_hash = self.hash_password(password).await?;
        match self
            .repo
            .create_user(CreateUserDto {
                email,
                name: name.trim().to_string(),
                password_hash,
                activation_token: None,
                activated: true,
                role: UserRole::Admin,
            })
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, "Bootstrap admin created");
                Ok(true)
            }
            Err(DomainError::DuplicateEmail) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn hash_password(&self, password: &str) -> DomainResult<String> {
        let hasher = self.settings.hasher.clone();
        let password = password.to_string();
        run_blocking(move || hasher.hash(&password))
            .await?
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let hasher = self.settings.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        match run_blocking(move || hasher.verify(&password, &hash)).await? {
            Ok(valid) => Ok(valid),
            Err(PasswordError::MalformedHash) | Err(PasswordError::Hash) => {
                warn!("Stored password hash could not be parsed");
                Err(DomainError::Internal("password verification failed".into()))
            }
        }
    }
}

/// bcrypt is CPU-bound; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> DomainResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::Internal(format!("blocking task failed: {}", e)))
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(DomainError::Validation("Invalid email address".into()))
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.is_empty() || name.chars().count() > 100 {
        return Err(DomainError::Validation("Name must be 1-100 characters".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.is_empty() {
        return Err(DomainError::Validation("Password is required".into()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::Validation(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::prelude::Expr;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    use crate::infrastructure::crypto::verify_token;
    use crate::infrastructure::database::entities::user;
    use crate::infrastructure::database::UserRepository;
    use crate::test_support::{
        memory_db, test_settings, FailingNotifier, RecordingNotifier, SlowNotifier,
    };

    async fn service_with(notifier: Arc<dyn Notifier>) -> UserService<UserRepository> {
        let repo = Arc::new(UserRepository::new(memory_db().await));
        UserService::new(repo, notifier, test_settings())
    }

    async fn service() -> (UserService<UserRepository>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (service_with(notifier.clone()).await, notifier)
    }

    fn token_from_link(link: &str) -> String {
        link.rsplit('/').next().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn register_creates_inactive_user_and_sends_link() {
        let (svc, notifier) = service().await;

        let user = svc.register(" A@X.com ", "A", "p1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(!user.activated);
        assert_eq!(user.role, UserRole::User);
        assert_ne!(user.password_hash, "p1");

        let messages = notifier.wait_for(1).await;
        assert_eq!(messages[0].email, "a@x.com");
        assert!(messages[0].link.starts_with("http://test.local/activate/"));
        assert_eq!(
            Some(token_from_link(&messages[0].link)),
            user.activation_token
        );
    }

    #[tokio::test]
    async fn login_requires_activation() {
        let (svc, notifier) = service().await;
        svc.register("a@x.com", "A", "p1").await.unwrap();

        assert_eq!(
            svc.login("a@x.com", "p1").await.unwrap_err(),
            DomainError::AccountNotActivated
        );

        let link = notifier.wait_for(1).await[0].link.clone();
        svc.activate(&token_from_link(&link)).await.unwrap();

        let auth = svc.login("a@x.com", "p1").await.unwrap();
        let claims = verify_token(&auth.token, svc.jwt_config()).unwrap();
        assert_eq!(claims.sub, auth.user.id);
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(auth.token_type, "Bearer");
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_hard_error() {
        let (svc, _) = service().await;
        svc.register("a@x.com", "A", "p1").await.unwrap();

        assert_eq!(
            svc.register("A@x.com", "Other", "p2").await.unwrap_err(),
            DomainError::DuplicateEmail
        );
        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (svc, _) = service().await;
        svc.register("a@x.com", "A", "p1").await.unwrap();

        let wrong_password = svc.login("a@x.com", "nope").await.unwrap_err();
        let unknown_email = svc.login("ghost@x.com", "p1").await.unwrap_err();

        assert_eq!(wrong_password, DomainError::AuthenticationFailed);
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn activation_is_idempotent() {
        let (svc, notifier) = service().await;
        svc.register("a@x.com", "A", "p1").await.unwrap();
        let token = token_from_link(&notifier.wait_for(1).await[0].link);

        let first = svc.activate(&token).await.unwrap();
        let second = svc.activate(&token).await.unwrap();

        assert!(matches!(first, ActivationOutcome::Activated(_)));
        assert!(matches!(second, ActivationOutcome::AlreadyUsed(_)));
        assert!(second.user().activated);
        assert_eq!(second.user().role, UserRole::User);
    }

    #[tokio::test]
    async fn spent_link_cannot_undo_an_admin_deactivation() {
        let (svc, notifier) = service().await;
        let user = svc.register("a@x.com", "A", "p1").await.unwrap();
        let token = token_from_link(&notifier.wait_for(1).await[0].link);
        svc.activate(&token).await.unwrap();

        svc.update_user(
            &user.id,
            UpdateUserDto {
                activated: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(
            svc.login("a@x.com", "p1").await.unwrap_err(),
            DomainError::AccountNotActivated
        );

        let again = svc.activate(&token).await.unwrap();
        assert!(matches!(again, ActivationOutcome::AlreadyUsed(_)));
        assert!(!again.user().activated);
        assert_eq!(
            svc.login("a@x.com", "p1").await.unwrap_err(),
            DomainError::AccountNotActivated
        );
    }

    #[tokio::test]
    async fn unknown_activation_token_is_rejected() {
        let (svc, _) = service().await;

        assert_eq!(
            svc.activate(&generate_activation_token()).await.unwrap_err(),
            DomainError::InvalidToken
        );
        assert_eq!(
            svc.activate("../../etc/passwd").await.unwrap_err(),
            DomainError::InvalidToken
        );
    }

    #[tokio::test]
    async fn registration_survives_notifier_failure() {
        let svc = service_with(Arc::new(FailingNotifier)).await;

        let user = svc.register("a@x.com", "A", "p1").await.unwrap();
        assert_eq!(svc.get_user(&user.id).await.unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn registration_does_not_wait_for_slow_notifier() {
        let svc = service_with(Arc::new(SlowNotifier(Duration::from_secs(30)))).await;

        let started = std::time::Instant::now();
        svc.register("a@x.com", "A", "p1").await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_the_store() {
        let (svc, _) = service().await;

        for email in ["not-an-email", "a@", "@x.com", "a b@x.com", "a@x..com"] {
            assert!(
                matches!(
                    svc.register(email, "A", "p1").await,
                    Err(DomainError::Validation(_))
                ),
                "{}",
                email
            );
        }
        assert!(matches!(
            svc.ensure_admin("root@", "Root", "secret").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.register("a@x.com", "   ", "p1").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.register("a@x.com", "A", "").await,
            Err(DomainError::Validation(_))
        ));
        assert!(svc.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_edit_normalizes_and_promotes() {
        let (svc, _) = service().await;
        let user = svc.register("a@x.com", "A", "p1").await.unwrap();

        let updated = svc
            .update_user(
                &user.id,
                UpdateUserDto {
                    email: Some(" Updated@Example.com".into()),
                    name: Some("Updated User".into()),
                    role: Some(UserRole::Admin),
                    activated: Some(true),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "updated@example.com");
        assert_eq!(updated.role, UserRole::Admin);
        assert!(updated.activated);
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let (svc, _) = service().await;

        assert!(svc.ensure_admin("root@x.com", "Root", "secret").await.unwrap());
        assert!(!svc.ensure_admin("root@x.com", "Root", "secret").await.unwrap());

        let auth = svc.login("root@x.com", "secret").await.unwrap();
        assert_eq!(auth.user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn corrupted_stored_hash_is_an_internal_error() {
        let db = memory_db().await;
        let repo = Arc::new(UserRepository::new(db.clone()));
        let svc = UserService::new(
            repo.clone(),
            Arc::new(RecordingNotifier::default()),
            test_settings(),
        );
        assert!(svc.ensure_admin("root@x.com", "Root", "secret").await.unwrap());

        user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value("not-a-bcrypt-hash"))
            .filter(user::Column::Email.eq("root@x.com"))
            .exec(&db)
            .await
            .unwrap();

        assert!(matches!(
            svc.login("root@x.com", "secret").await,
            Err(DomainError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (svc, _) = service().await;
        let user = svc.register("a@x.com", "A", "p1").await.unwrap();

        svc.delete_user(&user.id).await.unwrap();
        assert!(matches!(
            svc.get_user(&user.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
