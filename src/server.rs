//! Service runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database
//! connect + migrations, optional bootstrap admin, the HTTP server and
//! graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{IdentitySettings, ModuleInfoService, UserService};
use crate::config::AppConfig;
use crate::infrastructure::crypto::PasswordHasher;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::{ModuleInfoRepository, UserRepository};
use crate::infrastructure::{build_notifier, init_database, DatabaseConfig};
use crate::interfaces::http::{create_api_router, RouterDeps};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
///
/// ```rust,no_run
/// use modinfo::server::{ServerHandle, ServerOptions};
///
/// # async fn run() -> Result<(), modinfo::server::BoxError> {
/// let handle = ServerHandle::start(ServerOptions::default()).await?;
/// handle.install_signal_handler();
/// handle.wait().await;
/// # Ok(())
/// # }
/// ```
pub struct ServerHandle {
    pub config: AppConfig,
    /// Port the HTTP server is bound to.
    pub port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, BoxError> {
        let app_cfg = opts.config;

        info!("Starting modinfo-service...");

        let prometheus = prometheus_handle()?;

        if app_cfg.uses_default_secret() {
            warn!("JWT secret is the built-in default; set [security].jwt_secret or JWT_SECRET");
        }
        let jwt_config = app_cfg.security.jwt_config();
        info!(
            expiration_hours = jwt_config.expiration_hours,
            issuer = %jwt_config.issuer,
            "Session tokens configured"
        );

        // ── Database ───────────────────────────────────────────
        let db_config = DatabaseConfig::from(&app_cfg.database);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Services ───────────────────────────────────────────
        let notifier = build_notifier(&app_cfg.mail)?;
        info!(provider = ?app_cfg.mail.provider, "Activation notifier ready");

        let users = Arc::new(UserService::new(
            Arc::new(UserRepository::new(db.clone())),
            notifier,
            IdentitySettings {
                jwt: jwt_config.clone(),
                hasher: PasswordHasher::new(app_cfg.security.bcrypt_cost),
                public_base_url: app_cfg.server.public_base_url.clone(),
                notify_timeout: Duration::from_secs(app_cfg.mail.timeout_secs),
            },
        ));
        let modules = Arc::new(ModuleInfoService::new(Arc::new(ModuleInfoRepository::new(
            db.clone(),
        ))));

        if let Some(admin) = &app_cfg.admin {
            match users.ensure_admin(&admin.email, &admin.name, &admin.password).await {
                Ok(true) => info!(email = %admin.email, "Bootstrap admin created"),
                Ok(false) => info!(email = %admin.email, "Bootstrap admin already present"),
                Err(e) => error!(error = %e, "Failed to create bootstrap admin"),
            }
        }

        // ── HTTP server ────────────────────────────────────────
        let router = create_api_router(RouterDeps {
            db: db.clone(),
            users,
            modules,
            jwt_config,
            public_module_info: app_cfg.access.public_module_info,
            prometheus,
        });

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);
        if !app_cfg.access.public_module_info {
            info!("Public /moduleinfo routes disabled");
        }

        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config: app_cfg,
            port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM / SIGINT listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait until shutdown is triggered and the server has drained.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .drain(async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("In-flight requests were cut off");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("modinfo-service shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; later
/// starts in the same process reuse it.
fn prometheus_handle() -> Result<PrometheusHandle, BoxError> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Initialize tracing from the application config. `RUST_LOG` wins over
/// `[logging].level`.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
