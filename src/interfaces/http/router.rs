//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{ModuleInfoService, UserService};
use crate::domain::UserRole;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::database::{ModuleInfoRepository, UserRepository};
use crate::interfaces::http::common::ErrorResponse;
use crate::interfaces::http::middleware::{auth_middleware, require_role, AuthState};
use crate::interfaces::http::modules::{
    auth, health, metrics as metrics_module, module_info, request_id, users,
};

/// Everything the HTTP surface needs from the rest of the process
pub struct RouterDeps {
    pub db: DatabaseConnection,
    pub users: Arc<UserService<UserRepository>>,
    pub modules: Arc<ModuleInfoService<ModuleInfoRepository>>,
    pub jwt_config: JwtConfig,
    /// Mount unauthenticated `/moduleinfo` CRUD
    pub public_module_info: bool,
    pub prometheus: PrometheusHandle,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from POST /login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::activate,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::current_user,
        module_info::create_module,
        module_info::list_modules,
        module_info::get_module,
        module_info::update_module,
        module_info::delete_module,
    ),
    components(schemas(
        ErrorResponse,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::ActivationResponse,
        users::UserDto,
        users::UpdateUserRequest,
        module_info::ModuleInfoDto,
        module_info::ModuleInfoRequest,
        health::HealthResponse,
        health::ComponentHealth,
        UserRole,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, activation and login"),
        (name = "Users", description = "Account administration"),
        (name = "ModuleInfo", description = "Module catalogue"),
    ),
    info(title = "ModuleInfo Service API", version = "0.1.0")
)]
pub struct ApiDoc;

fn module_info_routes(base: &str) -> Router<module_info::ModuleInfoState> {
    Router::new()
        .route(
            base,
            post(module_info::create_module).get(module_info::list_modules),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(module_info::get_module)
                .put(module_info::update_module)
                .delete(module_info::delete_module),
        )
}

/// Create the API router
pub fn create_api_router(deps: RouterDeps) -> Router {
    let auth_state = AuthState {
        jwt_config: deps.jwt_config,
    };
    let users_state = users::UsersState {
        users: Arc::clone(&deps.users),
    };
    let modules_state = module_info::ModuleInfoState {
        modules: Arc::clone(&deps.modules),
    };

    // Public: register, login, activate
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/activate/{token}", get(auth::activate))
        .with_state(auth::AuthHandlerState {
            users: Arc::clone(&deps.users),
        });

    // Any authenticated user
    let profile_routes = Router::new()
        .route("/api/me", get(users::current_user))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(users_state.clone());

    // ADMIN only
    let admin_user_routes = Router::new()
        .route("/api/users", get(users::list_users))
        .route(
            "/api/admin/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(UserRole::Admin, require_role))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(users_state);

    let admin_module_routes = module_info_routes("/api/moduleinfo")
        .route_layer(middleware::from_fn_with_state(UserRole::Admin, require_role))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(modules_state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: deps.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_module::prometheus_metrics))
        .with_state(metrics_module::MetricsState {
            handle: deps.prometheus,
        });

    let mut router = Router::new()
        .merge(auth_routes)
        .merge(profile_routes)
        .merge(admin_user_routes)
        .merge(admin_module_routes)
        .merge(health_routes)
        .merge(metrics_routes);

    if deps.public_module_info {
        router = router.merge(module_info_routes("/moduleinfo").with_state(modules_state));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // route_layer so MatchedPath is already set when metrics are recorded
        .route_layer(middleware::from_fn(metrics_module::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
}
