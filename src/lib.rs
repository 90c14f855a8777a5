//! # modinfo-service
//!
//! Account registration with emailed activation links, stateless JWT
//! sessions, USER/ADMIN role gates and a small module catalogue.
//!
//! ## Architecture
//!
//! - **domain**: users, roles, modules, repository traits, error taxonomy
//! - **application**: register / activate / login and catalogue use-cases
//! - **infrastructure**: bcrypt, activation tokens, JWT, SeaORM store, mail
//! - **interfaces::http**: axum router, auth middleware, Swagger docs
//! - **server**: process bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::{create_api_router, RouterDeps};
