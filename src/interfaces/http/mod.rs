//! HTTP REST API interfaces
//!
//! - `common`: error rendering, validated JSON extractor
//! - `middleware`: bearer-token authentication and role gates
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, RouterDeps};
