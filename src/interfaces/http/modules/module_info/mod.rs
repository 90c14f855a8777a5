//! ModuleInfo catalogue: public and admin CRUD share these handlers

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
