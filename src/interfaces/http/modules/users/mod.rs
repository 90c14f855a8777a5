//! User management: admin CRUD and the caller's own profile

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
