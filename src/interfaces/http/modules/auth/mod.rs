//! Authentication module: register, login, activate

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
