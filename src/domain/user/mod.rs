//! User aggregate
//!
//! Contains the User entity, DTOs, and the credential store interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

pub use model::{normalize_email, ActivationOutcome, User, UserRole};

pub use dto_create::CreateUserDto;
pub use dto_update::UpdateUserDto;

pub use repository::UserRepositoryInterface;
