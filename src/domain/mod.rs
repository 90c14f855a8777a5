//! Domain layer
//!
//! Plain data types, repository ports and the error taxonomy. No I/O lives
//! here; adapters in `infrastructure` implement the ports.

pub mod error;
pub mod module_info;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use module_info::{ModuleInfo, ModuleInfoRepositoryInterface, NewModuleInfo};
pub use user::{
    normalize_email, ActivationOutcome, CreateUserDto, UpdateUserDto, User,
    UserRepositoryInterface, UserRole,
};
