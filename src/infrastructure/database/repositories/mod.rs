//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories.

pub mod module_info_repository;
pub mod user_repository;

pub use module_info_repository::ModuleInfoRepository;
pub use user_repository::UserRepository;
