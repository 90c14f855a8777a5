//! Database entities module

pub mod module_info;
pub mod user;

pub use module_info::Entity as ModuleInfo;
pub use user::Entity as User;
