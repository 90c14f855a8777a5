//! ModuleInfo aggregate: the catalogue resource gated by the auth layer

pub mod model;
pub mod repository;

pub use model::{ModuleInfo, NewModuleInfo};
pub use repository::ModuleInfoRepositoryInterface;
