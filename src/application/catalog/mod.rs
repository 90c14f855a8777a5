//! Catalog module: module-info CRUD

pub mod service;

pub use service::ModuleInfoService;
