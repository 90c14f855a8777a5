use async_trait::async_trait;

use super::{ModuleInfo, NewModuleInfo};
use crate::domain::DomainResult;

#[async_trait]
pub trait ModuleInfoRepositoryInterface: Send + Sync {
    async fn create_module(&self, module: NewModuleInfo) -> DomainResult<ModuleInfo>;
    async fn list_modules(&self) -> DomainResult<Vec<ModuleInfo>>;
    async fn get_module(&self, id: i32) -> DomainResult<Option<ModuleInfo>>;
    /// Replace all editable fields. `Ok(None)` when the id is unknown.
    async fn update_module(&self, id: i32, module: NewModuleInfo)
        -> DomainResult<Option<ModuleInfo>>;
    async fn delete_module(&self, id: i32) -> DomainResult<()>;
}
