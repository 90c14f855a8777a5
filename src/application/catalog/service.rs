use std::sync::Arc;

use tracing::info;

use crate::domain::{
    DomainError, DomainResult, ModuleInfo, ModuleInfoRepositoryInterface, NewModuleInfo,
};

/// Module catalogue use-cases. Access control happens in the HTTP layer.
pub struct ModuleInfoService<R: ModuleInfoRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: ModuleInfoRepositoryInterface> ModuleInfoService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, module: NewModuleInfo) -> DomainResult<ModuleInfo> {
        let module = normalize(module);
        module.validate()?;

        let created = self.repo.create_module(module).await?;
        info!(module_id = created.id, name = %created.module_name, "Module created");
        Ok(created)
    }

    pub async fn list(&self) -> DomainResult<Vec<ModuleInfo>> {
        self.repo.list_modules().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<ModuleInfo> {
        self.repo
            .get_module(id)
            .await?
            .ok_or_else(|| DomainError::module_not_found(id))
    }

    /// Full replacement of every editable field.
    pub async fn update(&self, id: i32, module: NewModuleInfo) -> DomainResult<ModuleInfo> {
        let module = normalize(module);
        module.validate()?;

        let updated = self
            .repo
            .update_module(id, module)
            .await?
            .ok_or_else(|| DomainError::module_not_found(id))?;

        info!(module_id = id, "Module updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.repo.delete_module(id).await?;
        info!(module_id = id, "Module deleted");
        Ok(())
    }
}

fn normalize(module: NewModuleInfo) -> NewModuleInfo {
    NewModuleInfo {
        module_name: module.module_name.trim().to_string(),
        module_duration: module.module_duration,
        exam_type: module.exam_type.trim().to_string(),
        version: module.version.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::ModuleInfoRepository;
    use crate::test_support::memory_db;

    async fn service() -> ModuleInfoService<ModuleInfoRepository> {
        ModuleInfoService::new(Arc::new(ModuleInfoRepository::new(memory_db().await)))
    }

    fn module(name: &str, duration: i32) -> NewModuleInfo {
        NewModuleInfo {
            module_name: name.into(),
            module_duration: duration,
            exam_type: "Written".into(),
            version: "1.0".into(),
        }
    }

    #[tokio::test]
    async fn create_trims_and_lists() {
        let svc = service().await;

        let created = svc.create(module("  Algebra ", 12)).await.unwrap();
        assert_eq!(created.module_name, "Algebra");

        let all = svc.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
    }

    #[tokio::test]
    async fn invalid_module_is_not_stored() {
        let svc = service().await;

        assert!(matches!(
            svc.create(module("Algebra", 0)).await,
            Err(DomainError::Validation(_))
        ));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_module_is_not_found() {
        let svc = service().await;

        assert!(matches!(svc.get(42).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(
            svc.update(42, module("Algebra", 3)).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(svc.delete(42).await, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_validates_before_touching_the_store() {
        let svc = service().await;
        let created = svc.create(module("Algebra", 12)).await.unwrap();

        let mut bad = module("Algebra", 12);
        bad.version = " ".into();
        assert!(matches!(
            svc.update(created.id, bad).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(svc.get(created.id).await.unwrap().version, "1.0");
    }
}
