//! SeaORM implementation of ModuleInfoRepositoryInterface

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::error;

use crate::domain::{
    DomainError, DomainResult, ModuleInfo, ModuleInfoRepositoryInterface, NewModuleInfo,
};
use crate::infrastructure::database::entities::module_info;

pub struct ModuleInfoRepository {
    db: DatabaseConnection,
}

impl ModuleInfoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    error!(error = %e, "Module store failure");
    DomainError::Internal(format!("Database error: {}", e))
}

fn to_domain(model: module_info::Model) -> ModuleInfo {
    ModuleInfo {
        id: model.id,
        module_name: model.module_name,
        module_duration: model.module_duration,
        exam_type: model.exam_type,
        version: model.version,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl ModuleInfoRepositoryInterface for ModuleInfoRepository {
    async fn create_module(&self, module: NewModuleInfo) -> DomainResult<ModuleInfo> {
        let now = Utc::now();
        let active = module_info::ActiveModel {
            module_name: Set(module.module_name),
            module_duration: Set(module.module_duration),
            exam_type: Set(module.exam_type),
            version: Set(module.version),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(model))
    }

    async fn list_modules(&self) -> DomainResult<Vec<ModuleInfo>> {
        let models = module_info::Entity::find()
            .order_by_asc(module_info::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn get_module(&self, id: i32) -> DomainResult<Option<ModuleInfo>> {
        let model = module_info::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_domain))
    }

    async fn update_module(
        &self,
        id: i32,
        module: NewModuleInfo,
    ) -> DomainResult<Option<ModuleInfo>> {
        let Some(existing) = module_info::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut active: module_info::ActiveModel = existing.into();
        active.module_name = Set(module.module_name);
        active.module_duration = Set(module.module_duration);
        active.exam_type = Set(module.exam_type);
        active.version = Set(module.version);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(to_domain(updated)))
    }

    async fn delete_module(&self, id: i32) -> DomainResult<()> {
        let result = module_info::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::module_not_found(id));
        }

        Ok(())
    }
}
