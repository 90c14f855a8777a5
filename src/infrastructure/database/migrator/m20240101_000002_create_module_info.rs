//! Create module_info table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModuleInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModuleInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModuleInfo::ModuleName).string_len(255).not_null())
                    .col(ColumnDef::new(ModuleInfo::ModuleDuration).integer().not_null())
                    .col(ColumnDef::new(ModuleInfo::ExamType).string_len(255).not_null())
                    .col(ColumnDef::new(ModuleInfo::Version).string_len(64).not_null())
                    .col(
                        ColumnDef::new(ModuleInfo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModuleInfo::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_module_info_module_name")
                    .table(ModuleInfo::Table)
                    .col(ModuleInfo::ModuleName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModuleInfo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ModuleInfo {
    Table,
    Id,
    ModuleName,
    ModuleDuration,
    ExamType,
    Version,
    CreatedAt,
    UpdatedAt,
}
