use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// A course module in the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: i32,
    pub module_name: String,
    /// Duration in weeks
    pub module_duration: i32,
    pub exam_type: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set used both for creation and for full replacement (PUT).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModuleInfo {
    pub module_name: String,
    pub module_duration: i32,
    pub exam_type: String,
    pub version: String,
}

impl NewModuleInfo {
    pub fn validate(&self) -> DomainResult<()> {
        if self.module_name.trim().is_empty() {
            return Err(DomainError::Validation("module name is required".into()));
        }
        if self.module_duration <= 0 {
            return Err(DomainError::Validation(
                "module duration must be positive".into(),
            ));
        }
        if self.exam_type.trim().is_empty() {
            return Err(DomainError::Validation("exam type is required".into()));
        }
        if self.version.trim().is_empty() {
            return Err(DomainError::Validation("version is required".into()));
        }
        Ok(())
    }
}
