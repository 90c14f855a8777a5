use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{ModuleInfo, NewModuleInfo};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModuleInfoDto {
    pub id: i32,
    pub module_name: String,
    /// Duration in weeks
    pub module_duration: i32,
    pub exam_type: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ModuleInfo> for ModuleInfoDto {
    fn from(m: ModuleInfo) -> Self {
        Self {
            id: m.id,
            module_name: m.module_name,
            module_duration: m.module_duration,
            exam_type: m.exam_type,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Body for create and full update. PascalCase keys sent by older clients
/// are accepted too.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ModuleInfoRequest {
    #[serde(alias = "ModuleName")]
    #[validate(length(min = 1, max = 200, message = "module name is required"))]
    pub module_name: String,
    #[serde(alias = "ModuleDuration")]
    #[validate(range(min = 1, message = "module duration must be positive"))]
    pub module_duration: i32,
    #[serde(alias = "ExamType")]
    #[validate(length(min = 1, max = 100, message = "exam type is required"))]
    pub exam_type: String,
    #[serde(alias = "Version")]
    #[validate(length(min = 1, max = 50, message = "version is required"))]
    pub version: String,
}

impl From<ModuleInfoRequest> for NewModuleInfo {
    fn from(req: ModuleInfoRequest) -> Self {
        Self {
            module_name: req.module_name,
            module_duration: req.module_duration,
            exam_type: req.exam_type,
            version: req.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pascal_case_keys() {
        let req: ModuleInfoRequest = serde_json::from_str(
            r#"{"ModuleName":"Test Module","ModuleDuration":10,"ExamType":"Test Exam","Version":"1.0"}"#,
        )
        .unwrap();
        assert_eq!(req.module_name, "Test Module");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn zero_duration_fails_validation() {
        let req: ModuleInfoRequest = serde_json::from_str(
            r#"{"module_name":"M","module_duration":0,"exam_type":"E","version":"1"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
