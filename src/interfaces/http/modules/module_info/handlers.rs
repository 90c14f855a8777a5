//! ModuleInfo handlers
//!
//! The same handlers back `/moduleinfo` (public, optional) and
//! `/api/moduleinfo` (admin); access is decided by the router.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{ModuleInfoDto, ModuleInfoRequest};
use crate::application::ModuleInfoService;
use crate::infrastructure::database::ModuleInfoRepository;
use crate::interfaces::http::common::{ApiResult, ErrorResponse, ValidatedJson};

#[derive(Clone)]
pub struct ModuleInfoState {
    pub modules: Arc<ModuleInfoService<ModuleInfoRepository>>,
}

#[utoipa::path(
    post,
    path = "/api/moduleinfo",
    tag = "ModuleInfo",
    security(("bearer_auth" = [])),
    request_body = ModuleInfoRequest,
    responses(
        (status = 201, description = "Module created", body = ModuleInfoDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn create_module(
    State(state): State<ModuleInfoState>,
    ValidatedJson(request): ValidatedJson<ModuleInfoRequest>,
) -> ApiResult<(StatusCode, Json<ModuleInfoDto>)> {
    let module = state.modules.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(module.into())))
}

#[utoipa::path(
    get,
    path = "/api/moduleinfo",
    tag = "ModuleInfo",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All modules", body = Vec<ModuleInfoDto>))
)]
pub async fn list_modules(
    State(state): State<ModuleInfoState>,
) -> ApiResult<Json<Vec<ModuleInfoDto>>> {
    let modules = state.modules.list().await?;
    Ok(Json(modules.into_iter().map(ModuleInfoDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/moduleinfo/{id}",
    tag = "ModuleInfo",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Module ID")),
    responses(
        (status = 200, description = "Module", body = ModuleInfoDto),
        (status = 404, description = "Module not found", body = ErrorResponse)
    )
)]
pub async fn get_module(
    State(state): State<ModuleInfoState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ModuleInfoDto>> {
    Ok(Json(state.modules.get(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/moduleinfo/{id}",
    tag = "ModuleInfo",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Module ID")),
    request_body = ModuleInfoRequest,
    responses(
        (status = 200, description = "Module replaced", body = ModuleInfoDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse)
    )
)]
pub async fn update_module(
    State(state): State<ModuleInfoState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ModuleInfoRequest>,
) -> ApiResult<Json<ModuleInfoDto>> {
    Ok(Json(state.modules.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/moduleinfo/{id}",
    tag = "ModuleInfo",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Module ID")),
    responses(
        (status = 204, description = "Module deleted"),
        (status = 404, description = "Module not found", body = ErrorResponse)
    )
)]
pub async fn delete_module(
    State(state): State<ModuleInfoState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.modules.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
