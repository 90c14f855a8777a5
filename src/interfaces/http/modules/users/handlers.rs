//! User management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{UpdateUserRequest, UserDto};
use crate::application::UserService;
use crate::infrastructure::database::UserRepository;
use crate::interfaces::http::common::{ApiResult, ErrorResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<UserService<UserRepository>>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = Vec<UserDto>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<UsersState>) -> ApiResult<Json<Vec<UserDto>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserDto),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<UsersState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.get_user(&id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<UsersState>,
    admin: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    tracing::info!(admin_id = %admin.user_id, user_id = %id, "Admin editing user");
    let user = state.users.update_user(&id, request.into()).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<UsersState>,
    admin: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    tracing::info!(admin_id = %admin.user_id, user_id = %id, "Admin deleting user");
    state.users.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
pub async fn current_user(
    State(state): State<UsersState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.get_user(&user.user_id).await?.into()))
}
