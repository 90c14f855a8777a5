//! Authentication API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{ActivationResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::application::UserService;
use crate::domain::ActivationOutcome;
use crate::infrastructure::database::UserRepository;
use crate::interfaces::http::common::{ApiResult, ErrorResponse, ValidatedJson};
use crate::interfaces::http::modules::users::UserDto;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub users: Arc<UserService<UserRepository>>,
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, activation link sent", body = UserDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let user = state
        .users
        .register(&request.email, &request.name, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account not activated", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let auth = state.users.login(&request.email, &request.password).await?;
    Ok(Json(auth.into()))
}

#[utoipa::path(
    get,
    path = "/activate/{token}",
    tag = "Authentication",
    params(("token" = String, Path, description = "Activation token from the emailed link")),
    responses(
        (status = 200, description = "Account activated, or link already used", body = ActivationResponse),
        (status = 404, description = "Unknown activation token", body = ErrorResponse)
    )
)]
pub async fn activate(
    State(state): State<AuthHandlerState>,
    Path(token): Path<String>,
) -> ApiResult<Json<ActivationResponse>> {
    let response = match state.users.activate(&token).await? {
        ActivationOutcome::Activated(user) => ActivationResponse {
            message: "Account activated".to_string(),
            already_used: false,
            user: user.into(),
        },
        ActivationOutcome::AlreadyUsed(user) => ActivationResponse {
            message: "Activation link already used".to_string(),
            already_used: true,
            user: user.into(),
        },
    };

    Ok(Json(response))
}
