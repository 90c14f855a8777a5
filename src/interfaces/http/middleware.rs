//! Authentication middleware for Axum
//!
//! `auth_middleware` turns a bearer token into an [`AuthenticatedUser`]
//! request extension; `require_role` then checks the attached identity
//! against the role a route group demands. Public routes carry neither.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::domain::UserRole;
use crate::infrastructure::crypto::{verify_token, JwtConfig, SessionClaims, TokenError};
use crate::interfaces::http::common::ErrorResponse;

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
            AuthError::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "Insufficient permissions")
            }
        };

        ErrorResponse::new(message).into_response_with(status)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        }
    }
}

/// Authentication state containing the JWT config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Identity attached to a request that passed [`auth_middleware`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: UserRole,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return AuthError::MissingToken.into_response();
    };

    let Some(token) = extract_token(auth_header) else {
        return AuthError::InvalidToken.into_response();
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            let user = AuthenticatedUser::from(claims);
            tracing::debug!(user_id = %user.user_id, role = %user.role, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => AuthError::from(e).into_response(),
    }
}

/// Role gate. Mount with `from_fn_with_state(UserRole::Admin, require_role)`
/// inside a group already covered by [`auth_middleware`].
pub async fn require_role(
    State(required): State<UserRole>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return AuthError::MissingToken.into_response();
    };

    if !user.role.satisfies(required) {
        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            required = %required,
            "Rejected request with insufficient role"
        );
        return AuthError::InsufficientPermissions.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum::{middleware, Router};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::crypto::create_token;
    use crate::infrastructure::crypto::jwt::encode_claims;
    use crate::test_support::test_jwt_config;

    async fn whoami(user: AuthenticatedUser) -> String {
        format!("{}:{}", user.user_id, user.role)
    }

    fn app(required: Option<UserRole>) -> Router {
        let state = AuthState {
            jwt_config: test_jwt_config(),
        };

        let mut router = Router::new().route("/whoami", get(whoami));
        if let Some(role) = required {
            router = router.route_layer(middleware::from_fn_with_state(role, require_role));
        }
        router.route_layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(router: Router, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::get("/whoami");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn bearer(role: UserRole) -> String {
        let token = create_token("user-1", role, &test_jwt_config()).unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn missing_header_is_401() {
        let (status, body) = call(app(None), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"error\""));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_401() {
        let (status, _) = call(app(None), Some("Basic dXNlcjpwYXNz".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let (status, body) = call(app(None), Some(bearer(UserRole::User))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user-1:USER");
    }

    #[tokio::test]
    async fn user_token_on_admin_route_is_403() {
        let (status, body) = call(app(Some(UserRole::Admin)), Some(bearer(UserRole::User))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("Insufficient permissions"));
    }

    #[tokio::test]
    async fn admin_token_on_admin_route_passes() {
        let (status, _) = call(app(Some(UserRole::Admin)), Some(bearer(UserRole::Admin))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn expired_token_is_401_for_every_role() {
        let config = test_jwt_config();
        let claims = SessionClaims::issued_at(
            "user-1",
            UserRole::Admin,
            &config,
            Utc::now() - Duration::hours(2),
        )
        .unwrap();
        let token = encode_claims(&claims, &config).unwrap();

        let (status, body) = call(app(Some(UserRole::Admin)), Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("expired"));
    }

    #[tokio::test]
    async fn tampered_token_is_401() {
        let mut header = bearer(UserRole::User);
        header.push('x');
        let (status, _) = call(app(None), Some(header)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
