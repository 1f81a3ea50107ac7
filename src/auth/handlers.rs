use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
            ResetPasswordRequest, SignupRequest,
        },
        services::AuthService,
    },
    error::AppError,
    extractors::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/test", get(test))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

pub async fn test() -> &'static str {
    "Auth route working ✅"
}

#[instrument(skip(auth, payload))]
pub async fn signup(
    State(auth): State<AuthService>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let res = auth.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(auth, payload))]
pub async fn login(
    State(auth): State<AuthService>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(auth.login(payload).await?))
}

#[instrument(skip(auth, payload))]
pub async fn forgot_password(
    State(auth): State<AuthService>,
    JsonBody(payload): JsonBody<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(auth.forgot_password(payload).await?))
}

#[instrument(skip(auth, payload))]
pub async fn reset_password(
    State(auth): State<AuthService>,
    JsonBody(payload): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(auth.reset_password(payload).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::dto::PublicUser;

    #[test]
    fn login_response_never_carries_password() {
        let response = LoginResponse {
            message: "Login successful".into(),
            user: PublicUser {
                id: uuid::Uuid::new_v4(),
                name: "A".into(),
                email: "test@example.com".into(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["email"], "test@example.com");
        assert!(json["user"].get("id").is_some());
        assert!(json["user"].get("password").is_none());
        assert!(json["user"].get("password_hash").is_none());
    }
}
