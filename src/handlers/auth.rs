// src/handlers/auth.rs

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{LoginUserPayload, RegisterUserPayload, UserResponse},
};

// Handler de registro
#[utoipa::path(
    post,
    path = "/registro",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Dados inválidos ou conta recusada pelo provedor")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterUserPayload>, AppError>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate_all()?;

    // Depois da validação os campos obrigatórios estão presentes
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = app_state
        .auth_service
        .register_account(&email, &password)
        .await?;

    let response = app_state.auth_service.issue_token(&user).await?;
    Ok(Json(response))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, body = UserResponse),
        (status = 400, description = "Usuário ou senha inválidos, ou conta bloqueada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginUserPayload>, AppError>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = app_state
        .auth_service
        .verify_credentials(&email, &password)
        .await?;

    let response = app_state.auth_service.issue_token(&user).await?;
    Ok(Json(response))
}
