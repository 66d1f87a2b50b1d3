// src/handlers/fornecedor.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::ensure_rows_affected, error::AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        claims::{ExcluirFornecedor, RequireClaim},
    },
    models::fornecedor::{Fornecedor, FornecedorPayload},
};

// GET /fornecedor
#[utoipa::path(
    get,
    path = "/fornecedor",
    tag = "Fornecedor",
    responses((status = 200, description = "Todos os fornecedores", body = Vec<Fornecedor>))
)]
pub async fn list_fornecedores(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Fornecedor>>, AppError> {
    let fornecedores = app_state.fornecedores.list().await?;
    Ok(Json(fornecedores))
}

// GET /fornecedor/{id}
#[utoipa::path(
    get,
    path = "/fornecedor/{id}",
    tag = "Fornecedor",
    params(("id" = Uuid, Path, description = "Id do fornecedor")),
    responses(
        (status = 200, body = Fornecedor),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn get_fornecedor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Fornecedor>, AppError> {
    app_state
        .fornecedores
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

// POST /fornecedor
#[utoipa::path(
    post,
    path = "/fornecedor",
    tag = "Fornecedor",
    request_body = FornecedorPayload,
    responses(
        (status = 201, body = Fornecedor, headers(("Location" = String))),
        (status = 400, description = "Dados inválidos ou falha ao gravar"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_fornecedor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(payload), _): WithRejection<Json<FornecedorPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    // O id é sempre gerado aqui; qualquer id enviado pelo cliente é ignorado
    let fornecedor = Fornecedor::from_payload(Uuid::new_v4(), payload);

    let rows = app_state.fornecedores.insert(&fornecedor).await?;
    ensure_rows_affected(rows)?;

    tracing::info!(
        fornecedor_id = %fornecedor.id,
        user_id = %user.id,
        email = %user.email,
        "Fornecedor criado"
    );

    let location = format!("/fornecedor/{}", fornecedor.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(fornecedor),
    ))
}

// PUT /fornecedor/{id}
#[utoipa::path(
    put,
    path = "/fornecedor/{id}",
    tag = "Fornecedor",
    params(("id" = Uuid, Path, description = "Id do fornecedor")),
    request_body = FornecedorPayload,
    responses(
        (status = 204, description = "Atualizado"),
        (status = 400, description = "Dados inválidos ou falha ao gravar"),
        (status = 401, description = "Não autenticado"),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_fornecedor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    WithRejection(Json(payload), _): WithRejection<Json<FornecedorPayload>, AppError>,
) -> Result<StatusCode, AppError> {
    // Existência primeiro, validação depois
    if app_state.fornecedores.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    payload.validate()?;

    let fornecedor = Fornecedor::from_payload(id, payload);
    let rows = app_state.fornecedores.update(&fornecedor).await?;
    ensure_rows_affected(rows)?;

    tracing::info!(
        fornecedor_id = %id,
        user_id = %user.id,
        email = %user.email,
        "Fornecedor atualizado"
    );
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /fornecedor/{id}
#[utoipa::path(
    delete,
    path = "/fornecedor/{id}",
    tag = "Fornecedor",
    params(("id" = Uuid, Path, description = "Id do fornecedor")),
    responses(
        (status = 204, description = "Removido"),
        (status = 400, description = "Falha ao remover"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Claim 'ExcluirFornecedor' ausente"),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_fornecedor(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireClaim<ExcluirFornecedor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if app_state.fornecedores.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let rows = app_state.fornecedores.delete(id).await?;
    ensure_rows_affected(rows)?;

    tracing::info!(
        fornecedor_id = %id,
        user_id = %user.id,
        email = %user.email,
        "Fornecedor removido"
    );
    Ok(StatusCode::NO_CONTENT)
}
