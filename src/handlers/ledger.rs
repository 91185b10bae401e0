// src/handlers/ledger.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::ledger::{CreateLedgerEntryPayload, LedgerEntry, LedgerFilter},
};

// POST /api/ledger
#[utoipa::path(
    post,
    path = "/api/ledger",
    tag = "Ledger",
    request_body = CreateLedgerEntryPayload,
    responses(
        (status = 201, description = "Lançamento criado", body = LedgerEntry),
        (status = 400, description = "Dados inválidos ou banco inativo"),
        (status = 404, description = "Banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateLedgerEntryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entry = app_state
        .ledger_service
        .create_entry(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

// GET /api/ledger
#[utoipa::path(
    get,
    path = "/api/ledger",
    tag = "Ledger",
    params(LedgerFilter),
    responses((status = 200, description = "Lançamentos filtrados", body = Vec<LedgerEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<LedgerFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .ledger_service
        .list_entries(&app_state.db_pool, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

// DELETE /api/ledger/{id}
#[utoipa::path(
    delete,
    path = "/api/ledger/{id}",
    tag = "Ledger",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 204, description = "Lançamento removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ledger_service
        .delete_entry(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
