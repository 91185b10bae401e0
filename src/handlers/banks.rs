// src/handlers/banks.rs

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
    finance,
    middleware::i18n::Locale,
    models::{
        bank::{Bank, BankFilter, CreateBankPayload, UpdateBankPayload},
        statement::{PeriodQuery, Statement},
    },
};

// POST /api/banks
#[utoipa::path(
    post,
    path = "/api/banks",
    tag = "Banks",
    request_body = CreateBankPayload,
    responses(
        (status = 201, description = "Banco criado", body = Bank),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateBankPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let bank = app_state
        .bank_service
        .create_bank(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(bank)))
}

// GET /api/banks
#[utoipa::path(
    get,
    path = "/api/banks",
    tag = "Banks",
    params(BankFilter),
    responses((status = 200, description = "Lista de bancos", body = Vec<Bank>)),
    security(("api_jwt" = []))
)]
pub async fn list_banks(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<BankFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let banks = app_state
        .bank_service
        .list_banks(&app_state.db_pool, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(banks)))
}

// GET /api/banks/{id}
#[utoipa::path(
    get,
    path = "/api/banks/{id}",
    tag = "Banks",
    params(("id" = Uuid, Path, description = "ID do banco")),
    responses(
        (status = 200, description = "Banco", body = Bank),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bank = app_state
        .bank_service
        .get_bank(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(bank)))
}

// PUT /api/banks/{id}
#[utoipa::path(
    put,
    path = "/api/banks/{id}",
    tag = "Banks",
    request_body = UpdateBankPayload,
    params(("id" = Uuid, Path, description = "ID do banco")),
    responses(
        (status = 200, description = "Banco atualizado", body = Bank),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBankPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let bank = app_state
        .bank_service
        .update_bank(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(bank)))
}

// DELETE /api/banks/{id}
#[utoipa::path(
    delete,
    path = "/api/banks/{id}",
    tag = "Banks",
    params(("id" = Uuid, Path, description = "ID do banco")),
    responses(
        (status = 204, description = "Banco removido"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Banco em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .bank_service
        .delete_bank(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/banks/{id}/statement
#[utoipa::path(
    get,
    path = "/api/banks/{id}/statement",
    tag = "Banks",
    params(("id" = Uuid, Path, description = "ID do banco"), PeriodQuery),
    responses(
        (status = 200, description = "Extrato do período com saldo corrente", body = Statement),
        (status = 400, description = "Período inválido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_statement(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Query(period): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let statement = app_state
        .statement_service
        .bank_statement(&app_state.db_pool, id, &period, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(statement)))
}
