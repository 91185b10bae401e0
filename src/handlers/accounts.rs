// src/handlers/accounts.rs

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
        account::{
            Account, AccountFilter, CreateAccountPayload, InstallmentPreview,
            PreviewInstallmentsPayload, UpdateAccountPayload,
        },
        settlement::{CreateSettlementPayload, Settlement, SettlementReceipt},
    },
};

// =============================================================================
//  CONTAS A PAGAR / RECEBER
// =============================================================================

// POST /api/accounts
#[utoipa::path(
    post,
    path = "/api/accounts",
    tag = "Accounts",
    request_body = CreateAccountPayload,
    responses(
        (status = 201, description = "Parcelas criadas", body = Vec<Account>),
        (status = 400, description = "Dados inválidos ou contraparte do tipo errado"),
        (status = 404, description = "Contraparte ou banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let accounts = app_state
        .account_service
        .create_account(&app_state.db_pool, &payload, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(accounts)))
}

// POST /api/accounts/preview-installments
#[utoipa::path(
    post,
    path = "/api/accounts/preview-installments",
    tag = "Accounts",
    request_body = PreviewInstallmentsPayload,
    responses(
        (status = 200, description = "Simulação do parcelamento", body = InstallmentPreview),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_installments(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PreviewInstallmentsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let preview = app_state
        .account_service
        .preview_installments(&payload)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(preview)))
}

// GET /api/accounts
#[utoipa::path(
    get,
    path = "/api/accounts",
    tag = "Accounts",
    params(AccountFilter),
    responses((status = 200, description = "Contas filtradas, com situação derivada", body = Vec<Account>)),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<AccountFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = app_state
        .account_service
        .list_accounts(&app_state.db_pool, &filter, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(accounts)))
}

// GET /api/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta", body = Account),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_account(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = app_state
        .account_service
        .get_account(&app_state.db_pool, id, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}

// GET /api/accounts/group/{group_id}
#[utoipa::path(
    get,
    path = "/api/accounts/group/{group_id}",
    tag = "Accounts",
    params(("group_id" = Uuid, Path, description = "ID do grupo de parcelas")),
    responses(
        (status = 200, description = "Todas as parcelas da cobrança", body = Vec<Account>),
        (status = 404, description = "Grupo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_group(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(group_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = app_state
        .account_service
        .list_group(&app_state.db_pool, group_id, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(accounts)))
}

// PUT /api/accounts/{id}
#[utoipa::path(
    put,
    path = "/api/accounts/{id}",
    tag = "Accounts",
    request_body = UpdateAccountPayload,
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta atualizada", body = Account),
        (status = 400, description = "Valor abaixo do já baixado"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let account = app_state
        .account_service
        .update_account(&app_state.db_pool, id, &payload, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(account)))
}

// DELETE /api/accounts/{id}
#[utoipa::path(
    delete,
    path = "/api/accounts/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 204, description = "Conta removida"),
        (status = 404, description = "Não encontrada"),
        (status = 409, description = "Conta com baixas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .account_service
        .delete_account(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  BAIXAS
// =============================================================================

// POST /api/accounts/{id}/settlements
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/settlements",
    tag = "Settlements",
    request_body = CreateSettlementPayload,
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 201, description = "Baixa registrada", body = SettlementReceipt),
        (status = 400, description = "Valor acima do saldo em aberto, banco ausente ou inativo"),
        (status = 404, description = "Conta ou banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn settle_account(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateSettlementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let receipt = app_state
        .account_service
        .settle_account(&app_state.db_pool, id, &payload, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

// GET /api/accounts/{id}/settlements
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/settlements",
    tag = "Settlements",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Baixas da conta", body = Vec<Settlement>),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_settlements(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let settlements = app_state
        .account_service
        .list_settlements(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settlements)))
}

// DELETE /api/settlements/{id}
#[utoipa::path(
    delete,
    path = "/api/settlements/{id}",
    tag = "Settlements",
    params(("id" = Uuid, Path, description = "ID da baixa")),
    responses(
        (status = 200, description = "Baixa estornada; devolve a conta atualizada", body = SettlementReceipt),
        (status = 404, description = "Baixa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn reverse_settlement(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = app_state
        .account_service
        .reverse_settlement(&app_state.db_pool, id, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(receipt)))
}
