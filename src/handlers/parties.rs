// src/handlers/parties.rs
//
// Clientes (/api/clients) e fornecedores (/api/suppliers). As rotas são finas:
// cada uma só fixa o `PartyKind` e delega.

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
    models::party::{Party, PartyFilter, PartyKind, PartyPayload},
};

async fn create(
    app_state: &AppState,
    locale: &Locale,
    kind: PartyKind,
    payload: PartyPayload,
) -> Result<(StatusCode, Json<Party>), ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale, &app_state.i18n_store))?;

    let party = app_state
        .party_service
        .create_party(&app_state.db_pool, kind, &payload)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(party)))
}

async fn list(
    app_state: &AppState,
    locale: &Locale,
    kind: PartyKind,
    filter: PartyFilter,
) -> Result<Json<Vec<Party>>, ApiError> {
    let parties = app_state
        .party_service
        .list_parties(&app_state.db_pool, kind, &filter)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok(Json(parties))
}

async fn get(
    app_state: &AppState,
    locale: &Locale,
    kind: PartyKind,
    id: Uuid,
) -> Result<Json<Party>, ApiError> {
    let party = app_state
        .party_service
        .get_party(&app_state.db_pool, kind, id)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok(Json(party))
}

async fn update(
    app_state: &AppState,
    locale: &Locale,
    kind: PartyKind,
    id: Uuid,
    payload: PartyPayload,
) -> Result<Json<Party>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(locale, &app_state.i18n_store))?;

    let party = app_state
        .party_service
        .update_party(&app_state.db_pool, kind, id, &payload)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok(Json(party))
}

async fn delete(
    app_state: &AppState,
    locale: &Locale,
    kind: PartyKind,
    id: Uuid,
) -> Result<StatusCode, ApiError> {
    app_state
        .party_service
        .delete_party(&app_state.db_pool, kind, id)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  CLIENTES
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = PartyPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Party),
        (status = 400, description = "Dados inválidos (inclusive CPF/CNPJ)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PartyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(&app_state, &locale, PartyKind::Client, payload).await
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(PartyFilter),
    responses((status = 200, description = "Lista de clientes", body = Vec<Party>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<PartyFilter>,
) -> Result<impl IntoResponse, ApiError> {
    list(&app_state, &locale, PartyKind::Client, filter).await
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Party),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    get(&app_state, &locale, PartyKind::Client, id).await
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    request_body = PartyPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Party),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    update(&app_state, &locale, PartyKind::Client, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 409, description = "Cliente com contas vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    delete(&app_state, &locale, PartyKind::Client, id).await
}

// =============================================================================
//  FORNECEDORES
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = PartyPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Party),
        (status = 400, description = "Dados inválidos (inclusive CPF/CNPJ)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PartyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(&app_state, &locale, PartyKind::Supplier, payload).await
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    params(PartyFilter),
    responses((status = 200, description = "Lista de fornecedores", body = Vec<Party>)),
    security(("api_jwt" = []))
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<PartyFilter>,
) -> Result<impl IntoResponse, ApiError> {
    list(&app_state, &locale, PartyKind::Supplier, filter).await
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor", body = Party),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    get(&app_state, &locale, PartyKind::Supplier, id).await
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    request_body = PartyPayload,
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = Party),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    update(&app_state, &locale, PartyKind::Supplier, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 204, description = "Fornecedor removido"),
        (status = 409, description = "Fornecedor com contas vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    delete(&app_state, &locale, PartyKind::Supplier, id).await
}
