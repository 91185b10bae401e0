// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    finance,
    middleware::i18n::Locale,
    models::{account::AccountFilter, statement::StatementReportQuery},
    services::report_service::RenderedReport,
};

// GET /api/reports/statement/{bank_id}
#[utoipa::path(
    get,
    path = "/api/reports/statement/{bank_id}",
    tag = "Reports",
    params(("bank_id" = Uuid, Path, description = "ID do banco"), StatementReportQuery),
    responses(
        (status = 200, description = "Extrato para impressão (HTML); com format=pdf, application/pdf", content_type = "text/html"),
        (status = 400, description = "Período inválido"),
        (status = 404, description = "Banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn statement_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(bank_id): Path<Uuid>,
    Query(query): Query<StatementReportQuery>,
) -> Result<Response, ApiError> {
    let report = app_state
        .report_service
        .statement_report(&app_state.db_pool, bank_id, &query, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(match report {
        RenderedReport::Html(html) => Html(html).into_response(),
        RenderedReport::Pdf { bytes, filename } => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
    })
}

// GET /api/reports/accounts
#[utoipa::path(
    get,
    path = "/api/reports/accounts",
    tag = "Reports",
    params(AccountFilter),
    responses(
        (status = 200, description = "Relatório de contas para impressão", content_type = "text/html")
    ),
    security(("api_jwt" = []))
)]
pub async fn accounts_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<AccountFilter>,
) -> Result<Html<String>, ApiError> {
    let html = app_state
        .report_service
        .accounts_report(&app_state.db_pool, &filter, finance::today())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Html(html))
}
