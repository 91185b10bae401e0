use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::finance::{InstallmentError, SettlementError};
use crate::middleware::i18n::Locale;

// Erro interno da aplicação. Nunca chega ao cliente como está: passa por
// `to_api_error`, que escolhe o status e a mensagem traduzida.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Regra de negócio violada; o conteúdo é a chave da mensagem.
    #[error("Entrada inválida: {0}")]
    InvalidInput(&'static str),

    #[error("Baixa acima do saldo em aberto ({remaining})")]
    OverSettlement { remaining: Decimal },

    #[error("Parcelamento inválido: {0}")]
    InvalidInstallments(#[from] InstallmentError),

    /// Recurso não encontrado; o conteúdo identifica o recurso (bank, account...).
    #[error("Não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Conflito: {0}")]
    Conflict(&'static str),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::NonPositiveAmount => AppError::InvalidInput("non_positive_amount"),
            SettlementError::ExceedsRemaining { remaining } => AppError::OverSettlement { remaining },
            SettlementError::BelowSettled { .. } => AppError::InvalidInput("amount_below_settled"),
            SettlementError::HasSettlements => AppError::Conflict("account_has_settlements"),
        }
    }
}

/// Erro pronto para o cliente: status HTTP, mensagem traduzida e detalhes opcionais.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let message = |key: &str| store.translate(&locale.0, key);

        let (status, error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                (
                    StatusCode::BAD_REQUEST,
                    message("validation_failed"),
                    Some(Value::Object(details)),
                )
            }
            AppError::InvalidInput(key) => (StatusCode::BAD_REQUEST, message(key), None),
            AppError::OverSettlement { remaining } => (
                StatusCode::BAD_REQUEST,
                message("over_settlement"),
                Some(json!({ "remaining": remaining })),
            ),
            AppError::InvalidInstallments(_) => {
                (StatusCode::BAD_REQUEST, message("invalid_installments"), None)
            }
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                message(&format!("not_found.{}", resource)),
                None,
            ),
            AppError::Conflict(key) => (StatusCode::CONFLICT, message(key), None),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, message("email_taken"), None),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, message("invalid_credentials"), None)
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, message("invalid_token"), None),
            AppError::FontNotFound(_) | AppError::PdfError(_) => {
                tracing::error!("Falha ao gerar relatório: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, message("report_failed"), None)
            }
            // Banco, bcrypt, JWT e afins: loga o detalhe, devolve a mensagem genérica.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, message("operation_failed"), None)
            }
        };

        ApiError {
            status,
            error,
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    fn pt() -> (Locale, I18nStore) {
        (Locale("pt".to_string()), I18nStore::new("pt"))
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let (locale, store) = pt();
        let errors = Payload { name: String::new() }.validate().unwrap_err();

        let api = AppError::ValidationError(errors).to_api_error(&locale, &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Um ou mais campos são inválidos.");
        assert_eq!(api.details, Some(json!({ "name": ["required"] })));
    }

    #[test]
    fn over_settlement_reports_remaining_amount() {
        let (locale, store) = pt();
        let err: AppError = SettlementError::ExceedsRemaining { remaining: dec!(25) }.into();

        let api = err.to_api_error(&locale, &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert!(api.details.is_some());
    }

    #[test]
    fn not_found_uses_resource_message() {
        let store = I18nStore::new("pt");
        let api = AppError::NotFound("bank").to_api_error(&Locale("en".into()), &store);

        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Bank not found.");
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let (locale, store) = pt();
        let api = AppError::DatabaseError(sqlx::Error::RowNotFound).to_api_error(&locale, &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("RowNotFound"));
    }

    #[test]
    fn account_guards_map_to_their_statuses() {
        let (locale, store) = pt();

        let below: AppError = SettlementError::BelowSettled { settled: dec!(40) }.into();
        assert_eq!(below.to_api_error(&locale, &store).status, StatusCode::BAD_REQUEST);

        let has_settlements: AppError = SettlementError::HasSettlements.into();
        assert_eq!(
            has_settlements.to_api_error(&locale, &store).status,
            StatusCode::CONFLICT
        );
    }
}
