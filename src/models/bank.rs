// src/models/bank.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "bank_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BankKind {
    #[default]
    Checking,   // Conta corrente
    Savings,    // Poupança
    Cash,       // Caixa
    Investment, // Aplicação
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Banco do Brasil")]
    pub name: String,

    #[schema(example = "1234-5")]
    pub branch: Option<String>,

    #[schema(example = "98765-0")]
    pub account_number: Option<String>,

    /// Mantido pelos gatilhos do banco de dados; a aplicação nunca grava aqui.
    #[schema(value_type = f64, example = "1500.50")]
    pub current_balance: Decimal,

    pub kind: BankKind,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Banco do Brasil")]
    pub name: String,

    #[validate(length(max = 20))]
    pub branch: Option<String>,

    #[validate(length(max = 30))]
    pub account_number: Option<String>,

    #[serde(default)]
    pub kind: BankKind,

    /// Saldo de abertura. Pode ser negativo (cheque especial).
    #[schema(value_type = Option<f64>, example = "1000.00")]
    pub initial_balance: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: String,

    #[validate(length(max = 20))]
    pub branch: Option<String>,

    #[validate(length(max = 30))]
    pub account_number: Option<String>,

    pub kind: BankKind,

    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BankFilter {
    /// Só ativos (`true`), só inativos (`false`) ou todos (ausente).
    pub active: Option<bool>,
}
