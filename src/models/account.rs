// src/models/account.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::positive_amount;
use crate::finance::{self, AccountStatus, Installment, MAX_INSTALLMENTS};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountDirection {
    Payable,    // A Pagar
    Receivable, // A Receber
}

// --- Structs ---

/// Conta a pagar ou a receber (uma parcela).
///
/// `status` e `remaining` não existem no banco: são preenchidos por
/// [`Account::with_status`] a cada leitura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,

    /// Compartilhado por todas as parcelas da mesma cobrança.
    pub group_id: Uuid,

    pub direction: AccountDirection,

    // Vínculos
    pub client_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,

    #[schema(example = "Aluguel da sala")]
    pub description: String,

    #[schema(value_type = String, format = Date, example = "2024-01-31")]
    pub due_date: NaiveDate,

    #[schema(value_type = f64, example = "500.00")]
    pub amount: Decimal,
    /// Quanto já foi baixado.
    #[schema(value_type = f64, example = "200.00")]
    pub amount_settled: Decimal,

    pub installment_index: i32,
    pub installment_count: i32,

    pub notes: Option<String>,

    // Preenchidos por JOIN nas listagens
    #[sqlx(default)]
    pub party_name: Option<String>,
    #[sqlx(default)]
    pub bank_name: Option<String>,

    #[sqlx(skip)]
    pub status: AccountStatus,
    #[sqlx(skip)]
    #[schema(value_type = f64)]
    pub remaining: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn with_status(mut self, today: NaiveDate) -> Self {
        self.status = finance::derive_status(self.amount, self.amount_settled, self.due_date, today);
        self.remaining = finance::remaining(self.amount, self.amount_settled);
        self
    }

    pub fn party_id(&self) -> Option<Uuid> {
        self.client_id.or(self.supplier_id)
    }
}

/// Cria uma cobrança, já parcelada.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountPayload {
    pub direction: AccountDirection,

    #[validate(length(min = 1, max = 200, message = "required"))]
    #[schema(example = "Mensalidade")]
    pub description: String,

    /// Cliente (a receber) ou fornecedor (a pagar).
    pub party_id: Option<Uuid>,

    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = f64, example = "300.00")]
    pub total_amount: Decimal,

    #[serde(default = "default_installments")]
    #[validate(range(min = 1, max = MAX_INSTALLMENTS, message = "invalid_installments"))]
    #[schema(example = 3)]
    pub installments: u32,

    #[schema(value_type = String, format = Date, example = "2024-01-31")]
    pub first_due_date: NaiveDate,

    /// Banco sugerido para a baixa.
    pub bank_id: Option<Uuid>,

    pub notes: Option<String>,
}

fn default_installments() -> u32 {
    1
}

/// Simulação do parcelamento, sem gravar nada.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInstallmentsPayload {
    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = f64, example = "300.00")]
    pub total_amount: Decimal,

    #[validate(range(min = 1, max = MAX_INSTALLMENTS, message = "invalid_installments"))]
    pub installments: u32,

    #[schema(value_type = String, format = Date, example = "2024-01-31")]
    pub first_due_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPreview {
    pub installments: Vec<Installment>,
    #[schema(value_type = f64)]
    pub total: Decimal,
}

/// Edição de uma parcela isolada.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountPayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub description: String,

    pub party_id: Option<Uuid>,

    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,

    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = f64)]
    pub amount: Decimal,

    pub bank_id: Option<Uuid>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AccountFilter {
    pub direction: Option<AccountDirection>,
    /// Filtro sobre a situação derivada.
    pub status: Option<AccountStatus>,
    /// Vencimento a partir de (inclusive).
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    /// Vencimento até (inclusive).
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
    pub party_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    /// Busca na descrição.
    pub search: Option<String>,
}
