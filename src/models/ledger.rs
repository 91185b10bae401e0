// src/models/ledger.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::positive_amount;
use crate::finance::{Flow, Movement, MovementSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ledger_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LedgerDirection {
    Credit, // Entrada
    Debit,  // Saída
}

/// Lançamento manual no banco (tarifas, depósitos, transferências...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-03-05")]
    pub entry_date: NaiveDate,

    pub bank_id: Uuid,

    pub direction: LedgerDirection,

    #[schema(example = "Tarifa bancária")]
    pub description: String,

    /// Sempre positivo; o sentido vem de `direction`.
    #[schema(value_type = f64, example = "29.90")]
    pub amount: Decimal,

    #[sqlx(default)]
    pub bank_name: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntry> for Movement {
    fn from(entry: LedgerEntry) -> Self {
        Movement {
            source: MovementSource::Ledger,
            source_id: entry.id,
            date: entry.entry_date,
            description: entry.description,
            flow: Flow::from(entry.direction),
            amount: entry.amount,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLedgerEntryPayload {
    #[schema(value_type = String, format = Date, example = "2024-03-05")]
    pub date: NaiveDate,

    pub bank_id: Uuid,

    pub direction: LedgerDirection,

    #[validate(length(min = 1, max = 200, message = "required"))]
    pub description: String,

    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = f64, example = "29.90")]
    pub amount: Decimal,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LedgerFilter {
    pub bank_id: Option<Uuid>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
    pub direction: Option<LedgerDirection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn entry_below_one_cent_fails_validation() {
        let entry = CreateLedgerEntryPayload {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            bank_id: Uuid::new_v4(),
            direction: LedgerDirection::Debit,
            description: "Tarifa".to_string(),
            amount: dec!(0.004),
        };

        let errors = entry.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }
}
