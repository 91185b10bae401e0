// src/models/settlement.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::positive_amount;
use crate::finance::{Flow, Movement, MovementSource};
use crate::models::account::{Account, AccountDirection};

/// Baixa (total ou parcial) de uma conta.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub id: Uuid,
    pub account_id: Uuid,
    pub bank_id: Uuid,

    #[schema(value_type = f64, example = "150.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2024-02-10")]
    pub settled_on: NaiveDate,

    pub notes: Option<String>,

    #[sqlx(default)]
    pub bank_name: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSettlementPayload {
    /// Quando ausente, usa o banco vinculado à conta.
    pub bank_id: Option<Uuid>,

    #[validate(custom(function = "positive_amount"))]
    #[schema(value_type = f64, example = "150.00")]
    pub amount: Decimal,

    /// Data da baixa; hoje quando ausente.
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    pub notes: Option<String>,
}

/// Resposta de uma baixa ou estorno: o movimento e a conta já atualizada.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub settlement: Settlement,
    pub account: Account,
}

/// Baixa vista pelo extrato do banco, com o sentido e a descrição da conta.
#[derive(Debug, Clone, FromRow)]
pub struct SettlementMovementRow {
    pub id: Uuid,
    pub settled_on: NaiveDate,
    pub amount: Decimal,
    pub direction: AccountDirection,
    pub description: String,
    pub party_name: Option<String>,
}

impl From<SettlementMovementRow> for Movement {
    fn from(row: SettlementMovementRow) -> Self {
        let prefix = match row.direction {
            AccountDirection::Payable => "Pagamento",
            AccountDirection::Receivable => "Recebimento",
        };
        let description = match row.party_name {
            Some(party) => format!("{}: {} ({})", prefix, row.description, party),
            None => format!("{}: {}", prefix, row.description),
        };

        Movement {
            source: MovementSource::Settlement,
            source_id: row.id,
            date: row.settled_on,
            description,
            flow: Flow::from(row.direction),
            amount: row.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payable_settlement_becomes_outflow_with_party_in_description() {
        let row = SettlementMovementRow {
            id: Uuid::new_v4(),
            settled_on: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            amount: dec!(150),
            direction: AccountDirection::Payable,
            description: "Aluguel".to_string(),
            party_name: Some("Imobiliária Central".to_string()),
        };

        let movement = Movement::from(row);

        assert_eq!(movement.flow, Flow::Outflow);
        assert_eq!(movement.source, MovementSource::Settlement);
        assert_eq!(movement.description, "Pagamento: Aluguel (Imobiliária Central)");
    }

    fn payload(amount: Decimal) -> CreateSettlementPayload {
        CreateSettlementPayload {
            bank_id: None,
            amount,
            date: None,
            notes: None,
        }
    }

    #[test]
    fn settlement_in_fractions_of_cent_fails_validation() {
        let errors = payload(dec!(9.996)).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));

        assert!(payload(dec!(10.00)).validate().is_ok());
    }
}
