// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use chrono::NaiveDate;

use crate::models::account::AccountDirection;

// 1. Resumo (Os Cards do Topo)
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(value_type = f64)]
    pub current_balance: Decimal,         // Saldo somado dos bancos ativos
    #[schema(value_type = f64)]
    pub receivables_open: Decimal,        // A receber, ainda no prazo
    #[schema(value_type = f64)]
    pub receivables_overdue: Decimal,     // A receber, vencido
    #[schema(value_type = f64)]
    pub payables_open: Decimal,           // A pagar, ainda no prazo
    #[schema(value_type = f64)]
    pub payables_overdue: Decimal,        // A pagar, vencido
    #[schema(value_type = f64)]
    pub receivables_due_today: Decimal,   // A receber que vence hoje
    #[schema(value_type = f64)]
    pub payables_due_today: Decimal,      // A pagar que vence hoje
    pub overdue_count: i64,
    /// Saldo atual + a receber - a pagar.
    #[schema(value_type = f64)]
    pub projected_balance: Decimal,
}

// 2. Saldo em aberto por conta (entrada do resumo)
#[derive(Debug, Clone, FromRow)]
pub struct OpenAccountRow {
    pub direction: AccountDirection,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub amount_settled: Decimal,
}
