// src/finance/reconciliation.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{account::AccountDirection, ledger::LedgerDirection};

/// Sentido do dinheiro em relação ao banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Inflow,  // Entrada (crédito)
    Outflow, // Saída (débito)
}

impl From<LedgerDirection> for Flow {
    fn from(direction: LedgerDirection) -> Self {
        match direction {
            LedgerDirection::Credit => Flow::Inflow,
            LedgerDirection::Debit => Flow::Outflow,
        }
    }
}

/// Uma baixa de conta a pagar sai do banco; de conta a receber, entra.
impl From<AccountDirection> for Flow {
    fn from(direction: AccountDirection) -> Self {
        match direction {
            AccountDirection::Receivable => Flow::Inflow,
            AccountDirection::Payable => Flow::Outflow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MovementSource {
    Ledger,     // Lançamento manual
    Settlement, // Baixa
}

/// Movimento bruto vindo de uma das duas fontes do extrato.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub source: MovementSource,
    pub source_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub flow: Flow,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub source: MovementSource,
    pub source_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub description: String,
    pub flow: Flow,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    /// Saldo corrente depois deste movimento.
    #[schema(value_type = f64)]
    pub balance: Decimal,
}

/// Resultado da conciliação de um período.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// Saldo inicial derivado de trás para frente a partir do saldo atual.
    #[schema(value_type = f64)]
    pub opening_balance: Decimal,
    /// Total de entradas no período.
    #[schema(value_type = f64)]
    pub total_inflows: Decimal,
    /// Total de saídas no período.
    #[schema(value_type = f64)]
    pub total_outflows: Decimal,
    /// Saldo atual do banco, igual ao saldo corrente da última linha.
    #[schema(value_type = f64)]
    pub closing_balance: Decimal,
    /// Sempre verdadeiro: o saldo inicial só é exato quando não há movimentos
    /// depois do fim do período.
    pub approximate_opening: bool,
    pub lines: Vec<StatementLine>,
}

/// Junta lançamentos e baixas num único extrato ordenado com saldo corrente.
///
/// A ordenação é por data e estável: no mesmo dia os lançamentos vêm antes das
/// baixas, cada grupo na ordem recebida.
///
/// `opening = current_balance - (inflows - outflows)`. Isso pressupõe que o saldo
/// atual reflete apenas o saldo de abertura mais os movimentos do período; é uma
/// aproximação e o resultado sai marcado como tal.
pub fn reconcile(
    current_balance: Decimal,
    ledger: Vec<Movement>,
    settlements: Vec<Movement>,
) -> Reconciliation {
    let mut movements: Vec<Movement> = ledger.into_iter().chain(settlements).collect();
    movements.sort_by_key(|m| m.date);

    let (total_inflows, total_outflows) =
        movements
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(inflows, outflows), m| match m.flow {
                Flow::Inflow => (inflows + m.amount, outflows),
                Flow::Outflow => (inflows, outflows + m.amount),
            });

    let opening_balance = current_balance - (total_inflows - total_outflows);

    let mut running = opening_balance;
    let lines = movements
        .into_iter()
        .map(|m| {
            running = match m.flow {
                Flow::Inflow => running + m.amount,
                Flow::Outflow => running - m.amount,
            };

            StatementLine {
                source: m.source,
                source_id: m.source_id,
                date: m.date,
                description: m.description,
                flow: m.flow,
                amount: m.amount,
                balance: running,
            }
        })
        .collect();

    Reconciliation {
        opening_balance,
        total_inflows,
        total_outflows,
        closing_balance: current_balance,
        approximate_opening: true,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn movement(source: MovementSource, day: u32, flow: Flow, amount: Decimal, label: &str) -> Movement {
        Movement {
            source,
            source_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            description: label.to_string(),
            flow,
            amount,
        }
    }

    #[test]
    fn derives_opening_balance_and_running_balances() {
        // Entradas fora de ordem de propósito
        let ledger = vec![
            movement(MovementSource::Ledger, 10, Flow::Outflow, dec!(20), "tarifa"),
            movement(MovementSource::Ledger, 5, Flow::Inflow, dec!(50), "depósito"),
        ];
        let settlements = vec![movement(
            MovementSource::Settlement,
            15,
            AccountDirection::Receivable.into(),
            dec!(30),
            "recebimento",
        )];

        let result = reconcile(dec!(160), ledger, settlements);

        assert_eq!(result.total_inflows, dec!(80));
        assert_eq!(result.total_outflows, dec!(20));
        assert_eq!(result.opening_balance, dec!(100));
        assert_eq!(result.closing_balance, dec!(160));
        assert!(result.approximate_opening);

        let described: Vec<(&str, Decimal)> = result
            .lines
            .iter()
            .map(|l| (l.description.as_str(), l.balance))
            .collect();
        assert_eq!(
            described,
            vec![
                ("depósito", dec!(150)),
                ("tarifa", dec!(130)),
                ("recebimento", dec!(160)),
            ]
        );
    }

    #[test]
    fn payable_settlement_is_an_outflow() {
        assert_eq!(Flow::from(AccountDirection::Payable), Flow::Outflow);
        assert_eq!(Flow::from(LedgerDirection::Credit), Flow::Inflow);
        assert_eq!(Flow::from(LedgerDirection::Debit), Flow::Outflow);
    }

    #[test]
    fn same_day_ledger_entries_come_before_settlements_in_input_order() {
        let ledger = vec![
            movement(MovementSource::Ledger, 7, Flow::Inflow, dec!(1), "L1"),
            movement(MovementSource::Ledger, 7, Flow::Inflow, dec!(2), "L2"),
        ];
        let settlements = vec![
            movement(MovementSource::Settlement, 7, Flow::Outflow, dec!(3), "S1"),
            movement(MovementSource::Settlement, 6, Flow::Outflow, dec!(4), "S0"),
        ];

        let result = reconcile(dec!(0), ledger, settlements);
        let order: Vec<&str> = result.lines.iter().map(|l| l.description.as_str()).collect();

        assert_eq!(order, vec!["S0", "L1", "L2", "S1"]);
    }

    #[test]
    fn empty_period_opens_and_closes_at_current_balance() {
        let result = reconcile(dec!(42.50), vec![], vec![]);

        assert_eq!(result.opening_balance, dec!(42.50));
        assert_eq!(result.closing_balance, dec!(42.50));
        assert!(result.lines.is_empty());
    }

    proptest! {
        #[test]
        fn last_running_balance_equals_current_balance(
            balance_cents in -1_000_000i64..1_000_000,
            raw in proptest::collection::vec((1u32..=28, any::<bool>(), 1i64..100_000), 0..40),
        ) {
            let current = Decimal::new(balance_cents, 2);
            let ledger: Vec<Movement> = raw
                .iter()
                .map(|(day, inflow, cents)| {
                    let flow = if *inflow { Flow::Inflow } else { Flow::Outflow };
                    movement(MovementSource::Ledger, *day, flow, Decimal::new(*cents, 2), "x")
                })
                .collect();

            let result = reconcile(current, ledger, vec![]);

            let expected_last = result.lines.last().map(|l| l.balance).unwrap_or(result.opening_balance);
            prop_assert_eq!(expected_last, current);
            for pair in result.lines.windows(2) {
                prop_assert!(pair[0].date <= pair[1].date);
            }
        }
    }
}
