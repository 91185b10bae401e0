// src/services/statement_service.rs

use chrono::{Datelike, NaiveDate};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BankRepository, LedgerRepository, SettlementRepository},
    finance::{reconcile, Movement},
    models::statement::{PeriodQuery, Statement},
};

/// Extrato de um banco: lançamentos + baixas do período, com saldo corrente.
#[derive(Clone)]
pub struct StatementService {
    bank_repo: BankRepository,
    ledger_repo: LedgerRepository,
    settlement_repo: SettlementRepository,
}

impl StatementService {
    pub fn new(
        bank_repo: BankRepository,
        ledger_repo: LedgerRepository,
        settlement_repo: SettlementRepository,
    ) -> Self {
        Self {
            bank_repo,
            ledger_repo,
            settlement_repo,
        }
    }

    pub async fn bank_statement<'e, E>(
        &self,
        executor: E,
        bank_id: Uuid,
        period: &PeriodQuery,
        today: NaiveDate,
    ) -> Result<Statement, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let (from, to) = resolve_period(period, today)?;

        // Uma transação só de leitura: saldo e movimentos vêm do mesmo instante
        let mut tx = executor.begin().await?;

        let bank = self
            .bank_repo
            .find_by_id(&mut *tx, bank_id)
            .await?
            .ok_or(AppError::NotFound("bank"))?;

        let ledger: Vec<Movement> = self
            .ledger_repo
            .list_for_bank(&mut *tx, bank_id, from, to)
            .await?
            .into_iter()
            .map(Movement::from)
            .collect();

        let settlements: Vec<Movement> = self
            .settlement_repo
            .movements_for_bank(&mut *tx, bank_id, from, to)
            .await?
            .into_iter()
            .map(Movement::from)
            .collect();

        tx.commit().await?;

        tracing::debug!(
            "📄 Extrato de '{}' ({} a {}): {} lançamentos, {} baixas",
            bank.name,
            from,
            to,
            ledger.len(),
            settlements.len()
        );

        let reconciliation = reconcile(bank.current_balance, ledger, settlements);

        Ok(Statement {
            bank,
            from,
            to,
            reconciliation,
        })
    }
}

/// Período do extrato. Sem `to`, vai até hoje; sem `from`, começa no dia 1º do
/// mês de `to`. Início depois do fim é rejeitado.
pub fn resolve_period(period: &PeriodQuery, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
    let to = period.to.unwrap_or(today);
    let from = match period.from {
        Some(from) => from,
        None => to.with_day(1).ok_or(AppError::InvalidInput("invalid_period"))?,
    };

    if from > to {
        return Err(AppError::InvalidInput("invalid_period"));
    }

    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(None, None, date(2024, 3, 1), date(2024, 3, 17))]
    #[case(None, Some(date(2024, 1, 20)), date(2024, 1, 1), date(2024, 1, 20))]
    #[case(Some(date(2023, 12, 5)), None, date(2023, 12, 5), date(2024, 3, 17))]
    #[case(Some(date(2024, 2, 1)), Some(date(2024, 2, 1)), date(2024, 2, 1), date(2024, 2, 1))]
    fn missing_bounds_get_defaults(
        #[case] from: Option<NaiveDate>,
        #[case] to: Option<NaiveDate>,
        #[case] expected_from: NaiveDate,
        #[case] expected_to: NaiveDate,
    ) {
        let today = date(2024, 3, 17);

        let period = resolve_period(&PeriodQuery { from, to }, today).unwrap();

        assert_eq!(period, (expected_from, expected_to));
    }

    #[test]
    fn start_after_end_is_rejected() {
        let period = PeriodQuery {
            from: Some(date(2024, 3, 2)),
            to: Some(date(2024, 3, 1)),
        };

        assert!(matches!(
            resolve_period(&period, date(2024, 3, 17)),
            Err(AppError::InvalidInput("invalid_period"))
        ));
    }
}
