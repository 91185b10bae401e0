// src/services/dashboard_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{BankRepository, DashboardRepository},
    finance::{self, AccountStatus},
    models::{
        account::AccountDirection,
        dashboard::{DashboardSummary, OpenAccountRow},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    bank_repo: BankRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, bank_repo: BankRepository) -> Self {
        Self { repo, bank_repo }
    }

    pub async fn get_summary<'e, E>(&self, executor: E, today: NaiveDate) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let balance = self.bank_repo.total_active_balance(&mut *conn).await?;
        let rows = self.repo.list_unsettled(&mut *conn).await?;

        Ok(summarize(&rows, balance, today))
    }
}

/// Consolida as parcelas em aberto. Valores são sempre o saldo restante
/// (valor - baixado), com a mesma regra de situação das listagens.
pub fn summarize(rows: &[OpenAccountRow], current_balance: Decimal, today: NaiveDate) -> DashboardSummary {
    let mut summary = DashboardSummary {
        current_balance,
        ..Default::default()
    };

    for row in rows {
        let remaining = finance::remaining(row.amount, row.amount_settled);
        let status = finance::derive_status(row.amount, row.amount_settled, row.due_date, today);
        let due_today = row.due_date == today;

        match (row.direction, status) {
            (_, AccountStatus::Paid) => continue,
            (AccountDirection::Receivable, AccountStatus::Overdue) => summary.receivables_overdue += remaining,
            (AccountDirection::Receivable, AccountStatus::Open) => summary.receivables_open += remaining,
            (AccountDirection::Payable, AccountStatus::Overdue) => summary.payables_overdue += remaining,
            (AccountDirection::Payable, AccountStatus::Open) => summary.payables_open += remaining,
        }

        if status == AccountStatus::Overdue {
            summary.overdue_count += 1;
        }
        if due_today {
            match row.direction {
                AccountDirection::Receivable => summary.receivables_due_today += remaining,
                AccountDirection::Payable => summary.payables_due_today += remaining,
            }
        }
    }

    // Saldo se tudo que está em aberto (inclusive vencido) for quitado
    summary.projected_balance = current_balance
        + summary.receivables_open
        + summary.receivables_overdue
        - summary.payables_open
        - summary.payables_overdue;

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(direction: AccountDirection, amount: Decimal, settled: Decimal, due: NaiveDate) -> OpenAccountRow {
        OpenAccountRow {
            direction,
            due_date: due,
            amount,
            amount_settled: settled,
        }
    }

    #[test]
    fn splits_open_and_overdue_by_direction() {
        let today = date(2024, 5, 10);
        let rows = vec![
            row(AccountDirection::Receivable, dec!(300), dec!(100), date(2024, 5, 1)),
            row(AccountDirection::Receivable, dec!(150), dec!(0), date(2024, 5, 10)),
            row(AccountDirection::Payable, dec!(80), dec!(0), date(2024, 4, 30)),
            row(AccountDirection::Payable, dec!(40), dec!(0), date(2024, 6, 1)),
        ];

        let summary = summarize(&rows, dec!(1000), today);

        assert_eq!(summary.receivables_overdue, dec!(200));
        assert_eq!(summary.receivables_open, dec!(150));
        assert_eq!(summary.receivables_due_today, dec!(150));
        assert_eq!(summary.payables_overdue, dec!(80));
        assert_eq!(summary.payables_open, dec!(40));
        assert_eq!(summary.payables_due_today, dec!(0));
        assert_eq!(summary.overdue_count, 2);
        assert_eq!(summary.projected_balance, dec!(1230));
    }

    #[test]
    fn empty_book_projects_the_current_balance() {
        let summary = summarize(&[], dec!(42.50), date(2024, 1, 1));

        assert_eq!(
            summary,
            DashboardSummary {
                current_balance: dec!(42.50),
                projected_balance: dec!(42.50),
                ..Default::default()
            }
        );
    }
}
