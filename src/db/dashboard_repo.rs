// src/db/dashboard_repo.rs

use sqlx::{Executor, Postgres};

use crate::{common::error::AppError, models::dashboard::OpenAccountRow};

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    /// Todas as parcelas com saldo em aberto. A classificação (no prazo/vencida)
    /// é feita no serviço com a mesma regra das listagens.
    pub async fn list_unsettled<'e, E>(&self, executor: E) -> Result<Vec<OpenAccountRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, OpenAccountRow>(
            r#"
            SELECT direction, due_date, amount, amount_settled
              FROM accounts
             WHERE amount_settled < amount
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
