// src/db/bank_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{ensure_affected, map_delete_error},
        error::AppError,
    },
    models::bank::{Bank, BankFilter, BankKind, UpdateBankPayload},
};

#[derive(Clone, Default)]
pub struct BankRepository;

impl BankRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        branch: Option<&str>,
        account_number: Option<&str>,
        kind: BankKind,
        initial_balance: Decimal,
    ) -> Result<Bank, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O saldo de abertura é o único momento em que a aplicação define o saldo;
        // daí em diante só os gatilhos mexem nele.
        let bank = sqlx::query_as::<_, Bank>(
            r#"
            INSERT INTO banks (name, branch, account_number, kind, current_balance)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(branch)
        .bind(account_number)
        .bind(kind)
        .bind(initial_balance)
        .fetch_one(executor)
        .await?;

        Ok(bank)
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &BankFilter) -> Result<Vec<Bank>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM banks WHERE 1 = 1");
        if let Some(active) = filter.active {
            qb.push(" AND is_active = ").push_bind(active);
        }
        qb.push(" ORDER BY name ASC");

        let banks = qb.build_query_as::<Bank>().fetch_all(executor).await?;
        Ok(banks)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Bank>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bank = sqlx::query_as::<_, Bank>("SELECT * FROM banks WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(bank)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &UpdateBankPayload,
    ) -> Result<Option<Bank>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // current_balance fica de fora de propósito
        let bank = sqlx::query_as::<_, Bank>(
            r#"
            UPDATE banks
               SET name = $2,
                   branch = $3,
                   account_number = $4,
                   kind = $5,
                   is_active = $6,
                   updated_at = NOW()
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.branch.as_deref())
        .bind(input.account_number.as_deref())
        .bind(input.kind)
        .bind(input.is_active)
        .fetch_optional(executor)
        .await?;

        Ok(bank)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM banks WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_delete_error)?;

        ensure_affected(result.rows_affected(), "bank")
    }

    /// Soma dos saldos dos bancos ativos.
    pub async fn total_active_balance<'e, E>(&self, executor: E) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(current_balance) FROM banks WHERE is_active = TRUE",
        )
        .fetch_one(executor)
        .await?;

        Ok(total.unwrap_or(Decimal::ZERO))
    }
}
