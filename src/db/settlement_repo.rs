// src/db/settlement_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::ensure_affected, error::AppError},
    models::settlement::{Settlement, SettlementMovementRow},
};

#[derive(Clone, Default)]
pub struct SettlementRepository;

impl SettlementRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insere a baixa. O gatilho `trg_settlements_balance` atualiza o saldo do banco.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        bank_id: Uuid,
        amount: Decimal,
        settled_on: NaiveDate,
        notes: Option<&str>,
    ) -> Result<Settlement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settlement = sqlx::query_as::<_, Settlement>(
            r#"
            INSERT INTO settlements (account_id, bank_id, amount, settled_on, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(bank_id)
        .bind(amount)
        .bind(settled_on)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(settlement)
    }

    pub async fn list_by_account<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
    ) -> Result<Vec<Settlement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settlements = sqlx::query_as::<_, Settlement>(
            r#"
            SELECT st.*, b.name AS bank_name
              FROM settlements st
              JOIN banks b ON b.id = st.bank_id
             WHERE st.account_id = $1
             ORDER BY st.settled_on ASC, st.created_at ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(executor)
        .await?;

        Ok(settlements)
    }

    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Settlement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settlement = sqlx::query_as::<_, Settlement>("SELECT * FROM settlements WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(settlement)
    }

    /// Remove a baixa (estorno). O gatilho desfaz o efeito no saldo do banco.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM settlements WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        ensure_affected(result.rows_affected(), "settlement")
    }

    /// Baixas de um banco no período, com o sentido da conta, para o extrato.
    pub async fn movements_for_bank<'e, E>(
        &self,
        executor: E,
        bank_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SettlementMovementRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SettlementMovementRow>(
            r#"
            SELECT st.id, st.settled_on, st.amount,
                   a.direction, a.description,
                   COALESCE(c.name, s.name) AS party_name
              FROM settlements st
              JOIN accounts a ON a.id = st.account_id
              LEFT JOIN clients c ON c.id = a.client_id
              LEFT JOIN suppliers s ON s.id = a.supplier_id
             WHERE st.bank_id = $1
               AND st.settled_on BETWEEN $2 AND $3
             ORDER BY st.settled_on ASC, st.created_at ASC
            "#,
        )
        .bind(bank_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
