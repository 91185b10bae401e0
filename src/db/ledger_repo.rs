// src/db/ledger_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ledger::{CreateLedgerEntryPayload, LedgerEntry, LedgerFilter},
};

#[derive(Clone, Default)]
pub struct LedgerRepository;

impl LedgerRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insere o lançamento. O gatilho `trg_ledger_balance` atualiza o saldo do banco.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        input: &CreateLedgerEntryPayload,
    ) -> Result<LedgerEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            r#"
            INSERT INTO ledger_entries (entry_date, bank_id, direction, description, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(input.date)
        .bind(input.bank_id)
        .bind(input.direction)
        .bind(input.description.trim())
        .bind(input.amount)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT l.*, b.name AS bank_name
              FROM ledger_entries l
              JOIN banks b ON b.id = l.bank_id
             WHERE 1 = 1
            "#,
        );

        if let Some(bank_id) = filter.bank_id {
            qb.push(" AND l.bank_id = ").push_bind(bank_id);
        }
        if let Some(from) = filter.from {
            qb.push(" AND l.entry_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND l.entry_date <= ").push_bind(to);
        }
        if let Some(direction) = filter.direction {
            qb.push(" AND l.direction = ").push_bind(direction);
        }
        qb.push(" ORDER BY l.entry_date ASC, l.created_at ASC");

        let entries = qb.build_query_as::<LedgerEntry>().fetch_all(executor).await?;
        Ok(entries)
    }

    /// Lançamentos de um banco no período, para o extrato.
    pub async fn list_for_bank<'e, E>(
        &self,
        executor: E,
        bank_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LedgerEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT * FROM ledger_entries
             WHERE bank_id = $1
               AND entry_date BETWEEN $2 AND $3
             ORDER BY entry_date ASC, created_at ASC
            "#,
        )
        .bind(bank_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }

    /// Remove o lançamento e devolve o que foi apagado (o gatilho desfaz o saldo).
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<LedgerEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LedgerEntry>("DELETE FROM ledger_entries WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("ledger_entry"))
    }
}
