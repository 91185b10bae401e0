// src/db/account_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::ensure_affected, error::AppError},
    models::account::{Account, AccountDirection, AccountFilter},
};

// Leitura padrão: conta + nome do cliente/fornecedor + nome do banco.
const ACCOUNT_SELECT: &str = r#"
    SELECT a.*,
           COALESCE(c.name, s.name) AS party_name,
           b.name AS bank_name
      FROM accounts a
      LEFT JOIN clients c ON c.id = a.client_id
      LEFT JOIN suppliers s ON s.id = a.supplier_id
      LEFT JOIN banks b ON b.id = a.bank_id
"#;

/// Dados de uma parcela a inserir.
pub struct NewAccount<'a> {
    pub group_id: Uuid,
    pub direction: AccountDirection,
    pub client_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    pub description: &'a str,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub installment_index: i32,
    pub installment_count: i32,
    pub notes: Option<&'a str>,
}

/// Campos editáveis de uma parcela.
pub struct AccountChanges<'a> {
    pub description: &'a str,
    pub client_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub notes: Option<&'a str>,
}

#[derive(Clone, Default)]
pub struct AccountRepository;

impl AccountRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(&self, executor: E, new: &NewAccount<'_>) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                group_id, direction, client_id, supplier_id, bank_id,
                description, due_date, amount,
                installment_index, installment_count, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.group_id)
        .bind(new.direction)
        .bind(new.client_id)
        .bind(new.supplier_id)
        .bind(new.bank_id)
        .bind(new.description)
        .bind(new.due_date)
        .bind(new.amount)
        .bind(new.installment_index)
        .bind(new.installment_count)
        .bind(new.notes)
        .fetch_one(executor)
        .await?;

        Ok(account)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE a.id = $1", ACCOUNT_SELECT);

        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(account)
    }

    /// Trava a linha até o fim da transação (baixa/estorno concorrentes).
    pub async fn lock_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(account)
    }

    /// Filtros de SQL. A situação é derivada depois, no serviço.
    pub async fn list<'e, E>(&self, executor: E, filter: &AccountFilter) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(ACCOUNT_SELECT);
        qb.push(" WHERE 1 = 1");

        if let Some(direction) = filter.direction {
            qb.push(" AND a.direction = ").push_bind(direction);
        }
        if let Some(from) = filter.from {
            qb.push(" AND a.due_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND a.due_date <= ").push_bind(to);
        }
        if let Some(party_id) = filter.party_id {
            qb.push(" AND (a.client_id = ")
                .push_bind(party_id)
                .push(" OR a.supplier_id = ")
                .push_bind(party_id)
                .push(")");
        }
        if let Some(bank_id) = filter.bank_id {
            qb.push(" AND a.bank_id = ").push_bind(bank_id);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            qb.push(" AND a.description ILIKE ").push_bind(format!("%{}%", search));
        }

        qb.push(" ORDER BY a.due_date ASC, a.installment_index ASC, a.created_at ASC");

        let accounts = qb.build_query_as::<Account>().fetch_all(executor).await?;
        Ok(accounts)
    }

    pub async fn list_by_group<'e, E>(&self, executor: E, group_id: Uuid) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE a.group_id = $1 ORDER BY a.installment_index ASC", ACCOUNT_SELECT);

        let accounts = sqlx::query_as::<_, Account>(&sql)
            .bind(group_id)
            .fetch_all(executor)
            .await?;

        Ok(accounts)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &AccountChanges<'_>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE accounts
               SET description = $2,
                   client_id = $3,
                   supplier_id = $4,
                   bank_id = $5,
                   due_date = $6,
                   amount = $7,
                   notes = $8,
                   updated_at = NOW()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.description)
        .bind(changes.client_id)
        .bind(changes.supplier_id)
        .bind(changes.bank_id)
        .bind(changes.due_date)
        .bind(changes.amount)
        .bind(changes.notes)
        .execute(executor)
        .await?;

        ensure_affected(result.rows_affected(), "account")
    }

    /// Grava o novo total baixado. A linha deve estar travada com `lock_by_id`.
    pub async fn set_settled<'e, E>(&self, executor: E, id: Uuid, settled: Decimal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE accounts
               SET amount_settled = $2,
                   updated_at = NOW()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(settled)
        .execute(executor)
        .await?;

        ensure_affected(result.rows_affected(), "account")
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        ensure_affected(result.rows_affected(), "account")
    }
}
