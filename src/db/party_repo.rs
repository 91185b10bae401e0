// src/db/party_repo.rs

use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{ensure_affected, map_delete_error},
        error::AppError,
    },
    models::party::{Party, PartyFilter, PartyKind, PartyPayload},
};

// Clientes e fornecedores compartilham o formato; a tabela vem de `PartyKind`
// (nome fixo, nunca entrada do usuário).
#[derive(Clone, Default)]
pub struct PartyRepository;

impl PartyRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        input: &PartyPayload,
        tax_id: Option<&str>,
    ) -> Result<Party, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO {} (name, tax_id, email, phone, address, notes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
            kind.table()
        );

        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(input.name.trim())
            .bind(tax_id)
            .bind(input.email.as_deref())
            .bind(input.phone.as_deref())
            .bind(input.address.as_deref())
            .bind(input.notes.as_deref())
            .bind(input.is_active)
            .fetch_one(executor)
            .await?;

        Ok(party)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        filter: &PartyFilter,
    ) -> Result<Vec<Party>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {} WHERE 1 = 1", kind.table()));

        if let Some(active) = filter.active {
            qb.push(" AND is_active = ").push_bind(active);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR tax_id ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY lower(name) ASC");

        let parties = qb.build_query_as::<Party>().fetch_all(executor).await?;
        Ok(parties)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        id: Uuid,
    ) -> Result<Option<Party>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT * FROM {} WHERE id = $1", kind.table());

        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(party)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        id: Uuid,
        input: &PartyPayload,
        tax_id: Option<&str>,
    ) -> Result<Option<Party>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE {}
               SET name = $2,
                   tax_id = $3,
                   email = $4,
                   phone = $5,
                   address = $6,
                   notes = $7,
                   is_active = $8,
                   updated_at = NOW()
             WHERE id = $1
            RETURNING *
            "#,
            kind.table()
        );

        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(id)
            .bind(input.name.trim())
            .bind(tax_id)
            .bind(input.email.as_deref())
            .bind(input.phone.as_deref())
            .bind(input.address.as_deref())
            .bind(input.notes.as_deref())
            .bind(input.is_active)
            .fetch_optional(executor)
            .await?;

        Ok(party)
    }

    pub async fn delete<'e, E>(&self, executor: E, kind: PartyKind, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_delete_error)?;

        ensure_affected(result.rows_affected(), kind.resource())
    }
}
