// src/services/ledger_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{EventAction, EventBus, Topic},
    },
    db::{BankRepository, LedgerRepository},
    models::ledger::{CreateLedgerEntryPayload, LedgerEntry, LedgerFilter},
    services::bank_service::require_active,
};

/// Lançamentos avulsos (tarifas, aportes, transferências manuais).
#[derive(Clone)]
pub struct LedgerService {
    repo: LedgerRepository,
    bank_repo: BankRepository,
    events: EventBus,
}

impl LedgerService {
    pub fn new(repo: LedgerRepository, bank_repo: BankRepository, events: EventBus) -> Self {
        Self { repo, bank_repo, events }
    }

    pub async fn create_entry<'e, E>(
        &self,
        executor: E,
        input: &CreateLedgerEntryPayload,
    ) -> Result<LedgerEntry, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let bank = self
            .bank_repo
            .find_by_id(&mut *tx, input.bank_id)
            .await?
            .ok_or(AppError::NotFound("bank"))
            .and_then(require_active)?;

        let mut entry = self.repo.create(&mut *tx, input).await?;

        tx.commit().await?;

        tracing::info!(
            "📒 Lançamento {:?} de {} em '{}'",
            entry.direction,
            entry.amount,
            bank.name
        );
        entry.bank_name = Some(bank.name);
        self.events.emit(Topic::Ledger, EventAction::Created, entry.id);
        self.events.emit(Topic::Banks, EventAction::Updated, entry.bank_id);

        Ok(entry)
    }

    pub async fn list_entries<'e, E>(&self, executor: E, filter: &LedgerFilter) -> Result<Vec<LedgerEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, filter).await
    }

    pub async fn delete_entry<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = self.repo.delete(executor, id).await?;

        tracing::info!("🗑️ Lançamento {} removido", id);
        self.events.emit(Topic::Ledger, EventAction::Deleted, entry.id);
        self.events.emit(Topic::Banks, EventAction::Updated, entry.bank_id);
        Ok(())
    }
}
