// src/services/bank_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{EventAction, EventBus, Topic},
    },
    db::BankRepository,
    models::bank::{Bank, BankFilter, CreateBankPayload, UpdateBankPayload},
};

#[derive(Clone)]
pub struct BankService {
    repo: BankRepository,
    events: EventBus,
}

impl BankService {
    pub fn new(repo: BankRepository, events: EventBus) -> Self {
        Self { repo, events }
    }

    pub async fn create_bank<'e, E>(&self, executor: E, input: &CreateBankPayload) -> Result<Bank, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bank = self
            .repo
            .create(
                executor,
                input.name.trim(),
                non_blank(input.branch.as_deref()),
                non_blank(input.account_number.as_deref()),
                input.kind,
                input.initial_balance.unwrap_or(Decimal::ZERO),
            )
            .await?;

        tracing::info!("🏦 Banco '{}' criado ({})", bank.name, bank.id);
        self.events.emit(Topic::Banks, EventAction::Created, bank.id);

        Ok(bank)
    }

    pub async fn list_banks<'e, E>(&self, executor: E, filter: &BankFilter) -> Result<Vec<Bank>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, filter).await
    }

    pub async fn get_bank<'e, E>(&self, executor: E, id: Uuid) -> Result<Bank, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::NotFound("bank"))
    }

    pub async fn update_bank<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &UpdateBankPayload,
    ) -> Result<Bank, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bank = self
            .repo
            .update(executor, id, input)
            .await?
            .ok_or(AppError::NotFound("bank"))?;

        self.events.emit(Topic::Banks, EventAction::Updated, bank.id);
        Ok(bank)
    }

    /// Bancos com lançamentos, baixas ou contas vinculadas não podem ser apagados
    /// (409); o caminho é desativar.
    pub async fn delete_bank<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, id).await?;

        tracing::info!("🗑️ Banco {} removido", id);
        self.events.emit(Topic::Banks, EventAction::Deleted, id);
        Ok(())
    }
}

/// Baixas e lançamentos só podem movimentar bancos ativos.
pub fn require_active(bank: Bank) -> Result<Bank, AppError> {
    if !bank.is_active {
        return Err(AppError::InvalidInput("bank_inactive"));
    }
    Ok(bank)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bank::BankKind;
    use chrono::Utc;
    use rstest::rstest;

    fn bank(is_active: bool) -> Bank {
        Bank {
            id: Uuid::new_v4(),
            name: "Caixa da loja".to_string(),
            branch: None,
            account_number: None,
            current_balance: Decimal::ZERO,
            kind: BankKind::Cash,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn only_active_banks_take_movements(#[case] is_active: bool, #[case] accepted: bool) {
        let result = require_active(bank(is_active));

        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(matches!(result, Err(AppError::InvalidInput("bank_inactive"))));
        }
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" 1234-5 ")), Some("1234-5"));
    }
}
