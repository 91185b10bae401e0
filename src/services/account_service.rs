// src/services/account_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{EventAction, EventBus, Topic},
    },
    db::{
        account_repo::{AccountChanges, NewAccount},
        AccountRepository, BankRepository, PartyRepository, SettlementRepository,
    },
    finance::{self, generate_installments},
    models::{
        account::{
            Account, AccountDirection, AccountFilter, CreateAccountPayload, InstallmentPreview,
            PreviewInstallmentsPayload, UpdateAccountPayload,
        },
        party::PartyKind,
        settlement::{CreateSettlementPayload, Settlement, SettlementReceipt},
    },
    services::bank_service::require_active,
};

#[derive(Clone)]
pub struct AccountService {
    repo: AccountRepository,
    settlement_repo: SettlementRepository,
    bank_repo: BankRepository,
    party_repo: PartyRepository,
    events: EventBus,
}

impl AccountService {
    pub fn new(
        repo: AccountRepository,
        settlement_repo: SettlementRepository,
        bank_repo: BankRepository,
        party_repo: PartyRepository,
        events: EventBus,
    ) -> Self {
        Self {
            repo,
            settlement_repo,
            bank_repo,
            party_repo,
            events,
        }
    }

    // --- PARCELAMENTO ---

    /// Simula o parcelamento sem gravar nada.
    pub fn preview_installments(&self, input: &PreviewInstallmentsPayload) -> Result<InstallmentPreview, AppError> {
        let installments = generate_installments(input.total_amount, input.installments, input.first_due_date)?;
        let total = installments.iter().map(|i| i.amount).sum();

        Ok(InstallmentPreview { installments, total })
    }

    /// Cria todas as parcelas de uma cobrança numa única transação.
    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        input: &CreateAccountPayload,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let installments = generate_installments(input.total_amount, input.installments, input.first_due_date)?;

        let amounts = finance::stored_amounts(&installments)?;

        let mut tx = executor.begin().await?;

        let (client_id, supplier_id) = self.resolve_party(&mut *tx, input.direction, input.party_id).await?;
        if let Some(bank_id) = input.bank_id {
            self.ensure_bank_exists(&mut *tx, bank_id).await?;
        }

        let group_id = Uuid::new_v4();
        let description = input.description.trim();
        let notes = non_blank(input.notes.as_deref());

        for (installment, amount) in installments.iter().zip(amounts) {
            let new = NewAccount {
                group_id,
                direction: input.direction,
                client_id,
                supplier_id,
                bank_id: input.bank_id,
                description,
                due_date: installment.due_date,
                amount,
                installment_index: installment.index as i32,
                installment_count: installment.count as i32,
                notes,
            };
            self.repo.insert(&mut *tx, &new).await?;
        }

        let accounts = self.repo.list_by_group(&mut *tx, group_id).await?;

        tx.commit().await?;

        tracing::info!(
            "🧾 {} parcela(s) criada(s) no grupo {} ({:?})",
            accounts.len(),
            group_id,
            input.direction
        );
        for account in &accounts {
            self.events.emit(Topic::Accounts, EventAction::Created, account.id);
        }

        Ok(accounts.into_iter().map(|a| a.with_status(today)).collect())
    }

    // --- CONSULTAS ---

    pub async fn list_accounts<'e, E>(
        &self,
        executor: E,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let accounts = self.repo.list(executor, filter).await?;

        Ok(apply_status(accounts, filter.status, today))
    }

    pub async fn get_account<'e, E>(&self, executor: E, id: Uuid, today: NaiveDate) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .map(|a| a.with_status(today))
            .ok_or(AppError::NotFound("account"))
    }

    pub async fn list_group<'e, E>(
        &self,
        executor: E,
        group_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<Account>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let accounts = self.repo.list_by_group(executor, group_id).await?;
        if accounts.is_empty() {
            return Err(AppError::NotFound("account"));
        }

        Ok(apply_status(accounts, None, today))
    }

    // --- EDIÇÃO ---

    /// Edita uma parcela isolada. O valor não pode ficar abaixo do que já foi baixado.
    pub async fn update_account<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &UpdateAccountPayload,
        today: NaiveDate,
    ) -> Result<Account, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .repo
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        finance::validate_amount_change(input.amount, current.amount_settled)?;

        let (client_id, supplier_id) = self.resolve_party(&mut *tx, current.direction, input.party_id).await?;
        if let Some(bank_id) = input.bank_id {
            self.ensure_bank_exists(&mut *tx, bank_id).await?;
        }

        let changes = AccountChanges {
            description: input.description.trim(),
            client_id,
            supplier_id,
            bank_id: input.bank_id,
            due_date: input.due_date,
            amount: input.amount,
            notes: non_blank(input.notes.as_deref()),
        };
        self.repo.update(&mut *tx, id, &changes).await?;

        let account = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        tx.commit().await?;

        self.events.emit(Topic::Accounts, EventAction::Updated, id);
        Ok(account.with_status(today))
    }

    /// Só apaga parcelas sem baixa; com baixa, é preciso estornar antes.
    pub async fn delete_account<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let account = self
            .repo
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        finance::validate_deletion(account.amount_settled)?;

        self.repo.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Conta {} removida", id);
        self.events.emit(Topic::Accounts, EventAction::Deleted, id);
        Ok(())
    }

    // --- BAIXA / ESTORNO ---

    /// Registra uma baixa (total ou parcial).
    ///
    /// A conta fica travada durante a transação: duas baixas simultâneas não
    /// conseguem, juntas, passar do valor da parcela.
    pub async fn settle_account<'e, E>(
        &self,
        executor: E,
        account_id: Uuid,
        input: &CreateSettlementPayload,
        today: NaiveDate,
    ) -> Result<SettlementReceipt, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let account = self
            .repo
            .lock_by_id(&mut *tx, account_id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        finance::validate_settlement(account.amount, account.amount_settled, input.amount)?;

        let bank_id = input
            .bank_id
            .or(account.bank_id)
            .ok_or(AppError::InvalidInput("bank_required"))?;
        let bank = self
            .bank_repo
            .find_by_id(&mut *tx, bank_id)
            .await?
            .ok_or(AppError::NotFound("bank"))
            .and_then(require_active)?;

        let settled_on = input.date.unwrap_or(today);

        let mut settlement = self
            .settlement_repo
            .insert(
                &mut *tx,
                account_id,
                bank_id,
                input.amount,
                settled_on,
                non_blank(input.notes.as_deref()),
            )
            .await?;
        self.repo
            .set_settled(
                &mut *tx,
                account_id,
                finance::settled_after_payment(account.amount_settled, input.amount),
            )
            .await?;

        let account = self
            .repo
            .find_by_id(&mut *tx, account_id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        tx.commit().await?;

        tracing::info!(
            "💸 Baixa de {} na conta {} pelo banco '{}'",
            settlement.amount,
            account_id,
            bank.name
        );
        settlement.bank_name = Some(bank.name);
        self.publish_balance_change(&settlement, EventAction::Settled);

        Ok(SettlementReceipt {
            settlement,
            account: account.with_status(today),
        })
    }

    pub async fn list_settlements<'e, E>(&self, executor: E, account_id: Uuid) -> Result<Vec<Settlement>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        if self.repo.find_by_id(&mut *conn, account_id).await?.is_none() {
            return Err(AppError::NotFound("account"));
        }

        self.settlement_repo.list_by_account(&mut *conn, account_id).await
    }

    /// Estorno: apaga a baixa e devolve o valor ao saldo em aberto da conta.
    pub async fn reverse_settlement<'e, E>(
        &self,
        executor: E,
        settlement_id: Uuid,
        today: NaiveDate,
    ) -> Result<SettlementReceipt, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let settlement = self
            .settlement_repo
            .lock_by_id(&mut *tx, settlement_id)
            .await?
            .ok_or(AppError::NotFound("settlement"))?;

        let locked = self
            .repo
            .lock_by_id(&mut *tx, settlement.account_id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        self.settlement_repo.delete(&mut *tx, settlement_id).await?;
        self.repo
            .set_settled(
                &mut *tx,
                settlement.account_id,
                finance::settled_after_reversal(locked.amount_settled, settlement.amount),
            )
            .await?;

        let account = self
            .repo
            .find_by_id(&mut *tx, settlement.account_id)
            .await?
            .ok_or(AppError::NotFound("account"))?;

        tx.commit().await?;

        tracing::info!("↩️ Baixa {} estornada ({})", settlement_id, settlement.amount);
        self.publish_balance_change(&settlement, EventAction::Reversed);

        Ok(SettlementReceipt {
            settlement,
            account: account.with_status(today),
        })
    }

    // --- AUXILIARES ---

    fn publish_balance_change(&self, settlement: &Settlement, action: EventAction) {
        self.events.emit(Topic::Settlements, action, settlement.id);
        self.events.emit(Topic::Accounts, EventAction::Updated, settlement.account_id);
        self.events.emit(Topic::Banks, EventAction::Updated, settlement.bank_id);
    }

    /// A receber exige cliente; a pagar exige fornecedor. Devolve (client_id, supplier_id).
    async fn resolve_party(
        &self,
        conn: &mut PgConnection,
        direction: AccountDirection,
        party_id: Option<Uuid>,
    ) -> Result<(Option<Uuid>, Option<Uuid>), AppError> {
        let Some(party_id) = party_id else {
            return Ok((None, None));
        };

        let (expected, other) = party_kinds(direction);

        if self.party_repo.find_by_id(&mut *conn, expected, party_id).await?.is_some() {
            return Ok(match expected {
                PartyKind::Client => (Some(party_id), None),
                PartyKind::Supplier => (None, Some(party_id)),
            });
        }

        if self.party_repo.find_by_id(&mut *conn, other, party_id).await?.is_some() {
            return Err(AppError::InvalidInput("party_mismatch"));
        }

        Err(AppError::NotFound(expected.resource()))
    }

    async fn ensure_bank_exists(&self, conn: &mut PgConnection, bank_id: Uuid) -> Result<(), AppError> {
        self.bank_repo
            .find_by_id(conn, bank_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound("bank"))
    }
}

/// (tipo esperado, tipo oposto) de contraparte para o sentido da conta.
fn party_kinds(direction: AccountDirection) -> (PartyKind, PartyKind) {
    match direction {
        AccountDirection::Receivable => (PartyKind::Client, PartyKind::Supplier),
        AccountDirection::Payable => (PartyKind::Supplier, PartyKind::Client),
    }
}

/// Deriva a situação e, se pedido, filtra por ela.
fn apply_status(
    accounts: Vec<Account>,
    status: Option<finance::AccountStatus>,
    today: NaiveDate,
) -> Vec<Account> {
    accounts
        .into_iter()
        .map(|a| a.with_status(today))
        .filter(|a| status.is_none_or(|s| a.status == s))
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::AccountStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn account(amount: Decimal, settled: Decimal, due_date: NaiveDate) -> Account {
        Account {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            direction: AccountDirection::Receivable,
            client_id: None,
            supplier_id: None,
            bank_id: None,
            description: "Mensalidade".to_string(),
            due_date,
            amount,
            amount_settled: settled,
            installment_index: 1,
            installment_count: 1,
            notes: None,
            party_name: None,
            bank_name: None,
            status: AccountStatus::default(),
            remaining: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_is_derived_before_filtering() {
        let today = date(2024, 3, 10);
        let accounts = vec![
            account(dec!(100), dec!(100), date(2024, 3, 1)),
            account(dec!(100), dec!(50), date(2024, 3, 9)),
            account(dec!(100), dec!(0), date(2024, 3, 11)),
        ];

        let overdue = apply_status(accounts.clone(), Some(AccountStatus::Overdue), today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].remaining, dec!(50));

        let all = apply_status(accounts, None, today);
        let statuses: Vec<_> = all.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![AccountStatus::Paid, AccountStatus::Overdue, AccountStatus::Open]
        );
    }

    #[test]
    fn counterparty_kind_follows_direction() {
        assert_eq!(
            party_kinds(AccountDirection::Receivable),
            (PartyKind::Client, PartyKind::Supplier)
        );
        assert_eq!(
            party_kinds(AccountDirection::Payable),
            (PartyKind::Supplier, PartyKind::Client)
        );
    }

    #[test]
    fn preview_sums_the_unrounded_installments() {
        let service = AccountService::new(
            AccountRepository::new(),
            SettlementRepository::new(),
            BankRepository::new(),
            PartyRepository::new(),
            EventBus::new(4),
        );

        let preview = service
            .preview_installments(&PreviewInstallmentsPayload {
                total_amount: dec!(300),
                installments: 3,
                first_due_date: date(2024, 1, 31),
            })
            .unwrap();

        assert_eq!(preview.total, dec!(300));
        let dates: Vec<_> = preview.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
    }
}
