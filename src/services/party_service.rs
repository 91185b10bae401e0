// src/services/party_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        events::{EventAction, EventBus, Topic},
        validation::normalize_tax_id,
    },
    db::PartyRepository,
    models::party::{Party, PartyFilter, PartyKind, PartyPayload},
};

// Clientes e fornecedores: mesmo fluxo, tabela decidida por `PartyKind`.
#[derive(Clone)]
pub struct PartyService {
    repo: PartyRepository,
    events: EventBus,
}

impl PartyService {
    pub fn new(repo: PartyRepository, events: EventBus) -> Self {
        Self { repo, events }
    }

    pub async fn create_party<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        input: &PartyPayload,
    ) -> Result<Party, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tax_id = clean_tax_id(input.tax_id.as_deref())?;

        let party = self.repo.create(executor, kind, input, tax_id.as_deref()).await?;

        tracing::info!("👥 {} '{}' cadastrado ({})", kind.resource(), party.name, party.id);
        self.events.emit(Topic::Parties, EventAction::Created, party.id);

        Ok(party)
    }

    pub async fn list_parties<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        filter: &PartyFilter,
    ) -> Result<Vec<Party>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, kind, filter).await
    }

    pub async fn get_party<'e, E>(&self, executor: E, kind: PartyKind, id: Uuid) -> Result<Party, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, kind, id)
            .await?
            .ok_or(AppError::NotFound(kind.resource()))
    }

    pub async fn update_party<'e, E>(
        &self,
        executor: E,
        kind: PartyKind,
        id: Uuid,
        input: &PartyPayload,
    ) -> Result<Party, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tax_id = clean_tax_id(input.tax_id.as_deref())?;

        let party = self
            .repo
            .update(executor, kind, id, input, tax_id.as_deref())
            .await?
            .ok_or(AppError::NotFound(kind.resource()))?;

        self.events.emit(Topic::Parties, EventAction::Updated, party.id);
        Ok(party)
    }

    pub async fn delete_party<'e, E>(&self, executor: E, kind: PartyKind, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete(executor, kind, id).await?;

        self.events.emit(Topic::Parties, EventAction::Deleted, id);
        Ok(())
    }
}

/// CPF/CNPJ só com dígitos, dígitos verificadores conferidos. Vazio vira `None`.
fn clean_tax_id(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw {
        Some(raw) => normalize_tax_id(raw).map_err(|_| AppError::InvalidInput("invalid_tax_id")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("529.982.247-25"), Some("52998224725"))]
    #[case(Some("11.222.333/0001-81"), Some("11222333000181"))]
    #[case(Some("  "), None)]
    #[case(None, None)]
    fn accepted_tax_ids_are_reduced_to_digits(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(clean_tax_id(raw).unwrap().as_deref(), expected);
    }

    #[test]
    fn wrong_check_digit_is_rejected() {
        assert!(matches!(
            clean_tax_id(Some("529.982.247-26")),
            Err(AppError::InvalidInput("invalid_tax_id"))
        ));
    }
}
