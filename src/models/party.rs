// src/models/party.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Clientes e fornecedores têm o mesmo formato, mas vivem em tabelas separadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyKind {
    Client,
    Supplier,
}

impl PartyKind {
    pub fn table(&self) -> &'static str {
        match self {
            PartyKind::Client => "clients",
            PartyKind::Supplier => "suppliers",
        }
    }

    /// Nome usado nas mensagens de "não encontrado".
    pub fn resource(&self) -> &'static str {
        match self {
            PartyKind::Client => "client",
            PartyKind::Supplier => "supplier",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub name: String,

    /// CPF ou CNPJ, só dígitos.
    #[schema(example = "52998224725")]
    pub tax_id: Option<String>,

    #[schema(example = "maria@email.com")]
    pub email: Option<String>,

    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,

    pub address: Option<String>,
    pub notes: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usado tanto no cadastro quanto na edição (substituição completa).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartyPayload {
    #[validate(length(min = 1, max = 160, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[schema(example = "529.982.247-25")]
    pub tax_id: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    pub address: Option<String>,
    pub notes: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PartyFilter {
    /// Busca por nome, documento ou e-mail.
    pub search: Option<String>,
    pub active: Option<bool>,
}
