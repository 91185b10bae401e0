// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{events::EventBus, i18n::I18nStore},
    db::{
        AccountRepository, BankRepository, DashboardRepository, LedgerRepository, PartyRepository,
        SettingsRepository, SettlementRepository, UserRepository,
    },
    services::{
        account_service::AccountService, auth::AuthService, bank_service::BankService,
        dashboard_service::DashboardService, ledger_service::LedgerService,
        party_service::PartyService, report_service::ReportService,
        statement_service::StatementService,
    },
};

const EVENT_BUS_CAPACITY: usize = 256;

/// Configuração lida do ambiente (e do `.env`, quando existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub fonts_dir: String,
    pub default_locale: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3000)?,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "pt".to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválida: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub event_bus: EventBus,

    pub settings_repo: SettingsRepository,

    pub auth_service: AuthService,
    pub bank_service: BankService,
    pub party_service: PartyService,
    pub account_service: AccountService,
    pub ledger_service: LedgerService,
    pub statement_service: StatementService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: &AppConfig) -> Self {
        let event_bus = EventBus::new(EVENT_BUS_CAPACITY);
        let i18n_store = I18nStore::new(&config.default_locale);

        let user_repo = UserRepository::new(db_pool.clone());
        let bank_repo = BankRepository::new();
        let party_repo = PartyRepository::new();
        let account_repo = AccountRepository::new();
        let settlement_repo = SettlementRepository::new();
        let ledger_repo = LedgerRepository::new();
        let dashboard_repo = DashboardRepository::new();
        let settings_repo = SettingsRepository::new();

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone(), db_pool.clone());
        let bank_service = BankService::new(bank_repo.clone(), event_bus.clone());
        let party_service = PartyService::new(party_repo.clone(), event_bus.clone());
        let account_service = AccountService::new(
            account_repo,
            settlement_repo.clone(),
            bank_repo.clone(),
            party_repo,
            event_bus.clone(),
        );
        let ledger_service = LedgerService::new(ledger_repo.clone(), bank_repo.clone(), event_bus.clone());
        let statement_service = StatementService::new(bank_repo.clone(), ledger_repo, settlement_repo);
        let dashboard_service = DashboardService::new(dashboard_repo, bank_repo);
        let report_service = ReportService::new(
            statement_service.clone(),
            account_service.clone(),
            settings_repo.clone(),
            config.fonts_dir.clone(),
        );

        Self {
            db_pool,
            i18n_store,
            event_bus,
            settings_repo,
            auth_service,
            bank_service,
            party_service,
            account_service,
            ledger_service,
            statement_service,
            dashboard_service,
            report_service,
        }
    }
}
