pub mod user_repo;
pub use user_repo::UserRepository;
pub mod bank_repo;
pub use bank_repo::BankRepository;
pub mod party_repo;
pub use party_repo::PartyRepository;
pub mod account_repo;
pub use account_repo::AccountRepository;
pub mod settlement_repo;
pub use settlement_repo::SettlementRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
