pub mod accounts;
pub mod auth;
pub mod banks;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod ledger;
pub mod parties;
pub mod reports;
pub mod settings;
