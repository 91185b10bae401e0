pub mod account;
pub mod auth;
pub mod bank;
pub mod dashboard;
pub mod ledger;
pub mod party;
pub mod settings;
pub mod settlement;
pub mod statement;
