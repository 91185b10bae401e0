pub mod account_service;
pub mod auth;
pub mod bank_service;
pub mod dashboard_service;
pub mod ledger_service;
pub mod party_service;
pub mod report_service;
pub mod statement_service;
