// src/finance.rs
//
// Regras de cálculo, sem acesso ao banco: geração de parcelas, situação das contas
// e conciliação do extrato.

pub mod installments;
pub mod reconciliation;
pub mod status;

pub use installments::{
    generate_installments, round_money, stored_amounts, Installment, InstallmentError, MAX_INSTALLMENTS,
};
pub use reconciliation::{reconcile, Flow, Movement, MovementSource, Reconciliation, StatementLine};
pub use status::{
    derive_status, remaining, settled_after_payment, settled_after_reversal, today, validate_amount_change,
    validate_deletion, validate_settlement, AccountStatus, SettlementError,
};
