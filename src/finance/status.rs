// src/finance/status.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Situação de uma conta a pagar/receber. Sempre derivada, nunca gravada.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Open,    // Em aberto
    Paid,    // Quitada
    Overdue, // Vencida
}

/// Deriva a situação a partir do valor, do total baixado e do vencimento.
///
/// Não existe "parcialmente vencida": qualquer saldo em aberto depois do
/// vencimento deixa a conta inteira como vencida.
pub fn derive_status(
    amount: Decimal,
    settled: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
) -> AccountStatus {
    if settled >= amount {
        AccountStatus::Paid
    } else if due_date < today {
        AccountStatus::Overdue
    } else {
        AccountStatus::Open
    }
}

/// Quanto ainda falta baixar (nunca negativo).
pub fn remaining(amount: Decimal, settled: Decimal) -> Decimal {
    (amount - settled).max(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("O valor da baixa deve ser maior que zero")]
    NonPositiveAmount,

    #[error("O valor da baixa excede o saldo em aberto ({remaining})")]
    ExceedsRemaining { remaining: Decimal },

    #[error("O valor da conta não pode ficar abaixo do já baixado ({settled})")]
    BelowSettled { settled: Decimal },

    #[error("A conta possui baixas")]
    HasSettlements,
}

/// Valida uma baixa antes de enviá-la ao banco.
pub fn validate_settlement(
    amount: Decimal,
    settled: Decimal,
    payment: Decimal,
) -> Result<(), SettlementError> {
    if payment <= Decimal::ZERO {
        return Err(SettlementError::NonPositiveAmount);
    }

    let remaining = remaining(amount, settled);
    if payment > remaining {
        return Err(SettlementError::ExceedsRemaining { remaining });
    }

    Ok(())
}

/// Nova situação do total baixado depois de uma baixa validada.
pub fn settled_after_payment(settled: Decimal, payment: Decimal) -> Decimal {
    settled + payment
}

/// Total baixado depois do estorno de `reversed`.
pub fn settled_after_reversal(settled: Decimal, reversed: Decimal) -> Decimal {
    (settled - reversed).max(Decimal::ZERO)
}

/// Edição do valor de uma parcela: não pode ficar abaixo do que já entrou ou saiu.
pub fn validate_amount_change(new_amount: Decimal, settled: Decimal) -> Result<(), SettlementError> {
    if new_amount < settled {
        return Err(SettlementError::BelowSettled { settled });
    }
    Ok(())
}

/// Parcela com baixa só pode ser apagada depois dos estornos.
pub fn validate_deletion(settled: Decimal) -> Result<(), SettlementError> {
    if settled > Decimal::ZERO {
        return Err(SettlementError::HasSettlements);
    }
    Ok(())
}

/// Data local de hoje, sem hora.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[rstest]
    #[case(dec!(100), dec!(100), -30, AccountStatus::Paid)]
    #[case(dec!(100), dec!(100), 30, AccountStatus::Paid)]
    #[case(dec!(100), dec!(120), 0, AccountStatus::Paid)]
    #[case(dec!(100), dec!(50), -1, AccountStatus::Overdue)]
    #[case(dec!(100), dec!(0), -1, AccountStatus::Overdue)]
    #[case(dec!(100), dec!(0), 1, AccountStatus::Open)]
    #[case(dec!(100), dec!(99.99), 0, AccountStatus::Open)]
    fn derives_status(
        #[case] amount: Decimal,
        #[case] settled: Decimal,
        #[case] due_offset_days: i64,
        #[case] expected: AccountStatus,
    ) {
        let due = today() + chrono::Duration::days(due_offset_days);
        assert_eq!(derive_status(amount, settled, due, today()), expected);
    }

    #[test]
    fn due_today_is_still_open() {
        assert_eq!(
            derive_status(dec!(10), dec!(0), today(), today()),
            AccountStatus::Open
        );
    }

    #[test]
    fn remaining_never_goes_negative() {
        assert_eq!(remaining(dec!(100), dec!(30)), dec!(70));
        assert_eq!(remaining(dec!(100), dec!(130)), Decimal::ZERO);
    }

    #[test]
    fn settlement_of_exact_remaining_is_accepted() {
        assert_eq!(validate_settlement(dec!(100), dec!(40), dec!(60)), Ok(()));
    }

    #[test]
    fn over_settlement_is_rejected() {
        assert_eq!(
            validate_settlement(dec!(100), dec!(40), dec!(60.01)),
            Err(SettlementError::ExceedsRemaining { remaining: dec!(60) })
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5))]
    fn non_positive_settlement_is_rejected(#[case] payment: Decimal) {
        assert_eq!(
            validate_settlement(dec!(100), dec!(0), payment),
            Err(SettlementError::NonPositiveAmount)
        );
    }

    #[test]
    fn paid_account_accepts_nothing_more() {
        assert!(matches!(
            validate_settlement(dec!(100), dec!(100), dec!(0.01)),
            Err(SettlementError::ExceedsRemaining { .. })
        ));
    }

    #[rstest]
    #[case(dec!(100), dec!(40), true)]
    #[case(dec!(40), dec!(40), true)]
    #[case(dec!(39.99), dec!(40), false)]
    #[case(dec!(10), dec!(0), true)]
    fn amount_cannot_drop_below_settled(
        #[case] new_amount: Decimal,
        #[case] settled: Decimal,
        #[case] accepted: bool,
    ) {
        let result = validate_amount_change(new_amount, settled);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert_eq!(result, Err(SettlementError::BelowSettled { settled }));
        }
    }

    #[test]
    fn only_accounts_without_settlements_can_be_deleted() {
        assert_eq!(validate_deletion(Decimal::ZERO), Ok(()));
        assert_eq!(validate_deletion(dec!(0.01)), Err(SettlementError::HasSettlements));
    }

    #[test]
    fn reversal_restores_the_open_balance() {
        let due = today() + chrono::Duration::days(5);
        let settled = settled_after_payment(dec!(40), dec!(60));
        assert_eq!(derive_status(dec!(100), settled, due, today()), AccountStatus::Paid);

        let restored = settled_after_reversal(settled, dec!(60));

        assert_eq!(restored, dec!(40));
        assert_eq!(remaining(dec!(100), restored), dec!(60));
        assert_eq!(derive_status(dec!(100), restored, due, today()), AccountStatus::Open);
    }

    #[test]
    fn reversal_never_leaves_negative_settled() {
        assert_eq!(settled_after_reversal(dec!(10), dec!(25)), Decimal::ZERO);
    }
}
