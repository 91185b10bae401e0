// src/finance/installments.rs

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Limite de parcelas aceito numa única cobrança (30 anos mensais).
pub const MAX_INSTALLMENTS: u32 = 360;

/// Uma parcela gerada a partir de uma cobrança.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    #[schema(value_type = f64, example = "100.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2024-02-29")]
    pub due_date: NaiveDate,

    /// Começa em 1.
    pub index: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallmentError {
    #[error("O valor total deve ser maior que zero")]
    NonPositiveTotal,

    #[error("Quantidade de parcelas inválida: {0}")]
    InvalidCount(u32),

    #[error("Data de vencimento fora do intervalo suportado")]
    DateOutOfRange,

    #[error("Parcela zerada após o arredondamento")]
    RoundsToZero,
}

/// Gera as parcelas de uma cobrança.
///
/// O valor de cada parcela é `total / count` sem correção de centavos: o resíduo
/// da divisão não é redistribuído entre as parcelas (aproximação conhecida).
///
/// A parcela `i` vence no mesmo dia do mês da primeira, com o mês avançado em
/// `i - 1`. Quando o mês de destino não tem esse dia, usa o último dia do mês.
/// O dia de referência é sempre o da primeira parcela, então 31/01 gera
/// 29/02 e depois 31/03.
pub fn generate_installments(
    total: Decimal,
    count: u32,
    first_due_date: NaiveDate,
) -> Result<Vec<Installment>, InstallmentError> {
    if total <= Decimal::ZERO {
        return Err(InstallmentError::NonPositiveTotal);
    }
    if count == 0 || count > MAX_INSTALLMENTS {
        return Err(InstallmentError::InvalidCount(count));
    }

    let amount = total / Decimal::from(count);

    (1..=count)
        .map(|index| {
            let due_date = add_months_clamped(first_due_date, index - 1)
                .ok_or(InstallmentError::DateOutOfRange)?;

            Ok(Installment {
                amount,
                due_date,
                index,
                count,
            })
        })
        .collect()
}

/// Arredonda para centavos do mesmo jeito que o PostgreSQL grava em NUMERIC(15,2):
/// meio centavo sobe (em módulo).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Valores como as parcelas ficam gravadas: cada uma arredondada para centavos,
/// sem redistribuir a sobra.
pub fn stored_amounts(installments: &[Installment]) -> Result<Vec<Decimal>, InstallmentError> {
    installments
        .iter()
        .map(|i| match round_money(i.amount) {
            amount if amount > Decimal::ZERO => Ok(amount),
            _ => Err(InstallmentError::RoundsToZero),
        })
        .collect()
}

/// Avança `months` meses por componentes de calendário, prendendo o dia no
/// último dia do mês de destino.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    // `checked_add_months` já prende no fim do mês; partimos sempre da data
    // original para não perder o dia 31 depois de passar por fevereiro.
    date.checked_add_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due_dates(installments: &[Installment]) -> Vec<String> {
        installments
            .iter()
            .map(|i| i.due_date.format("%Y-%m-%d").to_string())
            .collect()
    }

    #[test]
    fn three_installments_from_end_of_january_clamp_in_leap_february() {
        let parcels = generate_installments(dec!(300), 3, date(2024, 1, 31)).unwrap();

        assert_eq!(
            due_dates(&parcels),
            vec!["2024-01-31", "2024-02-29", "2024-03-31"]
        );
        assert!(parcels.iter().all(|p| p.amount == dec!(100)));
        assert_eq!(
            parcels.iter().map(|p| p.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(parcels.iter().all(|p| p.count == 3));
    }

    #[test]
    fn two_installments_from_end_of_january() {
        let parcels = generate_installments(dec!(100), 2, date(2024, 1, 31)).unwrap();

        assert_eq!(due_dates(&parcels), vec!["2024-01-31", "2024-02-29"]);
        assert_eq!(parcels[0].amount, dec!(50));
    }

    #[test]
    fn non_leap_february_clamps_to_28() {
        let parcels = generate_installments(dec!(90), 2, date(2023, 1, 30)).unwrap();

        assert_eq!(due_dates(&parcels), vec!["2023-01-30", "2023-02-28"]);
    }

    #[test]
    fn crosses_year_boundary() {
        let parcels = generate_installments(dec!(400), 4, date(2024, 11, 15)).unwrap();

        assert_eq!(
            due_dates(&parcels),
            vec!["2024-11-15", "2024-12-15", "2025-01-15", "2025-02-15"]
        );
    }

    #[test]
    fn residual_cents_are_not_redistributed() {
        let parcels = generate_installments(dec!(100), 3, date(2024, 5, 10)).unwrap();

        let expected = dec!(100) / dec!(3);
        assert!(parcels.iter().all(|p| p.amount == expected));
        assert_eq!(parcels[0].amount.round_dp(2), dec!(33.33));
    }

    #[rstest]
    #[case(dec!(0), 1, InstallmentError::NonPositiveTotal)]
    #[case(dec!(-10), 2, InstallmentError::NonPositiveTotal)]
    #[case(dec!(10), 0, InstallmentError::InvalidCount(0))]
    #[case(dec!(10), MAX_INSTALLMENTS + 1, InstallmentError::InvalidCount(MAX_INSTALLMENTS + 1))]
    fn rejects_invalid_input(
        #[case] total: Decimal,
        #[case] count: u32,
        #[case] expected: InstallmentError,
    ) {
        let err = generate_installments(total, count, date(2024, 1, 1)).unwrap_err();
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(date(2024, 1, 31), 1, date(2024, 2, 29))]
    #[case(date(2024, 3, 31), 1, date(2024, 4, 30))]
    #[case(date(2024, 1, 31), 2, date(2024, 3, 31))]
    #[case(date(2024, 8, 31), 6, date(2025, 2, 28))]
    #[case(date(2024, 6, 15), 0, date(2024, 6, 15))]
    fn months_are_added_with_clamp(
        #[case] start: NaiveDate,
        #[case] months: u32,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(add_months_clamped(start, months), Some(expected));
    }

    #[rstest]
    #[case(dec!(50.025), dec!(50.03))]
    #[case(dec!(33.3333), dec!(33.33))]
    #[case(dec!(0.005), dec!(0.01))]
    #[case(dec!(-20.005), dec!(-20.01))]
    fn money_rounds_half_cent_away_from_zero(#[case] value: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(value), expected);
    }

    #[test]
    fn stored_amounts_round_each_installment_without_redistribution() {
        let parcels = generate_installments(dec!(100.05), 2, date(2024, 5, 10)).unwrap();
        assert_eq!(stored_amounts(&parcels), Ok(vec![dec!(50.03), dec!(50.03)]));

        let parcels = generate_installments(dec!(100), 3, date(2024, 5, 10)).unwrap();
        assert_eq!(stored_amounts(&parcels), Ok(vec![dec!(33.33); 3]));
    }

    #[test]
    fn installment_that_rounds_to_zero_is_rejected() {
        let parcels = generate_installments(dec!(0.05), 12, date(2024, 5, 10)).unwrap();
        assert_eq!(stored_amounts(&parcels), Err(InstallmentError::RoundsToZero));
    }

    proptest! {
        #[test]
        fn generates_exactly_n_installments_that_sum_to_total(
            cents in 1i64..=100_000_000_000i64,
            count in 1u32..=MAX_INSTALLMENTS,
            day in 1u32..=28,
            month in 1u32..=12,
            year in 1990i32..=2090,
        ) {
            let total = Decimal::new(cents, 2);
            let start = date(year, month, day);
            let parcels = generate_installments(total, count, start).unwrap();

            prop_assert_eq!(parcels.len(), count as usize);
            prop_assert_eq!(parcels[0].due_date, start);

            let share = total / Decimal::from(count);
            prop_assert!(parcels.iter().all(|p| p.amount == share));

            let sum: Decimal = parcels.iter().map(|p| p.amount).sum();
            prop_assert!((sum - total).abs() < Decimal::new(1, 10));
        }

        #[test]
        fn due_dates_are_strictly_increasing_and_keep_day_when_possible(
            count in 2u32..=48,
            day in 1u32..=31,
        ) {
            let start = date(2024, 1, day);
            let parcels = generate_installments(Decimal::ONE_HUNDRED, count, start).unwrap();

            for pair in parcels.windows(2) {
                prop_assert!(pair[0].due_date < pair[1].due_date);
            }
            for p in &parcels {
                let expected_day = day.min(last_day(p.due_date.year(), p.due_date.month()).day());
                prop_assert_eq!(p.due_date.day(), expected_day);
            }
        }
    }

    fn last_day(year: i32, month: u32) -> NaiveDate {
        let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        date(ny, nm, 1).pred_opt().unwrap()
    }
}
