// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validador customizado para valores monetários: positivos e em centavos.
///
/// As colunas são NUMERIC(15,2); frações de centavo seriam arredondadas pelo
/// banco e poderiam virar zero.
pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("positive");
        err.message = Some("O valor deve ser maior que zero".into());
        return Err(err);
    }
    if value.normalize().scale() > 2 {
        let mut err = ValidationError::new("cents");
        err.message = Some("O valor deve ter no máximo duas casas decimais".into());
        return Err(err);
    }
    Ok(())
}

/// Remove pontuação do CPF/CNPJ e confere os dígitos verificadores.
///
/// Vazio vira `None`. Qualquer coisa que não seja um CPF (11 dígitos) ou CNPJ
/// (14 dígitos) válido é rejeitada.
pub fn normalize_tax_id(raw: &str) -> Result<Option<String>, ()> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        return Err(());
    }

    let numbers: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    let valid = match numbers.len() {
        11 => is_valid_cpf(&numbers),
        14 => is_valid_cnpj(&numbers),
        _ => false,
    };

    if valid { Ok(Some(digits)) } else { Err(()) }
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn is_valid_cpf(d: &[u32]) -> bool {
    if all_same(d) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = d[..len]
            .iter()
            .enumerate()
            .map(|(i, n)| n * (len as u32 + 1 - i as u32))
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            r => r,
        }
    };

    check(9) == d[9] && check(10) == d[10]
}

fn is_valid_cnpj(d: &[u32]) -> bool {
    if all_same(d) {
        return false;
    }

    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let check = |weights: &[u32]| {
        let sum: u32 = d.iter().zip(weights).map(|(n, w)| n * w).sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };

    check(&FIRST) == d[12] && check(&SECOND) == d[13]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("529.982.247-25", Some("52998224725"))]
    #[case("52998224725", Some("52998224725"))]
    #[case("11.222.333/0001-81", Some("11222333000181"))]
    #[case("", None)]
    #[case("   ", None)]
    fn accepts_valid_documents(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_tax_id(raw), Ok(expected.map(str::to_string)));
    }

    #[rstest]
    #[case("529.982.247-26")]
    #[case("111.111.111-11")]
    #[case("11.222.333/0001-80")]
    #[case("1234")]
    #[case("abc")]
    fn rejects_invalid_documents(#[case] raw: &str) {
        assert_eq!(normalize_tax_id(raw), Err(()));
    }

    #[test]
    fn positive_amount_rejects_zero_and_negative() {
        assert!(positive_amount(&dec!(0.01)).is_ok());
        assert!(positive_amount(&dec!(0)).is_err());
        assert!(positive_amount(&dec!(-1)).is_err());
    }

    #[rstest]
    #[case(dec!(0.004))]
    #[case(dec!(10.005))]
    #[case(dec!(9.996))]
    fn positive_amount_rejects_fractions_of_cent(#[case] value: Decimal) {
        let err = positive_amount(&value).unwrap_err();
        assert_eq!(err.code, "cents");
    }

    #[rstest]
    #[case(dec!(10))]
    #[case(dec!(10.5))]
    #[case(dec!(10.50))]
    #[case(dec!(10.500))]
    fn positive_amount_accepts_cents(#[case] value: Decimal) {
        assert!(positive_amount(&value).is_ok());
    }
}
