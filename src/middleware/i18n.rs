// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::{common::i18n::I18nStore, config::AppState};

// Idioma da resposta, negociado pelo Accept-Language
pub struct Locale(pub String);

impl FromRequestParts<AppState> for Locale {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        Ok(Locale(negotiate(header_value, &state.i18n_store)))
    }
}

/// Primeiro idioma do cabeçalho (por peso) que temos traduzido; senão o padrão.
/// "pt-BR" casa com "pt".
fn negotiate(header_value: Option<&str>, store: &I18nStore) -> String {
    header_value
        .map(accept_language::parse)
        .unwrap_or_default()
        .iter()
        .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
        .find(|lang| store.supports(lang))
        .unwrap_or_else(|| store.default_locale().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("pt-BR,pt;q=0.9,en;q=0.8"), "pt")]
    #[case(Some("en-US"), "en")]
    #[case(Some("de-DE,en;q=0.5"), "en")]
    #[case(Some("fr"), "pt")]
    #[case(None, "pt")]
    fn picks_first_supported_language(#[case] header_value: Option<&str>, #[case] expected: &str) {
        let store = I18nStore::new("pt");

        assert_eq!(negotiate(header_value, &store), expected);
    }
}
