// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

// Catálogo de mensagens exibidas ao usuário. As mensagens são estáticas e não
// revelam detalhes internos; o diagnóstico fica no log.
const PT: &[(&str, &str)] = &[
    ("validation_failed", "Um ou mais campos são inválidos."),
    ("operation_failed", "Não foi possível concluir a operação. Tente novamente."),
    ("not_found.bank", "Banco não encontrado."),
    ("not_found.client", "Cliente não encontrado."),
    ("not_found.supplier", "Fornecedor não encontrado."),
    ("not_found.account", "Conta não encontrada."),
    ("not_found.settlement", "Baixa não encontrada."),
    ("not_found.ledger_entry", "Lançamento não encontrado."),
    ("not_found.user", "Usuário não encontrado."),
    ("email_taken", "Este e-mail já está em uso."),
    ("invalid_credentials", "E-mail ou senha inválidos."),
    ("invalid_token", "Token de autenticação inválido ou ausente."),
    ("over_settlement", "O valor da baixa excede o saldo em aberto da conta."),
    ("non_positive_amount", "O valor deve ser maior que zero."),
    ("invalid_installments", "Parcelamento inválido."),
    ("bank_required", "Informe o banco da baixa."),
    ("bank_inactive", "O banco informado está inativo."),
    ("party_mismatch", "Contas a receber usam clientes e contas a pagar usam fornecedores."),
    ("invalid_tax_id", "CPF/CNPJ inválido."),
    ("invalid_period", "A data inicial deve ser anterior ou igual à data final."),
    ("amount_below_settled", "O valor não pode ser menor que o total já baixado."),
    ("account_has_settlements", "A conta possui baixas. Estorne-as antes de excluir."),
    ("still_referenced", "O registro está em uso e não pode ser excluído. Considere inativá-lo."),
    ("report_failed", "Não foi possível gerar o relatório."),
    ("invalid_topic", "Tópico de eventos desconhecido."),
];

const EN: &[(&str, &str)] = &[
    ("validation_failed", "One or more fields are invalid."),
    ("operation_failed", "The operation could not be completed. Please try again."),
    ("not_found.bank", "Bank not found."),
    ("not_found.client", "Client not found."),
    ("not_found.supplier", "Supplier not found."),
    ("not_found.account", "Account not found."),
    ("not_found.settlement", "Settlement not found."),
    ("not_found.ledger_entry", "Ledger entry not found."),
    ("not_found.user", "User not found."),
    ("email_taken", "This e-mail is already in use."),
    ("invalid_credentials", "Invalid e-mail or password."),
    ("invalid_token", "Missing or invalid authentication token."),
    ("over_settlement", "The settlement amount exceeds the account's open balance."),
    ("non_positive_amount", "The amount must be greater than zero."),
    ("invalid_installments", "Invalid installment plan."),
    ("bank_required", "A bank is required for the settlement."),
    ("bank_inactive", "The selected bank is inactive."),
    ("party_mismatch", "Receivables use clients and payables use suppliers."),
    ("invalid_tax_id", "Invalid tax id."),
    ("invalid_period", "The start date must not be after the end date."),
    ("amount_below_settled", "The amount cannot be lower than what was already settled."),
    ("account_has_settlements", "The account has settlements. Reverse them before deleting."),
    ("still_referenced", "The record is in use and cannot be deleted. Consider deactivating it."),
    ("report_failed", "The report could not be generated."),
    ("invalid_topic", "Unknown event topic."),
];

/// Mensagens traduzidas, indexadas por idioma e chave.
#[derive(Clone)]
pub struct I18nStore {
    default_locale: String,
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new(default_locale: &str) -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());

        let default_locale = if catalogs.contains_key(default_locale) {
            default_locale.to_string()
        } else {
            "pt".to_string()
        };

        Self {
            default_locale,
            catalogs: Arc::new(catalogs),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Traduz `key`; cai para o idioma padrão e, por último, para a mensagem genérica.
    pub fn translate(&self, locale: &str, key: &str) -> String {
        let lookup = |lang: &str, key: &str| {
            self.catalogs.get(lang).and_then(|c| c.get(key)).copied()
        };

        lookup(locale, key)
            .or_else(|| lookup(&self.default_locale, key))
            .or_else(|| lookup(locale, "operation_failed"))
            .or_else(|| lookup(&self.default_locale, "operation_failed"))
            .unwrap_or("operation_failed")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_keys() {
        let store = I18nStore::new("pt");
        assert_eq!(store.translate("en", "not_found.bank"), "Bank not found.");
        assert_eq!(store.translate("pt", "not_found.bank"), "Banco não encontrado.");
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let store = I18nStore::new("pt");
        assert_eq!(store.translate("de", "email_taken"), "Este e-mail já está em uso.");
    }

    #[test]
    fn unknown_key_falls_back_to_generic_message() {
        let store = I18nStore::new("en");
        assert_eq!(
            store.translate("en", "nope"),
            "The operation could not be completed. Please try again."
        );
    }

    #[test]
    fn unsupported_default_locale_becomes_portuguese() {
        let store = I18nStore::new("fr");
        assert_eq!(store.default_locale(), "pt");
    }

    #[test]
    fn catalogs_have_the_same_keys() {
        let pt: Vec<&str> = PT.iter().map(|(k, _)| *k).collect();
        let en: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        assert_eq!(pt, en);
    }
}
