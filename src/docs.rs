// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::finance;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Contas API", description = "Bancos, clientes, fornecedores, contas a pagar/receber e extratos"),
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Banks ---
        handlers::banks::create_bank,
        handlers::banks::list_banks,
        handlers::banks::get_bank,
        handlers::banks::update_bank,
        handlers::banks::delete_bank,
        handlers::banks::get_statement,

        // --- Clients ---
        handlers::parties::create_client,
        handlers::parties::list_clients,
        handlers::parties::get_client,
        handlers::parties::update_client,
        handlers::parties::delete_client,

        // --- Suppliers ---
        handlers::parties::create_supplier,
        handlers::parties::list_suppliers,
        handlers::parties::get_supplier,
        handlers::parties::update_supplier,
        handlers::parties::delete_supplier,

        // --- Accounts ---
        handlers::accounts::create_account,
        handlers::accounts::preview_installments,
        handlers::accounts::list_accounts,
        handlers::accounts::get_account,
        handlers::accounts::list_group,
        handlers::accounts::update_account,
        handlers::accounts::delete_account,

        // --- Settlements ---
        handlers::accounts::settle_account,
        handlers::accounts::list_settlements,
        handlers::accounts::reverse_settlement,

        // --- Ledger ---
        handlers::ledger::create_entry,
        handlers::ledger::list_entries,
        handlers::ledger::delete_entry,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Reports ---
        handlers::reports::statement_report,
        handlers::reports::accounts_report,

        // --- Events ---
        handlers::events::stream_events,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Banks ---
            models::bank::BankKind,
            models::bank::Bank,
            models::bank::CreateBankPayload,
            models::bank::UpdateBankPayload,

            // --- Parties ---
            models::party::Party,
            models::party::PartyPayload,

            // --- Accounts ---
            models::account::AccountDirection,
            models::account::Account,
            models::account::CreateAccountPayload,
            models::account::PreviewInstallmentsPayload,
            models::account::InstallmentPreview,
            models::account::UpdateAccountPayload,
            finance::AccountStatus,
            finance::Installment,

            // --- Settlements ---
            models::settlement::Settlement,
            models::settlement::CreateSettlementPayload,
            models::settlement::SettlementReceipt,

            // --- Ledger ---
            models::ledger::LedgerDirection,
            models::ledger::LedgerEntry,
            models::ledger::CreateLedgerEntryPayload,

            // --- Statements ---
            models::statement::Statement,
            models::statement::ReportFormat,
            finance::Flow,
            finance::MovementSource,
            finance::StatementLine,
            finance::Reconciliation,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Settings ---
            models::settings::CompanySettings,
            models::settings::UpdateSettingsRequest,

            // --- Events ---
            common::events::Topic,
            common::events::EventAction,
            common::events::AppEvent,
        )
    ),
    tags(
        (name = "Health", description = "Disponibilidade do serviço"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Banks", description = "Bancos, caixas e extratos"),
        (name = "Clients", description = "Cadastro de clientes"),
        (name = "Suppliers", description = "Cadastro de fornecedores"),
        (name = "Accounts", description = "Contas a pagar e a receber (parcelas)"),
        (name = "Settlements", description = "Baixas e estornos"),
        (name = "Ledger", description = "Lançamentos manuais"),
        (name = "Dashboard", description = "Indicadores financeiros"),
        (name = "Settings", description = "Dados da empresa"),
        (name = "Reports", description = "Relatórios para impressão"),
        (name = "Events", description = "Notificações em tempo real (SSE)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_the_main_routes() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/accounts",
            "/api/accounts/{id}/settlements",
            "/api/settlements/{id}",
            "/api/banks/{id}/statement",
            "/api/reports/statement/{bank_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {}", path);
        }
    }
}
