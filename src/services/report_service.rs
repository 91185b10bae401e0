// src/services/report_service.rs

use chrono::NaiveDate;
use genpdf::{elements, style, Alignment, Element};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    finance::{round_money, AccountStatus, Flow, StatementLine},
    models::{
        account::{Account, AccountDirection, AccountFilter},
        settings::CompanySettings,
        statement::{ReportFormat, Statement, StatementReportQuery},
    },
    services::{account_service::AccountService, statement_service::StatementService},
};

const DEFAULT_TITLE: &str = "Contas";

/// Relatório pronto para devolver ao cliente.
pub enum RenderedReport {
    Html(String),
    Pdf { bytes: Vec<u8>, filename: String },
}

/// Relatórios para impressão: HTML (impressão pelo navegador) e extrato em PDF.
#[derive(Clone)]
pub struct ReportService {
    statement_service: StatementService,
    account_service: AccountService,
    settings_repo: SettingsRepository,
    fonts_dir: String,
}

impl ReportService {
    pub fn new(
        statement_service: StatementService,
        account_service: AccountService,
        settings_repo: SettingsRepository,
        fonts_dir: String,
    ) -> Self {
        Self {
            statement_service,
            account_service,
            settings_repo,
            fonts_dir,
        }
    }

    pub async fn statement_report<'e, E>(
        &self,
        executor: E,
        bank_id: Uuid,
        query: &StatementReportQuery,
        today: NaiveDate,
    ) -> Result<RenderedReport, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let statement = self
            .statement_service
            .bank_statement(&mut *conn, bank_id, &query.period(), today)
            .await?;
        let settings = self.settings_repo.get_settings(&mut *conn).await?;

        match query.format {
            ReportFormat::Html => Ok(RenderedReport::Html(render_statement_html(&statement, &settings))),
            ReportFormat::Pdf => {
                let bytes = self.render_statement_pdf(&statement, &settings)?;
                let filename = format!("extrato-{}-{}.pdf", statement.from, statement.to);
                Ok(RenderedReport::Pdf { bytes, filename })
            }
        }
    }

    pub async fn accounts_report<'e, E>(
        &self,
        executor: E,
        filter: &AccountFilter,
        today: NaiveDate,
    ) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let accounts = self.account_service.list_accounts(&mut *conn, filter, today).await?;
        let settings = self.settings_repo.get_settings(&mut *conn).await?;

        Ok(render_accounts_html(&accounts, filter, &settings, today))
    }

    fn render_statement_pdf(&self, statement: &Statement, settings: &CompanySettings) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada (FONTS_DIR)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(format!("Fonte Roboto não encontrada em {}", self.fonts_dir)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Extrato {}", statement.bank.name));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(company_title(settings))
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        if let Some(doc_num) = &settings.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("EXTRATO - {}", statement.bank.name))
                .styled(style::Style::new().bold().with_font_size(13)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Período: {} a {}",
            format_date(statement.from),
            format_date(statement.to)
        )));
        doc.push(elements::Paragraph::new(format!(
            "Saldo inicial: {}",
            format_brl(statement.reconciliation.opening_balance)
        )));
        doc.push(elements::Break::new(1));

        // --- MOVIMENTOS ---
        // Pesos: Data (2), Descrição (5), Entrada (2), Saída (2), Saldo (2)
        let mut table = elements::TableLayout::new(vec![2, 5, 2, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Data").styled(bold))
            .element(elements::Paragraph::new("Descrição").styled(bold))
            .element(elements::Paragraph::new("Entrada").styled(bold))
            .element(elements::Paragraph::new("Saída").styled(bold))
            .element(elements::Paragraph::new("Saldo").styled(bold))
            .push()
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        for line in &statement.reconciliation.lines {
            let (inflow, outflow) = split_flow(line);
            table
                .row()
                .element(elements::Paragraph::new(format_date(line.date)))
                .element(elements::Paragraph::new(line.description.clone()))
                .element(elements::Paragraph::new(inflow))
                .element(elements::Paragraph::new(outflow))
                .element(elements::Paragraph::new(format_brl(line.balance)))
                .push()
                .map_err(|e| AppError::PdfError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1.5));

        // --- TOTAIS ---
        let totals = [
            ("Total de entradas", statement.reconciliation.total_inflows),
            ("Total de saídas", statement.reconciliation.total_outflows),
            ("Saldo final", statement.reconciliation.closing_balance),
        ];
        for (label, value) in totals {
            let mut paragraph = elements::Paragraph::new(format!("{}: {}", label, format_brl(value)));
            paragraph.set_alignment(Alignment::Right);
            doc.push(paragraph.styled(style::Style::new().bold()));
        }

        doc.push(elements::Break::new(1));
        doc.push(
            elements::Paragraph::new(OPENING_NOTE).styled(style::Style::new().italic().with_font_size(8)),
        );

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        Ok(buffer)
    }
}

const OPENING_NOTE: &str =
    "Saldo inicial calculado a partir do saldo atual; pode divergir se houver movimentos após o fim do período.";

// --- HTML ---

const REPORT_STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;font-size:12px;margin:24px;color:#222}\
h1{font-size:18px;margin:0}h2{font-size:14px;margin:16px 0 4px}\
table{width:100%;border-collapse:collapse;margin-top:12px}\
th,td{border-bottom:1px solid #ccc;padding:4px 6px;text-align:left}\
td.num,th.num{text-align:right}tfoot td{font-weight:bold}\
.muted{color:#666;font-size:10px}\
@media print{body{margin:0}}";

pub fn render_statement_html(statement: &Statement, settings: &CompanySettings) -> String {
    let rec = &statement.reconciliation;
    let mut html = page_start(&format!("Extrato - {}", statement.bank.name), settings);

    html.push_str(&format!(
        "<h2>Extrato - {}</h2><p>Período: {} a {}</p>",
        escape_html(&statement.bank.name),
        format_date(statement.from),
        format_date(statement.to)
    ));

    html.push_str(
        "<table><thead><tr><th>Data</th><th>Descrição</th>\
         <th class=\"num\">Entrada</th><th class=\"num\">Saída</th><th class=\"num\">Saldo</th></tr></thead><tbody>",
    );
    html.push_str(&format!(
        "<tr><td></td><td>Saldo inicial</td><td></td><td></td><td class=\"num\">{}</td></tr>",
        format_brl(rec.opening_balance)
    ));

    for line in &rec.lines {
        let (inflow, outflow) = split_flow(line);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            format_date(line.date),
            escape_html(&line.description),
            inflow,
            outflow,
            format_brl(line.balance)
        ));
    }

    html.push_str(&format!(
        "</tbody><tfoot><tr><td></td><td>Totais</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr></tfoot></table>",
        format_brl(rec.total_inflows),
        format_brl(rec.total_outflows),
        format_brl(rec.closing_balance)
    ));

    if rec.approximate_opening {
        html.push_str(&format!("<p class=\"muted\">{}</p>", OPENING_NOTE));
    }

    html.push_str("</body></html>");
    html
}

pub fn render_accounts_html(
    accounts: &[Account],
    filter: &AccountFilter,
    settings: &CompanySettings,
    today: NaiveDate,
) -> String {
    let title = match filter.direction {
        Some(AccountDirection::Receivable) => "Contas a receber",
        Some(AccountDirection::Payable) => "Contas a pagar",
        None => "Contas a pagar e a receber",
    };

    let mut html = page_start(title, settings);
    html.push_str(&format!("<h2>{}</h2>", title));

    let mut criteria = vec![format!("Emitido em {}", format_date(today))];
    if let Some(status) = filter.status {
        criteria.push(format!("Situação: {}", status_label(status)));
    }
    if let Some(from) = filter.from {
        criteria.push(format!("Vencimento a partir de {}", format_date(from)));
    }
    if let Some(to) = filter.to {
        criteria.push(format!("Vencimento até {}", format_date(to)));
    }
    html.push_str(&format!("<p class=\"muted\">{}</p>", criteria.join(" · ")));

    html.push_str(
        "<table><thead><tr><th>Vencimento</th><th>Descrição</th><th>Contraparte</th><th>Parcela</th>\
         <th class=\"num\">Valor</th><th class=\"num\">Baixado</th><th class=\"num\">Restante</th><th>Situação</th></tr></thead><tbody>",
    );

    let mut total = Decimal::ZERO;
    let mut settled = Decimal::ZERO;
    let mut remaining = Decimal::ZERO;

    for account in accounts {
        total += account.amount;
        settled += account.amount_settled;
        remaining += account.remaining;

        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}/{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
            format_date(account.due_date),
            escape_html(&account.description),
            escape_html(account.party_name.as_deref().unwrap_or("-")),
            account.installment_index,
            account.installment_count,
            format_brl(account.amount),
            format_brl(account.amount_settled),
            format_brl(account.remaining),
            status_label(account.status)
        ));
    }

    html.push_str(&format!(
        "</tbody><tfoot><tr><td colspan=\"4\">{} conta(s)</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td></td></tr></tfoot></table>",
        accounts.len(),
        format_brl(total),
        format_brl(settled),
        format_brl(remaining)
    ));

    html.push_str("</body></html>");
    html
}

fn page_start(title: &str, settings: &CompanySettings) -> String {
    let mut html = format!(
        "<!DOCTYPE html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>",
        escape_html(title),
        REPORT_STYLE
    );

    html.push_str(&format!("<h1>{}</h1>", escape_html(&company_title(settings))));

    let details: Vec<String> = [
        settings.document_number.as_deref().map(|d| format!("CNPJ/CPF: {}", d)),
        settings.address.clone(),
        settings.phone.clone(),
        settings.email.clone(),
    ]
    .into_iter()
    .flatten()
    .map(|d| escape_html(&d))
    .collect();

    if !details.is_empty() {
        html.push_str(&format!("<p class=\"muted\">{}</p>", details.join(" · ")));
    }

    html
}

fn company_title(settings: &CompanySettings) -> String {
    settings
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn split_flow(line: &StatementLine) -> (String, String) {
    match line.flow {
        Flow::Inflow => (format_brl(line.amount), String::new()),
        Flow::Outflow => (String::new(), format_brl(line.amount)),
    }
}

fn status_label(status: AccountStatus) -> &'static str {
    match status {
        AccountStatus::Open => "Em aberto",
        AccountStatus::Paid => "Quitada",
        AccountStatus::Overdue => "Vencida",
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `R$ 1.234,56`
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_money(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{}", sign, grouped, cents)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{reconcile, Movement, MovementSource};
    use crate::models::bank::{Bank, BankKind};
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(dec!(0), "R$ 0,00")]
    #[case(dec!(5.5), "R$ 5,50")]
    #[case(dec!(999.999), "R$ 1.000,00")]
    #[case(dec!(1234.56), "R$ 1.234,56")]
    #[case(dec!(1234567.8), "R$ 1.234.567,80")]
    #[case(dec!(-20), "-R$ 20,00")]
    fn formats_brazilian_currency(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(format_brl(value), expected);
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn statement_html_escapes_user_text_and_shows_running_balance() {
        let bank = Bank {
            id: Uuid::new_v4(),
            name: "Caixa <Loja>".to_string(),
            branch: None,
            account_number: None,
            current_balance: dec!(160),
            kind: BankKind::Cash,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let ledger = vec![Movement {
            source: MovementSource::Ledger,
            source_id: Uuid::new_v4(),
            date: date(2024, 3, 1),
            description: "Aporte <b>sócio</b>".to_string(),
            flow: Flow::Inflow,
            amount: dec!(60),
        }];
        let statement = Statement {
            bank,
            from: date(2024, 3, 1),
            to: date(2024, 3, 31),
            reconciliation: reconcile(dec!(160), ledger, vec![]),
        };

        let html = render_statement_html(&statement, &CompanySettings::default());

        assert!(html.contains("Caixa &lt;Loja&gt;"));
        assert!(html.contains("Aporte &lt;b&gt;sócio&lt;/b&gt;"));
        assert!(!html.contains("<b>sócio</b>"));
        assert!(html.contains("R$ 100,00"));
        assert!(html.contains("R$ 160,00"));
        assert!(html.contains("01/03/2024"));
        assert!(html.contains("<h1>Contas</h1>"));
    }

    #[test]
    fn accounts_html_uses_company_header_and_totals() {
        let settings = CompanySettings {
            company_name: Some("Padaria & Cia".to_string()),
            ..Default::default()
        };
        let filter = AccountFilter {
            direction: Some(AccountDirection::Payable),
            ..Default::default()
        };

        let html = render_accounts_html(&[], &filter, &settings, date(2024, 3, 17));

        assert!(html.contains("<h1>Padaria &amp; Cia</h1>"));
        assert!(html.contains("Contas a pagar"));
        assert!(html.contains("0 conta(s)"));
        assert!(html.contains("Emitido em 17/03/2024"));
    }
}
