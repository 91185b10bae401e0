//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod finance;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::common::events::log_events;
use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logger: RUST_LOG quando definido, senão o padrão abaixo
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contas=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    // Se a configuração ou o banco falharem, a aplicação não deve iniciar
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Assinante que só registra os eventos no log
    tokio::spawn(log_events(app_state.event_bus.subscribe(&[])));

    let app = router(app_state);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Falha ao escutar em {}", config.bind_address()))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let bank_routes = Router::new()
        .route(
            "/",
            post(handlers::banks::create_bank).get(handlers::banks::list_banks),
        )
        .route(
            "/{id}",
            get(handlers::banks::get_bank)
                .put(handlers::banks::update_bank)
                .delete(handlers::banks::delete_bank),
        )
        .route("/{id}/statement", get(handlers::banks::get_statement));

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::parties::create_client).get(handlers::parties::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::parties::get_client)
                .put(handlers::parties::update_client)
                .delete(handlers::parties::delete_client),
        );

    let supplier_routes = Router::new()
        .route(
            "/",
            post(handlers::parties::create_supplier).get(handlers::parties::list_suppliers),
        )
        .route(
            "/{id}",
            get(handlers::parties::get_supplier)
                .put(handlers::parties::update_supplier)
                .delete(handlers::parties::delete_supplier),
        );

    let account_routes = Router::new()
        .route(
            "/",
            post(handlers::accounts::create_account).get(handlers::accounts::list_accounts),
        )
        .route(
            "/preview-installments",
            post(handlers::accounts::preview_installments),
        )
        .route("/group/{group_id}", get(handlers::accounts::list_group))
        .route(
            "/{id}",
            get(handlers::accounts::get_account)
                .put(handlers::accounts::update_account)
                .delete(handlers::accounts::delete_account),
        )
        .route(
            "/{id}/settlements",
            post(handlers::accounts::settle_account).get(handlers::accounts::list_settlements),
        );

    let ledger_routes = Router::new()
        .route(
            "/",
            post(handlers::ledger::create_entry).get(handlers::ledger::list_entries),
        )
        .route("/{id}", delete(handlers::ledger::delete_entry));

    let report_routes = Router::new()
        .route("/statement/{bank_id}", get(handlers::reports::statement_report))
        .route("/accounts", get(handlers::reports::accounts_report));

    // Tudo que exige token fica atrás do auth_guard
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/banks", bank_routes)
        .nest("/clients", client_routes)
        .nest("/suppliers", supplier_routes)
        .nest("/accounts", account_routes)
        .route("/settlements/{id}", delete(handlers::accounts::reverse_settlement))
        .nest("/ledger", ledger_routes)
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .nest("/reports", report_routes)
        .route("/events", get(handlers::events::stream_events))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", auth_routes)
        .merge(protected);

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}
