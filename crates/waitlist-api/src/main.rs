//! Waitlist API - entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use resend_client::ResendClient;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use waitlist_api::api::{create_router_with_cors, AppState};
use waitlist_api::config::Config;
use waitlist_api::notify::Notifier;
use waitlist_api::store::{PgStore, SignupStore};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Waitlist API");

    // The record store must be reachable before we accept traffic.
    let database_url = match config.database_url() {
        Ok(url) => url.to_string(),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let store = match PgStore::connect(&database_url, config.database.max_connections).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize the record store: {e}");
            std::process::exit(1);
        }
    };
    info!("Connected to Postgres, migrations applied");

    // Welcome emails degrade to skip-only when no credential is configured.
    let mailer = match &config.email.resend_api_key {
        Some(key) => match ResendClient::new(key.clone()) {
            Ok(c) => Some(c),
            Err(e) => {
                error!("Failed to create Resend client: {e}");
                std::process::exit(1);
            }
        },
        None => {
            info!("No Resend API key configured, welcome emails disabled");
            None
        }
    };

    let store: Arc<dyn SignupStore> = Arc::new(store);
    let notifier = Notifier::new(
        mailer,
        config.email.from.clone(),
        config.email.daily_cap,
        store.clone(),
    );

    if config.admin.export_key.is_none() {
        info!("No export key configured, admin export disabled");
    }

    let state = AppState::new(store, notifier, config.admin.export_key.clone());
    let app = create_router_with_cors(state, config.cors.layer());

    let addr = match config.server.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    info!("Listening on {addr}");

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {addr}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
