//! pozos-api: student records service.
//!
//! This is the application entry point. It loads configuration from the
//! environment, initializes tracing, opens the student store, ensures the
//! schema exists, builds the Axum router and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pozos_api::config::{AppConfig, LogFormat, LoggingConfig};
use pozos_api::{create_router, db, http, AppState};

/// Student records API with basic auth and health probes
#[derive(Parser, Debug)]
#[command(name = "pozos-api", version, about)]
struct Args {
    /// Log level filter (e.g., "pozos_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Listen port, overriding PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| LoggingConfig::default_filter(config.debug).to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        version = %config.version,
        debug = config.debug,
        host = %config.http.host,
        port = config.http.port,
        "Loaded configuration"
    );

    if config.credentials.uses_defaults() {
        tracing::warn!(
            "API_USERNAME/API_PASSWORD are using development defaults; override them in any real deployment"
        );
    }

    let store = db::connect(&config)?;

    // Schema creation failure is logged, not fatal: the health endpoint
    // reports the database state once the server is up.
    match store.init_schema().await {
        Ok(()) => tracing::info!("Database tables created successfully"),
        Err(e) => tracing::error!(error = %e, "Error initializing database"),
    }

    let http_config = config.http.clone();
    let state = AppState::new(config, store);
    let app = create_router(state);

    http::start_server(app, &http_config).await?;

    Ok(())
}
