use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use espresso_api::auth::TokenVerifier;
use espresso_api::config::AppConfig;
use espresso_api::database::{DatabaseManager, PgStore};
use espresso_api::{app, AppState};

#[derive(Parser)]
#[command(name = "espresso-api")]
#[command(about = "Restaurant and review API protected by Auth0 bearer tokens")]
#[command(version)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 5000, help = "Port to listen on")]
    port: u16,

    #[arg(long, default_value = "0.0.0.0", help = "Address to bind")]
    host: String,

    #[arg(long, help = "Apply pending database migrations before serving")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up ESPRESSO_DB_*, AUTH0_DOMAIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("espresso_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting espresso API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if args.migrate {
        DatabaseManager::migrate(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Database migrations applied");
    }

    let verifier = TokenVerifier::from_config(&config.auth)
        .context("failed to initialise token verifier")?;
    tracing::info!(
        issuer = verifier.issuer(),
        audience = verifier.audience(),
        "Token verification configured"
    );

    let state = AppState::new(Arc::new(PgStore::new(pool)), verifier);
    let mut router = app(state);
    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("espresso API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
