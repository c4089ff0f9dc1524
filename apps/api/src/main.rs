use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderName;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_builder::auth::TrustedHeaderAuthenticator;
use resume_builder::config::{Config, StorageBackend};
use resume_builder::db::create_pool;
use resume_builder::resumes::store::{MemoryResumeStore, PgResumeStore, ResumeStore};
use resume_builder::routes::build_router;
use resume_builder::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ResumeStore> = match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            Arc::new(PgResumeStore::new(create_pool(url).await?))
        }
        StorageBackend::Memory => {
            info!("Using in-memory resume store; data is lost on restart");
            Arc::new(MemoryResumeStore::new())
        }
    };

    let auth_header = HeaderName::from_bytes(config.auth_user_header.as_bytes())
        .context("AUTH_USER_HEADER is not a valid header name")?;
    info!(
        "Trusting identity header '{}', ownership policy {:?}",
        auth_header, config.ownership_policy
    );

    let state = AppState {
        store,
        authenticator: Arc::new(TrustedHeaderAuthenticator::new(auth_header)),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's deployment origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
