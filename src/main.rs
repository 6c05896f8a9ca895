use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use wallet_admin_server::routes::create_router;
use wallet_admin_server::shared::clients::ChainClients;
use wallet_admin_server::shared::config::{AppConfig, StorageBackend};
use wallet_admin_server::shared::database::Database;
use wallet_admin_server::shared::services::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // 로깅 초기화 (RUST_LOG, 기본값 info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // DB 연결
    let db = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the postgres backend")?;
            Database::connect(db_url, config.db_max_connections).await?
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Database::in_memory()
        }
    };
    db.initialize().await?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(db, ChainClients::placeholder(), &config);

    // CORS 설정
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %config.bind_addr,
        serialize_wallet_mutations = config.serialize_wallet_mutations,
        "Server running, OpenAPI document at /api-docs/openapi.json"
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
