use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use todo_api::config::{self, StoreBackend};
use todo_api::database::{DatabaseManager, MemoryTodoStore, PgTodoStore};
use todo_api::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    let state = match config.database.store {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to the todo database")?;
            AppState::new(PgTodoStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory todo store; records are lost on exit");
            AppState::new(MemoryTodoStore::new())
        }
    };

    let mut router = server::router(state);
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    let service = server::normalize_paths(router);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server running on port {}", config.api.port);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
        .await
        .context("server")?;
    Ok(())
}
