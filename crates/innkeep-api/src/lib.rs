//! Innkeep API - HTTP surface of the property-management backend
//!
//! Routes live under `/api/v1` and map one-to-one onto engine commands.
//! Every response carries an `x-request-id` header; failures share one
//! JSON error shape (see [`error`]).

pub mod config;
pub mod error;
pub mod request_id;
pub mod routes;
pub mod state;

use axum::Router;
use innkeep_core::errors::ExError;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::request_id::propagate_request_id;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Store(#[from] ExError),
    #[error("failed to bind {bind}: {source}")]
    Bind {
        bind: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build the application router over `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .merge(routes::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(propagate_request_id))
        .with_state(state)
}

/// Open the database and serve until ctrl-c
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated, or the bind
/// address is unavailable.
pub async fn serve(config: AppConfig) -> Result<(), ServeError> {
    let conn = innkeep_store::db::open_and_migrate(&config.database.path)?;
    info!(path = %config.database.path.display(), "database ready");
    let state = AppState::new(conn, config.payroll.clone());

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .map_err(|source| ServeError::Bind {
            bind: config.server.bind.clone(),
            source,
        })?;
    info!(bind = %config.server.bind, "innkeep listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("innkeep stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
