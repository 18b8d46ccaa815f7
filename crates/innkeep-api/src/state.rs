use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use innkeep_core::errors::{ExError, ExErrorKind};
use innkeep_core::HotelSettings;
use rusqlite::Connection;

use crate::error::ApiResult;
use crate::request_id::current_request_id;

/// Shared handler state: one SQLite connection, serialised by a mutex.
///
/// Commands are synchronous and run on the blocking pool, one at a time.
/// A single writer keeps every multi-row command inside one SQL
/// transaction without cross-connection locking.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub settings: Arc<HotelSettings>,
}

impl AppState {
    pub fn new(conn: Connection, settings: HotelSettings) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            settings: Arc::new(settings),
        }
    }

    /// Run one engine command against the connection off the async
    /// workers; failures are tagged with the current request id.
    ///
    /// A command that panicked leaves its SQL transaction rolled back, so
    /// a poisoned lock still guards a usable connection.
    pub async fn with_conn<T, F>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&mut Connection) -> innkeep_engine::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let request_id = current_request_id();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "engine command aborted");
            ExError::new(ExErrorKind::Internal).with_message("engine command aborted")
        });

        let tag = |err: ExError| match &request_id {
            Some(id) => err.with_request_id(id.clone()),
            None => err,
        };
        match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) | Err(err) => Err(tag(err).into()),
        }
    }
}

/// Business date for commands that were not given one
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
