//! Innkeep Engine - Command orchestration
//!
//! Every public command follows the same shape: load what it needs through
//! `SqliteRepo`, let `innkeep-core` validate and compute, then persist inside
//! one SQL transaction. Commands own boundary logging; the layers below only
//! emit `debug` events.

/// Wrap a command body with start/end/error boundary events.
///
/// The body is a block returning `Result<T>`; `?` inside it converts domain
/// errors into `ExError`. Errors leave tagged with the command name.
macro_rules! logged {
    ($op:literal, $body:block) => {{
        innkeep_core::log_op_start!($op);
        let start = std::time::Instant::now();
        let result = (|| -> $crate::Result<_> { $body })();
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                innkeep_core::log_op_end!($op, duration_ms = duration_ms);
            }
            Err(e) => {
                innkeep_core::log_op_error!($op, e.clone(), duration_ms = duration_ms);
            }
        }
        result.map_err(|e| if e.op().is_some() { e } else { e.with_op($op) })
    }};
    ($op:literal, $($field:ident = $value:expr),+ ; $body:block) => {{
        innkeep_core::log_op_start!($op, $($field = $value),+);
        let start = std::time::Instant::now();
        let result = (|| -> $crate::Result<_> { $body })();
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => {
                innkeep_core::log_op_end!($op, duration_ms = duration_ms);
            }
            Err(e) => {
                innkeep_core::log_op_error!(
                    $op,
                    e.clone(),
                    duration_ms = duration_ms,
                    $($field = $value),+
                );
            }
        }
        result.map_err(|e| if e.op().is_some() { e } else { e.with_op($op) })
    }};
}

pub mod commands;

pub use innkeep_store::Result;
