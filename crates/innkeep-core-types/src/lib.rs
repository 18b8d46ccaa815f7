//! Core types shared across Innkeep facilities
//!
//! Used by both the error facility and the logging facility:
//!
//! - **Correlation types**: RequestId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
