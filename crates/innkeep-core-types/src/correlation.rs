//! Correlation types for request tracking
//!
//! A `RequestId` is minted per HTTP request (or honoured from the
//! `x-request-id` header) and threaded into spans and error bodies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an id received from a caller.
    ///
    /// Blank or oversized values are replaced by a fresh id so that log
    /// lines never carry attacker-sized payloads.
    pub fn from_header(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > 128 {
            Self::new()
        } else {
            Self(trimmed.to_string())
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_from_header_keeps_caller_value() {
        let id = RequestId::from_header("  abc-123 ");
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn test_from_header_replaces_blank_and_oversized() {
        assert!(!RequestId::from_header("   ").as_str().is_empty());
        let long = "x".repeat(200);
        assert_ne!(RequestId::from_header(&long).as_str(), long);
    }

    #[test]
    fn test_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
