//! Field-level validation shared by every model

use chrono::NaiveDate;
use std::fmt::Display;

use crate::errors::{InnkeepError, Result};

/// Require a non-blank string
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InnkeepError::invalid(
            field,
            "cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Optional text, when present, must not be blank
pub fn optional_text(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) => require_text(field, v),
        None => Ok(()),
    }
}

/// Loose email shape check: something@something.something
pub fn validate_email(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(InnkeepError::invalid(
            field,
            format!("'{}' is not an email address", value),
        ));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(InnkeepError::invalid(field, "must not be negative"));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(InnkeepError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

/// Inclusive date range: `end` may equal `start`
pub fn require_date_order(field: &str, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(InnkeepError::invalid(
            field,
            format!("end {} is before start {}", end, start),
        ));
    }
    Ok(())
}

/// Fail unless `current` is one of `allowed`
pub fn require_status<S>(
    entity: &'static str,
    id: &str,
    current: S,
    allowed: &[S],
    action: &'static str,
) -> Result<()>
where
    S: PartialEq + Display + Copy,
{
    if allowed.contains(&current) {
        return Ok(());
    }
    Err(InnkeepError::InvalidTransition {
        entity,
        id: id.to_string(),
        status: current.to_string(),
        action,
    })
}
