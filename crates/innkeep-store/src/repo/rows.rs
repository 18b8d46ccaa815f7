//! Column conversion and query helpers shared by the repo files

use std::str::FromStr;

use chrono::{DateTime, Utc};
use innkeep_core::errors::InnkeepError;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Params, Row};

use crate::errors::{from_rusqlite, Result};

/// Unix seconds back to an instant
pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

pub(crate) fn opt_ts(secs: Option<i64>) -> Option<DateTime<Utc>> {
    secs.map(ts)
}

/// Parse a `string_enum!` column, surfacing bad text as a conversion failure
pub(crate) fn enum_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = InnkeepError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: InnkeepError| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn opt_enum_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr<Err = InnkeepError>,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        text.parse().map_err(|e: InnkeepError| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })
    })
    .transpose()
}

/// Quoted, comma-separated status texts for an `IN (...)` clause
///
/// Only ever fed `as_str()` values of our own enums.
pub(crate) fn text_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn query_all<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, f)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

pub(crate) fn query_opt<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> Result<Option<T>>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    conn.query_row(sql, params, f)
        .optional()
        .map_err(from_rusqlite)
}

pub(crate) fn count<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<i64> {
    conn.query_row(sql, params, |row| row.get(0))
        .map_err(from_rusqlite)
}

/// Run a write that must touch exactly one row
pub(crate) fn execute_one<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    entity: &'static str,
    id: &str,
) -> Result<()> {
    let changed = conn.execute(sql, params).map_err(from_rusqlite)?;
    if changed == 0 {
        return Err(crate::errors::not_found(entity, id));
    }
    Ok(())
}
