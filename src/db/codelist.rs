//! Domain-enumeration lookups: which named schema a codelist value belongs to.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

/// Schema tag of a codelist value, `None` when the id does not exist.
pub fn schema_of(conn: &Connection, id: i64) -> AppResult<Option<String>> {
    let schema = conn
        .query_row("SELECT schema FROM codelists WHERE id = ?1", [id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(schema)
}

/// Fails unless `id` is a value of `expected`.
pub fn ensure_schema(conn: &Connection, id: i64, expected: &str) -> AppResult<()> {
    match schema_of(conn, id)? {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(AppError::DomainMismatch {
            value: id,
            expected: expected.to_string(),
            found,
        }),
        None => Err(AppError::NotFound(format!("codelist value {id}"))),
    }
}

pub fn id_by_code(conn: &Connection, schema: &str, code: &str) -> AppResult<i64> {
    conn.query_row(
        "SELECT id FROM codelists WHERE schema = ?1 AND code = ?2",
        [schema, code],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("code '{code}' in schema '{schema}'")))
}

pub fn code_of(conn: &Connection, id: i64) -> AppResult<Option<String>> {
    let code = conn
        .query_row("SELECT code FROM codelists WHERE id = ?1", [id], |r| r.get(0))
        .optional()?;
    Ok(code)
}
