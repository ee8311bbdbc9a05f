//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use chrono::{DateTime, Utc};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Concurrency / access
    // ---------------------------
    #[error("Record locked by user {holder} since {acquired_at}")]
    Locked {
        holder: i64,
        acquired_at: DateTime<Utc>,
    },

    #[error("Not authorized: {0}")]
    Authorization(String),

    // ---------------------------
    // Workflow / interval logic
    // ---------------------------
    #[error("Wrong workflow: {0}")]
    WrongWorkflow(String),

    #[error("Action not applicable: {0}")]
    ActionWrong(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Unknown attribute: {0}")]
    PatchAttribute(String),

    #[error("Value {value} belongs to schema '{found}', expected '{expected}'")]
    DomainMismatch {
        value: i64,
        expected: String,
        found: String,
    },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
