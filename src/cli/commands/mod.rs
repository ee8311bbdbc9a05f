pub mod access;
pub mod borehole;
pub mod config;
pub mod db;
pub mod init;
pub mod layer;
pub mod lock;
pub mod log;
pub mod profile;
pub mod validate;
pub mod workflow;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::context::EditContext;
use crate::db::pool::DbPool;
use crate::db::queries::load_user_by_name;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;

/// Open the database and resolve the acting user from `--user`.
pub(crate) fn open_session(cli: &Cli, cfg: &Config) -> AppResult<(DbPool, EditContext)> {
    let username = cli
        .user
        .as_deref()
        .ok_or_else(|| AppError::Authorization("missing --user".into()))?;

    let pool = DbPool::new(&cfg.database)?;
    let user = load_user_by_name(&pool.conn, username)?;

    let ctx = EditContext::new(user, cfg)?;

    Ok((pool, ctx))
}

/// A handler received a command that `dispatch` should have sent elsewhere.
pub(crate) fn misrouted(handler: &str) -> AppError {
    AppError::Other(format!("command dispatched to the {handler} handler by mistake"))
}

pub(crate) fn parse_role(code: &str) -> AppResult<Role> {
    Role::from_code(code).ok_or_else(|| AppError::InvalidRole(code.to_string()))
}

/// Comma-separated role list; empty input is an empty list.
pub(crate) fn parse_roles(list: &str) -> AppResult<Vec<Role>> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_role)
        .collect()
}
