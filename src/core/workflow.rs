//! Role-stage approval workflow.
//!
//! The log is append-only: a transition closes the last entry and may open a
//! new one. Transitions are planned over the loaded log first (`plan_*`), then
//! written in the same transaction that checked the lock.

use crate::core::context::EditContext;
use crate::core::lock::LockManager;
use crate::core::permission::PermissionFilter;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    finish_workflow, insert_workflow, load_borehole, load_workflow, load_workflow_log,
    set_lock, set_published,
};
use crate::errors::{AppError, AppResult};
use crate::models::borehole::Borehole;
use crate::models::role::Role;
use crate::models::workflow::{WorkflowEntry, WorkflowLog};
use rusqlite::Connection;

/// Writes produced by one workflow transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Entry to close, when still open.
    pub close: Option<i64>,
    /// Role of the entry to open afterwards.
    pub open: Option<Role>,
    /// New value of the borehole's published flag.
    pub published: Option<bool>,
}

fn last_entry<'a>(log: &'a WorkflowLog, entry_id: i64) -> AppResult<&'a WorkflowEntry> {
    match log.last() {
        Some(last) if last.id == entry_id => Ok(last),
        Some(last) => Err(AppError::WrongWorkflow(format!(
            "entry {entry_id} is not the last workflow entry (last is {})",
            last.id
        ))),
        None => Err(AppError::WrongWorkflow("empty workflow".into())),
    }
}

pub fn plan_submit(log: &WorkflowLog, entry_id: i64) -> AppResult<Transition> {
    let entry = last_entry(log, entry_id)?;
    if !entry.is_open() {
        return Err(AppError::WrongWorkflow(format!(
            "entry {entry_id} ({}) is already finished",
            entry.role
        )));
    }

    Ok(match entry.role.next() {
        Some(next) => Transition {
            close: Some(entry.id),
            open: Some(next),
            published: None,
        },
        None => Transition {
            close: Some(entry.id),
            open: None,
            published: Some(true),
        },
    })
}

pub fn plan_reject(log: &WorkflowLog, entry_id: i64) -> AppResult<Transition> {
    let entry = last_entry(log, entry_id)?;

    // A finished PUBLIC entry is the published state; rejecting it unpublishes.
    if !entry.is_open() && entry.role != Role::Public {
        return Err(AppError::WrongWorkflow(format!(
            "entry {entry_id} ({}) is already finished",
            entry.role
        )));
    }

    Ok(Transition {
        close: entry.is_open().then_some(entry.id),
        open: entry.role.previous(),
        published: (entry.role == Role::Public).then_some(false),
    })
}

pub fn plan_reset(log: &WorkflowLog, entry_id: i64, role: Role) -> AppResult<Transition> {
    let entry = last_entry(log, entry_id)?;

    Ok(Transition {
        close: entry.is_open().then_some(entry.id),
        open: Some(role),
        published: Some(false),
    })
}

pub struct WorkflowEngine;

impl WorkflowEngine {
    /// Append the first entry of a borehole's log.
    pub fn start(
        pool: &mut DbPool,
        borehole_id: i64,
        ctx: &EditContext,
        role: Role,
        already_finished: bool,
    ) -> AppResult<i64> {
        pool.transaction(|tx| Self::start_in(tx, borehole_id, ctx, role, already_finished))
    }

    pub(crate) fn start_in(
        conn: &Connection,
        borehole_id: i64,
        ctx: &EditContext,
        role: Role,
        already_finished: bool,
    ) -> AppResult<i64> {
        let borehole = load_borehole(conn, borehole_id)?;
        if ctx.user.membership(borehole.group_id).is_none() && !ctx.user.admin {
            return Err(AppError::Authorization(format!(
                "user '{}' is not a member of the workgroup of borehole {}",
                ctx.user.username, borehole_id
            )));
        }

        if !load_workflow_log(conn, borehole_id)?.is_empty() {
            return Err(AppError::WrongWorkflow(format!(
                "borehole {borehole_id} already has a workflow"
            )));
        }

        let finished_at = already_finished.then_some(ctx.now);
        let id = insert_workflow(conn, borehole_id, role, ctx.user.id, finished_at)?;

        if already_finished && role == Role::Public {
            set_published(conn, borehole_id, true)?;
        }

        ttlog(
            conn,
            "workflow_start",
            &format!("borehole {borehole_id}"),
            &format!("Workflow started at {role}"),
        )?;

        Ok(id)
    }

    pub fn submit(pool: &mut DbPool, entry_id: i64, ctx: &EditContext) -> AppResult<WorkflowLog> {
        Self::transition(pool, entry_id, ctx, "submit", |borehole, log, entry| {
            let step = plan_submit(log, entry_id)?;
            PermissionFilter::new(&ctx.user).require_edit(borehole, entry.role)?;
            Ok(step)
        })
    }

    /// Always ends the editing session: the lock is released.
    pub fn reject(pool: &mut DbPool, entry_id: i64, ctx: &EditContext) -> AppResult<WorkflowLog> {
        Self::transition(pool, entry_id, ctx, "reject", |borehole, log, entry| {
            let step = plan_reject(log, entry_id)?;
            PermissionFilter::new(&ctx.user).require_edit(borehole, entry.role)?;
            Ok(step)
        })
    }

    /// Administrative override: open `role` directly, no ±1 stepping.
    pub fn reset(
        pool: &mut DbPool,
        entry_id: i64,
        role: Role,
        ctx: &EditContext,
    ) -> AppResult<WorkflowLog> {
        if !ctx.user.admin {
            return Err(AppError::Authorization(format!(
                "workflow reset requires an admin, '{}' is not",
                ctx.user.username
            )));
        }
        Self::transition(pool, entry_id, ctx, "reset", |_, log, _| {
            plan_reset(log, entry_id, role)
        })
    }

    pub fn history(pool: &mut DbPool, borehole_id: i64, ctx: &EditContext) -> AppResult<WorkflowLog> {
        let borehole = load_borehole(&pool.conn, borehole_id)?;
        PermissionFilter::new(&ctx.user).require_view(&borehole)?;
        load_workflow_log(&pool.conn, borehole_id)
    }

    fn transition<F>(
        pool: &mut DbPool,
        entry_id: i64,
        ctx: &EditContext,
        operation: &str,
        plan: F,
    ) -> AppResult<WorkflowLog>
    where
        F: FnOnce(&Borehole, &WorkflowLog, &WorkflowEntry) -> AppResult<Transition>,
    {
        pool.transaction(|tx| {
            let entry = load_workflow(tx, entry_id)?;
            let borehole = load_borehole(tx, entry.borehole_id)?;
            let log = load_workflow_log(tx, borehole.id)?;

            LockManager::check(&borehole, ctx)?;
            let step = plan(&borehole, &log, &entry)?;

            if let Some(id) = step.close {
                finish_workflow(tx, id, ctx.user.id, ctx.now)?;
            }
            if let Some(role) = step.open {
                insert_workflow(tx, borehole.id, role, ctx.user.id, None)?;
            }
            if let Some(flag) = step.published {
                set_published(tx, borehole.id, flag)?;
            }

            // A stage change ends the editing session.
            set_lock(tx, borehole.id, None)?;

            let message = match step.open {
                Some(role) => format!("{} → {}", entry.role, role),
                None => format!("{} closed", entry.role),
            };
            ttlog(tx, operation, &format!("borehole {}", borehole.id), &message)?;

            load_workflow_log(tx, borehole.id)
        })
    }
}
