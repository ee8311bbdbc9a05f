//! Cooperative per-borehole edit lock with a fixed expiry.
//!
//! The lock is a pair of columns on the borehole row, not a store lock: it only
//! excludes clients that call `check` before mutating. An expired lock is the
//! same as no lock, and any successful mutating call refreshes it for the
//! caller.

use crate::core::context::EditContext;
use crate::core::permission::PermissionFilter;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{load_borehole, load_workflow_log, set_lock, start_workflow_clock};
use crate::errors::{AppError, AppResult};
use crate::models::borehole::{Borehole, Lock};
use crate::models::role::Role;
use rusqlite::Connection;

pub struct LockManager;

impl LockManager {
    /// Fails with `Locked` while another user's lock is younger than the timeout.
    pub fn check(borehole: &Borehole, ctx: &EditContext) -> AppResult<()> {
        match borehole.lock {
            Some(lock)
                if lock.holder != ctx.user.id && !lock.is_expired(ctx.now, ctx.lock_timeout) =>
            {
                Err(AppError::Locked {
                    holder: lock.holder,
                    acquired_at: lock.acquired_at,
                })
            }
            _ => Ok(()),
        }
    }

    /// Active workflow role of a borehole; a borehole without a log cannot be edited.
    pub(crate) fn active_role(conn: &Connection, borehole: &Borehole) -> AppResult<Role> {
        load_workflow_log(conn, borehole.id)?
            .current_role()
            .ok_or_else(|| {
                AppError::WrongWorkflow(format!("borehole {} has no workflow", borehole.id))
            })
    }

    /// Permission + lock check + refresh, for use inside an open transaction.
    ///
    /// Returns the borehole as loaded before the refresh.
    pub(crate) fn guard(conn: &Connection, borehole_id: i64, ctx: &EditContext) -> AppResult<Borehole> {
        let borehole = load_borehole(conn, borehole_id)?;
        let role = Self::active_role(conn, &borehole)?;

        PermissionFilter::new(&ctx.user).require_edit(&borehole, role)?;
        Self::check(&borehole, ctx)?;

        set_lock(
            conn,
            borehole.id,
            Some(Lock {
                holder: ctx.user.id,
                acquired_at: ctx.now,
            }),
        )?;

        Ok(borehole)
    }

    pub fn acquire(pool: &mut DbPool, borehole_id: i64, ctx: &EditContext) -> AppResult<Lock> {
        pool.transaction(|tx| {
            Self::guard(tx, borehole_id, ctx)?;

            // First touch of a stage starts its clock.
            let log = load_workflow_log(tx, borehole_id)?;
            if let Some(open) = log.open_entry()
                && open.started_at.is_none()
            {
                start_workflow_clock(tx, open.id, ctx.now)?;
            }

            ttlog(
                tx,
                "lock",
                &format!("borehole {borehole_id}"),
                &format!("Locked by {}", ctx.user.username),
            )?;

            Ok(Lock {
                holder: ctx.user.id,
                acquired_at: ctx.now,
            })
        })
    }

    /// Clear the lock.
    ///
    /// A live lock of another user is reported as `Locked`, unless the caller
    /// is an admin (force unlock).
    pub fn release(pool: &mut DbPool, borehole_id: i64, ctx: &EditContext) -> AppResult<()> {
        pool.transaction(|tx| {
            let borehole = load_borehole(tx, borehole_id)?;

            if !ctx.user.admin {
                PermissionFilter::new(&ctx.user).require_view(&borehole)?;
                Self::check(&borehole, ctx)?;
            }

            set_lock(tx, borehole_id, None)?;

            let forced = borehole
                .lock
                .is_some_and(|l| l.holder != ctx.user.id && !l.is_expired(ctx.now, ctx.lock_timeout));
            let message = if forced {
                format!("Force-unlocked by admin {}", ctx.user.username)
            } else {
                format!("Unlocked by {}", ctx.user.username)
            };
            ttlog(tx, "unlock", &format!("borehole {borehole_id}"), &message)?;

            Ok(())
        })
    }
}
