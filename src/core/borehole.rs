use crate::core::context::EditContext;
use crate::core::lock::LockManager;
use crate::core::patch::{BOREHOLE_FIELDS, lookup};
use crate::core::permission::PermissionFilter;
use crate::core::workflow::WorkflowEngine;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    borehole_select, insert_borehole, list_boreholes, load_borehole, load_workflow_log,
};
use crate::errors::{AppError, AppResult};
use crate::models::borehole::Borehole;
use crate::models::role::Role;
use crate::models::workflow::WorkflowLog;

pub struct BoreholeLogic;

impl BoreholeLogic {
    /// A borehole is created together with the first entry of its workflow.
    pub fn create(
        pool: &mut DbPool,
        name: &str,
        group_id: i64,
        initial_role: Role,
        already_finished: bool,
        ctx: &EditContext,
    ) -> AppResult<Borehole> {
        let may_create = ctx
            .user
            .membership(group_id)
            .is_some_and(|m| m.has_role(Role::Edit));
        if !may_create && !ctx.user.admin {
            return Err(AppError::Authorization(format!(
                "user '{}' cannot create boreholes in workgroup {}",
                ctx.user.username, group_id
            )));
        }

        pool.transaction(|tx| {
            let id = insert_borehole(tx, name, group_id, ctx.user.id, ctx.now)?;
            WorkflowEngine::start_in(tx, id, ctx, initial_role, already_finished)?;
            ttlog(tx, "borehole_add", &format!("borehole {id}"), name)?;
            load_borehole(tx, id)
        })
    }

    /// Boreholes visible to the caller, filtered in the store.
    pub fn list(pool: &mut DbPool, excluded: &[Role], ctx: &EditContext) -> AppResult<Vec<Borehole>> {
        let filter = PermissionFilter::new(&ctx.user).excluding(excluded);

        let mut qb = borehole_select();
        let clause = filter.sql_clause(&mut qb);
        qb.push_where(&[clause]);

        list_boreholes(&pool.conn, qb)
    }

    pub fn show(pool: &mut DbPool, id: i64, ctx: &EditContext) -> AppResult<(Borehole, WorkflowLog)> {
        let borehole = load_borehole(&pool.conn, id)?;
        PermissionFilter::new(&ctx.user).require_view(&borehole)?;
        let log = load_workflow_log(&pool.conn, id)?;
        Ok((borehole, log))
    }

    pub fn patch(
        pool: &mut DbPool,
        id: i64,
        field: &str,
        raw: &str,
        ctx: &EditContext,
    ) -> AppResult<Borehole> {
        let spec = lookup(BOREHOLE_FIELDS, field)?;
        let value = spec.parse(raw)?;

        pool.transaction(|tx| {
            LockManager::guard(tx, id, ctx)?;
            spec.validate(tx, id, &value)?;
            spec.apply(tx, id, &value)?;

            ttlog(
                tx,
                "borehole_set",
                &format!("borehole {id}"),
                &format!("{} = {}", spec.name, raw.trim()),
            )?;

            load_borehole(tx, id)
        })
    }
}
