//! Ordered depth intervals of a profile.

pub mod placement;
pub mod repair;
pub mod validate;

use crate::core::context::EditContext;
use crate::core::lock::LockManager;
use crate::core::patch::{LAYER_FIELDS, Validator, lookup};
use crate::core::permission::PermissionFilter;
use crate::db::codelist::id_by_code;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_layer, insert_layer, load_borehole, load_layer, load_layers, load_profile,
    set_layer_depth_from, set_layer_depth_to,
};
use crate::errors::{AppError, AppResult};
use crate::models::layer::Layer;
use crate::models::profile::ProfileKind;
use repair::{DeleteMode, GapMode, IntervalEdit, LayerChange};
use rusqlite::Connection;

/// High-level business logic for layer edits.
pub struct LayerLogic;

fn fmt_depth(d: Option<f64>) -> String {
    d.map(|v| format!("{v}")).unwrap_or_else(|| "--".into())
}

impl LayerLogic {
    /// Append a layer at the depth chosen by the placement policy.
    pub fn create(pool: &mut DbPool, profile_id: i64, ctx: &EditContext) -> AppResult<Layer> {
        pool.transaction(|tx| {
            let profile = load_profile(tx, profile_id)?;
            let borehole = LockManager::guard(tx, profile.borehole_id, ctx)?;

            let layers = load_layers(tx, profile_id)?;
            let depth_from =
                placement::next_depth_from(profile.kind, &layers, borehole.top_bedrock);

            let id = insert_layer(tx, &Layer::new(0, profile_id, depth_from, None))?;

            ttlog(
                tx,
                "layer_add",
                &format!("profile {profile_id}"),
                &format!("Layer {id} added at {}", fmt_depth(depth_from)),
            )?;

            load_layer(tx, id)
        })
    }

    pub fn delete(
        pool: &mut DbPool,
        layer_id: i64,
        mode: DeleteMode,
        ctx: &EditContext,
    ) -> AppResult<Vec<LayerChange>> {
        Self::edit(pool, IntervalEdit::Delete { layer_id, mode }, ctx)
    }

    pub fn gap(
        pool: &mut DbPool,
        layer_id: i64,
        mode: GapMode,
        ctx: &EditContext,
    ) -> AppResult<Vec<LayerChange>> {
        Self::edit(pool, IntervalEdit::Gap { layer_id, mode }, ctx)
    }

    /// Read neighbors, repair boundaries and delete/insert in one transaction.
    pub fn edit(
        pool: &mut DbPool,
        edit: IntervalEdit,
        ctx: &EditContext,
    ) -> AppResult<Vec<LayerChange>> {
        let layer_id = match edit {
            IntervalEdit::Delete { layer_id, .. } | IntervalEdit::Gap { layer_id, .. } => layer_id,
        };

        pool.transaction(|tx| {
            let layer = load_layer(tx, layer_id)?;
            let profile = load_profile(tx, layer.profile_id)?;
            LockManager::guard(tx, profile.borehole_id, ctx)?;

            let layers = load_layers(tx, profile.id)?;
            let changes = repair::plan(&layers, edit)?;

            for change in &changes {
                Self::apply_change(tx, profile.id, change, ctx)?;
            }

            let operation = match edit {
                IntervalEdit::Delete { .. } => "layer_del",
                IntervalEdit::Gap { .. } => "layer_gap",
            };
            ttlog(
                tx,
                operation,
                &format!("layer {layer_id}"),
                &format!("{edit:?}: {} change(s)", changes.len()),
            )?;

            Ok(changes)
        })
    }

    fn apply_change(
        conn: &Connection,
        profile_id: i64,
        change: &LayerChange,
        ctx: &EditContext,
    ) -> AppResult<()> {
        match change {
            LayerChange::SetDepthFrom { id, value } => set_layer_depth_from(conn, *id, *value),
            LayerChange::SetDepthTo { id, value } => set_layer_depth_to(conn, *id, *value),
            LayerChange::Remove { id } => delete_layer(conn, *id),
            LayerChange::InsertFiller {
                depth_from,
                depth_to,
            } => {
                let unknown = id_by_code(conn, "lithology", &ctx.unknown_lithology_code)?;
                let mut filler = Layer::new(0, profile_id, Some(*depth_from), *depth_to);
                filler.lithology = Some(unknown);
                insert_layer(conn, &filler).map(|_| ())
            }
        }
    }

    /// Set one attribute through the field table.
    pub fn patch(
        pool: &mut DbPool,
        layer_id: i64,
        field: &str,
        raw: &str,
        ctx: &EditContext,
    ) -> AppResult<Layer> {
        let spec = lookup(LAYER_FIELDS, field)?;
        let value = spec.parse(raw)?;

        pool.transaction(|tx| {
            let layer = load_layer(tx, layer_id)?;
            let profile = load_profile(tx, layer.profile_id)?;
            LockManager::guard(tx, profile.borehole_id, ctx)?;

            if spec.validator == Validator::CasingLayer && profile.kind != ProfileKind::Instrument {
                return Err(AppError::ActionWrong(format!(
                    "{} applies to instrument layers only",
                    spec.name
                )));
            }

            spec.validate(tx, profile.borehole_id, &value)?;
            spec.apply(tx, layer_id, &value)?;

            ttlog(
                tx,
                "layer_set",
                &format!("layer {layer_id}"),
                &format!("{} = {}", spec.name, raw.trim()),
            )?;

            load_layer(tx, layer_id)
        })
    }

    pub fn list(pool: &mut DbPool, profile_id: i64, ctx: &EditContext) -> AppResult<Vec<Layer>> {
        let profile = load_profile(&pool.conn, profile_id)?;
        let borehole = load_borehole(&pool.conn, profile.borehole_id)?;
        PermissionFilter::new(&ctx.user).require_view(&borehole)?;
        load_layers(&pool.conn, profile_id)
    }
}
