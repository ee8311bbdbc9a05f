use crate::core::context::EditContext;
use crate::core::layer::validate::{ProfileReport, validate_profile};
use crate::core::lock::LockManager;
use crate::core::permission::PermissionFilter;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{
    delete_profile, insert_profile, load_borehole, load_layers, load_profile, load_profiles,
    set_primary_profile,
};
use crate::errors::{AppError, AppResult};
use crate::models::layer::Layer;
use crate::models::profile::{Profile, ProfileKind};

pub struct ProfileLogic;

impl ProfileLogic {
    /// The first geology profile of a borehole becomes its primary one.
    pub fn create(
        pool: &mut DbPool,
        borehole_id: i64,
        kind: ProfileKind,
        name: Option<&str>,
        ctx: &EditContext,
    ) -> AppResult<Profile> {
        pool.transaction(|tx| {
            LockManager::guard(tx, borehole_id, ctx)?;

            let primary = kind == ProfileKind::Geology
                && !load_profiles(tx, borehole_id)?
                    .iter()
                    .any(|p| p.kind == ProfileKind::Geology && p.primary);

            let id = insert_profile(tx, borehole_id, kind, primary, name)?;
            ttlog(
                tx,
                "profile_add",
                &format!("borehole {borehole_id}"),
                &format!("Profile {id} ({}) added", kind.to_db_str()),
            )?;

            load_profile(tx, id)
        })
    }

    pub fn set_primary(pool: &mut DbPool, profile_id: i64, ctx: &EditContext) -> AppResult<Profile> {
        pool.transaction(|tx| {
            let profile = load_profile(tx, profile_id)?;
            if profile.kind != ProfileKind::Geology {
                return Err(AppError::ActionWrong(format!(
                    "only geology profiles can be primary, {} is {}",
                    profile_id,
                    profile.kind.to_db_str()
                )));
            }
            LockManager::guard(tx, profile.borehole_id, ctx)?;

            set_primary_profile(tx, profile.borehole_id, profile_id)?;
            ttlog(
                tx,
                "profile_primary",
                &format!("borehole {}", profile.borehole_id),
                &format!("Profile {profile_id} is now primary"),
            )?;

            load_profile(tx, profile_id)
        })
    }

    /// Removes the profile and all of its layers.
    pub fn delete(pool: &mut DbPool, profile_id: i64, ctx: &EditContext) -> AppResult<()> {
        pool.transaction(|tx| {
            let profile = load_profile(tx, profile_id)?;
            LockManager::guard(tx, profile.borehole_id, ctx)?;

            delete_profile(tx, profile_id)?;
            ttlog(
                tx,
                "profile_del",
                &format!("borehole {}", profile.borehole_id),
                &format!("Profile {profile_id} deleted"),
            )?;
            Ok(())
        })
    }

    pub fn list(pool: &mut DbPool, borehole_id: i64, ctx: &EditContext) -> AppResult<Vec<Profile>> {
        let borehole = load_borehole(&pool.conn, borehole_id)?;
        PermissionFilter::new(&ctx.user).require_view(&borehole)?;
        load_profiles(&pool.conn, borehole_id)
    }

    /// Layers in profile order together with the advisory report.
    pub fn validate(
        pool: &mut DbPool,
        profile_id: i64,
        ctx: &EditContext,
    ) -> AppResult<(Vec<Layer>, ProfileReport)> {
        let profile = load_profile(&pool.conn, profile_id)?;
        let borehole = load_borehole(&pool.conn, profile.borehole_id)?;
        PermissionFilter::new(&ctx.user).require_view(&borehole)?;

        let layers = load_layers(&pool.conn, profile_id)?;
        let report = validate_profile(&profile, &borehole, &layers);
        Ok((layers, report))
    }
}
