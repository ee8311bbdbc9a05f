use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{find_group_id, insert_group, insert_user, load_user_by_name, upsert_membership};
use crate::errors::AppResult;
use crate::models::role::Role;
use crate::models::user::Membership;

/// Accounts and workgroups. Not lock-protected: these rows are not part of a
/// borehole's editable state.
pub struct AdminLogic;

impl AdminLogic {
    pub fn add_user(pool: &mut DbPool, username: &str, admin: bool) -> AppResult<i64> {
        pool.transaction(|tx| {
            let id = insert_user(tx, username, admin)?;
            ttlog(tx, "user_add", username, &format!("User {id} created (admin: {admin})"))?;
            Ok(id)
        })
    }

    pub fn add_group(pool: &mut DbPool, name: &str) -> AppResult<i64> {
        pool.transaction(|tx| {
            let id = insert_group(tx, name)?;
            ttlog(tx, "group_add", name, &format!("Workgroup {id} created"))?;
            Ok(id)
        })
    }

    /// Create or replace the membership of `username` in `group`.
    pub fn set_membership(
        pool: &mut DbPool,
        username: &str,
        group: &str,
        roles: &[Role],
        disabled: bool,
    ) -> AppResult<Membership> {
        pool.transaction(|tx| {
            let user = load_user_by_name(tx, username)?;
            let membership = Membership {
                group_id: find_group_id(tx, group)?,
                roles: roles.to_vec(),
                disabled,
            };

            upsert_membership(tx, user.id, &membership)?;
            ttlog(
                tx,
                "member_set",
                &format!("{username}@{group}"),
                &format!(
                    "Roles [{}]{}",
                    Role::list_to_db_str(roles),
                    if disabled { " (disabled)" } else { "" }
                ),
            )?;

            Ok(membership)
        })
    }
}
