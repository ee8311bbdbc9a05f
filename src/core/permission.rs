//! Access predicate derived from a user's workgroup memberships.
//!
//! A record is visible when it is published, or when the user belongs to the
//! owning group with at least one role outside the exclusion set. Editing
//! additionally needs an enabled membership holding the record's active role.

use crate::db::query_builder::QueryBuilder;
use crate::errors::{AppError, AppResult};
use crate::models::borehole::Borehole;
use crate::models::role::Role;
use crate::models::user::User;

pub struct PermissionFilter<'a> {
    user: &'a User,
    excluded: Vec<Role>,
}

impl<'a> PermissionFilter<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            user,
            excluded: Vec::new(),
        }
    }

    pub fn excluding(mut self, roles: &[Role]) -> Self {
        self.excluded.extend_from_slice(roles);
        self
    }

    /// Groups granting visibility: at least one non-excluded role.
    pub fn visible_groups(&self) -> Vec<i64> {
        self.user
            .memberships
            .iter()
            .filter(|m| m.roles.iter().any(|r| !self.excluded.contains(r)))
            .map(|m| m.group_id)
            .collect()
    }

    pub fn can_view(&self, borehole: &Borehole) -> bool {
        borehole.published || self.visible_groups().contains(&borehole.group_id)
    }

    pub fn can_edit(&self, borehole: &Borehole, active_role: Role) -> bool {
        if self.excluded.contains(&active_role) {
            return false;
        }
        self.user
            .membership(borehole.group_id)
            .is_some_and(|m| m.has_role(active_role))
    }

    pub fn require_view(&self, borehole: &Borehole) -> AppResult<()> {
        if self.can_view(borehole) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "user '{}' cannot view borehole {}",
                self.user.username, borehole.id
            )))
        }
    }

    pub fn require_edit(&self, borehole: &Borehole, active_role: Role) -> AppResult<()> {
        if self.can_edit(borehole, active_role) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "user '{}' holds no {} role in the workgroup of borehole {}",
                self.user.username, active_role, borehole.id
            )))
        }
    }

    /// Same predicate as `can_view`, as a SQL condition over `boreholes`.
    pub fn sql_clause(&self, qb: &mut QueryBuilder) -> String {
        let groups = self.visible_groups();
        if groups.is_empty() {
            return "published = 1".to_string();
        }
        let placeholders = qb.push_args(groups);
        format!("(published = 1 OR group_id IN ({placeholders}))")
    }
}
