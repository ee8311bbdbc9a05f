use super::role::Role;
use serde::Serialize;

/// One workgroup membership of a user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Membership {
    pub group_id: i64,
    pub roles: Vec<Role>,
    /// Disabled memberships are read-only whatever the roles say.
    pub disabled: bool,
}

impl Membership {
    pub fn has_role(&self, role: Role) -> bool {
        !self.disabled && self.roles.contains(&role)
    }
}

/// Already-authenticated caller.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub admin: bool,
    pub memberships: Vec<Membership>,
}

impl User {
    pub fn membership(&self, group_id: i64) -> Option<&Membership> {
        self.memberships.iter().find(|m| m.group_id == group_id)
    }
}
