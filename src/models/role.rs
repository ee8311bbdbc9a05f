use serde::Serialize;
use std::fmt;

/// Workflow stage. The declaration order is the approval order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    View,
    Edit,
    Control,
    Valid,
    Public,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::View,
        Role::Edit,
        Role::Control,
        Role::Valid,
        Role::Public,
    ];

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(level as usize).copied()
    }

    /// Next stage on submit. `None` at PUBLIC.
    pub fn next(&self) -> Option<Self> {
        Self::from_level(self.level() + 1)
    }

    /// Previous stage on reject. Only stages above EDIT step back.
    pub fn previous(&self) -> Option<Self> {
        if *self > Role::Edit {
            Self::from_level(self.level() - 1)
        } else {
            None
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::View => "VIEW",
            Role::Edit => "EDIT",
            Role::Control => "CONTROL",
            Role::Valid => "VALID",
            Role::Public => "PUBLIC",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "VIEW" => Some(Role::View),
            "EDIT" => Some(Role::Edit),
            "CONTROL" => Some(Role::Control),
            "VALID" => Some(Role::Valid),
            "PUBLIC" => Some(Role::Public),
            _ => None,
        }
    }

    /// Helper: CLI input is case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        Role::from_db_str(&code.trim().to_uppercase())
    }

    /// Roles are stored comma-separated in `memberships.roles`.
    pub fn list_to_db_str(roles: &[Role]) -> String {
        roles
            .iter()
            .map(|r| r.to_db_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn list_from_db_str(s: &str) -> Option<Vec<Role>> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Role::from_db_str)
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
