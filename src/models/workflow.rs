use super::role::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkflowEntry {
    pub id: i64,
    pub borehole_id: i64,
    pub role: Role,
    /// Stamped by the first lock acquisition in this stage.
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub user_id: i64,
}

impl WorkflowEntry {
    pub fn is_open(&self) -> bool {
        self.finished_at.is_none()
    }
}

/// Append-only stage log of one borehole, ordered by entry id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowLog {
    pub entries: Vec<WorkflowEntry>,
}

impl WorkflowLog {
    pub fn new(mut entries: Vec<WorkflowEntry>) -> Self {
        entries.sort_by_key(|e| e.id);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&WorkflowEntry> {
        self.entries.last()
    }

    pub fn open_entry(&self) -> Option<&WorkflowEntry> {
        self.entries.iter().rev().find(|e| e.is_open())
    }

    /// Role of the open entry, or of the most recently finished one.
    pub fn current_role(&self) -> Option<Role> {
        if let Some(open) = self.open_entry() {
            return Some(open.role);
        }

        self.entries
            .iter()
            .filter(|e| e.finished_at.is_some())
            .max_by(|a, b| a.finished_at.cmp(&b.finished_at).then(a.id.cmp(&b.id)))
            .map(|e| e.role)
    }
}
