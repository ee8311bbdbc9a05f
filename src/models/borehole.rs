use chrono::{DateTime, Utc};
use serde::Serialize;

/// Application-level edit lock stored on the borehole row.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Lock {
    pub holder: i64,
    pub acquired_at: DateTime<Utc>,
}

impl Lock {
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now - self.acquired_at >= timeout
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Borehole {
    pub id: i64,                           // ⇔ boreholes.id
    pub name: String,                      // ⇔ boreholes.name
    pub group_id: i64,                     // ⇔ boreholes.group_id (owning workgroup)
    pub published: bool,                   // ⇔ boreholes.published (0/1)
    pub total_depth: Option<f64>,          // ⇔ boreholes.total_depth
    pub top_bedrock: Option<f64>,          // ⇔ boreholes.top_bedrock (bedrock marker depth)
    pub lithology: Option<i64>,            // ⇔ boreholes.lithology (declared bedrock lithology)
    pub lithostratigraphy: Option<i64>,    // ⇔ boreholes.lithostratigraphy
    pub lock: Option<Lock>,                // ⇔ boreholes.locked_by + locked_at
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
}
