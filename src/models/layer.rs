use serde::Serialize;

/// Depths closer than this are the same boundary.
pub const DEPTH_EPSILON: f64 = 1e-6;

pub fn same_depth(a: f64, b: f64) -> bool {
    (a - b).abs() < DEPTH_EPSILON
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layer {
    pub id: i64,
    pub profile_id: i64,
    pub depth_from: Option<f64>,
    /// `None` marks an open-ended (last) layer.
    pub depth_to: Option<f64>,
    pub lithology: Option<i64>,
    pub lithostratigraphy: Option<i64>,
    pub chronostratigraphy: Option<i64>,
    pub description: Option<String>,
    pub notes: Option<String>,
    /// Instrument layers only: the casing layer the instrument sits in.
    pub casing_id: Option<i64>,
}

impl Layer {
    pub fn new(id: i64, profile_id: i64, depth_from: Option<f64>, depth_to: Option<f64>) -> Self {
        Self {
            id,
            profile_id,
            depth_from,
            depth_to,
            lithology: None,
            lithostratigraphy: None,
            chronostratigraphy: None,
            description: None,
            notes: None,
            casing_id: None,
        }
    }
}
