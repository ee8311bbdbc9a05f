//! Advisory consistency report for one profile.
//!
//! Nothing here blocks a write: field data is entered incrementally and gaps
//! are often left on purpose. The report is data returned next to the layers.

use crate::models::borehole::Borehole;
use crate::models::layer::{Layer, same_depth};
use crate::models::profile::{Profile, ProfileKind};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerFlags {
    pub id: i64,
    pub missing_from: bool,
    pub missing_to: bool,
    pub inverted_depth: bool,
    pub top_disjoint: bool,
    pub top_overlap: bool,
    pub bottom_disjoint: bool,
    pub bottom_overlap: bool,
    /// Bedrock layer only: lithology differs from the borehole's declaration.
    pub wrong_lithology: bool,
    pub wrong_lithostratigraphy: bool,
}

impl LayerFlags {
    pub fn any(&self) -> bool {
        self.missing_from
            || self.missing_to
            || self.inverted_depth
            || self.top_disjoint
            || self.top_overlap
            || self.bottom_disjoint
            || self.bottom_overlap
            || self.wrong_lithology
            || self.wrong_lithostratigraphy
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileReport {
    pub profile_id: i64,
    /// First layer does not start at the surface (or there are no layers).
    pub missing_layers: bool,
    /// Last layer does not end at the borehole's total depth.
    pub wrong_depth: bool,
    /// Only meaningful when the borehole declares a bedrock marker depth.
    pub missing_bedrock: bool,
    pub layers: Vec<LayerFlags>,
}

impl ProfileReport {
    pub fn is_clean(&self) -> bool {
        !self.missing_layers
            && !self.wrong_depth
            && !self.missing_bedrock
            && self.layers.iter().all(|l| !l.any())
    }
}

/// `layers` must be in profile order.
pub fn validate_profile(profile: &Profile, borehole: &Borehole, layers: &[Layer]) -> ProfileReport {
    let mut report = ProfileReport {
        profile_id: profile.id,
        ..Default::default()
    };

    report.missing_layers = match layers.first() {
        Some(first) => !first.depth_from.is_some_and(|d| same_depth(d, 0.0)),
        None => true,
    };

    if let Some(total) = borehole.total_depth
        && let Some(last) = layers.last()
    {
        report.wrong_depth = !last.depth_to.is_some_and(|d| same_depth(d, total));
    }

    let geology = profile.kind == ProfileKind::Geology;
    report.missing_bedrock = geology && borehole.top_bedrock.is_some();

    for (idx, layer) in layers.iter().enumerate() {
        let mut flags = LayerFlags {
            id: layer.id,
            ..Default::default()
        };

        if geology {
            flags.missing_from = layer.depth_from.is_none();
            flags.missing_to = layer.depth_to.is_none();

            if let (Some(from), Some(to)) = (layer.depth_from, layer.depth_to) {
                flags.inverted_depth = from > to && !same_depth(from, to);
            }

            if let Some(prev) = idx.checked_sub(1).map(|i| &layers[i])
                && let (Some(prev_to), Some(from)) = (prev.depth_to, layer.depth_from)
                && !same_depth(prev_to, from)
            {
                flags.top_disjoint = prev_to < from;
                flags.top_overlap = prev_to > from;
            }

            if let Some(next) = layers.get(idx + 1)
                && let (Some(to), Some(next_from)) = (layer.depth_to, next.depth_from)
                && !same_depth(to, next_from)
            {
                flags.bottom_disjoint = to < next_from;
                flags.bottom_overlap = to > next_from;
            }

            if let Some(bedrock) = borehole.top_bedrock
                && layer.depth_from.is_some_and(|d| same_depth(d, bedrock))
            {
                report.missing_bedrock = false;
                flags.wrong_lithology =
                    borehole.lithology.is_some() && layer.lithology != borehole.lithology;
                flags.wrong_lithostratigraphy = borehole.lithostratigraphy.is_some()
                    && layer.lithostratigraphy != borehole.lithostratigraphy;
            }
        }

        report.layers.push(flags);
    }

    report
}
