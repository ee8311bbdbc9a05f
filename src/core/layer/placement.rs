//! Where a freshly appended layer starts.
//!
//! Entry proceeds from the surface downward, but a geology profile keeps room
//! for the top-of-bedrock layer, whose depth is fixed by the borehole rather
//! than by insertion order.

use crate::models::layer::{Layer, same_depth};
use crate::models::profile::ProfileKind;

fn deepest_to<'a>(layers: impl Iterator<Item = &'a Layer>) -> Option<f64> {
    layers.filter_map(|l| l.depth_to).max_by(f64::total_cmp)
}

/// `depth_from` of a new layer appended to `layers`.
///
/// `top_bedrock` is the borehole's bedrock marker depth, if declared.
pub fn next_depth_from(kind: ProfileKind, layers: &[Layer], top_bedrock: Option<f64>) -> Option<f64> {
    if kind == ProfileKind::Instrument {
        return None;
    }

    if layers.is_empty() {
        return Some(0.0);
    }

    if kind == ProfileKind::Geology
        && let Some(bedrock) = top_bedrock
        && let Some(bed) = layers
            .iter()
            .find(|l| l.depth_from.is_some_and(|d| same_depth(d, bedrock)))
    {
        let above = deepest_to(
            layers
                .iter()
                .filter(|l| l.id != bed.id)
                .filter(|l| l.depth_to.is_some_and(|t| t <= bedrock)),
        );

        return match above {
            // Nothing above and bedrock at the surface: continue under it.
            None if bed.depth_from.is_some_and(|d| same_depth(d, 0.0)) => bed.depth_to,
            // Room left above bedrock.
            Some(to) if to < bedrock && !same_depth(to, bedrock) => Some(to),
            // Above is full: continue below everything at or under bedrock.
            _ => deepest_to(
                layers
                    .iter()
                    .filter(|l| l.depth_from.is_some_and(|d| d >= bedrock || same_depth(d, bedrock))),
            ),
        };
    }

    deepest_to(layers.iter())
}
