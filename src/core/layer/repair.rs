//! Boundary repair for deletions and detected gaps.
//!
//! `plan` works on the ordered layers of one profile and returns the list of
//! writes; `LayerLogic` applies that list inside the transaction that read the
//! layers, so no other edit can slip in between.

use crate::errors::{AppError, AppResult};
use crate::models::layer::{Layer, same_depth};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DeleteMode {
    /// Remove only; a gap may remain.
    Only,
    /// Stretch the upper neighbor down over the hole.
    ExtendUpper,
    /// Stretch the lower neighbor up over the hole.
    ExtendLower,
    /// Both neighbors meet at the given depth.
    Split(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GapMode {
    /// Insert a filler layer tagged with the undefined lithology.
    Fill,
    /// Stretch the upper neighbor down to this layer.
    ExtendUpper,
    /// Pull this layer's top up to the upper neighbor (or the surface).
    ExtendSelf,
    /// Upper neighbor and this layer meet at the given depth.
    Split(f64),
}

impl DeleteMode {
    pub fn from_code(mode: u8, value: Option<f64>) -> AppResult<Self> {
        match (mode, value) {
            (0, _) => Ok(DeleteMode::Only),
            (1, _) => Ok(DeleteMode::ExtendUpper),
            (2, _) => Ok(DeleteMode::ExtendLower),
            (3, Some(v)) => Ok(DeleteMode::Split(v)),
            (3, None) => Err(AppError::ActionWrong("delete mode 3 needs a value".into())),
            (m, _) => Err(AppError::ActionWrong(format!("unknown delete mode {m}"))),
        }
    }
}

impl GapMode {
    pub fn from_code(mode: u8, value: Option<f64>) -> AppResult<Self> {
        match (mode, value) {
            (0, _) => Ok(GapMode::Fill),
            (1, _) => Ok(GapMode::ExtendUpper),
            (2, _) => Ok(GapMode::ExtendSelf),
            (3, Some(v)) => Ok(GapMode::Split(v)),
            (3, None) => Err(AppError::ActionWrong("gap mode 3 needs a value".into())),
            (m, _) => Err(AppError::ActionWrong(format!("unknown gap mode {m}"))),
        }
    }
}

/// One interval edit on a profile, executed atomically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum IntervalEdit {
    Delete { layer_id: i64, mode: DeleteMode },
    Gap { layer_id: i64, mode: GapMode },
}

/// A single write produced by a plan, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LayerChange {
    SetDepthFrom { id: i64, value: Option<f64> },
    SetDepthTo { id: i64, value: Option<f64> },
    /// New filler layer; lithology is resolved from the undefined code.
    InsertFiller { depth_from: f64, depth_to: Option<f64> },
    Remove { id: i64 },
}

struct Neighbors<'a> {
    upper: Option<&'a Layer>,
    target: &'a Layer,
    lower: Option<&'a Layer>,
}

fn neighbors(layers: &[Layer], id: i64) -> AppResult<Neighbors<'_>> {
    let idx = layers
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| AppError::NotFound(format!("layer {id} in profile")))?;

    Ok(Neighbors {
        upper: idx.checked_sub(1).map(|i| &layers[i]),
        target: &layers[idx],
        lower: layers.get(idx + 1),
    })
}

/// Writes implementing `edit` over `layers` (profile order).
pub fn plan(layers: &[Layer], edit: IntervalEdit) -> AppResult<Vec<LayerChange>> {
    match edit {
        IntervalEdit::Delete { layer_id, mode } => plan_delete(layers, layer_id, mode),
        IntervalEdit::Gap { layer_id, mode } => plan_gap(layers, layer_id, mode),
    }
}

fn plan_delete(layers: &[Layer], id: i64, mode: DeleteMode) -> AppResult<Vec<LayerChange>> {
    let n = neighbors(layers, id)?;
    let mut out = Vec::new();

    match mode {
        DeleteMode::Only => {}
        DeleteMode::ExtendUpper => {
            let upper = n
                .upper
                .ok_or_else(|| AppError::ActionWrong("no upper layer to extend".into()))?;
            let value = match n.lower {
                Some(lower) => lower.depth_from,
                None => n.target.depth_to,
            };
            out.push(LayerChange::SetDepthTo {
                id: upper.id,
                value,
            });
        }
        DeleteMode::ExtendLower => {
            let lower = n
                .lower
                .ok_or_else(|| AppError::ActionWrong("no lower layer to extend".into()))?;
            let value = match n.upper {
                Some(upper) => upper.depth_to,
                None => n.target.depth_from,
            };
            out.push(LayerChange::SetDepthFrom {
                id: lower.id,
                value,
            });
        }
        DeleteMode::Split(value) => {
            if n.upper.is_none() && n.lower.is_none() {
                return Err(AppError::ActionWrong(
                    "no neighbor layer to move to the split depth".into(),
                ));
            }
            if let Some(lower) = n.lower {
                out.push(LayerChange::SetDepthFrom {
                    id: lower.id,
                    value: Some(value),
                });
            }
            if let Some(upper) = n.upper {
                out.push(LayerChange::SetDepthTo {
                    id: upper.id,
                    value: Some(value),
                });
            }
        }
    }

    out.push(LayerChange::Remove { id });
    Ok(out)
}

fn plan_gap(layers: &[Layer], id: i64, mode: GapMode) -> AppResult<Vec<LayerChange>> {
    let n = neighbors(layers, id)?;
    let top = n.upper.and_then(|u| u.depth_to).unwrap_or(0.0);

    if let Some(from) = n.target.depth_from
        && (from < top || same_depth(from, top))
    {
        return Err(AppError::ActionWrong(format!(
            "no gap above layer {id} ({top:.2} to {from:.2})"
        )));
    }

    let change = match mode {
        GapMode::Fill => LayerChange::InsertFiller {
            depth_from: top,
            depth_to: n.target.depth_from,
        },
        GapMode::ExtendUpper => {
            let upper = n
                .upper
                .ok_or_else(|| AppError::ActionWrong("no upper layer to extend".into()))?;
            LayerChange::SetDepthTo {
                id: upper.id,
                value: n.target.depth_from,
            }
        }
        GapMode::ExtendSelf => LayerChange::SetDepthFrom {
            id: n.target.id,
            value: Some(top),
        },
        GapMode::Split(value) => {
            let upper = n
                .upper
                .ok_or_else(|| AppError::ActionWrong("no upper layer to split with".into()))?;
            return Ok(vec![
                LayerChange::SetDepthTo {
                    id: upper.id,
                    value: Some(value),
                },
                LayerChange::SetDepthFrom {
                    id: n.target.id,
                    value: Some(value),
                },
            ]);
        }
    };

    Ok(vec![change])
}
