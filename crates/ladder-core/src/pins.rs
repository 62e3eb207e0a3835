//! Pin layout policy: kind + sizing → ordered pin set.
//!
//! Pure. The same owner, kind, and state always produce the same pins,
//! including their ids.

use crate::config::DEFAULT_RAIL_WIDTH;
use crate::id::{ComponentId, PinId};
use crate::kinds::{ComponentKind, PinTemplate};
use crate::model::{ComponentState, Pin};
use kurbo::Point;
use smallvec::SmallVec;

/// Produce the pins of a component.
///
/// Fixed templates yield ids `<owner>.p1`, `<owner>.p2`, … Rails yield
/// `floor(width / spacing)` unlabelled pins with ids `<owner>.r<revision>.p<n>`,
/// centred in their slots along y = 0.
pub fn layout_pins(
    owner: ComponentId,
    kind: ComponentKind,
    state: &ComponentState,
    spacing: f64,
) -> SmallVec<[Pin; 2]> {
    match kind.spec().pins {
        PinTemplate::Fixed(slots) => slots
            .iter()
            .enumerate()
            .map(|(i, slot)| Pin {
                id: PinId::fixed(owner, i + 1),
                component_id: owner,
                label: slot.label.to_string(),
                position: slot.offset,
            })
            .collect(),
        PinTemplate::Rail => {
            let (width, revision) = match *state {
                ComponentState::Rail { width, revision } => (width, revision),
                _ => (DEFAULT_RAIL_WIDTH, 0),
            };
            let count = rail_pin_count(width, spacing);
            (0..count)
                .map(|i| Pin {
                    id: PinId::rail(owner, revision, i + 1),
                    component_id: owner,
                    label: String::new(),
                    position: Point::new((i as f64 + 0.5) * spacing, 0.0),
                })
                .collect()
        }
    }
}

/// Upper bound on the pins of one rail.
pub const MAX_RAIL_PINS: usize = 4096;

/// `floor(width / spacing)`, zero for degenerate input, at most `MAX_RAIL_PINS`.
pub fn rail_pin_count(width: f64, spacing: f64) -> usize {
    if spacing.is_nan() || spacing <= 0.0 {
        return 0;
    }
    let n = (width / spacing).floor();
    if n.is_finite() && n > 0.0 {
        (n as usize).min(MAX_RAIL_PINS)
    } else {
        0
    }
}
