//! Hit testing: canvas point → pin or component.
//!
//! Walks components topmost first. Pins win over bodies so a pin drawn on
//! top of a neighbouring body stays clickable.

use crate::id::{ComponentId, PinId};
use crate::model::CircuitState;
use kurbo::Point;

/// What lies under a canvas point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Pin(PinId),
    Component(ComponentId),
}

/// Find the topmost pin within `pin_radius` of `point`, else the topmost
/// component body containing it. `None` for empty canvas.
pub fn hit_test(circuit: &CircuitState, point: Point, pin_radius: f64) -> Option<Hit> {
    hit_pin(circuit, point, pin_radius)
        .map(Hit::Pin)
        .or_else(|| hit_component(circuit, point).map(Hit::Component))
}

fn hit_pin(circuit: &CircuitState, point: Point, radius: f64) -> Option<PinId> {
    circuit.components_in_order().rev().find_map(|c| {
        c.pins
            .iter()
            .find(|p| (c.position + p.position.to_vec2()).distance(point) <= radius)
            .map(|p| p.id)
    })
}

fn hit_component(circuit: &CircuitState, point: Point) -> Option<ComponentId> {
    circuit
        .components_in_order()
        .rev()
        .find(|c| c.bounds().contains(point))
        .map(|c| c.id)
}
