//! Connection resolver: pin ids → canvas positions, and delete cascades.
//!
//! Wires hold pin ids only. Rendering must survive ids that no longer
//! resolve (a wire left on a resized rail, a stale preview), so position
//! lookups fall back to the origin instead of failing.

use crate::id::{ComponentId, ConnectionId, PinId};
use crate::model::{CircuitComponent, CircuitState, Pin};
use kurbo::Point;
use std::collections::HashSet;

/// Find a pin and its owner across all components.
pub fn find_pin(circuit: &CircuitState, pin: PinId) -> Option<(&CircuitComponent, &Pin)> {
    circuit
        .components
        .values()
        .find_map(|c| c.pin(pin).map(|p| (c, p)))
}

/// Absolute canvas position of a pin: owner position + pin offset.
/// `(0, 0)` if the pin cannot be found.
pub fn absolute_position(circuit: &CircuitState, pin: PinId) -> Point {
    match find_pin(circuit, pin) {
        Some((owner, p)) => owner.position + p.position.to_vec2(),
        None => {
            log::trace!("resolve: dangling pin {pin}");
            Point::ZERO
        }
    }
}

/// Endpoints of the live preview wire from a pending start pin to the pointer.
pub fn preview_line(circuit: &CircuitState, pending: Option<PinId>, pointer: Point) -> Option<(Point, Point)> {
    pending.map(|start| (absolute_position(circuit, start), pointer))
}

/// Wires touching any pin currently owned by `component`.
///
/// Empty if the component does not exist.
pub fn cascade_connections(circuit: &CircuitState, component: ComponentId) -> Vec<ConnectionId> {
    let Some(owner) = circuit.component(component) else {
        return Vec::new();
    };
    let pins: HashSet<PinId> = owner.pin_ids().collect();
    let mut doomed: Vec<ConnectionId> = circuit
        .connections
        .values()
        .filter(|c| pins.contains(&c.start_pin_id) || pins.contains(&c.end_pin_id))
        .map(|c| c.id)
        .collect();
    doomed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    doomed
}
