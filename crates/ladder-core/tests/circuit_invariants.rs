//! Integration tests: circuit store operations and their invariants.
//!
//! Builds small ladder rungs through the public `CircuitState` API and checks
//! pin ownership, wire integrity, delete cascades, and rail resizing.

use ladder_core::{
    CircuitState, ComponentId, ComponentKind, ConnectionId, EditorConfig, PinId, Point, absolute_position,
    find_pin,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn config() -> EditorConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorConfig::default()
}

fn pin(circuit: &CircuitState, component: ComponentId, index: usize) -> PinId {
    circuit.component(component).unwrap().pins[index].id
}

/// +24V rail → S1 → K1 → 0V rail, wired top to bottom.
fn rung() -> (CircuitState, [ComponentId; 4]) {
    let config = config();
    let mut circuit = CircuitState::new();
    let top = circuit.add_component(ComponentKind::Source24V, &config);
    let switch = circuit.add_component(ComponentKind::NormallyOpen, &config);
    let coil = circuit.add_component(ComponentKind::Coil, &config);
    let bottom = circuit.add_component(ComponentKind::Source0V, &config);

    circuit.move_component(top, Point::new(50.0, 50.0));
    circuit.move_component(switch, Point::new(100.0, 100.0));
    circuit.move_component(coil, Point::new(90.0, 200.0));
    circuit.move_component(bottom, Point::new(50.0, 300.0));

    let wires = [
        (pin(&circuit, top, 2), pin(&circuit, switch, 0)),
        (pin(&circuit, switch, 1), pin(&circuit, coil, 0)),
        (pin(&circuit, coil, 1), pin(&circuit, bottom, 2)),
    ];
    for (a, b) in wires {
        circuit.add_connection(a, b).expect("wire");
    }
    (circuit, [top, switch, coil, bottom])
}

fn assert_pins_owned(circuit: &CircuitState) {
    for (id, component) in &circuit.components {
        for pin in &component.pins {
            assert_eq!(pin.component_id, *id, "pin {} has wrong owner", pin.id);
        }
    }
}

fn assert_wires_resolve(circuit: &CircuitState) {
    for conn in circuit.connections.values() {
        assert!(find_pin(circuit, conn.start_pin_id).is_some(), "{} start dangles", conn.id);
        assert!(find_pin(circuit, conn.end_pin_id).is_some(), "{} end dangles", conn.id);
    }
}

// ─── Invariants ─────────────────────────────────────────────────────────

#[test]
fn every_pin_belongs_to_its_owner() {
    let config = config();
    let mut circuit = CircuitState::new();
    for kind in ComponentKind::ALL {
        circuit.add_component(kind, &config);
    }
    assert_pins_owned(&circuit);
}

#[test]
fn wires_resolve_through_moves_relabels_and_deletes() {
    let (mut circuit, [_, switch, coil, _]) = rung();
    assert_wires_resolve(&circuit);

    circuit.move_component(coil, Point::new(400.0, 400.0));
    circuit.relabel_component(switch, "S-start");
    circuit.relabel_pin(pin(&circuit, coil, 0), "A1'");
    assert_wires_resolve(&circuit);

    circuit.delete_component(switch);
    assert_wires_resolve(&circuit);
    assert_pins_owned(&circuit);
}

// ─── Cascading delete ───────────────────────────────────────────────────

#[test]
fn delete_removes_exactly_the_touching_wires() {
    let (mut circuit, [top, switch, coil, bottom]) = rung();
    let survivor = ConnectionId::between(pin(&circuit, coil, 1), pin(&circuit, bottom, 2));

    assert!(circuit.delete_component(switch));

    let remaining: Vec<ConnectionId> = circuit.connections.keys().copied().collect();
    assert_eq!(remaining, vec![survivor]);
    assert!(circuit.component(switch).is_none());
    assert_eq!(circuit.draw_order, vec![top, coil, bottom]);
}

#[test]
fn delete_component_without_wires_keeps_all_wires() {
    let (mut circuit, _) = rung();
    let lamp = circuit.add_component(ComponentKind::Lamp, &config());
    let before = circuit.connections.clone();
    circuit.delete_component(lamp);
    assert_eq!(circuit.connections, before);
}

#[test]
fn delete_connection_by_id() {
    let (mut circuit, [_, switch, coil, _]) = rung();
    let id = ConnectionId::between(pin(&circuit, switch, 1), pin(&circuit, coil, 0));
    assert!(circuit.delete_connection(id));
    assert!(!circuit.delete_connection(id));
    assert_eq!(circuit.connections.len(), 2);
}

// ─── Resize ─────────────────────────────────────────────────────────────

#[test]
fn resize_rail_replaces_every_pin() {
    let config = config();
    let mut circuit = CircuitState::new();
    let rail = circuit.add_component(ComponentKind::Source24V, &config);
    let old: HashSet<PinId> = circuit.component(rail).unwrap().pin_ids().collect();
    assert_eq!(old.len(), 20);

    assert!(circuit.resize_component(rail, 200.0, &config));

    let component = circuit.component(rail).unwrap();
    assert_eq!(component.width(), Some(200.0));
    assert_eq!(component.pins.len(), 10);
    assert!(component.pin_ids().all(|id| !old.contains(&id)));
    assert_pins_owned(&circuit);
}

#[test]
fn resize_back_to_old_width_still_issues_new_ids() {
    let config = config();
    let mut circuit = CircuitState::new();
    let rail = circuit.add_component(ComponentKind::Source0V, &config);
    let original: HashSet<PinId> = circuit.component(rail).unwrap().pin_ids().collect();

    circuit.resize_component(rail, 200.0, &config);
    circuit.resize_component(rail, 400.0, &config);

    let current: HashSet<PinId> = circuit.component(rail).unwrap().pin_ids().collect();
    assert_eq!(current.len(), original.len());
    assert!(current.is_disjoint(&original));
}

#[test]
fn resize_leaves_wires_dangling_but_resolvable() {
    let (mut circuit, [top, switch, _, _]) = rung();
    let wire = ConnectionId::between(pin(&circuit, top, 2), pin(&circuit, switch, 0));

    circuit.resize_component(top, 300.0, &config());

    assert_eq!(circuit.dangling_connections(), vec![wire]);
    let conn = &circuit.connections[&wire];
    assert_eq!(absolute_position(&circuit, conn.start_pin_id), Point::ZERO);
    assert_eq!(absolute_position(&circuit, conn.end_pin_id), Point::new(110.0, 100.0));
}

// ─── No-ops ─────────────────────────────────────────────────────────────

#[test]
fn operations_on_missing_ids_leave_state_untouched() {
    let (mut circuit, _) = rung();
    let before = circuit.clone();
    let ghost = ComponentId::intern("ghost_1");

    assert!(!circuit.move_component(ghost, Point::new(1.0, 1.0)));
    assert!(!circuit.relabel_component(ghost, "X"));
    assert!(!circuit.relabel_pin(PinId::intern("ghost_1.p1"), "X"));
    assert!(!circuit.resize_component(ghost, 100.0, &config()));
    assert!(!circuit.delete_component(ghost));
    assert!(!circuit.delete_connection(ConnectionId::intern("a~b")));
    assert!(!circuit.toggle_contact(ghost));

    assert_eq!(circuit, before);
}

// ─── Snapshot ───────────────────────────────────────────────────────────

#[test]
fn state_survives_json_roundtrip() {
    let (circuit, _) = rung();
    let json = serde_json::to_string(&circuit).unwrap();
    let back: CircuitState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, circuit);
}
