//! Circuit store: the single owner of the authoritative `CircuitState`.
//!
//! Interaction code never touches the circuit directly. It produces
//! `CircuitMutation` values and the store applies them, bumping a revision
//! counter whenever the circuit actually changed so a renderer knows when
//! to redraw.

use ladder_core::{CircuitState, ComponentId, ComponentKind, ConnectionId, EditorConfig, PinId, Point};

/// A mutation that can be applied to the circuit from editor interactions.
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitMutation {
    AddComponent { kind: ComponentKind },
    MoveComponent { id: ComponentId, position: Point },
    RelabelComponent { id: ComponentId, label: String },
    RelabelPin { id: PinId, label: String },
    ResizeRail { id: ComponentId, width: f64 },
    DeleteComponent { id: ComponentId },
    DeleteConnection { id: ConnectionId },
    AddConnection { start: PinId, end: PinId },
    /// Flip a switch contact (simulation mode).
    ToggleContact { id: ComponentId },
}

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Nothing changed (stale id, refused input).
    Unchanged,
    Changed,
    ComponentAdded(ComponentId),
    ConnectionAdded(ConnectionId),
}

impl Applied {
    pub fn changed(self) -> bool {
        !matches!(self, Applied::Unchanged)
    }
}

/// Holds the circuit and the config its operations need.
pub struct CircuitStore {
    circuit: CircuitState,
    config: EditorConfig,
    revision: u64,
}

impl CircuitStore {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            circuit: CircuitState::new(),
            config,
            revision: 0,
        }
    }

    pub fn circuit(&self) -> &CircuitState {
        &self.circuit
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Incremented on every effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A detached copy of the current circuit.
    pub fn snapshot(&self) -> CircuitState {
        self.circuit.clone()
    }

    /// Replace the whole circuit (undo/redo).
    ///
    /// Contact positions are not history: every contact that survives the
    /// swap keeps its current position.
    pub fn restore(&mut self, mut circuit: CircuitState) {
        circuit.adopt_contacts(&self.circuit);
        if self.circuit != circuit {
            self.circuit = circuit;
            self.revision += 1;
        }
    }

    /// Apply a mutation. Stale ids and refused input report `Unchanged`.
    pub fn apply(&mut self, mutation: CircuitMutation) -> Applied {
        let circuit = &mut self.circuit;
        let applied = match mutation {
            CircuitMutation::AddComponent { kind } => {
                Applied::ComponentAdded(circuit.add_component(kind, &self.config))
            }
            CircuitMutation::MoveComponent { id, position } => {
                log::trace!("move {id} to ({}, {})", position.x, position.y);
                changed(circuit.move_component(id, position))
            }
            CircuitMutation::RelabelComponent { id, label } => changed(circuit.relabel_component(id, &label)),
            CircuitMutation::RelabelPin { id, label } => changed(circuit.relabel_pin(id, &label)),
            CircuitMutation::ResizeRail { id, width } => {
                changed(circuit.resize_component(id, width, &self.config))
            }
            CircuitMutation::DeleteComponent { id } => changed(circuit.delete_component(id)),
            CircuitMutation::DeleteConnection { id } => changed(circuit.delete_connection(id)),
            CircuitMutation::AddConnection { start, end } => circuit
                .add_connection(start, end)
                .map_or(Applied::Unchanged, Applied::ConnectionAdded),
            CircuitMutation::ToggleContact { id } => changed(circuit.toggle_contact(id)),
        };
        if applied.changed() {
            self.revision += 1;
        }
        applied
    }
}

fn changed(flag: bool) -> Applied {
    if flag { Applied::Changed } else { Applied::Unchanged }
}
