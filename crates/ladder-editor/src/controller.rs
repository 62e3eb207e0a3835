//! Interaction state machine for the canvas.
//!
//! Translates semantic canvas events into `CircuitMutation` commands. The
//! controller owns only transient UI state (drag, pending wire, selection,
//! simulation flag); the circuit itself is read through a shared reference
//! and mutated by whoever applies the returned commands.
//!
//! ## Modes
//!
//! | Event | Edit mode | Simulation mode |
//! |-------|-----------|-----------------|
//! | **Component down** | Select + start drag | Toggle contact |
//! | **Pin click** | Start / finish / cancel wire | — |
//! | **Canvas click** | Cancel wire, else deselect | Deselect |
//! | **Pointer move** | Drag or update preview | Update pointer |

use crate::store::CircuitMutation;
use ladder_core::{CircuitState, ComponentId, PinId, Point, Vec2, preview_line};

/// A canvas event, already mapped into canvas-local coordinates and
/// resolved against what lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// Pointer pressed on a component body.
    ComponentDown { id: ComponentId, at: Point },
    /// Click on a pin.
    PinClick { pin: PinId },
    /// Click on a component body (already handled by `ComponentDown`).
    ComponentClick { id: ComponentId },
    /// Click on empty canvas.
    CanvasClick,
    PointerMove { at: Point },
    PointerUp,
    PointerLeave,
}

/// The component being dragged and where it was grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragInfo {
    pub component: ComponentId,
    /// Pointer position minus component position at press time.
    pub grab_offset: Vec2,
}

/// A wire waiting for its second pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectInfo {
    pub start_pin: PinId,
}

/// Coarse state, derived from the transient slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dragging,
    Connecting,
}

/// Transient editing state. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    dragging: Option<DragInfo>,
    connecting: Option<ConnectInfo>,
    live_pointer: Point,
    selected: Option<ComponentId>,
    simulating: bool,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            dragging: None,
            connecting: None,
            live_pointer: Point::ZERO,
            selected: None,
            simulating: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.dragging.is_some() {
            Phase::Dragging
        } else if self.connecting.is_some() {
            Phase::Connecting
        } else {
            Phase::Idle
        }
    }

    pub fn dragging(&self) -> Option<DragInfo> {
        self.dragging
    }

    pub fn connecting(&self) -> Option<ConnectInfo> {
        self.connecting
    }

    pub fn live_pointer(&self) -> Point {
        self.live_pointer
    }

    pub fn selected(&self) -> Option<ComponentId> {
        self.selected
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn select(&mut self, id: Option<ComponentId>) {
        self.selected = id;
    }

    /// Enter or leave simulation mode. Clears selection and abandons any
    /// drag or pending wire.
    pub fn set_simulating(&mut self, simulating: bool) {
        self.simulating = simulating;
        self.selected = None;
        self.dragging = None;
        self.connecting = None;
    }

    /// Drop the pending wire, if any. Returns whether one was pending.
    pub fn cancel_connection(&mut self) -> bool {
        self.connecting.take().is_some()
    }

    /// Forget everything that refers to `id` (after it was deleted).
    pub fn forget_component(&mut self, id: ComponentId, circuit_before: &CircuitState) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.dragging.is_some_and(|d| d.component == id) {
            self.dragging = None;
        }
        if let Some(pending) = self.connecting
            && circuit_before
                .component(id)
                .is_some_and(|c| c.pin(pending.start_pin).is_some())
        {
            self.connecting = None;
        }
    }

    /// Endpoints of the dashed preview wire, if a wire is pending.
    pub fn preview(&self, circuit: &CircuitState) -> Option<(Point, Point)> {
        preview_line(circuit, self.connecting.map(|c| c.start_pin), self.live_pointer)
    }

    /// Handle a canvas event, returning zero or more mutations.
    pub fn handle(&mut self, event: &CanvasEvent, circuit: &CircuitState) -> Vec<CircuitMutation> {
        match *event {
            CanvasEvent::ComponentDown { id, at } => {
                self.live_pointer = at;
                let Some(component) = circuit.component(id) else {
                    return vec![];
                };
                if self.simulating {
                    if component.kind.is_contact() {
                        return vec![CircuitMutation::ToggleContact { id }];
                    }
                    return vec![];
                }
                self.dragging = Some(DragInfo {
                    component: id,
                    grab_offset: at - component.position,
                });
                self.selected = Some(id);
                vec![]
            }
            CanvasEvent::PointerMove { at } => {
                self.live_pointer = at;
                match self.dragging {
                    Some(drag) => vec![CircuitMutation::MoveComponent {
                        id: drag.component,
                        position: at - drag.grab_offset,
                    }],
                    None => vec![],
                }
            }
            CanvasEvent::PointerUp | CanvasEvent::PointerLeave => {
                self.dragging = None;
                vec![]
            }
            CanvasEvent::CanvasClick => {
                if self.connecting.take().is_none() {
                    self.selected = None;
                }
                vec![]
            }
            CanvasEvent::PinClick { pin } => {
                if self.simulating {
                    return vec![];
                }
                match self.connecting.take() {
                    None => {
                        self.connecting = Some(ConnectInfo { start_pin: pin });
                        self.selected = None;
                        vec![]
                    }
                    Some(pending) if pending.start_pin == pin => vec![],
                    Some(pending) => vec![CircuitMutation::AddConnection {
                        start: pending.start_pin,
                        end: pin,
                    }],
                }
            }
            CanvasEvent::ComponentClick { .. } => vec![],
        }
    }
}
