//! Core circuit data model.
//!
//! A `CircuitState` owns components and wires. Components own their pins;
//! wires reference pins by id only, so every lookup through a wire must
//! tolerate a missing pin.
//!
//! All mutating operations are total: a stale id is a silent no-op that
//! reports `false`/`None`, never a panic.

use crate::config::EditorConfig;
use crate::id::{ComponentId, ConnectionId, PinId};
use crate::kinds::{ComponentKind, PinTemplate, RAIL_BAND};
use crate::pins::layout_pins;
use crate::resolve::{cascade_connections, find_pin};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

// ─── Pins ────────────────────────────────────────────────────────────────

/// A connection point on a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    /// Owning component (non-owning back-reference).
    pub component_id: ComponentId,
    pub label: String,
    /// Offset from the owner's origin.
    pub position: Point,
}

// ─── Components ──────────────────────────────────────────────────────────

/// Per-kind state, carrying only the fields that kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentState {
    /// Switch or pushbutton. `is_open` means non-conducting as drawn.
    Contact { is_open: bool },
    /// Power rail. `revision` bumps on every resize and is folded into pin ids.
    Rail { width: f64, revision: u32 },
    /// Coils, motors, lamps.
    Plain,
}

impl ComponentState {
    /// Initial state for a freshly placed `kind`.
    pub fn initial(kind: ComponentKind, config: &EditorConfig) -> Self {
        if let Some(is_open) = kind.rests_open() {
            ComponentState::Contact { is_open }
        } else if kind.is_rail() {
            ComponentState::Rail {
                width: config.default_rail_width,
                revision: 0,
            }
        } else {
            ComponentState::Plain
        }
    }
}

/// A placed circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitComponent {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub label: String,
    /// Absolute top-left anchor for pin offsets.
    pub position: Point,
    pub pins: SmallVec<[Pin; 2]>,
    pub state: ComponentState,
}

impl CircuitComponent {
    /// Build a component of `kind` with default state and pins at `position`.
    pub fn new(id: ComponentId, kind: ComponentKind, label: String, position: Point, config: &EditorConfig) -> Self {
        let state = ComponentState::initial(kind, config);
        let pins = layout_pins(id, kind, &state, config.pin_spacing);
        Self {
            id,
            kind,
            label,
            position,
            pins,
            state,
        }
    }

    /// Contact state, if this is a switch or pushbutton.
    pub fn is_open(&self) -> Option<bool> {
        match self.state {
            ComponentState::Contact { is_open } => Some(is_open),
            _ => None,
        }
    }

    /// Rail width, if this is a power rail.
    pub fn width(&self) -> Option<f64> {
        match self.state {
            ComponentState::Rail { width, .. } => Some(width),
            _ => None,
        }
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    pub fn pin_ids(&self) -> impl Iterator<Item = PinId> + '_ {
        self.pins.iter().map(|p| p.id)
    }

    /// Absolute body rectangle used for hit testing.
    pub fn bounds(&self) -> Rect {
        let spec = self.kind.spec();
        match (spec.pins, self.state) {
            (PinTemplate::Rail, ComponentState::Rail { width, .. }) => Rect::new(
                self.position.x,
                self.position.y - RAIL_BAND,
                self.position.x + width,
                self.position.y + RAIL_BAND,
            ),
            _ => Rect::from_origin_size(self.position, spec.body),
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A wire between two pins. Direction is creation order only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub start_pin_id: PinId,
    pub end_pin_id: PinId,
}

impl Connection {
    pub fn touches(&self, pin: PinId) -> bool {
        self.start_pin_id == pin || self.end_pin_id == pin
    }

    /// Whether this wire joins the same unordered pair as `a`–`b`.
    pub fn joins(&self, a: PinId, b: PinId) -> bool {
        (self.start_pin_id == a && self.end_pin_id == b) || (self.start_pin_id == b && self.end_pin_id == a)
    }
}

// ─── Circuit ─────────────────────────────────────────────────────────────

/// The complete circuit: components, wires, and paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitState {
    pub components: HashMap<ComponentId, CircuitComponent>,
    pub connections: HashMap<ConnectionId, Connection>,
    /// Component ids in creation order; last is topmost.
    pub draw_order: Vec<ComponentId>,
}

impl CircuitState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(&self, id: ComponentId) -> Option<&CircuitComponent> {
        self.components.get(&id)
    }

    /// Components bottom to top.
    pub fn components_in_order(&self) -> impl DoubleEndedIterator<Item = &CircuitComponent> + '_ {
        self.draw_order.iter().filter_map(|id| self.components.get(id))
    }

    /// Place a new component of `kind` at the configured spawn point.
    pub fn add_component(&mut self, kind: ComponentKind, config: &EditorConfig) -> ComponentId {
        let spec = kind.spec();
        let id = loop {
            let candidate = ComponentId::with_prefix(spec.id_prefix);
            if !self.components.contains_key(&candidate) {
                break candidate;
            }
        };
        let label = self.default_label(kind);
        let component = CircuitComponent::new(id, kind, label, config.spawn, config);
        log::debug!("add {} as {id} ({} pins)", spec.tag, component.pins.len());
        self.components.insert(id, component);
        self.draw_order.push(id);
        id
    }

    /// `+24V` / `0V` for rails, otherwise the first free `<designator><n>`.
    fn default_label(&self, kind: ComponentKind) -> String {
        let designator = kind.spec().designator;
        if kind.is_rail() {
            return designator.to_string();
        }
        let taken: HashSet<&str> = self.components.values().map(|c| c.label.as_str()).collect();
        (1..)
            .map(|n| format!("{designator}{n}"))
            .find(|label| !taken.contains(label.as_str()))
            .unwrap_or_else(|| designator.to_string())
    }

    /// Move a component to an absolute position.
    pub fn move_component(&mut self, id: ComponentId, position: Point) -> bool {
        match self.components.get_mut(&id) {
            Some(component) => {
                component.position = position;
                true
            }
            None => {
                log::debug!("move: no component {id}");
                false
            }
        }
    }

    pub fn relabel_component(&mut self, id: ComponentId, label: &str) -> bool {
        match self.components.get_mut(&id) {
            Some(component) => {
                component.label = label.to_string();
                true
            }
            None => {
                log::debug!("relabel: no component {id}");
                false
            }
        }
    }

    pub fn relabel_pin(&mut self, pin_id: PinId, label: &str) -> bool {
        let pin = self
            .components
            .values_mut()
            .flat_map(|c| c.pins.iter_mut())
            .find(|p| p.id == pin_id);
        match pin {
            Some(pin) => {
                pin.label = label.to_string();
                true
            }
            None => {
                log::debug!("relabel: no pin {pin_id}");
                false
            }
        }
    }

    /// Change a rail's width and regenerate its pins under a new revision.
    ///
    /// Wires on the old pins are left dangling. Non-rails, missing ids,
    /// negative or non-finite widths, widths above `max_rail_width`, and
    /// unchanged widths are no-ops.
    pub fn resize_component(&mut self, id: ComponentId, width: f64, config: &EditorConfig) -> bool {
        if !(width.is_finite() && width >= 0.0 && width <= config.max_rail_width) {
            log::debug!("resize: rejected width {width} for {id}");
            return false;
        }
        let Some(component) = self.components.get_mut(&id) else {
            log::debug!("resize: no component {id}");
            return false;
        };
        let ComponentState::Rail {
            width: old_width,
            revision,
        } = component.state
        else {
            log::debug!("resize: {id} is not a rail");
            return false;
        };
        if old_width == width {
            return false;
        }
        component.state = ComponentState::Rail {
            width,
            revision: revision + 1,
        };
        component.pins = layout_pins(id, component.kind, &component.state, config.pin_spacing);
        log::debug!("resize {id}: {old_width} -> {width} ({} pins)", component.pins.len());
        true
    }

    /// Remove a component and every wire touching one of its pins.
    pub fn delete_component(&mut self, id: ComponentId) -> bool {
        if !self.components.contains_key(&id) {
            log::debug!("delete: no component {id}");
            return false;
        }
        // Collected before removal: the pin set disappears with the owner.
        let doomed = cascade_connections(self, id);
        for conn in &doomed {
            self.connections.remove(conn);
        }
        self.components.remove(&id);
        self.draw_order.retain(|c| *c != id);
        log::debug!("delete {id} (+{} wires)", doomed.len());
        true
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        let removed = self.connections.remove(&id).is_some();
        if !removed {
            log::debug!("delete: no wire {id}");
        }
        removed
    }

    /// Wire `start` to `end`.
    ///
    /// Refuses self-connections, endpoints that do not resolve, and a second
    /// wire between an already joined pair (in either direction).
    pub fn add_connection(&mut self, start: PinId, end: PinId) -> Option<ConnectionId> {
        if start == end {
            log::debug!("connect: refused self-connection on {start}");
            return None;
        }
        if find_pin(self, start).is_none() || find_pin(self, end).is_none() {
            log::debug!("connect: unresolved endpoint {start} / {end}");
            return None;
        }
        if self.connections.values().any(|c| c.joins(start, end)) {
            log::debug!("connect: {start} and {end} are already wired");
            return None;
        }
        let id = ConnectionId::between(start, end);
        self.connections.insert(
            id,
            Connection {
                id,
                start_pin_id: start,
                end_pin_id: end,
            },
        );
        Some(id)
    }

    /// Flip a switch or pushbutton contact.
    pub fn toggle_contact(&mut self, id: ComponentId) -> bool {
        match self.components.get_mut(&id).map(|c| &mut c.state) {
            Some(ComponentState::Contact { is_open }) => {
                *is_open = !*is_open;
                true
            }
            _ => {
                log::debug!("toggle: {id} has no contact");
                false
            }
        }
    }

    /// Copy the contact positions of `live` onto the matching components
    /// here. Components missing from either side are left alone.
    pub fn adopt_contacts(&mut self, live: &CircuitState) {
        for (id, component) in &mut self.components {
            if let ComponentState::Contact { is_open } = &mut component.state
                && let Some(current) = live.component(*id).and_then(CircuitComponent::is_open)
            {
                *is_open = current;
            }
        }
    }

    /// Wires with at least one endpoint that no longer resolves.
    pub fn dangling_connections(&self) -> Vec<ConnectionId> {
        let mut dangling: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| find_pin(self, c.start_pin_id).is_none() || find_pin(self, c.end_pin_id).is_none())
            .map(|c| c.id)
            .collect();
        dangling.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        dangling
    }
}
