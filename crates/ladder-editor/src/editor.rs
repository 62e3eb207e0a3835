//! The editor facade a host UI talks to.
//!
//! Holds the circuit store, interaction controller, surface transform, and
//! command stack. All interaction from the host goes through this struct:
//! raw pointer/key input via `handle_input`, or the semantic operations
//! (`pin_click`, `add_component`, …) when the host does its own hit testing.
//! After any call the host re-reads `view()` and redraws.

use crate::commands::CommandStack;
use crate::controller::{CanvasEvent, InteractionController, Phase};
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::store::{Applied, CircuitMutation, CircuitStore};
use ladder_core::{
    Affine, CircuitComponent, CircuitState, ComponentId, ComponentKind, ConnectionId, EditorConfig, Hit, PinId,
    Point, SurfaceTransform, Vec2, absolute_position, find_pin, hit_test,
};
use serde::Serialize;

/// Zoom step used by the zoom shortcuts.
const ZOOM_STEP: f64 = 1.25;

/// A press that may still turn into a click.
#[derive(Debug, Clone, Copy)]
struct Press {
    screen: Point,
    target: Option<Hit>,
    moved: bool,
}

pub struct Editor {
    store: CircuitStore,
    controller: InteractionController,
    surface: SurfaceTransform,
    commands: CommandStack,
    press: Option<Press>,
}

/// A wire with both endpoints resolved for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireView {
    pub id: ConnectionId,
    pub from: Point,
    pub to: Point,
    /// At least one endpoint no longer resolves (drawn from the origin).
    pub dangling: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct EditorView<'a> {
    /// Bottom to top.
    pub components: Vec<&'a CircuitComponent>,
    pub wires: Vec<WireView>,
    pub selected: Option<ComponentId>,
    pub simulating: bool,
    /// Dashed preview wire from the pending pin to the pointer.
    pub preview: Option<(Point, Point)>,
    pub revision: u64,
}

impl EditorView<'_> {
    /// JSON for a host bridge.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("view serialization failed: {e}");
            "{}".to_string()
        })
    }
}

impl Editor {
    /// Create an editor with an empty circuit and an unmounted surface.
    pub fn new(config: EditorConfig) -> Self {
        let commands = CommandStack::new(config.undo_depth);
        Self {
            store: CircuitStore::new(config),
            controller: InteractionController::new(),
            surface: SurfaceTransform::default(),
            commands,
            press: None,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn circuit(&self) -> &CircuitState {
        self.store.circuit()
    }

    pub fn config(&self) -> &EditorConfig {
        self.store.config()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn surface(&self) -> &SurfaceTransform {
        &self.surface
    }

    pub fn selected(&self) -> Option<ComponentId> {
        self.controller.selected()
    }

    pub fn is_simulating(&self) -> bool {
        self.controller.is_simulating()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn preview(&self) -> Option<(Point, Point)> {
        self.controller.preview(self.store.circuit())
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    /// Build the render view for the current state.
    pub fn view(&self) -> EditorView<'_> {
        let circuit = self.store.circuit();
        let mut wires: Vec<WireView> = circuit
            .connections
            .values()
            .map(|c| WireView {
                id: c.id,
                from: absolute_position(circuit, c.start_pin_id),
                to: absolute_position(circuit, c.end_pin_id),
                dangling: find_pin(circuit, c.start_pin_id).is_none() || find_pin(circuit, c.end_pin_id).is_none(),
            })
            .collect();
        wires.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

        EditorView {
            components: circuit.components_in_order().collect(),
            wires,
            selected: self.controller.selected(),
            simulating: self.controller.is_simulating(),
            preview: self.preview(),
            revision: self.store.revision(),
        }
    }

    // ─── Surface ─────────────────────────────────────────────────────────

    /// The host measured its drawing surface; `affine` maps canvas → screen.
    pub fn mount_surface(&mut self, affine: Affine) {
        self.surface.mount(affine);
    }

    pub fn unmount_surface(&mut self) {
        self.surface.unmount();
    }

    fn zoom_about(&mut self, anchor: Point, factor: f64) {
        let (min, max) = (self.config().min_zoom, self.config().max_zoom);
        self.surface.zoom_about(anchor, factor, min, max);
    }

    // ─── Raw input ───────────────────────────────────────────────────────

    /// Handle a raw host event. Returns `true` if anything visible changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let before = (self.store.revision(), self.controller.clone(), self.surface);

        match event {
            InputEvent::PointerDown { x, y, .. } => {
                let screen = Point::new(*x, *y);
                let local = self.surface.to_local(screen);
                let target = hit_test(self.store.circuit(), local, self.config().pin_hit_radius);
                self.press = Some(Press {
                    screen,
                    target,
                    moved: false,
                });
                if let Some(Hit::Component(id)) = target {
                    self.dispatch(CanvasEvent::ComponentDown { id, at: local });
                }
            }
            InputEvent::PointerMove { x, y, .. } => {
                let screen = Point::new(*x, *y);
                let slop = self.config().click_slop;
                if let Some(press) = self.press.as_mut()
                    && press.screen.distance(screen) > slop
                {
                    press.moved = true;
                }
                self.pointer_move(screen);
            }
            InputEvent::PointerUp { x, y, .. } => {
                let local = self.surface.to_local(Point::new(*x, *y));
                self.pointer_up();
                if let Some(press) = self.press.take()
                    && !press.moved
                {
                    let release = hit_test(self.store.circuit(), local, self.config().pin_hit_radius);
                    match (press.target, release) {
                        (Some(Hit::Pin(pin)), Some(Hit::Pin(up))) if pin == up => self.pin_click(pin),
                        (Some(Hit::Component(id)), Some(Hit::Component(up))) if id == up => self.component_click(id),
                        (None, None) => self.canvas_click(),
                        _ => {}
                    }
                }
            }
            InputEvent::PointerLeave => {
                self.press = None;
                self.pointer_leave();
            }
            InputEvent::Scroll { x, y, dx, dy, zoom } => {
                self.surface.pan(Vec2::new(*dx, *dy));
                if *zoom != 1.0 {
                    self.zoom_about(Point::new(*x, *y), *zoom);
                }
            }
            InputEvent::Key { key, modifiers } => {
                if let Some(action) =
                    ShortcutMap::resolve(key, modifiers.ctrl, modifiers.shift, modifiers.alt, modifiers.meta)
                {
                    self.perform(action);
                }
            }
        }

        before != (self.store.revision(), self.controller.clone(), self.surface)
    }

    /// Run a shortcut action.
    pub fn perform(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Delete => {
                if let Some(id) = self.controller.selected() {
                    self.delete_component(id);
                }
            }
            ShortcutAction::Cancel => {
                if !self.controller.cancel_connection() {
                    self.controller.select(None);
                }
            }
            ShortcutAction::ToggleSimulation => {
                self.toggle_simulation();
            }
            ShortcutAction::ZoomIn | ShortcutAction::ZoomOut => {
                let factor = if action == ShortcutAction::ZoomIn {
                    ZOOM_STEP
                } else {
                    1.0 / ZOOM_STEP
                };
                let anchor = self.surface.to_screen(self.controller.live_pointer());
                self.zoom_about(anchor, factor);
            }
            ShortcutAction::ResetView => self.surface.reset(),
        }
    }

    // ─── Semantic pointer operations ─────────────────────────────────────

    /// Pointer pressed on a component body at a screen point.
    pub fn pointer_down_on_component(&mut self, id: ComponentId, screen: Point) {
        let at = self.surface.to_local(screen);
        self.dispatch(CanvasEvent::ComponentDown { id, at });
    }

    pub fn pointer_move(&mut self, screen: Point) {
        let at = self.surface.to_local(screen);
        self.dispatch(CanvasEvent::PointerMove { at });
    }

    pub fn pointer_up(&mut self) {
        self.dispatch(CanvasEvent::PointerUp);
    }

    pub fn pointer_leave(&mut self) {
        self.dispatch(CanvasEvent::PointerLeave);
    }

    pub fn pin_click(&mut self, pin: PinId) {
        self.dispatch(CanvasEvent::PinClick { pin });
    }

    pub fn component_click(&mut self, id: ComponentId) {
        self.dispatch(CanvasEvent::ComponentClick { id });
    }

    pub fn canvas_click(&mut self) {
        self.dispatch(CanvasEvent::CanvasClick);
    }

    fn dispatch(&mut self, event: CanvasEvent) {
        let was_dragging = self.controller.phase() == Phase::Dragging;
        let mutations = self.controller.handle(&event, self.store.circuit());
        let dragging = self.controller.phase() == Phase::Dragging;

        if !was_dragging && dragging {
            self.commands.begin_batch(&self.store, "Move component");
        }
        for mutation in mutations {
            self.apply(mutation);
        }
        if was_dragging && !dragging {
            self.commands.end_batch(&self.store);
        }
    }

    fn apply(&mut self, mutation: CircuitMutation) -> Applied {
        let description = match &mutation {
            // Contact toggles bypass the history.
            CircuitMutation::ToggleContact { .. } => return self.store.apply(mutation),
            CircuitMutation::AddComponent { .. } => "Add component",
            CircuitMutation::MoveComponent { .. } => "Move component",
            CircuitMutation::RelabelComponent { .. } => "Rename component",
            CircuitMutation::RelabelPin { .. } => "Rename pin",
            CircuitMutation::ResizeRail { .. } => "Resize rail",
            CircuitMutation::DeleteComponent { .. } => "Delete component",
            CircuitMutation::DeleteConnection { .. } => "Delete wire",
            CircuitMutation::AddConnection { .. } => "Connect pins",
        };
        self.commands.execute(&mut self.store, mutation, description)
    }

    // ─── Semantic edit operations ────────────────────────────────────────

    /// Place a component at the spawn point and select it.
    ///
    /// Refused while simulating.
    pub fn add_component(&mut self, kind: ComponentKind) -> Option<ComponentId> {
        if self.controller.is_simulating() {
            log::debug!("add {}: refused in simulation mode", kind.tag());
            return None;
        }
        match self.apply(CircuitMutation::AddComponent { kind }) {
            Applied::ComponentAdded(id) => {
                self.controller.select(Some(id));
                Some(id)
            }
            _ => None,
        }
    }

    /// Same as `add_component`, from a palette tag. Unknown tags are ignored.
    pub fn add_component_by_tag(&mut self, tag: &str) -> Option<ComponentId> {
        match ComponentKind::from_tag(tag) {
            Some(kind) => self.add_component(kind),
            None => {
                log::debug!("add: unknown component tag {tag:?}");
                None
            }
        }
    }

    /// Delete a component and its wires.
    pub fn delete_component(&mut self, id: ComponentId) -> bool {
        if self.store.circuit().component(id).is_none() {
            return false;
        }
        let was_dragging = self.controller.phase() == Phase::Dragging;
        self.controller.forget_component(id, self.store.circuit());
        if was_dragging && self.controller.phase() != Phase::Dragging {
            self.commands.end_batch(&self.store);
        }
        self.apply(CircuitMutation::DeleteComponent { id }).changed()
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        self.apply(CircuitMutation::DeleteConnection { id }).changed()
    }

    pub fn relabel_component(&mut self, id: ComponentId, label: &str) -> bool {
        self.apply(CircuitMutation::RelabelComponent {
            id,
            label: label.to_string(),
        })
        .changed()
    }

    pub fn relabel_pin(&mut self, id: PinId, label: &str) -> bool {
        self.apply(CircuitMutation::RelabelPin {
            id,
            label: label.to_string(),
        })
        .changed()
    }

    pub fn resize_rail(&mut self, id: ComponentId, width: f64) -> bool {
        let changed = self.apply(CircuitMutation::ResizeRail { id, width }).changed();
        if changed {
            self.drop_stale_pending_wire();
        }
        changed
    }

    /// Flip simulation mode. Returns the new mode.
    pub fn toggle_simulation(&mut self) -> bool {
        let simulating = !self.controller.is_simulating();
        let was_dragging = self.controller.phase() == Phase::Dragging;
        self.controller.set_simulating(simulating);
        if was_dragging {
            self.commands.end_batch(&self.store);
        }
        self.press = None;
        log::debug!("simulation {}", if simulating { "on" } else { "off" });
        simulating
    }

    /// Clear the selection (closing the details panel).
    pub fn clear_selection(&mut self) {
        self.controller.select(None);
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Undo the last edit. Ignored mid-drag.
    pub fn undo(&mut self) -> Option<String> {
        if self.commands.is_batching() {
            return None;
        }
        let desc = self.commands.undo(&mut self.store)?;
        self.drop_stale_references();
        Some(desc)
    }

    /// Redo the last undone edit. Ignored mid-drag.
    pub fn redo(&mut self) -> Option<String> {
        if self.commands.is_batching() {
            return None;
        }
        let desc = self.commands.redo(&mut self.store)?;
        self.drop_stale_references();
        Some(desc)
    }

    fn drop_stale_references(&mut self) {
        if let Some(id) = self.controller.selected()
            && self.store.circuit().component(id).is_none()
        {
            self.controller.select(None);
        }
        self.drop_stale_pending_wire();
    }

    fn drop_stale_pending_wire(&mut self) {
        if let Some(pending) = self.controller.connecting()
            && find_pin(self.store.circuit(), pending.start_pin).is_none()
        {
            self.controller.cancel_connection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn editor() -> Editor {
        let mut editor = Editor::new(EditorConfig::default());
        editor.mount_surface(Affine::IDENTITY);
        editor
    }

    #[test]
    fn add_selects_new_component() {
        let mut ed = editor();
        let id = ed.add_component(ComponentKind::Coil).unwrap();
        assert_eq!(ed.selected(), Some(id));
        assert!(ed.can_undo());
    }

    #[test]
    fn add_refused_while_simulating() {
        let mut ed = editor();
        ed.toggle_simulation();
        assert_eq!(ed.add_component(ComponentKind::Lamp), None);
        assert!(ed.circuit().components.is_empty());
    }

    #[test]
    fn unknown_tag_is_ignored() {
        let mut ed = editor();
        assert_eq!(ed.add_component_by_tag("flux-capacitor"), None);
        assert!(ed.add_component_by_tag("motor").is_some());
    }

    #[test]
    fn delete_clears_selection() {
        let mut ed = editor();
        let id = ed.add_component(ComponentKind::Motor).unwrap();
        assert!(ed.delete_component(id));
        assert_eq!(ed.selected(), None);
        assert!(!ed.delete_component(id));
    }

    #[test]
    fn escape_cancels_wire_then_selection() {
        let mut ed = editor();
        let id = ed.add_component(ComponentKind::Coil).unwrap();
        let a1 = ed.circuit().component(id).unwrap().pins[0].id;
        ed.pin_click(a1);
        ed.controller.select(Some(id));

        ed.handle_input(&InputEvent::key("Escape"));
        assert_eq!(ed.phase(), Phase::Idle);
        assert_eq!(ed.selected(), Some(id));

        ed.handle_input(&InputEvent::key("Escape"));
        assert_eq!(ed.selected(), None);
    }

    #[test]
    fn delete_key_removes_selected() {
        let mut ed = editor();
        let id = ed.add_component(ComponentKind::Lamp).unwrap();
        assert!(ed.handle_input(&InputEvent::key("Delete")));
        assert!(ed.circuit().component(id).is_none());
    }

    #[test]
    fn ctrl_z_undoes_add() {
        let mut ed = editor();
        let id = ed.add_component(ComponentKind::Lamp).unwrap();
        ed.handle_input(&InputEvent::Key {
            key: "z".into(),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        });
        assert!(ed.circuit().component(id).is_none());
        assert_eq!(ed.selected(), None, "selection of an undone component is dropped");
    }

    #[test]
    fn scroll_zooms_about_pointer() {
        let mut ed = editor();
        ed.handle_input(&InputEvent::Scroll {
            x: 100.0,
            y: 100.0,
            dx: 0.0,
            dy: 0.0,
            zoom: 2.0,
        });
        assert!((ed.surface().zoom() - 2.0).abs() < 1e-9);
        let fixed = ed.surface().to_local(Point::new(100.0, 100.0));
        assert!((fixed - Point::new(100.0, 100.0)).hypot() < 1e-9);
    }

    #[test]
    fn view_lists_components_bottom_to_top() {
        let mut ed = editor();
        let a = ed.add_component(ComponentKind::Coil).unwrap();
        let b = ed.add_component(ComponentKind::Lamp).unwrap();
        let view = ed.view();
        let ids: Vec<ComponentId> = view.components.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(view.selected, Some(b));
    }

    #[test]
    fn view_json_has_expected_keys() {
        let mut ed = editor();
        ed.add_component(ComponentKind::NormallyOpen);
        let json: serde_json::Value = serde_json::from_str(&ed.view().to_json()).unwrap();
        assert_eq!(json["simulating"], serde_json::json!(false));
        assert_eq!(json["components"][0]["kind"], serde_json::json!("normally-open"));
        assert_eq!(json["components"][0]["state"]["is_open"], serde_json::json!(true));
    }
}
