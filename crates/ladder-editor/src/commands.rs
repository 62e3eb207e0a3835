//! Undo/Redo command stack.
//!
//! Every recorded edit is a pair of circuit snapshots (before, after).
//! Circuits are small, so a full copy per step is simpler than computing
//! inverse mutations and cannot drift out of sync with the store.
//!
//! Drag gestures use **batching**: the snapshot is captured when the gesture
//! starts and again when it ends, so undo reverts the whole drag in one step.

use crate::store::{Applied, CircuitMutation, CircuitStore};
use ladder_core::CircuitState;

/// One undoable step.
#[derive(Debug, Clone)]
pub struct Command {
    pub before: CircuitState,
    pub after: CircuitState,
    pub description: String,
}

/// Manages undo/redo stacks with batch grouping for drag gestures.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Snapshot captured at the start of the outermost batch.
    batch_snapshot: Option<CircuitState>,
    batch_description: String,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_description: String::new(),
        }
    }

    /// Start a batch group. All mutations until the matching `end_batch()`
    /// are applied live but recorded as one undo step.
    pub fn begin_batch(&mut self, store: &CircuitStore, description: &str) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(store.snapshot());
            self.batch_description = description.to_string();
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes and the circuit
    /// changed, push one command.
    pub fn end_batch(&mut self, store: &CircuitStore) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }
        if let Some(before) = self.batch_snapshot.take() {
            let after = store.snapshot();
            if before != after {
                let description = std::mem::take(&mut self.batch_description);
                self.push(Command {
                    before,
                    after,
                    description,
                });
            }
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    /// Apply a mutation through the store and record it if it changed anything.
    pub fn execute(&mut self, store: &mut CircuitStore, mutation: CircuitMutation, description: &str) -> Applied {
        if self.batch_depth > 0 {
            // The snapshot at end_batch() captures the cumulative effect.
            return store.apply(mutation);
        }

        let before = store.snapshot();
        let applied = store.apply(mutation);
        if applied.changed() {
            self.push(Command {
                before,
                after: store.snapshot(),
                description: description.to_string(),
            });
        }
        applied
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    /// Undo the last command. Returns its description.
    pub fn undo(&mut self, store: &mut CircuitStore) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        store.restore(cmd.before.clone());
        let desc = cmd.description.clone();
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone command. Returns its description.
    pub fn redo(&mut self, store: &mut CircuitStore) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        store.restore(cmd.after.clone());
        let desc = cmd.description.clone();
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_core::{ComponentId, ComponentKind, EditorConfig, Point};

    fn store_with_lamp() -> (CircuitStore, ComponentId) {
        let mut store = CircuitStore::new(EditorConfig::default());
        let Applied::ComponentAdded(id) = store.apply(CircuitMutation::AddComponent {
            kind: ComponentKind::Lamp,
        }) else {
            panic!("expected ComponentAdded");
        };
        (store, id)
    }

    fn position(store: &CircuitStore, id: ComponentId) -> Point {
        store.circuit().component(id).unwrap().position
    }

    #[test]
    fn undo_redo_move() {
        let (mut store, id) = store_with_lamp();
        let mut stack = CommandStack::new(100);

        stack.execute(
            &mut store,
            CircuitMutation::MoveComponent {
                id,
                position: Point::new(300.0, 40.0),
            },
            "Move lamp",
        );

        assert_eq!(stack.undo(&mut store), Some("Move lamp".to_string()));
        assert_eq!(position(&store, id), Point::new(150.0, 150.0));

        assert_eq!(stack.redo(&mut store), Some("Move lamp".to_string()));
        assert_eq!(position(&store, id), Point::new(300.0, 40.0));
    }

    #[test]
    fn noop_mutations_are_not_recorded() {
        let (mut store, _) = store_with_lamp();
        let mut stack = CommandStack::new(100);
        stack.execute(
            &mut store,
            CircuitMutation::DeleteComponent {
                id: ComponentId::intern("missing"),
            },
            "Delete",
        );
        assert!(!stack.can_undo());
    }

    #[test]
    fn redo_clears_on_new_action() {
        let (mut store, id) = store_with_lamp();
        let mut stack = CommandStack::new(100);

        stack.execute(
            &mut store,
            CircuitMutation::RelabelComponent {
                id,
                label: "H2".into(),
            },
            "relabel",
        );
        stack.undo(&mut store);
        assert!(stack.can_redo());

        stack.execute(
            &mut store,
            CircuitMutation::RelabelComponent {
                id,
                label: "H3".into(),
            },
            "relabel again",
        );
        assert!(!stack.can_redo());
    }

    #[test]
    fn max_depth_trims_oldest() {
        let (mut store, id) = store_with_lamp();
        let mut stack = CommandStack::new(3);

        for i in 0..5 {
            stack.execute(
                &mut store,
                CircuitMutation::MoveComponent {
                    id,
                    position: Point::new(i as f64, 0.0),
                },
                "move",
            );
        }
        let mut undo_count = 0;
        while stack.undo(&mut store).is_some() {
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
        // Oldest surviving step moved from x = 1 to x = 2.
        assert_eq!(position(&store, id), Point::new(1.0, 0.0));
    }

    #[test]
    fn batch_undo_is_single_step() {
        let (mut store, id) = store_with_lamp();
        let mut stack = CommandStack::new(100);

        stack.begin_batch(&store, "drag");
        for step in 1..=5 {
            stack.execute(
                &mut store,
                CircuitMutation::MoveComponent {
                    id,
                    position: Point::new(150.0 + 10.0 * step as f64, 150.0),
                },
                "drag",
            );
        }
        stack.end_batch(&store);

        assert_eq!(stack.undo(&mut store), Some("drag".to_string()));
        assert_eq!(position(&store, id), Point::new(150.0, 150.0));
        assert!(!stack.can_undo());

        stack.redo(&mut store);
        assert_eq!(position(&store, id), Point::new(200.0, 150.0));
    }

    #[test]
    fn nested_batches_record_once() {
        let (mut store, id) = store_with_lamp();
        let mut stack = CommandStack::new(100);

        stack.begin_batch(&store, "outer");
        stack.begin_batch(&store, "inner");
        stack.execute(
            &mut store,
            CircuitMutation::MoveComponent {
                id,
                position: Point::new(1.0, 2.0),
            },
            "move",
        );
        stack.end_batch(&store);
        assert!(!stack.can_undo(), "inner end must not flush");
        stack.end_batch(&store);

        assert_eq!(stack.undo(&mut store), Some("outer".to_string()));
    }

    #[test]
    fn empty_batch_no_undo_entry() {
        let (store, _) = store_with_lamp();
        let mut stack = CommandStack::new(100);
        stack.begin_batch(&store, "drag");
        stack.end_batch(&store);
        assert!(!stack.can_undo());
    }
}
