pub mod commands;
pub mod controller;
pub mod editor;
pub mod input;
pub mod shortcuts;
pub mod store;

pub use commands::CommandStack;
pub use controller::{CanvasEvent, InteractionController, Phase};
pub use editor::{Editor, EditorView, WireView};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{Applied, CircuitMutation, CircuitStore};
