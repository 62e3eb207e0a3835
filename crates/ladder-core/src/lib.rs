pub mod config;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod kinds;
pub mod model;
pub mod pins;
pub mod resolve;

pub use config::EditorConfig;
pub use geometry::SurfaceTransform;
pub use hit::{Hit, hit_test};
pub use id::{ComponentId, ConnectionId, PinId};
pub use kinds::ComponentKind;
pub use model::*;
pub use pins::layout_pins;
pub use resolve::{absolute_position, cascade_connections, find_pin, preview_line};

// Re-export geometry primitives so downstream crates share one kurbo version
pub use kurbo::{Affine, Point, Vec2};
