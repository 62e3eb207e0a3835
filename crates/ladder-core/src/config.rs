//! Editor configuration.
//!
//! Every field has a default, so a host can override only what it needs:
//! `{"pin_spacing": 25}` is a complete config.

use kurbo::Point;
use serde::Deserialize;

/// Distance between neighbouring pins on a power rail, in canvas units.
pub const PIN_SPACING: f64 = 20.0;

/// Width of a freshly placed power rail.
pub const DEFAULT_RAIL_WIDTH: f64 = 400.0;

/// Widest rail a resize accepts.
pub const MAX_RAIL_WIDTH: f64 = 4000.0;

/// Tunables shared by the model, the hit tester, and the editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Rail pin spacing. A rail of width `w` carries `floor(w / pin_spacing)` pins.
    pub pin_spacing: f64,

    /// Width given to new rails.
    pub default_rail_width: f64,

    /// Resizes beyond this width are refused.
    pub max_rail_width: f64,

    /// Where new components are placed.
    pub spawn: Point,

    /// Radius around a pin centre that counts as a hit.
    pub pin_hit_radius: f64,

    /// Maximum pointer travel (screen units) between press and release
    /// for the gesture to count as a click.
    pub click_slop: f64,

    /// Maximum undo depth.
    pub undo_depth: usize,

    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pin_spacing: PIN_SPACING,
            default_rail_width: DEFAULT_RAIL_WIDTH,
            max_rail_width: MAX_RAIL_WIDTH,
            spawn: Point::new(150.0, 150.0),
            pin_hit_radius: 6.0,
            click_slop: 3.0,
            undo_depth: 200,
            min_zoom: 0.1,
            max_zoom: 8.0,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, falling back to defaults for missing fields.
    ///
    /// # Errors
    /// Returns a message if the JSON is malformed or a value is out of range.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(text).map_err(|e| format!("invalid config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.pin_spacing.is_finite() && self.pin_spacing > 0.0) {
            return Err(format!("pin_spacing must be positive, got {}", self.pin_spacing));
        }
        if !(self.default_rail_width.is_finite() && self.default_rail_width >= 0.0) {
            return Err(format!(
                "default_rail_width must be non-negative, got {}",
                self.default_rail_width
            ));
        }
        if !(self.max_rail_width.is_finite() && self.max_rail_width >= self.default_rail_width) {
            return Err(format!(
                "max_rail_width must be finite and at least default_rail_width, got {}",
                self.max_rail_width
            ));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(format!(
                "zoom range is empty: min_zoom={} max_zoom={}",
                self.min_zoom, self.max_zoom
            ));
        }
        Ok(())
    }
}
