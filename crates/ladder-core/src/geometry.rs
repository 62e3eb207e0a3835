//! Screen ↔ canvas coordinate mapping.
//!
//! The drawing surface is described by a single affine that maps canvas-local
//! points to screen points (pan, zoom, and rotation folded together). Pointer
//! input goes the other way through its inverse.

use kurbo::{Affine, Point, Vec2};

/// Current transform of the drawing surface.
///
/// `None` until the host has mounted and measured the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceTransform {
    local_to_screen: Option<Affine>,
}

impl SurfaceTransform {
    /// A surface that is mounted with the given local → screen affine.
    pub fn mounted(affine: Affine) -> Self {
        Self {
            local_to_screen: Some(affine),
        }
    }

    pub fn mount(&mut self, affine: Affine) {
        self.local_to_screen = Some(affine);
    }

    pub fn unmount(&mut self) {
        self.local_to_screen = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.local_to_screen.is_some()
    }

    pub fn affine(&self) -> Option<Affine> {
        self.local_to_screen
    }

    /// Map a screen point into canvas-local space.
    ///
    /// Returns the origin when the surface is unmounted or the transform
    /// cannot be inverted.
    pub fn to_local(&self, screen: Point) -> Point {
        match self.local_to_screen {
            Some(affine) if is_invertible(affine) => affine.inverse() * screen,
            _ => Point::ZERO,
        }
    }

    /// Map a canvas-local point to the screen. Identity when unmounted.
    pub fn to_screen(&self, local: Point) -> Point {
        match self.local_to_screen {
            Some(affine) => affine * local,
            None => local,
        }
    }

    /// Uniform zoom factor (geometric mean of the axis scales).
    pub fn zoom(&self) -> f64 {
        self.local_to_screen
            .map(|a| a.determinant().abs().sqrt())
            .unwrap_or(1.0)
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        if let Some(affine) = self.local_to_screen.as_mut() {
            *affine = Affine::translate(delta) * *affine;
        }
    }

    /// Zoom by `factor` about a screen point, clamping the resulting zoom
    /// to `[min, max]`. The canvas point under `anchor` stays put.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64, min: f64, max: f64) {
        let Some(affine) = self.local_to_screen else {
            return;
        };
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let current = self.zoom();
        let target = (current * factor).clamp(min, max);
        let applied = target / current;
        let about = anchor.to_vec2();
        self.local_to_screen =
            Some(Affine::translate(about) * Affine::scale(applied) * Affine::translate(-about) * affine);
    }

    /// Back to the identity transform (keeps the surface mounted).
    pub fn reset(&mut self) {
        if self.local_to_screen.is_some() {
            self.local_to_screen = Some(Affine::IDENTITY);
        }
    }
}

fn is_invertible(affine: Affine) -> bool {
    let det = affine.determinant();
    det.is_finite() && det.abs() > f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn unmounted_surface_maps_to_origin() {
        let surface = SurfaceTransform::default();
        assert_eq!(surface.to_local(Point::new(40.0, 90.0)), Point::ZERO);
    }

    #[test]
    fn singular_transform_maps_to_origin() {
        let surface = SurfaceTransform::mounted(Affine::scale(0.0));
        assert_eq!(surface.to_local(Point::new(1.0, 1.0)), Point::ZERO);
    }

    #[test]
    fn pan_and_zoom_are_inverted() {
        // Canvas panned by (100, 50) then zoomed 2×.
        let surface = SurfaceTransform::mounted(Affine::translate((100.0, 50.0)) * Affine::scale(2.0));
        assert!(close(surface.to_local(Point::new(300.0, 250.0)), Point::new(100.0, 100.0)));
    }

    #[test]
    fn rotation_is_inverted() {
        let affine = Affine::rotate(std::f64::consts::FRAC_PI_2);
        let surface = SurfaceTransform::mounted(affine);
        let local = Point::new(3.0, 4.0);
        assert!(close(surface.to_local(surface.to_screen(local)), local));
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut surface = SurfaceTransform::mounted(Affine::translate((20.0, 10.0)));
        let anchor = Point::new(200.0, 150.0);
        let before = surface.to_local(anchor);
        surface.zoom_about(anchor, 1.5, 0.1, 8.0);
        assert!((surface.zoom() - 1.5).abs() < 1e-9);
        assert!(close(surface.to_local(anchor), before));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut surface = SurfaceTransform::mounted(Affine::IDENTITY);
        surface.zoom_about(Point::ZERO, 100.0, 0.1, 8.0);
        assert!((surface.zoom() - 8.0).abs() < 1e-9);
        surface.zoom_about(Point::ZERO, 1e-6, 0.1, 8.0);
        assert!((surface.zoom() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn pan_shifts_local_points() {
        let mut surface = SurfaceTransform::mounted(Affine::IDENTITY);
        surface.pan(Vec2::new(30.0, -10.0));
        assert!(close(surface.to_local(Point::new(30.0, -10.0)), Point::ZERO));
    }
}
