//! Screen geometry for the wave
//!
//! Both anchors sit on a horizontal baseline near the bottom of the
//! viewport; arcs are concentric half circles above its midpoint.

use glam::Vec2;

use crate::consts::*;
use crate::polar_to_cartesian;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub start: Vec2,
    pub end: Vec2,
    pub center: Vec2,
    pub line_length: f32,
    /// Radius of arc 0
    pub inner_radius: f32,
    /// Gap between neighbouring arcs
    pub spacing: f32,
}

impl Layout {
    pub fn new(width: u32, height: u32, number_of_arcs: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let start = Vec2::new(w * BASELINE_START_X, h * BASELINE_Y);
        let end = Vec2::new(w * BASELINE_END_X, h * BASELINE_Y);
        let center = Vec2::new(w * 0.5, h * BASELINE_Y);
        let line_length = end.x - start.x;

        let inner_radius = line_length * INNER_RADIUS_FRACTION;
        let outer_radius = line_length * OUTER_RADIUS_FRACTION;
        let spacing = (outer_radius - inner_radius) / number_of_arcs.max(1) as f32;

        Self {
            start,
            end,
            center,
            line_length,
            inner_radius,
            spacing,
        }
    }

    pub fn arc_radius(&self, index: u32) -> f32 {
        self.inner_radius + index as f32 * self.spacing
    }

    /// Marker position for an arc at `angle`
    pub fn marker_position(&self, index: u32, angle: f32) -> Vec2 {
        polar_to_cartesian(self.center, self.arc_radius(index), angle)
    }
}
