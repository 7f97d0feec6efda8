//! 2D drawing surface
//!
//! The loop issues primitive commands (lines, arcs, discs) to a [`Surface`].
//! Angles are radians in the host's 2D convention: 0 along +x, increasing
//! clockwise because y grows downward.

pub mod layout;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use layout::Layout;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// HSLA color (hue in degrees, the rest 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        hue: 0.0,
        saturation: 0.0,
        lightness: 1.0,
        alpha: 1.0,
    };

    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }

    /// CSS color string for canvas styles
    pub fn to_css(&self) -> String {
        format!(
            "hsla({:.1}, {:.1}%, {:.1}%, {:.3})",
            self.hue,
            self.saturation * 100.0,
            self.lightness * 100.0,
            self.alpha
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub cap: LineCap,
    pub color: Color,
    pub width: f32,
}

/// Guide curve color: dim at rest, bright right after an impact
pub fn arc_color(hue: f32, intensity: f32) -> Color {
    let t = intensity.clamp(0.0, 1.0);
    Color::hsla(hue, 0.8, 0.5 + 0.2 * t, 0.15 + 0.85 * t)
}

/// Marker color: always opaque, flashes toward white on impact
pub fn marker_color(hue: f32, intensity: f32) -> Color {
    let t = intensity.clamp(0.0, 1.0);
    Color::hsla(hue, 0.8, 0.6 + 0.35 * t, 1.0)
}

/// Drawing primitives the render loop needs
pub trait Surface {
    /// Current pixel dimensions
    fn size(&self) -> (u32, u32);
    /// Pixel dimensions of the host viewport
    fn viewport_size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    fn set_line_style(&mut self, style: &LineStyle);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    /// Circular arc from `start` to `end` (radians)
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32);
    fn stroke(&mut self);
    fn fill_disc(&mut self, center: Vec2, radius: f32, color: &Color);

    /// Match the viewport; no-op when already matching
    fn fit_viewport(&mut self) {
        let (w, h) = self.viewport_size();
        if self.size() != (w, h) {
            self.resize(w, h);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, style: &LineStyle) {
        self.set_line_style(style);
        self.begin_path();
        self.move_to(from);
        self.line_to(to);
        self.stroke();
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, style: &LineStyle) {
        self.set_line_style(style);
        self.begin_path();
        self.arc(center, radius, start, end);
        self.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::WHITE.to_css(), "hsla(0.0, 0.0%, 100.0%, 1.000)");
        assert_eq!(
            Color::hsla(120.0, 0.8, 0.5, 0.15).to_css(),
            "hsla(120.0, 80.0%, 50.0%, 0.150)"
        );
    }

    #[test]
    fn test_arc_color_brightens_with_intensity() {
        let rest = arc_color(200.0, 0.0);
        let hit = arc_color(200.0, 1.0);
        assert!(hit.alpha > rest.alpha);
        assert!(hit.lightness > rest.lightness);
        assert_eq!(rest.hue, hit.hue);
        assert!((hit.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_line_cap_names() {
        assert_eq!(LineCap::default().as_str(), "round");
        assert_eq!(LineCap::Butt.as_str(), "butt");
    }
}
