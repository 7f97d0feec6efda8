//! Pendulum Wave - a generative audio-visual toy
//!
//! Core modules:
//! - `sim`: Pendulum timing/impact model and the per-frame tick
//! - `store`: Immutable snapshot cell (read / mutate / subscribe)
//! - `renderer`: Drawing surface abstraction, layout and colors
//! - `audio`: Instrument abstraction and backends
//! - `scale`: Scale degree to note name mapping
//! - `settings`: Configuration loading and validation

pub mod audio;
pub mod renderer;
pub mod scale;
pub mod settings;
pub mod sim;
pub mod store;

pub use settings::{Config, ConfigError};
pub use store::{Store, StoreError};

use glam::Vec2;

/// Simulation and layout constants
pub mod consts {
    /// Scales the arc count into the fastest arc's cycle budget
    pub const DEFAULT_CYCLE_MULTIPLIER: f64 = 1.5;
    /// Default number of arcs
    pub const DEFAULT_NUMBER_OF_ARCS: u32 = 21;
    /// Seconds over which the slowest arc completes its cycles
    pub const DEFAULT_DURATION_SECS: f64 = 900.0;
    /// How long an impact stays lit (ms)
    pub const DEFAULT_DECAY_WINDOW_MS: u32 = 1000;
    /// How long an impact note rings (ms)
    pub const DEFAULT_NOTE_DURATION_MS: u32 = 1500;
    /// Note used when an arc has no scale note
    pub const DEFAULT_NOTE: &str = "C4";

    /// Baseline anchors as fractions of the viewport
    pub const BASELINE_START_X: f32 = 0.1;
    pub const BASELINE_END_X: f32 = 0.9;
    pub const BASELINE_Y: f32 = 0.9;
    pub const BASELINE_WIDTH: f32 = 4.0;

    /// Innermost / outermost arc radius as fractions of baseline length
    pub const INNER_RADIUS_FRACTION: f32 = 0.05;
    pub const OUTER_RADIUS_FRACTION: f32 = 0.5;

    /// Guide curve stroke width
    pub const ARC_WIDTH: f32 = 2.0;
    /// Moving marker radius (px)
    pub const MARKER_RADIUS: f32 = 6.0;

    /// Host frame cadence used by the headless runner
    pub const FRAME_DT_MS: u64 = 16;
}

/// Wrap angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y) around `center`
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}
