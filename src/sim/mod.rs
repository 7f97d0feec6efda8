//! Pendulum wave simulation
//!
//! Wall-clock driven rather than frame counted:
//! - Phase is a pure function of (now - start_time) and arc velocity
//! - Only impact times are mutated, always through the store
//! - Stable iteration order (by arc index)
//! - No platform dependencies beyond the `Surface` and `Instrument` traits

pub mod arc;
pub mod state;
pub mod tick;
pub mod timeline;

pub use arc::{
    ImpactState, PendulumArc, display_angle, fold_angle, impact_intensity, next_impact,
    raw_angle, velocity_for_arc,
};
pub use state::{Settings, Snapshot};
pub use tick::{
    Impact, LoopControl, TickReport, apply_impacts, detect_impacts, draw, run_frame, tick,
};
pub use timeline::{Clock, ManualClock, SystemClock, elapsed};
