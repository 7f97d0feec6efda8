//! Per-arc timing model
//!
//! Each arc gets a decreasing integer number of half-swings to complete in
//! `duration` seconds:
//! - velocity = π * (max_cycles - index) / duration  (rad/s)
//! - one impact per half period: π / velocity seconds
//! - phase starts at π and only ever increases

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::state::Settings;
use super::timeline::elapsed;
use crate::wrap_angle;

/// Angular velocity (rad/s) for the arc at `index`
#[inline]
pub fn velocity_for_arc(index: u32, settings: &Settings) -> f64 {
    PI * (settings.max_cycles as f64 - index as f64) / settings.duration
}

/// Epoch millis of the next impact after `from_time`
#[inline]
pub fn next_impact(from_time: f64, velocity: f64) -> f64 {
    from_time + (PI / velocity) * 1000.0
}

/// Unwrapped phase after `elapsed_secs`
#[inline]
pub fn raw_angle(elapsed_secs: f64, velocity: f64) -> f64 {
    PI + elapsed_secs * velocity
}

/// Fold a raw angle onto the drawn half circle [π, 2π]
#[inline]
pub fn fold_angle(raw: f64) -> f64 {
    let wrapped = wrap_angle(raw);
    if wrapped >= PI { wrapped } else { TAU - wrapped }
}

/// Marker angle for an arc at `elapsed_secs`
#[inline]
pub fn display_angle(elapsed_secs: f64, velocity: f64) -> f64 {
    fold_angle(raw_angle(elapsed_secs, velocity))
}

/// Linear highlight fade: 1.0 at the impact instant, 0.0 after `window_ms`
pub fn impact_intensity(now: f64, last_impact: Option<f64>, window_ms: u32) -> f32 {
    let Some(last) = last_impact else {
        return 0.0;
    };
    if window_ms == 0 {
        return 0.0;
    }
    let since = (now - last).max(0.0);
    (1.0 - since / window_ms as f64).clamp(0.0, 1.0) as f32
}

/// Impact detector state for one arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactState {
    /// Waiting for `next_impact_time`
    Armed,
    /// Due this frame; re-arms as soon as it is handled
    Firing,
}

/// One oscillating element of the wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendulumArc {
    pub index: u32,
    /// Radians per second, frozen at creation
    pub velocity: f64,
    /// Epoch millis of the next predicted impact
    pub next_impact_time: f64,
    /// Epoch millis of the previous impact (drives the highlight fade)
    pub last_impact_time: Option<f64>,
    /// Stable color identity (degrees)
    pub hue: f32,
    /// Note played on impact
    pub note: Option<String>,
}

impl PendulumArc {
    pub fn new(index: u32, settings: &Settings, note: Option<String>) -> Self {
        let velocity = velocity_for_arc(index, settings);
        Self {
            index,
            velocity,
            next_impact_time: next_impact(settings.start_time, velocity),
            last_impact_time: None,
            hue: 360.0 * index as f32 / settings.number_of_arcs as f32,
            note,
        }
    }

    /// Marker angle at wall-clock `now`
    pub fn angle_at(&self, now: f64, start_time: f64) -> f64 {
        display_angle(elapsed(now, start_time), self.velocity)
    }

    pub fn impact_state(&self, now: f64) -> ImpactState {
        if now >= self.next_impact_time {
            ImpactState::Firing
        } else {
            ImpactState::Armed
        }
    }

    /// Record the impact and schedule the next one from `now`.
    ///
    /// Scheduling from `now` rather than the missed instant means a slow frame
    /// delays an impact but never fires it twice.
    pub fn rearm(&mut self, now: f64) {
        self.last_impact_time = Some(self.next_impact_time);
        self.next_impact_time = next_impact(now.max(self.next_impact_time), self.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(number_of_arcs: u32, max_cycles: u32, duration: f64) -> Settings {
        Settings {
            number_of_arcs,
            max_cycles,
            duration,
            start_time: 0.0,
            instrument_name: None,
            scale_name: None,
            note_duration_ms: 0,
            note_decay_ms: None,
            decay_window_ms: 1000,
        }
    }

    #[test]
    fn test_velocity_halves_across_five_arcs() {
        // 5 arcs * 1.5 -> 8 cycles
        let s = settings(5, 8, 60.0);
        let v0 = velocity_for_arc(0, &s);
        let v4 = velocity_for_arc(4, &s);
        assert!((v0 - PI * 8.0 / 60.0).abs() < 1e-12);
        assert!((v4 - PI * 4.0 / 60.0).abs() < 1e-12);
        assert!((v0 - 2.0 * v4).abs() < 1e-12);
    }

    #[test]
    fn test_next_impact_half_period() {
        assert!((next_impact(0.0, PI) - 1000.0).abs() < 1e-9);
        assert!((next_impact(500.0, PI / 2.0) - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_arcs_start_at_pi() {
        let s = settings(21, 32, 900.0);
        for i in 0..21 {
            let arc = PendulumArc::new(i, &s, None);
            assert_eq!(arc.angle_at(0.0, 0.0), PI);
        }
    }

    #[test]
    fn test_display_angle_in_upper_half() {
        let angle = display_angle(2.5, 1.0);
        assert!((angle - (PI + 2.5)).abs() < 1e-12);

        // raw = π + 4 wraps to ≈0.858 (< π), folded to 2π - 0.858
        let angle = display_angle(4.0, 1.0);
        let wrapped = (PI + 4.0) % TAU;
        assert!((angle - (TAU - wrapped)).abs() < 1e-12);
        assert!(angle >= PI && angle <= TAU);
    }

    #[test]
    fn test_impact_state_boundary() {
        let arc = PendulumArc {
            index: 0,
            velocity: PI,
            next_impact_time: 1000.0,
            last_impact_time: None,
            hue: 0.0,
            note: None,
        };
        assert_eq!(arc.impact_state(999.0), ImpactState::Armed);
        assert_eq!(arc.impact_state(1000.0), ImpactState::Firing);
    }

    #[test]
    fn test_rearm_uses_current_time() {
        let mut arc = PendulumArc {
            index: 0,
            velocity: PI,
            next_impact_time: 1000.0,
            last_impact_time: None,
            hue: 0.0,
            note: None,
        };
        // Late frame: fired 250ms after schedule
        arc.rearm(1250.0);
        assert_eq!(arc.last_impact_time, Some(1000.0));
        assert!((arc.next_impact_time - 2250.0).abs() < 1e-9);
        assert_eq!(arc.impact_state(1250.0), ImpactState::Armed);
    }

    #[test]
    fn test_impact_intensity_fades_linearly() {
        assert_eq!(impact_intensity(500.0, None, 1000), 0.0);
        assert_eq!(impact_intensity(1000.0, Some(1000.0), 1000), 1.0);
        assert!((impact_intensity(1250.0, Some(1000.0), 1000) - 0.75).abs() < 1e-6);
        assert_eq!(impact_intensity(2000.0, Some(1000.0), 1000), 0.0);
        assert_eq!(impact_intensity(5000.0, Some(1000.0), 1000), 0.0);
        assert_eq!(impact_intensity(1000.0, Some(1000.0), 0), 0.0);
    }

    #[test]
    fn test_hue_spreads_over_circle() {
        let s = settings(4, 6, 10.0);
        let hues: Vec<f32> = (0..4).map(|i| PendulumArc::new(i, &s, None).hue).collect();
        assert_eq!(hues, [0.0, 90.0, 180.0, 270.0]);
    }
}
