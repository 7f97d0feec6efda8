//! Simulation snapshot types
//!
//! A [`Snapshot`] is replaced wholesale on every store mutation. Arc count,
//! velocities, hues and notes are frozen when the snapshot is first built;
//! only the impact times ever change.

use serde::{Deserialize, Serialize};

use super::arc::PendulumArc;
use crate::audio::InstrumentHandle;
use crate::scale::Scale;

/// Validated, immutable run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub number_of_arcs: u32,
    /// Half-swings the fastest arc completes in `duration`
    pub max_cycles: u32,
    /// Seconds
    pub duration: f64,
    /// Epoch millis, captured once at run start
    pub start_time: f64,
    pub instrument_name: Option<String>,
    pub scale_name: Option<String>,
    pub note_duration_ms: u32,
    pub note_decay_ms: Option<u32>,
    pub decay_window_ms: u32,
}

/// Complete simulation state at one instant
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub settings: Settings,
    /// Ordered by index, length == number_of_arcs
    pub arcs: Vec<PendulumArc>,
    /// Present once the instrument has finished loading
    pub instrument: Option<InstrumentHandle>,
}

impl Snapshot {
    /// Build the initial snapshot: one arc per index, notes from the scale
    pub fn new(settings: Settings) -> Self {
        let scale = settings
            .scale_name
            .as_deref()
            .and_then(|name| match Scale::parse(name) {
                Ok(scale) => Some(scale),
                Err(e) => {
                    log::warn!("Arcs will use the default note: {}", e);
                    None
                }
            });

        let arcs = (0..settings.number_of_arcs)
            .map(|index| {
                let note = scale.as_ref().and_then(|s| s.degree(index + 1));
                PendulumArc::new(index, &settings, note)
            })
            .collect();

        Self {
            settings,
            arcs,
            instrument: None,
        }
    }

    pub fn has_instrument(&self) -> bool {
        self.instrument.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Config;

    #[test]
    fn test_snapshot_has_one_arc_per_index() {
        let settings = Config::default().validate(1_000.0).unwrap();
        let snapshot = Snapshot::new(settings);
        assert_eq!(snapshot.arcs.len(), 21);
        for (i, arc) in snapshot.arcs.iter().enumerate() {
            assert_eq!(arc.index as usize, i);
            assert!(arc.velocity > 0.0);
            assert!(arc.next_impact_time > 1_000.0);
            assert_eq!(arc.last_impact_time, None);
        }
        assert!(!snapshot.has_instrument());
    }

    #[test]
    fn test_notes_follow_scale_degrees() {
        let config = Config {
            number_of_arcs: 3,
            scale_name: Some("C4 major".to_string()),
            ..Default::default()
        };
        let snapshot = Snapshot::new(config.validate(0.0).unwrap());
        let notes: Vec<_> = snapshot.arcs.iter().map(|a| a.note.as_deref()).collect();
        assert_eq!(notes, [Some("C4"), Some("D4"), Some("E4")]);
    }

    #[test]
    fn test_no_scale_means_no_notes() {
        let config = Config {
            number_of_arcs: 2,
            scale_name: None,
            ..Default::default()
        };
        let snapshot = Snapshot::new(config.validate(0.0).unwrap());
        assert!(snapshot.arcs.iter().all(|a| a.note.is_none()));
    }
}
