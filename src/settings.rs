//! Run configuration
//!
//! Read once at startup, validated into immutable [`Settings`], never changed
//! afterwards. Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::scale::{Scale, ScaleError};
use crate::sim::Settings;

/// Configuration errors. All of these are fatal before the loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number_of_arcs must be positive")]
    NoArcs,
    #[error("duration must be a positive finite number of seconds, got {0}")]
    InvalidDuration(f64),
    #[error("max_cycles {max_cycles} (multiplier {multiplier}) must exceed number_of_arcs {arcs}")]
    InsufficientCycles {
        multiplier: f64,
        max_cycles: u32,
        arcs: u32,
    },
    #[error("start_time must be finite")]
    InvalidStartTime,
    #[error(transparent)]
    Scale(#[from] ScaleError),
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many arcs to swing
    pub number_of_arcs: u32,
    /// Seconds over which the slowest arc completes its cycles
    pub duration: f64,
    /// max_cycles = round(number_of_arcs * cycle_multiplier)
    pub cycle_multiplier: f64,
    /// Instrument preset name (None = silent)
    pub instrument_name: Option<String>,
    /// Scale used to assign arc notes, e.g. "C4 major"
    pub scale_name: Option<String>,
    /// Impact note length (ms)
    pub note_duration_ms: u32,
    /// Impact note release (ms)
    pub note_decay_ms: Option<u32>,
    /// Impact highlight fade (ms), independent of note length
    pub decay_window_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_arcs: DEFAULT_NUMBER_OF_ARCS,
            duration: DEFAULT_DURATION_SECS,
            cycle_multiplier: DEFAULT_CYCLE_MULTIPLIER,
            instrument_name: Some("vibraphone".to_string()),
            scale_name: Some("C4 major".to_string()),
            note_duration_ms: DEFAULT_NOTE_DURATION_MS,
            note_decay_ms: None,
            decay_window_ms: DEFAULT_DECAY_WINDOW_MS,
        }
    }
}

impl Config {
    /// Parse configuration from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The fastest arc's cycle budget
    pub fn max_cycles(&self) -> u32 {
        let cycles = (self.number_of_arcs as f64 * self.cycle_multiplier).round();
        if cycles.is_finite() && cycles > 0.0 {
            cycles.min(u32::MAX as f64) as u32
        } else {
            0
        }
    }

    /// Validate and freeze into run settings.
    ///
    /// `start_time` is the run's epoch millis, captured once by the caller.
    pub fn validate(&self, start_time: f64) -> Result<Settings, ConfigError> {
        if self.number_of_arcs == 0 {
            return Err(ConfigError::NoArcs);
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ConfigError::InvalidDuration(self.duration));
        }
        let max_cycles = self.max_cycles();
        if max_cycles <= self.number_of_arcs {
            return Err(ConfigError::InsufficientCycles {
                multiplier: self.cycle_multiplier,
                max_cycles,
                arcs: self.number_of_arcs,
            });
        }
        if !start_time.is_finite() {
            return Err(ConfigError::InvalidStartTime);
        }
        if let Some(name) = &self.scale_name {
            Scale::parse(name)?;
        }

        Ok(Settings {
            number_of_arcs: self.number_of_arcs,
            max_cycles,
            duration: self.duration,
            start_time,
            instrument_name: self.instrument_name.clone(),
            scale_name: self.scale_name.clone(),
            note_duration_ms: self.note_duration_ms,
            note_decay_ms: self.note_decay_ms,
            decay_window_ms: self.decay_window_ms,
        })
    }

    /// Resolve the stored LocalStorage value.
    ///
    /// Returns the configuration and whether it should be written back, which
    /// is only the case when nothing was stored yet. A malformed stored value
    /// is left alone so the user can fix it.
    pub fn from_stored(stored: Option<&str>) -> (Self, bool) {
        let Some(json) = stored else {
            log::info!("Using default configuration");
            return (Self::default(), true);
        };
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded stored configuration");
                (config, false)
            }
            Err(e) => {
                log::warn!("Ignoring stored configuration: {}", e);
                (Self::default(), false)
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pendulum_wave_config";

    /// Load configuration from LocalStorage, seeding it with the defaults on
    /// first run (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let stored = storage
            .as_ref()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let (config, needs_save) = Self::from_stored(stored.as_deref());
        if needs_save {
            config.save();
        }
        config
    }

    /// Save configuration to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            log::warn!("LocalStorage unavailable, configuration not saved");
            return;
        };

        match self.to_json() {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Configuration saved to `{}`", Self::STORAGE_KEY),
                Err(e) => log::warn!("Failed to save configuration: {:?}", e),
            },
            Err(e) => log::warn!("Failed to encode configuration: {}", e),
        }
    }

    /// Load configuration from an optional JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::info!("Using default configuration");
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let settings = Config::default().validate(0.0).unwrap();
        assert_eq!(settings.number_of_arcs, 21);
        // round(21 * 1.5) = round(31.5) = 32
        assert_eq!(settings.max_cycles, 32);
        assert_eq!(settings.decay_window_ms, 1000);
    }

    #[test]
    fn test_max_cycles_rounding() {
        let config = Config {
            number_of_arcs: 5,
            cycle_multiplier: 1.5,
            ..Default::default()
        };
        // round(7.5) = 8
        assert_eq!(config.max_cycles(), 8);
    }

    #[test]
    fn test_rejects_zero_arcs() {
        let config = Config {
            number_of_arcs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(0.0), Err(ConfigError::NoArcs)));
    }

    #[test]
    fn test_rejects_bad_duration() {
        for duration in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = Config {
                duration,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(0.0),
                Err(ConfigError::InvalidDuration(_))
            ));
        }
    }

    #[test]
    fn test_rejects_small_multiplier() {
        let config = Config {
            number_of_arcs: 10,
            cycle_multiplier: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(0.0),
            Err(ConfigError::InsufficientCycles { max_cycles: 10, .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_scale() {
        let config = Config {
            scale_name: Some("C4 bebop-ultra".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.validate(0.0), Err(ConfigError::Scale(_))));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = Config::from_json(r#"{"number_of_arcs": 8, "duration": 60.0}"#).unwrap();
        assert_eq!(config.number_of_arcs, 8);
        assert_eq!(config.duration, 60.0);
        assert_eq!(config.decay_window_ms, DEFAULT_DECAY_WINDOW_MS);
        assert_eq!(config.cycle_multiplier, DEFAULT_CYCLE_MULTIPLIER);
    }

    #[test]
    fn test_rejects_huge_scale_octave() {
        let config = Config {
            scale_name: Some("C999999999 major".into()),
            ..Default::default()
        };
        assert!(matches!(config.validate(0.0), Err(ConfigError::Scale(_))));
    }

    #[test]
    fn test_from_stored_seeds_defaults_once() {
        let (config, needs_save) = Config::from_stored(None);
        assert_eq!(config, Config::default());
        assert!(needs_save);

        let json = Config {
            number_of_arcs: 7,
            ..Default::default()
        }
        .to_json()
        .unwrap();
        let (config, needs_save) = Config::from_stored(Some(&json));
        assert_eq!(config.number_of_arcs, 7);
        assert!(!needs_save);
    }

    #[test]
    fn test_from_stored_keeps_malformed_value() {
        let (config, needs_save) = Config::from_stored(Some("{oops"));
        assert_eq!(config, Config::default());
        // Don't clobber what the user wrote
        assert!(!needs_save);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let config = Config {
            number_of_arcs: 12,
            instrument_name: None,
            note_decay_ms: Some(300),
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
