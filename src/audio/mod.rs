//! Impact notes
//!
//! The loop only knows the [`Instrument`] trait. Backends:
//! - `WebAudioInstrument`: oscillator voices via the Web Audio API (wasm32)
//! - [`LogInstrument`]: logs each note (native headless runs)

use std::fmt;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebAudioInstrument;

/// One playback trigger
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    /// Note name, e.g. "E4"
    pub note: String,
    /// Epoch millis of the frame that fired the impact
    pub time: f64,
    /// Sustain length (ms)
    pub duration_ms: u32,
    /// Release after the sustain (ms), backend default if None
    pub decay_ms: Option<u32>,
}

/// Fire-and-forget note playback
pub trait Instrument: fmt::Debug {
    fn name(&self) -> &str;
    fn start(&self, event: &NoteEvent);
}

/// Shared handle stored in the snapshot once loading finishes
pub type InstrumentHandle = Rc<dyn Instrument>;

/// Oscillator shape, mirrors Web Audio `OscillatorType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// Voice recipe selected by instrument name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentPreset {
    pub waveform: Waveform,
    /// (frequency ratio, relative gain) per partial
    pub partials: &'static [(f32, f32)],
    /// Peak gain (0.0 - 1.0)
    pub peak: f32,
    /// Attack time (s)
    pub attack: f64,
    /// Default release (ms) when the event carries none
    pub release_ms: u32,
}

impl InstrumentPreset {
    pub const VIBRAPHONE: Self = Self {
        waveform: Waveform::Sine,
        partials: &[(1.0, 1.0), (4.0, 0.25), (10.0, 0.05)],
        peak: 0.18,
        attack: 0.005,
        release_ms: 800,
    };
    pub const MARIMBA: Self = Self {
        waveform: Waveform::Sine,
        partials: &[(1.0, 1.0), (3.93, 0.15)],
        peak: 0.22,
        attack: 0.002,
        release_ms: 300,
    };
    pub const BELL: Self = Self {
        waveform: Waveform::Sine,
        partials: &[(1.0, 1.0), (2.76, 0.4), (5.4, 0.2), (8.93, 0.1)],
        peak: 0.15,
        attack: 0.001,
        release_ms: 1500,
    };
    pub const PLUCK: Self = Self {
        waveform: Waveform::Triangle,
        partials: &[(1.0, 1.0), (2.0, 0.3)],
        peak: 0.2,
        attack: 0.002,
        release_ms: 200,
    };
    pub const SQUARE: Self = Self {
        waveform: Waveform::Square,
        partials: &[(1.0, 1.0)],
        peak: 0.06,
        attack: 0.01,
        release_ms: 150,
    };
    pub const SAW: Self = Self {
        waveform: Waveform::Sawtooth,
        partials: &[(1.0, 1.0)],
        peak: 0.06,
        attack: 0.01,
        release_ms: 150,
    };

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "vibraphone" | "vibes" => Some(Self::VIBRAPHONE),
            "marimba" => Some(Self::MARIMBA),
            "bell" | "bells" | "celesta" => Some(Self::BELL),
            "pluck" | "harp" => Some(Self::PLUCK),
            "square" | "chiptune" => Some(Self::SQUARE),
            "saw" | "sawtooth" => Some(Self::SAW),
            _ => None,
        }
    }

    /// Preset for `name`, falling back to vibraphone
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown instrument `{}`, using vibraphone", name);
            Self::VIBRAPHONE
        })
    }

    /// Effective release for an event (s)
    pub fn release_secs(&self, event: &NoteEvent) -> f64 {
        event.decay_ms.unwrap_or(self.release_ms) as f64 / 1000.0
    }
}

/// Instrument that logs notes instead of playing them
#[derive(Debug, Clone)]
pub struct LogInstrument {
    name: String,
    preset: InstrumentPreset,
}

impl LogInstrument {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            preset: InstrumentPreset::resolve(name),
        }
    }
}

impl Instrument for LogInstrument {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self, event: &NoteEvent) {
        log::info!(
            "{} plays {} for {}ms (+{:.0}ms release)",
            self.name,
            event.note,
            event.duration_ms,
            self.preset.release_secs(event) * 1000.0
        );
    }
}
