//! Web Audio instrument
//!
//! Additive oscillator voices - no sample files needed. Each note builds one
//! oscillator per preset partial, all feeding a shared gain envelope.

use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use super::{Instrument, InstrumentPreset, NoteEvent, Waveform};
use crate::scale::note_frequency;

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Triangle => OscillatorType::Triangle,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
    }
}

#[derive(Debug, Clone)]
pub struct WebAudioInstrument {
    name: String,
    ctx: AudioContext,
    preset: InstrumentPreset,
}

impl WebAudioInstrument {
    /// Create the audio context. Fails outside a secure context.
    pub fn new(name: &str) -> Option<Self> {
        let ctx = match AudioContext::new() {
            Ok(ctx) => ctx,
            Err(_) => {
                log::warn!("Failed to create AudioContext - audio disabled");
                return None;
            }
        };
        Some(Self {
            name: name.to_string(),
            ctx,
            preset: InstrumentPreset::resolve(name),
        })
    }

    /// Context handle, for resuming from a user gesture
    pub fn context(&self) -> &AudioContext {
        &self.ctx
    }

    /// Resolve once the context is running.
    ///
    /// Browsers keep a new context suspended until a user gesture, so this
    /// can stay pending for a while.
    pub async fn load(self) -> Option<Self> {
        if self.ctx.state() != AudioContextState::Running {
            let promise = self.ctx.resume().ok()?;
            if JsFuture::from(promise).await.is_err() {
                log::warn!("AudioContext resume rejected - audio disabled");
                return None;
            }
        }
        log::info!("Instrument `{}` ready", self.name);
        Some(self)
    }

    fn create_osc(&self, freq: f32, gain: &GainNode) -> Option<OscillatorNode> {
        let osc = self.ctx.create_oscillator().ok()?;
        osc.set_type(oscillator_type(self.preset.waveform));
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(gain).ok()?;
        Some(osc)
    }
}

impl Instrument for WebAudioInstrument {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self, event: &NoteEvent) {
        let Some(freq) = note_frequency(&event.note) else {
            log::warn!("Cannot play unknown note `{}`", event.note);
            return;
        };
        let Ok(gain) = self.ctx.create_gain() else {
            return;
        };
        if gain
            .connect_with_audio_node(&self.ctx.destination())
            .is_err()
        {
            return;
        }

        let preset = &self.preset;
        let t = self.ctx.current_time();
        let sustain_end = t + preset.attack + event.duration_ms as f64 / 1000.0;
        let end = sustain_end + preset.release_secs(event);

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(preset.peak, t + preset.attack)
            .ok();
        gain.gain().set_value_at_time(preset.peak, sustain_end).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, end)
            .ok();

        for &(ratio, level) in preset.partials {
            let partial_freq = freq as f32 * ratio;
            // Skip partials above Nyquist
            if partial_freq >= self.ctx.sample_rate() / 2.0 {
                continue;
            }
            let Ok(partial_gain) = self.ctx.create_gain() else {
                continue;
            };
            partial_gain.gain().set_value(level);
            if partial_gain.connect_with_audio_node(&gain).is_err() {
                continue;
            }
            if let Some(osc) = self.create_osc(partial_freq, &partial_gain) {
                osc.start_with_when(t).ok();
                osc.stop_with_when(end + 0.05).ok();
            }
        }
    }
}
