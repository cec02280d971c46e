//! Sound cues. Playback is fire-and-forget: a sink that fails or has no audio
//! device must not affect the game.

use std::cell::RefCell;

use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Eat,
    GameOver,
}

pub trait SoundSink {
    fn play(&self, cue: SoundCue);
}

/// Plays nothing.
pub struct Silent;

impl SoundSink for Silent {
    fn play(&self, _cue: SoundCue) {}
}

/// Synthesized retro blips through the Web Audio API.
///
/// The context is created on first use; browsers only allow that after a
/// user gesture, which a keypress or swipe starting the round provides.
#[derive(Default)]
pub struct WebAudio {
    ctx: RefCell<Option<AudioContext>>,
}

struct Envelope {
    wave: OscillatorType,
    freq_from: f32,
    freq_to: f32,
    gain: f32,
    seconds: f64,
}

fn envelope(cue: SoundCue) -> Envelope {
    match cue {
        // Quick upward square blip.
        SoundCue::Eat => Envelope {
            wave: OscillatorType::Square,
            freq_from: 300.0,
            freq_to: 600.0,
            gain: 0.08,
            seconds: 0.1,
        },
        // Descending sawtooth.
        SoundCue::GameOver => Envelope {
            wave: OscillatorType::Sawtooth,
            freq_from: 400.0,
            freq_to: 100.0,
            gain: 0.08,
            seconds: 0.5,
        },
    }
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Result<AudioContext, JsValue> {
        let mut slot = self.ctx.borrow_mut();
        if let Some(ctx) = slot.as_ref() {
            if ctx.state() == AudioContextState::Suspended {
                // Resolves asynchronously; this cue may be lost, later ones play.
                let _ = ctx.resume()?;
            }
            return Ok(ctx.clone());
        }
        let ctx = AudioContext::new()?;
        *slot = Some(ctx.clone());
        Ok(ctx)
    }

    fn try_play(&self, cue: SoundCue) -> Result<(), JsValue> {
        let ctx = self.context()?;
        let env = envelope(cue);
        let osc = ctx.create_oscillator()?;
        let gain = ctx.create_gain()?;
        osc.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;

        let now = ctx.current_time();
        osc.set_type(env.wave);
        osc.frequency().set_value_at_time(env.freq_from, now)?;
        osc.frequency().exponential_ramp_to_value_at_time(env.freq_to, now + env.seconds)?;
        gain.gain().set_value_at_time(env.gain, now)?;
        gain.gain().exponential_ramp_to_value_at_time(0.01, now + env.seconds)?;
        osc.start_with_when(now)?;
        osc.stop_with_when(now + env.seconds)?;
        Ok(())
    }
}

impl SoundSink for WebAudio {
    fn play(&self, cue: SoundCue) {
        if let Err(err) = self.try_play(cue) {
            warn!("sound {cue:?} unavailable: {err:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eat_rises_and_game_over_falls() {
        let eat = envelope(SoundCue::Eat);
        assert!(eat.freq_to > eat.freq_from);
        let over = envelope(SoundCue::GameOver);
        assert!(over.freq_to < over.freq_from);
        assert!(over.seconds > eat.seconds);
    }

    #[test]
    fn silent_sink_accepts_every_cue() {
        let sink: Box<dyn SoundSink> = Box::new(Silent);
        sink.play(SoundCue::Eat);
        sink.play(SoundCue::GameOver);
    }
}
