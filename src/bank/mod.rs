//! Harmonic oscillator bank
//!
//! Owns the full set of harmonic signal chains over one fundamental,
//! clamps every amplitude write, and applies the one-shot bulk rise/fall
//! ramps across the whole bank.

mod chain;

pub use chain::{create_channel, HarmonicChannel};

use crate::config::BankConfig;
use crate::display::DisplaySurface;
use crate::engine::AudioEngine;

/// The bank of harmonic channels
pub struct OscillatorBank {
    fundamental: f64,
    channel_count: usize,
    /// Upper clamp for every amplitude write
    ceiling: f64,
    lead_in: f64,
    /// Duration of the bulk rise/fall ramps in seconds
    trigger_ramp: f64,
    channels: Vec<HarmonicChannel>,
    initialized: bool,
}

impl OscillatorBank {
    /// Create an empty bank; channels are built by [`init`](Self::init)
    pub fn new(config: &BankConfig) -> Self {
        Self {
            fundamental: config.fundamental,
            channel_count: config.channels,
            ceiling: config.amplitude_ceiling,
            lead_in: config.lead_in,
            trigger_ramp: config.trigger_ramp,
            channels: Vec::new(),
            initialized: false,
        }
    }

    /// Get the fundamental frequency in Hz
    pub fn fundamental(&self) -> f64 {
        self.fundamental
    }

    /// Number of channels the bank builds
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Amplitude ceiling applied to every write
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Check whether the bank has been built
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get a channel by index
    pub fn channel(&self, index: usize) -> Option<&HarmonicChannel> {
        self.channels.get(index)
    }

    /// The frequency law: fundamental times (index + 1)
    pub fn frequency_of(&self, index: usize) -> f64 {
        self.fundamental * (index + 1) as f64
    }

    /// Build the bank. Runs at most once; repeated calls are no-ops.
    ///
    /// The build path tears down any channels left in the engine and clears
    /// previously displayed readouts before creating the chains.
    pub fn init(&mut self, engine: &mut AudioEngine, display: &mut dyn DisplaySurface) {
        if self.initialized {
            return;
        }

        self.rebuild(engine, display);
        self.initialized = true;
    }

    fn rebuild(&mut self, engine: &mut AudioEngine, display: &mut dyn DisplaySurface) {
        for channel in self.channels.drain(..) {
            engine.remove_node(channel.node()).ok();
        }
        display.clear();

        for i in 0..self.channel_count {
            let frequency = self.fundamental * (i + 1) as f64;
            let channel = create_channel(engine, i, frequency, self.lead_in);
            self.channels.push(channel);
        }
    }

    /// Tear the bank down so a later `init` rebuilds it
    pub fn teardown(&mut self, engine: &mut AudioEngine) {
        for channel in self.channels.drain(..) {
            engine.remove_node(channel.node()).ok();
        }
        self.initialized = false;
    }

    /// Set a channel's amplitude immediately, clamped to `[0, ceiling]`
    pub fn set_amplitude(&self, engine: &mut AudioEngine, index: usize, value: f64) {
        let Some(channel) = self.channels.get(index) else {
            return;
        };

        let clamped = value.clamp(0.0, self.ceiling);
        let now = engine.now();
        if let Ok(gain) = engine.gain_mut(channel.node()) {
            gain.set_value_at_time(clamped, now);
        }
    }

    /// Read a channel's instantaneous amplitude for display mirroring
    pub fn poll_amplitude(&self, engine: &AudioEngine, index: usize) -> f64 {
        let Some(channel) = self.channels.get(index) else {
            return 0.0;
        };

        engine
            .gain(channel.node())
            .map(|gain| gain.value_at(engine.now()))
            .unwrap_or(0.0)
    }

    /// Ramp every channel from silence up to `ceiling / (index + 1)` over
    /// the trigger ramp duration, then hold there.
    pub fn trigger_rise_all(&self, engine: &mut AudioEngine) {
        let now = engine.now();

        for channel in &self.channels {
            let target = self.ceiling / (channel.index + 1) as f64;
            if let Ok(gain) = engine.gain_mut(channel.node()) {
                gain.cancel_scheduled_values(now);
                gain.set_value_at_time(0.0, now);
                gain.linear_ramp_to_value_at_time(target, now + self.trigger_ramp);
                // Explicit flat continuation, not a reset
                gain.set_value_at_time(target, now + self.trigger_ramp);
            }
        }
    }

    /// Ramp every channel from `ceiling / (index + 1)` down to silence over
    /// the trigger ramp duration, then hold at zero.
    pub fn trigger_fall_all(&self, engine: &mut AudioEngine) {
        let now = engine.now();

        for channel in &self.channels {
            let initial = self.ceiling / (channel.index + 1) as f64;
            if let Ok(gain) = engine.gain_mut(channel.node()) {
                gain.cancel_scheduled_values(now);
                gain.set_value_at_time(initial, now);
                gain.linear_ramp_to_value_at_time(0.0, now + self.trigger_ramp);
                gain.set_value_at_time(0.0, now + self.trigger_ramp);
            }
        }
    }
}
