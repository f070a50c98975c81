//! Auxiliary sawtooth voice
//!
//! A single manually started/stopped sawtooth at the fundamental, mixed
//! into the same bus as the bank. The nullable node handle is the only
//! guard: at most one instance sounds at a time.

use crate::engine::{AudioEngine, NodeId};
use crate::synth::Waveform;

/// The one-and-only sawtooth voice
pub struct SawtoothVoice {
    frequency: f64,
    level: f64,
    lead_in: f64,
    node: Option<NodeId>,
}

impl SawtoothVoice {
    /// Create an idle voice
    pub fn new(frequency: f64, level: f64, lead_in: f64) -> Self {
        Self {
            frequency,
            level,
            lead_in,
            node: None,
        }
    }

    /// Check whether the voice is currently sounding
    pub fn is_running(&self) -> bool {
        self.node.is_some()
    }

    /// Start the voice; warns and does nothing when already running
    pub fn start(&mut self, engine: &mut AudioEngine) {
        if self.node.is_some() {
            eprintln!("Warning: sawtooth oscillator is already running.");
            return;
        }

        let now = engine.now();
        let node = engine.add_oscillator(Waveform::Saw, self.frequency, now + self.lead_in);
        if let Ok(gain) = engine.gain_mut(node) {
            gain.set_value_at_time(self.level, now);
        }

        self.node = Some(node);
    }

    /// Stop and disconnect the voice; warns and does nothing when idle
    pub fn stop(&mut self, engine: &mut AudioEngine) {
        match self.node.take() {
            Some(node) => {
                engine.remove_node(node).ok();
            }
            None => {
                eprintln!("Warning: sawtooth oscillator is not running.");
            }
        }
    }
}
