//! Signal chain factory
//!
//! Builds one harmonic partial: a sine oscillator wired through its own
//! gain into the shared mix bus, with its start pushed slightly past `now`
//! to dodge engine startup glitches.

use crate::engine::{AudioEngine, NodeId};
use crate::synth::Waveform;

/// One partial in the bank: an oscillator+gain chain on the mix bus
#[derive(Debug, Clone, Copy)]
pub struct HarmonicChannel {
    /// Zero-based position in the bank
    pub index: usize,
    /// Frequency in Hz (fundamental times index + 1)
    pub frequency: f64,
    node: NodeId,
}

impl HarmonicChannel {
    /// Handle to the chain's gain node in the engine
    pub fn node(&self) -> NodeId {
        self.node
    }
}

/// Allocate a sine oscillator at `frequency` with gain 0, starting
/// `lead_in` seconds from now.
pub fn create_channel(
    engine: &mut AudioEngine,
    index: usize,
    frequency: f64,
    lead_in: f64,
) -> HarmonicChannel {
    let start_at = engine.now() + lead_in;
    let node = engine.add_oscillator(Waveform::Sine, frequency, start_at);

    HarmonicChannel {
        index,
        frequency,
        node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_channel() {
        let mut engine = AudioEngine::new(44100, 0.25);
        let channel = create_channel(&mut engine, 2, 196.218, 0.1);

        assert_eq!(channel.index, 2);
        assert_eq!(channel.frequency, 196.218);
        assert_eq!(engine.node_count(), 1);
    }

    #[test]
    fn test_channel_gain_starts_at_zero() {
        let mut engine = AudioEngine::new(44100, 0.25);
        let channel = create_channel(&mut engine, 0, 65.406, 0.1);

        let gain = engine.gain(channel.node()).unwrap();
        assert_eq!(gain.value_at(0.0), 0.0);
        assert_eq!(gain.value_at(10.0), 0.0);
    }

    #[test]
    fn test_lead_in_delays_start() {
        let mut engine = AudioEngine::new(44100, 0.25);
        engine.resume();

        let channel = create_channel(&mut engine, 0, 440.0, 0.1);
        engine
            .gain_mut(channel.node())
            .unwrap()
            .set_value_at_time(0.25, 0.0);

        // Everything inside the lead-in window is silent
        let mut buffer = vec![0.0f32; 4000];
        engine.render(&mut buffer);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}
