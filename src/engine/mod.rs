//! Audio engine for Overtone
//!
//! Owns the signal graph: oscillator nodes with scheduled gain parameters,
//! all mixed into a single master bus. The engine exposes a monotonic clock
//! (`now`, in seconds of rendered audio) that every scheduled value is
//! anchored to, and a suspend/resume lifecycle so sound only starts after a
//! user gesture.

mod param;
mod player;
mod recorder;

pub use param::ScheduledParam;
pub use player::{list_output_devices, Player};
pub use recorder::Recorder;

use crate::synth::{Oscillator, Waveform};
use thiserror::Error;

/// Errors from graph operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown node handle {0:?}")]
    UnknownNode(NodeId),
}

/// Opaque handle to an oscillator+gain node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// An oscillator wired through its own gain into the master bus
struct OscNode {
    id: NodeId,
    oscillator: Oscillator,
    /// Clock time the oscillator starts producing samples
    start_at: f64,
    gain: ScheduledParam,
}

/// The audio engine
pub struct AudioEngine {
    sample_rate: f64,
    samples_rendered: u64,
    next_id: u64,
    nodes: Vec<OscNode>,
    master: ScheduledParam,
    suspended: bool,
}

impl AudioEngine {
    /// Create an engine with the master bus level set once.
    ///
    /// The engine starts suspended; nothing renders and the clock does not
    /// advance until [`resume`](Self::resume) is called.
    pub fn new(sample_rate: u32, master_level: f64) -> Self {
        let mut master = ScheduledParam::new(0.0);
        master.set_value_at_time(master_level, 0.0);

        Self {
            sample_rate: sample_rate as f64,
            samples_rendered: 0,
            next_id: 0,
            nodes: Vec::new(),
            master,
            suspended: true,
        }
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current clock time in seconds of rendered audio
    pub fn now(&self) -> f64 {
        self.samples_rendered as f64 / self.sample_rate
    }

    /// Check whether the engine is suspended
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Suspend rendering; the clock freezes and output is silence
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Resume rendering; idempotent
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Allocate an oscillator node with its gain initialized to zero.
    ///
    /// The node stays silent until the clock reaches `start_at`.
    pub fn add_oscillator(&mut self, waveform: Waveform, frequency: f64, start_at: f64) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let mut gain = ScheduledParam::new(0.0);
        gain.set_value_at_time(0.0, self.now());

        self.nodes.push(OscNode {
            id,
            oscillator: Oscillator::new(waveform, frequency, self.sample_rate),
            start_at,
            gain,
        });

        id
    }

    /// Disconnect and drop a node
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), EngineError> {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return Err(EngineError::UnknownNode(id));
        }
        Ok(())
    }

    /// Drop every node in the graph
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read access to a node's gain parameter
    pub fn gain(&self, id: NodeId) -> Result<&ScheduledParam, EngineError> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| &n.gain)
            .ok_or(EngineError::UnknownNode(id))
    }

    /// Write access to a node's gain parameter
    pub fn gain_mut(&mut self, id: NodeId) -> Result<&mut ScheduledParam, EngineError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .map(|n| &mut n.gain)
            .ok_or(EngineError::UnknownNode(id))
    }

    /// The master bus level parameter
    pub fn master(&self) -> &ScheduledParam {
        &self.master
    }

    /// Generate the next sample (mix of all started nodes)
    pub fn process(&mut self) -> f64 {
        if self.suspended {
            return 0.0;
        }

        let now = self.samples_rendered as f64 / self.sample_rate;
        let mut mix = 0.0;

        for node in &mut self.nodes {
            if now >= node.start_at {
                mix += node.oscillator.generate() * node.gain.value_at(now);
            }
        }

        self.samples_rendered += 1;
        mix * self.master.value_at(now)
    }

    /// Fill a buffer with samples, advancing the clock.
    ///
    /// A suspended engine fills with silence without advancing.
    pub fn render(&mut self, buffer: &mut [f32]) {
        if self.suspended {
            buffer.fill(0.0);
            return;
        }

        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }

        // Timelines only ever get sampled at or after `now` from here on
        let now = self.now();
        for node in &mut self.nodes {
            node.gain.prune_before(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_starts_suspended() {
        let engine = AudioEngine::new(44100, 0.25);

        assert!(engine.is_suspended());
        assert_eq!(engine.now(), 0.0);
        assert_eq!(engine.sample_rate(), 44100.0);
    }

    #[test]
    fn test_suspended_render_is_silent_and_frozen() {
        let mut engine = AudioEngine::new(44100, 0.25);
        let id = engine.add_oscillator(Waveform::Sine, 440.0, 0.0);
        engine
            .gain_mut(id)
            .unwrap()
            .set_value_at_time(0.25, 0.0);

        let mut buffer = vec![1.0f32; 256];
        engine.render(&mut buffer);

        assert!(buffer.iter().all(|&s| s == 0.0));
        assert_eq!(engine.now(), 0.0);
    }

    #[test]
    fn test_render_advances_clock() {
        let mut engine = AudioEngine::new(44100, 0.25);
        engine.resume();

        let mut buffer = vec![0.0f32; 44100];
        engine.render(&mut buffer);

        assert!((engine.now() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_node_produces_audio_after_start() {
        let mut engine = AudioEngine::new(44100, 0.25);
        engine.resume();

        let id = engine.add_oscillator(Waveform::Sine, 440.0, 0.1);
        engine
            .gain_mut(id)
            .unwrap()
            .set_value_at_time(0.25, 0.0);

        // First 0.1s: oscillator not started yet
        let mut lead_in = vec![0.0f32; 4410];
        engine.render(&mut lead_in);
        assert!(lead_in.iter().all(|&s| s == 0.0));

        let mut buffer = vec![0.0f32; 4410];
        engine.render(&mut buffer);
        let max = buffer.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(max > 0.0, "expected audio after the start time");
    }

    #[test]
    fn test_master_level_scales_output() {
        let mut engine = AudioEngine::new(44100, 0.25);
        engine.resume();

        let id = engine.add_oscillator(Waveform::Square, 10.0, 0.0);
        engine.gain_mut(id).unwrap().set_value_at_time(0.2, 0.0);

        let mut buffer = vec![0.0f32; 1024];
        engine.render(&mut buffer);

        // Square at gain 0.2 through a 0.25 master bus peaks at 0.05
        let max = buffer.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!((max - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_remove_node() {
        let mut engine = AudioEngine::new(44100, 0.25);
        let id = engine.add_oscillator(Waveform::Saw, 100.0, 0.0);

        assert_eq!(engine.node_count(), 1);
        engine.remove_node(id).unwrap();
        assert_eq!(engine.node_count(), 0);

        assert!(matches!(
            engine.remove_node(id),
            Err(EngineError::UnknownNode(_))
        ));
        assert!(engine.gain(id).is_err());
    }

    #[test]
    fn test_clear_drops_all_nodes() {
        let mut engine = AudioEngine::new(44100, 0.25);
        for i in 0..8 {
            engine.add_oscillator(Waveform::Sine, 100.0 * (i + 1) as f64, 0.0);
        }

        assert_eq!(engine.node_count(), 8);
        engine.clear();
        assert_eq!(engine.node_count(), 0);
    }

    #[test]
    fn test_resume_is_idempotent() {
        let mut engine = AudioEngine::new(44100, 0.25);
        engine.resume();
        engine.resume();
        assert!(!engine.is_suspended());
    }
}
