//! Session context
//!
//! One `Session` owns the whole running system: the audio engine behind a
//! shared handle for the output stream, the oscillator bank, the envelope
//! scheduler and the auxiliary sawtooth voice. It replaces scattered global
//! state with explicit `ensure_started`/`teardown` lifecycle calls.

mod sawtooth;

pub use sawtooth::SawtoothVoice;

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::bank::OscillatorBank;
use crate::config::OvertoneConfig;
use crate::display::DisplaySurface;
use crate::engine::AudioEngine;
use crate::scheduler::EnvelopeScheduler;

/// The running system
pub struct Session {
    engine: Arc<Mutex<AudioEngine>>,
    bank: OscillatorBank,
    scheduler: EnvelopeScheduler,
    sawtooth: SawtoothVoice,
    /// One-time initialization guard for the bank build
    started: bool,
}

impl Session {
    /// Create a session from config with a time-derived retrigger seed
    pub fn new(config: &OvertoneConfig) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ d.subsec_nanos() as u64)
            .unwrap_or(0x5eed);
        Self::with_seed(config, seed)
    }

    /// Create a session with a fixed retrigger seed (deterministic cycles)
    pub fn with_seed(config: &OvertoneConfig, seed: u64) -> Self {
        let engine = AudioEngine::new(config.audio.sample_rate, config.master.level);

        Self {
            engine: Arc::new(Mutex::new(engine)),
            bank: OscillatorBank::new(&config.bank),
            scheduler: EnvelopeScheduler::new(&config.envelope, seed),
            sawtooth: SawtoothVoice::new(
                config.bank.fundamental,
                config.sawtooth.level,
                config.bank.lead_in,
            ),
            started: false,
        }
    }

    /// Shared engine handle for the output stream
    pub fn engine(&self) -> Arc<Mutex<AudioEngine>> {
        self.engine.clone()
    }

    /// The oscillator bank
    pub fn bank(&self) -> &OscillatorBank {
        &self.bank
    }

    /// The envelope scheduler
    pub fn scheduler(&self) -> &EnvelopeScheduler {
        &self.scheduler
    }

    /// Check whether the sawtooth voice is sounding
    pub fn sawtooth_running(&self) -> bool {
        self.sawtooth.is_running()
    }

    /// Current engine clock time in seconds
    pub fn now(&self) -> f64 {
        self.engine.lock().unwrap().now()
    }

    /// Opportunistic start: build the bank at most once, then resume the
    /// engine. Safe to call on every user gesture.
    pub fn ensure_started(&mut self, display: &mut dyn DisplaySurface) {
        let mut engine = self.engine.lock().unwrap();

        if !self.started {
            self.bank.init(&mut engine, display);
            self.started = true;
        }

        engine.resume();
    }

    /// Stop everything and drop the graph; a later `ensure_started`
    /// rebuilds from scratch.
    pub fn teardown(&mut self) {
        let mut engine = self.engine.lock().unwrap();

        self.scheduler.teardown();
        if self.sawtooth.is_running() {
            self.sawtooth.stop(&mut engine);
        }
        self.bank.teardown(&mut engine);
        engine.suspend();
        self.started = false;
    }

    /// Set a channel amplitude from user input (clamped by the bank)
    pub fn set_amplitude(&mut self, index: usize, value: f64) {
        let mut engine = self.engine.lock().unwrap();
        self.bank.set_amplitude(&mut engine, index, value);
    }

    /// Read a channel amplitude for display mirroring
    pub fn poll_amplitude(&self, index: usize) -> f64 {
        let engine = self.engine.lock().unwrap();
        self.bank.poll_amplitude(&engine, index)
    }

    /// One-shot rise ramp across the whole bank
    pub fn trigger_rise_all(&mut self) {
        let mut engine = self.engine.lock().unwrap();
        self.bank.trigger_rise_all(&mut engine);
    }

    /// One-shot fall ramp across the whole bank
    pub fn trigger_fall_all(&mut self) {
        let mut engine = self.engine.lock().unwrap();
        self.bank.trigger_fall_all(&mut engine);
    }

    /// Start envelope cycles on every controlled channel
    pub fn start_envelopes(&mut self, display: &mut dyn DisplaySurface) {
        let mut engine = self.engine.lock().unwrap();
        self.scheduler.start_all(&mut engine, &self.bank, display);
    }

    /// Start (or restart) the envelope cycle on one controlled channel
    pub fn start_envelope(&mut self, channel: usize, display: &mut dyn DisplaySurface) {
        let mut engine = self.engine.lock().unwrap();
        self.scheduler
            .start_channel(channel, &mut engine, &self.bank, display);
    }

    /// Start the auxiliary sawtooth voice
    pub fn start_sawtooth(&mut self) {
        let mut engine = self.engine.lock().unwrap();
        self.sawtooth.start(&mut engine);
    }

    /// Stop the auxiliary sawtooth voice
    pub fn stop_sawtooth(&mut self) {
        let mut engine = self.engine.lock().unwrap();
        self.sawtooth.stop(&mut engine);
    }

    /// Pump the scheduler's deadlines against the engine clock
    pub fn tick(&mut self, display: &mut dyn DisplaySurface) {
        let mut engine = self.engine.lock().unwrap();
        self.scheduler.tick(&mut engine, &self.bank, display);
    }
}
