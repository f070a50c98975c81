//! Envelope scheduler
//!
//! Runs independent, self-rescheduling envelope cycles on the controlled
//! channels: an 8-second attack/release ramp on the channel gain, a beat
//! counter driving the sound/silence readouts, a 100 ms display mirror, and
//! a randomized 1-8 second gap before the next cycle.
//!
//! All timers are explicit deadline fields on the runner, pumped by
//! [`EnvelopeScheduler::tick`] against the engine clock. Retriggering a
//! running cycle overwrites those fields, so no stale timer survives.

use crate::bank::OscillatorBank;
use crate::config::EnvelopeConfig;
use crate::display::DisplaySurface;
use crate::engine::AudioEngine;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Where a runner is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    /// Never triggered, or torn down
    Idle,
    /// Inside the 8-second envelope window
    Sounding,
    /// Counting silence until the next cycle
    Silent,
}

/// Per-channel envelope cycle state
pub struct EnvelopeRunner {
    channel_index: usize,
    /// One-based channel number; the peak amplitude divisor
    channel_number: usize,
    phase: RunnerPhase,
    sound_beats: u32,
    silence_beats: u32,
    /// Next beat-counter deadline
    next_beat_at: Option<f64>,
    /// Next 100 ms mirror deadline
    mirror_next_at: Option<f64>,
    /// End of the mirror window (= end of the envelope)
    mirror_until: Option<f64>,
    /// When the next cycle fires
    retrigger_at: Option<f64>,
}

impl EnvelopeRunner {
    fn new(channel_index: usize) -> Self {
        Self {
            channel_index,
            channel_number: channel_index + 1,
            phase: RunnerPhase::Idle,
            sound_beats: 0,
            silence_beats: 0,
            next_beat_at: None,
            mirror_next_at: None,
            mirror_until: None,
            retrigger_at: None,
        }
    }

    /// Channel this runner controls
    pub fn channel_index(&self) -> usize {
        self.channel_index
    }

    /// Current phase
    pub fn phase(&self) -> RunnerPhase {
        self.phase
    }

    /// Sound beats counted in the current cycle
    pub fn sound_beats(&self) -> u32 {
        self.sound_beats
    }

    /// Silence beats counted since the last cycle ended
    pub fn silence_beats(&self) -> u32 {
        self.silence_beats
    }

    /// When the next cycle is due, if one is pending
    pub fn retrigger_at(&self) -> Option<f64> {
        self.retrigger_at
    }
}

/// Scheduler for all controlled channels
pub struct EnvelopeScheduler {
    config: EnvelopeConfig,
    runners: Vec<EnvelopeRunner>,
    rng: SmallRng,
}

impl EnvelopeScheduler {
    /// Create runners for the configured controlled channels
    pub fn new(config: &EnvelopeConfig, seed: u64) -> Self {
        let runners = config
            .channels
            .iter()
            .map(|&index| EnvelopeRunner::new(index))
            .collect();

        Self {
            config: config.clone(),
            runners,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Read access to the runners
    pub fn runners(&self) -> &[EnvelopeRunner] {
        &self.runners
    }

    /// Find the runner for a channel
    pub fn runner(&self, channel_index: usize) -> Option<&EnvelopeRunner> {
        self.runners
            .iter()
            .find(|r| r.channel_index == channel_index)
    }

    /// Start cycles on every controlled channel at once.
    ///
    /// Aborts without side effects when any controlled channel is missing
    /// from the bank (bank not initialized yet).
    pub fn start_all(
        &mut self,
        engine: &mut AudioEngine,
        bank: &OscillatorBank,
        display: &mut dyn DisplaySurface,
    ) {
        for runner in &self.runners {
            if bank.channel(runner.channel_index).is_none() {
                eprintln!(
                    "Error: oscillator {} is not properly initialized.",
                    runner.channel_number
                );
                return;
            }
        }

        for idx in 0..self.runners.len() {
            self.start_cycle_at(idx, engine, bank, display);
        }
    }

    /// Start (or restart) the cycle on one controlled channel
    pub fn start_channel(
        &mut self,
        channel_index: usize,
        engine: &mut AudioEngine,
        bank: &OscillatorBank,
        display: &mut dyn DisplaySurface,
    ) {
        let Some(idx) = self
            .runners
            .iter()
            .position(|r| r.channel_index == channel_index)
        else {
            eprintln!("Error: channel {} has no envelope runner.", channel_index);
            return;
        };

        if bank.channel(channel_index).is_none() {
            eprintln!(
                "Error: oscillator {} is not properly initialized.",
                channel_index + 1
            );
            return;
        }

        self.start_cycle_at(idx, engine, bank, display);
    }

    /// Cancel every pending deadline and return the runners to idle
    pub fn teardown(&mut self) {
        for runner in &mut self.runners {
            runner.phase = RunnerPhase::Idle;
            runner.sound_beats = 0;
            runner.silence_beats = 0;
            runner.next_beat_at = None;
            runner.mirror_next_at = None;
            runner.mirror_until = None;
            runner.retrigger_at = None;
        }
    }

    fn start_cycle_at(
        &mut self,
        runner_idx: usize,
        engine: &mut AudioEngine,
        bank: &OscillatorBank,
        display: &mut dyn DisplaySurface,
    ) {
        let now = engine.now();
        let runner = &mut self.runners[runner_idx];

        let Some(channel) = bank.channel(runner.channel_index) else {
            eprintln!(
                "Error: oscillator {} is not properly initialized.",
                runner.channel_number
            );
            return;
        };

        let attack = self.config.attack;
        let window = attack + self.config.release;
        let target = bank.ceiling() / runner.channel_number as f64;

        // Wipe the old schedule and lay down the new envelope
        if let Ok(gain) = engine.gain_mut(channel.node()) {
            gain.cancel_scheduled_values(now);
            gain.set_value_at_time(0.0, now);
            gain.linear_ramp_to_value_at_time(target, now + attack);
            gain.linear_ramp_to_value_at_time(0.0, now + window);
        }

        // Overwriting the deadlines cancels any stale cycle's timers
        runner.silence_beats = 0;
        display.beats_of_silence(runner.channel_index, 0);
        runner.retrigger_at = None;

        runner.phase = RunnerPhase::Sounding;
        runner.sound_beats = 1;
        display.beats_of_sound(runner.channel_index, 1);
        runner.next_beat_at = Some(now + self.config.beat);

        runner.mirror_next_at = Some(now + self.config.mirror_interval);
        runner.mirror_until = Some(now + window);
    }

    /// Pump every due deadline against the current engine clock.
    ///
    /// Cooperative and non-blocking; call it from the UI loop or between
    /// render blocks.
    pub fn tick(
        &mut self,
        engine: &mut AudioEngine,
        bank: &OscillatorBank,
        display: &mut dyn DisplaySurface,
    ) {
        let now = engine.now();
        let beat = self.config.beat;
        let sound_beats_total = self.config.sound_beats;
        let mirror_interval = self.config.mirror_interval;

        let runners = &mut self.runners;
        let rng = &mut self.rng;
        let mut due_retriggers = Vec::new();

        for (idx, runner) in runners.iter_mut().enumerate() {
            // Beat counter
            while let Some(t) = runner.next_beat_at {
                if t > now {
                    break;
                }

                match runner.phase {
                    RunnerPhase::Sounding => {
                        runner.sound_beats += 1;
                        if runner.sound_beats <= sound_beats_total {
                            display.beats_of_sound(runner.channel_index, runner.sound_beats);
                        } else {
                            // Sound window over: reset the readout and start
                            // counting silence
                            display.beats_of_sound(runner.channel_index, 0);
                            runner.phase = RunnerPhase::Silent;
                            runner.silence_beats = 1;
                            display.beats_of_silence(runner.channel_index, 1);
                        }
                    }
                    RunnerPhase::Silent => {
                        runner.silence_beats += 1;
                        display.beats_of_silence(runner.channel_index, runner.silence_beats);
                    }
                    RunnerPhase::Idle => {
                        runner.next_beat_at = None;
                        break;
                    }
                }

                runner.next_beat_at = Some(t + beat);
            }

            // 100 ms mirror, independent of the per-frame mirror in the UI
            if let (Some(mut next), Some(until)) = (runner.mirror_next_at, runner.mirror_until) {
                let mut due = false;
                while next <= now && next <= until {
                    due = true;
                    next += mirror_interval;
                }

                if due {
                    let value = bank.poll_amplitude(engine, runner.channel_index);
                    display.amplitude(runner.channel_index, value);
                    display.slider(runner.channel_index, value);
                }

                if now >= until {
                    // Window elapsed: stop the mirror, schedule the next cycle
                    runner.mirror_next_at = None;
                    runner.mirror_until = None;

                    let gap_beats =
                        rng.random_range(self.config.retrigger_min..=self.config.retrigger_max);
                    runner.retrigger_at = Some(until + gap_beats as f64 * beat);
                } else {
                    runner.mirror_next_at = Some(next);
                }
            }

            if let Some(t) = runner.retrigger_at {
                if t <= now {
                    due_retriggers.push(idx);
                }
            }
        }

        for idx in due_retriggers {
            self.start_cycle_at(idx, engine, bank, display);
        }
    }
}
