//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for Overtone
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OvertoneConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Master bus settings
    #[serde(default)]
    pub master: MasterConfig,

    /// Harmonic bank settings
    #[serde(default)]
    pub bank: BankConfig,

    /// Envelope cycle settings
    #[serde(default)]
    pub envelope: EnvelopeConfig,

    /// Auxiliary sawtooth voice settings
    #[serde(default)]
    pub sawtooth: SawtoothConfig,
}

impl OvertoneConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if !(0.0..=1.0).contains(&self.master.level) {
            bail!("Master level must be between 0.0 and 1.0");
        }

        if self.bank.fundamental <= 0.0 {
            bail!("Fundamental frequency must be positive");
        }
        if self.bank.channels == 0 || self.bank.channels > 1024 {
            bail!("Bank must have between 1 and 1024 channels");
        }
        if self.bank.amplitude_ceiling <= 0.0 || self.bank.amplitude_ceiling > 1.0 {
            bail!("Amplitude ceiling must be between 0.0 and 1.0");
        }
        if self.bank.lead_in < 0.0 {
            bail!("Lead-in must not be negative");
        }
        if self.bank.trigger_ramp <= 0.0 {
            bail!("Trigger ramp duration must be positive");
        }

        if self.envelope.attack <= 0.0 || self.envelope.release <= 0.0 {
            bail!("Envelope attack and release must be positive");
        }
        if self.envelope.beat <= 0.0 {
            bail!("Beat duration must be positive");
        }
        if self.envelope.mirror_interval <= 0.0 {
            bail!("Mirror interval must be positive");
        }
        if self.envelope.retrigger_min == 0 {
            bail!("Retrigger delay must be at least one beat");
        }
        if self.envelope.retrigger_min > self.envelope.retrigger_max {
            bail!("Retrigger minimum must not exceed the maximum");
        }
        for &channel in &self.envelope.channels {
            if channel >= self.bank.channels {
                bail!(
                    "Controlled channel {} is outside the bank (0..{})",
                    channel,
                    self.bank.channels
                );
            }
        }

        if !(0.0..=1.0).contains(&self.sawtooth.level) {
            bail!("Sawtooth level must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Render block size in samples (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

fn default_sample_rate() -> u32 {
    44100
}
fn default_buffer_size() -> usize {
    512
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

/// Master bus settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Fixed mix bus level, set once (default: 0.25)
    #[serde(default = "default_master_level")]
    pub level: f64,
}

fn default_master_level() -> f64 {
    0.25
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            level: default_master_level(),
        }
    }
}

/// Harmonic bank configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    /// Fundamental frequency in Hz; one octave above the lowest C
    /// (default: 32.703 * 2 = 65.406)
    #[serde(default = "default_fundamental")]
    pub fundamental: f64,

    /// Number of harmonic channels (default: 128)
    #[serde(default = "default_channels")]
    pub channels: usize,

    /// Upper clamp for every amplitude write (default: 0.25)
    #[serde(default = "default_ceiling")]
    pub amplitude_ceiling: f64,

    /// Oscillator start delay in seconds, avoids startup glitches
    /// (default: 0.1)
    #[serde(default = "default_lead_in")]
    pub lead_in: f64,

    /// Bulk rise/fall ramp duration in seconds (default: 4.0)
    #[serde(default = "default_trigger_ramp")]
    pub trigger_ramp: f64,
}

fn default_fundamental() -> f64 {
    32.703 * 2.0
}
fn default_channels() -> usize {
    128
}
fn default_ceiling() -> f64 {
    0.25
}
fn default_lead_in() -> f64 {
    0.1
}
fn default_trigger_ramp() -> f64 {
    4.0
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            fundamental: default_fundamental(),
            channels: default_channels(),
            amplitude_ceiling: default_ceiling(),
            lead_in: default_lead_in(),
            trigger_ramp: default_trigger_ramp(),
        }
    }
}

/// Envelope cycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Controlled channel indices, zero-based (default: [3, 4])
    #[serde(default = "default_envelope_channels")]
    pub channels: Vec<usize>,

    /// Attack ramp in seconds (default: 4.0)
    #[serde(default = "default_attack")]
    pub attack: f64,

    /// Release ramp in seconds (default: 4.0)
    #[serde(default = "default_release")]
    pub release: f64,

    /// Beat duration in seconds (default: 1.0)
    #[serde(default = "default_beat")]
    pub beat: f64,

    /// Beats counted in the sound window (default: 8)
    #[serde(default = "default_sound_beats")]
    pub sound_beats: u32,

    /// Display mirror cadence in seconds (default: 0.1)
    #[serde(default = "default_mirror_interval")]
    pub mirror_interval: f64,

    /// Shortest retrigger gap in whole beats (default: 1)
    #[serde(default = "default_retrigger_min")]
    pub retrigger_min: u32,

    /// Longest retrigger gap in whole beats (default: 8)
    #[serde(default = "default_retrigger_max")]
    pub retrigger_max: u32,
}

fn default_envelope_channels() -> Vec<usize> {
    vec![3, 4]
}
fn default_attack() -> f64 {
    4.0
}
fn default_release() -> f64 {
    4.0
}
fn default_beat() -> f64 {
    1.0
}
fn default_sound_beats() -> u32 {
    8
}
fn default_mirror_interval() -> f64 {
    0.1
}
fn default_retrigger_min() -> u32 {
    1
}
fn default_retrigger_max() -> u32 {
    8
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            channels: default_envelope_channels(),
            attack: default_attack(),
            release: default_release(),
            beat: default_beat(),
            sound_beats: default_sound_beats(),
            mirror_interval: default_mirror_interval(),
            retrigger_min: default_retrigger_min(),
            retrigger_max: default_retrigger_max(),
        }
    }
}

/// Auxiliary sawtooth voice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SawtoothConfig {
    /// Fixed voice level (default: 0.5)
    #[serde(default = "default_sawtooth_level")]
    pub level: f64,
}

fn default_sawtooth_level() -> f64 {
    0.5
}

impl Default for SawtoothConfig {
    fn default() -> Self {
        Self {
            level: default_sawtooth_level(),
        }
    }
}
