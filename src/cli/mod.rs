//! CLI interface for Overtone

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Interactive additive synthesis playground
#[derive(Parser)]
#[command(name = "overtone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive terminal interface with live audio
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "overtone.yaml")]
        config: PathBuf,
    },

    /// Render to a WAV file without an audio device
    Render {
        /// Configuration file path
        #[arg(short, long, default_value = "overtone.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "30")]
        duration: u64,

        /// Start the randomized envelope cycles at time zero
        #[arg(long)]
        envelopes: bool,

        /// Trigger the bank-wide rise ramp at time zero
        #[arg(long)]
        rise: bool,

        /// Start the auxiliary sawtooth voice at time zero
        #[arg(long)]
        sawtooth: bool,

        /// Fixed seed for the envelope retrigger gaps
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "overtone.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
