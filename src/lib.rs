//! Overtone - interactive additive synthesis playground
//!
//! A bank of sine oscillators tuned to the harmonic series over a low C,
//! each with its own amplitude slider, plus randomized envelope cycles on a
//! couple of channels and an auxiliary sawtooth voice. Everything mixes into
//! a single master bus rendered in real time or offline to WAV.

pub mod bank;
pub mod config;
pub mod display;
pub mod engine;
pub mod scheduler;
pub mod session;
pub mod synth;
pub mod ui;

pub use config::OvertoneConfig;
pub use session::Session;
