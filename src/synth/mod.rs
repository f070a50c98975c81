//! Synthesis primitives
//!
//! Contains the waveform oscillator the engine's signal chains are built from.

mod oscillator;

pub use oscillator::{Oscillator, Waveform};
