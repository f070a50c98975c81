//! Display surface seam
//!
//! The core never talks to a terminal directly. It reports beat counts,
//! amplitude readouts and slider positions through this trait; the TUI
//! implements it, and headless paths use [`NullDisplay`].

/// Receiver for the core's display updates
pub trait DisplaySurface {
    /// Sound beat counter for a channel ("beats of sound: N")
    fn beats_of_sound(&mut self, channel: usize, beats: u32);

    /// Silence beat counter for a channel ("beats of silence: N")
    fn beats_of_silence(&mut self, channel: usize, beats: u32);

    /// Amplitude readout for a channel
    fn amplitude(&mut self, channel: usize, value: f64);

    /// Slider position for a channel (mirror of the gain value)
    fn slider(&mut self, channel: usize, value: f64);

    /// Drop everything previously displayed (bank rebuild)
    fn clear(&mut self);
}

/// Format an amplitude readout the way the display shows it
pub fn amplitude_text(channel: usize, value: f64) -> String {
    format!("Oscillator {} amplitude = {:.3}", channel + 1, value)
}

/// A display that swallows all updates
pub struct NullDisplay;

impl DisplaySurface for NullDisplay {
    fn beats_of_sound(&mut self, _channel: usize, _beats: u32) {}
    fn beats_of_silence(&mut self, _channel: usize, _beats: u32) {}
    fn amplitude(&mut self, _channel: usize, _value: f64) {}
    fn slider(&mut self, _channel: usize, _value: f64) {}
    fn clear(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amplitude_text_is_one_based() {
        assert_eq!(amplitude_text(0, 0.0), "Oscillator 1 amplitude = 0.000");
        assert_eq!(amplitude_text(3, 0.0625), "Oscillator 4 amplitude = 0.063");
    }

    #[test]
    fn test_null_display_accepts_updates() {
        let mut display = NullDisplay;
        display.beats_of_sound(3, 1);
        display.beats_of_silence(3, 0);
        display.amplitude(0, 0.25);
        display.slider(0, 0.25);
        display.clear();
    }
}
