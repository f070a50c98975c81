//! Offline WAV rendering
//!
//! Writes engine output to a mono float WAV file, block by block.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    samples_written: u64,
}

impl Recorder {
    /// Create a recorder writing mono 32-bit float at `sample_rate`
    pub fn create(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            samples_written: 0,
        })
    }

    /// Number of samples written so far
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Duration written so far in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    /// Append a rendered block
    pub fn write_block(&mut self, block: &[f32]) -> Result<()> {
        for &sample in block {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.samples_written += block.len() as u64;
        Ok(())
    }

    /// Close the file and write the header. Must be called for a valid WAV.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_recorder_counts_samples() {
        let file = NamedTempFile::new().unwrap();
        let mut recorder = Recorder::create(file.path(), 44100).unwrap();

        assert_eq!(recorder.samples_written(), 0);

        recorder.write_block(&[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(recorder.samples_written(), 3);

        recorder.write_block(&vec![0.0; 44100 - 3]).unwrap();
        assert!((recorder.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_recorder_produces_valid_wav() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        {
            let mut recorder = Recorder::create(&path, 44100).unwrap();
            let block: Vec<f32> = (0..1000)
                .map(|i| (i as f32 / 1000.0 * std::f32::consts::PI * 2.0).sin())
                .collect();
            recorder.write_block(&block).unwrap();
            recorder.finalize().unwrap();
        }

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();

        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, SampleFormat::Float);

        let samples: Vec<f32> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 1000);
    }

    #[test]
    fn test_recorder_engine_block_roundtrip() {
        use crate::engine::AudioEngine;
        use crate::synth::Waveform;

        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        {
            let mut engine = AudioEngine::new(44100, 0.25);
            engine.resume();
            let id = engine.add_oscillator(Waveform::Sine, 440.0, 0.0);
            engine.gain_mut(id).unwrap().set_value_at_time(0.25, 0.0);

            let mut recorder = Recorder::create(&path, 44100).unwrap();
            let mut block = vec![0.0f32; 512];
            for _ in 0..8 {
                engine.render(&mut block);
                recorder.write_block(&block).unwrap();
            }
            recorder.finalize().unwrap();
        }

        let reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<f32> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 512 * 8);
        let max = samples.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(max > 0.0, "expected audible output in the file");
    }
}
