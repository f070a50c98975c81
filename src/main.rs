//! Overtone - interactive additive synthesis playground

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use overtone::config::{self, OvertoneConfig};
use overtone::display::NullDisplay;
use overtone::engine::{list_output_devices, Recorder};
use overtone::session::Session;
use overtone::ui;

mod cli;

use cli::{Cli, Commands};

/// Load the config, falling back to defaults when the default path is absent
fn load_or_default(path: &Path) -> Result<OvertoneConfig> {
    if path.exists() {
        config::load_config(path)
    } else {
        println!("No configuration at {:?}, using defaults.", path);
        Ok(OvertoneConfig::default())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config: config_path,
        } => {
            let cfg = load_or_default(&config_path)?;

            let mut session = Session::new(&cfg);
            ui::run(&mut session, cfg.audio.device.as_deref())?;
            session.teardown();
        }

        Commands::Render {
            config: config_path,
            output,
            duration,
            envelopes,
            rise,
            sawtooth,
            seed,
        } => {
            let cfg = load_or_default(&config_path)?;

            println!("Rendering {} seconds to {:?}...", duration, output);

            let mut session = match seed {
                Some(seed) => Session::with_seed(&cfg, seed),
                None => Session::new(&cfg),
            };
            session.ensure_started(&mut NullDisplay);

            if rise {
                session.trigger_rise_all();
            }
            if envelopes {
                session.start_envelopes(&mut NullDisplay);
            }
            if sawtooth {
                session.start_sawtooth();
            }

            let sample_rate = cfg.audio.sample_rate;
            let total_samples = sample_rate as u64 * duration;
            let mut recorder = Recorder::create(&output, sample_rate)?;

            let engine = session.engine();
            let mut block = vec![0.0f32; cfg.audio.buffer_size];
            let mut last_progress = 0;

            while recorder.samples_written() < total_samples {
                let remaining = (total_samples - recorder.samples_written()) as usize;
                let len = remaining.min(block.len());

                engine.lock().unwrap().render(&mut block[..len]);
                recorder.write_block(&block[..len])?;

                // Fire any beat, mirror or retrigger deadlines that came due
                session.tick(&mut NullDisplay);

                let seconds = recorder.samples_written() / sample_rate as u64;
                if seconds > last_progress {
                    last_progress = seconds;
                    print!("\r  Progress: {}s / {}s", seconds, duration);
                    use std::io::Write;
                    std::io::stdout().flush()?;
                }
            }

            recorder.finalize()?;
            println!("\nRendered to {:?}", output);
        }

        Commands::Devices => {
            println!("Available audio output devices:\n");

            let devices = list_output_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for (name, config) in devices {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check {
            config: config_path,
        } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Buffer size: {}", cfg.audio.buffer_size);
                    println!("  Master level: {:.2}", cfg.master.level);
                    println!("  Fundamental: {:.3} Hz", cfg.bank.fundamental);
                    println!("  Harmonic channels: {}", cfg.bank.channels);
                    println!("  Amplitude ceiling: {:.2}", cfg.bank.amplitude_ceiling);
                    let numbers: Vec<String> = cfg
                        .envelope
                        .channels
                        .iter()
                        .map(|&i| (i + 1).to_string())
                        .collect();
                    println!("  Envelope oscillators: {}", numbers.join(", "));
                    println!("  Sawtooth level: {:.2}", cfg.sawtooth.level);
                }
                Err(e) => {
                    println!("Configuration is invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../overtone.example.yaml");

            let path = "overtone.yaml";
            if Path::new(path).exists() {
                println!("overtone.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created overtone.yaml with example configuration.");
            }
        }
    }

    Ok(())
}
