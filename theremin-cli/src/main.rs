//! Theremin CLI: play the instrument from a terminal.
//!
//! There is no pointer here, so pointer gestures arrive either as text
//! commands on stdin (`play`) or from a random performer (`wander`).

use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::{crate_version, Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use theremin_core::notes::{frequency_to_note, Note};
use theremin_core::pitch::Scale;
use theremin_engine::device::list_output_devices;
use theremin_engine::{Gesture, Instrument, InstrumentConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(version = crate_version!(), about = "A pointer-controlled virtual theremin.")]
struct Cli {
    #[clap(flatten)]
    overrides: Overrides,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Lowest frequency on the axis (Hz).
    #[arg(long, global = true)]
    low: Option<f64>,
    /// Highest frequency on the axis (Hz).
    #[arg(long, global = true)]
    high: Option<f64>,
    /// Spread pitch linearly instead of by octaves.
    #[arg(long, global = true)]
    linear: bool,
    /// 440 Hz mono 16-bit WAV to play instead of the synthesized tone.
    #[arg(long, global = true)]
    sample: Option<PathBuf>,
    /// Output device name.
    #[arg(long, global = true)]
    device: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available audio output devices.
    Devices {},
    /// Prints where each note starts along the pitch axis.
    Notes {},
    /// Plays the instrument from stdin: `move <x> <y>`, `press`, `release`, `quit`.
    Play {},
    /// Lets a random performer glide around the instrument.
    Wander {
        /// How long to perform.
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        /// Seed for a repeatable performance.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_config(o: &Overrides) -> Result<InstrumentConfig, Box<dyn Error>> {
    let mut config = match &o.config {
        Some(path) => InstrumentConfig::deserialize(path)?,
        None => InstrumentConfig::default(),
    };
    if let Some(low) = o.low { config.low_hz = low; }
    if let Some(high) = o.high { config.high_hz = high; }
    if o.linear { config.scale = Scale::Linear; }
    if let Some(sample) = &o.sample { config.sample_file = Some(sample.clone()); }
    if let Some(device) = &o.device { config.device = Some(device.clone()); }
    config.validate()?;
    Ok(config)
}

fn print_axis_map(config: &InstrumentConfig) -> Result<(), Box<dyn Error>> {
    let axis = config.pitch_axis()?;
    println!("{:>6}  {:>10}  {:<5}  shade", "x", "Hz", "note");
    let mut last: Option<Note> = None;
    for x in 0..config.window_width {
        let f = axis.axis_to_frequency(f64::from(x));
        let note = frequency_to_note(f)?;
        if last != Some(note) {
            println!("{x:>6}  {f:>10.2}  {:<5}  {}", note.to_string(), note.shade().gray());
            last = Some(note);
        }
    }
    Ok(())
}

fn start(config: &InstrumentConfig) -> Result<(Instrument, Gesture), Box<dyn Error>> {
    let instrument = Instrument::start(config)?;
    if let Some(e) = instrument.sample_error() {
        eprintln!("ERROR: could not load the sound file. {e}");
    }
    println!(
        "Using device: {} ({} Hz, {} ch) | voice: {:?}",
        instrument.output().device_name(),
        instrument.output().sample_rate(),
        instrument.output().channels(),
        instrument.mode()
    );
    let gesture = instrument.gesture(config)?;
    Ok((instrument, gesture))
}

fn parse_point(mut parts: std::str::SplitWhitespace<'_>) -> Option<(f64, f64)> {
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

fn run_commands(gesture: &mut Gesture) -> Result<(), Box<dyn Error>> {
    println!("commands: move <x> <y> | press | release | quit");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("move") => match parse_point(parts) {
                Some((x, y)) if gesture.pointer_moved(x, y) => println!("{}", gesture.readout()),
                Some(_) => println!("(outside the playing area)"),
                None => warn!("usage: move <x> <y>"),
            },
            Some("press") => {
                gesture.pointer_pressed();
                println!("{}", gesture.readout());
            }
            Some("release") => gesture.pointer_released(),
            Some("quit" | "exit") => break,
            Some(other) => warn!("unknown command: {other}"),
            None => {}
        }
    }
    Ok(())
}

fn wander(gesture: &mut Gesture, config: &InstrumentConfig, seconds: u64, seed: Option<u64>) {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let width = f64::from(config.window_width);
    let height = f64::from(config.window_height);
    let deadline = Instant::now() + Duration::from_secs(seconds);

    let mut x = rng.gen_range(0.0..width);
    while Instant::now() < deadline {
        // stay in the louder upper part of the surface
        let y = rng.gen_range(0.0..height * 0.7);
        gesture.pointer_moved(x, y);
        gesture.pointer_pressed();
        info!("{}", gesture.readout().replace('\n', " "));

        let target = rng.gen_range(0.0..width);
        let steps: u32 = rng.gen_range(20..120);
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            gesture.pointer_moved(x + (target - x) * t, y);
            thread::sleep(Duration::from_millis(10));
        }
        x = target;

        gesture.pointer_released();
        thread::sleep(Duration::from_millis(rng.gen_range(50..400)));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Devices {} => {
            println!("Available output devices:");
            for name in list_output_devices()? {
                println!("- {name}");
            }
        }
        Commands::Notes {} => print_axis_map(&load_config(&cli.overrides)?)?,
        Commands::Play {} => {
            let config = load_config(&cli.overrides)?;
            let (_instrument, mut gesture) = start(&config)?;
            run_commands(&mut gesture)?;
        }
        Commands::Wander { seconds, seed } => {
            let config = load_config(&cli.overrides)?;
            let (_instrument, mut gesture) = start(&config)?;
            wander(&mut gesture, &config, seconds, seed);
        }
    }
    Ok(())
}
