//! Skywheel command-line player
//!
//! Animates the chart from one instant to another and prints every frame,
//! either as a text table or as one JSON object per line.
//!
//! Usage:
//!   cargo run --bin skywheel -- --to 2025-01-01T00:00 [--from 2024-06-01T12:00]
//!     [--lat -36.85 --lon 174.76] [--config skywheel.json] [--bodies bodies.json]
//!     [--json] [--simulate] [--fps 30] [--every 10] [--orbits]

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::info;
use skywheel::animation::frames::{FrameSource, FrameSubscriber, RealtimeRefresh, SimulatedRefresh};
use skywheel::chart::DisplayFrame;
use skywheel::input::{format_local, parse_local_datetime};
use skywheel::{BodyCatalog, ChartEngine, EngineConfig, KeplerianEphemeris, Observer, Time, ZodiacSign};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Skywheel animated chart player
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Animates planetary positions between two instants and prints each frame",
    long_about = None
)]
struct Args {
    /// Start instant as local YYYY-MM-DDTHH:MM (defaults to now)
    #[arg(long)]
    from: Option<String>,

    /// Target instant as local YYYY-MM-DDTHH:MM
    #[arg(long)]
    to: String,

    /// Observer latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Observer longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Body catalog file (JSON)
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Print frames as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Run without waiting for real time to pass
    #[arg(long, action = ArgAction::SetTrue)]
    simulate: bool,

    /// Display refresh rate in frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Print every nth frame; the last frame is always printed
    #[arg(long, default_value_t = 1)]
    every: usize,

    /// Print SVG path data for each orbit before animating
    #[arg(long, action = ArgAction::SetTrue)]
    orbits: bool,
}

/// Prints published frames to stdout
struct FramePrinter {
    json: bool,
    every: usize,
    seen: usize,
    offset: chrono::FixedOffset,
}

impl FramePrinter {
    fn print_text(&self, frame: &DisplayFrame) {
        let when = format_local(&frame.instant, self.offset).unwrap_or_else(|| frame.instant.to_string());
        let angle = |v: Option<f64>| match v {
            Some(deg) => format!("{:7.2}° {:<11}", deg, ZodiacSign::from_longitude(deg)),
            None => "      -".to_string(),
        };
        println!(
            "[{:6.2}%] {}  ASC {}  MC {}",
            frame.progress * 100.0,
            when,
            angle(frame.ascendant_deg),
            angle(frame.midheaven_deg)
        );

        for (body, pos) in &frame.positions {
            match pos.wheel {
                Some(wheel) => println!(
                    "    {:<8} {:7.2}° {} {:<11} {}",
                    body.name(),
                    wheel.angle_deg,
                    wheel.zodiac_sign.symbol(),
                    wheel.zodiac_sign,
                    if wheel.retrograde { "R" } else { " " },
                ),
                None => println!("    {:<8}       -", body.name()),
            }
            if let Some(p) = pos.orbit {
                println!("             orbit ({:8.2}, {:8.2})", p.x, p.y);
            }
        }
        for diagnostic in &frame.diagnostics {
            match diagnostic.body {
                Some(body) => println!("    ! {}: {}", body, diagnostic.message),
                None => println!("    ! {}", diagnostic.message),
            }
        }
    }
}

impl FrameSubscriber for FramePrinter {
    fn publish(&mut self, frame: &DisplayFrame) {
        let index = self.seen;
        self.seen += 1;
        if !frame.finished && index % self.every.max(1) != 0 {
            return;
        }

        if self.json {
            match serde_json::to_string(frame) {
                Ok(line) => println!("{}", line),
                Err(err) => log::warn!("Cannot serialize frame {}: {}", index, err),
            }
        } else {
            self.print_text(frame);
        }
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let observer = config.observer;
    config.observer = Observer::new(
        args.lat.unwrap_or(observer.latitude_deg),
        args.lon.unwrap_or(observer.longitude_deg),
    );
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let offset = config.utc_offset()?;
    let catalog = match &args.bodies {
        Some(path) => BodyCatalog::from_json_file(path)?,
        None => BodyCatalog::default(),
    };

    let start = match &args.from {
        Some(text) => parse_local_datetime(text, offset)?,
        None => Time::now(),
    };

    // Orbit paths trace from the wall clock, not from --from
    let mut engine = ChartEngine::new(KeplerianEphemeris::new(), catalog, config, start)?;
    engine.set_target_input(&args.to)?;
    info!("Animating {} -> {}", start, engine.target());

    if args.orbits {
        for path in engine.orbit_paths() {
            println!("{}: {}", path.body, path.svg_path_data());
        }
        for (body, err) in engine.orbit_failures() {
            println!("{}: no orbit ({})", body, err);
        }
    }

    let mut printer = FramePrinter {
        json: args.json,
        every: args.every,
        seen: 0,
        offset,
    };
    printer.publish(engine.current_frame());

    let mut source: Box<dyn FrameSource> = if args.simulate {
        Box::new(SimulatedRefresh::with_rate(args.fps))
    } else {
        Box::new(RealtimeRefresh::new(args.fps))
    };
    let published = engine.run(source.as_mut(), &mut printer);
    info!("Published {} frames", published);

    Ok(())
}
