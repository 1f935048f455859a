//! Cube Dash headless runner
//!
//! Plays a level at a fixed 60 Hz without rendering, optionally tapping
//! jump on a timer, and logs how each attempt ends.

use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use cube_dash::consts::SIM_DT;
use cube_dash::generator;
use cube_dash::loader::LevelSource;
use cube_dash::{BestRecords, Session, SessionEvent, SessionInput, Settings};

/// Auto-scrolling cube runner (headless)
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level document to play (the built-in fallback level if omitted)
    level: Option<PathBuf>,

    /// Play a generated level instead of a file
    #[arg(long, conflicts_with = "level")]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Tap jump every this many seconds
    #[arg(long)]
    jump_every: Option<f32>,

    /// Settings file (defaults if missing)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Best-records file, read at start and written at the end
    #[arg(long)]
    records: Option<PathBuf>,

    /// Write the generated level document here
    #[arg(long, requires = "seed")]
    save_level: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn level_source(args: &Args) -> LevelSource {
    if let Some(seed) = args.seed {
        let doc = generator::generate(seed);
        if let Some(path) = &args.save_level {
            match doc.write(path) {
                Ok(()) => log::info!("Generated level written to {}", path.display()),
                Err(e) => log::error!("Could not write {}: {}", path.display(), e),
            }
        }
        return LevelSource::from_document(doc);
    }
    match &args.level {
        Some(path) => LevelSource::from_path(path),
        None => LevelSource::Fallback,
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Cube Dash (headless) starting...");

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let records = match &args.records {
        Some(path) => BestRecords::load(path),
        None => BestRecords::new(),
    };

    let mut session = Session::new(level_source(&args), settings).with_records(records);

    let frames = (args.seconds.max(0.0) / SIM_DT).round() as u64;
    let mut elapsed = 0.0f32;
    let mut next_jump = args.jump_every.filter(|t| *t > 0.0);
    let mut jumps = 0u32;

    for _ in 0..frames {
        elapsed += SIM_DT;
        let jump = match (next_jump, args.jump_every) {
            (Some(at), Some(every)) if elapsed >= at => {
                next_jump = Some(at + every);
                true
            }
            _ => false,
        };

        for event in session.frame(SessionInput { jump }, SIM_DT) {
            match event {
                SessionEvent::Jump => jumps += 1,
                SessionEvent::Died { cause, percent } => {
                    log::info!("Died ({:?}) at {:.1}%", cause, percent)
                }
                SessionEvent::Completed => log::info!("Level complete"),
                SessionEvent::Restarted { attempt } => log::debug!("Attempt {}", attempt),
            }
        }

        if session.is_finished() {
            break;
        }
    }

    let hud = session.hud();
    log::info!(
        "'{}' after {:.1}s: attempt {}, {:.1}% now, best {:.1}%, {} jumps{}",
        hud.level_name,
        elapsed,
        hud.attempt,
        hud.percent,
        hud.best_percent,
        jumps,
        if hud.completed { ", completed" } else { "" }
    );

    if let Some(path) = &args.records {
        if let Err(e) = session.records().save(path) {
            log::error!("Could not save records to {}: {}", path.display(), e);
        }
    }
}
