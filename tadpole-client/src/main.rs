use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tadpole_client::{run, RunOptions, ScheduledDrop};
use tadpole_shared::PondSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tadpole pond", long_about = None)]
struct Args {
    /// JSON file with pond settings; flags below override it
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of tadpoles (0-500)
    #[arg(short, long)]
    count: Option<usize>,

    /// Arena width
    #[arg(long)]
    width: Option<f32>,

    /// Arena height
    #[arg(long)]
    height: Option<f32>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Food to drop, as x,y or x,y@frame. May be repeated.
    #[arg(short = 'D', long = "drop")]
    drops: Vec<ScheduledDrop>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write the final frame as SVG
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_settings(args: &Args) -> Result<PondSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        }
        None => PondSettings::default(),
    };

    if let Some(count) = args.count {
        settings.tadpole_count = count;
    }
    if let Some(width) = args.width {
        settings.arena_width = width;
    }
    if let Some(height) = args.height {
        settings.arena_height = height;
    }
    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = load_settings(&args)?;
    log::info!("Tadpole pond starting...");
    log::info!(
        "Arena {}x{} with {} tadpoles for {} frames",
        settings.arena_width,
        settings.arena_height,
        settings.tadpole_count,
        args.frames
    );

    let options = RunOptions {
        settings,
        frames: args.frames,
        drops: args.drops.clone(),
        seed: args.seed,
    };
    let report = run(&options).context("Simulation error")?;

    if let Some(path) = &args.svg {
        fs::write(path, report.scene.to_svg())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Final frame written to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
