//! Reel CLI
//!
//! Headless tools for the Reel animation runtime:
//! - `preview`: play the built-in demo timeline and print sampled frames
//! - `curve`: sample an easing curve
//! - `spring`: measure how a spring preset settles
//! - `init`: write a default reel.toml

mod config;
mod scene;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{ReelConfig, CONFIG_FILE};
use reel_animation::threading::Scheduler;
use reel_animation::{spring, CubicBezier, Easing, SpringConfig};
use reel_core::{Clock, PlaybackClock};
use scene::DemoScene;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Frame-stepped animation runtime
#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(about = "Reel animation runtime CLI", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file or directory containing reel.toml
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the demo timeline headless and print sampled frames
    Preview {
        /// Print every Nth frame
        #[arg(short, long, default_value = "5")]
        every: u64,

        /// Override the configured frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Spring preset for the final move
        #[arg(long, default_value = "smooth")]
        spring: String,
    },

    /// Sample an easing curve
    Curve {
        /// Easing name (e.g. ease-in-out-cubic), or x1,y1,x2,y2 for a cubic Bézier
        #[arg(value_name = "CURVE")]
        curve: String,

        /// Number of intervals between 0 and 1
        #[arg(short, long, default_value = "10")]
        samples: u32,
    },

    /// Simulate a spring preset from 0 to 1 and report how it settles
    Spring {
        /// Preset name (beat, plop, bounce, swing, jump, strike, smooth)
        #[arg(value_name = "PRESET", default_value = "default")]
        preset: String,
    },

    /// Write a default reel.toml
    Init {
        /// Directory to write into
        #[arg(value_name = "DIR", default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = ReelConfig::load(&args.config)?;
    init_logging(&config, args.verbose);

    match args.command {
        Commands::Preview { every, fps, spring } => preview(&config, every, fps, &spring),
        Commands::Curve { curve, samples } => sample_curve(&curve, samples),
        Commands::Spring { preset } => simulate_spring(&config, &preset),
        Commands::Init { path, force } => {
            let file = path.join(CONFIG_FILE);
            ReelConfig::write_default(&file, force)?;
            println!("Created {}", file.display());
            Ok(())
        }
    }
}

/// `--verbose` wins over `RUST_LOG`, which wins over the config file
fn init_logging(config: &ReelConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn spring_preset(name: &str) -> Result<SpringConfig> {
    SpringConfig::from_name(name).with_context(|| format!("Unknown spring preset `{name}`"))
}

fn preview(config: &ReelConfig, every: u64, fps: Option<f64>, spring: &str) -> Result<()> {
    let mut playback = config.playback;
    if let Some(fps) = fps {
        playback.fps = fps;
    }
    let spring = spring_preset(spring)?;
    let clock = Rc::new(PlaybackClock::from_config(&playback).context("Invalid playback settings")?);
    let scene = DemoScene::new(playback.fps);

    let mut scheduler = Scheduler::with_config(clock.clone(), config.scheduler.clone())?
        .with_events(scene.events.clone());
    scheduler.spawn(scene.timeline(spring));

    info!(fps = playback.fps, start = playback.start_frame, "playing demo timeline");
    let every = every.max(1);
    let print = |frame: u64| {
        println!("{frame:>5} {:>7.3}s  {}", clock.frames_to_seconds(frame), scene.sample());
    };

    let frames = scheduler.run_until_idle(|| {
        let frame = clock.current_frame();
        if frame % every == 0 {
            print(frame);
        }
        clock.advance();
    })?;
    print(clock.current_frame());
    info!(frames, "timeline finished");
    Ok(())
}

fn parse_curve(curve: &str) -> Result<Easing> {
    if let Some(easing) = Easing::from_name(curve) {
        return Ok(easing);
    }
    let points = curve
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Unknown curve `{curve}`"))?;
    match points[..] {
        [x1, y1, x2, y2] => Ok(Easing::CubicBezier(CubicBezier::new(x1, y1, x2, y2))),
        _ => anyhow::bail!("A cubic Bézier needs four control values, got {}", points.len()),
    }
}

fn sample_curve(curve: &str, samples: u32) -> Result<()> {
    let easing = parse_curve(curve)?;
    let samples = samples.max(1);
    for i in 0..=samples {
        let t = i as f64 / samples as f64;
        println!("{t:.3}  {:.6}", easing.apply(t));
    }
    Ok(())
}

fn simulate_spring(config: &ReelConfig, preset: &str) -> Result<()> {
    let spring_config = spring_preset(preset)?;
    let clock = Rc::new(PlaybackClock::from_config(&config.playback)?);
    let mut scheduler = Scheduler::with_config(clock.clone(), config.scheduler.clone())?;

    let peak = Rc::new(Cell::new(f64::MIN));
    let settled = Rc::new(Cell::new(None));
    let (p, s) = (peak.clone(), settled.clone());
    scheduler.spawn(spring(
        spring_config,
        0.0,
        1.0,
        reel_animation::spring::DEFAULT_SETTLE_TOLERANCE,
        move |value, _| p.set(p.get().max(value)),
        move |_, time| s.set(Some(time)),
    ));
    let frames = scheduler.run_until_idle(|| {
        clock.advance();
    })?;

    let settled = settled
        .get()
        .with_context(|| format!("Spring `{preset}` has invalid parameters"))?;
    println!("preset     {preset}");
    println!("mass       {}", spring_config.mass);
    println!("stiffness  {}", spring_config.stiffness);
    println!("damping    {}", spring_config.damping);
    println!("settled    {settled:.3}s ({frames} frames)");
    println!("overshoot  {:.1}%", (peak.get() - 1.0).max(0.0) * 100.0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_curve() {
        assert!(matches!(parse_curve("linear"), Ok(Easing::Linear)));
    }

    #[test]
    fn test_parse_bezier_curve() {
        let easing = parse_curve("0.25, 0.1, 0.25, 1").unwrap();
        assert!(matches!(easing, Easing::CubicBezier(_)));
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_parse_curve_errors() {
        assert!(parse_curve("wobble").is_err());
        assert!(parse_curve("0.1,0.2").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from(["reel", "preview", "--every", "10", "-v"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(args.command, Commands::Preview { every: 10, .. }));

        let args = Args::try_parse_from(["reel", "curve", "ease-in-out-cubic"]).unwrap();
        assert!(matches!(args.command, Commands::Curve { samples: 10, .. }));
    }
}
