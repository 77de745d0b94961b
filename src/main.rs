//! Security Cameras CLI
//!
//! Runs a camera scene against the sandbox world and prints the
//! notifications, console switches and a per-camera summary.

use clap::{Parser, Subcommand};
use security_cameras::{
    config::SceneConfig,
    metrics::{MetricsRegistry, MetricsSnapshot},
    sandbox::Simulation,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "security-cameras",
    version,
    about = "Simulate patrolling security cameras and their consoles"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scene in the sandbox world.
    Simulate {
        /// TOML scene file; the built-in demo scene is used if omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks to run (overrides the scene file).
        #[arg(long)]
        ticks: Option<u32>,
        /// Fixed time step in seconds (overrides the scene file).
        #[arg(long)]
        dt: Option<f32>,
        /// Seed for target movement (overrides the scene file).
        #[arg(long)]
        seed: Option<u64>,
        /// Run in real time until interrupted.
        #[arg(long)]
        continuous: bool,
        /// Print Prometheus metrics after the run.
        #[arg(long)]
        metrics: bool,
    },
    /// Check a scene file without running it.
    Validate {
        /// TOML scene file.
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Security Cameras v{}", security_cameras::VERSION);

    match cli.command {
        Command::Simulate {
            config,
            ticks,
            dt,
            seed,
            continuous,
            metrics,
        } => {
            let mut scene = match config {
                Some(path) => load(&path),
                None => {
                    info!("No scene file given, using the demo scene");
                    SceneConfig::demo()
                }
            };
            if let Some(ticks) = ticks {
                scene.simulation.ticks = ticks;
            }
            if let Some(dt) = dt {
                scene.simulation.dt = dt;
            }
            if let Some(seed) = seed {
                scene.simulation.seed = seed;
            }
            simulate(&scene, continuous, metrics);
        }
        Command::Validate { config } => {
            let scene = load(&config);
            println!(
                "{}: OK ({} cameras, {} consoles, {} targets)",
                config.display(),
                scene.cameras.len(),
                scene.consoles.len(),
                scene.sandbox.targets.len()
            );
        }
    }
}

fn load(path: &Path) -> SceneConfig {
    match SceneConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn simulate(config: &SceneConfig, continuous: bool, with_metrics: bool) {
    let mut simulation = match Simulation::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid scene: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    if continuous {
        let flag = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
        info!("Running continuously, press Ctrl-C to stop");
    }

    let dt = config.simulation.dt;
    let mut remaining = config.simulation.ticks;
    while running.load(Ordering::SeqCst) && (continuous || remaining > 0) {
        simulation.step(dt);
        remaining = remaining.saturating_sub(1);

        for notification in simulation.notifications_mut().drain() {
            println!("[{:8.2}s] {}", simulation.elapsed(), notification);
        }
        if continuous {
            std::thread::sleep(Duration::from_secs_f32(dt));
        }
    }

    info!(
        "Ran {} ticks ({:.2}s simulated)",
        simulation.ticks(),
        simulation.elapsed()
    );

    for camera in simulation.scene().cameras() {
        println!(
            "{:<16} mode={:?} tracked={} detected={:?} feed={} frames={}",
            camera.display_name(),
            camera.mode(),
            camera.tracker().targets().len(),
            camera.currently_detected().map(|t| t.id.0),
            camera.feed_enabled(),
            simulation.frames_rendered(camera.id()),
        );
    }
    for console in simulation.scene().consoles() {
        if let Some(update) = simulation.display().current(console.id()) {
            println!("{:<16} {}", console.name(), update.label);
        }
    }
    println!(
        "Detections: {}, all clear: {}, autoswitches: {}",
        simulation.notifications().total_detections(),
        simulation.notifications().total_all_clears(),
        simulation.autoswitches()
    );

    if with_metrics {
        let output = MetricsRegistry::new().and_then(|registry| {
            registry.update(&MetricsSnapshot::from_simulation(&simulation));
            registry.encode()
        });
        match output {
            Ok(text) => print!("{}", text),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }
}
