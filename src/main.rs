use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod config;
mod sim;

use config::{AppConfig, load_app_config};
use cube_world::WorldGenMode;
use sim::ViewerPath;

#[derive(Parser, Debug)]
#[command(name = "cubeworld", about = "Headless voxel terrain streaming driver")]
struct Args {
    /// TOML file with [world] and [stream] sections.
    #[arg(long, default_value = "assets/cubeworld.toml")]
    config: PathBuf,
    #[arg(long)]
    seed: Option<i32>,
    /// Horizontal render radius in chunks.
    #[arg(long)]
    radius: Option<i32>,
    /// Generation threads; 0 generates on the main thread.
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Viewer speed in blocks per tick along +X.
    #[arg(long, default_value_t = 2.0)]
    speed: f32,
    /// Use the layered flat test landscape.
    #[arg(long)]
    flat: bool,
}

fn load(args: &Args) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut cfg = if args.config.exists() {
        load_app_config(&args.config)?
    } else {
        log::warn!(
            "config {} not found; using built-in defaults",
            args.config.display()
        );
        AppConfig::default()
    };
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(r) = args.radius {
        cfg.stream.render_radius = r;
    }
    if let Some(w) = args.workers {
        cfg.stream.workers = w;
    }
    if args.flat {
        cfg.world.mode = WorldGenMode::Flat;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let cfg = match load(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("configuration error: {e}");
            eprintln!("cubeworld: {e}");
            return ExitCode::FAILURE;
        }
    };
    match sim::run(&cfg, ViewerPath::along_x(args.speed), args.ticks) {
        Ok(summary) => {
            let s = &summary.stats;
            log::info!(
                "ran {} ticks in {} ms: installed={} recycled={} stale={} pool_reused={} created={} active={}",
                summary.ticks,
                summary.millis,
                s.installed,
                s.recycled,
                s.stale,
                s.pool_reused,
                s.created,
                s.active
            );
            log::info!(
                "uploads={} vertices={} triangles={}",
                summary.host.uploads,
                summary.host.vertices,
                summary.host.triangles
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cubeworld: {e}");
            ExitCode::FAILURE
        }
    }
}
