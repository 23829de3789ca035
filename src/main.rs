use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cubic_caves::ascii;
use cubic_caves::connector::NoopObserver;
use cubic_caves::grid::ColumnGrid;
use cubic_caves::{CavePreset, CubePipeline, CubePos, LayerRecorder, WorldGenConfig};

#[derive(Parser, Debug)]
#[command(name = "cubic_caves")]
#[command(about = "Generate cubic caves and connect them across the terrain band boundary")]
struct Args {
    /// World seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cube X coordinate
    #[arg(short = 'x', long, default_value = "0", allow_hyphen_values = true)]
    x: i32,

    /// Cube Y coordinate (default: the connector cube of the default band)
    #[arg(short = 'y', long, default_value = "1", allow_hyphen_values = true)]
    y: i32,

    /// Cube Z coordinate
    #[arg(short = 'z', long, default_value = "0", allow_hyphen_values = true)]
    z: i32,

    /// Also generate every cube within this horizontal radius, in parallel
    #[arg(short, long, default_value = "0")]
    radius: i32,

    /// Generation preset (none, normal, hollow, debug)
    #[arg(short, long, default_value = "normal")]
    preset: CavePreset,

    /// JSON configuration file (overrides --preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration as JSON and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Export the per-layer connector trace of the center cube as JSON
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Print the bottom slices of the center cube
    #[arg(long)]
    ascii: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            WorldGenConfig::from_json_str(&std::fs::read_to_string(path)?)?
        }
        None => {
            println!("Preset: {} ({})", args.preset, args.preset.description());
            WorldGenConfig::from_preset(args.preset)
        }
    };

    if let Some(path) = &args.write_config {
        std::fs::write(path, config.to_json_string()?)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let pipeline = CubePipeline::from_config(seed, &config)?;
    let center = CubePos::new(args.x, args.y, args.z);

    println!("Generating with seed: {}", seed);
    println!(
        "Band: cubes {}..{} (connector at y={})",
        pipeline.layout().band_min,
        pipeline.layout().band_max,
        pipeline.layout().band_min + 1
    );

    let mut recorder = LayerRecorder::new();
    let (cube, summary) = pipeline.generate_cube_observed(center, &mut recorder)?;

    println!("\nCube {}", center);
    match &summary {
        Some(summary) => {
            println!("  Max height: {}", summary.max_y);
            match summary.initial_bounds {
                Some(bounds) => println!("  Initial bounds: {}", bounds),
                None => println!("  Initial bounds: none"),
            }
            println!("  Layers: {}", summary.layers);
            println!("  Voxels written: {}", summary.voxels_written);
            println!("  Termination: {:?}", summary.termination);
        }
        None => println!("  Not a connector cube"),
    }

    if let Some(initial) = recorder.initial.as_ref().filter(|i| i.bounds.is_some()) {
        if let Some(grid) = ColumnGrid::from_rows(&initial.grid) {
            println!("\nDepth map below {}:", center);
            print!("{}", ascii::render_depth_grid(&grid));
        }
    }

    if args.ascii {
        let top = summary.map(|s| s.max_y).unwrap_or(3).min(5);
        let ys: Vec<usize> = (0..=top).collect();
        println!();
        print!("{}", ascii::render_slices(&cube, &ys));
    }

    if let Some(path) = &args.export_json {
        std::fs::write(path, recorder.to_json()?)?;
        info!("Layer trace written to {}", path.display());
    }

    if args.radius > 0 {
        let positions = center.horizontal_neighborhood(args.radius);
        println!("\nGenerating {} cubes around {}...", positions.len(), center);

        let start = Instant::now();
        let results: Vec<_> = positions
            .par_iter()
            .map(|&pos| (pos, pipeline.generate_cube_observed(pos, &mut NoopObserver)))
            .collect();
        let elapsed = start.elapsed();

        let mut failed = 0;
        let mut connected = 0;
        let mut voxels = 0;
        for (pos, result) in &results {
            match result {
                Ok((_, Some(summary))) => {
                    connected += 1;
                    voxels += summary.voxels_written;
                }
                Ok((_, None)) => {}
                Err(e) => {
                    failed += 1;
                    println!("  {} failed: {}", pos, e);
                }
            }
        }

        println!("  Time: {:?}", elapsed);
        println!("  Connected: {} cubes, {} voxels", connected, voxels);
        println!("  Failed: {}", failed);
    }

    Ok(())
}
