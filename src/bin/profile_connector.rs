//! Profiling tool for cube generation and the cave connector

use std::time::{Duration, Instant};

use cubic_caves::carvers::{build_carvers, WorldContext};
use cubic_caves::{CaveConnector, CavePreset, CubePipeline, CubePos, CubePrimer, WorldGenConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seed = 1337u64;
    let radius = 8;

    let config = WorldGenConfig::from_preset(CavePreset::Normal);
    let pipeline = CubePipeline::from_config(seed, &config)?;
    let positions = CubePos::new(0, 1, 0).horizontal_neighborhood(radius);

    println!("=== Performance Profiling ===");
    println!("Connector cubes: {} (radius {})", positions.len(), radius);
    println!("Rayon threads: {}", rayon::current_num_threads());
    println!();

    // Connector alone, on a solid cube, to isolate the scratch generation cost
    let world = WorldContext::new(seed);
    let connector = CaveConnector::new(build_carvers(seed, &config.caves, &config.ravines), config.connector);
    let mut connector_time = Duration::ZERO;
    let mut layers = 0;
    let mut voxels = 0;
    for &pos in &positions {
        let mut primer = CubePrimer::uniform(config.connector.scratch_fill);
        let start = Instant::now();
        let summary = connector.connect(&world, &mut primer, pos)?;
        connector_time += start.elapsed();
        layers += summary.layers;
        voxels += summary.voxels_written;
    }
    println!("Connector only: {:?}", connector_time);
    println!("  Per cube: {:?}", connector_time / positions.len() as u32);
    println!("  Layers carved: {}", layers);
    println!("  Voxels written: {}", voxels);

    // Full pipeline, one cube at a time
    let start = Instant::now();
    for &pos in &positions {
        pipeline.generate_cube(pos)?;
    }
    let sequential_time = start.elapsed();
    println!("Sequential pipeline: {:?}", sequential_time);

    // Full pipeline through rayon
    let start = Instant::now();
    let results = pipeline.generate_cubes(&positions);
    let parallel_time = start.elapsed();
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();
    println!("Parallel pipeline: {:?}", parallel_time);
    println!("  Failures: {}", failures);

    println!("\n=== Summary ===");
    println!(
        "Speedup: {:.2}x",
        sequential_time.as_secs_f64() / parallel_time.as_secs_f64().max(f64::EPSILON)
    );

    Ok(())
}
