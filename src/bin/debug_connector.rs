//! Debug tool: renders every layer of a connector run as a contact sheet
//!
//! Each cell shows the depth grid after one layer. Columns still in the
//! working region are shaded by depth, collapsed columns are dark red, and
//! the working rectangle is outlined.

use image::{ImageBuffer, Rgb, RgbImage};

use cubic_caves::connector::depth::{ColumnBounds, FULLY_OPEN};
use cubic_caves::grid::ColumnGrid;
use cubic_caves::{CavePreset, CubePipeline, CubePos, LayerRecorder, WorldGenConfig, CUBE_SIZE};

const CELL_SCALE: u32 = 12;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42u64);

    let pipeline = CubePipeline::from_config(seed, &WorldGenConfig::from_preset(CavePreset::Debug))?;

    // First connector cube near the origin that actually carves something
    let mut found = None;
    for pos in CubePos::new(0, 1, 0).horizontal_neighborhood(4) {
        let mut recorder = LayerRecorder::new();
        let (_, summary) = pipeline.generate_cube_observed(pos, &mut recorder)?;
        if summary.is_some_and(|s| s.layers > 0) {
            found = Some((pos, recorder));
            break;
        }
    }

    let Some((pos, recorder)) = found else {
        println!("No connectable cube found for seed {}", seed);
        return Ok(());
    };

    println!("Seed {}: cube {} carved {} layers", seed, pos, recorder.layers.len());

    let mut images: Vec<RgbImage> = Vec::new();
    if let Some(initial) = &recorder.initial {
        if let Some(grid) = ColumnGrid::from_rows(&initial.grid) {
            images.push(render_depth_grid(&grid, initial.bounds, 0));
        }
    }
    for layer in &recorder.layers {
        let Some(grid) = ColumnGrid::from_rows(&layer.grid) else {
            continue;
        };
        println!(
            "  y={:2} sides={:?} bounds={} written={} collapsed={}",
            layer.report.y,
            layer.report.sides.active().collect::<Vec<_>>(),
            layer.report.bounds,
            layer.report.written,
            layer.report.collapsed
        );
        images.push(render_depth_grid(&grid, layer.report.written_bounds, layer.report.y));
    }

    let cols = 4;
    let rows = images.len().div_ceil(cols);
    let sheet = create_grid(&images, cols, rows);
    sheet.save("connector_layers.png")?;
    println!("Saved connector_layers.png");

    Ok(())
}

/// One depth grid. Columns open above `floor` are shaded by depth.
fn render_depth_grid(grid: &ColumnGrid<u8>, bounds: Option<ColumnBounds>, floor: usize) -> RgbImage {
    let size = CUBE_SIZE as u32 * CELL_SCALE;
    let mut img = ImageBuffer::new(size, size);

    for (x, z, &depth) in grid.iter() {
        let color = if depth == FULLY_OPEN {
            Rgb([120, 200, 255])
        } else if depth as usize > floor {
            let v = 80 + (depth as u32 * 170 / FULLY_OPEN as u32) as u8;
            Rgb([v, v, v / 2])
        } else if depth > 0 {
            Rgb([90, 20, 20])
        } else {
            Rgb([20, 20, 20])
        };

        let on_edge = bounds.is_some_and(|b| {
            b.contains_column(x, z) && (x == b.min_x || x == b.max_x || z == b.min_z || z == b.max_z)
        });

        for py in 0..CELL_SCALE {
            for px in 0..CELL_SCALE {
                let border = px == 0 || py == 0;
                let pixel = if on_edge && border {
                    Rgb([255, 220, 0])
                } else if border {
                    Rgb([10, 10, 10])
                } else {
                    color
                };
                img.put_pixel(x as u32 * CELL_SCALE + px, z as u32 * CELL_SCALE + py, pixel);
            }
        }
    }

    img
}

fn create_grid(images: &[RgbImage], cols: usize, rows: usize) -> RgbImage {
    if images.is_empty() {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images[0].width();
    let cell_height = images[0].height();
    let gap = 4u32;

    let grid_width = (cell_width + gap) * cols as u32;
    let grid_height = (cell_height + gap) * rows as u32;

    let mut grid: RgbImage = ImageBuffer::from_pixel(grid_width, grid_height, Rgb([40, 40, 40]));

    for (idx, img) in images.iter().enumerate() {
        let col = idx % cols;
        let row = idx / cols;
        if row >= rows {
            break;
        }

        let x_offset = col as u32 * (cell_width + gap);
        let y_offset = row as u32 * (cell_height + gap);

        for y in 0..cell_height {
            for x in 0..cell_width {
                grid.put_pixel(x_offset + x, y_offset + y, *img.get_pixel(x, y));
            }
        }
    }

    grid
}
