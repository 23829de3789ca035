//! ASCII rendering of cube slices and depth grids
//!
//! Used for trace logging and by the command line tool.

use crate::connector::depth::{DepthGrid, FULLY_OPEN};
use crate::cube::{BlockState, CUBE_SIZE};
use crate::primer::CubePrimer;

/// Character for a block state in a slice view
pub fn block_char(state: BlockState) -> char {
    match state {
        BlockState::AIR => '.',
        BlockState::CAVE_AIR => 'o',
        BlockState::GLASS => '+',
        BlockState::STONE => '#',
        BlockState::DIRT => '%',
        BlockState::WATER => '~',
        _ => '?',
    }
}

/// Depth grid as two-digit cells, one line per X row, `--` for fully open.
pub fn render_depth_grid(grid: &DepthGrid) -> String {
    let mut out = String::with_capacity(grid.width * (grid.depth * 3 + 1));
    for row in grid.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|&d| if d == FULLY_OPEN { "--".to_string() } else { format!("{:02}", d) })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Horizontal slice of a cube at local height `y`, one line per Z row.
pub fn render_slice(primer: &CubePrimer, y: usize) -> String {
    let mut out = String::with_capacity(CUBE_SIZE * (CUBE_SIZE + 1));
    for z in 0..CUBE_SIZE {
        for x in 0..CUBE_SIZE {
            out.push(block_char(primer.get(x, y, z)));
        }
        out.push('\n');
    }
    out
}

/// Several slices side by side with a header line, bottom slice first.
pub fn render_slices(primer: &CubePrimer, ys: &[usize]) -> String {
    let mut out = String::new();
    for &y in ys {
        out.push_str(&format!("{:<width$}", format!("y={}", y), width = CUBE_SIZE + 2));
    }
    out.push('\n');

    for z in 0..CUBE_SIZE {
        for &y in ys {
            for x in 0..CUBE_SIZE {
                out.push(block_char(primer.get(x, y, z)));
            }
            out.push_str("  ");
        }
        out.push('\n');
    }
    out
}
