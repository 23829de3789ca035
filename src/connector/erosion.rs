//! Layer erosion engine
//!
//! Carves the connecting shaft bottom-up. Each layer first erodes the open
//! region from a random subset of its four horizontal sides, then writes the
//! surviving columns into the destination cube. Eroding each side one column
//! at a time, with fresh coin flips per layer, tapers the shaft unevenly
//! instead of shrinking it as a rectangle.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{enabled, trace, Level};

use super::depth::{ColumnBounds, DepthGrid};
use super::observer::ConnectorObserver;
use crate::ascii;
use crate::cube::{BlockState, CUBE_MAX};
use crate::primer::CubePrimer;

/// Horizontal side of the open region that can be eroded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Erode columns whose +X neighbor is closed
    Right,
    /// Erode columns whose -X neighbor is closed
    Left,
    /// Erode columns whose +Z neighbor is closed
    Front,
    /// Erode columns whose -Z neighbor is closed
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Z,
}

impl Side {
    /// Order in which sides are drawn and applied every layer
    pub const ALL: [Side; 4] = [Side::Right, Side::Left, Side::Front, Side::Back];

    fn axis(&self) -> Axis {
        match self {
            Side::Right | Side::Left => Axis::X,
            Side::Front | Side::Back => Axis::Z,
        }
    }

    /// Whether the neighbor lies in the positive direction of the axis
    fn is_positive(&self) -> bool {
        matches!(self, Side::Right | Side::Front)
    }
}

/// Which sides erode during one layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErosionSides {
    pub right: bool,
    pub left: bool,
    pub front: bool,
    pub back: bool,
}

impl ErosionSides {
    /// One coin flip per side, in `Side::ALL` order.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let right = rng.gen::<bool>();
        let left = rng.gen::<bool>();
        let front = rng.gen::<bool>();
        let back = rng.gen::<bool>();
        Self { right, left, front, back }
    }

    pub fn all() -> Self {
        Self { right: true, left: true, front: true, back: true }
    }

    pub fn contains(&self, side: Side) -> bool {
        match side {
            Side::Right => self.right,
            Side::Left => self.left,
            Side::Front => self.front,
            Side::Back => self.back,
        }
    }

    /// Active sides in application order
    pub fn active(&self) -> impl Iterator<Item = Side> + '_ {
        Side::ALL.into_iter().filter(move |&side| self.contains(side))
    }
}

/// Collapse open columns whose neighbor on `side` is already closed at `y`.
///
/// The sweep moves toward the neighbor side, so a column collapsed in this pass
/// is never the neighbor of a column visited later: each pass erodes at most
/// one column deep. Sweep limits stay inside `bounds` and keep the neighbor
/// inside the cube. Returns the number of collapsed columns.
pub fn erode_side(grid: &mut DepthGrid, bounds: &ColumnBounds, side: Side, y: u8) -> usize {
    let axis = side.axis();
    let (lo, hi, cross_lo, cross_hi) = match axis {
        Axis::X => (bounds.min_x, bounds.max_x, bounds.min_z, bounds.max_z),
        Axis::Z => (bounds.min_z, bounds.max_z, bounds.min_x, bounds.max_x),
    };

    let mut collapsed = 0;
    let mut visit = |a: usize, neighbor_a: usize| {
        for c in cross_lo..=cross_hi {
            let ((x, z), (nx, nz)) = match axis {
                Axis::X => ((a, c), (neighbor_a, c)),
                Axis::Z => ((c, a), (c, neighbor_a)),
            };
            if *grid.get(x, z) > y && *grid.get(nx, nz) <= y {
                grid.set(x, z, y);
                collapsed += 1;
            }
        }
    };

    if side.is_positive() {
        for a in lo..=hi.min(CUBE_MAX - 1) {
            visit(a, a + 1);
        }
    } else {
        for a in (lo.max(1)..=hi).rev() {
            visit(a, a - 1);
        }
    }
    collapsed
}

/// Write every column still open at `y` into `primer`.
///
/// Returns the number of written voxels and the tightest rectangle covering
/// them.
pub fn write_layer(
    grid: &DepthGrid,
    bounds: &ColumnBounds,
    primer: &mut CubePrimer,
    y: u8,
    marker: BlockState,
) -> (usize, Option<ColumnBounds>) {
    let mut written = 0;
    let mut written_bounds = None;

    for x in bounds.min_x..=bounds.max_x {
        for z in bounds.min_z..=bounds.max_z {
            if *grid.get(x, z) > y {
                primer.set(x, y as usize, z, marker);
                written += 1;
                written_bounds = Some(ColumnBounds::include(written_bounds, x, z));
            }
        }
    }

    (written, written_bounds)
}

/// Why the engine stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// The cube below had no open column at its top plane
    NothingToConnect,
    /// A layer wrote no columns
    Exhausted { layer: usize },
    /// The written region became a single row or column
    Degenerate { layer: usize },
    /// Every layer up to the maximum height was carved
    ReachedMaxHeight,
}

/// State of one processed layer, handed to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerReport {
    pub y: usize,
    pub sides: ErosionSides,
    /// Working rectangle at the start of the layer
    pub bounds: ColumnBounds,
    /// Rectangle of the columns written this layer
    pub written_bounds: Option<ColumnBounds>,
    pub collapsed: usize,
    pub written: usize,
}

/// Totals for a full run of the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarveOutcome {
    pub layers: usize,
    pub voxels_written: usize,
    pub termination: Termination,
}

/// Run the layer loop from `y = 0` to `max_y` inclusive.
///
/// `grid` is eroded in place. Only `primer` cells at `(x, y, z)` with
/// `y <= max_y` and `(x, z)` inside `bounds` are written, always with `marker`.
pub fn carve_layers<R: Rng + ?Sized>(
    grid: &mut DepthGrid,
    bounds: ColumnBounds,
    max_y: usize,
    rng: &mut R,
    primer: &mut CubePrimer,
    marker: BlockState,
    observer: &mut dyn ConnectorObserver,
) -> CarveOutcome {
    let mut bounds = bounds;
    let mut outcome = CarveOutcome {
        layers: 0,
        voxels_written: 0,
        termination: Termination::ReachedMaxHeight,
    };

    for y in 0..=max_y.min(CUBE_MAX) {
        let layer = y as u8;
        let sides = ErosionSides::draw(rng);

        let collapsed: usize = sides
            .active()
            .map(|side| erode_side(grid, &bounds, side, layer))
            .sum();

        let (written, written_bounds) = write_layer(grid, &bounds, primer, layer, marker);

        let report = LayerReport {
            y,
            sides,
            bounds,
            written_bounds,
            collapsed,
            written,
        };
        if enabled!(Level::TRACE) {
            trace!(
                layer = y,
                ?sides,
                %bounds,
                collapsed,
                written,
                "layer carved\n{}",
                ascii::render_depth_grid(grid)
            );
        }
        observer.on_layer(&report, grid);

        outcome.layers += 1;
        outcome.voxels_written += written;

        match written_bounds {
            None => {
                outcome.termination = Termination::Exhausted { layer: y };
                break;
            }
            Some(next) if next.is_degenerate() => {
                outcome.termination = Termination::Degenerate { layer: y };
                break;
            }
            Some(next) => bounds = next,
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::depth::FULLY_OPEN;
    use crate::connector::observer::{LayerRecorder, NoopObserver};
    use crate::cube::CUBE_VOLUME;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Grid with `value` inside `bounds` and 0 elsewhere.
    fn block_grid(bounds: ColumnBounds, value: u8) -> DepthGrid {
        let mut grid = DepthGrid::new(CUBE_MAX + 1, CUBE_MAX + 1);
        for x in bounds.min_x..=bounds.max_x {
            for z in bounds.min_z..=bounds.max_z {
                grid.set(x, z, value);
            }
        }
        grid
    }

    fn square(min: usize, max: usize) -> ColumnBounds {
        ColumnBounds { min_x: min, max_x: max, min_z: min, max_z: max }
    }

    #[test]
    fn test_draw_order_is_stable() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(ErosionSides::draw(&mut a), ErosionSides::draw(&mut b));
        }
    }

    #[test]
    fn test_erode_right_collapses_one_column() {
        let bounds = square(4, 8);
        let mut grid = block_grid(bounds, 10);

        let collapsed = erode_side(&mut grid, &bounds, Side::Right, 0);

        assert_eq!(collapsed, 5);
        for z in 4..=8 {
            assert_eq!(*grid.get(8, z), 0, "edge column should close");
            assert_eq!(*grid.get(7, z), 10, "erosion must not cascade");
        }
    }

    #[test]
    fn test_each_side_erodes_its_own_edge() {
        let bounds = square(4, 8);
        let cases = [
            (Side::Right, (8, 6)),
            (Side::Left, (4, 6)),
            (Side::Front, (6, 8)),
            (Side::Back, (6, 4)),
        ];

        for (side, (x, z)) in cases {
            let mut grid = block_grid(bounds, 10);
            erode_side(&mut grid, &bounds, side, 3);
            assert_eq!(*grid.get(x, z), 3, "{:?} should erode ({}, {})", side, x, z);
            assert_eq!(*grid.get(6, 6), 10, "{:?} must leave the center open", side);
        }
    }

    #[test]
    fn test_erode_at_cube_edge_does_nothing() {
        // Region touching +X edge: nothing beyond it to compare against
        let bounds = ColumnBounds { min_x: 10, max_x: CUBE_MAX, min_z: 0, max_z: CUBE_MAX };
        let mut grid = DepthGrid::new_with(CUBE_MAX + 1, CUBE_MAX + 1, FULLY_OPEN);
        let collapsed = erode_side(&mut grid, &bounds, Side::Right, 0);
        assert_eq!(collapsed, 0);

        let bounds = square(0, CUBE_MAX);
        let collapsed = erode_side(&mut grid, &bounds, Side::Left, 0);
        assert_eq!(collapsed, 0);
    }

    #[test]
    fn test_erode_only_affects_columns_open_at_layer() {
        let bounds = square(2, 5);
        let mut grid = block_grid(bounds, 10);
        // Column that already closes at 2 stays as is when eroding at layer 4
        grid.set(5, 3, 2);

        erode_side(&mut grid, &bounds, Side::Right, 4);
        assert_eq!(*grid.get(5, 3), 2);
        assert_eq!(*grid.get(5, 2), 4);
        // Its left neighbor sees it closed and erodes on the Right pass too
        assert_eq!(*grid.get(4, 3), 4);
    }

    #[test]
    fn test_write_layer_bounds() {
        let bounds = square(3, 7);
        let mut grid = block_grid(bounds, 5);
        grid.set(3, 3, 1);
        let mut primer = CubePrimer::uniform(BlockState::STONE);

        let (written, written_bounds) = write_layer(&grid, &bounds, &mut primer, 2, BlockState::GLASS);

        assert_eq!(written, 24);
        assert_eq!(written_bounds, Some(bounds));
        assert_eq!(primer.get(4, 2, 4), BlockState::GLASS);
        assert_eq!(primer.get(3, 2, 3), BlockState::STONE);
        assert_eq!(primer.count(|b| b == BlockState::GLASS), 24);
    }

    #[test]
    fn test_exhausted_when_region_closes() {
        // Wide enough that two layers of erosion cannot make it degenerate
        let bounds = square(2, 12);
        let mut grid = block_grid(bounds, 2);
        let mut primer = CubePrimer::uniform(BlockState::STONE);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = carve_layers(&mut grid, bounds, 10, &mut rng, &mut primer, BlockState::GLASS, &mut NoopObserver);

        // Layers 0 and 1 write something; layer 2 finds every column closed
        assert_eq!(outcome.termination, Termination::Exhausted { layer: 2 });
        assert_eq!(outcome.layers, 3);
        assert!(primer.iter().all(|(_, y, _, b)| b != BlockState::GLASS || y < 2));
    }

    #[test]
    fn test_degenerate_region_stops() {
        // Four columns wide along X, one deep along Z; no side ever erodes
        let bounds = ColumnBounds { min_x: 4, max_x: 7, min_z: 6, max_z: 6 };
        let mut grid = block_grid(bounds, FULLY_OPEN);
        let mut primer = CubePrimer::uniform(BlockState::STONE);
        let mut rng = StepRng::new(0, 0);

        let outcome = carve_layers(&mut grid, bounds, CUBE_MAX, &mut rng, &mut primer, BlockState::GLASS, &mut NoopObserver);

        assert_eq!(outcome.layers, 1);
        assert_eq!(outcome.voxels_written, 4);
        assert_eq!(outcome.termination, Termination::Degenerate { layer: 0 });
        for x in 4..=7 {
            assert_eq!(primer.get(x, 0, 6), BlockState::GLASS);
        }
    }

    #[test]
    fn test_full_cube_reaches_max_height() {
        // Every side erodes every layer, but all neighbors are open or outside
        // the cube, so nothing collapses
        let bounds = square(0, CUBE_MAX);
        let mut grid = block_grid(bounds, FULLY_OPEN);
        let mut primer = CubePrimer::uniform(BlockState::STONE);
        let mut rng = StepRng::new(u64::MAX, 0);
        let mut recorder = LayerRecorder::default();

        let outcome = carve_layers(&mut grid, bounds, CUBE_MAX, &mut rng, &mut primer, BlockState::GLASS, &mut recorder);

        assert_eq!(outcome.layers, CUBE_MAX + 1);
        assert_eq!(outcome.termination, Termination::ReachedMaxHeight);
        assert_eq!(outcome.voxels_written, CUBE_VOLUME);
        assert_eq!(primer.count(|b| b == BlockState::GLASS), CUBE_VOLUME);
        for snapshot in &recorder.layers {
            assert_eq!(snapshot.report.sides, ErosionSides::all());
            assert_eq!(snapshot.report.collapsed, 0);
            assert_eq!(snapshot.report.written_bounds, Some(bounds));
        }
    }

    #[test]
    fn test_layers_shrink_monotonically() {
        for seed in 0..32u64 {
            let bounds = square(0, CUBE_MAX);
            let mut grid = block_grid(bounds, FULLY_OPEN);
            let mut primer = CubePrimer::uniform(BlockState::STONE);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut recorder = LayerRecorder::default();

            let outcome = carve_layers(&mut grid, bounds, CUBE_MAX, &mut rng, &mut primer, BlockState::GLASS, &mut recorder);

            assert!(outcome.layers <= CUBE_MAX + 1);
            assert_eq!(recorder.layers.len(), outcome.layers);
            for snapshot in &recorder.layers {
                if let Some(after) = snapshot.report.written_bounds {
                    assert!(
                        snapshot.report.bounds.contains(&after),
                        "seed {} layer {}: {} not inside {}",
                        seed, snapshot.report.y, after, snapshot.report.bounds
                    );
                }
            }
            for pair in recorder.layers.windows(2) {
                assert_eq!(Some(pair[1].report.bounds), pair[0].report.written_bounds);
            }
        }
    }

    #[test]
    fn test_writes_stay_in_window() {
        let bounds = ColumnBounds { min_x: 2, max_x: 12, min_z: 5, max_z: 11 };
        let max_y = 6;
        let mut grid = block_grid(bounds, FULLY_OPEN);
        let base = CubePrimer::uniform(BlockState::STONE);
        let mut primer = base.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        carve_layers(&mut grid, bounds, max_y, &mut rng, &mut primer, BlockState::CAVE_AIR, &mut NoopObserver);

        let diff = primer.diff(&base);
        assert!(!diff.is_empty());
        for (x, y, z, state) in diff {
            assert_eq!(state, BlockState::CAVE_AIR);
            assert!(y <= max_y);
            assert!(bounds.contains_column(x, z), "({}, {}) written outside", x, z);
        }
    }

    #[test]
    fn test_all_sides_taper_evenly() {
        let bounds = square(2, 12);
        let mut grid = block_grid(bounds, FULLY_OPEN);
        let sides = ErosionSides::all();

        for y in 0..3u8 {
            for side in sides.active() {
                erode_side(&mut grid, &bounds, side, y);
            }
        }

        // Three rings eroded at layers 0, 1, 2
        assert_eq!(*grid.get(2, 7), 0);
        assert_eq!(*grid.get(3, 7), 1);
        assert_eq!(*grid.get(4, 7), 2);
        assert_eq!(*grid.get(5, 7), FULLY_OPEN);
    }
}
