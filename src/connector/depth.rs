//! Depth map of the cave ceiling in the cube below
//!
//! For every column that is open at the top plane of the lower cube, the depth
//! grid records the first height (scanning up from the bottom) at which that
//! cube turns solid. Columns that stay open all the way get `CUBE_MAX + 1`.

use serde::{Deserialize, Serialize};

use crate::cube::CUBE_MAX;
use crate::grid::ColumnGrid;
use crate::primer::CubePrimer;

/// Depth value of a column that is open over the whole scanned window
pub const FULLY_OPEN: u8 = (CUBE_MAX + 1) as u8;

/// Per-column first-solid height, `(CUBE_MAX + 1)²` cells
pub type DepthGrid = ColumnGrid<u8>;

/// Inclusive rectangle of columns in the horizontal plane of a cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBounds {
    pub min_x: usize,
    pub max_x: usize,
    pub min_z: usize,
    pub max_z: usize,
}

impl ColumnBounds {
    /// A rectangle covering a single column
    pub fn point(x: usize, z: usize) -> Self {
        Self { min_x: x, max_x: x, min_z: z, max_z: z }
    }

    /// Grow an optional rectangle so it covers `(x, z)`.
    pub fn include(bounds: Option<Self>, x: usize, z: usize) -> Self {
        match bounds {
            None => Self::point(x, z),
            Some(b) => Self {
                min_x: b.min_x.min(x),
                max_x: b.max_x.max(x),
                min_z: b.min_z.min(z),
                max_z: b.max_z.max(z),
            },
        }
    }

    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    pub fn depth(&self) -> usize {
        self.max_z - self.min_z + 1
    }

    /// One column wide or one column deep
    pub fn is_degenerate(&self) -> bool {
        self.min_x == self.max_x || self.min_z == self.max_z
    }

    pub fn contains(&self, other: &ColumnBounds) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_z <= other.min_z
            && self.max_z >= other.max_z
    }

    pub fn contains_column(&self, x: usize, z: usize) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }
}

impl std::fmt::Display for ColumnBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x {}..={}, z {}..={}", self.min_x, self.max_x, self.min_z, self.max_z)
    }
}

/// Result of scanning the cube below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthMap {
    pub grid: DepthGrid,
    /// Rectangle of columns with any open height, `None` if there are none
    pub bounds: Option<ColumnBounds>,
    /// Highest first-solid height over all open columns
    pub max_y: usize,
}

impl DepthMap {
    /// Scan the top region of `below`.
    ///
    /// Only columns that are air at the top plane are considered. A column
    /// joins the bounding rectangle if it has at least one open voxel counting
    /// up from the bottom of the cube.
    pub fn build(below: &CubePrimer) -> Self {
        let mut grid = DepthGrid::new(CUBE_MAX + 1, CUBE_MAX + 1);
        let mut bounds = None;
        let mut max_y = 0;

        for x in 0..=CUBE_MAX {
            for z in 0..=CUBE_MAX {
                if !below.is_air(x, CUBE_MAX, z) {
                    continue;
                }

                let first_solid = (0..=CUBE_MAX).find(|&y| !below.is_air(x, y, z));
                let column_depth = match first_solid {
                    Some(y) => {
                        max_y = max_y.max(y);
                        y as u8
                    }
                    None => {
                        max_y = CUBE_MAX;
                        FULLY_OPEN
                    }
                };
                grid.set(x, z, column_depth);

                if column_depth > 0 {
                    bounds = Some(ColumnBounds::include(bounds, x, z));
                }
            }
        }

        Self { grid, bounds, max_y }
    }

    /// Nothing worth connecting: no column has any open height
    pub fn is_empty(&self) -> bool {
        self.max_y == 0
    }

    /// Number of columns with a non-zero depth
    pub fn open_columns(&self) -> usize {
        self.grid.iter().filter(|&(_, _, &d)| d > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::BlockState;

    /// Carve an air box into a stone primer, bounds inclusive.
    fn carve_box(primer: &mut CubePrimer, xs: (usize, usize), ys: (usize, usize), zs: (usize, usize)) {
        for x in xs.0..=xs.1 {
            for y in ys.0..=ys.1 {
                for z in zs.0..=zs.1 {
                    primer.set(x, y, z, BlockState::AIR);
                }
            }
        }
    }

    #[test]
    fn test_solid_below_is_empty() {
        let below = CubePrimer::uniform(BlockState::STONE);
        let map = DepthMap::build(&below);

        assert!(map.is_empty());
        assert_eq!(map.bounds, None);
        assert!(map.grid.iter().all(|(_, _, &d)| d == 0));
    }

    #[test]
    fn test_fully_open_columns() {
        let mut below = CubePrimer::uniform(BlockState::STONE);
        carve_box(&mut below, (2, 4), (0, CUBE_MAX), (6, 9));
        let map = DepthMap::build(&below);

        assert_eq!(map.max_y, CUBE_MAX);
        assert_eq!(*map.grid.get(3, 7), FULLY_OPEN);
        assert_eq!(*map.grid.get(1, 7), 0);
        assert_eq!(map.bounds, Some(ColumnBounds { min_x: 2, max_x: 4, min_z: 6, max_z: 9 }));
        assert_eq!(map.open_columns(), 12);
    }

    #[test]
    fn test_first_solid_height() {
        let mut below = CubePrimer::uniform(BlockState::STONE);
        // Open at the top and from the bottom up to y=5, solid at 6
        carve_box(&mut below, (8, 8), (0, 5), (8, 8));
        carve_box(&mut below, (8, 8), (7, CUBE_MAX), (8, 8));
        // Open at the top and bottom up to y=2
        carve_box(&mut below, (9, 9), (0, 1), (8, 8));
        carve_box(&mut below, (9, 9), (CUBE_MAX, CUBE_MAX), (8, 8));

        let map = DepthMap::build(&below);
        assert_eq!(*map.grid.get(8, 8), 6);
        assert_eq!(*map.grid.get(9, 8), 2);
        assert_eq!(map.max_y, 6);
        assert_eq!(map.bounds, Some(ColumnBounds { min_x: 8, max_x: 9, min_z: 8, max_z: 8 }));
    }

    #[test]
    fn test_column_closed_at_top_is_ignored() {
        let mut below = CubePrimer::uniform(BlockState::STONE);
        // Open from the bottom but sealed at the top plane
        carve_box(&mut below, (4, 6), (0, 10), (4, 6));

        let map = DepthMap::build(&below);
        assert!(map.is_empty());
        assert_eq!(map.bounds, None);
    }

    #[test]
    fn test_column_open_only_at_top_has_zero_depth() {
        let mut below = CubePrimer::uniform(BlockState::STONE);
        carve_box(&mut below, (4, 4), (CUBE_MAX, CUBE_MAX), (4, 4));

        let map = DepthMap::build(&below);
        assert_eq!(*map.grid.get(4, 4), 0);
        assert_eq!(map.bounds, None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_five_by_five_region() {
        let mut below = CubePrimer::uniform(BlockState::STONE);
        carve_box(&mut below, (5, 9), (0, 3), (5, 9));
        carve_box(&mut below, (5, 9), (5, CUBE_MAX), (5, 9));

        let map = DepthMap::build(&below);
        assert_eq!(map.max_y, 4);
        assert_eq!(map.bounds, Some(ColumnBounds { min_x: 5, max_x: 9, min_z: 5, max_z: 9 }));
        for (x, z, &d) in map.grid.iter() {
            let inside = (5..=9).contains(&x) && (5..=9).contains(&z);
            assert_eq!(d, if inside { 4 } else { 0 }, "column ({}, {})", x, z);
        }
    }

    #[test]
    fn test_bounds_helpers() {
        let b = ColumnBounds::include(Some(ColumnBounds::point(3, 4)), 7, 1);
        assert_eq!(b, ColumnBounds { min_x: 3, max_x: 7, min_z: 1, max_z: 4 });
        assert_eq!(b.width(), 5);
        assert_eq!(b.depth(), 4);
        assert!(!b.is_degenerate());
        assert!(b.contains(&ColumnBounds::point(5, 2)));
        assert!(!b.contains(&ColumnBounds::point(8, 2)));
        assert!(ColumnBounds { min_x: 2, max_x: 2, min_z: 0, max_z: 9 }.is_degenerate());
    }
}
