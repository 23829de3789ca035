/// A bounded 2D grid indexed by `(x, z)` columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnGrid<T> {
    pub width: usize,
    pub depth: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> ColumnGrid<T> {
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            data: vec![T::default(); width * depth],
        }
    }
}

impl<T: Clone> ColumnGrid<T> {
    pub fn new_with(width: usize, depth: usize, value: T) -> Self {
        Self {
            width,
            depth,
            data: vec![value; width * depth],
        }
    }

    /// Rebuild a grid from the output of [`ColumnGrid::rows`]. Returns `None`
    /// if the rows are ragged.
    pub fn from_rows(rows: &[Vec<T>]) -> Option<Self> {
        let depth = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != depth) {
            return None;
        }
        Some(Self {
            width: rows.len(),
            depth,
            data: rows.concat(),
        })
    }

    fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.depth, "column ({}, {}) out of grid", x, z);
        x * self.depth + z
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.data[self.index(x, z)]
    }

    pub fn get_mut(&mut self, x: usize, z: usize) -> &mut T {
        let idx = self.index(x, z);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, z: usize, value: T) {
        let idx = self.index(x, z);
        self.data[idx] = value;
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let depth = self.depth;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx / depth;
            let z = idx % depth;
            (x, z, val)
        })
    }

    /// Rows along X, each holding the Z column values.
    pub fn rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.depth).map(|row| row.to_vec()).collect()
    }
}
