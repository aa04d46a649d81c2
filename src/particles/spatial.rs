//! Uniform grid for neighbor queries.
//!
//! Particles are bucketed into square cells at least as wide as the query
//! radius, so every neighbor within the radius lives in the 3x3 block of
//! cells around the query point. The buckets are built with a counting sort:
//! `cell_start[c]..cell_start[c + 1]` indexes into a flat array of particle
//! indices sorted by cell.

use glam::Vec2;

/// Upper bound on cells per axis; cells grow beyond the radius past this.
pub const MAX_CELLS_PER_AXIS: u32 = 256;

/// Flat uniform grid over a set of 2D positions.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    origin: Vec2,
    cell_size: f32,
    cols: u32,
    rows: u32,
    /// Prefix offsets into `indices`, `cols * rows + 1` long.
    cell_start: Vec<u32>,
    /// Particle indices sorted by cell.
    indices: Vec<u32>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Columns and rows of the current grid.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// Rebucket `positions` for queries of up to `radius`.
    ///
    /// The grid covers the bounding box of the positions, so every position
    /// lands in a real cell regardless of where it is.
    pub fn rebuild(&mut self, positions: &[Vec2], radius: f32) {
        self.indices.clear();
        self.cell_start.clear();

        let Some(&first) = positions.first() else {
            self.cols = 0;
            self.rows = 0;
            return;
        };

        let (min, max) = positions
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));

        self.origin = min;
        self.cell_size = radius
            .max(extent.max_element() / MAX_CELLS_PER_AXIS as f32)
            .max(f32::EPSILON);
        self.cols = ((extent.x / self.cell_size).floor() as u32 + 1).min(MAX_CELLS_PER_AXIS);
        self.rows = ((extent.y / self.cell_size).floor() as u32 + 1).min(MAX_CELLS_PER_AXIS);

        let cells = (self.cols * self.rows) as usize;
        self.cell_start.resize(cells + 1, 0);

        // Histogram, shifted by one so the prefix sum yields start offsets.
        for &p in positions {
            let cell = self.cell_index(p);
            self.cell_start[cell + 1] += 1;
        }
        for c in 0..cells {
            self.cell_start[c + 1] += self.cell_start[c];
        }

        let mut cursor = self.cell_start.clone();
        self.indices.resize(positions.len(), 0);
        for (i, &p) in positions.iter().enumerate() {
            let cell = self.cell_index(p);
            self.indices[cursor[cell] as usize] = i as u32;
            cursor[cell] += 1;
        }
    }

    fn cell_coords(&self, p: Vec2) -> (i64, i64) {
        let local = (p - self.origin) / self.cell_size;
        let col = (local.x.floor() as i64).clamp(0, self.cols as i64 - 1);
        let row = (local.y.floor() as i64).clamp(0, self.rows as i64 - 1);
        (col, row)
    }

    fn cell_index(&self, p: Vec2) -> usize {
        let (col, row) = self.cell_coords(p);
        (row * self.cols as i64 + col) as usize
    }

    /// Call `f` with the index of every particle in the 3x3 cells around `p`.
    ///
    /// This is a superset of the particles within the build radius; callers
    /// still test the exact distance.
    pub fn for_each_candidate(&self, p: Vec2, mut f: impl FnMut(usize)) {
        if self.indices.is_empty() {
            return;
        }
        let (col, row) = self.cell_coords(p);
        for r in (row - 1).max(0)..=(row + 1).min(self.rows as i64 - 1) {
            for c in (col - 1).max(0)..=(col + 1).min(self.cols as i64 - 1) {
                let cell = (r * self.cols as i64 + c) as usize;
                let start = self.cell_start[cell] as usize;
                let end = self.cell_start[cell + 1] as usize;
                for &i in &self.indices[start..end] {
                    f(i as usize);
                }
            }
        }
    }
}
