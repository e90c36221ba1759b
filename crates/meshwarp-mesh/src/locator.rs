use rayon::prelude::*;

use crate::{
    error::MeshError,
    predicates::{contains, triangle_bounds, DEFAULT_EPS},
    triangulation::Triangulation,
};

/// Raw integer index reported for points outside the triangulation.
pub const OUTSIDE: isize = -1;

/// Converts a located simplex into its raw integer form, using [`OUTSIDE`] for `None`.
#[inline]
pub fn to_sentinel(simplex: Option<usize>) -> isize {
    simplex.map_or(OUTSIDE, |i| i as isize)
}

/// A trait to classify query points against the simplices of a triangulation.
///
/// When a point lies on the boundary shared by several simplices, the in-repo locators
/// return the lowest simplex index.
pub trait SimplexLocator: Send + Sync {
    /// Number of simplices in the underlying triangulation.
    fn simplex_count(&self) -> usize;

    /// Locates one query point.
    ///
    /// Returns [`None`] if the point does not lie in any simplex.
    fn locate_one(&self, point: &[f64; 2]) -> Option<usize>;

    /// Locates a batch of query points in a single call.
    ///
    /// The output has the same length and order as `points`.
    fn locate(&self, points: &[[f64; 2]]) -> Vec<Option<usize>> {
        points.par_iter().map(|p| self.locate_one(p)).collect()
    }
}

/// Locators that can be built directly from a triangulation.
pub trait BuildLocator: SimplexLocator + Sized {
    /// Build the locator, taking ownership of the triangulation.
    fn build(triangulation: Triangulation) -> Result<Self, MeshError>;
}

/// Locator that tests every simplex for every query point.
#[derive(Debug, Clone)]
pub struct BruteForceLocator {
    triangulation: Triangulation,
}

impl BruteForceLocator {
    /// Create a new brute force locator.
    pub fn new(triangulation: Triangulation) -> Self {
        Self { triangulation }
    }

    /// Get as reference the triangulation.
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }
}

impl SimplexLocator for BruteForceLocator {
    fn simplex_count(&self) -> usize {
        self.triangulation.simplex_count()
    }

    fn locate_one(&self, point: &[f64; 2]) -> Option<usize> {
        (0..self.triangulation.simplex_count()).find(|&i| {
            self.triangulation
                .vertices(i)
                .is_some_and(|tri| contains(&tri, point, DEFAULT_EPS))
        })
    }
}

impl BuildLocator for BruteForceLocator {
    fn build(triangulation: Triangulation) -> Result<Self, MeshError> {
        Ok(Self::new(triangulation))
    }
}

/// Locator backed by a uniform grid of buckets over the triangulation bounds.
///
/// Every cell stores, in ascending order, the simplices whose bounding box overlaps it.
/// A query only tests the candidates of its own cell.
#[derive(Debug, Clone)]
pub struct GridLocator {
    triangulation: Triangulation,
    cols: usize,
    rows: usize,
    // min corner and extent of the grid, None for an empty triangulation
    origin: Option<[f64; 2]>,
    extent: [f64; 2],
    inv_cell: [f64; 2],
    slack: f64,
    // candidates of cell `c` are `candidates[offsets[c]..offsets[c + 1]]`
    offsets: Vec<usize>,
    candidates: Vec<usize>,
}

impl GridLocator {
    /// Largest number of cells along one side picked by [`GridLocator::new`].
    pub const MAX_SIDE: usize = 1024;

    /// Create a new grid locator with roughly one simplex per cell.
    pub fn new(triangulation: Triangulation) -> Self {
        let side = (triangulation.simplex_count() as f64)
            .sqrt()
            .ceil()
            .clamp(1.0, Self::MAX_SIDE as f64) as usize;
        Self::build_grid(triangulation, side, side)
    }

    /// Create a new grid locator with a fixed number of cells.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidResolution`] if `cols` or `rows` is zero.
    pub fn with_resolution(
        triangulation: Triangulation,
        cols: usize,
        rows: usize,
    ) -> Result<Self, MeshError> {
        if cols == 0 || rows == 0 {
            return Err(MeshError::InvalidResolution(cols, rows));
        }
        Ok(Self::build_grid(triangulation, cols, rows))
    }

    /// Get as reference the triangulation.
    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Number of cells as (cols, rows).
    pub fn resolution(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn build_grid(triangulation: Triangulation, cols: usize, rows: usize) -> Self {
        let mut grid = Self {
            triangulation,
            cols,
            rows,
            origin: None,
            extent: [0.0; 2],
            inv_cell: [0.0; 2],
            slack: 0.0,
            offsets: vec![0; cols * rows + 1],
            candidates: Vec::new(),
        };

        let Some((min, max)) = grid.triangulation.bounds() else {
            log::debug!("grid locator over an empty triangulation");
            return grid;
        };

        let extent = [max[0] - min[0], max[1] - min[1]];
        grid.origin = Some(min);
        grid.extent = extent;
        grid.inv_cell = [
            inverse_cell_size(extent[0], cols),
            inverse_cell_size(extent[1], rows),
        ];
        grid.slack = containment_slack(&min, &max);

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); cols * rows];
        for simplex in 0..grid.triangulation.simplex_count() {
            let Some(tri) = grid.triangulation.vertices(simplex) else {
                continue;
            };
            let (tri_min, tri_max) = triangle_bounds(&tri);
            let (c0, r0) = grid.cell_of(&[tri_min[0] - grid.slack, tri_min[1] - grid.slack]);
            let (c1, r1) = grid.cell_of(&[tri_max[0] + grid.slack, tri_max[1] + grid.slack]);
            for r in r0..=r1 {
                for c in c0..=c1 {
                    buckets[r * cols + c].push(simplex);
                }
            }
        }

        let mut offset = 0;
        for (cell, bucket) in buckets.iter().enumerate() {
            grid.offsets[cell] = offset;
            offset += bucket.len();
        }
        grid.offsets[cols * rows] = offset;
        grid.candidates = buckets.into_iter().flatten().collect();

        log::debug!(
            "grid locator with {}x{} cells over {} simplices ({} candidate entries)",
            cols,
            rows,
            grid.triangulation.simplex_count(),
            grid.candidates.len()
        );

        grid
    }

    // cell containing the point, clamped to the grid
    fn cell_of(&self, point: &[f64; 2]) -> (usize, usize) {
        let origin = self.origin.unwrap_or([0.0; 2]);
        let col = ((point[0] - origin[0]) * self.inv_cell[0]).floor();
        let row = ((point[1] - origin[1]) * self.inv_cell[1]).floor();
        (
            col.clamp(0.0, (self.cols - 1) as f64) as usize,
            row.clamp(0.0, (self.rows - 1) as f64) as usize,
        )
    }

    fn in_bounds(&self, point: &[f64; 2]) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };
        let (x, y) = (point[0] - origin[0], point[1] - origin[1]);
        x >= -self.slack
            && x <= self.extent[0] + self.slack
            && y >= -self.slack
            && y <= self.extent[1] + self.slack
    }
}

// A point accepted by `contains` has every barycentric weight >= -eps, so it lies at
// most 2 * eps * (triangle extent) outside the triangle's bounding box. The margin
// doubles that bound to absorb rounding in the weights, which grows with the
// coordinate magnitude.
fn containment_slack(min: &[f64; 2], max: &[f64; 2]) -> f64 {
    let scale = [
        max[0] - min[0],
        max[1] - min[1],
        min[0].abs(),
        min[1].abs(),
        max[0].abs(),
        max[1].abs(),
    ]
    .into_iter()
    .fold(1.0, f64::max);
    4.0 * DEFAULT_EPS * scale
}

fn inverse_cell_size(extent: f64, cells: usize) -> f64 {
    if extent > 0.0 {
        cells as f64 / extent
    } else {
        0.0
    }
}

impl SimplexLocator for GridLocator {
    fn simplex_count(&self) -> usize {
        self.triangulation.simplex_count()
    }

    fn locate_one(&self, point: &[f64; 2]) -> Option<usize> {
        if !self.in_bounds(point) {
            return None;
        }

        let (col, row) = self.cell_of(point);
        let cell = row * self.cols + col;
        self.candidates[self.offsets[cell]..self.offsets[cell + 1]]
            .iter()
            .copied()
            .find(|&i| {
                self.triangulation
                    .vertices(i)
                    .is_some_and(|tri| contains(&tri, point, DEFAULT_EPS))
            })
    }
}

impl BuildLocator for GridLocator {
    fn build(triangulation: Triangulation) -> Result<Self, MeshError> {
        Ok(Self::new(triangulation))
    }
}
