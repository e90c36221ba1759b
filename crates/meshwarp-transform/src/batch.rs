use crate::{
    affine::AffineMap,
    error::TransformError,
    parallel::{self, ExecutionStrategy},
};

/// Value written for every point that lies outside the triangulation.
pub const OUTSIDE_POINT: [f64; 2] = [-1.0, -1.0];

/// Appends a constant 1 to every point, producing shape (N, 3).
pub fn to_homogeneous(points: &[[f64; 2]]) -> Vec<[f64; 3]> {
    points.iter().map(|p| [p[0], p[1], 1.0]).collect()
}

/// Applies every gathered affine map to its homogeneous point.
///
/// Computes `dst[i] = affines[i] * homogeneous[i]` for the whole batch, with the rows
/// partitioned according to `strategy`.
///
/// # Arguments
///
/// * `affines` - The gathered affine maps with shape (N, 2, 3).
/// * `homogeneous` - The homogeneous points with shape (N, 3).
/// * `dst` - The pre-allocated output points with shape (N, 2).
/// * `strategy` - The execution strategy.
///
/// # Errors
///
/// Returns [`TransformError::ShapeError`] if the three batches differ in length.
pub fn batched_affine(
    affines: &[AffineMap],
    homogeneous: &[[f64; 3]],
    dst: &mut [[f64; 2]],
    strategy: ExecutionStrategy,
) -> Result<(), TransformError> {
    if affines.len() != homogeneous.len() || dst.len() != homogeneous.len() {
        return Err(TransformError::ShapeError(format!(
            "batch lengths differ: {} affine maps, {} points, {} outputs",
            affines.len(),
            homogeneous.len(),
            dst.len()
        )));
    }

    parallel::execute_rows(strategy, affines, homogeneous, dst, |m, h, out| {
        *out = m.apply_homogeneous(h)
    })?;

    Ok(())
}

/// Overwrites with [`OUTSIDE_POINT`] every row whose point has no simplex.
pub fn mask_outside(simplices: &[Option<usize>], dst: &mut [[f64; 2]]) {
    dst.iter_mut()
        .zip(simplices.iter())
        .filter(|(_, simplex)| simplex.is_none())
        .for_each(|(out, _)| *out = OUTSIDE_POINT);
}

/// Reads interleaved `x0, y0, x1, y1, ...` coordinates as a batch of points.
///
/// # Errors
///
/// Returns [`TransformError::ShapeError`] if the buffer has an odd length.
pub fn points_from_flat(coords: &[f64]) -> Result<Vec<[f64; 2]>, TransformError> {
    if coords.len() % 2 != 0 {
        return Err(TransformError::ShapeError(format!(
            "expected interleaved 2D coordinates, got {} values",
            coords.len()
        )));
    }
    Ok(coords.chunks_exact(2).map(|c| [c[0], c[1]]).collect())
}

/// Create the pixel coordinates of a `cols` x `rows` image as a batch of points.
///
/// Points are laid out row-major with `x` the column and `y` the row, which is the
/// batch a resampler evaluates to obtain its sampling coordinates.
///
/// # Example
///
/// ```
/// use meshwarp_transform::batch::pixel_grid;
///
/// let grid = pixel_grid(3, 2);
/// assert_eq!(grid[1], [1.0, 0.0]);
/// assert_eq!(grid[3], [0.0, 1.0]);
/// ```
pub fn pixel_grid(cols: usize, rows: usize) -> Vec<[f64; 2]> {
    let mut grid = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            grid.push([c as f64, r as f64]);
        }
    }
    grid
}
