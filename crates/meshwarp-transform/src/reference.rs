use meshwarp_mesh::SimplexLocator;

use crate::{batch::OUTSIDE_POINT, table::AffineMapTable};

/// Evaluates a piecewise affine transform one point at a time.
///
/// Each point is located with [`SimplexLocator::locate_one`] and transformed with its own
/// affine map. This is the slow path the batched evaluator is checked and benchmarked
/// against; both produce identical results for a deterministic locator.
///
/// # Arguments
///
/// * `locator` - The simplex locator of the triangulation.
/// * `table` - The affine map of every simplex.
/// * `points` - The query points with shape (N, 2).
///
/// # Returns
///
/// The transformed points with shape (N, 2), with [`OUTSIDE_POINT`] for points outside
/// the triangulation.
pub fn evaluate_pointwise<L: SimplexLocator + ?Sized>(
    locator: &L,
    table: &AffineMapTable,
    points: &[[f64; 2]],
) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| {
            match locator.locate_one(p).and_then(|simplex| table.get(simplex)) {
                Some(m) => m.apply(p),
                None => OUTSIDE_POINT,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{affine::AffineMap, error::TransformError};
    use meshwarp_mesh::{BruteForceLocator, Triangulation};

    #[test]
    fn test_evaluate_pointwise() -> Result<(), TransformError> {
        let tri = Triangulation::new(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            vec![[0, 1, 2], [0, 2, 3]],
        )?;
        let shift = AffineMap::new([[1.0, 0.0, 5.0], [0.0, 1.0, 0.0]]);
        let table = AffineMapTable::new(vec![AffineMap::identity(), shift], 2)?;
        let locator = BruteForceLocator::new(tri);

        let out = evaluate_pointwise(&locator, &table, &[[0.75, 0.25], [0.25, 0.75], [3.0, 3.0]]);
        assert_eq!(out, vec![[0.75, 0.25], [5.25, 0.75], OUTSIDE_POINT]);
        Ok(())
    }
}
