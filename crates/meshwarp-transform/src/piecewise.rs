use std::sync::atomic::{AtomicBool, Ordering};

use meshwarp_mesh::{BuildLocator, GridLocator, SimplexLocator, Triangulation};

use crate::{
    affine::{estimate_affine_maps, AffineMap},
    batch::{batched_affine, mask_outside, points_from_flat, to_homogeneous},
    error::TransformError,
    parallel::ExecutionStrategy,
    reference,
    table::AffineMapTable,
};

#[derive(Debug, Clone)]
struct Prepared<L> {
    locator: L,
    table: AffineMapTable,
}

/// Piecewise affine transform over a triangulated mesh.
///
/// Holds a simplex locator and one affine map per simplex. Evaluation classifies the
/// whole batch of query points with a single call to the locator, gathers the affine
/// map of every point, and applies all of them in one batched contraction. Points
/// outside the triangulation are mapped to [`OUTSIDE_POINT`](crate::batch::OUTSIDE_POINT).
///
/// The prepared state is read-only during evaluation, so any number of threads may
/// call [`evaluate`](Self::evaluate) on a shared reference. Re-preparing requires a
/// mutable borrow, which the borrow checker keeps exclusive from readers.
///
/// # Example
///
/// ```
/// use meshwarp_mesh::{BruteForceLocator, Triangulation};
/// use meshwarp_transform::{AffineMap, PiecewiseAffineTransform};
///
/// let tri = Triangulation::new(
///     vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
///     vec![[0, 1, 2], [0, 2, 3]],
/// ).unwrap();
///
/// let mut transform = PiecewiseAffineTransform::new();
/// transform
///     .prepare(BruteForceLocator::new(tri), vec![AffineMap::identity(); 2])
///     .unwrap();
///
/// let out = transform.evaluate(&[[0.5, 0.5], [2.0, 2.0]]).unwrap();
/// assert_eq!(out, vec![[0.5, 0.5], [-1.0, -1.0]]);
/// ```
#[derive(Debug, Clone)]
pub struct PiecewiseAffineTransform<L = GridLocator> {
    prepared: Option<Prepared<L>>,
    strategy: ExecutionStrategy,
}

impl<L> Default for PiecewiseAffineTransform<L> {
    fn default() -> Self {
        Self {
            prepared: None,
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl<L: SimplexLocator> PiecewiseAffineTransform<L> {
    /// Create a new, unprepared transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy of the batched contraction.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Get the execution strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Prepares the transform from a locator and one affine map per simplex.
    ///
    /// The maps must be in the simplex order of the locator's triangulation. On error
    /// the previously prepared state, if any, is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if the number of maps differs from
    /// the number of simplices.
    pub fn prepare(
        &mut self,
        locator: L,
        affine_maps: Vec<AffineMap>,
    ) -> Result<(), TransformError> {
        let table = AffineMapTable::new(affine_maps, locator.simplex_count())?;
        self.install(locator, table);
        Ok(())
    }

    /// Prepares the transform from row-major affine parameters with shape (S, 2, 3).
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if `params` does not hold exactly
    /// 6 values per simplex.
    pub fn prepare_flat(&mut self, locator: L, params: &[f64]) -> Result<(), TransformError> {
        let table = AffineMapTable::from_flat(params, locator.simplex_count())?;
        self.install(locator, table);
        Ok(())
    }

    fn install(&mut self, locator: L, table: AffineMapTable) {
        log::debug!("prepared piecewise affine table with {} simplices", table.len());
        self.prepared = Some(Prepared { locator, table });
    }

    /// Check if the transform has been prepared.
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Get as reference the simplex locator, if prepared.
    pub fn locator(&self) -> Option<&L> {
        self.prepared.as_ref().map(|p| &p.locator)
    }

    /// Get as reference the affine map table, if prepared.
    pub fn table(&self) -> Option<&AffineMapTable> {
        self.prepared.as_ref().map(|p| &p.table)
    }

    fn prepared(&self) -> Result<&Prepared<L>, TransformError> {
        self.prepared.as_ref().ok_or(TransformError::NotPrepared)
    }

    // locate, gather, lift and contract; rows outside the mesh hold placeholder results
    fn evaluate_unmasked(
        &self,
        points: &[[f64; 2]],
    ) -> Result<(Vec<Option<usize>>, Vec<[f64; 2]>), TransformError> {
        let Prepared { locator, table } = self.prepared()?;

        let simplices = locator.locate(points);
        if simplices.len() != points.len() {
            return Err(TransformError::ShapeError(format!(
                "locator returned {} simplices for {} points",
                simplices.len(),
                points.len()
            )));
        }
        // indices past the table are treated as outside, like the pointwise path
        let simplices = simplices
            .into_iter()
            .map(|s| s.filter(|&i| i < table.len()))
            .collect::<Vec<_>>();

        let affines = table.gather(&simplices);
        let homogeneous = to_homogeneous(points);

        let mut dst = vec![[0.0; 2]; points.len()];
        batched_affine(&affines, &homogeneous, &mut dst, self.strategy)?;

        Ok((simplices, dst))
    }

    /// Transforms a batch of points.
    ///
    /// # Arguments
    ///
    /// * `points` - The query points with shape (N, 2).
    ///
    /// # Returns
    ///
    /// The transformed points with shape (N, 2), in the order of `points`. Points
    /// outside the triangulation are mapped to
    /// [`OUTSIDE_POINT`](crate::batch::OUTSIDE_POINT). Non-finite coordinates are not
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NotPrepared`] if called before [`prepare`](Self::prepare).
    pub fn evaluate(&self, points: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, TransformError> {
        let (simplices, mut dst) = self.evaluate_unmasked(points)?;
        mask_outside(&simplices, &mut dst);

        log::trace!(
            "evaluated {} points, {} outside the mesh",
            points.len(),
            simplices.iter().filter(|s| s.is_none()).count()
        );

        Ok(dst)
    }

    /// Transforms interleaved `x0, y0, x1, y1, ...` coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ShapeError`] if `coords` has an odd length and
    /// [`TransformError::NotPrepared`] if called before [`prepare`](Self::prepare).
    pub fn evaluate_flat(&self, coords: &[f64]) -> Result<Vec<f64>, TransformError> {
        let points = points_from_flat(coords)?;
        Ok(self.evaluate(&points)?.into_iter().flatten().collect())
    }

    /// Transforms a batch of points, reporting points outside the triangulation as `None`.
    ///
    /// Unlike [`evaluate`](Self::evaluate), a transformed point equal to `(-1, -1)` cannot
    /// be mistaken for a point outside the mesh.
    pub fn evaluate_with_validity(
        &self,
        points: &[[f64; 2]],
    ) -> Result<Vec<Option<[f64; 2]>>, TransformError> {
        let (simplices, dst) = self.evaluate_unmasked(points)?;
        Ok(simplices
            .iter()
            .zip(dst)
            .map(|(simplex, p)| simplex.map(|_| p))
            .collect())
    }

    /// Transforms a batch of points in chunks, checking a cancellation flag between chunks.
    ///
    /// Either the full batch is returned or an error; a cancelled call never returns the
    /// chunks evaluated so far.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Cancelled`] if `cancel` is set before the last chunk and
    /// [`TransformError::ShapeError`] if `chunk_size` is zero.
    pub fn evaluate_chunked(
        &self,
        points: &[[f64; 2]],
        chunk_size: usize,
        cancel: &AtomicBool,
    ) -> Result<Vec<[f64; 2]>, TransformError> {
        self.prepared()?;
        if chunk_size == 0 {
            return Err(TransformError::ShapeError(
                "chunk size must be > 0".to_string(),
            ));
        }

        let mut dst = Vec::with_capacity(points.len());
        for chunk in points.chunks(chunk_size) {
            if cancel.load(Ordering::Relaxed) {
                log::debug!(
                    "evaluation cancelled after {} of {} points",
                    dst.len(),
                    points.len()
                );
                return Err(TransformError::Cancelled);
            }
            dst.extend(self.evaluate(chunk)?);
        }

        Ok(dst)
    }

    /// Transforms a batch of points one at a time.
    ///
    /// Same result as [`evaluate`](Self::evaluate), computed through
    /// [`reference::evaluate_pointwise`].
    pub fn evaluate_pointwise(
        &self,
        points: &[[f64; 2]],
    ) -> Result<Vec<[f64; 2]>, TransformError> {
        let Prepared { locator, table } = self.prepared()?;
        Ok(reference::evaluate_pointwise(locator, table, points))
    }
}

impl<L: BuildLocator> PiecewiseAffineTransform<L> {
    /// Estimates the transform mapping `src` control points onto `dst` control points.
    ///
    /// The triangulation is built over `src` with the given connectivity, and one affine
    /// map is fitted per simplex from its three vertex correspondences.
    ///
    /// # Arguments
    ///
    /// * `src` - The source control points with shape (N, 2).
    /// * `dst` - The destination control points with shape (N, 2).
    /// * `simplices` - The vertex indices of each simplex with shape (S, 3).
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if `src` and `dst` differ in length,
    /// [`TransformError::DegenerateSimplex`] if a source triangle has zero area, and
    /// [`TransformError::Mesh`] for an invalid triangulation.
    pub fn estimate(
        src: &[[f64; 2]],
        dst: &[[f64; 2]],
        simplices: Vec<[usize; 3]>,
    ) -> Result<Self, TransformError> {
        if src.len() != dst.len() {
            return Err(TransformError::DimensionMismatch {
                expected: src.len(),
                actual: dst.len(),
            });
        }

        let triangulation = Triangulation::new(src.to_vec(), simplices)?;
        let affine_maps = estimate_affine_maps(&triangulation, dst)?;
        log::debug!(
            "estimated {} affine maps from {} control points",
            affine_maps.len(),
            src.len()
        );

        let mut transform = Self::new();
        transform.prepare(L::build(triangulation)?, affine_maps)?;
        Ok(transform)
    }

    /// Estimates the transform mapping `dst` control points back onto `src`.
    ///
    /// Uses the same connectivity, laid over the destination points.
    pub fn estimate_inverse(
        src: &[[f64; 2]],
        dst: &[[f64; 2]],
        simplices: Vec<[usize; 3]>,
    ) -> Result<Self, TransformError> {
        Self::estimate(dst, src, simplices)
    }
}
