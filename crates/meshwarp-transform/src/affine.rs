use meshwarp_mesh::Triangulation;

use crate::error::TransformError;

/// A 2x3 affine map acting on homogeneous 2D points.
///
/// The rows are `[a, b, c]` and `[d, e, f]`, mapping `(x, y, 1)` to
/// `(a * x + b * y + c, d * x + e * y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineMap([[f64; 3]; 2]);

impl AffineMap {
    /// Create an affine map from its two rows.
    pub const fn new(rows: [[f64; 3]; 2]) -> Self {
        Self(rows)
    }

    /// The identity map.
    pub const fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    /// The map sending every point to the origin.
    pub const fn zeros() -> Self {
        Self([[0.0; 3]; 2])
    }

    /// Create an affine map from 6 row-major parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if `params` does not hold exactly 6 values.
    pub fn from_slice(params: &[f64]) -> Result<Self, TransformError> {
        let [a, b, c, d, e, f]: [f64; 6] =
            params
                .try_into()
                .map_err(|_| TransformError::DimensionMismatch {
                    expected: 6,
                    actual: params.len(),
                })?;
        Ok(Self([[a, b, c], [d, e, f]]))
    }

    /// Get as reference the two rows of the matrix.
    pub fn as_rows(&self) -> &[[f64; 3]; 2] {
        &self.0
    }

    /// Applies the map to a homogeneous point `(x, y, w)`.
    #[inline]
    pub fn apply_homogeneous(&self, point: &[f64; 3]) -> [f64; 2] {
        let [r0, r1] = &self.0;
        [
            r0[0] * point[0] + r0[1] * point[1] + r0[2] * point[2],
            r1[0] * point[0] + r1[1] * point[1] + r1[2] * point[2],
        ]
    }

    /// Applies the map to a 2D point.
    #[inline]
    pub fn apply(&self, point: &[f64; 2]) -> [f64; 2] {
        self.apply_homogeneous(&[point[0], point[1], 1.0])
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        let [r0, r1] = &self.0;
        r0[0] * r1[1] - r0[1] * r1[0]
    }

    /// Inverts the map.
    ///
    /// For `p' = L p + t` the inverse is `p = L^-1 p' - L^-1 t`, with `L^-1` taken from
    /// the adjugate of the linear part. A singular map has no inverse; it yields the
    /// zero map rather than an error, matching the numeric behaviour of image warping
    /// libraries.
    pub fn inverse(&self) -> Self {
        let det = self.determinant();
        if det == 0.0 {
            return Self::zeros();
        }

        let [[a, b, tx], [d, e, ty]] = self.0;
        let inv_det = 1.0 / det;
        let linear = [[e * inv_det, -b * inv_det], [-d * inv_det, a * inv_det]];
        let translation = [
            -(linear[0][0] * tx + linear[0][1] * ty),
            -(linear[1][0] * tx + linear[1][1] * ty),
        ];

        Self([
            [linear[0][0], linear[0][1], translation[0]],
            [linear[1][0], linear[1][1], translation[1]],
        ])
    }

    /// Computes the affine map sending the three `src` vertices onto the three `dst` vertices.
    ///
    /// Three correspondences fix a 2D affine map exactly, so the map is solved in closed
    /// form from the edge vectors of both triangles.
    ///
    /// # Arguments
    ///
    /// * `src` - The source triangle.
    /// * `dst` - The destination triangle.
    ///
    /// # Returns
    ///
    /// The affine map, or `None` if the source triangle has zero area.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_transform::AffineMap;
    ///
    /// let src = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    /// let dst = [[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]];
    /// let m = AffineMap::from_triangles(&src, &dst).unwrap();
    ///
    /// assert_eq!(m.apply(&[0.25, 0.25]), [0.5, 0.5]);
    /// ```
    pub fn from_triangles(src: &[[f64; 2]; 3], dst: &[[f64; 2]; 3]) -> Option<Self> {
        let [s0, s1, s2] = src;
        let [d0, d1, d2] = dst;

        // edge matrices with the edges from vertex 0 as columns
        let (s00, s01, s10, s11) = (s1[0] - s0[0], s2[0] - s0[0], s1[1] - s0[1], s2[1] - s0[1]);
        let (d00, d01, d10, d11) = (d1[0] - d0[0], d2[0] - d0[0], d1[1] - d0[1], d2[1] - d0[1]);

        let det = s00 * s11 - s01 * s10;
        if det == 0.0 {
            return None;
        }
        let inv_det = 1.0 / det;

        // linear part: D * S^-1, with S^-1 from the adjugate
        let a = (d00 * s11 - d01 * s10) * inv_det;
        let b = (d01 * s00 - d00 * s01) * inv_det;
        let d = (d10 * s11 - d11 * s10) * inv_det;
        let e = (d11 * s00 - d10 * s01) * inv_det;

        let c = d0[0] - (a * s0[0] + b * s0[1]);
        let f = d0[1] - (d * s0[0] + e * s0[1]);

        Some(Self([[a, b, c], [d, e, f]]))
    }
}

impl Default for AffineMap {
    fn default() -> Self {
        Self::identity()
    }
}

/// Fits one affine map per simplex from source/destination control points.
///
/// The source control points are the points of `triangulation`; `dst_points` holds their
/// counterparts in the destination space, in the same order.
///
/// # Errors
///
/// Returns [`TransformError::DimensionMismatch`] if the point counts differ and
/// [`TransformError::DegenerateSimplex`] if a source triangle has zero area.
pub fn estimate_affine_maps(
    triangulation: &Triangulation,
    dst_points: &[[f64; 2]],
) -> Result<Vec<AffineMap>, TransformError> {
    let src_points = triangulation.points();
    if dst_points.len() != src_points.len() {
        return Err(TransformError::DimensionMismatch {
            expected: src_points.len(),
            actual: dst_points.len(),
        });
    }

    let dst_triangulation = triangulation.with_points(dst_points.to_vec())?;

    (0..triangulation.simplex_count())
        .map(|i| {
            triangulation
                .vertices(i)
                .zip(dst_triangulation.vertices(i))
                .and_then(|(src, dst)| AffineMap::from_triangles(&src, &dst))
                .ok_or(TransformError::DegenerateSimplex(i))
        })
        .collect()
}
