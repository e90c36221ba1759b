/// Tolerance on the barycentric coordinates used to accept points on a simplex boundary.
///
/// Matches the default tolerance of Qhull based `find_simplex` implementations.
pub const DEFAULT_EPS: f64 = 100.0 * f64::EPSILON;

/// Twice the signed area of the triangle `abc`.
///
/// Positive if `abc` is counter-clockwise, negative if clockwise and zero if collinear.
#[inline]
pub fn orient2d(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Computes the barycentric coordinates of a point with respect to a triangle.
///
/// # Arguments
///
/// * `point` - The query point.
/// * `tri` - The triangle vertices.
///
/// # Returns
///
/// The weights of the three vertices, or `None` if the triangle has zero area.
pub fn barycentric(point: &[f64; 2], tri: &[[f64; 2]; 3]) -> Option<[f64; 3]> {
    let [a, b, c] = tri;
    let area = orient2d(a, b, c);
    if area == 0.0 {
        return None;
    }

    Some([
        orient2d(point, b, c) / area,
        orient2d(a, point, c) / area,
        orient2d(a, b, point) / area,
    ])
}

/// Checks if a point lies inside or on the boundary of a triangle.
///
/// A point is accepted when all its barycentric coordinates are `>= -eps`. Degenerate
/// triangles contain nothing, and neither NaN comparison can succeed.
#[inline]
pub fn contains(tri: &[[f64; 2]; 3], point: &[f64; 2], eps: f64) -> bool {
    barycentric(point, tri).is_some_and(|weights| weights.iter().all(|&w| w >= -eps))
}

/// Axis aligned bounds of a triangle as (min, max) corners.
pub fn triangle_bounds(tri: &[[f64; 2]; 3]) -> ([f64; 2], [f64; 2]) {
    let [a, b, c] = tri;
    (
        [a[0].min(b[0]).min(c[0]), a[1].min(b[1]).min(c[1])],
        [a[0].max(b[0]).max(c[0]), a[1].max(b[1]).max(c[1])],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TRI: [[f64; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

    #[test]
    fn test_orient2d() {
        assert_eq!(orient2d(&TRI[0], &TRI[1], &TRI[2]), 1.0);
        assert_eq!(orient2d(&TRI[0], &TRI[2], &TRI[1]), -1.0);
        assert_eq!(orient2d(&[0.0, 0.0], &[1.0, 1.0], &[2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_barycentric() {
        let weights = barycentric(&[0.25, 0.25], &TRI).expect("non degenerate");
        assert_relative_eq!(weights[0], 0.5);
        assert_relative_eq!(weights[1], 0.25);
        assert_relative_eq!(weights[2], 0.25);

        // orientation of the triangle does not change the weights
        let flipped = [TRI[0], TRI[2], TRI[1]];
        let weights = barycentric(&[0.25, 0.25], &flipped).expect("non degenerate");
        assert_relative_eq!(weights[0], 0.5);
        assert_relative_eq!(weights[1], 0.25);
        assert_relative_eq!(weights[2], 0.25);
    }

    #[test]
    fn test_barycentric_degenerate() {
        let line = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        assert_eq!(barycentric(&[0.5, 0.5], &line), None);
        assert!(!contains(&line, &[0.5, 0.5], DEFAULT_EPS));
    }

    #[test]
    fn test_contains() {
        assert!(contains(&TRI, &[0.25, 0.25], DEFAULT_EPS));
        // vertices and edges are inside
        assert!(contains(&TRI, &[0.0, 0.0], DEFAULT_EPS));
        assert!(contains(&TRI, &[0.5, 0.5], DEFAULT_EPS));
        assert!(contains(&TRI, &[0.5, 0.0], DEFAULT_EPS));
        // outside
        assert!(!contains(&TRI, &[0.6, 0.6], DEFAULT_EPS));
        assert!(!contains(&TRI, &[-0.1, 0.5], DEFAULT_EPS));
        assert!(!contains(&TRI, &[f64::NAN, 0.5], DEFAULT_EPS));
    }

    #[test]
    fn test_triangle_bounds() {
        let tri = [[1.0, -2.0], [3.0, 0.5], [-1.0, 4.0]];
        assert_eq!(triangle_bounds(&tri), ([-1.0, -2.0], [3.0, 4.0]));
    }
}
