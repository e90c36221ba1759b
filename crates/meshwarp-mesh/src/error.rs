use thiserror::Error;

/// An error type for mesh construction and point location.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    /// A simplex references a vertex that does not exist in the point set.
    #[error("Simplex {simplex} references vertex {vertex}, but there are only {num_points} points")]
    VertexOutOfBounds {
        /// Index of the offending simplex.
        simplex: usize,
        /// The out of range vertex index.
        vertex: usize,
        /// Number of points in the mesh.
        num_points: usize,
    },

    /// The number of points does not match the number of points in the mesh.
    #[error("Point count mismatch: expected {expected}, got {actual}")]
    PointCountMismatch {
        /// Number of points in the mesh.
        expected: usize,
        /// Number of points provided.
        actual: usize,
    },

    /// The grid resolution of a locator must be non-zero in both directions.
    #[error("Grid resolution must be > 0, got {0}x{1}")]
    InvalidResolution(usize, usize),
}
