use meshwarp_mesh::MeshError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// An error type for piecewise affine transforms.
#[derive(Error, Debug, PartialEq)]
pub enum TransformError {
    /// The transform was evaluated before its affine table was prepared.
    #[error("The transform has not been prepared")]
    NotPrepared,

    /// The number of affine maps (or parameters) does not match what is expected.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected count.
        expected: usize,
        /// Provided count.
        actual: usize,
    },

    /// The query points are not well formed 2D coordinates.
    #[error("Invalid shape: {0}")]
    ShapeError(String),

    /// The source triangle of a simplex has zero area, so no affine map fits it.
    #[error("Simplex {0} is degenerate in the source space")]
    DegenerateSimplex(usize),

    /// A chunked evaluation was cancelled by the caller.
    #[error("Evaluation was cancelled")]
    Cancelled,

    /// Mesh error
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Parallel execution error
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
