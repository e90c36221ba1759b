#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Affine maps on homogeneous 2D points and their estimation from triangles.
pub mod affine;

/// Batched kernel: homogeneous lifting, batched contraction and outside masking.
pub mod batch;

/// Error types for the transform module.
pub mod error;

/// Execution strategies for row-parallel kernels.
pub mod parallel;

/// Piecewise affine transform evaluator.
pub mod piecewise;

/// Pointwise reference evaluation.
pub mod reference;

/// Per-simplex affine map tables.
pub mod table;

pub use affine::{estimate_affine_maps, AffineMap};
pub use batch::OUTSIDE_POINT;
pub use error::TransformError;
pub use parallel::ExecutionStrategy;
pub use piecewise::PiecewiseAffineTransform;
pub use table::AffineMapTable;
