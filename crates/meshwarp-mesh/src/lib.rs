#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the mesh module.
pub mod error;

/// Point location against the simplices of a triangulation.
///
/// Provides the [`SimplexLocator`] trait together with a brute force and a
/// grid accelerated implementation.
pub mod locator;

/// Geometric predicates on triangles.
pub mod predicates;

/// Triangulation data model.
pub mod triangulation;

pub use error::MeshError;
pub use locator::{BruteForceLocator, BuildLocator, GridLocator, SimplexLocator};
pub use triangulation::Triangulation;
