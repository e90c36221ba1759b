use crate::error::MeshError;

/// A triangulation of a set of 2D control points.
///
/// Simplex `i` is a triple of indices into the shared point array. The order of the
/// simplices is kept verbatim and is the indexing convention used by every table that
/// stores per-simplex data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TriangulationParts"))]
pub struct Triangulation {
    points: Vec<[f64; 2]>,
    simplices: Vec<[usize; 3]>,
}

impl Triangulation {
    /// Create a new triangulation from control points and vertex index triples.
    ///
    /// # Arguments
    ///
    /// * `points` - The control points with shape (N, 2).
    /// * `simplices` - The vertex indices of each simplex with shape (S, 3).
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexOutOfBounds`] if any simplex references a point that
    /// does not exist.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_mesh::Triangulation;
    ///
    /// let tri = Triangulation::new(
    ///     vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    ///     vec![[0, 1, 2], [0, 2, 3]],
    /// ).unwrap();
    ///
    /// assert_eq!(tri.simplex_count(), 2);
    /// ```
    pub fn new(points: Vec<[f64; 2]>, simplices: Vec<[usize; 3]>) -> Result<Self, MeshError> {
        let num_points = points.len();
        for (simplex, vertices) in simplices.iter().enumerate() {
            if let Some(&vertex) = vertices.iter().find(|&&v| v >= num_points) {
                return Err(MeshError::VertexOutOfBounds {
                    simplex,
                    vertex,
                    num_points,
                });
            }
        }

        Ok(Self { points, simplices })
    }

    /// Create a triangulation with the same connectivity over a new set of points.
    ///
    /// This is how the mesh of the inverse direction is derived from the destination
    /// control points.
    pub fn with_points(&self, points: Vec<[f64; 2]>) -> Result<Self, MeshError> {
        if points.len() != self.points.len() {
            return Err(MeshError::PointCountMismatch {
                expected: self.points.len(),
                actual: points.len(),
            });
        }

        Ok(Self {
            points,
            simplices: self.simplices.clone(),
        })
    }

    /// Get the number of simplices.
    #[inline]
    pub fn simplex_count(&self) -> usize {
        self.simplices.len()
    }

    /// Check if the triangulation has no simplices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    /// Get as reference the control points.
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Get as reference the vertex index triples.
    pub fn simplices(&self) -> &[[usize; 3]] {
        &self.simplices
    }

    /// Get the coordinates of the three vertices of a simplex.
    pub fn vertices(&self, simplex: usize) -> Option<[[f64; 2]; 3]> {
        let [a, b, c] = *self.simplices.get(simplex)?;
        Some([
            *self.points.get(a)?,
            *self.points.get(b)?,
            *self.points.get(c)?,
        ])
    }

    /// Get the min and max corners of the points referenced by any simplex.
    ///
    /// Returns `None` if the triangulation has no simplices.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut corners = self
            .simplices
            .iter()
            .flatten()
            .filter_map(|&v| self.points.get(v));

        let first = *corners.next()?;
        Some(corners.fold((first, first), |(min, max), p| {
            (
                [min[0].min(p[0]), min[1].min(p[1])],
                [max[0].max(p[0]), max[1].max(p[1])],
            )
        }))
    }
}

/// Unvalidated representation used to deserialize a [`Triangulation`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TriangulationParts {
    points: Vec<[f64; 2]>,
    simplices: Vec<[usize; 3]>,
}

#[cfg(feature = "serde")]
impl TryFrom<TriangulationParts> for Triangulation {
    type Error = MeshError;

    fn try_from(parts: TriangulationParts) -> Result<Self, Self::Error> {
        Self::new(parts.points, parts.simplices)
    }
}
