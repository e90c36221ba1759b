use crate::{affine::AffineMap, error::TransformError};

/// Dense table of affine maps, one per simplex, indexed in simplex order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineMapTable {
    maps: Vec<AffineMap>,
}

impl AffineMapTable {
    /// Create a new table from one affine map per simplex.
    ///
    /// # Arguments
    ///
    /// * `maps` - The affine maps in simplex order.
    /// * `num_simplices` - The number of simplices of the triangulation.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if there is not exactly one map per simplex.
    pub fn new(maps: Vec<AffineMap>, num_simplices: usize) -> Result<Self, TransformError> {
        if maps.len() != num_simplices {
            return Err(TransformError::DimensionMismatch {
                expected: num_simplices,
                actual: maps.len(),
            });
        }
        Ok(Self { maps })
    }

    /// Create a new table from row-major parameters with shape (S, 2, 3).
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if `params` does not hold exactly
    /// `6 * num_simplices` values.
    pub fn from_flat(params: &[f64], num_simplices: usize) -> Result<Self, TransformError> {
        if params.len() != 6 * num_simplices {
            return Err(TransformError::DimensionMismatch {
                expected: 6 * num_simplices,
                actual: params.len(),
            });
        }
        let maps = params
            .chunks_exact(6)
            .map(AffineMap::from_slice)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(maps, num_simplices)
    }

    /// Get the number of maps in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Check if the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Get the map of a simplex.
    #[inline]
    pub fn get(&self, simplex: usize) -> Option<&AffineMap> {
        self.maps.get(simplex)
    }

    /// Get as reference the maps in simplex order.
    pub fn as_slice(&self) -> &[AffineMap] {
        &self.maps
    }

    /// Gathers the map selected by every simplex index into a new array of shape (N, 2, 3).
    ///
    /// Rows without a simplex gather the map at index 0 as a placeholder, or the zero map
    /// if the table is empty; callers are expected to discard them.
    pub fn gather(&self, indices: &[Option<usize>]) -> Vec<AffineMap> {
        let placeholder = self.maps.first().copied().unwrap_or_else(AffineMap::zeros);
        indices
            .iter()
            .map(|index| {
                index
                    .and_then(|i| self.maps.get(i))
                    .copied()
                    .unwrap_or(placeholder)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dimension_mismatch() {
        let res = AffineMapTable::new(vec![AffineMap::identity()], 2);
        assert_eq!(
            res,
            Err(TransformError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_from_flat() -> Result<(), TransformError> {
        let params = [
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            2.0, 0.0, 1.0, 0.0, 2.0, 1.0,
        ];
        let table = AffineMapTable::from_flat(&params, 2)?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), Some(&AffineMap::identity()));
        assert_eq!(
            table.get(1),
            Some(&AffineMap::new([[2.0, 0.0, 1.0], [0.0, 2.0, 1.0]]))
        );
        Ok(())
    }

    #[test]
    fn test_from_flat_malformed() {
        // 2 simplices need 12 parameters
        let res = AffineMapTable::from_flat(&[0.0; 11], 2);
        assert_eq!(
            res,
            Err(TransformError::DimensionMismatch {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn test_gather() -> Result<(), TransformError> {
        let scale = AffineMap::new([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let table = AffineMapTable::new(vec![AffineMap::identity(), scale], 2)?;
        let gathered = table.gather(&[Some(1), None, Some(0), Some(1)]);
        assert_eq!(
            gathered,
            vec![scale, AffineMap::identity(), AffineMap::identity(), scale]
        );
        assert!(table.gather(&[]).is_empty());
        Ok(())
    }

    #[test]
    fn test_gather_empty_table() -> Result<(), TransformError> {
        let table = AffineMapTable::new(vec![], 0)?;
        assert!(table.is_empty());
        assert_eq!(table.gather(&[None, None]), vec![AffineMap::zeros(); 2]);
        Ok(())
    }
}
