use crate::util::indexing::*;
use crate::util::*;

/// Axis Aligned Bounding Box (AABB) for coordinate types.
/// Each instance is inclusive of both corners.
/// This class is responsible for alot of indexing operations,
/// where we map between a linear buffer and coordinates.
/// A box whose max is below its min on some axis is empty.
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq)]
pub struct AABB<const DIMENSION: usize> {
    pub bounds: Bounds<DIMENSION>,
}

impl<const GRID_DIMENSION: usize> std::fmt::Display for AABB<GRID_DIMENSION> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        write!(f, "[")?;
        for d in 0..GRID_DIMENSION {
            if d > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}..={}", self.bounds[(d, 0)], self.bounds[(d, 1)])?;
        }
        write!(f, "]")
    }
}

impl<const DIMENSION: usize> AABB<DIMENSION> {
    /// Create AABB from raw bounds.
    #[inline]
    pub fn new(bounds: Bounds<DIMENSION>) -> Self {
        AABB { bounds }
    }

    /// Create AABB from corners.
    pub fn from_mm(min: Coord<DIMENSION>, max: Coord<DIMENSION>) -> Self {
        AABB {
            bounds: Bounds::from_columns(&[min, max]),
        }
    }

    /// Moving min to the origin, returns the exclusie size in each direction
    /// i.e. [0, 9]  would have exclusive size of 10.
    pub fn exclusive_bounds(&self) -> Coord<DIMENSION> {
        (self.bounds.column(1) - self.bounds.column(0)).add_scalar(1)
    }

    /// Return the number of coordinates contained in the instance.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        real_buffer_size(&self.exclusive_bounds())
    }

    /// Return the coordinate in the instance for a given linear index.
    pub fn linear_to_coord(&self, index: usize) -> Coord<DIMENSION> {
        linear_to_coord(index, &self.exclusive_bounds()) + self.min()
    }

    /// Check whether the instance contains a coordinate.
    pub fn contains(&self, coord: &Coord<DIMENSION>) -> bool {
        for d in 0..DIMENSION {
            if coord[d] < self.bounds[(d, 0)] || coord[d] > self.bounds[(d, 1)]
            {
                return false;
            }
        }
        true
    }

    /// Check whether another AABB is contained in the instance.
    pub fn contains_aabb(&self, other: &Self) -> bool {
        for d in 0..DIMENSION {
            if other.bounds[(d, 0)] < self.bounds[(d, 0)]
                || other.bounds[(d, 1)] > self.bounds[(d, 1)]
            {
                return false;
            }
        }
        true
    }

    pub fn trim_to_aabb(&mut self, other: &Self) {
        for d in 0..DIMENSION {
            self.bounds[(d, 0)] = self.bounds[(d, 0)].max(other.bounds[(d, 0)]);
            self.bounds[(d, 1)] = self.bounds[(d, 1)].min(other.bounds[(d, 1)]);
        }
    }

    /// Element wise add the bounds diff.
    pub fn add_bounds_diff(&self, diff: Bounds<DIMENSION>) -> Self {
        Self::new(self.bounds + diff)
    }

    /// Return min corner.
    pub fn min(&self) -> Coord<DIMENSION> {
        self.bounds.column(0).into()
    }

    /// Return max corner
    pub fn max(&self) -> Coord<DIMENSION> {
        self.bounds.column(1).into()
    }

    /// Check that max >= min
    pub fn check_validity(&self) -> bool {
        for d in 0..DIMENSION {
            if self.bounds[(d, 0)] > self.bounds[(d, 1)] {
                return false;
            }
        }
        true
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.check_validity()
    }

    /// Return iterator over contained coords
    /// in linear ordering.
    pub fn coord_iter(&self) -> impl Iterator<Item = Coord<DIMENSION>> + '_ {
        (0..self.buffer_size()).map(|i| self.linear_to_coord(i))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use nalgebra::{matrix, vector};

    #[test]
    fn buffer_size_test() {
        {
            let a = AABB::new(matrix![0, 5]);
            assert_eq!(a.buffer_size(), 6);
        }

        {
            let dimensions = AABB::new(matrix![0, 5; 0, 7; 0, 9]);
            assert_eq!(dimensions.buffer_size(), 6 * 8 * 10);
        }

        {
            let dimensions = AABB::new(matrix![1, 6; 1, 8; 1, 10]);
            assert_eq!(dimensions.buffer_size(), 6 * 8 * 10);
        }

        {
            let empty = AABB::new(matrix![1, 6; 4, 3; 1, 10]);
            assert!(empty.is_empty());
            assert_eq!(empty.buffer_size(), 0);
            assert_eq!(empty.coord_iter().count(), 0);
        }
    }

    #[test]
    fn in_box_comp_test() {
        {
            let bound = AABB::new(matrix![2, 8]);
            assert_eq!(bound.linear_to_coord(5), vector![7]);
        }

        {
            let bound = AABB::new(matrix![1, 9; 3, 7; 0, 4]);
            assert_eq!(bound.linear_to_coord(0), vector![1, 3, 0]);
            assert_eq!(bound.linear_to_coord(9 + 2 * 9), vector![1, 6, 0]);
        }
    }

    #[test]
    fn trim_test() {
        let mut tile = AABB::new(matrix![5, 8; 5, 8; 1, 8]);
        let interior = AABB::new(matrix![1, 6; 1, 8; 1, 8]);
        tile.trim_to_aabb(&interior);
        assert_eq!(tile, AABB::new(matrix![5, 6; 5, 8; 1, 8]));
        assert!(interior.contains_aabb(&tile));
    }

    #[test]
    fn check_validity_test() {
        {
            let a = AABB::new(matrix![0, 9]);
            assert!(a.check_validity());
        }

        {
            let a = AABB::new(matrix![9, 0]);
            assert!(!a.check_validity());
        }

        {
            let a = AABB::new(matrix![0, 0]);
            assert!(a.check_validity());
        }
    }

    #[test]
    fn bounds_diff_test() {
        let b = AABB::new(matrix![1, 4; 5, 8; 9, 12]);
        let shifted = b.add_bounds_diff(matrix![-2, -2; 0, -2; -2, 0]);
        assert_eq!(shifted, AABB::new(matrix![-1, 2; 5, 6; 7, 12]));
        assert_eq!(shifted.exclusive_bounds(), vector![4, 2, 6]);
    }
}
