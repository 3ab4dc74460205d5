use crate::error::*;
use crate::util::indexing::*;
use crate::util::*;
use nalgebra::{matrix, vector};
use rayon::prelude::*;

/// Flat 3D double precision grid, x varies fastest.
///
/// The outermost shell (index 0 and dim-1 on every axis) holds ghost values
/// that the stencil reads but never writes.
/// The corner cell `(0, 0, 0)` doubles as the spacing factor `fac`,
/// no 7-point update ever reads a corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dims: Coord<3>,
    buffer: Vec<f64>,
}

impl Grid {
    /// Zero filled grid.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        Self::filled(nx, ny, nz, 0.0)
    }

    pub fn filled(nx: usize, ny: usize, nz: usize, value: f64) -> Result<Self> {
        if nx < 3 || ny < 3 || nz < 3 {
            return Err(StencilError::GridTooSmall { nx, ny, nz });
        }
        Ok(Grid {
            dims: vector![nx as i32, ny as i32, nz as i32],
            buffer: vec![value; nx * ny * nz],
        })
    }

    pub fn from_fn<F: Fn(Coord<3>) -> f64 + Send + Sync>(
        nx: usize,
        ny: usize,
        nz: usize,
        f: F,
    ) -> Result<Self> {
        let mut grid = Self::new(nx, ny, nz)?;
        grid.par_set_values(f, nx * ny);
        Ok(grid)
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.dims[0] as usize
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.dims[1] as usize
    }

    #[inline]
    pub fn nz(&self) -> usize {
        self.dims[2] as usize
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.nx(), self.ny(), self.nz()]
    }

    pub fn exclusive_bounds(&self) -> &Coord<3> {
        &self.dims
    }

    /// Every coordinate of the grid, boundary included.
    pub fn aabb(&self) -> AABB<3> {
        AABB::from_mm(Coord::zeros(), self.dims.add_scalar(-1))
    }

    /// The cells the stencil updates.
    pub fn interior(&self) -> AABB<3> {
        let [nx, ny, nz] = [self.dims[0], self.dims[1], self.dims[2]];
        AABB::new(matrix![1, nx - 2; 1, ny - 2; 1, nz - 2])
    }

    pub fn is_boundary(&self, coord: &Coord<3>) -> bool {
        !self.interior().contains(coord)
    }

    #[inline(always)]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        index_3d(self.nx(), self.ny(), i, j, k)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.buffer[self.index(i, j, k)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f64) {
        let index = self.index(i, j, k);
        self.buffer[index] = value;
    }

    pub fn view(&self, coord: &Coord<3>) -> f64 {
        self.buffer[coord_to_linear(coord, &self.dims)]
    }

    pub fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    /// One xy plane, `nx * ny` values.
    pub fn plane(&self, k: usize) -> &[f64] {
        let n = self.nx() * self.ny();
        &self.buffer[k * n..(k + 1) * n]
    }

    pub fn plane_mut(&mut self, k: usize) -> &mut [f64] {
        let n = self.nx() * self.ny();
        &mut self.buffer[k * n..(k + 1) * n]
    }

    /// Spacing factor, read from data so it never folds into a constant.
    #[inline]
    pub fn fac(&self) -> f64 {
        self.buffer[0]
    }

    pub fn set_fac(&mut self, fac: f64) {
        self.buffer[0] = fac;
    }

    pub fn fill(&mut self, value: f64) {
        self.buffer.fill(value);
    }

    pub fn par_set_values<F: Fn(Coord<3>) -> f64 + Send + Sync>(
        &mut self,
        f: F,
        chunk_size: usize,
    ) {
        let dims = self.dims;
        self.buffer
            .par_chunks_mut(chunk_size.max(1))
            .enumerate()
            .for_each(|(c, chunk)| {
                let offset = c * chunk_size.max(1);
                for (l, value_mut) in chunk.iter_mut().enumerate() {
                    *value_mut = f(linear_to_coord(offset + l, &dims));
                }
            });
    }

    /// Copy the interior cells of `other` into self, ghost cells untouched.
    pub fn copy_interior_from(&mut self, other: &Grid) -> Result<()> {
        if self.dims != other.dims {
            return Err(StencilError::DimensionMismatch {
                a: self.dims(),
                b: other.dims(),
            });
        }
        let (nx, ny, nz) = (self.nx(), self.ny(), self.nz());
        for k in 1..nz - 1 {
            for j in 1..ny - 1 {
                let start = index_3d(nx, ny, 1, j, k);
                let end = start + nx - 2;
                self.buffer[start..end]
                    .copy_from_slice(&other.buffer[start..end]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn too_small_test() {
        assert_eq!(
            Grid::new(2, 5, 5),
            Err(StencilError::GridTooSmall {
                nx: 2,
                ny: 5,
                nz: 5
            })
        );
        assert!(Grid::new(3, 3, 3).is_ok());
    }

    #[test]
    fn index_test() {
        let mut grid = Grid::new(4, 5, 6).unwrap();
        grid.set(3, 2, 1, 7.0);
        assert_eq!(grid.buffer()[3 + 4 * (2 + 5 * 1)], 7.0);
        assert_eq!(grid.get(3, 2, 1), 7.0);
        assert_eq!(grid.view(&vector![3, 2, 1]), 7.0);
    }

    #[test]
    fn interior_test() {
        let grid = Grid::new(6, 7, 8).unwrap();
        let interior = grid.interior();
        assert_eq!(interior.buffer_size(), 4 * 5 * 6);
        assert!(grid.is_boundary(&vector![0, 3, 3]));
        assert!(grid.is_boundary(&vector![3, 6, 3]));
        assert!(grid.is_boundary(&vector![3, 3, 7]));
        assert!(!grid.is_boundary(&vector![1, 5, 6]));
        assert_eq!(grid.aabb().buffer_size(), 6 * 7 * 8);
    }

    #[test]
    fn from_fn_test() {
        let grid =
            Grid::from_fn(5, 4, 3, |c| (c[0] + 10 * c[1] + 100 * c[2]) as f64)
                .unwrap();
        for c in grid.aabb().coord_iter() {
            let e = (c[0] + 10 * c[1] + 100 * c[2]) as f64;
            assert_eq!(grid.view(&c), e);
        }
    }

    #[test]
    fn copy_interior_test() {
        let mut a = Grid::filled(5, 5, 5, 1.0).unwrap();
        let b = Grid::filled(5, 5, 5, 2.0).unwrap();
        a.copy_interior_from(&b).unwrap();
        for c in a.aabb().coord_iter() {
            let e = if a.is_boundary(&c) { 1.0 } else { 2.0 };
            assert_eq!(a.view(&c), e);
        }

        let c = Grid::new(5, 5, 6).unwrap();
        assert!(a.copy_interior_from(&c).is_err());
    }
}
