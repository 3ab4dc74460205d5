use crate::util::*;

/// Number of points in a box with the given exclusive extents.
pub fn real_buffer_size<const DIMENSION: usize>(
    exclusive_bound: &Coord<DIMENSION>,
) -> usize {
    let mut accumulator = 1;
    for d in exclusive_bound {
        accumulator *= (*d).max(0) as usize;
    }
    accumulator
}

/// Linear index of a coordinate, the first axis varies fastest.
/// For 3D this is `i + nx * (j + ny * k)`.
pub fn coord_to_linear<const GRID_DIMENSION: usize>(
    coord: &Coord<GRID_DIMENSION>,
    exclusive_bounds: &Coord<GRID_DIMENSION>,
) -> usize {
    let mut accumulator = 0;
    for d in (0..GRID_DIMENSION).rev() {
        debug_assert!(coord[d] >= 0);
        debug_assert!(coord[d] < exclusive_bounds[d]);
        accumulator =
            accumulator * exclusive_bounds[d] as usize + coord[d] as usize;
    }
    accumulator
}

pub fn linear_to_coord<const GRID_DIMENSION: usize>(
    linear_index: usize,
    exclusive_bounds: &Coord<GRID_DIMENSION>,
) -> Coord<GRID_DIMENSION> {
    let mut result = Coord::zeros();
    let mut index_accumulator = linear_index;
    for d in 0..GRID_DIMENSION {
        let extent = exclusive_bounds[d] as usize;
        result[d] = (index_accumulator % extent) as i32;
        index_accumulator /= extent;
    }
    result
}

/// The flat 3D index used by every grid buffer.
#[inline(always)]
pub fn index_3d(nx: usize, ny: usize, i: usize, j: usize, k: usize) -> usize {
    i + nx * (j + ny * k)
}
