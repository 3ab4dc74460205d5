mod aabb;
pub mod indexing;
pub use aabb::*;

pub type Coord<const GRID_DIMENSION: usize> =
    nalgebra::SVector<i32, { GRID_DIMENSION }>;

/// Per axis `(min, max)` pairs, used for boxes and for slopes.
pub type Bounds<const DIMENSION: usize> =
    nalgebra::SMatrix<i32, { DIMENSION }, 2>;
