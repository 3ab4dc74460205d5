use crate::domain::*;
use crate::util::*;

pub const NEIGHBORHOOD_SIZE: usize = 7;

/// Neighbor offsets in the order their values are summed.
/// The centre comes last since it carries the `-6` weight.
pub const HEAT_OFFSETS: [[i32; 3]; NEIGHBORHOOD_SIZE] = [
    [0, 0, -1],
    [0, 0, 1],
    [0, -1, 0],
    [0, 1, 0],
    [-1, 0, 0],
    [1, 0, 0],
    [0, 0, 0],
];

pub type Values = [f64; NEIGHBORHOOD_SIZE];

/// 7-point Laplacian normalised by the squared spacing factor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeatStencil {
    fac_sq: f64,
}

impl HeatStencil {
    pub fn new(fac: f64) -> Self {
        HeatStencil { fac_sq: fac * fac }
    }

    /// Uses the spacing factor stored in the grid.
    pub fn from_grid(grid: &Grid) -> Self {
        Self::new(grid.fac())
    }

    pub fn offsets() -> [Coord<3>; NEIGHBORHOOD_SIZE] {
        std::array::from_fn(|n| Coord::from_column_slice(&HEAT_OFFSETS[n]))
    }

    /// Per side how far the stencil reaches, as `(min, max)` pairs.
    pub fn slopes() -> Bounds<3> {
        let mut result = Bounds::zeros();
        for neighbor in Self::offsets() {
            for d in 0..3 {
                let neighbor_d = neighbor[d];
                if neighbor_d > 0 {
                    result[(d, 1)] = result[(d, 1)].max(neighbor_d);
                } else {
                    result[(d, 0)] = result[(d, 0)].max(-neighbor_d);
                }
            }
        }
        result
    }

    /// Per axis the larger of the two side slopes. A space-time region
    /// whose sides lean by this much per step never reads a value from
    /// across the side.
    pub fn reach() -> Coord<3> {
        let slopes = Self::slopes();
        Coord::from_fn(|d, _| slopes[(d, 0)].max(slopes[(d, 1)]))
    }

    /// `args` follows `HEAT_OFFSETS`.
    #[inline(always)]
    pub fn apply(&self, args: &Values) -> f64 {
        (args[0] + args[1] + args[2] + args[3] + args[4] + args[5]
            - 6.0 * args[6])
            / self.fac_sq
    }

    /// Collect the neighborhood of `index` in a buffer with
    /// row stride `sy` and plane stride `sz`.
    #[inline(always)]
    pub fn gather(
        buffer: &[f64],
        index: usize,
        sy: usize,
        sz: usize,
    ) -> Values {
        [
            buffer[index - sz],
            buffer[index + sz],
            buffer[index - sy],
            buffer[index + sy],
            buffer[index - 1],
            buffer[index + 1],
            buffer[index],
        ]
    }
}

/// Update every cell of `region` in `output` from `input`.
/// The region must lie in the interior, an empty region is a no-op.
/// Loop order is z, y, then x.
pub fn box_apply(
    stencil: &HeatStencil,
    input: &Grid,
    output: &mut Grid,
    region: &AABB<3>,
) {
    debug_assert_eq!(input.dims(), output.dims());
    debug_assert!(region.is_empty() || input.interior().contains_aabb(region));
    if region.is_empty() {
        return;
    }

    let (nx, ny) = (input.nx(), input.ny());
    let (sy, sz) = (nx, nx * ny);
    let ib = input.buffer();
    let ob = output.buffer_mut();
    let min = region.min().map(|c| c as usize);
    let max = region.max().map(|c| c as usize);
    for k in min[2]..=max[2] {
        for j in min[1]..=max[1] {
            let row = nx * (j + ny * k);
            for i in min[0]..=max[0] {
                let index = row + i;
                let args = HeatStencil::gather(ib, index, sy, sz);
                ob[index] = stencil.apply(&args);
            }
        }
    }
}
