//! Time skewing over fixed `tx x ty x tz` blocks.
//!
//! Each block runs every timestep before the next block starts.
//! At step `s` a block covers its home cells shifted down by `s` on every
//! axis where it has a lower neighbor block, the first block on an axis keeps
//! its lower side at the domain edge and the last keeps its upper side there.
//! The shifted regions of one step tile the interior exactly, and every value
//! a block reads was produced by a block with no larger index on any axis,
//! so any lexicographic block order is valid. We walk z, then y, then x.
//!
//! Sides move by the stencil reach per step, one cell for the heat stencil.
//! The first block on an axis shrinks by that much every step, which bounds
//! a single sweep to `min(tx, ty, tz) + 1` steps. Longer runs are split
//! into several sweeps.

use crate::domain::*;
use crate::error::*;
use crate::solver::Evaluator;
use crate::stencil::*;
use crate::util::*;
use nalgebra::vector;

#[derive(Copy, Clone, Debug)]
pub struct TimeSkewSolver {
    blocks: BlockSpec,
}

/// One block with the per step displacement of its sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SkewedBlock {
    pub home: AABB<3>,
    pub slopes: Bounds<3>,
}

impl SkewedBlock {
    /// Cells this block updates at step `s`.
    pub fn region_at(&self, s: usize) -> AABB<3> {
        self.home.add_bounds_diff(self.slopes * s as i32)
    }
}

impl TimeSkewSolver {
    pub fn new(blocks: BlockSpec) -> Result<Self> {
        blocks.validate()?;
        Ok(TimeSkewSolver { blocks })
    }

    /// Most steps one sweep can take.
    pub fn max_steps(&self) -> usize {
        let sizes = self.blocks.sizes();
        let reach = HeatStencil::reach();
        (0..3).map(|d| sizes[d] / reach[d]).min().unwrap_or(0) as usize + 1
    }

    /// Blocks in traversal order. Blocks on the upper edge of an axis are
    /// clipped to the interior when the block size does not divide it.
    pub fn skewed_blocks(&self, interior: &AABB<3>) -> Vec<SkewedBlock> {
        let sizes = self.blocks.sizes();
        let reach = HeatStencil::reach();
        let extent = interior.exclusive_bounds();
        let counts: Coord<3> =
            Coord::from_fn(|d, _| (extent[d] + sizes[d] - 1) / sizes[d]);

        let mut result =
            Vec::with_capacity(counts.iter().product::<i32>() as usize);
        for bk in 0..counts[2] {
            for bj in 0..counts[1] {
                for bi in 0..counts[0] {
                    let index = vector![bi, bj, bk];
                    let min = interior.min() + index.component_mul(&sizes);
                    let mut home =
                        AABB::from_mm(min, min + sizes.add_scalar(-1));
                    home.trim_to_aabb(interior);

                    let mut slopes = Bounds::zeros();
                    for d in 0..3 {
                        if index[d] > 0 {
                            slopes[(d, 0)] = -reach[d];
                        }
                        if index[d] < counts[d] - 1 {
                            slopes[(d, 1)] = -reach[d];
                        }
                    }
                    result.push(SkewedBlock { home, slopes });
                }
            }
        }
        result
    }

    /// Run any number of steps as a series of sweeps of at most
    /// `max_steps()` each. The result ends up in `grids.result(steps)`.
    pub fn apply_in_chunks(
        &mut self,
        grids: &mut GridPair,
        steps: usize,
    ) -> Result<()> {
        // Swapping moves the input's corner, so fac is read once.
        let stencil = HeatStencil::from_grid(grids.input());
        let max = self.max_steps();
        let mut remaining = steps;
        while remaining > 0 {
            let chunk = remaining.min(max);
            self.sweep_with(&stencil, grids, chunk)?;
            if chunk % 2 == 1 {
                grids.swap();
            }
            remaining -= chunk;
        }
        // Every chunk leaves its result in the input buffer.
        if steps % 2 == 1 {
            grids.swap();
        }
        Ok(())
    }

    /// One skewed pass over all blocks, at most `max_steps()` steps.
    pub fn sweep(&mut self, grids: &mut GridPair, steps: usize) -> Result<()> {
        let stencil = HeatStencil::from_grid(grids.input());
        self.sweep_with(&stencil, grids, steps)
    }

    fn sweep_with(
        &mut self,
        stencil: &HeatStencil,
        grids: &mut GridPair,
        steps: usize,
    ) -> Result<()> {
        profiling::scope!("time_skew_sweep");
        if steps > self.max_steps() {
            return Err(StencilError::TooManySteps {
                steps,
                max: self.max_steps(),
            });
        }
        if steps == 0 {
            return Ok(());
        }

        let blocks = self.skewed_blocks(&grids.input().interior());
        tracing::debug!(
            dims = ?grids.dims(),
            blocks = %self.blocks,
            block_count = blocks.len(),
            steps,
            "time skew sweep"
        );
        for block in &blocks {
            for s in 0..steps {
                let region = block.region_at(s);
                let (input, output) = grids.step_buffers(s);
                box_apply(stencil, input, output, &region);
            }
        }
        Ok(())
    }
}

impl Evaluator for TimeSkewSolver {
    fn name(&self) -> &'static str {
        "time_skew"
    }

    fn apply(&mut self, grids: &mut GridPair, steps: usize) -> Result<()> {
        self.apply_in_chunks(grids, steps)
    }
}
