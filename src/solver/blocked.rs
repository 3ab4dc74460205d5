use crate::domain::*;
use crate::error::*;
use crate::solver::Evaluator;
use crate::stencil::*;
use crate::util::*;
use nalgebra::matrix;

/// Rivera blocking: each timestep walks `tx x ty` columns of the xy plane,
/// sweeping the full z range inside each column.
/// Edge tiles are clipped to the interior.
#[derive(Copy, Clone, Debug)]
pub struct BlockedSolver {
    blocks: BlockSpec,
}

impl BlockedSolver {
    pub fn new(blocks: BlockSpec) -> Result<Self> {
        blocks.validate()?;
        Ok(BlockedSolver { blocks })
    }

    /// Tiles of one timestep in traversal order, y tiles outside x tiles.
    pub fn tiles(&self, interior: &AABB<3>) -> Vec<AABB<3>> {
        let (tx, ty) = (self.blocks.tx as i32, self.blocks.ty as i32);
        let b = interior.bounds;
        let (z_min, z_max) = (b[(2, 0)], b[(2, 1)]);
        let mut result = Vec::new();
        for jj in (b[(1, 0)]..=b[(1, 1)]).step_by(ty as usize) {
            for ii in (b[(0, 0)]..=b[(0, 1)]).step_by(tx as usize) {
                let mut tile = AABB::new(matrix![
                    ii, ii + tx - 1;
                    jj, jj + ty - 1;
                    z_min, z_max
                ]);
                tile.trim_to_aabb(interior);
                result.push(tile);
            }
        }
        result
    }
}

impl Evaluator for BlockedSolver {
    fn name(&self) -> &'static str {
        "blocked"
    }

    fn apply(&mut self, grids: &mut GridPair, steps: usize) -> Result<()> {
        profiling::scope!("blocked_apply");
        let stencil = HeatStencil::from_grid(grids.input());
        let tiles = self.tiles(&grids.input().interior());
        tracing::debug!(
            dims = ?grids.dims(),
            blocks = %self.blocks,
            tiles = tiles.len(),
            steps,
            "blocked sweep"
        );
        for t in 0..steps {
            let (input, output) = grids.step_buffers(t);
            for tile in &tiles {
                box_apply(&stencil, input, output, tile);
            }
        }
        Ok(())
    }
}
