use crate::error::*;
use crate::util::*;
use nalgebra::vector;

/// Tile extents per axis, constant for a run.
/// Each strategy reads them differently: the blocked sweep tiles x and y,
/// time skewing tiles all three axes, the circular queue only uses `ty`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockSpec {
    pub tx: usize,
    pub ty: usize,
    pub tz: usize,
}

impl BlockSpec {
    pub fn new(tx: usize, ty: usize, tz: usize) -> Self {
        BlockSpec { tx, ty, tz }
    }

    pub fn cube(size: usize) -> Self {
        Self::new(size, size, size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tx == 0 || self.ty == 0 || self.tz == 0 {
            return Err(StencilError::EmptyBlock {
                tx: self.tx,
                ty: self.ty,
                tz: self.tz,
            });
        }
        Ok(())
    }

    pub fn sizes(&self) -> Coord<3> {
        vector![self.tx as i32, self.ty as i32, self.tz as i32]
    }
}

impl std::fmt::Display for BlockSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.tx, self.ty, self.tz)
    }
}
