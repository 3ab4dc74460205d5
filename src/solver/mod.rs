//! Traversal strategies for repeated 7-point heat updates.
//!
//! Every strategy produces the same values as [`NaiveSolver`], they only
//! differ in the order cells and timesteps are visited and in the
//! auxiliary buffers they keep.
//! After `steps` updates the result lives in `GridPair::result(steps)`:
//! the original input buffer for an even count, the output buffer otherwise.

pub mod blocked;
pub mod circ_queue;
pub mod naive;
pub mod oblivious;
pub mod queue_planes;
pub mod time_skew;

pub use blocked::*;
pub use circ_queue::*;
pub use naive::*;
pub use oblivious::*;
pub use queue_planes::*;
pub use time_skew::*;

use crate::domain::*;
use crate::error::*;
use clap::ValueEnum;

/// Common contract of all strategies.
pub trait Evaluator {
    fn name(&self) -> &'static str;

    /// Apply `steps` updates with the ping-pong convention of `GridPair`.
    /// Zero steps leaves both buffers untouched.
    fn apply(&mut self, grids: &mut GridPair, steps: usize) -> Result<()>;
}

#[derive(Copy, Clone, Debug, ValueEnum, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Three nested loops per timestep
    #[default]
    Naive,

    /// Rivera tiling of the xy plane, one timestep at a time
    Blocked,

    /// Recursive space-time trapezoids
    Oblivious,

    /// Fixed blocks advanced through all timesteps with sloped sides
    TimeSkew,

    /// Pipelined timesteps over rotating plane buffers
    CircQueue,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Naive,
        Strategy::Blocked,
        Strategy::Oblivious,
        Strategy::TimeSkew,
        Strategy::CircQueue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Blocked => "blocked",
            Strategy::Oblivious => "oblivious",
            Strategy::TimeSkew => "time_skew",
            Strategy::CircQueue => "circ_queue",
        }
    }

    /// Build the evaluator for one run over a grid of `dims`.
    pub fn evaluator(
        &self,
        blocks: BlockSpec,
        dims: [usize; 3],
        steps: usize,
    ) -> Result<Box<dyn Evaluator>> {
        Ok(match self {
            Strategy::Naive => Box::new(NaiveSolver),
            Strategy::Blocked => Box::new(BlockedSolver::new(blocks)?),
            Strategy::Oblivious => Box::new(ObliviousSolver::default()),
            Strategy::TimeSkew => Box::new(TimeSkewSolver::new(blocks)?),
            Strategy::CircQueue => {
                blocks.validate()?;
                Box::new(CircQueueSolver::for_run(dims[0], blocks.ty, steps))
            }
        })
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Apply `steps` updates with `strategy` and return the buffer holding the
/// result.
pub fn evaluate(
    strategy: Strategy,
    grids: &mut GridPair,
    blocks: BlockSpec,
    steps: usize,
) -> Result<&Grid> {
    let mut evaluator = strategy.evaluator(blocks, grids.dims(), steps)?;
    evaluator.apply(grids, steps)?;
    Ok(grids.result(steps))
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn zero_steps_is_identity() {
        let mut grid = Grid::new(7, 8, 9).unwrap();
        generate_ic(&mut grid, ICType::Rand { seed: Some(3) }, 50);
        let original = grid.clone();
        for strategy in Strategy::ALL {
            let mut pair = GridPair::from_grid(grid.clone());
            let blocks = BlockSpec::new(2, 3, 2);
            let result = evaluate(strategy, &mut pair, blocks, 0).unwrap();
            assert_eq!(*result, original, "{strategy}");
            assert_eq!(*pair.output(), original, "{strategy}");
        }
    }

    #[test]
    fn names_are_unique() {
        let names: std::collections::HashSet<_> =
            Strategy::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), Strategy::ALL.len());
    }
}
