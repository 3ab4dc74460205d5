//! Error types for stencil evaluation.
//!
//! Every variant is a precondition violation detected once at the entry of a
//! strategy. The sweeps themselves never check anything.

use thiserror::Error;

/// Result type for stencil operations.
pub type Result<T> = std::result::Result<T, StencilError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StencilError {
    /// Every axis needs a boundary layer on both sides and one interior
    /// point.
    #[error("grid {nx}x{ny}x{nz} is too small, every axis needs 3 points")]
    GridTooSmall { nx: usize, ny: usize, nz: usize },

    /// The two buffers of a pair must describe the same grid.
    #[error("grid dimensions disagree: {a:?} vs {b:?}")]
    DimensionMismatch { a: [usize; 3], b: [usize; 3] },

    #[error("block sizes must be positive, got {tx}x{ty}x{tz}")]
    EmptyBlock { tx: usize, ty: usize, tz: usize },

    /// Circular queue slabs must tile the interior y range exactly.
    #[error("interior y extent {interior} is not a multiple of {ty}")]
    SlabDivisibility { interior: usize, ty: usize },

    /// Time skewing can only run one more step than its smallest block
    /// side.
    #[error("time skewing allows at most {max} steps per sweep, got {steps}")]
    TooManySteps { steps: usize, max: usize },

    /// Queue planes are sized for one `(nx, ty, steps)` triple.
    #[error("queue planes built for {built:?} cannot serve {wanted:?}")]
    QueueMismatch { built: [usize; 3], wanted: [usize; 3] },

    #[error("cutoff volume must be positive, got {0}")]
    InvalidCutoff(i64),
}
