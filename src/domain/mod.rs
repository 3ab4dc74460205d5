//! Grids and the ping-pong pair the evaluators work on.
//! A grid is a flat buffer with a ghost shell, a pair holds the
//! two buffers that alternate between read and write roles.

mod block;
mod grid;
mod grid_pair;
mod initial_conditions;

pub use block::*;
pub use grid::*;
pub use grid_pair::*;
pub use initial_conditions::*;
