pub mod args;
pub mod build_info;
pub mod check;
pub mod domain;
pub mod error;
pub mod solver;
pub mod stencil;
pub mod util;
