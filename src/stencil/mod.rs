mod heat;

pub use heat::*;
