//! Cell by cell comparison of two grids.

use crate::domain::*;
use crate::error::*;
use crate::util::indexing::linear_to_coord;
use crate::util::*;
use rayon::prelude::*;

/// Absolute difference below which two values count as equal.
pub const CHECK_TOLERANCE: f64 = 0.001;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellDiff {
    pub coord: Coord<3>,
    pub expected: f64,
    pub actual: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckReport {
    pub same: usize,
    pub different: usize,
    /// Disagreeing cells in linear order.
    pub diffs: Vec<CellDiff>,
}

impl CheckReport {
    pub fn is_match(&self) -> bool {
        self.different == 0
    }

    fn merge(mut self, other: CheckReport) -> CheckReport {
        self.same += other.same;
        self.different += other.different;
        self.diffs.extend(other.diffs);
        self
    }

    pub fn print_diffs(&self) {
        for diff in &self.diffs {
            println!(
                "({}, {}, {}): expected {}, got {}",
                diff.coord[0],
                diff.coord[1],
                diff.coord[2],
                diff.expected,
                diff.actual
            );
        }
    }
}

impl std::fmt::Display for CheckReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "same: {}, different: {}", self.same, self.different)
    }
}

/// Compare every cell of two grids, ghost cells included.
pub fn check_grids(
    expected: &Grid,
    actual: &Grid,
    tolerance: f64,
) -> Result<CheckReport> {
    profiling::scope!("check_grids");
    if expected.dims() != actual.dims() {
        return Err(StencilError::DimensionMismatch {
            a: expected.dims(),
            b: actual.dims(),
        });
    }

    let dims = *expected.exclusive_bounds();
    let chunk_size = expected.nx() * expected.ny();
    let report = expected
        .buffer()
        .par_chunks(chunk_size)
        .zip(actual.buffer().par_chunks(chunk_size))
        .enumerate()
        .map(|(c, (e_chunk, a_chunk))| {
            let mut report = CheckReport::default();
            for (l, (e, a)) in e_chunk.iter().zip(a_chunk).enumerate() {
                if e == a || (e - a).abs() < tolerance {
                    report.same += 1;
                } else {
                    report.different += 1;
                    report.diffs.push(CellDiff {
                        coord: linear_to_coord(c * chunk_size + l, &dims),
                        expected: *e,
                        actual: *a,
                    });
                }
            }
            report
        })
        .reduce(CheckReport::default, CheckReport::merge);
    Ok(report)
}
