//! Cache oblivious space-time recursion.
//!
//! The interior over `[0, steps)` is one trapezoid with vertical sides.
//! A trapezoid wide enough on some axis is cut there into two trapezoids
//! whose shared side leans back by the stencil reach per step: the left
//! piece only needs its own values, the right piece only needs the left
//! piece.
//! When no axis is wide enough, time is halved instead.
//! Below the cutoff volume, or for a single step, the trapezoid is swept
//! directly with sides moving along their slopes.

use crate::domain::*;
use crate::error::*;
use crate::solver::Evaluator;
use crate::stencil::*;
use crate::util::*;
use nalgebra::matrix;

pub const DEFAULT_CUTOFF: i64 = 1000;

/// Axes tried for space cuts, z first.
const CUT_ORDER: [usize; 3] = [2, 1, 0];

/// A space-time region `[t0, t1)` whose spatial bounds move with time.
/// Bounds are half open: column 0 is the first cell, column 1 one past the
/// last cell, both taken at `t0`.
/// Slopes give the per step displacement of each side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Trapezoid {
    pub t0: i32,
    pub t1: i32,
    pub bounds: Bounds<3>,
    pub slopes: Bounds<3>,
}

impl Trapezoid {
    /// Vertical sided trapezoid over the interior.
    pub fn from_interior(interior: &AABB<3>, steps: usize) -> Self {
        let mut bounds = interior.bounds;
        bounds.set_column(1, &interior.max().add_scalar(1));
        Trapezoid {
            t0: 0,
            t1: steps as i32,
            bounds,
            slopes: Bounds::zeros(),
        }
    }

    #[inline]
    pub fn dt(&self) -> i32 {
        self.t1 - self.t0
    }

    /// Spatial volume at `t0`.
    pub fn base_volume(&self) -> i64 {
        (0..3)
            .map(|d| (self.bounds[(d, 1)] - self.bounds[(d, 0)]) as i64)
            .product()
    }

    /// Twice the mean width along `d` must leave room for two cones of
    /// slope `reach` over the whole time span.
    pub fn can_cut(&self, d: usize, reach: i32) -> bool {
        let dt = self.dt();
        2 * (self.bounds[(d, 1)] - self.bounds[(d, 0)])
            + (self.slopes[(d, 1)] - self.slopes[(d, 0)]) * dt
            >= 4 * reach * dt
    }

    /// Split along `d` at the midpoint of the mean extent. The new sides
    /// lean back by `reach` per step.
    pub fn cut(&self, d: usize, reach: i32) -> (Trapezoid, Trapezoid) {
        let dt = self.dt();
        let lean = 2 * reach + self.slopes[(d, 0)] + self.slopes[(d, 1)];
        let mid =
            (2 * (self.bounds[(d, 0)] + self.bounds[(d, 1)]) + lean * dt) / 4;

        let mut left = *self;
        left.bounds[(d, 1)] = mid;
        left.slopes[(d, 1)] = -reach;

        let mut right = *self;
        right.bounds[(d, 0)] = mid;
        right.slopes[(d, 0)] = -reach;

        (left, right)
    }

    /// Split time in half, the upper half starts where the sides have moved
    /// to.
    pub fn split_time(&self) -> (Trapezoid, Trapezoid) {
        let s = self.dt() / 2;

        let mut lower = *self;
        lower.t1 = self.t0 + s;

        let mut upper = *self;
        upper.t0 = self.t0 + s;
        upper.bounds += self.slopes * s;

        (lower, upper)
    }

    /// Cells updated at step `t`, as an inclusive box.
    pub fn region_at(&self, t: i32) -> AABB<3> {
        let shifted = self.bounds + self.slopes * (t - self.t0);
        AABB::new(shifted + matrix![0, -1; 0, -1; 0, -1])
    }
}

/// Counters from the most recent walk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct WalkStats {
    base_cases: usize,
    space_cuts: usize,
    time_cuts: usize,
    max_depth: usize,
}

#[derive(Clone, Debug)]
pub struct ObliviousSolver {
    cutoff: i64,
    cut_x: bool,
    reach: Coord<3>,
    stats: WalkStats,
    /// Every base case of the last walk as `(step, region)`.
    #[cfg(test)]
    swept: Vec<(i32, AABB<3>)>,
}

impl Default for ObliviousSolver {
    fn default() -> Self {
        ObliviousSolver {
            cutoff: DEFAULT_CUTOFF,
            cut_x: false,
            reach: HeatStencil::reach(),
            stats: WalkStats::default(),
            #[cfg(test)]
            swept: Vec::new(),
        }
    }
}

impl ObliviousSolver {
    pub fn new(cutoff: i64) -> Result<Self> {
        if cutoff <= 0 {
            return Err(StencilError::InvalidCutoff(cutoff));
        }
        Ok(ObliviousSolver {
            cutoff,
            ..Default::default()
        })
    }

    /// Also allow cuts along x, the fastest varying axis.
    /// Off by default, only z and y are cut.
    pub fn with_x_cut(mut self, cut_x: bool) -> Self {
        self.cut_x = cut_x;
        self
    }

    fn cuttable_axis(&self, trapezoid: &Trapezoid) -> Option<usize> {
        CUT_ORDER
            .into_iter()
            .filter(|d| *d != 0 || self.cut_x)
            .find(|d| trapezoid.can_cut(*d, self.reach[*d]))
    }

    fn walk(
        &mut self,
        stencil: &HeatStencil,
        grids: &mut GridPair,
        trapezoid: Trapezoid,
        depth: usize,
    ) {
        self.stats.max_depth = self.stats.max_depth.max(depth);
        let dt = trapezoid.dt();
        if dt <= 0 {
            return;
        }

        if dt == 1 || trapezoid.base_volume() < self.cutoff {
            self.stats.base_cases += 1;
            for t in trapezoid.t0..trapezoid.t1 {
                let region = trapezoid.region_at(t);
                #[cfg(test)]
                self.swept.push((t, region));
                let (input, output) = grids.step_buffers(t as usize);
                box_apply(stencil, input, output, &region);
            }
        } else if let Some(d) = self.cuttable_axis(&trapezoid) {
            self.stats.space_cuts += 1;
            let (left, right) = trapezoid.cut(d, self.reach[d]);
            self.walk(stencil, grids, left, depth + 1);
            self.walk(stencil, grids, right, depth + 1);
        } else {
            self.stats.time_cuts += 1;
            let (lower, upper) = trapezoid.split_time();
            self.walk(stencil, grids, lower, depth + 1);
            self.walk(stencil, grids, upper, depth + 1);
        }
    }
}

impl Evaluator for ObliviousSolver {
    fn name(&self) -> &'static str {
        "oblivious"
    }

    fn apply(&mut self, grids: &mut GridPair, steps: usize) -> Result<()> {
        profiling::scope!("oblivious_apply");
        self.stats = WalkStats::default();
        #[cfg(test)]
        self.swept.clear();
        if steps == 0 {
            return Ok(());
        }

        let stencil = HeatStencil::from_grid(grids.input());
        let root = Trapezoid::from_interior(&grids.input().interior(), steps);
        self.walk(&stencil, grids, root, 0);
        tracing::debug!(
            dims = ?grids.dims(),
            steps,
            cutoff = self.cutoff,
            cut_x = self.cut_x,
            stats = ?self.stats,
            "oblivious walk"
        );
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::solver::naive_apply;
    use std::collections::HashSet;

    // The base cases of a real walk cover every interior cell at every
    // step exactly once.
    #[test]
    fn exact_cover_test() {
        for (dims, steps, cutoff, cut_x) in [
            ([10, 10, 10], 4, 1, false),
            ([12, 9, 17], 7, 8, false),
            ([12, 9, 17], 7, 8, true),
            ([6, 6, 6], 5, 1, true),
        ] {
            let mut grid = Grid::new(dims[0], dims[1], dims[2]).unwrap();
            generate_ic(&mut grid, ICType::Rand { seed: Some(4) }, 100);
            let interior = grid.interior();
            let mut pair = GridPair::from_grid(grid);
            let mut solver =
                ObliviousSolver::new(cutoff).unwrap().with_x_cut(cut_x);
            solver.apply(&mut pair, steps).unwrap();
            assert!(solver.swept.len() >= solver.stats.base_cases);

            let mut seen = HashSet::new();
            for (t, region) in &solver.swept {
                assert!(*t >= 0 && (*t as usize) < steps);
                assert!(region.is_empty() || interior.contains_aabb(region));
                for c in region.coord_iter() {
                    assert!(seen.insert((c, *t)), "{c:?} twice at {t}");
                }
            }
            assert_eq!(seen.len(), interior.buffer_size() * steps);
        }
    }

    #[test]
    fn cut_test() {
        let t = Trapezoid {
            t0: 0,
            t1: 4,
            bounds: matrix![1, 9; 1, 9; 1, 17],
            slopes: Bounds::zeros(),
        };
        assert!(t.can_cut(2, 1));
        let (l, r) = t.cut(2, 1);
        // (2 * 18 + 2 * 4) / 4
        assert_eq!(l.bounds[(2, 1)], 11);
        assert_eq!(l.slopes[(2, 1)], -1);
        assert_eq!(r.bounds[(2, 0)], 11);
        assert_eq!(r.slopes[(2, 0)], -1);
        assert_eq!(l.region_at(3).bounds[(2, 1)], 7);
        assert_eq!(r.region_at(3).bounds[(2, 0)], 8);

        // 2 * 2 < 4 * 4
        let narrow = Trapezoid {
            t0: 0,
            t1: 4,
            bounds: matrix![1, 3; 1, 3; 1, 3],
            slopes: Bounds::zeros(),
        };
        assert!(!narrow.can_cut(0, 1));
        assert!(!narrow.can_cut(1, 1));
        assert!(!narrow.can_cut(2, 1));
        // A reach of two needs twice the width.
        assert!(t.can_cut(2, 2));
        assert!(!t.can_cut(0, 2));
        let (l, _) = t.cut(2, 2);
        assert_eq!(l.bounds[(2, 1)], 13);
        assert_eq!(l.slopes[(2, 1)], -2);
    }

    #[test]
    fn split_time_test() {
        let t = Trapezoid {
            t0: 2,
            t1: 7,
            bounds: matrix![1, 9; 4, 9; 1, 17],
            slopes: matrix![0, 0; -1, 1; 1, -1],
        };
        let (lower, upper) = t.split_time();
        assert_eq!((lower.t0, lower.t1), (2, 4));
        assert_eq!((upper.t0, upper.t1), (4, 7));
        assert_eq!(upper.bounds, matrix![1, 9; 2, 11; 3, 15]);
        assert_eq!(upper.region_at(4), t.region_at(4));
    }

    #[test]
    fn cutoff_changes_depth_only() {
        let mut grid = Grid::new(14, 12, 16).unwrap();
        generate_ic(&mut grid, ICType::Rand { seed: Some(11) }, 100);

        let steps = 6;
        let mut reference = GridPair::from_grid(grid.clone());
        naive_apply(&mut reference, steps);

        let mut depths = Vec::new();
        for cutoff in [1, 64, 500, 100_000] {
            let mut solver = ObliviousSolver::new(cutoff).unwrap();
            let mut pair = GridPair::from_grid(grid.clone());
            solver.apply(&mut pair, steps).unwrap();
            assert_eq!(pair.result(steps), reference.result(steps));
            depths.push(solver.stats.max_depth);
        }
        assert!(depths[0] > depths[3]);
        assert_eq!(depths[3], 0);
    }

    #[test]
    fn invalid_cutoff_test() {
        assert_eq!(
            ObliviousSolver::new(0).unwrap_err(),
            StencilError::InvalidCutoff(0)
        );
    }
}
