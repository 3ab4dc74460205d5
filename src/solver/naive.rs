use crate::domain::*;
use crate::error::*;
use crate::solver::Evaluator;
use crate::stencil::*;

/// Reference sweep, every interior cell once per timestep.
#[derive(Copy, Clone, Debug, Default)]
pub struct NaiveSolver;

pub fn naive_apply(grids: &mut GridPair, steps: usize) {
    profiling::scope!("naive_apply");
    let stencil = HeatStencil::from_grid(grids.input());
    let interior = grids.input().interior();
    for t in 0..steps {
        let (input, output) = grids.step_buffers(t);
        box_apply(&stencil, input, output, &interior);
    }
}

impl Evaluator for NaiveSolver {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn apply(&mut self, grids: &mut GridPair, steps: usize) -> Result<()> {
        tracing::debug!(dims = ?grids.dims(), steps, "naive sweep");
        naive_apply(grids, steps);
        Ok(())
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn impulse_one_step() {
        let mut grid = Grid::new(6, 6, 6).unwrap();
        generate_ic(&mut grid, ICType::Impulse { value: 100.0 }, 36);
        let mut pair = GridPair::from_grid(grid);
        NaiveSolver.apply(&mut pair, 1).unwrap();

        let result = pair.result(1);
        let neighbors = [
            (2, 3, 3),
            (4, 3, 3),
            (3, 2, 3),
            (3, 4, 3),
            (3, 3, 2),
            (3, 3, 4),
        ];
        for (i, j, k) in neighbors {
            assert_approx_eq!(f64, result.get(i, j, k), 100.0);
        }
        assert_approx_eq!(f64, result.get(3, 3, 3), -600.0);

        let interior = result.interior();
        for c in interior.coord_iter() {
            let (i, j, k) = (c[0] as usize, c[1] as usize, c[2] as usize);
            if (i, j, k) == (3, 3, 3) || neighbors.contains(&(i, j, k)) {
                continue;
            }
            assert_approx_eq!(f64, result.get(i, j, k), 0.0);
        }
    }

    #[test]
    fn spacing_factor_scales() {
        let mut grid = Grid::new(6, 6, 6).unwrap();
        generate_ic(&mut grid, ICType::Impulse { value: 100.0 }, 36);
        grid.set_fac(2.0);
        let mut pair = GridPair::from_grid(grid);
        NaiveSolver.apply(&mut pair, 1).unwrap();
        assert_approx_eq!(f64, pair.output().get(3, 3, 4), 25.0);
        assert_approx_eq!(f64, pair.output().get(3, 3, 3), -150.0);
    }

    #[test]
    fn parity_test() {
        let mut grid = Grid::new(5, 5, 5).unwrap();
        generate_ic(&mut grid, ICType::Impulse { value: 1.0 }, 25);
        let initial = grid.clone();

        let mut one = GridPair::from_grid(grid.clone());
        NaiveSolver.apply(&mut one, 1).unwrap();
        assert_eq!(*one.input(), initial);

        let mut two = GridPair::from_grid(grid);
        NaiveSolver.apply(&mut two, 2).unwrap();
        assert_eq!(two.output(), one.output());
        assert_ne!(*two.input(), initial);
    }
}
