use super::*;
use crate::error::*;

/// Two grids that trade read / write roles every timestep.
/// Step `t` reads `grids[t % 2]` and writes `grids[(t + 1) % 2]`,
/// so after `steps` updates the result sits in `grids[steps % 2]`.
#[derive(Clone, Debug)]
pub struct GridPair {
    grids: [Grid; 2],
}

impl GridPair {
    pub fn new(input: Grid, output: Grid) -> Result<Self> {
        if input.dims() != output.dims() {
            return Err(StencilError::DimensionMismatch {
                a: input.dims(),
                b: output.dims(),
            });
        }
        Ok(GridPair {
            grids: [input, output],
        })
    }

    /// Both buffers start with the same values, ghost cells included.
    pub fn from_grid(grid: Grid) -> Self {
        GridPair {
            grids: [grid.clone(), grid],
        }
    }

    pub fn dims(&self) -> [usize; 3] {
        self.grids[0].dims()
    }

    pub fn input(&self) -> &Grid {
        &self.grids[0]
    }

    pub fn output(&self) -> &Grid {
        &self.grids[1]
    }

    /// Read only input next to a writable output.
    pub fn input_output(&mut self) -> (&Grid, &mut Grid) {
        let [input, output] = &mut self.grids;
        (&*input, output)
    }

    /// The buffer holding the values of time level `t`.
    pub fn grid(&self, t: usize) -> &Grid {
        &self.grids[t % 2]
    }

    /// Where the result of a `steps` long run lives.
    pub fn result(&self, steps: usize) -> &Grid {
        self.grid(steps)
    }

    /// `(read, write)` buffers for step `t`.
    #[inline]
    pub fn step_buffers(&mut self, t: usize) -> (&Grid, &mut Grid) {
        let [a, b] = &mut self.grids;
        if t % 2 == 0 {
            (&*a, b)
        } else {
            (&*b, a)
        }
    }

    /// Exchange the roles of the two buffers.
    pub fn swap(&mut self) {
        self.grids.swap(0, 1);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn step_buffers_test() {
        let input = Grid::filled(3, 3, 3, 1.0).unwrap();
        let output = Grid::filled(3, 3, 3, 2.0).unwrap();
        let mut pair = GridPair::new(input, output).unwrap();

        {
            let (read, write) = pair.step_buffers(0);
            assert_eq!(read.get(1, 1, 1), 1.0);
            write.set(1, 1, 1, 5.0);
        }
        assert_eq!(pair.output().get(1, 1, 1), 5.0);

        {
            let (read, write) = pair.step_buffers(1);
            assert_eq!(read.get(1, 1, 1), 5.0);
            write.set(1, 1, 1, 6.0);
        }
        assert_eq!(pair.input().get(1, 1, 1), 6.0);
        assert_eq!(pair.result(2).get(1, 1, 1), 6.0);
        assert_eq!(pair.result(1).get(1, 1, 1), 5.0);
    }

    #[test]
    fn swap_test() {
        let input = Grid::filled(3, 3, 3, 1.0).unwrap();
        let output = Grid::filled(3, 3, 3, 2.0).unwrap();
        let mut pair = GridPair::new(input, output).unwrap();
        let a_ptr = pair.input().buffer().as_ptr();
        let b_ptr = pair.output().buffer().as_ptr();
        pair.swap();
        assert_eq!(pair.input().buffer().as_ptr(), b_ptr);
        assert_eq!(pair.output().buffer().as_ptr(), a_ptr);
    }

    #[test]
    fn mismatch_test() {
        let input = Grid::new(3, 3, 3).unwrap();
        let output = Grid::new(3, 4, 3).unwrap();
        assert!(GridPair::new(input, output).is_err());
    }
}
