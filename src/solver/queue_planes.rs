/// Rotating xy plane buffers for the circular queue sweep.
///
/// Level `l` in `1..steps` holds values of time `l` and owns three planes of
/// `ty + 2 * (steps - l)` rows by `nx` columns, one per z neighbor.
/// Levels `0` and `steps` are the input and output grids, they need no queue.
/// The three planes of every level are addressed through one shared
/// permutation, role `0` is plane `z - 1`, role `1` is `z`, role `2` is
/// `z + 1`.
#[derive(Clone, Debug)]
pub struct QueuePlanes {
    nx: usize,
    ty: usize,
    steps: usize,
    levels: Vec<[Vec<f64>; 3]>,
    rotation: [usize; 3],
}

pub type LevelPlanes = [Vec<f64>; 3];

impl QueuePlanes {
    pub fn new(nx: usize, ty: usize, steps: usize) -> Self {
        let levels = (1..steps)
            .map(|level| {
                let len = Self::rows_for(ty, steps, level) * nx;
                std::array::from_fn(|_| vec![0.0; len])
            })
            .collect();
        QueuePlanes {
            nx,
            ty,
            steps,
            levels,
            rotation: [0, 1, 2],
        }
    }

    fn rows_for(ty: usize, steps: usize, level: usize) -> usize {
        ty + 2 * (steps - level)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ty(&self) -> usize {
        self.ty
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// `(nx, ty, steps)` the buffers were sized for.
    pub fn shape(&self) -> [usize; 3] {
        [self.nx, self.ty, self.steps]
    }

    pub fn matches(&self, nx: usize, ty: usize, steps: usize) -> bool {
        self.shape() == [nx, ty, steps]
    }

    /// Number of levels with their own planes.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Rows held per plane at `level`, `1 <= level < steps`.
    pub fn level_rows(&self, level: usize) -> usize {
        self.levels[level - 1][0].len() / self.nx.max(1)
    }

    /// Total bytes held by all planes.
    pub fn byte_size(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|planes| planes.iter())
            .map(|plane| plane.len() * std::mem::size_of::<f64>())
            .sum()
    }

    /// Physical plane index behind each role.
    pub fn rotation(&self) -> [usize; 3] {
        self.rotation
    }

    /// Relabel after a z step: the old `z` plane becomes `z - 1`,
    /// the old `z + 1` becomes `z` and the oldest plane is reused for the
    /// next `z + 1`.
    pub fn rotate(&mut self) {
        let [r0, r1, r2] = self.rotation;
        self.rotation = [r1, r2, r0];
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = [0, 1, 2];
    }

    /// Planes of all levels, index `l - 1` for level `l`.
    pub fn levels_mut(&mut self) -> &mut [LevelPlanes] {
        &mut self.levels
    }
}
