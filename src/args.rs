use crate::build_info;
use crate::domain::*;
use crate::error::*;
use crate::solver::*;
use clap::Parser;

/// 7-point heat stencil traversal benchmark
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Grid points along x, boundary included.
    pub nx: usize,

    /// Grid points along y, boundary included.
    pub ny: usize,

    /// Grid points along z, boundary included.
    pub nz: usize,

    /// Block size along x.
    pub tx: usize,

    /// Block size along y, also the circular queue slab height.
    pub ty: usize,

    /// Block size along z.
    pub tz: usize,

    /// Timesteps per trial.
    pub timesteps: usize,

    /// Traversal strategy.
    #[arg(short, long, default_value = "naive")]
    pub strategy: Strategy,

    /// How many times to repeat the run.
    #[arg(long, default_value = "1")]
    pub trials: usize,

    /// Initial condition.
    #[arg(long, default_value = "constant")]
    pub ic: ClapICType,

    /// Seed for random initial conditions, entropy when unset.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Value of constant and impulse initial conditions.
    #[arg(long, default_value = "1.0")]
    pub value: f64,

    /// Chunk size to use for parallel initialization.
    #[arg(short, long, default_value = "1000")]
    pub chunk_size: usize,

    /// Base case volume of the cache oblivious recursion.
    #[arg(long, default_value_t = DEFAULT_CUTOFF)]
    pub cutoff: i64,

    /// Let the cache oblivious recursion cut along x as well.
    #[arg(long)]
    pub cut_x: bool,

    /// Compare every trial against a naive run.
    #[arg(long)]
    pub check: bool,

    /// With --check, print every disagreeing cell.
    #[arg(long)]
    pub print_diffs: bool,

    /// The number of threads to use.
    #[arg(short, long, default_value = "8")]
    pub threads: usize,

    /// Print build info and exit.
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn cli_setup(name: &str) -> Self {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name, &[]);
            std::process::exit(0);
        }

        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .thread_name(|i| format!("rayon_thread_{}", i))
            .build_global()
        {
            tracing::warn!("thread pool already set up: {e}");
        }

        args
    }

    pub fn ic_type(&self) -> ICType {
        match self.ic {
            ClapICType::Constant => ICType::Constant { value: self.value },
            ClapICType::Rand => ICType::Rand { seed: self.seed },
            ClapICType::Impulse => ICType::Impulse { value: self.value },
        }
    }

    pub fn blocks(&self) -> BlockSpec {
        BlockSpec::new(self.tx, self.ty, self.tz)
    }

    /// A fresh grid filled with the requested initial condition.
    pub fn initial_grid(&self) -> Result<Grid> {
        let mut grid = Grid::new(self.nx, self.ny, self.nz)?;
        generate_ic(&mut grid, self.ic_type(), self.chunk_size);
        Ok(grid)
    }

    /// The evaluator for one trial, with the command line tuning applied.
    pub fn evaluator(&self) -> Result<Box<dyn Evaluator>> {
        let blocks = self.blocks();
        match self.strategy {
            Strategy::Oblivious => Ok(Box::new(
                ObliviousSolver::new(self.cutoff)?.with_x_cut(self.cut_x),
            )),
            strategy => strategy.evaluator(
                blocks,
                [self.nx, self.ny, self.nz],
                self.timesteps,
            ),
        }
    }

    pub fn report_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("strategy", self.strategy.to_string()),
            ("dims", format!("{}x{}x{}", self.nx, self.ny, self.nz)),
            ("blocks", self.blocks().to_string()),
            ("timesteps", self.timesteps.to_string()),
            ("trials", self.trials.to_string()),
            ("threads", self.threads.to_string()),
        ]
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn parse_test() {
        let args = Args::parse_from([
            "stencil_probe",
            "10",
            "12",
            "14",
            "2",
            "5",
            "4",
            "3",
            "--strategy",
            "circ-queue",
            "--ic",
            "rand",
            "--seed",
            "9",
        ]);
        assert_eq!(args.nx, 10);
        assert_eq!(args.ny, 12);
        assert_eq!(args.blocks(), BlockSpec::new(2, 5, 4));
        assert_eq!(args.timesteps, 3);
        assert_eq!(args.strategy, Strategy::CircQueue);
        assert_eq!(args.ic_type(), ICType::Rand { seed: Some(9) });
        assert_eq!(args.cutoff, DEFAULT_CUTOFF);
        assert!(!args.check);
    }

    #[test]
    fn oblivious_tuning_test() {
        let args = Args::parse_from([
            "stencil_probe",
            "8",
            "8",
            "8",
            "2",
            "2",
            "2",
            "4",
            "-s",
            "oblivious",
            "--cutoff=-5",
        ]);
        assert_eq!(
            args.evaluator().err(),
            Some(StencilError::InvalidCutoff(-5))
        );
    }

    #[test]
    fn initial_grid_test() {
        let args = Args::parse_from([
            "stencil_probe",
            "6",
            "6",
            "6",
            "2",
            "2",
            "2",
            "1",
            "--ic",
            "impulse",
            "--value", "100",
        ]);
        let grid = args.initial_grid().unwrap();
        assert_eq!(grid.get(3, 3, 3), 100.0);
        assert_eq!(grid.fac(), 1.0);
    }
}
