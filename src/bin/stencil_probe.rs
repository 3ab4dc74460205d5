use stencil_probe::args::Args;
use stencil_probe::build_info;
use stencil_probe::check::*;
use stencil_probe::domain::*;
use stencil_probe::error::*;
use stencil_probe::solver::*;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let steps = args.timesteps;
    let mut evaluator = args.evaluator()?;
    let initial = args.initial_grid()?;
    let interior_cells = initial.interior().buffer_size();

    let reference = if args.check {
        let mut reference = GridPair::from_grid(initial.clone());
        naive_apply(&mut reference, steps);
        Some(reference)
    } else {
        None
    };

    let mut best = f64::INFINITY;
    for trial in 0..args.trials {
        let mut grids = GridPair::from_grid(initial.clone());
        let start = Instant::now();
        {
            profiling::scope!("trial");
            evaluator.apply(&mut grids, steps)?;
        }
        let seconds = start.elapsed().as_secs_f64();
        profiling::finish_frame!();
        best = best.min(seconds);

        let updates = (interior_cells * steps) as f64;
        tracing::info!(
            trial,
            strategy = evaluator.name(),
            seconds,
            mlups = updates / seconds / 1e6,
            "trial done"
        );

        if let Some(reference) = &reference {
            let report = check_grids(
                reference.result(steps),
                grids.result(steps),
                CHECK_TOLERANCE,
            )?;
            println!("trial {}: {}", trial, report);
            if args.print_diffs {
                report.print_diffs();
            }
            if !report.is_match() {
                tracing::warn!(
                    trial,
                    different = report.different,
                    "result disagrees with naive"
                );
            }
        }
    }
    if args.trials > 0 {
        println!("best: {:.6} s", best);
    }
    Ok(())
}

fn main() -> ExitCode {
    setup_logging();
    let args = Args::cli_setup("stencil_probe");

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = {
        let server_addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        println!("View profiling data with:  puffin_viewer {server_addr}");
        let server = puffin_http::Server::new(&server_addr).ok();
        profiling::puffin::set_scopes_on(true);
        server
    };

    build_info::print_report("stencil_probe", &args.report_fields());
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
