use std::time::Instant;

use log::info;

use tsp_bnb_core::{MatrixInput, Result, SolverOptions, logging, runner, write_reports};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    let input = MatrixInput::from_options(&options);
    info!("options: {options}");
    info!("input: {input}");

    let matrix = input.read()?;
    info!(
        "input: n={} finite_edges={} naive_tour={}",
        matrix.n(),
        matrix.finite_edges(),
        matrix.naive_tour_length()
    );
    log::debug!("input: matrix\n{matrix}");

    let plan = options.benchmark_plan()?;
    let reports = runner::run_benchmark(&matrix, &plan)?;
    write_reports(options.output_path(), &reports)?;

    info!(
        "output: reports={} time={:.2}s",
        reports.len(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
