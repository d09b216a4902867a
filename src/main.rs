use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use row_block_matmul::{orchestrator, FailureMode, Group, RunConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "row-block-matmul")]
#[command(about = "Multiply two square matrices by row blocks across a process group")]
#[command(version)]
struct Cli {
    /// Left operand, matrix text file.
    matrix_a: PathBuf,
    /// Right operand, matrix text file.
    matrix_b: PathBuf,
    /// Timing log (truncated).
    log: PathBuf,
    /// Fail on unreadable or ill-shaped operands instead of running an empty problem.
    #[arg(long)]
    strict: bool,
    /// Print A, B and C after the run.
    #[arg(long)]
    print: bool,
    /// Append C to the timing log.
    #[arg(long)]
    dump_result: bool,
    /// Save C in the matrix text format.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Number of ranks in the in-process group.
    #[cfg(not(feature = "mpi"))]
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    processes: u16,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        let mode = if self.strict {
            FailureMode::Strict
        } else {
            FailureMode::Compat
        };
        RunConfig::new(&self.matrix_a, &self.matrix_b, &self.log)
            .with_mode(mode)
            .with_print_matrices(self.print)
            .with_dump_result(self.dump_result)
            .with_result_path(self.output.clone())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.run_config();

    #[cfg(feature = "mpi")]
    {
        run_mpi(&config)
    }
    #[cfg(not(feature = "mpi"))]
    {
        run_local(&config, usize::from(cli.processes))
    }
}

/// Any failing rank takes the whole group down.
fn run_rank<G: Group>(group: &G, config: &RunConfig) {
    if let Err(e) = orchestrator::run(group, config) {
        error!(rank = group.rank(), "{}", e);
        group.abort(1);
    }
}

#[cfg(not(feature = "mpi"))]
fn run_local(config: &RunConfig, processes: usize) -> ExitCode {
    row_block_matmul::LocalGroup::spawn(processes, |group| run_rank(&group, config));
    ExitCode::SUCCESS
}

#[cfg(feature = "mpi")]
fn run_mpi(config: &RunConfig) -> ExitCode {
    let Some(universe) = mpi::initialize() else {
        error!("failed to initialize MPI");
        return ExitCode::FAILURE;
    };
    let group = row_block_matmul::group::MpiGroup::new(universe.world());
    run_rank(&group, config);
    ExitCode::SUCCESS
}
