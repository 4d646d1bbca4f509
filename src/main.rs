use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use wordeq::solver::{self, SolveOptions, SolveResult};
use wordeq::trace::{self, DEFAULT_TRACE_LIMIT};

/// Word equation solver (recompression)
#[derive(Parser, Debug)]
#[command(author, version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"), about, long_about = None)]
struct Cli {
    /// The letter set, e.g. "{A,B}"
    letters: String,

    /// The variable set, e.g. "{x,y}"
    variables: String,

    /// The equation to solve, e.g. "Ax = yB"
    equation: String,

    /// Maximum number of rounds (default: twice the equation's length)
    #[arg(short = 'c', long)]
    round_cap: Option<usize>,

    /// Maximum number of trace entries kept (0 = no trace)
    #[arg(short = 't', long, default_value_t = DEFAULT_TRACE_LIMIT)]
    trace_limit: usize,

    /// Write the trace as a Graphviz .dot file into this directory
    #[arg(short = 'd', long)]
    trace_dir: Option<PathBuf>,

    /// Also render the .dot file to .png with the `dot` tool
    #[arg(long, requires = "trace_dir")]
    png: bool,

    /// Enable debug logging (same as setting WORDEQ_DEBUG)
    #[arg(long)]
    debug: bool,
}

/// Entry point of the wordeq CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let debug_enabled = cli.debug || std::env::var("WORDEQ_DEBUG").is_ok();
    wordeq::log::init_logger(debug_enabled);

    if let Err(e) = try_main(&cli) {
        // Print the error message to stderr, with detailed formatting if it's a SolverError
        if let Some(solver_err) = e.downcast_ref::<solver::SolverError>() {
            eprintln!("Error: {}", solver_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Solve, print the verdict, and export the trace if asked to.
///
/// An unsolved equation is a normal outcome and still exits with success.
fn try_main(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = SolveOptions { round_cap: cli.round_cap, trace_limit: cli.trace_limit };
    let result = solver::solve_input(&cli.letters, &cli.variables, &cli.equation, &options)?;

    print_result(&result);

    if let Some(dir) = &cli.trace_dir {
        let dot_path = trace::write_dot(&result.trace, dir)?;
        eprintln!("Trace written to {}", dot_path.display());
        if result.trace.dropped() > 0 {
            eprintln!("({} trace entries dropped over the limit of {})", result.trace.dropped(), result.trace.limit());
        }
        if cli.png {
            let png_path = dot_path.with_extension("png");
            trace::render_png(&dot_path, &png_path)?;
            eprintln!("Rendered {}", png_path.display());
        }
    }

    Ok(())
}

fn print_result(result: &SolveResult) {
    if result.solved {
        for (var, value) in result.assignment_strings() {
            println!("{var} = {value}");
        }
        if result.assignment.is_empty() {
            println!("(no variables)");
        }
    } else {
        println!("not solved ({})", result.status);
    }

    eprintln!(
        "{} after {} of at most {} round(s) in {:.3}s",
        result.status,
        result.rounds,
        result.round_cap,
        result.elapsed.as_secs_f64()
    );
}
