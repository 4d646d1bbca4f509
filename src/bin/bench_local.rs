//! `bench_local.rs`: quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing for a handful of equations on *your* machine.
//! - Runs each equation several times and reports the median.
//! - Shows the verdict and round count next to each timing, so a heuristic change that trades
//!   speed for verdicts is visible at a glance.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:                `cargo run --bin bench_local --release`
//! - Multiple repeats:               `cargo run --bin bench_local --release -- -r 5`
//! - Print the assignments:          `cargo run --bin bench_local --release -- -p`
//!
//! NOTES
//! -----
//! - Use the same machine and `--release` for more comparable numbers.
//! - Equations live in `get_cases()` below.
//! - One warm-up run per equation is done (not included in timing).

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;
use wordeq::equation::Equation;
use wordeq::solver::{self, SolveOptions, SolveResult};

/// Simple local benchmark runner for the recompression solver.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of repeats per equation (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 3)]
    num_repeats: usize,

    /// Override every equation's round cap
    #[arg(short = 'c', long)]
    round_cap: Option<usize>,

    /// Print the assignment of the last run
    #[arg(short = 'p', long = "print")]
    print: bool,
}

/// Shorthand equations: upper case = letters, lower case = variables.
fn get_cases() -> Vec<&'static str> {
    vec![
        "Ax = yB",
        "ABxy = yBAx",
        "AAAAxBB = yBBB",
        "ABABx = xBABA",
        "xAByBA = ABxAyB",
        "AxBxC = yCz",
        "xyzABC = CBAzyx",
        "AAAAAAAAAAAAAAAAx = xAAAAAAAAAAAAAAAA",
    ]
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

const MAX_EQUATION_LEN: usize = 40;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    wordeq::log::init_logger(false);

    // the trace is I/O-shaped work; keep it out of the timings
    let options = SolveOptions { round_cap: cli.round_cap, trace_limit: 0 };
    let mut summary: Vec<(String, f64, SolveResult)> = Vec::new();

    for (idx, case) in get_cases().into_iter().enumerate() {
        eprintln!("\n[{:02}] {}", idx + 1, case);
        let equation: Equation = case.parse()?;

        // One *warm-up* execution per equation; its timing is ignored.
        let mut last = solver::solve_with_options(&equation, &options)?;

        let mut times = Vec::with_capacity(cli.num_repeats);
        for rep in 0..cli.num_repeats {
            let t_solve = Instant::now();
            let result = solver::solve_with_options(black_box(&equation), &options)?;
            let solve_secs = t_solve.elapsed().as_secs_f64();

            times.push(solve_secs);
            eprintln!("  run {:>2}/{:>2}: {:.6}s ({})", rep + 1, cli.num_repeats, solve_secs, result.status);
            last = result;
        }

        if cli.print {
            for (var, value) in last.assignment_strings() {
                println!("  {var} = {value}");
            }
        }

        summary.push((case.to_string(), median(times), last));
    }

    eprintln!("\n==== Summary ====");
    eprintln!(
        "{:<MAX_EQUATION_LEN$} | {:>12} | {:>12} | {:>9}",
        "equation", "median (s)", "status", "rounds"
    );
    eprintln!("{:-<MAX_EQUATION_LEN$}-+-{:-<12}-+-{:-<12}-+-{:-<9}", "", "", "", "");
    for (case, med, result) in &summary {
        let display = if case.len() > MAX_EQUATION_LEN {
            format!("{}…", case.chars().take(MAX_EQUATION_LEN - 1).collect::<String>())
        } else {
            case.clone()
        };
        let rounds = format!("{}/{}", result.rounds, result.round_cap);
        eprintln!("{display:<MAX_EQUATION_LEN$} | {med:>12.6} | {:>12} | {rounds:>9}", result.status.as_str());
    }

    Ok(())
}
