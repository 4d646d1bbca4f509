//! The recompression driver for word equations.
//!
//! # Error Handling
//!
//! The solver uses [`SolverError`] with four variants:
//!
//! - S001: `ParseFailure` (Input parsing failed (wraps [`ParseError`]))
//! - S002: `SelfPair` (Pair compression of a letter with itself)
//! - S003: `MissingAssignment` (Variable without sigma entries)
//! - S004: `ForeignSymbol` (Symbol outside the declared alphabet)
//!
//! Each error has a `code()`, optional `help()`, and `display_detailed()` method. An equation
//! without a solution is *not* an error: it comes back with `solved == false`.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use wordeq::equation::Equation;
//! use wordeq::solver;
//!
//! let equation: Equation = "Ax = yB".parse()?;
//! let result = solver::solve(&equation, None)?;
//!
//! assert!(result.solved);
//! for (var, value) in result.assignment_strings() {
//!     println!("{var} = {value}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Handling Errors with Detailed Messages
//!
//! ```
//! use wordeq::solver::{self, SolveOptions};
//!
//! match solver::solve_input("{A,B}", "{x}", "Ax = Cx", &SolveOptions::default()) {
//!     Ok(result) => println!("solved: {}", result.solved),
//!     Err(e) => {
//!         // Error code: S001, caused by E009
//!         eprintln!("{}", e.display_detailed());
//!     }
//! }
//! ```
//!
//! ## Checking Solve Status
//!
//! ```
//! use wordeq::equation::Equation;
//! use wordeq::solver::{self, SolveStatus};
//!
//! let equation: Equation = "x = Ax".parse()?;
//! let result = solver::solve(&equation, None)?;
//!
//! match result.status {
//!     SolveStatus::Solved => println!("found {:?}", result.assignment_strings()),
//!     SolveStatus::Contradicted => println!("no solution"),
//!     SolveStatus::Exhausted => println!("gave up after {} rounds", result.rounds),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::compression::{assumed_letter, block_compress, pair_compress, try_pop, Boundary};
use crate::element::{word_to_string, Symbol, Variable};
use crate::equation::{Assignment, Equation};
use crate::errors::ParseError;
use crate::heuristics::{has_side_contradiction, shorten, side_letters, trivial_solution, SideLetters};
use crate::parser::{parse_equation, Alphabet};
use crate::state::SolverState;
use crate::trace::{Trace, DEFAULT_TRACE_LIMIT};
use instant::Instant;
use log::{debug, info, trace, warn};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::Duration;

// Rounds allowed per symbol of the input equation when no cap is given
const ROUNDS_PER_SYMBOL: usize = 2;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The equation reduced to one with a known solution.
    Solved,

    /// The equation reduced to one that provably has no solution.
    Contradicted,

    /// The round cap was reached first. Says nothing about satisfiability.
    Exhausted,
}

impl SolveStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Solved => "solved",
            SolveStatus::Contradicted => "contradicted",
            SolveStatus::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOptions {
    /// Maximum number of rounds; `None` uses [`default_round_cap`].
    pub round_cap: Option<usize>,
    /// Maximum number of trace entries; 0 disables the trace.
    pub trace_limit: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions { round_cap: None, trace_limit: DEFAULT_TRACE_LIMIT }
    }
}

/// Finished solver run (solved or not).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// True iff `status == SolveStatus::Solved`.
    pub solved: bool,
    pub status: SolveStatus,
    /// One entry per variable of the input. When not solved, this holds whatever was popped so far.
    pub assignment: Assignment,
    pub trace: Trace,
    pub rounds: usize,
    pub round_cap: usize,
    /// The equation the run stopped on.
    pub final_equation: Equation,
    pub elapsed: Duration,
}

impl SolveResult {
    /// Whether substituting the assignment into `equation` gives the same word on both sides.
    #[must_use]
    pub fn is_solution_of(&self, equation: &Equation) -> bool {
        equation.substitute(&self.assignment).is_some_and(|(left, right)| left == right)
    }

    /// Variable names mapped to their values as plain strings.
    #[must_use]
    pub fn assignment_strings(&self) -> BTreeMap<String, String> {
        self.assignment
            .iter()
            .map(|(var, value)| (var.name().to_string(), word_to_string(value)))
            .collect()
    }
}

/// Unified error type for the solver pipeline.
///
/// Only malformed input and broken internal contracts end up here; an unsatisfiable equation is a
/// normal [`SolveResult`].
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Failure while parsing the alphabet or the equation.
    ///
    /// These originate from the parser (`ParseError`), which we box to keep the
    /// error type size stable.
    #[error("parse failure: {0}")]
    ParseFailure(#[from] Box<ParseError>),

    /// Pair compression was asked to merge a letter with itself.
    #[error("pair compression of {letter} with itself")]
    SelfPair { letter: String },

    /// A variable of the current equation has no sigma entry.
    #[error("variable '{variable}' has no assignment entry")]
    MissingAssignment { variable: String },

    /// A symbol the solver cannot accept in this position.
    #[error("foreign symbol {symbol}: {context}")]
    ForeignSymbol { symbol: String, context: String },
}

impl SolverError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::ParseFailure(_) => "S001",
            SolverError::SelfPair { .. } => "S002",
            SolverError::MissingAssignment { .. } => "S003",
            SolverError::ForeignSymbol { .. } => "S004",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            SolverError::ParseFailure(_) => "Input parsing failed",
            SolverError::SelfPair { .. } => "Pair compression of a letter with itself",
            SolverError::MissingAssignment { .. } => "Variable without sigma entries",
            SolverError::ForeignSymbol { .. } => "Symbol outside the declared alphabet",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            SolverError::ParseFailure(_) => "The alphabet or the equation could not be parsed. This wraps an underlying ParseError (see Parse Errors section for specific error codes).",
            SolverError::SelfPair { .. } => "Runs of a single letter are handled by block compression. Asking pair compression to merge a letter with itself indicates a bug in the solver logic.",
            SolverError::MissingAssignment { .. } => "Every variable of the input equation gets sigma entries before the first round. A variable without them indicates a bug in the solver logic.",
            SolverError::ForeignSymbol { .. } => "The equation passed to the solver used a symbol the alphabet does not declare, or contained a letter that only compression may create.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::SelfPair { .. } | SolverError::MissingAssignment { .. } => {
                Some("This is an internal error. Please report the equation that triggered it.")
            }
            SolverError::ForeignSymbol { .. } => {
                Some("Build equations with the parser, declaring every letter and variable they use")
            }
            SolverError::ParseFailure(_) => None, // ParseError has its own help
        }
    }

    /// True for errors that indicate a bug or misuse rather than malformed user input.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, SolverError::ParseFailure(_))
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            SolverError::ParseFailure(pe) => {
                // delegate to ParseError's detailed display
                format!("{}\n  caused by: {}", self.code(), pe.display_detailed())
            }
            _ => crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help()),
        }
    }
}

/// Round cap used when [`SolveOptions::round_cap`] is `None`: twice the input's total length.
#[must_use]
pub fn default_round_cap(equation: &Equation) -> usize {
    equation.len() * ROUNDS_PER_SYMBOL
}

/// Where a rewrite left the run.
enum Progress {
    Active(Equation),
    Finished(Equation, SolveStatus),
}

/// Settle `$equation`; leave the enclosing function with the verdict if that finished the run.
macro_rules! settle_or_finish {
    ($state:expr, $equation:expr) => {
        match settle($state, &$equation)? {
            Progress::Active(next) => next,
            finished @ Progress::Finished(..) => return Ok(finished),
        }
    };
}

/// Shorten, then look for a verdict.
///
/// Order matters: the empty-solution check and trivial resolution may solve an equation whose
/// ends also look contradictory to a cruder check, so they run first.
fn settle(state: &mut SolverState, equation: &Equation) -> Result<Progress, SolverError> {
    let shortened = shorten(equation);
    state.trace.record(&shortened, "shorten");

    if shortened.has_empty_solution() {
        trace!("remaining variables take the empty word in {shortened}");
        state.trace.record(&Equation::empty(), "erase variables");
        return Ok(Progress::Finished(Equation::empty(), SolveStatus::Solved));
    }

    if let Some((var, value)) = trivial_solution(&shortened) {
        trace!("{var} resolves to {}", word_to_string(&value));
        state.record_resolution(&var, &value)?;
        state.trace.record(&Equation::empty(), format!("resolve {var}"));
        return Ok(Progress::Finished(Equation::empty(), SolveStatus::Solved));
    }

    if has_side_contradiction(&shortened) {
        return Ok(Progress::Finished(shortened, SolveStatus::Contradicted));
    }

    Ok(Progress::Active(shortened))
}

/// Letters a pop on `boundary` may take: a left pop puts the letter in front of the variable, so it
/// must be fit to be the right member of a pair, and vice versa.
fn eligible_for(letters: &SideLetters, boundary: Boundary) -> &[Symbol] {
    match boundary {
        Boundary::Left => &letters.right,
        Boundary::Right => &letters.left,
    }
}

/// Pop phase. Forced pops first, then one fallback pop per slot that was not tried.
fn pop_variables(state: &mut SolverState, equation: Equation, letters: &SideLetters) -> Result<Progress, SolverError> {
    let mut equation = equation;
    let variables = equation.used_variables();
    let mut attempted: HashSet<(Variable, Boundary)> = HashSet::new();

    for var in &variables {
        for boundary in Boundary::BOTH {
            if !equation.contains_variable(var) {
                break;
            }
            let Some(letter) = assumed_letter(&equation, var, boundary, eligible_for(letters, boundary)) else {
                continue;
            };
            attempted.insert((var.clone(), boundary));
            if let Some(next) = try_pop(state, &equation, var, &letter, boundary)? {
                equation = settle_or_finish!(state, next);
            }
        }
    }

    for var in &variables {
        for boundary in Boundary::BOTH {
            if attempted.contains(&(var.clone(), boundary)) || !equation.contains_variable(var) {
                continue;
            }
            let Some(letter) = eligible_for(letters, boundary).first().cloned() else {
                continue;
            };
            if let Some(next) = try_pop(state, &equation, var, &letter, boundary)? {
                equation = settle_or_finish!(state, next);
            }
        }
    }

    Ok(Progress::Active(equation))
}

/// One round: settle, block compression, pops, pair compression.
fn run_round(state: &mut SolverState, equation: Equation) -> Result<Progress, SolverError> {
    let mut equation = settle_or_finish!(state, equation);

    for a in equation.used_constants() {
        if let Some(next) = block_compress(&equation, &a, &mut state.replacements) {
            trace!("block {a}: {next}");
            state.trace.record(&next, format!("block {a}"));
            equation = settle_or_finish!(state, next);
        }
    }

    let letters = side_letters(&equation);
    equation = match pop_variables(state, equation, &letters)? {
        Progress::Active(next) => next,
        finished @ Progress::Finished(..) => return Ok(finished),
    };

    for a in &letters.left {
        for b in &letters.right {
            if a == b {
                continue;
            }
            if let Some(next) = pair_compress(&equation, a, b, &mut state.replacements)? {
                trace!("pair {a} {b}: {next}");
                state.trace.record(&next, format!("pair {a} {b}"));
                equation = settle_or_finish!(state, next);
            }
        }
    }

    Ok(Progress::Active(equation))
}

/// Reject anything only compression may create.
fn check_input(equation: &Equation) -> Result<(), SolverError> {
    match equation.symbols().find(|s| matches!(s, Symbol::Generated(_))) {
        Some(symbol) => Err(SolverError::ForeignSymbol {
            symbol: symbol.to_string(),
            context: "generated letters cannot appear in an input equation".to_string(),
        }),
        None => Ok(()),
    }
}

/// Solve `equation` with at most `round_cap` rounds (default: [`default_round_cap`]).
///
/// # Errors
/// See [`solve_with_options`].
pub fn solve(equation: &Equation, round_cap: Option<usize>) -> Result<SolveResult, SolverError> {
    solve_with_options(equation, &SolveOptions { round_cap, ..SolveOptions::default() })
}

/// Run the recompression loop on `equation`.
///
/// The loop stops once both sides are at most one symbol long, a verdict is reached, or the round
/// cap is hit. Whatever the outcome, every variable of `equation` gets an entry in the assignment.
///
/// # Errors
/// Returns a [`SolverError`] if:
/// - the equation contains a generated letter (`ForeignSymbol`),
/// - an internal contract breaks (`SelfPair`, `MissingAssignment`).
pub fn solve_with_options(equation: &Equation, options: &SolveOptions) -> Result<SolveResult, SolverError> {
    check_input(equation)?;

    let start = Instant::now();
    let round_cap = options.round_cap.unwrap_or_else(|| default_round_cap(equation));
    let variables = equation.used_variables();
    info!("solving {equation} (round cap {round_cap})");

    let mut state = SolverState::new(&variables, options.trace_limit);
    state.trace.record(equation, "input");

    let mut rounds = 0;
    let mut progress = settle(&mut state, equation)?;
    while let Progress::Active(current) = &progress {
        if (current.left().len() <= 1 && current.right().len() <= 1) || rounds >= round_cap {
            break;
        }
        state.check_tracked(current)?;
        debug!("round {}: {current}", rounds + 1);
        progress = run_round(&mut state, current.clone())?;
        rounds += 1;
    }

    let (final_equation, status) = match progress {
        Progress::Active(current) => {
            if rounds >= round_cap {
                warn!("round cap {round_cap} reached on {current}");
            }
            (current, SolveStatus::Exhausted)
        }
        Progress::Finished(current, status) => (current, status),
    };

    let assignment = state.assignment_for(&variables)?;
    let elapsed = start.elapsed();
    info!("{status} after {rounds} round(s) in {elapsed:?}");

    Ok(SolveResult {
        solved: status == SolveStatus::Solved,
        status,
        assignment,
        trace: state.into_trace(),
        rounds,
        round_cap,
        final_equation,
        elapsed,
    })
}

/// Solve an equation that must only use symbols `alphabet` declares.
///
/// # Errors
/// [`SolverError::ForeignSymbol`] for an undeclared symbol, otherwise as [`solve_with_options`].
pub fn solve_declared(alphabet: &Alphabet, equation: &Equation, options: &SolveOptions) -> Result<SolveResult, SolverError> {
    if let Some(symbol) = equation.symbols().find(|s| !alphabet.contains(s)) {
        return Err(SolverError::ForeignSymbol {
            symbol: symbol.to_string(),
            context: "not declared in the alphabet".to_string(),
        });
    }
    solve_with_options(equation, options)
}

/// Parse the letter set, the variable set and the equation, then solve.
///
/// ```
/// use wordeq::solver::{solve_input, SolveOptions};
///
/// let result = solve_input("{A,B}", "{x,y}", "Ax = yB", &SolveOptions::default())?;
/// assert_eq!(result.assignment_strings()["x"], "B");
/// # Ok::<(), wordeq::solver::SolverError>(())
/// ```
///
/// # Errors
/// [`SolverError::ParseFailure`] if any input is malformed, otherwise as [`solve_declared`].
pub fn solve_input(letters: &str, variables: &str, equation: &str, options: &SolveOptions) -> Result<SolveResult, SolverError> {
    let alphabet = Alphabet::parse(letters, variables)?;
    let equation = parse_equation(equation, &alphabet)?;
    debug!("parsed {equation}");
    solve_declared(&alphabet, &equation, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::GeneratedLetter;

    fn eq(s: &str) -> Equation {
        s.parse().unwrap()
    }

    fn solved(s: &str) -> BTreeMap<String, String> {
        let result = solve(&eq(s), None).unwrap();
        assert!(result.solved, "{s} should be solved, got {:?}", result.status);
        assert!(result.is_solution_of(&eq(s)));
        result.assignment_strings()
    }

    fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
        items.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_solve_basic_scenarios() {
        assert_eq!(solved("x = y"), pairs(&[("x", ""), ("y", "")]));
        assert_eq!(solved("A = A"), pairs(&[]));
        assert_eq!(solved("x = A"), pairs(&[("x", "A")]));
        assert_eq!(solved("Ax = AB"), pairs(&[("x", "B")]));
    }

    #[test]
    fn test_solve_crossing_pop() {
        assert_eq!(solved("Ax = yB"), pairs(&[("x", "B"), ("y", "A")]));
    }

    #[test]
    fn test_solve_needs_a_round() {
        let result = solve(&eq("ABxy = yBAx"), None).unwrap();
        assert!(result.solved);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.assignment_strings(), pairs(&[("x", ""), ("y", "A")]));
    }

    #[test]
    fn test_solve_contradictions() {
        for s in ["A = B", "x = Ax", "AxB = AyC"] {
            let result = solve(&eq(s), None).unwrap();
            assert!(!result.solved, "{s}");
            assert_eq!(result.status, SolveStatus::Contradicted, "{s}");
        }
    }

    #[test]
    fn test_solve_empty_equation() {
        let result = solve(&Equation::empty(), None).unwrap();
        assert!(result.solved);
        assert!(result.assignment.is_empty());
        assert_eq!(result.rounds, 0);
        assert_eq!(result.round_cap, 0);
    }

    #[test]
    fn test_zero_round_cap_still_settles() {
        let result = solve(&eq("Ax = AB"), Some(0)).unwrap();
        assert!(result.solved);

        let result = solve(&eq("ABxy = yBAx"), Some(0)).unwrap();
        assert_eq!(result.status, SolveStatus::Exhausted);
        assert_eq!(result.rounds, 0);
        assert_eq!(result.assignment.len(), 2);
    }

    #[test]
    fn test_default_round_cap() {
        assert_eq!(default_round_cap(&eq("Ax = yB")), 8);
        let result = solve(&eq("Ax = yB"), None).unwrap();
        assert_eq!(result.round_cap, 8);
    }

    #[test]
    fn test_trace_limit_option() {
        let options = SolveOptions { round_cap: None, trace_limit: 0 };
        let result = solve_with_options(&eq("Ax = yB"), &options).unwrap();
        assert!(result.trace.is_empty());

        let result = solve_with_options(&eq("Ax = yB"), &SolveOptions::default()).unwrap();
        assert_eq!(result.trace.entries()[0].label, "input");
        assert!(result.trace.entries().iter().any(|e| e.label.starts_with("pop")));
    }

    #[test]
    fn test_generated_letter_in_input_is_rejected() {
        let generated = GeneratedLetter::new(0, vec![Symbol::source("A"), Symbol::source("A")]);
        let e = Equation::new(vec![Symbol::Generated(generated)], vec![Symbol::variable("x")]);
        let err = solve(&e, None).unwrap_err();
        assert!(matches!(err, SolverError::ForeignSymbol { .. }));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_solve_declared_rejects_undeclared() {
        let alphabet = Alphabet::parse("{A}", "{x}").unwrap();
        let err = solve_declared(&alphabet, &eq("Ax = yA"), &SolveOptions::default()).unwrap_err();
        assert_eq!(err.code(), "S004");
        assert!(solve_declared(&alphabet, &eq("Ax = xA"), &SolveOptions::default()).is_ok());
    }

    #[test]
    fn test_solve_input() {
        let result = solve_input("{A,B}", "{x,y}", "A x = y B", &SolveOptions::default()).unwrap();
        assert!(result.solved);
        assert_eq!(result.assignment_strings(), pairs(&[("x", "B"), ("y", "A")]));
    }

    mod error_tests {
        use super::*;

        /// Test that all `SolverError` variants have valid error codes
        #[test]
        fn test_error_codes_are_valid() {
            let parse_err = SolverError::ParseFailure(Box::new(ParseError::EmptyInput));
            assert_eq!(parse_err.code(), "S001");
            assert!(!parse_err.is_contract_violation());

            let self_pair = SolverError::SelfPair { letter: "CONST(A)".to_string() };
            assert_eq!(self_pair.code(), "S002");

            let missing = SolverError::MissingAssignment { variable: "x".to_string() };
            assert_eq!(missing.code(), "S003");

            let foreign = SolverError::ForeignSymbol { symbol: "VAR(z)".to_string(), context: "test".to_string() };
            assert_eq!(foreign.code(), "S004");

            for err in [self_pair, missing, foreign] {
                assert!(err.is_contract_violation());
                assert!(err.help().is_some());
                assert!(!err.details().is_empty());
            }
        }

        /// Test that `display_detailed` includes error code and help
        #[test]
        fn test_display_detailed_format() {
            let err = SolverError::ForeignSymbol { symbol: "VAR(z)".to_string(), context: "not declared".to_string() };
            let detailed = err.display_detailed();
            assert!(detailed.contains("S004"), "Detailed display should include error code");
            assert!(detailed.contains("VAR(z)"));
            assert!(detailed.contains("declaring"), "Detailed display should include help text");
        }

        /// Test that `ParseFailure` error chains are properly constructed
        #[test]
        fn test_parse_failure_error_chain() {
            match solve_input("{A,B}", "{x}", "Ax = Cx", &SolveOptions::default()) {
                Err(err @ SolverError::ParseFailure(_)) => {
                    let detailed = err.display_detailed();
                    assert!(detailed.contains("S001"), "ParseFailure should have S001 code");
                    assert!(detailed.contains("caused by"), "ParseFailure should show error chain");
                    assert!(detailed.contains("E009"), "Should contain the unknown-symbol code");
                }
                other => panic!("Expected ParseFailure error, got {other:?}"),
            }
        }
    }
}
