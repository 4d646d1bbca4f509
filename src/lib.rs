// Library API, shared by the CLI and wasm builds
pub mod compression;
pub mod element;
pub mod equation;
pub mod errors;
pub mod heuristics;
pub mod log;
pub mod parser;
pub mod solver;
pub mod state;
pub mod trace;

// Compile the wasm glue only when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use element::{GeneratedLetter, SourceLetter, Symbol, Variable, Word};
pub use equation::{Assignment, Equation};
pub use parser::{parse_equation, Alphabet};
pub use solver::{solve, solve_input, solve_with_options, SolveOptions, SolveResult, SolveStatus, SolverError};
