//! Generate error code documentation from the source of truth (error enums).
//!
//! This binary reads the error codes, descriptions, details, and help text
//! directly from the `ParseError` and `SolverError` implementations via their
//! `code()`, `description()`, `details()`, and `help()` methods.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use std::fmt::Write;
use wordeq::errors::ParseError;
use wordeq::solver::SolverError;

/// Macro to generate error documentation for any error type
/// with `code()`, `description()`, `details()`, `help()`, and `display_detailed()` methods
macro_rules! generate_error_docs {
    ($out:expr, $errors:expr) => {
        for error in $errors {
            let _ = writeln!($out, "### {}: {}\n", error.code(), error.description());
            let _ = writeln!($out, "**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                let _ = writeln!($out, "**How to fix:**\n```\n{help_text}\n```\n");
            }

            let _ = writeln!($out, "**Example error message:**\n```\n{error}\n```\n");
            let _ = writeln!($out, "**Detailed format:**\n```\n{}\n```\n", error.display_detailed());
            let _ = writeln!($out, "---\n");
        }
    };
}

/// Helper to create all `ParseError` variants for documentation
fn all_parse_error_variants() -> Vec<ParseError> {
    vec![
        ParseError::ParseFailure { s: "A?x = B".to_string() },
        // RegexError--create by attempting to compile an invalid regex
        ParseError::RegexError(fancy_regex::Regex::new("(?P<invalid").unwrap_err()),
        ParseError::EmptyInput,
        ParseError::MalformedSet { input: "A,B".to_string() },
        ParseError::InvalidName { kind: "letter", name: "A1".to_string() },
        ParseError::DuplicateName { name: "A".to_string() },
        ParseError::MissingEquals { input: "AxB".to_string() },
        ParseError::TooManyEquals { input: "A = x = B".to_string() },
        ParseError::UnknownSymbol { rest: "Cx".to_string(), position: 5 },
        ParseError::InvalidCharacter { invalid_char: '1', position: 1 },
        // NomError--use a common error kind
        ParseError::NomError(nom::error::ErrorKind::Tag),
    ]
}

/// Helper to create all `SolverError` variants for documentation
fn all_solver_error_variants() -> Vec<SolverError> {
    vec![
        SolverError::ParseFailure(Box::new(ParseError::MissingEquals { input: "AxB".to_string() })),
        SolverError::SelfPair { letter: "CONST(A)".to_string() },
        SolverError::MissingAssignment { variable: "x".to_string() },
        SolverError::ForeignSymbol {
            symbol: "VAR(z)".to_string(),
            context: "not declared in the alphabet".to_string(),
        },
    ]
}

fn render_docs() -> String {
    let mut out = String::new();

    // NB: writing to a String never fails
    let _ = writeln!(out, "# Error Code Reference\n");
    let _ = writeln!(out, "**This document is auto-generated from the source code. Do not edit manually.**\n");

    let _ = writeln!(out, "## Table of Contents\n");
    let _ = writeln!(out, "- [Solver Errors (S001-S004)](#solver-errors)");
    let _ = writeln!(out, "- [Parse Errors (E001-E011)](#parse-errors)");
    let _ = writeln!(out, "- [How to Use Error Codes](#how-to-use-error-codes)\n");

    let _ = writeln!(out, "## Solver Errors\n");
    let _ = writeln!(
        out,
        "Top-level errors from the solver. An equation without a solution is not an error; these wrap parse errors or report broken internal contracts.\n"
    );
    generate_error_docs!(out, all_solver_error_variants());

    let _ = writeln!(out, "## Parse Errors\n");
    let _ = writeln!(out, "Errors that occur when parsing the letter set, the variable set, or the equation.\n");
    generate_error_docs!(out, all_parse_error_variants());

    let _ = writeln!(out, "\n## How to Use Error Codes\n");
    let _ = writeln!(out, "When you see an error like:\n");
    let _ = writeln!(out, "```\n{}\n```\n", ParseError::MissingEquals { input: "AxB".to_string() }.display_detailed());
    let _ = writeln!(out, "1. Note the error code (e.g., `E007`)");
    let _ = writeln!(out, "2. Look it up in this document for detailed explanation");
    let _ = writeln!(out, "3. Follow the suggested resolution steps");

    out
}

fn main() {
    print!("{}", render_docs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_is_documented_once() {
        let docs = render_docs();
        let codes = all_solver_error_variants()
            .iter()
            .map(SolverError::code)
            .chain(all_parse_error_variants().iter().map(ParseError::code))
            .collect::<Vec<_>>();
        assert_eq!(codes.len(), 15);
        for code in codes {
            assert_eq!(docs.matches(&format!("### {code}:")).count(), 1, "{code} should have one section");
        }
    }

    #[test]
    fn test_parse_failure_shows_chain() {
        let docs = render_docs();
        assert!(docs.contains("S001\n  caused by: Equation \"AxB\" has no '=' (E007)"));
    }
}
