//! Error types for parsing alphabets and equations, with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (E001-E011) for documentation lookup:
//!
//! - E001: `ParseFailure` (Generic parse failure)
//! - E002: `RegexError` (Internal regex failure)
//! - E003: `EmptyInput` (Empty input string)
//! - E004: `MalformedSet` (Set not written as `{a,b,...}`)
//! - E005: `InvalidName` (Letter or variable name is not a word)
//! - E006: `DuplicateName` (Name declared twice)
//! - E007: `MissingEquals` (No `=` in the equation)
//! - E008: `TooManyEquals` (More than one `=` in the equation)
//! - E009: `UnknownSymbol` (No declared name matches)
//! - E010: `InvalidCharacter` (Character that is neither a letter nor a variable)
//! - E011: `NomError` (Low-level nom parser error)
//!
//! # Examples
//!
//! ```
//! use wordeq::errors::ParseError;
//! use wordeq::parser::Alphabet;
//!
//! match Alphabet::parse("{A,B", "{x}") {
//!     Err(e) => {
//!         println!("Error: {}", e);
//!         println!("Code: {}", e.code());
//!         if let Some(help) = e.help() {
//!             println!("Help: {}", help);
//!         }
//!     }
//!     Ok(_) => unreachable!(),
//! }
//! ```

use nom::error::{ErrorKind, ParseError as NomParseError};
use std::io;

/// Custom error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Parsing failed: \"{s}\"")]
    ParseFailure { s: String },

    #[error("Internal regex error: {0}")]
    RegexError(#[from] fancy_regex::Error),

    #[error("Empty input string")]
    EmptyInput,

    #[error("Malformed set \"{input}\" (expected {{a,b,...}})")]
    MalformedSet { input: String },

    #[error("Invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("Name '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("Equation \"{input}\" has no '='")]
    MissingEquals { input: String },

    #[error("Equation \"{input}\" has more than one '='")]
    TooManyEquals { input: String },

    #[error("No declared letter or variable matches \"{rest}\" at position {position}")]
    UnknownSymbol { rest: String, position: usize },

    #[error("Invalid character '{invalid_char}' at position {position}")]
    InvalidCharacter { invalid_char: char, position: usize },

    // nom parser error (lowest level)
    #[error("nom parser error: {0:?}")]
    NomError(ErrorKind),
}

impl From<ParseError> for io::Error {
    fn from(pe: ParseError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, pe.to_string())
    }
}

impl From<fancy_regex::Error> for Box<ParseError> {
    fn from(e: fancy_regex::Error) -> Self {
        Box::new(ParseError::RegexError(e))
    }
}

impl<'a> NomParseError<&'a str> for Box<ParseError> {
    fn from_error_kind(_input: &'a str, kind: ErrorKind) -> Self {
        Box::new(ParseError::NomError(kind))
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl ParseError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::ParseFailure { .. } => "E001",
            ParseError::RegexError(_) => "E002",
            ParseError::EmptyInput => "E003",
            ParseError::MalformedSet { .. } => "E004",
            ParseError::InvalidName { .. } => "E005",
            ParseError::DuplicateName { .. } => "E006",
            ParseError::MissingEquals { .. } => "E007",
            ParseError::TooManyEquals { .. } => "E008",
            ParseError::UnknownSymbol { .. } => "E009",
            ParseError::InvalidCharacter { .. } => "E010",
            ParseError::NomError(_) => "E011",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ParseError::ParseFailure { .. } => "Generic parse failure",
            ParseError::RegexError(_) => "Internal regex failure",
            ParseError::EmptyInput => "Empty input string",
            ParseError::MalformedSet { .. } => "Set not written as {a,b,...}",
            ParseError::InvalidName { .. } => "Letter or variable name is not a word",
            ParseError::DuplicateName { .. } => "Name declared twice",
            ParseError::MissingEquals { .. } => "No '=' in the equation",
            ParseError::TooManyEquals { .. } => "More than one '=' in the equation",
            ParseError::UnknownSymbol { .. } => "No declared name matches",
            ParseError::InvalidCharacter { .. } => "Character that is neither a letter nor a variable",
            ParseError::NomError(_) => "Low-level nom parser error",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            ParseError::ParseFailure { .. } => "The input could not be parsed.",
            ParseError::RegexError(_) => "A built-in name-validation regex failed to run. This is a bug, not a problem with the input.",
            ParseError::EmptyInput => "An alphabet line or equation was empty.",
            ParseError::MalformedSet { .. } => "Letter and variable sets are written as a comma-separated list in braces, e.g. `{A,B}` or `{x,y}`.",
            ParseError::InvalidName { .. } => "Every letter and variable name must consist of ASCII letters only.",
            ParseError::DuplicateName { .. } => "Each letter and each variable may be declared only once.",
            ParseError::MissingEquals { .. } => "An equation has the form `<side1> = <side2>`.",
            ParseError::TooManyEquals { .. } => "An equation has exactly one `=` separating its two sides.",
            ParseError::UnknownSymbol { .. } => "Equation sides are split by greedy longest match against the declared names. Upper case selects letters, lower case selects variables.",
            ParseError::InvalidCharacter { .. } => "Equation sides may only contain declared letter and variable names and whitespace.",
            ParseError::NomError(_) => "The low-level parser rejected the input.",
        }
    }

    /// Returns a helpful suggestion or example for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ParseError::EmptyInput => Some("Example: '{A,B}', '{x,y}', 'Ax = yB'"),
            ParseError::MalformedSet { .. } => Some("Write sets in braces, e.g. '{A,B,C}' for letters or '{x,y}' for variables"),
            ParseError::InvalidName { .. } => Some("Names may only contain letters a-z/A-Z (e.g. 'A', 'AB', 'x', 'foo')"),
            ParseError::DuplicateName { .. } => Some("Remove the repeated name from the set"),
            ParseError::MissingEquals { .. } => Some("Separate the two sides with '=', e.g. 'Ax = yB'"),
            ParseError::TooManyEquals { .. } => Some("Only one equation can be solved at a time, e.g. 'Ax = yB'"),
            ParseError::UnknownSymbol { .. } => Some("Declare every letter (upper case) and variable (lower case) the equation uses"),
            ParseError::InvalidCharacter { .. } => Some("Use only declared letter and variable names, separated by optional spaces"),
            _ => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
