use crate::element::{SourceLetter, Symbol, Variable};
use crate::errors::ParseError;
use crate::parser::PResult;
use fancy_regex::Regex;
use nom::{
    bytes::complete::take_while,
    character::complete::char,
    combinator::all_consuming,
    sequence::delimited,
    Parser,
};
use std::collections::HashSet;
use std::sync::LazyLock;

/// A letter or variable name: one or more ASCII letters.
///
/// If a new `LazyLock<Regex>` is added, add it to `validate_internal_regexes` in wasm.rs too!
pub(crate) static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

/// The declared letters and variables an equation may use.
///
/// Letter names are stored upper-cased and variable names lower-cased, so case alone tells the
/// equation tokenizer which set to look in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<SourceLetter>,
    variables: Vec<Variable>,
}

#[derive(Clone, Copy)]
enum NameKind {
    Letter,
    Variable,
}

impl NameKind {
    fn as_str(self) -> &'static str {
        match self {
            NameKind::Letter => "letter",
            NameKind::Variable => "variable",
        }
    }

    fn normalize(self, name: &str) -> String {
        match self {
            NameKind::Letter => name.to_ascii_uppercase(),
            NameKind::Variable => name.to_ascii_lowercase(),
        }
    }
}

// `{` body `}`
fn braced(input: &str) -> PResult<'_, &str> {
    delimited(char('{'), take_while(|c: char| c != '{' && c != '}'), char('}')).parse(input)
}

/// Parse `{a, b, ...}` into validated, case-normalized, distinct names.
fn parse_set(input: &str, kind: NameKind) -> Result<Vec<String>, Box<ParseError>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Box::new(ParseError::EmptyInput));
    }

    let (_, body) = all_consuming(braced)
        .parse(trimmed)
        .map_err(|_| Box::new(ParseError::MalformedSet { input: trimmed.to_string() }))?;

    // `{}` declares nothing
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for raw in body.split(',').map(str::trim) {
        if !NAME_RE.is_match(raw)? {
            return Err(Box::new(ParseError::InvalidName { kind: kind.as_str(), name: raw.to_string() }));
        }
        let name = kind.normalize(raw);
        if !seen.insert(name.clone()) {
            return Err(Box::new(ParseError::DuplicateName { name }));
        }
        names.push(name);
    }
    Ok(names)
}

impl Alphabet {
    /// Parse a letter set and a variable set, e.g. `Alphabet::parse("{A,B}", "{x,y}")`.
    ///
    /// # Errors
    /// `EmptyInput`, `MalformedSet`, `InvalidName` or `DuplicateName`.
    pub fn parse(letters: &str, variables: &str) -> Result<Self, Box<ParseError>> {
        let letters = parse_set(letters, NameKind::Letter)?.into_iter().map(SourceLetter::new).collect();
        let variables = parse_set(variables, NameKind::Variable)?.into_iter().map(Variable::new).collect();
        Ok(Alphabet { letters, variables })
    }

    /// Every upper-case character of `s` as a one-character letter, every lower-case one as a
    /// one-character variable.
    #[must_use]
    pub fn from_shorthand(s: &str) -> Self {
        let mut alphabet = Alphabet::default();
        for c in s.chars() {
            let name = c.to_string();
            if c.is_ascii_uppercase() && !alphabet.letters.iter().any(|l| l.value() == name) {
                alphabet.letters.push(SourceLetter::new(name));
            } else if c.is_ascii_lowercase() && !alphabet.variables.iter().any(|v| v.name() == name) {
                alphabet.variables.push(Variable::new(name));
            }
        }
        alphabet
    }

    #[must_use]
    pub fn letters(&self) -> &[SourceLetter] {
        &self.letters
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Whether `symbol` is a declared letter or variable. Generated letters never are.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        match symbol {
            Symbol::Source(letter) => self.letters.contains(letter),
            Symbol::Variable(var) => self.variables.contains(var),
            Symbol::Generated(_) => false,
        }
    }

    /// The longest declared name `input` starts with, and its length in bytes.
    ///
    /// An upper-case first character only matches letters, a lower-case one only variables.
    pub(crate) fn longest_match(&self, input: &str) -> Option<(Symbol, usize)> {
        let first = input.chars().next()?;
        if first.is_ascii_uppercase() {
            self.letters
                .iter()
                .filter(|l| input.starts_with(l.value()))
                .max_by_key(|l| l.value().len())
                .map(|l| (Symbol::Source(l.clone()), l.value().len()))
        } else if first.is_ascii_lowercase() {
            self.variables
                .iter()
                .filter(|v| input.starts_with(v.name()))
                .max_by_key(|v| v.name().len())
                .map(|v| (Symbol::Variable(v.clone()), v.name().len()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sets() {
        let alphabet = Alphabet::parse("{A, b ,CD}", " {x,Y} ").unwrap();
        let letters: Vec<_> = alphabet.letters().iter().map(SourceLetter::value).collect();
        let variables: Vec<_> = alphabet.variables().iter().map(Variable::name).collect();
        assert_eq!(letters, vec!["A", "B", "CD"]);
        assert_eq!(variables, vec!["x", "y"]);
    }

    #[test]
    fn test_empty_sets_are_allowed() {
        let alphabet = Alphabet::parse("{}", "{ }").unwrap();
        assert!(alphabet.letters().is_empty());
        assert!(alphabet.variables().is_empty());
    }

    #[test]
    fn test_malformed_sets() {
        for bad in ["A,B", "{A,B", "A,B}", "{A}{B}", "{{A}}"] {
            let err = Alphabet::parse(bad, "{x}").unwrap_err();
            assert!(matches!(*err, ParseError::MalformedSet { .. }), "{bad}: {err:?}");
        }
        assert!(matches!(*Alphabet::parse("{A}", "  ").unwrap_err(), ParseError::EmptyInput));
    }

    #[test]
    fn test_invalid_names() {
        let err = Alphabet::parse("{A1}", "{x}").unwrap_err();
        assert!(matches!(*err, ParseError::InvalidName { kind: "letter", .. }));
        let err = Alphabet::parse("{A}", "{x,,y}").unwrap_err();
        assert!(matches!(*err, ParseError::InvalidName { kind: "variable", ref name } if name.is_empty()));
    }

    #[test]
    fn test_duplicates_after_case_folding() {
        let err = Alphabet::parse("{A,a}", "{x}").unwrap_err();
        assert!(matches!(*err, ParseError::DuplicateName { ref name } if name == "A"));
    }

    #[test]
    fn test_longest_match() {
        let alphabet = Alphabet::parse("{A,AB}", "{x,xy}").unwrap();
        assert_eq!(alphabet.longest_match("ABx"), Some((Symbol::source("AB"), 2)));
        assert_eq!(alphabet.longest_match("Ax"), Some((Symbol::source("A"), 1)));
        assert_eq!(alphabet.longest_match("xyA"), Some((Symbol::variable("xy"), 2)));
        assert_eq!(alphabet.longest_match("B"), None);
        assert_eq!(alphabet.longest_match("1"), None);
        assert_eq!(alphabet.longest_match(""), None);
    }

    #[test]
    fn test_from_shorthand_and_contains() {
        let alphabet = Alphabet::from_shorthand("AxA = yB");
        assert_eq!(alphabet.letters().len(), 2);
        assert_eq!(alphabet.variables().len(), 2);
        assert!(alphabet.contains(&Symbol::source("B")));
        assert!(alphabet.contains(&Symbol::variable("y")));
        assert!(!alphabet.contains(&Symbol::variable("z")));
    }
}
