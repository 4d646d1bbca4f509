//! Symbols that make up the two sides of a word equation.
//!
//! A [`Symbol`] is one of:
//! - a [`SourceLetter`] from the user's alphabet,
//! - a [`GeneratedLetter`] minted by compression, standing for a fixed sequence of constants,
//! - a [`Variable`] standing for an unknown word.
//!
//! Symbols are totally ordered (source letters, then generated letters, then variables), and every
//! "used symbols" query in the crate returns them in that order. Iteration therefore never depends on
//! which side of an equation a symbol happened to appear on first.

use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A word over the source alphabet.
pub type Word = Vec<SourceLetter>;

/// An original alphabet letter. Letter names may be longer than one character (`"AB"` is a single letter
/// if the alphabet declares it so).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLetter(Arc<str>);

impl SourceLetter {
    pub fn new(value: impl AsRef<str>) -> Self {
        SourceLetter(Arc::from(value.as_ref()))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Display for SourceLetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CONST({})", self.0)
    }
}

/// An unknown word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(Arc<str>);

impl Variable {
    pub fn new(name: impl AsRef<str>) -> Self {
        Variable(Arc::from(name.as_ref()))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "VAR({})", self.0)
    }
}

/// A letter introduced by block or pair compression.
///
/// Identity is the `id` handed out by the replacement table; two generated letters with the same id
/// are the same symbol. The source expansion is flattened once here and never recomputed.
#[derive(Debug, Clone)]
pub struct GeneratedLetter {
    id: u32,
    parts: Arc<[Symbol]>,
    source: Arc<[SourceLetter]>,
}

impl GeneratedLetter {
    /// Only the replacement table mints these, so ids stay unique within a run.
    pub(crate) fn new(id: u32, parts: Vec<Symbol>) -> Self {
        debug_assert!(!parts.is_empty(), "generated letter must stand for at least one symbol");
        debug_assert!(
            parts.iter().all(Symbol::is_constant),
            "generated letter parts must be constants: {parts:?}"
        );

        let mut source = Vec::new();
        for part in &parts {
            part.expand_into(&mut source);
        }

        GeneratedLetter { id, parts: Arc::from(parts), source: Arc::from(source) }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The symbols this letter was compressed from.
    #[must_use]
    pub fn parts(&self) -> &[Symbol] {
        &self.parts
    }

    /// The flattened source letters this letter stands for.
    #[must_use]
    pub fn source(&self) -> &[SourceLetter] {
        &self.source
    }
}

impl PartialEq for GeneratedLetter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GeneratedLetter {}

impl Hash for GeneratedLetter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for GeneratedLetter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GeneratedLetter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for GeneratedLetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GENCONST({})", self.id)
    }
}

/// One position of an equation side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Source(SourceLetter),
    Generated(GeneratedLetter),
    Variable(Variable),
}

impl Symbol {
    pub fn source(value: impl AsRef<str>) -> Self {
        Symbol::Source(SourceLetter::new(value))
    }

    pub fn variable(name: impl AsRef<str>) -> Self {
        Symbol::Variable(Variable::new(name))
    }

    /// Source and generated letters are both constants.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        !matches!(self, Symbol::Variable(_))
    }

    #[must_use]
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Symbol::Variable(var) => Some(var),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_variable_of(&self, var: &Variable) -> bool {
        self.as_variable() == Some(var)
    }

    /// Append this constant's source expansion to `out`. Variables contribute nothing.
    pub fn expand_into(&self, out: &mut Word) {
        match self {
            Symbol::Source(letter) => out.push(letter.clone()),
            Symbol::Generated(generated) => out.extend_from_slice(generated.source()),
            Symbol::Variable(_) => {}
        }
    }

    /// The source expansion of a constant, or `None` for a variable.
    #[must_use]
    pub fn source_expansion(&self) -> Option<Word> {
        match self {
            Symbol::Variable(_) => None,
            constant => {
                let mut out = Vec::new();
                constant.expand_into(&mut out);
                Some(out)
            }
        }
    }
}

impl From<SourceLetter> for Symbol {
    fn from(letter: SourceLetter) -> Self {
        Symbol::Source(letter)
    }
}

impl From<GeneratedLetter> for Symbol {
    fn from(generated: GeneratedLetter) -> Self {
        Symbol::Generated(generated)
    }
}

impl From<Variable> for Symbol {
    fn from(var: Variable) -> Self {
        Symbol::Variable(var)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Source(letter) => letter.fmt(f),
            Symbol::Generated(generated) => generated.fmt(f),
            Symbol::Variable(var) => var.fmt(f),
        }
    }
}

/// Concatenate letter values, e.g. `[A, B]` -> `"AB"`.
#[must_use]
pub fn word_to_string(word: &[SourceLetter]) -> String {
    word.iter().map(SourceLetter::value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(Symbol::source("A").to_string(), "CONST(A)");
        assert_eq!(Symbol::variable("x").to_string(), "VAR(x)");
        let generated = GeneratedLetter::new(7, vec![Symbol::source("A"), Symbol::source("B")]);
        assert_eq!(Symbol::Generated(generated).to_string(), "GENCONST(7)");
    }

    #[test]
    fn test_generated_source_is_flattened() {
        let inner = GeneratedLetter::new(0, vec![Symbol::source("A"), Symbol::source("A")]);
        let outer = GeneratedLetter::new(1, vec![Symbol::Generated(inner), Symbol::source("B")]);
        assert_eq!(word_to_string(outer.source()), "AAB");
        assert_eq!(outer.parts().len(), 2);
    }

    #[test]
    fn test_generated_equality_is_by_id() {
        let a = GeneratedLetter::new(3, vec![Symbol::source("A"), Symbol::source("B")]);
        let b = GeneratedLetter::new(3, vec![Symbol::source("C"), Symbol::source("D")]);
        let c = GeneratedLetter::new(4, vec![Symbol::source("A"), Symbol::source("B")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_symbol_ordering_groups_by_kind() {
        let generated = Symbol::Generated(GeneratedLetter::new(0, vec![Symbol::source("Z"), Symbol::source("Z")]));
        let mut symbols = vec![Symbol::variable("a"), generated.clone(), Symbol::source("Z"), Symbol::source("B")];
        symbols.sort();
        assert_eq!(symbols, vec![Symbol::source("B"), Symbol::source("Z"), generated, Symbol::variable("a")]);
    }

    #[test]
    fn test_source_expansion() {
        assert_eq!(Symbol::variable("x").source_expansion(), None);
        assert_eq!(Symbol::source("AB").source_expansion(), Some(vec![SourceLetter::new("AB")]));
        assert!(Symbol::source("A").is_constant());
        assert!(!Symbol::variable("x").is_constant());
        assert!(Symbol::variable("x").is_variable_of(&Variable::new("x")));
    }
}
