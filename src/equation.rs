use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::element::{Symbol, Variable, Word};
use crate::errors::ParseError;
use crate::parser::{parse_equation, Alphabet};

/// One side of an equation, in word order.
pub type Side = Vec<Symbol>;

/// Final solution: each variable mapped to its source word.
pub type Assignment = BTreeMap<Variable, Word>;

/// `left = right`. Rewrites never modify an equation in place; they build a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Equation {
    left: Side,
    right: Side,
}

impl Equation {
    #[must_use]
    pub fn new(left: Side, right: Side) -> Self {
        Equation { left, right }
    }

    /// `"" = ""`
    #[must_use]
    pub fn empty() -> Self {
        Equation::default()
    }

    #[must_use]
    pub fn left(&self) -> &[Symbol] {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &[Symbol] {
        &self.right
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Combined length of both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Swap the sides.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Equation::new(self.right.clone(), self.left.clone())
    }

    /// Rebuild both sides by running `f` over each.
    pub(crate) fn map_sides<E>(&self, mut f: impl FnMut(&[Symbol]) -> Result<Side, E>) -> Result<Self, E> {
        Ok(Equation::new(f(&self.left)?, f(&self.right)?))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.left.iter().chain(self.right.iter())
    }

    /// Every distinct symbol, in canonical order.
    #[must_use]
    pub fn used_symbols(&self) -> Vec<Symbol> {
        self.symbols().cloned().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Distinct source and generated letters, in canonical order.
    #[must_use]
    pub fn used_constants(&self) -> Vec<Symbol> {
        self.used_symbols().into_iter().filter(Symbol::is_constant).collect()
    }

    /// Distinct variables, in canonical order.
    #[must_use]
    pub fn used_variables(&self) -> Vec<Variable> {
        self.symbols()
            .filter_map(Symbol::as_variable)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn contains_variable(&self, var: &Variable) -> bool {
        self.symbols().any(|symbol| symbol.is_variable_of(var))
    }

    /// Whether `a b` occurs as adjacent symbols on either side.
    #[must_use]
    pub fn contains_pair(&self, a: &Symbol, b: &Symbol) -> bool {
        let occurs = |side: &[Symbol]| side.windows(2).any(|w| &w[0] == a && &w[1] == b);
        occurs(&self.left) || occurs(&self.right)
    }

    /// True if erasing every variable leaves both sides with the same constants, i.e. the all-empty
    /// assignment of the remaining variables solves the equation.
    #[must_use]
    pub fn has_empty_solution(&self) -> bool {
        self.left.iter().filter(|s| s.is_constant()).eq(self.right.iter().filter(|s| s.is_constant()))
    }

    /// Expand both sides to source words under `assignment`.
    ///
    /// Returns `None` if some variable of the equation has no value.
    #[must_use]
    pub fn substitute(&self, assignment: &Assignment) -> Option<(Word, Word)> {
        let expand = |side: &[Symbol]| -> Option<Word> {
            let mut out = Vec::new();
            for symbol in side {
                match symbol {
                    Symbol::Variable(var) => out.extend_from_slice(assignment.get(var)?),
                    constant => constant.expand_into(&mut out),
                }
            }
            Some(out)
        };
        Some((expand(&self.left)?, expand(&self.right)?))
    }
}

fn side_to_string(side: &[Symbol]) -> String {
    side.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", side_to_string(&self.left), side_to_string(&self.right))
    }
}

impl FromStr for Equation {
    type Err = Box<ParseError>;

    /// Single-character shorthand: every upper-case char is a letter, every lower-case char a variable.
    ///
    /// `"Ax = yB".parse::<Equation>()` is the same as declaring `{A,B}` and `{x,y}` and parsing with
    /// [`parse_equation`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_equation(s, &Alphabet::from_shorthand(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SourceLetter;

    fn eq(s: &str) -> Equation {
        s.parse().unwrap()
    }

    #[test]
    fn test_used_queries_are_canonical() {
        let e = eq("yBx = Ax");
        assert_eq!(e.used_constants(), vec![Symbol::source("A"), Symbol::source("B")]);
        assert_eq!(e.used_variables(), vec![Variable::new("x"), Variable::new("y")]);
        assert_eq!(e.used_symbols().len(), 4);
    }

    #[test]
    fn test_used_queries_ignore_side_order() {
        let e = eq("AxB = yBA");
        assert_eq!(e.used_symbols(), e.mirrored().used_symbols());
    }

    #[test]
    fn test_has_empty_solution() {
        assert!(eq("xAy = A").has_empty_solution());
        assert!(eq("x = y").has_empty_solution());
        assert!(!eq("xAB = BA").has_empty_solution());
    }

    #[test]
    fn test_contains_pair() {
        let e = eq("AxB = yAB");
        assert!(e.contains_pair(&Symbol::source("A"), &Symbol::source("B")));
        assert!(!e.contains_pair(&Symbol::source("B"), &Symbol::source("A")));
    }

    #[test]
    fn test_substitute() {
        let e = eq("Ax = yB");
        let mut assignment = Assignment::new();
        assignment.insert(Variable::new("x"), vec![SourceLetter::new("B")]);
        assignment.insert(Variable::new("y"), vec![SourceLetter::new("A")]);
        let (left, right) = e.substitute(&assignment).unwrap();
        assert_eq!(left, right);

        assignment.remove(&Variable::new("y"));
        assert!(e.substitute(&assignment).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(eq("Ax = B").to_string(), "CONST(A) VAR(x) = CONST(B)");
        assert_eq!(Equation::empty().to_string(), " = ");
    }
}
