//! Stateless rewrites and checks the driver runs between compression steps.

use std::collections::HashSet;

use crate::element::{Symbol, Variable, Word};
use crate::equation::Equation;

/// Length of the longest common prefix of two sides.
fn common_prefix_len(u: &[Symbol], v: &[Symbol]) -> usize {
    u.iter().zip(v).take_while(|(a, b)| a == b).count()
}

fn common_suffix_len(u: &[Symbol], v: &[Symbol]) -> usize {
    u.iter().rev().zip(v.iter().rev()).take_while(|(a, b)| a == b).count()
}

/// Cut the common prefix, then the common suffix, off both sides.
///
/// Idempotent: after one pass the sides differ in their first and last symbols (or one is empty).
#[must_use]
pub fn shorten(equation: &Equation) -> Equation {
    let (u, v) = (equation.left(), equation.right());
    let prefix = common_prefix_len(u, v);
    let (u, v) = (&u[prefix..], &v[prefix..]);
    let suffix = common_suffix_len(u, v);
    Equation::new(u[..u.len() - suffix].to_vec(), v[..v.len() - suffix].to_vec())
}

fn unequal_constants(a: Option<&Symbol>, b: Option<&Symbol>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_constant() && b.is_constant() && a != b,
        _ => false,
    }
}

/// Whether the equation is provably unsatisfiable from its ends alone.
///
/// Checks a shortened copy for clashing leading or trailing constants, or an empty side facing a
/// constant. The argument is never modified.
#[must_use]
pub fn has_side_contradiction(equation: &Equation) -> bool {
    let shortened = shorten(equation);
    let (u, v) = (shortened.left(), shortened.right());

    unequal_constants(u.first(), v.first())
        || unequal_constants(u.last(), v.last())
        || (u.is_empty() && v.iter().any(Symbol::is_constant))
        || (v.is_empty() && u.iter().any(Symbol::is_constant))
}

/// Constants that may safely sit on each side of a non-crossing pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideLetters {
    /// Never directly followed by a variable: may be the left member of a pair.
    pub left: Vec<Symbol>,
    /// Never directly preceded by a variable: may be the right member of a pair.
    pub right: Vec<Symbol>,
}

/// Split the used constants by adjacency to variables.
///
/// A constant right before a variable could pair with that variable's first letter once the
/// variable is expanded, so it is left out of [`SideLetters::left`]; symmetrically for
/// [`SideLetters::right`]. Both lists keep canonical order.
#[must_use]
pub fn side_letters(equation: &Equation) -> SideLetters {
    let mut before_variable = HashSet::new();
    let mut after_variable = HashSet::new();

    for side in [equation.left(), equation.right()] {
        for w in side.windows(2) {
            match (&w[0], &w[1]) {
                (constant, Symbol::Variable(_)) if constant.is_constant() => {
                    before_variable.insert(constant.clone());
                }
                (Symbol::Variable(_), constant) if constant.is_constant() => {
                    after_variable.insert(constant.clone());
                }
                _ => {}
            }
        }
    }

    let constants = equation.used_constants();
    SideLetters {
        left: constants.iter().filter(|c| !before_variable.contains(*c)).cloned().collect(),
        right: constants.iter().filter(|c| !after_variable.contains(*c)).cloned().collect(),
    }
}

/// If one side is a lone variable absent from the other side, that variable can take the other side's
/// constants (every other variable taking the empty word).
///
/// Expects a shortened equation. Returns the variable and the source word it resolves to.
#[must_use]
pub fn trivial_solution(equation: &Equation) -> Option<(Variable, Word)> {
    let resolve = |lone: &[Symbol], other: &[Symbol]| -> Option<(Variable, Word)> {
        let [Symbol::Variable(var)] = lone else {
            return None;
        };
        if other.iter().any(|s| s.is_variable_of(var)) {
            return None;
        }
        let mut value = Vec::new();
        for symbol in other {
            symbol.expand_into(&mut value);
        }
        Some((var.clone(), value))
    };

    resolve(equation.left(), equation.right()).or_else(|| resolve(equation.right(), equation.left()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::word_to_string;

    fn eq(s: &str) -> Equation {
        s.parse().unwrap()
    }

    #[test]
    fn test_shorten_prefix_and_suffix() {
        assert_eq!(shorten(&eq("ABxC = AyC")), eq("Bx = y"));
        assert_eq!(shorten(&eq("Ax = AB")), eq("x = B"));
        assert_eq!(shorten(&eq("AB = AB")), Equation::empty());
    }

    #[test]
    fn test_shorten_overlapping_prefix_and_suffix() {
        // prefix takes "A", so the suffix can only use what remains
        assert_eq!(shorten(&eq("A = AA")), eq(" = A"));
        assert_eq!(shorten(&eq("x = Ax")), eq(" = A"));
    }

    #[test]
    fn test_shorten_is_idempotent() {
        for s in ["ABxC = AyC", "x = Ax", "AAxyA = AxA", " = ", "xyz = zyx", "AxBy = AyBx"] {
            let once = shorten(&eq(s));
            assert_eq!(shorten(&once), once, "shorten not idempotent on {s}");
        }
    }

    #[test]
    fn test_side_contradiction() {
        assert!(has_side_contradiction(&eq("A = B")));
        assert!(has_side_contradiction(&eq("Ax = By")));
        assert!(has_side_contradiction(&eq("xA = yB")));
        assert!(has_side_contradiction(&eq("x = Ax")));
        assert!(has_side_contradiction(&eq("AxB = AyBC")));

        assert!(!has_side_contradiction(&eq("Ax = yB")));
        assert!(!has_side_contradiction(&eq("x = y")));
        assert!(!has_side_contradiction(&eq("A = A")));
        assert!(!has_side_contradiction(&eq(" = xy")));
    }

    #[test]
    fn test_side_contradiction_leaves_input_untouched() {
        let e = eq("ABx = ABy");
        let before = e.clone();
        let _ = has_side_contradiction(&e);
        assert_eq!(e, before);
    }

    #[test]
    fn test_side_letters() {
        let letters = side_letters(&eq("Ax = yB"));
        assert_eq!(letters.left, vec![Symbol::source("B")]);
        assert_eq!(letters.right, vec![Symbol::source("A")]);
    }

    #[test]
    fn test_side_letters_without_variables() {
        let letters = side_letters(&eq("AB = BA"));
        assert_eq!(letters.left, vec![Symbol::source("A"), Symbol::source("B")]);
        assert_eq!(letters.left, letters.right);
    }

    #[test]
    fn test_side_letters_checks_both_sides() {
        let letters = side_letters(&eq("ABxy = yBAx"));
        assert!(letters.left.is_empty());
        assert_eq!(letters.right, vec![Symbol::source("A")]);
    }

    #[test]
    fn test_trivial_solution() {
        let (var, value) = trivial_solution(&eq("x = AyB")).unwrap();
        assert_eq!(var, Variable::new("x"));
        assert_eq!(word_to_string(&value), "AB");

        let (var, value) = trivial_solution(&eq("AB = y")).unwrap();
        assert_eq!(var, Variable::new("y"));
        assert_eq!(word_to_string(&value), "AB");
    }

    #[test]
    fn test_trivial_solution_rejects_self_reference() {
        assert!(trivial_solution(&eq("x = Ax")).is_none());
        assert!(trivial_solution(&eq("xy = A")).is_none());
    }
}
