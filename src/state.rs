//! Per-run solver state, threaded through every round by `&mut`.

use std::collections::HashMap;

use crate::compression::{Boundary, ReplacementTable};
use crate::element::{SourceLetter, Symbol, Variable, Word};
use crate::equation::{Assignment, Equation};
use crate::solver::SolverError;
use crate::trace::Trace;

/// Letters peeled off each end of every variable, plus the replacement table and trace.
///
/// A variable's value is `sigma_left[v] ++ reverse(sigma_right[v])`. Right-side pops therefore store
/// their expansion reversed, so the final reverse restores multi-letter constants in order.
#[derive(Debug)]
pub struct SolverState {
    pub(crate) sigma_left: HashMap<Variable, Word>,
    pub(crate) sigma_right: HashMap<Variable, Word>,
    pub(crate) replacements: ReplacementTable,
    pub(crate) trace: Trace,
}

impl SolverState {
    /// Every variable gets empty entries on both sides before any round runs.
    #[must_use]
    pub fn new(variables: &[Variable], trace_limit: usize) -> Self {
        let empty = || variables.iter().map(|v| (v.clone(), Word::new())).collect::<HashMap<_, _>>();
        SolverState {
            sigma_left: empty(),
            sigma_right: empty(),
            replacements: ReplacementTable::default(),
            trace: Trace::new(trace_limit),
        }
    }

    /// Check that every variable of `equation` is tracked on both sides.
    ///
    /// # Errors
    /// [`SolverError::MissingAssignment`] for the first untracked variable.
    pub fn check_tracked(&self, equation: &Equation) -> Result<(), SolverError> {
        match equation
            .used_variables()
            .into_iter()
            .find(|v| !self.sigma_left.contains_key(v) || !self.sigma_right.contains_key(v))
        {
            Some(var) => Err(SolverError::MissingAssignment { variable: var.name().to_string() }),
            None => Ok(()),
        }
    }

    fn sigma_mut(&mut self, var: &Variable, boundary: Boundary) -> Result<&mut Word, SolverError> {
        let sigma = match boundary {
            Boundary::Left => &mut self.sigma_left,
            Boundary::Right => &mut self.sigma_right,
        };
        sigma
            .get_mut(var)
            .ok_or_else(|| SolverError::MissingAssignment { variable: var.name().to_string() })
    }

    /// Record that `letter` was popped off `var`'s `boundary`.
    pub(crate) fn record_pop(&mut self, var: &Variable, letter: &Symbol, boundary: Boundary) -> Result<(), SolverError> {
        let mut expansion = letter.source_expansion().ok_or_else(|| SolverError::ForeignSymbol {
            symbol: letter.to_string(),
            context: format!("popped onto {var}"),
        })?;
        if boundary == Boundary::Right {
            expansion.reverse();
        }
        self.sigma_mut(var, boundary)?.extend(expansion);
        Ok(())
    }

    /// Record the residual value of `var` once the equation resolved it.
    pub(crate) fn record_resolution(&mut self, var: &Variable, value: &[SourceLetter]) -> Result<(), SolverError> {
        self.sigma_mut(var, Boundary::Left)?.extend_from_slice(value);
        Ok(())
    }

    /// Merge both sides into the final assignment for `variables`.
    pub(crate) fn assignment_for(&self, variables: &[Variable]) -> Result<Assignment, SolverError> {
        variables
            .iter()
            .map(|var| {
                let missing = || SolverError::MissingAssignment { variable: var.name().to_string() };
                let left = self.sigma_left.get(var).ok_or_else(missing)?;
                let right = self.sigma_right.get(var).ok_or_else(missing)?;
                let value = left.iter().chain(right.iter().rev()).cloned().collect();
                Ok((var.clone(), value))
            })
            .collect()
    }

    #[must_use]
    pub fn replacements(&self) -> &ReplacementTable {
        &self.replacements
    }

    #[must_use]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub(crate) fn into_trace(self) -> Trace {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::word_to_string;

    #[test]
    fn test_right_pops_of_generated_letters_keep_order() {
        let x = Variable::new("x");
        let mut state = SolverState::new(&[x.clone()], 0);
        let ab = state.replacements.intern(vec![Symbol::source("A"), Symbol::source("B")]);

        // x = x' AB, then x' = x'' C: x = x'' C A B
        state.record_pop(&x, &Symbol::Generated(ab), Boundary::Right).unwrap();
        state.record_pop(&x, &Symbol::source("C"), Boundary::Right).unwrap();
        state.record_pop(&x, &Symbol::source("D"), Boundary::Left).unwrap();
        state.record_resolution(&x, &[SourceLetter::new("E")]).unwrap();

        let assignment = state.assignment_for(&[x.clone()]).unwrap();
        assert_eq!(word_to_string(&assignment[&x]), "DECAB");
    }

    #[test]
    fn test_check_tracked() {
        let state = SolverState::new(&[Variable::new("x")], 0);
        assert!(state.check_tracked(&"Ax = B".parse().unwrap()).is_ok());
        let err = state.check_tracked(&"Ax = yB".parse().unwrap()).unwrap_err();
        assert!(matches!(err, SolverError::MissingAssignment { ref variable } if variable == "y"));
    }

    #[test]
    fn test_record_pop_of_variable_is_rejected() {
        let x = Variable::new("x");
        let mut state = SolverState::new(&[x.clone()], 0);
        let err = state.record_pop(&x, &Symbol::variable("y"), Boundary::Left).unwrap_err();
        assert!(matches!(err, SolverError::ForeignSymbol { .. }));
    }
}
