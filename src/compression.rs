//! Block compression, pair compression, and crossing-pair popping.
//!
//! Every operator here only ever replaces constants by a generated letter that expands back to them,
//! or replaces a variable `x` by `c x` / `x c`. Any solution of the rewritten equation therefore maps
//! back to a solution of the one before it.

use std::collections::{BTreeSet, HashMap};

use log::trace;

use crate::element::{word_to_string, GeneratedLetter, SourceLetter, Symbol, Variable, Word};
use crate::equation::{Equation, Side};
use crate::heuristics::has_side_contradiction;
use crate::solver::SolverError;
use crate::state::SolverState;

/// Source expansion -> the generated letter already minted for it.
///
/// Consulted before minting so that textually identical blocks and pairs compress to one symbol
/// for the whole run. Also owns the id counter.
#[derive(Debug, Default)]
pub struct ReplacementTable {
    by_source: HashMap<Word, GeneratedLetter>,
    next_id: u32,
}

impl ReplacementTable {
    /// Return the generated letter for `parts`, minting one if its expansion is new.
    pub fn intern(&mut self, parts: Vec<Symbol>) -> GeneratedLetter {
        let mut source = Vec::new();
        for part in &parts {
            part.expand_into(&mut source);
        }

        if let Some(existing) = self.by_source.get(&source) {
            return existing.clone();
        }

        let generated = GeneratedLetter::new(self.next_id, parts);
        self.next_id += 1;
        trace!("minted {generated} for {}", word_to_string(&source));
        self.by_source.insert(source, generated.clone());
        generated
    }

    #[must_use]
    pub fn get(&self, source: &[SourceLetter]) -> Option<&GeneratedLetter> {
        self.by_source.get(source)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

/// Lengths of every maximal run of `a` that is at least two long.
fn run_lengths(side: &[Symbol], a: &Symbol) -> Vec<usize> {
    side.chunk_by(|x, y| x == y)
        .filter(|run| run.len() > 1 && &run[0] == a)
        .map(<[Symbol]>::len)
        .collect()
}

/// Replace each maximal run `a a ... a` (two or more) on one side by its generated letter.
///
/// Runs must already be interned in `table`.
fn block_compress_side(side: &[Symbol], a: &Symbol, table: &ReplacementTable) -> Side {
    let mut out = Vec::with_capacity(side.len());
    for run in side.chunk_by(|x, y| x == y) {
        if run.len() > 1 && &run[0] == a {
            let mut source = Vec::new();
            for symbol in run {
                symbol.expand_into(&mut source);
            }
            match table.get(&source) {
                Some(generated) => out.push(Symbol::Generated(generated.clone())),
                None => {
                    debug_assert!(false, "block of {a} x{} was not interned", run.len());
                    out.extend_from_slice(run);
                }
            }
        } else {
            out.extend_from_slice(run);
        }
    }
    out
}

/// Block-compress constant `a` on both sides.
///
/// Returns `None` when `a` has no run of two or more anywhere. Generated letters are minted by
/// increasing run length, so their ids do not depend on which side a run was found on.
pub fn block_compress(equation: &Equation, a: &Symbol, table: &mut ReplacementTable) -> Option<Equation> {
    debug_assert!(a.is_constant(), "block compression of a variable: {a}");

    let lengths: BTreeSet<usize> = run_lengths(equation.left(), a)
        .into_iter()
        .chain(run_lengths(equation.right(), a))
        .collect();
    if lengths.is_empty() {
        return None;
    }
    for len in lengths {
        table.intern(vec![a.clone(); len]);
    }

    Some(Equation::new(
        block_compress_side(equation.left(), a, table),
        block_compress_side(equation.right(), a, table),
    ))
}

/// Replace every non-overlapping `a b` on one side by `generated`, in a single left-to-right sweep.
///
/// # Errors
/// [`SolverError::SelfPair`] if `a == b`; runs of one letter belong to block compression.
pub fn pair_compress_side(
    side: &[Symbol],
    a: &Symbol,
    b: &Symbol,
    generated: &GeneratedLetter,
) -> Result<Side, SolverError> {
    if a == b {
        return Err(SolverError::SelfPair { letter: a.to_string() });
    }

    let mut out = Vec::with_capacity(side.len());
    let mut i = 0;
    while i < side.len() {
        if &side[i] == a && side.get(i + 1) == Some(b) {
            out.push(Symbol::Generated(generated.clone()));
            i += 2;
        } else {
            out.push(side[i].clone());
            i += 1;
        }
    }
    Ok(out)
}

/// Pair-compress `a b` on both sides.
///
/// Returns `Ok(None)` when the pair does not occur, so no letter is minted for it.
///
/// # Errors
/// [`SolverError::SelfPair`] if `a == b`.
pub fn pair_compress(
    equation: &Equation,
    a: &Symbol,
    b: &Symbol,
    table: &mut ReplacementTable,
) -> Result<Option<Equation>, SolverError> {
    if a == b {
        return Err(SolverError::SelfPair { letter: a.to_string() });
    }
    if !equation.contains_pair(a, b) {
        return Ok(None);
    }

    let generated = table.intern(vec![a.clone(), b.clone()]);
    equation.map_sides(|side| pair_compress_side(side, a, b, &generated)).map(Some)
}

/// Which end of a variable a letter is popped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// `x` becomes `c x`
    Left,
    /// `x` becomes `x c`
    Right,
}

impl Boundary {
    pub const BOTH: [Boundary; 2] = [Boundary::Left, Boundary::Right];
}

/// Substitute `x -> c x` (or `x -> x c`) everywhere on both sides.
#[must_use]
pub fn pop_rewrite(equation: &Equation, var: &Variable, letter: &Symbol, boundary: Boundary) -> Equation {
    let rewrite = |side: &[Symbol]| -> Side {
        let mut out = Vec::with_capacity(side.len() + 2);
        for symbol in side {
            if symbol.is_variable_of(var) {
                match boundary {
                    Boundary::Left => out.extend([letter.clone(), symbol.clone()]),
                    Boundary::Right => out.extend([symbol.clone(), letter.clone()]),
                }
            } else {
                out.push(symbol.clone());
            }
        }
        out
    };
    Equation::new(rewrite(equation.left()), rewrite(equation.right()))
}

/// The letter the equation forces onto `var`'s boundary, if any.
///
/// For [`Boundary::Left`]: one side starts with `var` while the other starts with a constant from
/// `eligible`; any solution with `var` non-empty must start with that constant. Mirrored for
/// [`Boundary::Right`].
#[must_use]
pub fn assumed_letter(equation: &Equation, var: &Variable, boundary: Boundary, eligible: &[Symbol]) -> Option<Symbol> {
    let end = |side: &[Symbol]| match boundary {
        Boundary::Left => side.first().cloned(),
        Boundary::Right => side.last().cloned(),
    };
    let forced = |this: &[Symbol], other: &[Symbol]| -> Option<Symbol> {
        if !end(this)?.is_variable_of(var) {
            return None;
        }
        end(other).filter(|c| c.is_constant() && eligible.contains(c))
    };

    forced(equation.left(), equation.right()).or_else(|| forced(equation.right(), equation.left()))
}

/// Tentatively pop `letter` onto `var`'s `boundary`.
///
/// Accepted rewrites are recorded in the state's sigma and trace; a rewrite that would produce a
/// side contradiction is recorded as a rejected branch and `Ok(None)` is returned.
///
/// # Errors
/// [`SolverError::MissingAssignment`] if `var` has no sigma entry.
pub fn try_pop(
    state: &mut SolverState,
    equation: &Equation,
    var: &Variable,
    letter: &Symbol,
    boundary: Boundary,
) -> Result<Option<Equation>, SolverError> {
    let candidate = pop_rewrite(equation, var, letter, boundary);
    let label = format!("pop {letter} {boundary:?} of {var}");

    if has_side_contradiction(&candidate) {
        trace!("rejected {label}");
        state.trace.record_rejected(&candidate, label);
        return Ok(None);
    }

    state.record_pop(var, letter, boundary)?;
    trace!("accepted {label}");
    state.trace.record(&candidate, label);
    Ok(Some(candidate))
}
