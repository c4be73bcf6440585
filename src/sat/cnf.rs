//! Bit-blasting word constraints into CNF
//!
//! Every constraint is lowered under a guard prefix: a list of literals that is
//! prepended to each clause it produces. Top-level constraints have an empty
//! prefix. The options of a disjunction each get a fresh selector `s` and are
//! lowered under `prefix ++ [-s]`, so they only bind when `s` is true.

use super::constraints::{Constraint, ConstraintSet, WordTerm};
use super::variables::VariableManager;
use crate::board::CellIndex;
use anyhow::Result;
use itertools::Itertools;
use log::debug;
use std::fmt;

/// Widest word whose at-most-one is encoded pairwise
const PAIRWISE_AT_MOST_ONE_LIMIT: usize = 6;

/// A single CNF clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<i32>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self::new(vec![literal])
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self::new(vec![lit1, lit2])
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// True if at least one literal is true under `value`
    pub fn is_satisfied_by(&self, value: impl Fn(i32) -> bool) -> bool {
        self.literals
            .iter()
            .any(|&lit| value(lit.abs()) == (lit > 0))
    }
}

/// A bit after constant folding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Lit(i32),
    Const(bool),
}

impl Bit {
    pub fn negate(self) -> Self {
        match self {
            Bit::Lit(lit) => Bit::Lit(-lit),
            Bit::Const(value) => Bit::Const(!value),
        }
    }
}

/// Output of the bit-blaster
#[derive(Debug, Clone)]
pub struct CnfFormula {
    clauses: Vec<Clause>,
    variables: VariableManager,
    contradiction: bool,
}

impl CnfFormula {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    pub fn state_variable_count(&self) -> usize {
        self.variables.state_variable_count()
    }

    /// Variable holding bit `bit` of the word of `cell`
    pub fn state_variable(&self, cell: CellIndex, bit: usize) -> Result<i32> {
        self.variables.state_variable(cell, bit)
    }

    /// An empty clause was derived; the formula is unsatisfiable as written
    pub fn is_contradiction(&self) -> bool {
        self.contradiction
    }

    pub fn is_satisfied_by(&self, value: impl Fn(i32) -> bool) -> bool {
        !self.contradiction && self.clauses.iter().all(|c| c.is_satisfied_by(&value))
    }
}

impl fmt::Display for CnfFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CNF Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count())?;
        writeln!(f, "  State variables: {}", self.state_variable_count())?;
        writeln!(f, "  Clauses: {}", self.clauses.len())?;
        if self.contradiction {
            writeln!(f, "  Contradiction: empty clause derived")?;
        }
        Ok(())
    }
}

/// Lowers a [`ConstraintSet`] to clauses over the state-bit variables
pub struct BitBlaster {
    variables: VariableManager,
    width: usize,
    clauses: Vec<Clause>,
    contradiction: bool,
}

impl BitBlaster {
    pub fn new(cell_count: usize) -> Self {
        Self {
            variables: VariableManager::new(cell_count),
            width: cell_count,
            clauses: Vec::new(),
            contradiction: false,
        }
    }

    /// Lower every constraint of `set` and return the resulting formula
    pub fn blast(set: &ConstraintSet) -> Result<CnfFormula> {
        let mut blaster = Self::new(set.cell_count());
        for constraint in set {
            blaster.lower(constraint, &[])?;
        }
        let formula = blaster.finish();
        debug!(
            "bit-blasted {} constraints into {} variables and {} clauses",
            set.len(),
            formula.variable_count(),
            formula.clause_count()
        );
        Ok(formula)
    }

    pub fn variables(&self) -> &VariableManager {
        &self.variables
    }

    pub fn finish(self) -> CnfFormula {
        CnfFormula {
            variables: self.variables,
            clauses: self.clauses,
            contradiction: self.contradiction,
        }
    }

    /// Lower `constraint` so that it binds only when every literal of `guard` is false
    pub fn lower(&mut self, constraint: &Constraint, guard: &[i32]) -> Result<()> {
        match constraint {
            Constraint::Equal(lhs, rhs) => self.lower_equal(lhs, rhs, guard),
            Constraint::Distinct(terms) => self.lower_distinct(terms, guard),
            Constraint::PowerOfTwo(term) => self.lower_power_of_two(term, guard),
            Constraint::AnyOf(options) => self.lower_any_of(options, guard),
        }
    }

    /// The `bit`-th bit of a word term
    fn term_bit(&self, term: &WordTerm, bit: usize) -> Result<Bit> {
        match term {
            WordTerm::State(cell) => Ok(Bit::Lit(self.variables.state_variable(*cell, bit)?)),
            WordTerm::Rotated { cell, amount } => {
                // rotl by k moves source bit (i - k) mod w to bit i
                let shift = amount % self.width;
                let source = (bit + self.width - shift) % self.width;
                Ok(Bit::Lit(self.variables.state_variable(*cell, source)?))
            }
            WordTerm::Constant(word) => Ok(Bit::Const(word.bit(bit))),
        }
    }

    fn term_bits(&self, term: &WordTerm) -> Result<Vec<Bit>> {
        (0..self.width).map(|bit| self.term_bit(term, bit)).collect()
    }

    /// Add `guard ∨ bits`, folding constants
    fn emit(&mut self, guard: &[i32], bits: &[Bit]) {
        let mut literals = guard.to_vec();
        for bit in bits {
            match *bit {
                Bit::Const(true) => return,
                Bit::Const(false) => {}
                Bit::Lit(lit) => literals.push(lit),
            }
        }
        if literals.is_empty() {
            self.contradiction = true;
        }
        self.clauses.push(Clause::new(literals));
    }

    fn lower_equal(&mut self, lhs: &WordTerm, rhs: &WordTerm, guard: &[i32]) -> Result<()> {
        for bit in 0..self.width {
            let a = self.term_bit(lhs, bit)?;
            let b = self.term_bit(rhs, bit)?;
            self.emit(guard, &[a.negate(), b]);
            self.emit(guard, &[a, b.negate()]);
        }
        Ok(())
    }

    /// A bit that is true only if `a` and `b` differ
    fn difference_bit(&mut self, a: Bit, b: Bit) -> Result<Bit> {
        let bit = match (a, b) {
            (Bit::Const(x), Bit::Const(y)) => Bit::Const(x != y),
            (Bit::Const(c), Bit::Lit(lit)) | (Bit::Lit(lit), Bit::Const(c)) => {
                Bit::Lit(if c { -lit } else { lit })
            }
            (Bit::Lit(x), Bit::Lit(y)) => {
                let d = self.variables.new_auxiliary()?;
                self.clauses.push(Clause::new(vec![-d, x, y]));
                self.clauses.push(Clause::new(vec![-d, -x, -y]));
                Bit::Lit(d)
            }
        };
        Ok(bit)
    }

    fn lower_distinct(&mut self, terms: &[WordTerm], guard: &[i32]) -> Result<()> {
        let words: Vec<Vec<Bit>> = terms
            .iter()
            .map(|term| self.term_bits(term))
            .collect::<Result<_>>()?;

        for (p, q) in words.iter().tuple_combinations() {
            let differences: Vec<Bit> = p
                .iter()
                .zip(q)
                .map(|(&a, &b)| self.difference_bit(a, b))
                .collect::<Result<_>>()?;
            self.emit(guard, &differences);
        }
        Ok(())
    }

    fn lower_power_of_two(&mut self, term: &WordTerm, guard: &[i32]) -> Result<()> {
        let bits = self.term_bits(term)?;

        // at least one
        self.emit(guard, &bits);

        if bits.len() <= PAIRWISE_AT_MOST_ONE_LIMIT {
            for (&a, &b) in bits.iter().tuple_combinations() {
                self.emit(guard, &[a.negate(), b.negate()]);
            }
            return Ok(());
        }

        // Sequential counter: s[i] means "some bit at or below i is set"
        let last = bits.len() - 1;
        let counters: Vec<Bit> = (0..last)
            .map(|_| self.variables.new_auxiliary().map(Bit::Lit))
            .collect::<Result<_>>()?;

        self.emit(guard, &[bits[0].negate(), counters[0]]);
        for i in 1..last {
            self.emit(guard, &[bits[i].negate(), counters[i]]);
            self.emit(guard, &[counters[i - 1].negate(), counters[i]]);
            self.emit(guard, &[bits[i].negate(), counters[i - 1].negate()]);
        }
        self.emit(guard, &[bits[last].negate(), counters[last - 1].negate()]);
        Ok(())
    }

    fn lower_any_of(&mut self, options: &[Constraint], guard: &[i32]) -> Result<()> {
        match options {
            [] => {
                self.emit(guard, &[]);
                Ok(())
            }
            [only] => self.lower(only, guard),
            _ => {
                let selectors: Vec<i32> = options
                    .iter()
                    .map(|_| self.variables.new_auxiliary())
                    .collect::<Result<_>>()?;
                let selector_bits: Vec<Bit> = selectors.iter().map(|&s| Bit::Lit(s)).collect();
                self.emit(guard, &selector_bits);

                for (option, &selector) in options.iter().zip(&selectors) {
                    let mut inner = guard.to_vec();
                    inner.push(-selector);
                    self.lower(option, &inner)?;
                }
                Ok(())
            }
        }
    }
}
