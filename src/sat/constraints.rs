//! Word-level constraints over the per-cell state words

use super::word::StateWord;
use crate::board::CellIndex;
use crate::error::TourError;
use itertools::Itertools;
use std::fmt;

/// A word-valued expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordTerm {
    /// The state word of a cell
    State(CellIndex),
    /// The state word of a cell rotated left by `amount` bits
    Rotated { cell: CellIndex, amount: usize },
    /// A literal word
    Constant(StateWord),
}

impl WordTerm {
    /// Evaluate against a concrete assignment. `None` if the cell is unassigned.
    pub fn evaluate(&self, assignment: &Assignment) -> Option<StateWord> {
        match self {
            WordTerm::State(cell) => assignment.get(*cell).cloned(),
            WordTerm::Rotated { cell, amount } => {
                assignment.get(*cell).map(|word| word.rotate_left(*amount))
            }
            WordTerm::Constant(word) => Some(word.clone()),
        }
    }

    /// The cell this term reads, if any
    pub fn cell(&self) -> Option<CellIndex> {
        match self {
            WordTerm::State(cell) | WordTerm::Rotated { cell, .. } => Some(*cell),
            WordTerm::Constant(_) => None,
        }
    }
}

impl fmt::Display for WordTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordTerm::State(cell) => write!(f, "V[{}]", cell),
            WordTerm::Rotated { cell, amount } => write!(f, "rotl(V[{}], {})", cell, amount),
            WordTerm::Constant(word) => write!(f, "{}", word.value()),
        }
    }
}

/// A boolean constraint over word terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Equal(WordTerm, WordTerm),
    /// All terms pairwise different
    Distinct(Vec<WordTerm>),
    /// Exactly one bit set, i.e. the term equals one of the `width` powers of two
    PowerOfTwo(WordTerm),
    /// Disjunction; an empty disjunction is false
    AnyOf(Vec<Constraint>),
}

impl Constraint {
    pub fn holds(&self, assignment: &Assignment) -> bool {
        match self {
            Constraint::Equal(lhs, rhs) => {
                match (lhs.evaluate(assignment), rhs.evaluate(assignment)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            Constraint::Distinct(terms) => {
                let values: Option<Vec<StateWord>> =
                    terms.iter().map(|t| t.evaluate(assignment)).collect();
                match values {
                    Some(values) => values.iter().all_unique(),
                    None => false,
                }
            }
            Constraint::PowerOfTwo(term) => term
                .evaluate(assignment)
                .is_some_and(|word| word.is_power_of_two()),
            Constraint::AnyOf(options) => options.iter().any(|c| c.holds(assignment)),
        }
    }

    /// Every cell the constraint reads, in order of appearance
    pub fn cells(&self) -> Vec<CellIndex> {
        let mut cells = Vec::new();
        self.collect_cells(&mut cells);
        cells
    }

    fn collect_cells(&self, out: &mut Vec<CellIndex>) {
        match self {
            Constraint::Equal(lhs, rhs) => out.extend(lhs.cell().into_iter().chain(rhs.cell())),
            Constraint::Distinct(terms) => out.extend(terms.iter().filter_map(WordTerm::cell)),
            Constraint::PowerOfTwo(term) => out.extend(term.cell()),
            Constraint::AnyOf(options) => {
                for option in options {
                    option.collect_cells(out);
                }
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Equal(lhs, rhs) => write!(f, "{} == {}", lhs, rhs),
            Constraint::Distinct(terms) => {
                write!(f, "Distinct({})", terms.iter().map(|t| t.to_string()).join(", "))
            }
            Constraint::PowerOfTwo(term) => write!(f, "PowerOfTwo({})", term),
            Constraint::AnyOf(options) if options.is_empty() => write!(f, "false"),
            Constraint::AnyOf(options) => {
                write!(f, "Or({})", options.iter().map(|c| c.to_string()).join(", "))
            }
        }
    }
}

/// Conjunction of constraints over `cell_count` words of `cell_count` bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    cell_count: usize,
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            constraints: Vec::new(),
        }
    }

    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn extend(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        self.constraints.extend(constraints);
    }

    /// Number of state words, which is also the width of each word
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn word_width(&self) -> usize {
        self.cell_count
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    pub fn holds(&self, assignment: &Assignment) -> bool {
        assignment.len() == self.cell_count && self.constraints.iter().all(|c| c.holds(assignment))
    }

    /// Indices of the constraints `assignment` violates
    pub fn violations(&self, assignment: &Assignment) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.holds(assignment))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn statistics(&self) -> ConstraintStatistics {
        let mut stats = ConstraintStatistics {
            cell_count: self.cell_count,
            total_constraints: self.constraints.len(),
            ..ConstraintStatistics::default()
        };
        for constraint in &self.constraints {
            match constraint {
                Constraint::Equal(..) => stats.equalities += 1,
                Constraint::Distinct(_) => stats.distinct_groups += 1,
                Constraint::PowerOfTwo(_) => stats.power_of_two += 1,
                Constraint::AnyOf(options) => {
                    stats.disjunctions += 1;
                    stats.widest_disjunction = stats.widest_disjunction.max(options.len());
                    if options.is_empty() {
                        stats.empty_disjunctions += 1;
                    }
                }
            }
        }
        stats
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}

/// Concrete state word for every cell, as returned by a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    width: usize,
    values: Vec<StateWord>,
}

impl Assignment {
    pub fn new(width: usize, values: Vec<StateWord>) -> Self {
        Self { width, values }
    }

    /// Words that stamp `order[t]` with step `t`
    pub fn from_order(order: &[CellIndex]) -> Result<Self, TourError> {
        let width = order.len();
        let mut values = vec![StateWord::zero(width); width];
        for (step, &cell) in order.iter().enumerate() {
            let slot = values.get_mut(cell).ok_or_else(|| {
                TourError::assignment(cell, format!("cell is outside 0..{}", width))
            })?;
            if slot.count_ones() != 0 {
                return Err(TourError::assignment(cell, "cell appears twice in the order"));
            }
            *slot = StateWord::one_hot(width, step);
        }
        Ok(Self { width, values })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, cell: CellIndex) -> Option<&StateWord> {
        self.values.get(cell)
    }

    pub fn values(&self) -> &[StateWord] {
        &self.values
    }
}

/// Counts of each constraint kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintStatistics {
    pub cell_count: usize,
    pub total_constraints: usize,
    pub equalities: usize,
    pub distinct_groups: usize,
    pub power_of_two: usize,
    pub disjunctions: usize,
    pub widest_disjunction: usize,
    pub empty_disjunctions: usize,
}

impl fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Constraint Statistics:")?;
        writeln!(f, "  State words: {} x {} bits", self.cell_count, self.cell_count)?;
        writeln!(f, "  Total constraints: {}", self.total_constraints)?;
        writeln!(f, "  Equalities: {}", self.equalities)?;
        writeln!(f, "  Distinct groups: {}", self.distinct_groups)?;
        writeln!(f, "  Power-of-two: {}", self.power_of_two)?;
        writeln!(f, "  Disjunctions: {} (widest {})", self.disjunctions, self.widest_disjunction)?;
        if self.empty_disjunctions > 0 {
            writeln!(f, "  Empty disjunctions: {}", self.empty_disjunctions)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(width: usize, steps: &[usize]) -> Assignment {
        Assignment::new(
            width,
            steps.iter().map(|&s| StateWord::one_hot(width, s)).collect(),
        )
    }

    #[test]
    fn test_equal_with_rotation() {
        let assignment = words(3, &[0, 1, 2]);
        let c = Constraint::Equal(WordTerm::State(1), WordTerm::Rotated { cell: 0, amount: 1 });
        assert!(c.holds(&assignment));

        let wrap = Constraint::Equal(WordTerm::State(0), WordTerm::Rotated { cell: 2, amount: 1 });
        assert!(wrap.holds(&assignment));

        let wrong = Constraint::Equal(WordTerm::State(2), WordTerm::Rotated { cell: 0, amount: 1 });
        assert!(!wrong.holds(&assignment));
    }

    #[test]
    fn test_distinct() {
        let c = Constraint::Distinct(vec![WordTerm::State(0), WordTerm::State(1), WordTerm::State(2)]);
        assert!(c.holds(&words(3, &[2, 0, 1])));
        assert!(!c.holds(&words(3, &[2, 0, 2])));
    }

    #[test]
    fn test_power_of_two() {
        let c = Constraint::PowerOfTwo(WordTerm::State(0));
        assert!(c.holds(&words(4, &[3])));
        let not_one_hot = Assignment::new(4, vec![StateWord::from_u64(4, 0b0110)]);
        assert!(!c.holds(&not_one_hot));
    }

    #[test]
    fn test_empty_disjunction_is_false() {
        let c = Constraint::AnyOf(vec![]);
        assert!(!c.holds(&words(1, &[0])));
        assert_eq!(c.to_string(), "false");
    }

    #[test]
    fn test_unassigned_cell_fails() {
        let c = Constraint::Equal(WordTerm::State(5), WordTerm::Constant(StateWord::one_hot(2, 0)));
        assert!(!c.holds(&words(2, &[0, 1])));
    }

    #[test]
    fn test_cells_collects_nested_reads() {
        let c = Constraint::AnyOf(vec![
            Constraint::Equal(WordTerm::State(4), WordTerm::Rotated { cell: 1, amount: 1 }),
            Constraint::Equal(WordTerm::State(4), WordTerm::Rotated { cell: 9, amount: 1 }),
        ]);
        assert_eq!(c.cells(), vec![4, 1, 4, 9]);
    }

    #[test]
    fn test_set_violations_and_statistics() {
        let mut set = ConstraintSet::new(2);
        set.push(Constraint::Equal(WordTerm::State(0), WordTerm::Constant(StateWord::one_hot(2, 0))));
        set.push(Constraint::Distinct(vec![WordTerm::State(0), WordTerm::State(1)]));
        set.push(Constraint::AnyOf(vec![]));

        let assignment = words(2, &[0, 1]);
        assert!(!set.holds(&assignment));
        assert_eq!(set.violations(&assignment), vec![2]);

        let stats = set.statistics();
        assert_eq!(stats.total_constraints, 3);
        assert_eq!(stats.equalities, 1);
        assert_eq!(stats.distinct_groups, 1);
        assert_eq!(stats.empty_disjunctions, 1);
    }

    #[test]
    fn test_assignment_from_order() {
        let assignment = Assignment::from_order(&[2, 0, 1]).unwrap();
        assert_eq!(assignment.get(2).unwrap().step(), Some(0));
        assert_eq!(assignment.get(0).unwrap().step(), Some(1));
        assert_eq!(assignment.get(1).unwrap().step(), Some(2));

        assert!(Assignment::from_order(&[0, 0]).is_err());
        assert!(Assignment::from_order(&[0, 5]).is_err());
    }
}
