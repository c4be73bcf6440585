//! Variable management for SAT encoding

use crate::board::CellIndex;
use anyhow::Result;
use std::fmt;

/// Types of variables used in the SAT encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Bit `bit` of the state word of `cell`
    State { cell: CellIndex, bit: usize },
    /// Helper introduced while lowering a constraint
    Auxiliary(i32),
}

/// Maps state-word bits and helper variables to DIMACS variable ids.
///
/// State bits occupy the first `cell_count * cell_count` ids in row-major
/// order (`1 + cell * width + bit`); auxiliaries are numbered after them.
#[derive(Debug, Clone)]
pub struct VariableManager {
    cell_count: usize,
    next_auxiliary: usize,
}

/// Convert a 1-based variable index to a DIMACS id
fn to_dimacs(index: usize) -> Result<i32> {
    i32::try_from(index)
        .map_err(|_| anyhow::anyhow!("Variable {} exceeds the DIMACS range (max {})", index, i32::MAX))
}

impl VariableManager {
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            next_auxiliary: cell_count.saturating_mul(cell_count).saturating_add(1),
        }
    }

    /// Variable id of one bit of a state word
    pub fn state_variable(&self, cell: CellIndex, bit: usize) -> Result<i32> {
        if cell >= self.cell_count {
            anyhow::bail!("Cell {} out of bounds (cells: {})", cell, self.cell_count);
        }
        if bit >= self.cell_count {
            anyhow::bail!("Bit {} out of bounds (word width: {})", bit, self.cell_count);
        }
        // cell < n and bit < n, so the index is below n^2 whenever n^2 fits
        let index = cell
            .checked_mul(self.cell_count)
            .and_then(|offset| offset.checked_add(bit + 1))
            .ok_or_else(|| anyhow::anyhow!("Variable for cell {} bit {} overflows", cell, bit))?;
        to_dimacs(index)
    }

    /// All bit variables of a cell's word, least significant first
    pub fn word_variables(&self, cell: CellIndex) -> Result<Vec<i32>> {
        (0..self.cell_count)
            .map(|bit| self.state_variable(cell, bit))
            .collect()
    }

    /// Allocate a fresh helper variable
    pub fn new_auxiliary(&mut self) -> Result<i32> {
        let id = to_dimacs(self.next_auxiliary)?;
        self.next_auxiliary += 1;
        Ok(id)
    }

    /// Reverse lookup of a variable id
    pub fn describe(&self, var: i32) -> Option<VariableType> {
        let index = usize::try_from(var).ok().filter(|&v| v > 0 && v < self.next_auxiliary)? - 1;
        if index < self.state_variable_count() {
            Some(VariableType::State {
                cell: index / self.cell_count,
                bit: index % self.cell_count,
            })
        } else {
            Some(VariableType::Auxiliary(var))
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn state_variable_count(&self) -> usize {
        self.cell_count.saturating_mul(self.cell_count)
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        self.next_auxiliary - 1
    }

    pub fn statistics(&self) -> VariableStatistics {
        VariableStatistics {
            total_variables: self.variable_count(),
            state_variables: self.state_variable_count(),
            auxiliary_variables: self.variable_count() - self.state_variable_count(),
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub state_variables: usize,
    pub auxiliary_variables: usize,
}

impl fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  State variables: {}", self.state_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        Ok(())
    }
}
