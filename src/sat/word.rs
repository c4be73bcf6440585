//! Fixed-width state words
//!
//! Every board cell owns one word with a bit per cell. The position of the
//! single set bit is the step at which the cell is visited, so a word of
//! width 16 equal to `0000000000001000` means "visited at step 3".

use num_bigint::BigUint;
use std::fmt;

/// Unsigned integer of exactly `width` bits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateWord {
    width: usize,
    bits: BigUint,
}

impl StateWord {
    /// All bits clear
    pub fn zero(width: usize) -> Self {
        Self {
            width,
            bits: BigUint::ZERO,
        }
    }

    /// Word with only bit `position` set. Positions wrap modulo `width`.
    pub fn one_hot(width: usize, position: usize) -> Self {
        let mut word = Self::zero(width);
        if width > 0 {
            word.set_bit(position % width, true);
        }
        word
    }

    /// Truncate `value` to `width` bits
    pub fn from_biguint(width: usize, value: BigUint) -> Self {
        Self {
            width,
            bits: value & Self::mask(width),
        }
    }

    pub fn from_u64(width: usize, value: u64) -> Self {
        Self::from_biguint(width, BigUint::from(value))
    }

    fn mask(width: usize) -> BigUint {
        (BigUint::from(1u32) << width) - 1u32
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn value(&self) -> &BigUint {
        &self.bits
    }

    pub fn bit(&self, position: usize) -> bool {
        position < self.width && self.bits.bit(position as u64)
    }

    /// Set or clear a bit. Positions at or beyond the width are ignored.
    pub fn set_bit(&mut self, position: usize, value: bool) {
        if position < self.width {
            self.bits.set_bit(position as u64, value);
        }
    }

    /// Rotate towards the most significant bit; the top bits wrap to the bottom.
    pub fn rotate_left(&self, amount: usize) -> Self {
        if self.width == 0 {
            return self.clone();
        }
        let amount = amount % self.width;
        if amount == 0 {
            return self.clone();
        }
        let high = &self.bits << amount;
        let low = &self.bits >> (self.width - amount);
        Self::from_biguint(self.width, high | low)
    }

    pub fn count_ones(&self) -> u64 {
        self.bits.count_ones()
    }

    pub fn is_power_of_two(&self) -> bool {
        self.count_ones() == 1
    }

    /// Position of the single set bit, i.e. `log2` of a power of two.
    /// `None` when zero or more than one bit is set.
    pub fn step(&self) -> Option<usize> {
        if !self.is_power_of_two() {
            return None;
        }
        self.bits.trailing_zeros().map(|tz| tz as usize)
    }
}

impl fmt::Display for StateWord {
    /// Binary, most significant bit first, zero padded to the width
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>width$}", self.bits.to_str_radix(2), width = self.width)
    }
}
