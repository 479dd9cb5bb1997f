//! Fixed-point currency
//!
//! Amounts are whole experimental points stored as integers. They take part
//! in equality checks (affordability caps), so there is no floating point
//! anywhere in the payoff path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LogicError;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Currency(i64);

impl Currency {
    pub const ZERO: Currency = Currency(0);

    pub const fn new(points: i64) -> Self {
        Self(points)
    }

    pub const fn points(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Currency) -> Result<Currency, LogicError> {
        self.0.checked_add(other.0).map(Currency).ok_or(LogicError::Overflow)
    }

    pub fn checked_sub(self, other: Currency) -> Result<Currency, LogicError> {
        self.0.checked_sub(other.0).map(Currency).ok_or(LogicError::Overflow)
    }

    /// `self * factor`
    pub fn checked_mul(self, factor: u32) -> Result<Currency, LogicError> {
        self.0
            .checked_mul(factor as i64)
            .map(Currency)
            .ok_or(LogicError::Overflow)
    }

    /// How many whole `unit`s fit into this amount, i.e. `floor(self / unit)`.
    ///
    /// Negative balances afford nothing; a non-positive unit also yields 0.
    pub fn whole_units(self, unit: Currency) -> u64 {
        if unit.0 <= 0 || self.0 <= 0 {
            return 0;
        }
        (self.0 / unit.0) as u64
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} points", self.0)
    }
}
