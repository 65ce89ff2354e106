//! Reconciliation statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

/// Counters describing which correction path each record took.
///
/// Every counter is a plain sum, so stats from independent runs can be
/// merged by adding them up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationStats {
    /// Records reconciled.
    pub total: u64,
    /// Code was missing or invalid and was derived from the name.
    pub code_inferred_from_name: u64,
    /// Name was missing and was filled from the code.
    pub name_inferred_from_code: u64,
    /// Name disagreed with the code and was replaced by the canonical name.
    pub name_corrected_to_canonical: u64,
    /// Three-letter code mapped to its two-letter form.
    pub three_letter_normalized: u64,
    /// A supplied code could not be used and was dropped.
    pub invalid_code_nullified: u64,
    /// Code was inferred through an alias rather than a canonical name.
    pub alias_name_resolved: u64,
}

impl ReconciliationStats {
    /// Creates zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every counter of `other` into `self`.
    pub fn merge(&mut self, other: &ReconciliationStats) {
        self.total += other.total;
        self.code_inferred_from_name += other.code_inferred_from_name;
        self.name_inferred_from_code += other.name_inferred_from_code;
        self.name_corrected_to_canonical += other.name_corrected_to_canonical;
        self.three_letter_normalized += other.three_letter_normalized;
        self.invalid_code_nullified += other.invalid_code_nullified;
        self.alias_name_resolved += other.alias_name_resolved;
    }

    /// Returns true if no record has been reconciled yet.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl AddAssign for ReconciliationStats {
    fn add_assign(&mut self, other: Self) {
        self.merge(&other);
    }
}

impl Sum for ReconciliationStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, stats| {
            acc += stats;
            acc
        })
    }
}

impl fmt::Display for ReconciliationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== COUNTRY CLEANING SUMMARY ===")?;
        writeln!(f, "Total: {}", self.total)?;
        writeln!(f, "Inferred code from name: {}", self.code_inferred_from_name)?;
        writeln!(f, "Inferred name from code: {}", self.name_inferred_from_code)?;
        writeln!(f, "Corrected name to canonical: {}", self.name_corrected_to_canonical)?;
        writeln!(f, "Alias names resolved: {}", self.alias_name_resolved)?;
        writeln!(f, "3-letter -> 2-letter normalized: {}", self.three_letter_normalized)?;
        write!(f, "Invalid codes nullified: {}", self.invalid_code_nullified)
    }
}
