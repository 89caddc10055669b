use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::FrequencyTableError;

/// Occurrence count of every distinct symbol seen in an input.
///
/// Symbols iterate in ascending order, which is the insertion order the
/// tree builder uses to break ties between equal weights. Every count is
/// at least 1 and the counts sum to at most `u64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<char, u64>",
    into = "BTreeMap<char, u64>"
)]
pub struct FrequencyTable(BTreeMap<char, u64>);

impl FrequencyTable {
    pub fn count(symbols: impl IntoIterator<Item = char>) -> Self {
        let counts = symbols
            .into_iter()
            .into_grouping_map_by(|&ch| ch)
            .fold(0_u64, |acc, _key, _value| acc + 1);

        Self(counts.into_iter().collect())
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.0.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of symbols in the input the table was counted from.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.0.iter().map(|(&ch, &count)| (ch, count))
    }
}

impl TryFrom<BTreeMap<char, u64>> for FrequencyTable {
    type Error = FrequencyTableError;

    fn try_from(counts: BTreeMap<char, u64>) -> Result<Self, Self::Error> {
        let mut total = 0_u64;
        for (&symbol, &count) in &counts {
            if count == 0 {
                return Err(FrequencyTableError::ZeroCount { symbol });
            }
            total = total
                .checked_add(count)
                .ok_or(FrequencyTableError::TotalOverflow)?;
        }
        Ok(Self(counts))
    }
}

impl From<FrequencyTable> for BTreeMap<char, u64> {
    fn from(table: FrequencyTable) -> Self {
        table.0
    }
}
