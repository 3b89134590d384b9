//! Brute-force search for subsets combining into a target type.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::{AlgebraError, AlgebraResult};
use crate::types::{TypeSymbol, combine};

/// Largest input `enumerate` accepts; masks are held in a `u64`.
pub const MAX_ENUMERATED: usize = 63;

/// A non-empty selection of input types, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset(Vec<TypeSymbol>);

impl Subset {
    pub fn symbols(&self) -> &[TypeSymbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The integral type of this subset.
    pub fn integral(&self) -> TypeSymbol {
        combine(&self.0)
    }

    /// Content key used for deduplication.
    fn sorted_key(&self) -> Vec<TypeSymbol> {
        let mut key = self.0.clone();
        key.sort_unstable();
        key
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl From<Subset> for Vec<TypeSymbol> {
    fn from(subset: Subset) -> Self {
        subset.0
    }
}

/// Find every subset of `symbols` whose integral type is `target`.
///
/// Subsets are drawn by index position, then deduplicated by their sorted
/// content: the first index-set discovered for a given multiset is kept.
/// The result is stably sorted by size, so equal sizes keep discovery order.
///
/// Runs in `O(2^n * n log n)`. Inputs longer than [`MAX_ENUMERATED`] are
/// rejected with [`AlgebraError::TooMany`].
pub fn enumerate(symbols: &[TypeSymbol], target: TypeSymbol) -> AlgebraResult<Vec<Subset>> {
    let n = symbols.len();
    if n > MAX_ENUMERATED {
        debug!("Refusing to enumerate {} symbols", n);
        return Err(AlgebraError::TooMany {
            count: n,
            max: MAX_ENUMERATED,
        });
    }
    let limit = 1u64 << n;

    let mut seen = HashSet::new();
    let mut subsets = Vec::new();

    for mask in 1..limit {
        let candidate = Subset(
            symbols
                .iter()
                .enumerate()
                .filter(|(j, _)| mask & (1u64 << j) != 0)
                .map(|(_, symbol)| *symbol)
                .collect(),
        );

        if candidate.integral() == target && seen.insert(candidate.sorted_key()) {
            subsets.push(candidate);
        }
    }

    subsets.sort_by_key(Subset::len);
    Ok(subsets)
}

/// Render subsets as numbered lines: `#1: ILE, LIE`.
pub fn format_subsets(subsets: &[Subset]) -> Vec<String> {
    subsets
        .iter()
        .enumerate()
        .map(|(i, subset)| format!("#{}: {}", i + 1, subset))
        .collect()
}
