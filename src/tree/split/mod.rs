//! Two-way split strategies for overflowing spatial nodes.
//!
//! A split maps the entries of an overflowing node to two groups. Every
//! strategy guarantees `min_entries <= |A|, |B| <= n - min_entries`;
//! callers must supply at least `2 * min_entries` entries.
//!
//! | Strategy | Seeds | Cost |
//! |----------|-------|------|
//! | [`Linear`](SplitStrategy::Linear) | most separated pair per axis (Guttman) | `O(n·d)` |
//! | [`Greene`](SplitStrategy::Greene) | most wasteful pair, then median cut | `O(n²·d)` |
//! | [`AngTan`](SplitStrategy::AngTan) | closer/farther edge per axis | `O(n·d)` |

pub mod ang_tan;
pub mod greene;
pub mod linear;

use crate::compute::spatial::common_dimensionality;
use crate::error::{ProximaError, Result};
use proxima_types::bbox::SpatialComparable;
use serde::{Deserialize, Serialize};

/// Result of a split: one bit per entry, unset for the first group and set
/// for the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAssignment {
    bits: Vec<bool>,
}

impl SplitAssignment {
    /// All `len` entries in the first group.
    pub fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Assignment with the given entries in the second group.
    pub fn from_second(len: usize, second: impl IntoIterator<Item = usize>) -> Self {
        let mut assignment = Self::new(len);
        for i in second {
            assignment.set_second(i);
        }
        assignment
    }

    pub fn set_second(&mut self, index: usize) {
        self.bits[index] = true;
    }

    pub fn set_first(&mut self, index: usize) {
        self.bits[index] = false;
    }

    pub fn is_second(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn second_len(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn first_len(&self) -> usize {
        self.len() - self.second_len()
    }

    /// Indices of the first group, ascending.
    pub fn first_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().filter(|(_, b)| !**b).map(|(i, _)| i)
    }

    /// Indices of the second group, ascending.
    pub fn second_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().filter(|(_, b)| **b).map(|(i, _)| i)
    }

    /// Whether both groups hold between `min_entries` and `n - min_entries`
    /// entries.
    pub fn is_valid(&self, min_entries: usize) -> bool {
        let (a, b) = (self.first_len(), self.second_len());
        a >= min_entries && b >= min_entries
    }
}

/// Available spatial split strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Guttman's linear split.
    Linear,
    /// Greene's split: quadratic seeds, median cut along the best axis.
    #[default]
    Greene,
    /// Ang and Tan's overlap-minimizing linear split.
    AngTan,
}

impl SplitStrategy {
    /// Split `entries` into two groups of at least `min_entries` each.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_entries` is zero, if there are fewer than
    /// `max(2, 2 * min_entries)` entries, or if entries disagree on
    /// dimensionality.
    ///
    /// # Examples
    ///
    /// ```
    /// use proxima::tree::split::SplitStrategy;
    /// use proxima_types::HyperBoundingBox;
    ///
    /// let boxes: Vec<_> = (0..5)
    ///     .map(|i| {
    ///         let lo = 2.0 * i as f64;
    ///         HyperBoundingBox::new(vec![lo, 0.0], vec![lo + 1.0, 1.0])
    ///     })
    ///     .collect();
    /// let split = SplitStrategy::Linear.split(&boxes, 2)?;
    /// assert_eq!(split.first_len() + split.second_len(), 5);
    /// assert!(split.is_valid(2));
    /// # Ok::<(), proxima::ProximaError>(())
    /// ```
    pub fn split<S: SpatialComparable>(
        &self,
        entries: &[S],
        min_entries: usize,
    ) -> Result<SplitAssignment> {
        check_split_input(entries, min_entries)?;
        let assignment = match self {
            SplitStrategy::Linear => linear::split(entries, min_entries),
            SplitStrategy::Greene => greene::split(entries, min_entries),
            SplitStrategy::AngTan => ang_tan::split(entries, min_entries),
        };
        debug_assert_eq!(assignment.len(), entries.len());
        debug_assert!(
            assignment.is_valid(min_entries),
            "{:?} produced a {}/{} split violating min_entries = {}",
            self,
            assignment.first_len(),
            assignment.second_len(),
            min_entries
        );
        Ok(assignment)
    }
}

/// Validate the preconditions shared by all strategies.
pub(crate) fn check_split_input<S: SpatialComparable>(
    entries: &[S],
    min_entries: usize,
) -> Result<usize> {
    if min_entries == 0 {
        return Err(ProximaError::InvalidInput(
            "min_entries must be at least 1".to_string(),
        ));
    }
    if entries.len() < 2 || entries.len() < 2 * min_entries {
        return Err(ProximaError::InvalidInput(format!(
            "Cannot split {} entries into two groups of at least {}",
            entries.len(),
            min_entries
        )));
    }
    common_dimensionality(entries)
}
