//! # Disjoint Integer Interval Sets
//!
//! Cell and surface numbers are handed out in long contiguous runs, so a set
//! of them is stored as a sorted list of closed ranges `[lo, hi]` instead of
//! one entry per value.
//!
//! ## Invariants
//!
//! - Every stored interval has `lo ≤ hi`.
//! - Intervals are strictly increasing and **non-adjacent**: for consecutive
//!   intervals `a`, `b` we always have `a.hi + 1 < b.lo`. Touching ranges are
//!   merged on insert, so the representation is always minimal.
//!
//! ## Complexity
//!
//! | Operation        | Complexity   | Notes                               |
//! |------------------|--------------|-------------------------------------|
//! | `contains`       | O(log k)     | Binary search over `k` intervals    |
//! | `next`           | O(log k)     |                                     |
//! | `insert`         | O(k)         | Merge is O(log k), shifting is O(k) |
//! | `remove`         | O(k)         | May split one interval into two     |
//! | `union`          | O(k · m)     | Range-insert of each `m` interval   |

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, IndexError, OrderError, ParseError};

/// A closed integer range `[lo, hi]`.
///
/// # Invariants
/// `lo` is always less than or equal to `hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    lo: i64,
    hi: i64,
}

impl Interval {
    /// Create `[lo, hi]`, rejecting reversed bounds.
    pub const fn new(lo: i64, hi: i64) -> Result<Self, OrderError> {
        if lo > hi {
            Err(OrderError { lo, hi })
        } else {
            Ok(Self { lo, hi })
        }
    }

    /// The one-element interval `[value, value]`.
    #[must_use]
    pub const fn single(value: i64) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    #[inline]
    #[must_use]
    pub const fn lo(self) -> i64 {
        self.lo
    }

    #[inline]
    #[must_use]
    pub const fn hi(self) -> i64 {
        self.hi
    }

    /// Number of integers covered, saturating at `u64::MAX`.
    #[must_use]
    pub const fn len(self) -> u64 {
        self.hi.abs_diff(self.lo).saturating_add(1)
    }

    /// Always `false`; an interval holds at least one value.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, value: i64) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// A set of integers stored as minimal disjoint closed intervals.
///
/// # Examples
///
/// ```rust
/// use region_algebra::IntervalSet;
///
/// let mut set: IntervalSet = [3, 4, 5, 7, 21].into_iter().collect();
/// set.remove(4);
/// assert_eq!(set.to_vec(), vec![3, 5, 7, 21]);
/// assert_eq!(set.next(7), Some(21));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Number of stored intervals (not values).
    #[inline]
    #[must_use]
    pub const fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Number of stored values, saturating at `u64::MAX`.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.intervals
            .iter()
            .fold(0_u64, |acc, iv| acc.saturating_add(iv.len()))
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Iterate over the stored intervals in increasing order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.intervals.iter().copied()
    }

    /// The interval at position `index`.
    pub fn interval(&self, index: usize) -> Result<Interval, IndexError> {
        self.intervals.get(index).copied().ok_or(IndexError {
            index,
            len: self.intervals.len(),
        })
    }

    /// Smallest stored value.
    #[must_use]
    pub fn first(&self) -> Option<i64> {
        self.intervals.first().map(|iv| iv.lo)
    }

    /// Largest stored value.
    #[must_use]
    pub fn last(&self) -> Option<i64> {
        self.intervals.last().map(|iv| iv.hi)
    }

    /// Position of the interval holding `value`, if any.
    fn find(&self, value: i64) -> Option<usize> {
        let idx = self.intervals.partition_point(|iv| iv.hi < value);
        self.intervals
            .get(idx)
            .is_some_and(|iv| iv.lo <= value)
            .then_some(idx)
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.find(value).is_some()
    }

    /// Smallest stored value strictly greater than `after`.
    ///
    /// Returns the minimum of the set when `after` lies below everything, and
    /// `None` when `after` is at or above the maximum.
    #[must_use]
    pub fn next(&self, after: i64) -> Option<i64> {
        let idx = self.intervals.partition_point(|iv| iv.hi <= after);
        let iv = self.intervals.get(idx)?;
        // iv.hi > after, so after + 1 cannot overflow
        Some(if iv.lo > after { iv.lo } else { after + 1 })
    }

    /// Add a single value. Already-covered values are a no-op.
    pub fn insert(&mut self, value: i64) {
        self.insert_interval(Interval::single(value));
    }

    /// Add every value in `[lo, hi]`.
    pub fn insert_range(&mut self, lo: i64, hi: i64) -> Result<(), OrderError> {
        self.insert_interval(Interval::new(lo, hi)?);
        Ok(())
    }

    /// Add an interval, fusing it with every stored interval it touches.
    ///
    /// One insert can swallow any number of existing intervals: the new range
    /// is widened as each overlapping or adjacent neighbour is absorbed.
    pub fn insert_interval(&mut self, interval: Interval) {
        let start = self
            .intervals
            .partition_point(|cur| cur.hi.saturating_add(1) < interval.lo);

        let mut merged = interval;
        let mut end = start;
        while let Some(cur) = self.intervals.get(end)
            && cur.lo <= merged.hi.saturating_add(1)
        {
            merged.lo = merged.lo.min(cur.lo);
            merged.hi = merged.hi.max(cur.hi);
            end += 1;
        }

        self.intervals.splice(start..end, std::iter::once(merged));
    }

    /// Remove a single value, splitting or shrinking the interval holding it.
    pub fn remove(&mut self, value: i64) {
        let Some(idx) = self.find(value) else {
            return;
        };
        let cur = self.intervals[idx];
        match (cur.lo == value, cur.hi == value) {
            (true, true) => {
                self.intervals.remove(idx);
            }
            (true, false) => self.intervals[idx].lo = value + 1,
            (false, true) => self.intervals[idx].hi = value - 1,
            (false, false) => {
                self.intervals[idx].hi = value - 1;
                self.intervals.insert(
                    idx + 1,
                    Interval {
                        lo: value + 1,
                        hi: cur.hi,
                    },
                );
            }
        }
    }

    /// Remove every value in `[lo, hi]`.
    pub fn remove_range(&mut self, lo: i64, hi: i64) -> Result<(), OrderError> {
        let cut = Interval::new(lo, hi)?;
        let start = self.intervals.partition_point(|iv| iv.hi < cut.lo);
        let end = self.intervals.partition_point(|iv| iv.lo <= cut.hi);
        if start >= end {
            return Ok(());
        }

        let first = self.intervals[start];
        let last = self.intervals[end - 1];
        let mut kept = Vec::with_capacity(2);
        if first.lo < cut.lo {
            kept.push(Interval {
                lo: first.lo,
                hi: cut.lo - 1,
            });
        }
        if last.hi > cut.hi {
            kept.push(Interval {
                lo: cut.hi + 1,
                hi: last.hi,
            });
        }
        self.intervals.splice(start..end, kept);
        Ok(())
    }

    /// Fold every interval of `other` into `self`.
    pub fn union(&mut self, other: &Self) {
        for iv in &other.intervals {
            self.insert_interval(*iv);
        }
    }

    /// Lazily iterate over every stored value in increasing order.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.intervals.iter().flat_map(|iv| iv.lo..=iv.hi)
    }

    /// Expand every interval. Meant for small sets; use [`values`](Self::values)
    /// or [`next`](Self::next) for large ranges.
    #[must_use]
    pub fn to_vec(&self) -> Vec<i64> {
        self.values().collect()
    }
}

impl FromIterator<i64> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<i64> for IntervalSet {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

/// Bracketed literal: singletons bare, ranges as `[lo hi]`.
impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if iv.lo == iv.hi {
                write!(f, "{}", iv.lo)?;
            } else {
                write!(f, "[{} {}]", iv.lo, iv.hi)?;
            }
        }
        Ok(())
    }
}

/// Parse `"1 3 [5 9] 12"`: bare integers and `[lo hi]` pairs.
impl FromStr for IntervalSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spaced = s.replace('[', " [ ").replace(']', " ] ");
        let tokens: Vec<&str> = spaced.split_whitespace().collect();
        let integer = |position: usize| -> Result<i64, ParseError> {
            let token = tokens.get(position).copied().unwrap_or_default();
            token.parse().map_err(|_| ParseError::InvalidToken {
                token: token.to_string(),
                position,
            })
        };

        let mut set = Self::new();
        let mut pos = 0;
        while pos < tokens.len() {
            match tokens[pos] {
                "[" => {
                    if tokens.len() < pos + 4 {
                        return Err(ParseError::UnclosedGroup { position: pos }.into());
                    }
                    let lo = integer(pos + 1)?;
                    let hi = integer(pos + 2)?;
                    if tokens[pos + 3] != "]" {
                        return Err(ParseError::UnclosedGroup { position: pos }.into());
                    }
                    set.insert_range(lo, hi)?;
                    pos += 4;
                }
                "]" => return Err(ParseError::UnexpectedClose { position: pos }.into()),
                _ => {
                    set.insert(integer(pos)?);
                    pos += 1;
                }
            }
        }
        Ok(set)
    }
}
