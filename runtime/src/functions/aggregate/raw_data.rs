use std::cmp::Ordering;
use std::collections::vec_deque::Iter;
use std::collections::VecDeque;
use std::fmt::Debug;

use aggfunc_common::sorted::{insert_sorted_by, merge_sorted_by};
use aggfunc_common::time::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::functions::aggregate::agg_func::contract_violation;
use crate::runtime_error::RuntimeResult;
use crate::types::{DataType, HasDataType};

/// Accumulator that keeps raw records and their timestamps, ordered by timestamp.
///
/// Records with equal timestamps keep their insertion order. Nothing is ever evicted
/// implicitly: entries only leave the buffer through retraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataAccumulator<T> {
    entries: VecDeque<(T, Timestamp)>,
}

impl<T> Default for RawDataAccumulator<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

fn by_timestamp<T>(a: &(T, Timestamp), b: &(T, Timestamp)) -> Ordering {
    a.1.cmp(&b.1)
}

impl<T> RawDataAccumulator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending timestamp order.
    pub fn iter(&self) -> Iter<'_, (T, Timestamp)> {
        self.entries.iter()
    }

    /// The oldest entry.
    pub fn first(&self) -> Option<&(T, Timestamp)> {
        self.entries.front()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&(T, Timestamp)> {
        self.entries.back()
    }

    /// Adds a record, keeping the buffer ordered by timestamp.
    ///
    /// Records arriving in timestamp order are appended in O(1). Late records fall back to
    /// a binary search plus an O(n) shift.
    pub fn push(&mut self, value: T, timestamp: Timestamp) {
        match self.entries.back().map(|(_, ts)| *ts) {
            Some(last) if timestamp < last => {
                trace!(timestamp, last, "out of order record");
                insert_sorted_by(&mut self.entries, (value, timestamp), by_timestamp);
            }
            _ => self.entries.push_back((value, timestamp)),
        }
    }
}

impl<T: Clone> RawDataAccumulator<T> {
    /// Replaces the contents with the stable sorted union of `self` and `other`.
    pub fn merge_from(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.entries.extend(other.entries.iter().cloned());
            return;
        }
        self.entries = merge_sorted_by(&self.entries, &other.entries, by_timestamp);
    }
}

impl<T: PartialEq + Debug> RawDataAccumulator<T> {
    /// Removes the oldest entry, which must hold `value`.
    pub fn pop_oldest(&mut self, value: &T) -> RuntimeResult<(T, Timestamp)> {
        let Some((oldest, ts)) = self.entries.front() else {
            return Err(contract_violation(format!(
                "cannot retract {:?}: no records left",
                value
            )));
        };
        if oldest != value {
            return Err(contract_violation(format!(
                "values must be retracted in the order they were added: expected {:?} (ts={}), got {:?}",
                oldest, ts, value
            )));
        }
        self.entries
            .pop_front()
            .ok_or_else(|| contract_violation("no records left"))
    }

    /// Removes the leading run of entries equal to `other`'s entries.
    ///
    /// Either all of `other` is retracted or, on mismatch, nothing is.
    pub fn retract_prefix(&mut self, other: &Self) -> RuntimeResult<()> {
        let mut ours = self.entries.iter();
        for (i, theirs) in other.entries.iter().enumerate() {
            match ours.next() {
                Some(entry) if entry == theirs => {}
                Some(entry) => {
                    return Err(contract_violation(format!(
                        "values must be retracted in the order they were added: entry {} is {:?}, got {:?}",
                        i, entry, theirs
                    )))
                }
                None => {
                    return Err(contract_violation(format!(
                        "cannot retract {} records: only {} left",
                        other.len(),
                        self.len()
                    )))
                }
            }
        }
        self.entries.drain(..other.len());
        Ok(())
    }
}

impl<T> RawDataAccumulator<T>
where
    T: HasDataType,
{
    pub fn data_type() -> DataType {
        DataType::list(DataType::Tuple(vec![T::data_type(), Timestamp::data_type()]))
    }
}

impl<T> FromIterator<(T, Timestamp)> for RawDataAccumulator<T> {
    fn from_iter<I: IntoIterator<Item = (T, Timestamp)>>(iter: I) -> Self {
        let mut acc = Self::new();
        for (value, timestamp) in iter {
            acc.push(value, timestamp);
        }
        acc
    }
}

impl<'a, T> IntoIterator for &'a RawDataAccumulator<T> {
    type Item = &'a (T, Timestamp);
    type IntoIter = Iter<'a, (T, Timestamp)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
