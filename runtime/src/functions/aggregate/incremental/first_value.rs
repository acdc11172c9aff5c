use std::fmt::Debug;
use std::marker::PhantomData;

use aggfunc_common::time::Timestamp;

use crate::functions::aggregate::{AggFunc, RawDataAccumulator};
use crate::runtime_error::RuntimeResult;
use crate::types::{DataType, HasDataType};

/// Returns the value with the earliest timestamp. On ties the value added first wins.
///
/// The result depends on timestamps rather than on the multiset of values, so the raw records
/// are kept: merging partial accumulators then reconciles by timestamp, and retracting the
/// current first value exposes the next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstValueAggFunc<T> {
    _marker: PhantomData<T>,
}

impl<T> FirstValueAggFunc<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> AggFunc for FirstValueAggFunc<T>
where
    T: Clone + PartialEq + Debug + HasDataType,
{
    type Input = T;
    type Output = Option<T>;
    type Accumulator = RawDataAccumulator<T>;

    fn create_accumulator(&self) -> Self::Accumulator {
        RawDataAccumulator::new()
    }

    fn add(&self, acc: &mut Self::Accumulator, value: T, timestamp: Timestamp) {
        acc.push(value, timestamp);
    }

    fn retract(&self, acc: &mut Self::Accumulator, value: &T) -> RuntimeResult<()> {
        acc.pop_oldest(value).map(|_| ())
    }

    fn retract_accumulator(
        &self,
        target: &mut Self::Accumulator,
        source: &Self::Accumulator,
    ) -> RuntimeResult<()> {
        target.retract_prefix(source)
    }

    fn merge(&self, target: &mut Self::Accumulator, source: &Self::Accumulator) {
        target.merge_from(source);
    }

    fn get_result(&self, acc: &Self::Accumulator) -> Option<T> {
        acc.first().map(|(value, _)| value.clone())
    }

    fn result_datatype(&self) -> DataType {
        DataType::nullable(T::data_type())
    }

    fn accumulator_datatype(&self) -> DataType {
        RawDataAccumulator::<T>::data_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value() {
        let f = FirstValueAggFunc::<i32>::new();
        let mut acc = f.create_accumulator();
        assert_eq!(f.get_result(&acc), None);

        f.add(&mut acc, 2, 20);
        f.add(&mut acc, 3, 30);
        assert_eq!(f.get_result(&acc), Some(2));

        // late arrival becomes the first value
        f.add(&mut acc, 1, 10);
        assert_eq!(f.get_result(&acc), Some(1));

        f.retract(&mut acc, &1).unwrap();
        assert_eq!(f.get_result(&acc), Some(2));
        assert!(f.retract(&mut acc, &3).unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_earliest_timestamp_wins_on_merge() {
        let f = FirstValueAggFunc::<i32>::new();
        let mut a = f.create_accumulator();
        let mut b = f.create_accumulator();
        f.add(&mut a, 5, 50);
        f.add(&mut b, 4, 40);
        f.add(&mut b, 6, 50);

        f.merge(&mut a, &b);
        assert_eq!(f.get_result(&a), Some(4));

        // b was interleaved with a, so it is not a prefix of the merged history
        assert!(f.retract_accumulator(&mut a, &b).is_err());
        f.retract(&mut a, &4).unwrap();
        assert_eq!(f.get_result(&a), Some(5));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let f = FirstValueAggFunc::<String>::new();
        let mut acc = f.create_accumulator();
        f.add(&mut acc, "x".to_string(), 7);
        f.add(&mut acc, "y".to_string(), 7);
        assert_eq!(f.get_result(&acc), Some("x".to_string()));
        assert_eq!(f.result_datatype(), DataType::nullable(DataType::String));
    }
}
