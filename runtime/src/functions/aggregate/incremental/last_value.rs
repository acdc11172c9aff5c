use std::fmt::Debug;
use std::marker::PhantomData;

use aggfunc_common::time::Timestamp;

use crate::functions::aggregate::{AggFunc, RawDataAccumulator};
use crate::runtime_error::RuntimeResult;
use crate::types::{DataType, HasDataType};

/// Returns the value with the latest timestamp. On ties the value added last wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastValueAggFunc<T> {
    _marker: PhantomData<T>,
}

impl<T> LastValueAggFunc<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> AggFunc for LastValueAggFunc<T>
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
        acc.last().map(|(value, _)| value.clone())
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
    fn test_last_value() {
        let f = LastValueAggFunc::<f64>::new();
        let mut acc = f.create_accumulator();
        assert_eq!(f.get_result(&acc), None);

        f.add(&mut acc, 1.0, 10);
        f.add(&mut acc, 3.0, 30);
        f.add(&mut acc, 2.0, 20);
        assert_eq!(f.get_result(&acc), Some(3.0));

        f.add(&mut acc, 4.0, 30);
        assert_eq!(f.get_result(&acc), Some(4.0));

        let mut other = f.create_accumulator();
        f.add(&mut other, 9.0, 90);
        f.merge(&mut acc, &other);
        assert_eq!(f.get_result(&acc), Some(9.0));
        assert_eq!(other.len(), 1);
    }
}
