use std::marker::PhantomData;

use aggfunc_common::time::Timestamp;
use num_traits::Num;
use serde::{Deserialize, Serialize};

use crate::functions::aggregate::agg_func::contract_violation;
use crate::functions::aggregate::AggFunc;
use crate::runtime_error::RuntimeResult;
use crate::types::{DataType, HasDataType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumAccumulator<T> {
    pub sum: T,
    pub count: u64,
}

/// Calculates the sum of the values added so far.
///
/// Integer sums use plain `+`, so overflow is left to the caller: it panics in debug builds
/// and wraps in release builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumAggFunc<T> {
    _marker: PhantomData<T>,
}

impl<T> SumAggFunc<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> AggFunc for SumAggFunc<T>
where
    T: Num + Copy + HasDataType,
{
    type Input = T;
    type Output = T;
    type Accumulator = SumAccumulator<T>;

    fn create_accumulator(&self) -> Self::Accumulator {
        SumAccumulator {
            sum: T::zero(),
            count: 0,
        }
    }

    fn add(&self, acc: &mut Self::Accumulator, value: T, _timestamp: Timestamp) {
        acc.sum = acc.sum + value;
        acc.count += 1;
    }

    fn retract(&self, acc: &mut Self::Accumulator, value: &T) -> RuntimeResult<()> {
        if acc.count == 0 {
            return Err(contract_violation("cannot retract from an empty sum"));
        }
        acc.sum = acc.sum - *value;
        acc.count -= 1;
        if acc.count == 0 {
            acc.sum = T::zero();
        }
        Ok(())
    }

    fn retract_accumulator(
        &self,
        target: &mut Self::Accumulator,
        source: &Self::Accumulator,
    ) -> RuntimeResult<()> {
        if source.count > target.count {
            return Err(contract_violation(format!(
                "cannot retract {} values from a sum of {}",
                source.count, target.count
            )));
        }
        target.sum = target.sum - source.sum;
        target.count -= source.count;
        if target.count == 0 {
            target.sum = T::zero();
        }
        Ok(())
    }

    fn merge(&self, target: &mut Self::Accumulator, source: &Self::Accumulator) {
        target.sum = target.sum + source.sum;
        target.count += source.count;
    }

    fn get_result(&self, acc: &Self::Accumulator) -> T {
        acc.sum
    }

    fn result_datatype(&self) -> DataType {
        T::data_type()
    }

    fn accumulator_datatype(&self) -> DataType {
        DataType::Tuple(vec![T::data_type(), DataType::UInt64])
    }
}
