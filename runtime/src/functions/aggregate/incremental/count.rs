use std::marker::PhantomData;

use aggfunc_common::time::Timestamp;

use crate::functions::aggregate::agg_func::contract_violation;
use crate::functions::aggregate::AggFunc;
use crate::runtime_error::RuntimeResult;
use crate::types::DataType;

/// Counts the records added so far, whatever their value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountAggFunc<T> {
    _marker: PhantomData<T>,
}

impl<T> CountAggFunc<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> AggFunc for CountAggFunc<T> {
    type Input = T;
    type Output = i64;
    type Accumulator = u64;

    fn create_accumulator(&self) -> u64 {
        0
    }

    fn add(&self, acc: &mut u64, _value: T, _timestamp: Timestamp) {
        *acc += 1;
    }

    fn retract(&self, acc: &mut u64, _value: &T) -> RuntimeResult<()> {
        if *acc == 0 {
            return Err(contract_violation("cannot retract from an empty count"));
        }
        *acc -= 1;
        Ok(())
    }

    fn retract_accumulator(&self, target: &mut u64, source: &u64) -> RuntimeResult<()> {
        if *source > *target {
            return Err(contract_violation(format!(
                "cannot retract {} records from a count of {}",
                source, target
            )));
        }
        *target -= *source;
        Ok(())
    }

    fn merge(&self, target: &mut u64, source: &u64) {
        *target += *source;
    }

    fn get_result(&self, acc: &u64) -> i64 {
        *acc as i64
    }

    fn result_datatype(&self) -> DataType {
        DataType::Int64
    }

    fn accumulator_datatype(&self) -> DataType {
        DataType::UInt64
    }
}
