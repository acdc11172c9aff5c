use std::marker::PhantomData;

use aggfunc_common::time::Timestamp;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::functions::aggregate::agg_func::contract_violation;
use crate::functions::aggregate::AggFunc;
use crate::runtime_error::RuntimeResult;
use crate::types::DataType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AvgAccumulator {
    pub sum: f64,
    pub count: u64,
}

/// Calculates the arithmetic mean of the values added so far. NaN when empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvgAggFunc<T> {
    _marker: PhantomData<T>,
}

impl<T> AvgAggFunc<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[inline]
fn to_f64<T: ToPrimitive>(value: &T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

impl<T: ToPrimitive> AggFunc for AvgAggFunc<T> {
    type Input = T;
    type Output = f64;
    type Accumulator = AvgAccumulator;

    fn create_accumulator(&self) -> AvgAccumulator {
        AvgAccumulator::default()
    }

    fn add(&self, acc: &mut AvgAccumulator, value: T, _timestamp: Timestamp) {
        acc.sum += to_f64(&value);
        acc.count += 1;
    }

    fn retract(&self, acc: &mut AvgAccumulator, value: &T) -> RuntimeResult<()> {
        if acc.count == 0 {
            return Err(contract_violation("cannot retract from an empty avg"));
        }
        acc.sum -= to_f64(value);
        acc.count -= 1;
        if acc.count == 0 {
            // drop accumulated rounding error
            acc.sum = 0.0;
        }
        Ok(())
    }

    fn retract_accumulator(
        &self,
        target: &mut AvgAccumulator,
        source: &AvgAccumulator,
    ) -> RuntimeResult<()> {
        if source.count > target.count {
            return Err(contract_violation(format!(
                "cannot retract {} values from an avg over {}",
                source.count, target.count
            )));
        }
        target.sum -= source.sum;
        target.count -= source.count;
        if target.count == 0 {
            target.sum = 0.0;
        }
        Ok(())
    }

    fn merge(&self, target: &mut AvgAccumulator, source: &AvgAccumulator) {
        target.sum += source.sum;
        target.count += source.count;
    }

    fn get_result(&self, acc: &AvgAccumulator) -> f64 {
        if acc.count == 0 {
            return f64::NAN;
        }
        acc.sum / acc.count as f64
    }

    fn result_datatype(&self) -> DataType {
        DataType::Float64
    }

    fn accumulator_datatype(&self) -> DataType {
        DataType::Tuple(vec![DataType::Float64, DataType::UInt64])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avg() {
        let f = AvgAggFunc::<i32>::new();
        let mut acc = f.create_accumulator();
        assert!(f.get_result(&acc).is_nan());

        f.add(&mut acc, 1, 1);
        f.add(&mut acc, 2, 2);
        f.add(&mut acc, 6, 3);
        assert_eq!(f.get_result(&acc), 3.0);

        let mut other = f.create_accumulator();
        f.add(&mut other, 11, 4);
        f.merge(&mut acc, &other);
        assert_eq!(f.get_result(&acc), 5.0);

        f.retract_accumulator(&mut acc, &other).unwrap();
        f.retract(&mut acc, &1).unwrap();
        assert_eq!(f.get_result(&acc), 4.0);
        f.retract(&mut acc, &2).unwrap();
        f.retract(&mut acc, &6).unwrap();
        assert!(f.get_result(&acc).is_nan());
        assert!(f.retract(&mut acc, &6).is_err());
    }
}
