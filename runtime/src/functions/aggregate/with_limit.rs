use std::fmt::Debug;

use aggfunc_common::time::Timestamp;
use tracing::{field, trace_span};

use crate::functions::aggregate::{AggFunc, RawDataAccumulator};
use crate::runtime_error::{RuntimeError, RuntimeResult};
use crate::types::{DataType, HasDataType};

/// Aggregation function decorator that only aggregates up to `limit` most recent records.
///
/// The decorator stores every record it is given and replays the most recent `limit` of them
/// through a fresh accumulator of the wrapped function whenever a result is requested. The
/// window is replayed in buffer order, so records sharing a timestamp reach the wrapped
/// function in the order they were added. Older
/// records are kept around since a later retraction (which works on the full history, oldest
/// first) must still be able to find them.
///
/// Memory grows with the number of records that have not been retracted, not with `limit`.
#[derive(Debug, Clone)]
pub struct AggFuncWithLimit<F> {
    agg_func: F,
    limit: usize,
}

impl<F: AggFunc> AggFuncWithLimit<F> {
    pub fn new(agg_func: F, limit: usize) -> RuntimeResult<Self> {
        if limit == 0 {
            return Err(RuntimeError::InvalidLimit(limit));
        }
        Ok(Self { agg_func, limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn inner(&self) -> &F {
        &self.agg_func
    }
}

impl<F> AggFunc for AggFuncWithLimit<F>
where
    F: AggFunc,
    F::Input: Clone + PartialEq + Debug + HasDataType,
{
    type Input = F::Input;
    type Output = F::Output;
    type Accumulator = RawDataAccumulator<F::Input>;

    fn create_accumulator(&self) -> Self::Accumulator {
        RawDataAccumulator::new()
    }

    fn add(&self, acc: &mut Self::Accumulator, value: Self::Input, timestamp: Timestamp) {
        acc.push(value, timestamp);
    }

    fn retract(&self, acc: &mut Self::Accumulator, value: &Self::Input) -> RuntimeResult<()> {
        acc.pop_oldest(value).map(|_| ())
    }

    fn retract_accumulator(
        &self,
        target: &mut Self::Accumulator,
        source: &Self::Accumulator,
    ) -> RuntimeResult<()> {
        let _span = trace_span!(
            "limit_retract_accumulator",
            buffered = target.len(),
            retracted = source.len()
        )
        .entered();
        target.retract_prefix(source)
    }

    fn merge(&self, target: &mut Self::Accumulator, source: &Self::Accumulator) {
        let _span = trace_span!(
            "limit_merge",
            target = target.len(),
            source = source.len()
        )
        .entered();
        target.merge_from(source);
    }

    fn get_result(&self, acc: &Self::Accumulator) -> Self::Output {
        let span = trace_span!(
            "limit_get_result",
            limit = self.limit,
            buffered = acc.len(),
            fed = field::Empty
        )
        .entered();

        let mut inner = self.agg_func.create_accumulator();
        let mut fed = 0;
        let skip = acc.len().saturating_sub(self.limit);
        for (value, timestamp) in acc.iter().skip(skip) {
            self.agg_func.add(&mut inner, value.clone(), *timestamp);
            fed += 1;
        }
        span.record("fed", fed);

        self.agg_func.get_result(&inner)
    }

    fn result_datatype(&self) -> DataType {
        self.agg_func.result_datatype()
    }

    fn accumulator_datatype(&self) -> DataType {
        RawDataAccumulator::<F::Input>::data_type()
    }
}
