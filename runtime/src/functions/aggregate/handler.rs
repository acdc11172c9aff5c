use std::fmt::{Display, Formatter};

use aggfunc_common::time::Timestamp;
use serde::{Deserialize, Serialize};

use crate::functions::aggregate::incremental::{
    AvgAccumulator, AvgAggFunc, CountAggFunc, FirstValueAggFunc, LastValueAggFunc,
    SumAccumulator, SumAggFunc,
};
use crate::functions::aggregate::{
    AggFunc, AggFuncWithLimit, AggregateFunctionKind, RawDataAccumulator,
};
use crate::runtime_error::{RuntimeError, RuntimeResult};
use crate::types::{AggregateValue, DataType};

/// All the configurable aggregation functions over `f64` samples.
/// Using an enum so that handlers can be chosen at runtime and still be `Send`.
#[derive(Debug, Clone)]
pub enum AggregationHandler {
    Sum(SumAggFunc<f64>),
    Count(CountAggFunc<f64>),
    Avg(AvgAggFunc<f64>),
    FirstValue(FirstValueAggFunc<f64>),
    LastValue(LastValueAggFunc<f64>),
    Limited(Box<AggFuncWithLimit<AggregationHandler>>),
}

/// Accumulator created by an [`AggregationHandler`].
///
/// `first_value`, `last_value` and limited handlers all keep raw history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerAccumulator {
    Sum(SumAccumulator<f64>),
    Count(u64),
    Avg(AvgAccumulator),
    Raw(RawDataAccumulator<f64>),
}

impl HandlerAccumulator {
    fn variant_name(&self) -> &'static str {
        match self {
            HandlerAccumulator::Sum(_) => "sum",
            HandlerAccumulator::Count(_) => "count",
            HandlerAccumulator::Avg(_) => "avg",
            HandlerAccumulator::Raw(_) => "raw",
        }
    }
}

impl TryFrom<&str> for AggregationHandler {
    type Error = RuntimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let kind = AggregateFunctionKind::from_name(value)?;
        Ok(AggregationHandler::new(kind))
    }
}

impl From<AggregateFunctionKind> for AggregationHandler {
    fn from(kind: AggregateFunctionKind) -> Self {
        AggregationHandler::new(kind)
    }
}

impl AggregationHandler {
    pub fn new(kind: AggregateFunctionKind) -> Self {
        use AggregationHandler::*;
        match kind {
            AggregateFunctionKind::Sum => Sum(SumAggFunc::new()),
            AggregateFunctionKind::Count => Count(CountAggFunc::new()),
            AggregateFunctionKind::Avg => Avg(AvgAggFunc::new()),
            AggregateFunctionKind::FirstValue => FirstValue(FirstValueAggFunc::new()),
            AggregateFunctionKind::LastValue => LastValue(LastValueAggFunc::new()),
        }
    }

    /// Restricts the handler to the `limit` most recent records.
    pub fn with_limit(self, limit: usize) -> RuntimeResult<Self> {
        let limited = AggFuncWithLimit::new(self, limit)?;
        Ok(AggregationHandler::Limited(Box::new(limited)))
    }

    /// The underlying function, looking through any limit.
    pub fn kind(&self) -> AggregateFunctionKind {
        use AggregationHandler::*;
        match self {
            Sum(_) => AggregateFunctionKind::Sum,
            Count(_) => AggregateFunctionKind::Count,
            Avg(_) => AggregateFunctionKind::Avg,
            FirstValue(_) => AggregateFunctionKind::FirstValue,
            LastValue(_) => AggregateFunctionKind::LastValue,
            Limited(f) => f.inner().kind(),
        }
    }

    /// The tightest limit applied, if any.
    pub fn limit(&self) -> Option<usize> {
        match self {
            AggregationHandler::Limited(f) => match f.inner().limit() {
                Some(inner) => Some(inner.min(f.limit())),
                None => Some(f.limit()),
            },
            _ => None,
        }
    }
}

impl Display for AggregationHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.limit() {
            Some(limit) => write!(f, "{}(limit={})", self.kind(), limit),
            None => write!(f, "{}", self.kind()),
        }
    }
}

fn mismatch(handler: &AggregationHandler, acc: &HandlerAccumulator) -> ! {
    // accumulators are only ever created by their handler
    unreachable!(
        "BUG: {} handler used with a {} accumulator",
        handler,
        acc.variant_name()
    )
}

impl AggFunc for AggregationHandler {
    type Input = f64;
    type Output = AggregateValue;
    type Accumulator = HandlerAccumulator;

    fn create_accumulator(&self) -> HandlerAccumulator {
        use AggregationHandler::*;
        match self {
            Sum(f) => HandlerAccumulator::Sum(f.create_accumulator()),
            Count(f) => HandlerAccumulator::Count(f.create_accumulator()),
            Avg(f) => HandlerAccumulator::Avg(f.create_accumulator()),
            FirstValue(f) => HandlerAccumulator::Raw(f.create_accumulator()),
            LastValue(f) => HandlerAccumulator::Raw(f.create_accumulator()),
            Limited(f) => HandlerAccumulator::Raw(f.create_accumulator()),
        }
    }

    fn add(&self, acc: &mut HandlerAccumulator, value: f64, timestamp: Timestamp) {
        use AggregationHandler::*;
        match (self, acc) {
            (Sum(f), HandlerAccumulator::Sum(acc)) => f.add(acc, value, timestamp),
            (Count(f), HandlerAccumulator::Count(acc)) => f.add(acc, value, timestamp),
            (Avg(f), HandlerAccumulator::Avg(acc)) => f.add(acc, value, timestamp),
            (FirstValue(f), HandlerAccumulator::Raw(acc)) => f.add(acc, value, timestamp),
            (LastValue(f), HandlerAccumulator::Raw(acc)) => f.add(acc, value, timestamp),
            (Limited(f), HandlerAccumulator::Raw(acc)) => f.add(acc, value, timestamp),
            (handler, acc) => mismatch(handler, acc),
        }
    }

    fn retract(&self, acc: &mut HandlerAccumulator, value: &f64) -> RuntimeResult<()> {
        use AggregationHandler::*;
        match (self, acc) {
            (Sum(f), HandlerAccumulator::Sum(acc)) => f.retract(acc, value),
            (Count(f), HandlerAccumulator::Count(acc)) => f.retract(acc, value),
            (Avg(f), HandlerAccumulator::Avg(acc)) => f.retract(acc, value),
            (FirstValue(f), HandlerAccumulator::Raw(acc)) => f.retract(acc, value),
            (LastValue(f), HandlerAccumulator::Raw(acc)) => f.retract(acc, value),
            (Limited(f), HandlerAccumulator::Raw(acc)) => f.retract(acc, value),
            (handler, acc) => mismatch(handler, acc),
        }
    }

    fn retract_accumulator(
        &self,
        target: &mut HandlerAccumulator,
        source: &HandlerAccumulator,
    ) -> RuntimeResult<()> {
        use AggregationHandler::*;
        use HandlerAccumulator as Acc;
        match (self, target, source) {
            (Sum(f), Acc::Sum(dst), Acc::Sum(src)) => f.retract_accumulator(dst, src),
            (Count(f), Acc::Count(dst), Acc::Count(src)) => f.retract_accumulator(dst, src),
            (Avg(f), Acc::Avg(dst), Acc::Avg(src)) => f.retract_accumulator(dst, src),
            (FirstValue(f), Acc::Raw(dst), Acc::Raw(src)) => f.retract_accumulator(dst, src),
            (LastValue(f), Acc::Raw(dst), Acc::Raw(src)) => f.retract_accumulator(dst, src),
            (Limited(f), Acc::Raw(dst), Acc::Raw(src)) => f.retract_accumulator(dst, src),
            (handler, _, src) => mismatch(handler, src),
        }
    }

    fn merge(&self, target: &mut HandlerAccumulator, source: &HandlerAccumulator) {
        use AggregationHandler::*;
        use HandlerAccumulator as Acc;
        match (self, target, source) {
            (Sum(f), Acc::Sum(dst), Acc::Sum(src)) => f.merge(dst, src),
            (Count(f), Acc::Count(dst), Acc::Count(src)) => f.merge(dst, src),
            (Avg(f), Acc::Avg(dst), Acc::Avg(src)) => f.merge(dst, src),
            (FirstValue(f), Acc::Raw(dst), Acc::Raw(src)) => f.merge(dst, src),
            (LastValue(f), Acc::Raw(dst), Acc::Raw(src)) => f.merge(dst, src),
            (Limited(f), Acc::Raw(dst), Acc::Raw(src)) => f.merge(dst, src),
            (handler, _, src) => mismatch(handler, src),
        }
    }

    fn get_result(&self, acc: &HandlerAccumulator) -> AggregateValue {
        use AggregationHandler::*;
        match (self, acc) {
            (Sum(f), HandlerAccumulator::Sum(acc)) => f.get_result(acc).into(),
            (Count(f), HandlerAccumulator::Count(acc)) => f.get_result(acc).into(),
            (Avg(f), HandlerAccumulator::Avg(acc)) => {
                if acc.count == 0 {
                    AggregateValue::Null
                } else {
                    f.get_result(acc).into()
                }
            }
            (FirstValue(f), HandlerAccumulator::Raw(acc)) => f.get_result(acc).into(),
            (LastValue(f), HandlerAccumulator::Raw(acc)) => f.get_result(acc).into(),
            (Limited(f), HandlerAccumulator::Raw(acc)) => f.get_result(acc),
            (handler, acc) => mismatch(handler, acc),
        }
    }

    fn result_datatype(&self) -> DataType {
        use AggregationHandler::*;
        match self {
            Sum(f) => f.result_datatype(),
            Count(f) => f.result_datatype(),
            Avg(f) => DataType::nullable(f.result_datatype()),
            FirstValue(f) => f.result_datatype(),
            LastValue(f) => f.result_datatype(),
            Limited(f) => f.result_datatype(),
        }
    }

    fn accumulator_datatype(&self) -> DataType {
        use AggregationHandler::*;
        match self {
            Sum(f) => f.accumulator_datatype(),
            Count(f) => f.accumulator_datatype(),
            Avg(f) => f.accumulator_datatype(),
            FirstValue(f) => f.accumulator_datatype(),
            LastValue(f) => f.accumulator_datatype(),
            Limited(f) => f.accumulator_datatype(),
        }
    }
}
