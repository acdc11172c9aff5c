//! Incremental aggregate functions for streaming windows.
//!
//! Every aggregate implements [`AggFunc`]: records are added to an accumulator, may later be
//! retracted in the order they were added, and partial accumulators can be merged. On top of
//! that contract [`AggFuncWithLimit`] restricts any aggregate to the most recent `limit`
//! records by timestamp.
extern crate aggfunc_common;

mod runtime_error;

pub mod functions;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggfunc_common::time::Timestamp;
pub use functions::aggregate::{
    AggFunc, AggFuncWithLimit, AggregateFunctionKind, AggregationConfig, AggregationHandler,
    HandlerAccumulator, KeyedAggrContext, RawDataAccumulator,
};
pub use runtime_error::*;
pub use types::*;
