use std::fmt::Display;

use aggfunc_common::time::Timestamp;
use tracing::warn;

use crate::runtime_error::{RuntimeError, RuntimeResult};
use crate::types::DataType;

/// An incrementally maintained aggregate.
///
/// The function itself is stateless configuration; all state lives in the accumulator it
/// creates, and each accumulator is owned by exactly one key/window. Accumulators of the same
/// function may be combined with [`AggFunc::merge`] to unify partial results computed by
/// different workers, and contributions may be undone with [`AggFunc::retract`] as long as
/// they are retracted in the order they were added.
pub trait AggFunc {
    type Input;
    type Output;
    type Accumulator;

    /// Returns a fresh, empty accumulator.
    fn create_accumulator(&self) -> Self::Accumulator;

    /// Incorporates one record into `acc`.
    fn add(&self, acc: &mut Self::Accumulator, value: Self::Input, timestamp: Timestamp);

    /// Undoes a previously added record equal to `value`.
    ///
    /// Records must be retracted first-in-first-out. Implementations that can detect a
    /// violation return [`RuntimeError::ContractViolation`] and leave `acc` untouched.
    fn retract(&self, acc: &mut Self::Accumulator, value: &Self::Input) -> RuntimeResult<()>;

    /// Undoes the contributions of a partial accumulator previously merged into `target`,
    /// as if each of its records had been retracted in order.
    fn retract_accumulator(
        &self,
        target: &mut Self::Accumulator,
        source: &Self::Accumulator,
    ) -> RuntimeResult<()>;

    /// Folds `source` into `target`. `source` is not modified.
    fn merge(&self, target: &mut Self::Accumulator, source: &Self::Accumulator);

    /// Computes the current result. Does not modify `acc`.
    fn get_result(&self, acc: &Self::Accumulator) -> Self::Output;

    fn result_datatype(&self) -> DataType;

    /// Shape of the accumulator, so that the host can checkpoint it.
    fn accumulator_datatype(&self) -> DataType;
}

pub(crate) fn contract_violation(msg: impl Display) -> RuntimeError {
    let msg = msg.to_string();
    warn!(reason = %msg, "aggregate contract violated");
    RuntimeError::ContractViolation(msg)
}
