use std::error::Error;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, PartialEq, Clone, Error)]
pub enum RuntimeError {
    /// A retraction did not match the oldest contribution still held by the accumulator.
    #[error("Contract violation: {0}")]
    ContractViolation(String),
    #[error("Invalid limit `{0}`: must be greater than zero")]
    InvalidLimit(usize),
    #[error("Unknown function `{0}`")]
    UnknownFunction(String),
    #[error("{0}")]
    General(String),
}

impl RuntimeError {
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, RuntimeError::ContractViolation(_))
    }
}

impl From<&str> for RuntimeError {
    fn from(message: &str) -> Self {
        RuntimeError::General(String::from(message))
    }
}

impl From<String> for RuntimeError {
    fn from(message: String) -> Self {
        RuntimeError::General(message)
    }
}

impl<E: Error + 'static> From<(&str, E)> for RuntimeError {
    fn from((message, err): (&str, E)) -> Self {
        RuntimeError::General(format!("{}: {}", message, err))
    }
}
