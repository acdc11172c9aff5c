use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Dynamically typed aggregation result, produced by [`crate::functions::aggregate::AggregationHandler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateValue {
    #[default]
    Null,
    Int64(i64),
    Float64(f64),
}

impl From<i64> for AggregateValue {
    fn from(v: i64) -> Self {
        AggregateValue::Int64(v)
    }
}

impl From<f64> for AggregateValue {
    fn from(v: f64) -> Self {
        AggregateValue::Float64(v)
    }
}

impl<T: Into<AggregateValue>> From<Option<T>> for AggregateValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => AggregateValue::Null,
        }
    }
}

impl Display for AggregateValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateValue::Null => write!(f, "null"),
            AggregateValue::Int64(v) => write!(f, "{}", v),
            AggregateValue::Float64(v) => write!(f, "{}", v),
        }
    }
}
