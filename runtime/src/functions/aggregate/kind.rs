use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::runtime_error::{RuntimeError, RuntimeResult};

/// Aggregate functions available through [`crate::functions::aggregate::AggregationConfig`].
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunctionKind {
    /// sum of the values
    Sum,
    /// number of records
    Count,
    /// arithmetic mean of the values
    Avg,
    /// value with the earliest timestamp
    FirstValue,
    /// value with the latest timestamp
    LastValue,
}

impl AggregateFunctionKind {
    pub const fn name(&self) -> &'static str {
        use AggregateFunctionKind::*;
        match self {
            Sum => "sum",
            Count => "count",
            Avg => "avg",
            FirstValue => "first_value",
            LastValue => "last_value",
        }
    }

    pub fn from_name(name: &str) -> RuntimeResult<Self> {
        name.parse::<AggregateFunctionKind>()
            .map_err(|_| RuntimeError::UnknownFunction(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;
    use test_case::test_case;

    use super::*;

    #[test_case("sum", AggregateFunctionKind::Sum)]
    #[test_case("COUNT", AggregateFunctionKind::Count)]
    #[test_case("Avg", AggregateFunctionKind::Avg)]
    #[test_case("first_value", AggregateFunctionKind::FirstValue)]
    #[test_case("LAST_VALUE", AggregateFunctionKind::LastValue)]
    fn test_from_name(name: &str, expected: AggregateFunctionKind) {
        assert_eq!(AggregateFunctionKind::from_name(name), Ok(expected));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            AggregateFunctionKind::from_name("median"),
            Err(RuntimeError::UnknownFunction("median".to_string()))
        );
    }

    #[test]
    fn test_name_matches_display() {
        for kind in AggregateFunctionKind::iter() {
            assert_eq!(kind.name(), kind.to_string());
            assert_eq!(AggregateFunctionKind::from_name(kind.name()), Ok(kind));
        }
    }
}
