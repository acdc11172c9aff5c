use serde::{Deserialize, Serialize};

use crate::functions::aggregate::{AggregateFunctionKind, AggregationHandler};
use crate::runtime_error::{RuntimeError, RuntimeResult};

/// Declarative description of an aggregation, e.g. as read from a job definition:
///
/// ```json
/// { "function": "sum", "limit": 10 }
/// ```
///
/// When `limit` is set only the `limit` most recent records (by timestamp) are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationConfig {
    pub function: AggregateFunctionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl AggregationConfig {
    pub fn new(function: AggregateFunctionKind) -> Self {
        Self {
            function,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(&self) -> RuntimeResult<AggregationHandler> {
        let handler = AggregationHandler::new(self.function);
        match self.limit {
            Some(limit) => handler.with_limit(limit),
            None => Ok(handler),
        }
    }
}

impl TryFrom<&str> for AggregationConfig {
    type Error = RuntimeError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        let function = AggregateFunctionKind::from_name(name)?;
        Ok(AggregationConfig::new(function))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deserialize() {
        let config: AggregationConfig =
            serde_json::from_str(r#"{ "function": "first_value", "limit": 3 }"#).unwrap();
        assert_eq!(
            config,
            AggregationConfig::new(AggregateFunctionKind::FirstValue).with_limit(3)
        );

        let config: AggregationConfig = serde_json::from_str(r#"{ "function": "count" }"#).unwrap();
        assert_eq!(config.limit, None);

        assert!(serde_json::from_str::<AggregationConfig>(r#"{ "function": "median" }"#).is_err());
        assert!(
            serde_json::from_str::<AggregationConfig>(r#"{ "function": "sum", "window": 1 }"#)
                .is_err()
        );
    }

    #[test]
    fn test_serialize_skips_missing_limit() {
        let json = serde_json::to_string(&AggregationConfig::new(AggregateFunctionKind::Avg)).unwrap();
        assert_eq!(json, r#"{"function":"avg"}"#);
    }

    #[test]
    fn test_build() {
        let handler = AggregationConfig::new(AggregateFunctionKind::Sum)
            .with_limit(2)
            .build()
            .unwrap();
        assert_eq!(handler.kind(), AggregateFunctionKind::Sum);
        assert_eq!(handler.limit(), Some(2));

        let handler = AggregationConfig::try_from("last_value").unwrap().build().unwrap();
        assert_eq!(handler.kind(), AggregateFunctionKind::LastValue);
        assert_eq!(handler.limit(), None);

        assert_eq!(
            AggregationConfig::new(AggregateFunctionKind::Sum)
                .with_limit(0)
                .build()
                .unwrap_err(),
            RuntimeError::InvalidLimit(0)
        );
        assert!(AggregationConfig::try_from("nope").is_err());
    }
}
