//! Opaque type descriptors handed to the host runtime.
//!
//! The runtime never interprets a [`DataType`]; it only builds one so the host can map results
//! and accumulator state onto its own type system (for checkpointing, planning etc).
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
    /// A value which may be absent.
    Nullable(Box<DataType>),
    List(Box<DataType>),
    /// Fixed arity product; used for `(value, timestamp)` pairs and multi-field accumulators.
    Tuple(Vec<DataType>),
}

impl DataType {
    pub fn nullable(inner: DataType) -> Self {
        DataType::Nullable(Box::new(inner))
    }

    pub fn list(inner: DataType) -> Self {
        DataType::List(Box::new(inner))
    }

    pub fn is_numeric(&self) -> bool {
        use DataType::*;
        matches!(self, Int32 | Int64 | UInt64 | Float32 | Float64)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Int32 => write!(f, "INT"),
            DataType::Int64 => write!(f, "BIGINT"),
            DataType::UInt64 => write!(f, "UBIGINT"),
            DataType::Float32 => write!(f, "FLOAT"),
            DataType::Float64 => write!(f, "DOUBLE"),
            DataType::String => write!(f, "STRING"),
            DataType::Nullable(inner) => write!(f, "{} NULL", inner),
            DataType::List(inner) => write!(f, "ARRAY<{}>", inner),
            DataType::Tuple(fields) => {
                write!(f, "ROW<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                write!(f, ">")
            }
        }
    }
}

/// Values with a statically known [`DataType`].
pub trait HasDataType {
    fn data_type() -> DataType;
}

macro_rules! impl_has_data_type {
    ($($t:ty => $dt:expr),* $(,)?) => {
        $(
            impl HasDataType for $t {
                fn data_type() -> DataType {
                    $dt
                }
            }
        )*
    };
}

impl_has_data_type!(
    bool => DataType::Boolean,
    i32 => DataType::Int32,
    i64 => DataType::Int64,
    u64 => DataType::UInt64,
    f32 => DataType::Float32,
    f64 => DataType::Float64,
    String => DataType::String,
);

impl<T: HasDataType> HasDataType for Option<T> {
    fn data_type() -> DataType {
        DataType::nullable(T::data_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let dt = DataType::list(DataType::Tuple(vec![DataType::Float64, DataType::Int64]));
        assert_eq!(dt.to_string(), "ARRAY<ROW<DOUBLE, BIGINT>>");
        assert_eq!(Option::<i32>::data_type().to_string(), "INT NULL");
    }

    #[test]
    fn test_is_numeric() {
        assert!(f64::data_type().is_numeric());
        assert!(!String::data_type().is_numeric());
        assert!(!DataType::nullable(DataType::Int64).is_numeric());
    }
}
