//! Scalar type declarations for the model catalog.

use bizmodel_value::Value;
use serde::{Deserialize, Serialize};

/// Scalar data types a primitive property can declare.
///
/// Association properties carry no scalar type; their runtime values
/// are row ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Binary data.
    Bytes,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
}

impl ScalarType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarType::Int32 | ScalarType::Int64 | ScalarType::Float64
        )
    }

    /// Check if this type is a string-like type.
    pub fn is_string_like(&self) -> bool {
        matches!(self, ScalarType::String | ScalarType::Bytes)
    }

    /// Check whether a runtime value is acceptable for this type.
    ///
    /// `Null` is acceptable for every type; nullability is a property
    /// concern (`mandatory`), not a type concern.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (ScalarType::Bool, Value::Bool(_)) => true,
            (ScalarType::Int32, Value::Int32(_)) => true,
            (ScalarType::Int64, Value::Int64(_) | Value::Int32(_)) => true,
            (ScalarType::Float64, Value::Float64(_)) => true,
            (ScalarType::String, Value::String(_)) => true,
            (ScalarType::Bytes, Value::Bytes(_)) => true,
            (ScalarType::Timestamp, Value::Timestamp(_)) => true,
            (ScalarType::Uuid, Value::Uuid(_)) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_type_checks() {
        assert!(ScalarType::Int32.is_numeric());
        assert!(ScalarType::Float64.is_numeric());
        assert!(!ScalarType::String.is_numeric());
        assert!(!ScalarType::Bool.is_numeric());

        assert!(ScalarType::String.is_string_like());
        assert!(ScalarType::Bytes.is_string_like());
        assert!(!ScalarType::Int32.is_string_like());
    }

    #[test]
    fn test_matches_value() {
        assert!(ScalarType::Bool.matches(&Value::Bool(true)));
        assert!(ScalarType::Int64.matches(&Value::Int32(1))); // Widening
        assert!(!ScalarType::Int32.matches(&Value::Int64(1)));
        assert!(ScalarType::Uuid.matches(&Value::Null));
        assert!(!ScalarType::String.matches(&Value::Bytes(vec![1])));
    }
}
