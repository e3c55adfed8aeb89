//! Error types for the count-up engine

use serde::{Deserialize, Serialize};

/// Errors raised at the configuration and tick-conversion boundaries.
///
/// Invalid state transitions (pausing an idle controller, resuming a running
/// one) are not errors; they are silently ignored.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CountupError {
    /// A configuration field holds a value the engine cannot work with
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Scaling a value into tick space does not fit in an `i64`
    #[error("Arithmetic overflow converting {value} with {decimal_places} decimal places to a tick")]
    ArithmeticOverflow { value: f64, decimal_places: u32 },

    /// NaN or infinite input where a finite number is required
    #[error("Invalid value: {value}")]
    InvalidValue { value: f64 },

    /// Configuration document could not be parsed
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl CountupError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "config",
            Self::ArithmeticOverflow { .. } | Self::InvalidValue { .. } => "arithmetic",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for CountupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let config_error = CountupError::invalid_config("decimal_places", "too many");
        assert_eq!(config_error.category(), "config");

        let overflow = CountupError::ArithmeticOverflow {
            value: 1e300,
            decimal_places: 2,
        };
        assert_eq!(overflow.category(), "arithmetic");
    }

    #[test]
    fn test_error_display() {
        let error = CountupError::invalid_config("decimal_places", "at most 15 supported");
        assert_eq!(
            error.to_string(),
            "Invalid configuration for `decimal_places`: at most 15 supported"
        );
    }

    #[test]
    fn test_serialization() {
        let error = CountupError::InvalidValue { value: 1.5 };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: CountupError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let error: CountupError = err.into();
        assert!(matches!(error, CountupError::Serialization { .. }));
    }
}
