//! Error types for keyphrase alignment

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which sentence of the pair a span or record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Premise,
    Conclusion,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Premise => "premise",
            Side::Conclusion => "conclusion",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the aligner and its configuration layer
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// A keyphrase span does not fit inside its token sequence.
    #[error("{side} span #{index} [{start}, {end}) is out of range for a sequence of {len} tokens")]
    InvalidSpan {
        side: Side,
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AlignError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        AlignError::InvalidConfig(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_span_message() {
        let err = AlignError::InvalidSpan {
            side: Side::Conclusion,
            index: 2,
            start: 3,
            end: 9,
            len: 5,
        };
        assert_eq!(
            err.to_string(),
            "conclusion span #2 [3, 9) is out of range for a sequence of 5 tokens"
        );
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = AlignError::invalid_config("progress_every must be > 0");
        assert!(matches!(err, AlignError::InvalidConfig(_)));
        assert!(err.to_string().contains("progress_every"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: AlignError = parse.unwrap_err().into();
        assert!(matches!(err, AlignError::Json(_)));
    }

    #[test]
    fn test_side_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Side::Premise).unwrap(), r#""premise""#);
        assert_eq!(Side::Conclusion.to_string(), "conclusion");
    }
}
