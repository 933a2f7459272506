//! Error types for UBJSON encoding and decoding.

/// Errors that can occur while encoding or decoding UBJSON.
///
/// Every variant is terminal for the call that produced it: a single
/// malformed byte invalidates everything read after it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UbjsonError {
    #[error("value cannot be serialized: {0}")]
    UnsupportedValueKind(String),

    #[error("unsupported wire type 0x{tag:02X} at offset {offset}")]
    UnsupportedWireType { tag: u8, offset: usize },

    #[error("malformed container header: {0}")]
    MalformedContainerHeader(String),

    #[error("unexpected end of input: need {needed} bytes but only {remaining} remaining")]
    UnexpectedEndOfInput { needed: usize, remaining: usize },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid length: {0}")]
    InvalidLength(i64),

    #[error("invalid UTF-8 string: {0}")]
    InvalidUtf8(String),

    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),
}

impl UbjsonError {
    /// Wraps any displayable error as an unsupported value error.
    ///
    /// Intended for custom number handlers that reject a payload.
    pub fn unsupported(e: impl std::fmt::Display) -> Self {
        Self::UnsupportedValueKind(e.to_string())
    }

    /// Returns `true` if the error was caused by truncated input.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEndOfInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_type_message_shows_hex_tag() {
        let err = UbjsonError::UnsupportedWireType {
            tag: b'L',
            offset: 3,
        };
        assert_eq!(err.to_string(), "unsupported wire type 0x4C at offset 3");
    }

    #[test]
    fn truncation_is_detected() {
        let err = UbjsonError::UnexpectedEndOfInput {
            needed: 2,
            remaining: 0,
        };
        assert!(err.is_truncation());
        assert!(!UbjsonError::InvalidLength(-1).is_truncation());
    }
}
