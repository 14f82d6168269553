//! Codec error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding values.
///
/// Every variant aborts the current call. Nothing is retried internally and
/// no partial result is produced, so retrying with the same input yields the
/// same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The value kind has no text representation in this encoding path.
    #[error("encode: unsupported value kind {kind}")]
    UnsupportedValue {
        /// Kind of the rejected value.
        kind: &'static str,
    },

    /// Date/time text does not match the expected grammar.
    #[error("invalid date/time '{input}': {message} at position {position}")]
    Syntax {
        /// The full text being parsed.
        input: String,
        /// Byte offset of the offending substring.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// Numeric text could not be parsed.
    #[error("invalid number '{value}': {reason}")]
    InvalidNumber {
        /// The offending text.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Malformed bytea text (hex or escape format).
    #[error("invalid bytea: {0}")]
    InvalidBytea(String),

    /// Malformed COPY text escape sequence.
    #[error("invalid COPY escape: {0}")]
    InvalidEscape(String),

    /// Textual wire data was not valid UTF-8.
    #[error("invalid UTF-8 in text value")]
    InvalidUtf8,

    /// Wire data was empty where a value was required.
    #[error("empty input for {type_name}")]
    Empty {
        /// Name of the type being decoded.
        type_name: &'static str,
    },

    /// A parsed value is outside the representable range.
    #[error("value '{value}' out of range: {reason}")]
    OutOfRange {
        /// The offending text or value.
        value: String,
        /// Why it cannot be represented.
        reason: &'static str,
    },

    /// Value is null when non-null was expected.
    #[error("unexpected null value")]
    UnexpectedNull,

    /// Type mismatch during conversion.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        actual: &'static str,
    },
}

impl CodecError {
    pub(crate) fn syntax(input: &str, position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            input: input.to_owned(),
            position,
            message: message.into(),
        }
    }
}
