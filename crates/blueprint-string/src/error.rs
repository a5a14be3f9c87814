//! Error types for blueprint string decoding.

use thiserror::Error;

/// Coarse error categories, one per stage of the decode pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Malformed text envelope (length, header, separator, checksum)
    MalformedEnvelope,
    /// E002: Base64 or gzip stage failed, or the payload is over the size limit
    UndecodablePayload,
    /// E003: Truncated or corrupt binary stream
    CorruptStream,
    /// E004: Library version not handled by this decoder
    UnsupportedVersion,
    /// E005: Structural decode finished with bytes left over
    TrailingData,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedEnvelope => "E001",
            ErrorCode::UndecodablePayload => "E002",
            ErrorCode::CorruptStream => "E003",
            ErrorCode::UnsupportedVersion => "E004",
            ErrorCode::TrailingData => "E005",
        }
    }
}

/// Underlying cause of a failed base64 or gzip stage.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("gzip decompression failed: {0}")]
    Gzip(#[from] std::io::Error),
}

/// Error during blueprint or folder decoding.
///
/// Every variant is terminal: the decode call that produced it returns no
/// partial result.
#[derive(Debug, Error)]
pub enum DecodeError {
    // === E001: Envelope ===
    #[error("[E001] input too short: {len} characters")]
    TooShort { len: usize },

    #[error("[E001] unexpected header: expected {expected:?}, found {found:?}")]
    BadHeader { expected: Option<char>, found: Option<char> },

    #[error("[E001] expected exactly one ':' separator, found {separators}")]
    BadFormat { separators: usize },

    #[error("[E001] invalid checksum {value:?}")]
    BadChecksum { value: String },

    #[error("[E001] failed checksum: expected {expected}, actual {actual}")]
    ChecksumMismatch { expected: usize, actual: usize },

    // === E002: Payload ===
    #[error("[E002] could not decode payload: {0}")]
    DecodeFailure(#[from] PayloadError),

    #[error("[E002] decompressed payload exceeds maximum {max} bytes")]
    PayloadTooLarge { max: usize },

    // === E003: Stream ===
    #[error("[E003] stream exhausted while reading {context}")]
    Exhausted { context: &'static str },

    #[error("[E003] varint too large while reading {context}")]
    VarIntTooLarge { context: &'static str },

    #[error("[E003] invalid length prefix while reading {context}")]
    InvalidLengthPrefix { context: &'static str },

    #[error("[E003] invalid UTF-8 in {context}")]
    InvalidUtf8 { context: &'static str },

    #[error("[E003] invalid string reference {id} while reading {context}")]
    InvalidStringReference { id: usize, context: &'static str },

    #[error("[E003] folder nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },

    // === E004: Version ===
    #[error("[E004] unsupported library version: {version}")]
    UnsupportedVersion { version: u32 },

    // === E005: Trailing data ===
    #[error("[E005] expected stream to be exhausted, {remaining} bytes left")]
    TrailingData { remaining: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::TooShort { .. }
            | DecodeError::BadHeader { .. }
            | DecodeError::BadFormat { .. }
            | DecodeError::BadChecksum { .. }
            | DecodeError::ChecksumMismatch { .. } => ErrorCode::MalformedEnvelope,
            DecodeError::DecodeFailure(_) | DecodeError::PayloadTooLarge { .. } => {
                ErrorCode::UndecodablePayload
            }
            DecodeError::UnsupportedVersion { .. } => ErrorCode::UnsupportedVersion,
            DecodeError::TrailingData { .. } => ErrorCode::TrailingData,
            _ => ErrorCode::CorruptStream,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_codes_by_stage() {
        assert_eq!(DecodeError::TooShort { len: 0 }.code().code(), "E001");
        assert_eq!(DecodeError::PayloadTooLarge { max: 1 }.code().code(), "E002");
        assert_eq!(DecodeError::Exhausted { context: "name" }.code().code(), "E003");
        assert_eq!(DecodeError::UnsupportedVersion { version: 2 }.code().code(), "E004");
        assert_eq!(DecodeError::TrailingData { remaining: 1 }.code().code(), "E005");
    }

    #[test]
    fn test_decode_failure_exposes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "corrupt deflate stream");
        let err = DecodeError::from(PayloadError::from(io));
        let source = err.source().expect("wrapped cause");
        assert!(source.to_string().contains("corrupt deflate stream"));
    }
}
