//! Text envelope around the binary stream.
//!
//! A shareable string is `<header><checksum>:<payload>`, where the header is
//! `B` or `F`, the checksum is the decimal character count of the payload,
//! and the payload is base64-encoded gzip.

use std::io::Read;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{DecodeError, PayloadError};
use crate::limits::{BLUEPRINT_HEADER, CHECKSUM_SEPARATOR, FOLDER_HEADER, MIN_INPUT_LEN};

/// Which kind of tree an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    Blueprint,
    Folder,
}

impl EnvelopeKind {
    /// Returns the header character for this kind.
    pub fn header(self) -> char {
        match self {
            EnvelopeKind::Blueprint => BLUEPRINT_HEADER,
            EnvelopeKind::Folder => FOLDER_HEADER,
        }
    }

    /// Detects the kind from the first character of an encoded string.
    pub fn from_header(c: char) -> Option<Self> {
        match c {
            BLUEPRINT_HEADER => Some(EnvelopeKind::Blueprint),
            FOLDER_HEADER => Some(EnvelopeKind::Folder),
            _ => None,
        }
    }
}

/// Validates the envelope and returns the decompressed stream.
///
/// All envelope checks run before any base64 or gzip work.
pub fn decode_envelope(
    text: &str,
    kind: EnvelopeKind,
    max_payload_size: usize,
) -> Result<Vec<u8>, DecodeError> {
    let len = text.chars().count();
    if len <= MIN_INPUT_LEN {
        debug!(len, "rejecting short input");
        return Err(DecodeError::TooShort { len });
    }

    let found = text.chars().next();
    if found != Some(kind.header()) {
        return Err(DecodeError::BadHeader {
            expected: Some(kind.header()),
            found,
        });
    }

    let separators = text.matches(CHECKSUM_SEPARATOR).count();
    let (head, payload) = match text.split_once(CHECKSUM_SEPARATOR) {
        Some(parts) if separators == 1 => parts,
        _ => return Err(DecodeError::BadFormat { separators }),
    };

    let digits = &head[kind.header().len_utf8()..];
    let expected: usize = digits.parse().map_err(|_| DecodeError::BadChecksum {
        value: digits.to_string(),
    })?;
    let actual = payload.chars().count();
    if expected != actual {
        debug!(expected, actual, "checksum mismatch");
        return Err(DecodeError::ChecksumMismatch { expected, actual });
    }

    let compressed = STANDARD.decode(payload).map_err(PayloadError::from)?;
    inflate(&compressed, max_payload_size)
}

/// Gunzips a payload, refusing to produce more than `max` bytes.
fn inflate(compressed: &[u8], max: usize) -> Result<Vec<u8>, DecodeError> {
    let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
    let mut decoder = GzDecoder::new(compressed).take(limit);
    let mut decompressed = Vec::with_capacity(compressed.len().saturating_mul(4).min(max));
    decoder
        .read_to_end(&mut decompressed)
        .map_err(PayloadError::from)?;
    if decompressed.len() > max {
        return Err(DecodeError::PayloadTooLarge { max });
    }
    debug!(
        compressed = compressed.len(),
        decompressed = decompressed.len(),
        "inflated payload"
    );
    Ok(decompressed)
}

/// Wraps a raw stream in an envelope, for building fixtures in tests.
#[cfg(test)]
pub(crate) fn wrap(kind: EnvelopeKind, raw: &[u8]) -> String {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw).unwrap();
    let payload = STANDARD.encode(encoder.finish().unwrap());
    format!("{}{}:{}", kind.header(), payload.len(), payload)
}
