//! Interned string decoding.
//!
//! Every text value in the stream is preceded by an ID. The first reference
//! to an ID carries the literal text; later references carry only the ID.

use rustc_hash::FxHashMap;

use crate::codec::primitives::Reader;
use crate::error::DecodeError;
use crate::limits::RESERVED_STRING_ID;

/// How the decoder treats string references that the encoder should never
/// produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringRefMode {
    /// Reject the reserved ID 0. Any cached value, including the empty
    /// string, counts as populated.
    #[default]
    Strict,
    /// Accept ID 0 like any other ID, and treat a cached empty string as
    /// unpopulated so the literal is read again.
    Lenient,
}

/// Per-stream table of previously decoded strings, keyed by wire ID.
///
/// IDs are assigned by the encoder and need not be contiguous.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: FxHashMap<u32, String>,
    mode: StringRefMode,
}

impl StringTable {
    /// Creates an empty table.
    pub fn new(mode: StringRefMode) -> Self {
        Self {
            entries: FxHashMap::default(),
            mode,
        }
    }

    /// Returns the cached string for an ID, if it counts as populated.
    pub fn get(&self, id: u32) -> Option<&str> {
        let value = self.entries.get(&id)?;
        match self.mode {
            StringRefMode::Lenient if value.is_empty() => None,
            _ => Some(value.as_str()),
        }
    }

    /// Returns the number of cached strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads an interned string.
///
/// Returns the cached value without consuming more bytes when the ID is
/// already populated; otherwise reads the literal and caches it.
pub fn read_string(
    reader: &mut Reader<'_>,
    table: &mut StringTable,
    context: &'static str,
) -> Result<String, DecodeError> {
    let id = reader.read_var_uint(context)?;
    if id as usize == RESERVED_STRING_ID && table.mode == StringRefMode::Strict {
        return Err(DecodeError::InvalidStringReference {
            id: id as usize,
            context,
        });
    }
    if let Some(cached) = table.get(id) {
        return Ok(cached.to_string());
    }

    let value = reader.read_text(context)?;
    table.entries.insert(id, value.clone());
    Ok(value)
}
