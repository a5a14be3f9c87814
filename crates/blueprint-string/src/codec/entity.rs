//! Entity encoding/decoding.
//!
//! An entity is five count-prefixed dictionaries in a fixed order:
//! integers, booleans, strings, string lists, byte arrays. Keys are always
//! interned strings.

use rustc_hash::FxHashMap;

use crate::codec::primitives::Reader;
use crate::codec::strings::{StringTable, read_string};
use crate::error::DecodeError;
use crate::model::Entity;

/// Reads a count-prefixed dictionary with interned keys.
///
/// Duplicate keys are not rejected; the last value wins.
pub fn read_dict<T, F>(
    reader: &mut Reader<'_>,
    table: &mut StringTable,
    field: &'static str,
    mut read_value: F,
) -> Result<FxHashMap<String, T>, DecodeError>
where
    F: FnMut(&mut Reader<'_>, &mut StringTable) -> Result<T, DecodeError>,
{
    let count = reader.read_non_negative(field)?;
    // Each entry takes at least two bytes, so cap the preallocation.
    let mut dict = FxHashMap::with_capacity_and_hasher(
        count.min(reader.remaining_len() / 2),
        Default::default(),
    );
    for _ in 0..count {
        let key = read_string(reader, table, field)?;
        let value = read_value(reader, table)?;
        dict.insert(key, value);
    }
    Ok(dict)
}

/// Decodes one entity.
pub fn decode_entity(reader: &mut Reader<'_>, table: &mut StringTable) -> Result<Entity, DecodeError> {
    let integers = read_dict(reader, table, "integers", |r, _| r.read_var_int("integers.value"))?;
    let booleans = read_dict(reader, table, "booleans", |r, _| r.read_bool("booleans.value"))?;
    let strings = read_dict(reader, table, "strings", |r, t| read_string(r, t, "strings.value"))?;
    let string_lists = read_dict(reader, table, "string_lists", decode_string_list)?;
    let byte_arrays = read_dict(reader, table, "byte_arrays", |r, _| {
        let len = r.read_non_negative("byte_arrays.len")?;
        Ok(r.read_bytes(len, "byte_arrays.value")?.to_vec())
    })?;

    Ok(Entity {
        integers,
        booleans,
        strings,
        string_lists,
        byte_arrays,
    })
}

fn decode_string_list(reader: &mut Reader<'_>, table: &mut StringTable) -> Result<Vec<String>, DecodeError> {
    let count = reader.read_non_negative("string_lists.len")?;
    let mut list = Vec::with_capacity(count.min(reader.remaining_len()));
    for _ in 0..count {
        list.push(read_string(reader, table, "string_lists.value")?);
    }
    Ok(list)
}
