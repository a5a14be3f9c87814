//! Decoding of shareable blueprint strings.
//!
//! The pipeline runs leaf-first: the text envelope yields a byte stream, a
//! [`Reader`] walks it with two varint schemes, a [`StringTable`] resolves
//! interned text, and the structural decoder assembles entities into
//! blueprints and folders.

pub mod blueprint;
pub mod entity;
pub mod envelope;
pub mod primitives;
pub mod strings;

pub use blueprint::{
    DecodeOptions, decode_blueprint_stream, decode_folder_stream, parse_blueprint,
    parse_blueprint_folder, parse_blueprint_folder_with_options, parse_blueprint_or_folder,
    parse_blueprint_or_folder_with_options, parse_blueprint_with_options,
};
pub use entity::{decode_entity, read_dict};
pub use envelope::{EnvelopeKind, decode_envelope};
pub use primitives::{Reader, zigzag_decode};
pub use strings::{StringRefMode, StringTable, read_string};
