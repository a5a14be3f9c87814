//! Wire constants and default decode limits.

/// The only library version this decoder understands.
pub const LIBRARY_VERSION: u32 = 1;

/// Header character of a blueprint string.
pub const BLUEPRINT_HEADER: char = 'B';

/// Header character of a blueprint folder string.
pub const FOLDER_HEADER: char = 'F';

/// Separator between the checksum and the base64 payload.
pub const CHECKSUM_SEPARATOR: char = ':';

/// Inputs of this many characters or fewer are rejected outright.
pub const MIN_INPUT_LEN: usize = 4;

/// Maximum 7-bit groups in a structural varint (21 usable bits).
pub const MAX_VARUINT_GROUPS: usize = 3;

/// Maximum 7-bit groups in a text length prefix (32-bit range).
pub const MAX_LENGTH_PREFIX_GROUPS: usize = 5;

/// Table slot reserved as the null sentinel.
pub const RESERVED_STRING_ID: usize = 0;

/// String component whose value names an entity's type.
pub const PROTOTYPE_KEY: &str = "Prototype";

/// Default maximum decompressed payload size (64 MiB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Default maximum folder nesting depth.
pub const DEFAULT_MAX_FOLDER_DEPTH: usize = 64;
