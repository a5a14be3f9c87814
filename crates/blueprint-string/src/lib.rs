//! Decoder for shareable blueprint strings.
//!
//! A game client exports a saved blueprint (a named collection of placed
//! entities) or a folder of blueprints as a compact text string. This crate
//! turns such a string back into a strongly-typed tree.
//!
//! # Quick Start
//!
//! ```rust
//! use blueprint_string::parse_blueprint;
//!
//! let text = "B292:H4sIAAAAAAAACkWNwU7CQBRFZ4ZpsRWs4MK9cU1MjD8gEkMigYA/8Jw+y0vLvObNNIH489YFsrzn5p6rdfo0e5k9ux9jHUMzUMba27VQRR6ahY8UT8vyIZl+cEUhkgtL33ZxxSWq9O4frrt4psPiHT0KNBshln4+Vfoq2whHjqcWs/F8D/J3tYIaRefDLTpqMejr4ty8duLJV3qUfQr48M1ySIxSRg3sY2JT2wvH+e7ANe4iuFrn5mZyiYvjHroQi/sLmoN8sX8jPlKJepSotJf9AsaxV1f7AAAA";
//!
//! let bp = parse_blueprint(text).unwrap();
//! assert_eq!(bp.name, "coal");
//! assert_eq!(bp.game_version, "0.5.3c");
//! assert_eq!(bp.component_count("SmokeStack"), 1);
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Envelope validation and binary stream decoding
//! - [`model`]: Decoded types (Entity, Blueprint, BlueprintFolder)
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and default limits
//!
//! # Wire Format
//!
//! `B<checksum>:<payload>` for a blueprint, `F<checksum>:<payload>` for a
//! folder. The checksum is the character count of the payload, and the
//! payload is base64-encoded gzip of a binary stream:
//! - a library version varint (only version 1 is supported)
//! - interned strings: an ID, followed by the literal text on first use
//! - entities as five count-prefixed dictionaries (integers, booleans,
//!   strings, string lists, byte arrays)
//!
//! The stream must be consumed exactly; leftover bytes are an error.
//!
//! # Security
//!
//! Input is treated as untrusted: decompression and folder nesting are
//! bounded by [`DecodeOptions`], and counts read from the stream never drive
//! allocations larger than the remaining input.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{
    DecodeOptions, StringRefMode, parse_blueprint, parse_blueprint_folder,
    parse_blueprint_folder_with_options, parse_blueprint_or_folder,
    parse_blueprint_or_folder_with_options, parse_blueprint_with_options,
};
pub use error::{DecodeError, ErrorCode, PayloadError};
pub use model::{Blueprint, BlueprintFolder, BlueprintOrFolder, Entity};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
