//! Blueprint and folder decoding.
//!
//! Both entry points validate the envelope, check the library version, run a
//! single depth-first pass over the stream and then require the stream to be
//! fully consumed.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::codec::entity::decode_entity;
use crate::codec::envelope::{EnvelopeKind, decode_envelope};
use crate::codec::primitives::Reader;
use crate::codec::strings::{StringRefMode, StringTable, read_string};
use crate::error::DecodeError;
use crate::limits::{DEFAULT_MAX_FOLDER_DEPTH, DEFAULT_MAX_PAYLOAD_SIZE, LIBRARY_VERSION};
use crate::model::{Blueprint, BlueprintFolder, BlueprintOrFolder};

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum size of the decompressed stream in bytes.
    pub max_payload_size: usize,
    /// Maximum folder nesting depth. The top-level folder is depth 1.
    pub max_folder_depth: usize,
    /// Handling of string references the game encoder should never emit.
    ///
    /// Use [`StringRefMode::Lenient`] to reproduce the game's own reader
    /// when a payload fails strict decoding.
    pub string_refs: StringRefMode,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            max_folder_depth: DEFAULT_MAX_FOLDER_DEPTH,
            string_refs: StringRefMode::Strict,
        }
    }
}

impl DecodeOptions {
    /// Creates default (strict) decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates strict decoding options.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates options that accept whatever the game's reader accepts.
    pub fn lenient() -> Self {
        Self {
            string_refs: StringRefMode::Lenient,
            ..Self::default()
        }
    }

    pub fn with_max_payload_size(mut self, max: usize) -> Self {
        self.max_payload_size = max;
        self
    }

    pub fn with_max_folder_depth(mut self, max: usize) -> Self {
        self.max_folder_depth = max;
        self
    }

    pub fn with_string_refs(mut self, mode: StringRefMode) -> Self {
        self.string_refs = mode;
        self
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a `B…` blueprint string.
pub fn parse_blueprint(text: &str) -> Result<Blueprint, DecodeError> {
    parse_blueprint_with_options(text, DecodeOptions::default())
}

/// Decodes a `B…` blueprint string with the given options.
pub fn parse_blueprint_with_options(
    text: &str,
    options: DecodeOptions,
) -> Result<Blueprint, DecodeError> {
    let data = decode_envelope(text, EnvelopeKind::Blueprint, options.max_payload_size)?;
    decode_blueprint_stream(&data, options)
}

/// Decodes an `F…` blueprint folder string.
pub fn parse_blueprint_folder(text: &str) -> Result<BlueprintFolder, DecodeError> {
    parse_blueprint_folder_with_options(text, DecodeOptions::default())
}

/// Decodes an `F…` blueprint folder string with the given options.
pub fn parse_blueprint_folder_with_options(
    text: &str,
    options: DecodeOptions,
) -> Result<BlueprintFolder, DecodeError> {
    let data = decode_envelope(text, EnvelopeKind::Folder, options.max_payload_size)?;
    decode_folder_stream(&data, options)
}

/// Decodes either kind of string, dispatching on the first character.
///
/// Any other leading character fails with [`DecodeError::BadHeader`] before
/// decompression is attempted.
pub fn parse_blueprint_or_folder(text: &str) -> Result<BlueprintOrFolder, DecodeError> {
    parse_blueprint_or_folder_with_options(text, DecodeOptions::default())
}

/// Decodes either kind of string with the given options.
pub fn parse_blueprint_or_folder_with_options(
    text: &str,
    options: DecodeOptions,
) -> Result<BlueprintOrFolder, DecodeError> {
    let found = text.chars().next();
    match found.and_then(EnvelopeKind::from_header) {
        Some(EnvelopeKind::Blueprint) => {
            parse_blueprint_with_options(text, options).map(BlueprintOrFolder::Blueprint)
        }
        Some(EnvelopeKind::Folder) => {
            parse_blueprint_folder_with_options(text, options).map(BlueprintOrFolder::Folder)
        }
        None => Err(DecodeError::BadHeader { expected: None, found }),
    }
}

/// Decodes a decompressed blueprint stream.
pub fn decode_blueprint_stream(data: &[u8], options: DecodeOptions) -> Result<Blueprint, DecodeError> {
    let mut decoder = Decoder::new(data, options);
    let library_version = decoder.read_library_version()?;
    let blueprint = decoder.decode_blueprint(library_version)?;
    decoder.finish()?;
    debug!(
        name = %blueprint.name,
        entities = blueprint.entities.len(),
        strings = decoder.table.len(),
        "decoded blueprint"
    );
    Ok(blueprint)
}

/// Decodes a decompressed folder stream.
pub fn decode_folder_stream(data: &[u8], options: DecodeOptions) -> Result<BlueprintFolder, DecodeError> {
    let mut decoder = Decoder::new(data, options);
    let library_version = decoder.read_library_version()?;
    let folder = decoder.decode_folder(library_version, 1)?;
    decoder.finish()?;
    debug!(
        name = %folder.name,
        blueprints = folder.iter_blueprints().count(),
        strings = decoder.table.len(),
        "decoded blueprint folder"
    );
    Ok(folder)
}

/// Per-call decode state: the stream position and its string table.
struct Decoder<'a> {
    reader: Reader<'a>,
    table: StringTable,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8], options: DecodeOptions) -> Self {
        Self {
            reader: Reader::new(data),
            table: StringTable::new(options.string_refs),
            options,
        }
    }

    fn read_library_version(&mut self) -> Result<u32, DecodeError> {
        let version = self.reader.read_var_uint("library_version")?;
        if version != LIBRARY_VERSION {
            return Err(DecodeError::UnsupportedVersion { version });
        }
        Ok(version)
    }

    fn read_string(&mut self, context: &'static str) -> Result<String, DecodeError> {
        read_string(&mut self.reader, &mut self.table, context)
    }

    fn decode_blueprint(&mut self, library_version: u32) -> Result<Blueprint, DecodeError> {
        let game_version = self.read_string("game_version")?;
        let save_version = self.reader.read_var_uint("save_version")?;
        let name = self.read_string("blueprint.name")?;
        let description = self.read_string("blueprint.description")?;
        let entity_count = self.reader.read_non_negative("entity_count")?;
        trace!(%name, entity_count, "decoding blueprint");

        // An entity takes at least five bytes.
        let mut entities = Vec::with_capacity(entity_count.min(self.reader.remaining_len() / 5));
        let mut component_counts: FxHashMap<String, u32> = FxHashMap::default();
        for _ in 0..entity_count {
            let entity = decode_entity(&mut self.reader, &mut self.table)?;
            if let Some(prototype) = entity.prototype() {
                *component_counts.entry(prototype.to_string()).or_insert(0) += 1;
            }
            entities.push(entity);
        }

        Ok(Blueprint {
            library_version,
            game_version,
            save_version,
            name,
            description,
            component_counts,
            entities,
        })
    }

    fn decode_folder(&mut self, library_version: u32, depth: usize) -> Result<BlueprintFolder, DecodeError> {
        if depth > self.options.max_folder_depth {
            return Err(DecodeError::NestingTooDeep {
                max: self.options.max_folder_depth,
            });
        }

        let name = self.read_string("folder.name")?;
        let description = self.read_string("folder.description")?;

        let folder_count = self.reader.read_non_negative("folder_count")?;
        trace!(%name, depth, folder_count, "decoding folder");
        let mut folders = Vec::with_capacity(folder_count.min(self.reader.remaining_len()));
        for _ in 0..folder_count {
            folders.push(self.decode_folder(library_version, depth + 1)?);
        }

        let blueprint_count = self.reader.read_non_negative("blueprint_count")?;
        let mut blueprints = Vec::with_capacity(blueprint_count.min(self.reader.remaining_len()));
        for _ in 0..blueprint_count {
            blueprints.push(self.decode_blueprint(library_version)?);
        }

        Ok(BlueprintFolder {
            library_version,
            name,
            description,
            folders,
            blueprints,
        })
    }

    /// Fails unless every byte of the stream was consumed.
    fn finish(&self) -> Result<(), DecodeError> {
        if !self.reader.is_exhausted() {
            return Err(DecodeError::TrailingData {
                remaining: self.reader.remaining_len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::codec::envelope::wrap;
    use crate::codec::primitives::Writer;

    /// Builds raw streams, interning strings the way the game encoder does.
    struct StreamBuilder {
        writer: Writer,
        ids: FxHashMap<String, u64>,
    }

    impl StreamBuilder {
        fn new() -> Self {
            let mut writer = Writer::new();
            writer.write_varint(u64::from(LIBRARY_VERSION));
            Self {
                writer,
                ids: FxHashMap::default(),
            }
        }

        fn uint(&mut self, v: u64) -> &mut Self {
            self.writer.write_varint(v);
            self
        }

        fn string(&mut self, s: &str) -> &mut Self {
            if let Some(&id) = self.ids.get(s) {
                self.writer.write_varint(id);
            } else {
                let id = self.ids.len() as u64 + 1;
                self.ids.insert(s.to_string(), id);
                self.writer.write_varint(id);
                self.writer.write_text(s);
            }
            self
        }

        /// An entity with only a prototype string component.
        fn entity(&mut self, prototype: &str) -> &mut Self {
            self.uint(0).uint(0).uint(1);
            self.string("Prototype").string(prototype);
            self.uint(0).uint(0)
        }

        fn blueprint_body(&mut self, name: &str, prototypes: &[&str]) -> &mut Self {
            self.string("0.5.3c").uint(123).string(name).string("");
            self.uint(prototypes.len() as u64);
            for prototype in prototypes {
                self.entity(prototype);
            }
            self
        }

        fn bytes(&self) -> Vec<u8> {
            self.writer.as_bytes().to_vec()
        }
    }

    fn blueprint_stream() -> Vec<u8> {
        StreamBuilder::new()
            .blueprint_body("coal", &["CharcoalMaker", "SmokeStack", "SmokeStack"])
            .bytes()
    }

    fn folder_stream() -> Vec<u8> {
        let mut b = StreamBuilder::new();
        b.string("root").string("top level").uint(2);
        // first child: one blueprint
        b.string("left").string("l").uint(0).uint(1);
        b.blueprint_body("a", &["Belt"]);
        // second child: one nested empty folder, no blueprints
        b.string("right").string("r").uint(1);
        b.string("deep").string("d").uint(0).uint(0);
        b.uint(0);
        // root blueprints
        b.uint(1);
        b.blueprint_body("b", &["Belt", "Furnace"]);
        b.bytes()
    }

    #[test]
    fn test_blueprint_stream() {
        let bp = decode_blueprint_stream(&blueprint_stream(), DecodeOptions::default()).unwrap();
        assert_eq!(bp.library_version, 1);
        assert_eq!(bp.game_version, "0.5.3c");
        assert_eq!(bp.save_version, 123);
        assert_eq!(bp.name, "coal");
        assert_eq!(bp.description(), None);
        assert_eq!(bp.entities.len(), 3);
        assert_eq!(bp.component_count("CharcoalMaker"), 1);
        assert_eq!(bp.component_count("SmokeStack"), 2);
        assert_eq!(bp.entities[0].prototype(), Some("CharcoalMaker"));
    }

    #[test]
    fn test_entity_without_prototype_is_not_counted() {
        let mut b = StreamBuilder::new();
        b.string("0.5.3c").uint(1).string("n").string("d").uint(2);
        b.uint(0).uint(0).uint(0).uint(0).uint(0);
        b.entity("Belt");
        let bp = decode_blueprint_stream(&b.bytes(), DecodeOptions::default()).unwrap();
        assert_eq!(bp.entities.len(), 2);
        assert_eq!(bp.component_counts.len(), 1);
        assert_eq!(bp.component_count("Belt"), 1);
    }

    #[test]
    fn test_folder_stream() {
        let folder = decode_folder_stream(&folder_stream(), DecodeOptions::default()).unwrap();
        assert_eq!(folder.name, "root");
        assert_eq!(folder.description(), Some("top level"));
        assert_eq!(folder.folders.len(), 2);
        assert_eq!(folder.folders[0].name, "left");
        assert_eq!(folder.folders[0].blueprints[0].name, "a");
        assert_eq!(folder.folders[1].folders[0].name, "deep");
        assert!(folder.folders[1].blueprints.is_empty());
        assert_eq!(folder.blueprints.len(), 1);

        let names: Vec<_> = folder.iter_blueprints().map(|bp| bp.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        let totals = folder.total_component_counts();
        assert_eq!(totals["Belt"], 2);
        assert_eq!(totals["Furnace"], 1);
    }

    #[test]
    fn test_unsupported_version() {
        let mut data = blueprint_stream();
        data[0] = 2;
        assert!(matches!(
            decode_blueprint_stream(&data, DecodeOptions::default()),
            Err(DecodeError::UnsupportedVersion { version: 2 })
        ));
    }

    #[test]
    fn test_empty_stream() {
        assert!(matches!(
            decode_blueprint_stream(&[], DecodeOptions::default()),
            Err(DecodeError::Exhausted { context: "library_version" })
        ));
    }

    #[test]
    fn test_folder_depth_limit() {
        // root -> right -> deep is three levels
        let options = DecodeOptions::default().with_max_folder_depth(3);
        assert!(decode_folder_stream(&folder_stream(), options).is_ok());

        let options = DecodeOptions::default().with_max_folder_depth(2);
        assert!(matches!(
            decode_folder_stream(&folder_stream(), options),
            Err(DecodeError::NestingTooDeep { max: 2 })
        ));
    }

    #[test]
    fn test_deeply_nested_folder_bomb() {
        let mut b = StreamBuilder::new();
        for _ in 0..10_000 {
            b.string("f").string("").uint(1);
        }
        assert!(matches!(
            decode_folder_stream(&b.bytes(), DecodeOptions::default()),
            Err(DecodeError::NestingTooDeep { max: DEFAULT_MAX_FOLDER_DEPTH })
        ));
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        let mut b = StreamBuilder::new();
        b.string("0.5.3c").uint(1).string("n").string("d").uint((1 << 21) - 1);
        assert!(matches!(
            decode_blueprint_stream(&b.bytes(), DecodeOptions::default()),
            Err(DecodeError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_through_envelope() {
        let text = wrap(EnvelopeKind::Folder, &folder_stream());
        let folder = parse_blueprint_folder(&text).unwrap();
        assert_eq!(folder.iter_blueprints().count(), 2);

        let text = wrap(EnvelopeKind::Blueprint, &blueprint_stream());
        assert_eq!(parse_blueprint(&text).unwrap().name, "coal");
    }

    #[test]
    fn test_dispatch() {
        let bp_text = wrap(EnvelopeKind::Blueprint, &blueprint_stream());
        let folder_text = wrap(EnvelopeKind::Folder, &folder_stream());

        let decoded = parse_blueprint_or_folder(&bp_text).unwrap();
        assert_eq!(decoded.name(), "coal");
        assert!(decoded.as_blueprint().is_some());

        let decoded = parse_blueprint_or_folder(&folder_text).unwrap();
        assert_eq!(decoded.name(), "root");
        assert_eq!(decoded.library_version(), 1);
        assert!(decoded.as_folder().is_some());

        assert!(matches!(
            parse_blueprint_or_folder("X4:aaaa"),
            Err(DecodeError::BadHeader { expected: None, found: Some('X') })
        ));
        assert!(matches!(
            parse_blueprint_or_folder(""),
            Err(DecodeError::BadHeader { expected: None, found: None })
        ));
    }

    #[test]
    fn test_blueprint_header_on_folder_entry_point() {
        let text = wrap(EnvelopeKind::Blueprint, &blueprint_stream());
        assert!(matches!(
            parse_blueprint_folder(&text),
            Err(DecodeError::BadHeader { expected: Some('F'), found: Some('B') })
        ));
    }

    #[test]
    fn test_lenient_rereads_cached_empty_string() {
        // The game's reader treats a cached "" as missing, so an encoder that
        // repeats the literal must decode in lenient mode.
        let mut w = Writer::new();
        w.write_varint(1);
        w.write_varint(1);
        w.write_text("0.5.3c");
        w.write_varint(1);
        w.write_varint(2);
        w.write_text("name");
        w.write_varint(3);
        w.write_text("");
        w.write_varint(1);
        // entity: one string component whose value is id 3 again, literal repeated
        w.write_bytes(&[0, 0, 1]);
        w.write_varint(4);
        w.write_text("Label");
        w.write_varint(3);
        w.write_text("");
        w.write_bytes(&[0, 0]);
        let data = w.into_bytes();

        let bp = decode_blueprint_stream(&data, DecodeOptions::lenient()).unwrap();
        assert_eq!(bp.entities[0].strings["Label"], "");

        assert!(matches!(
            decode_blueprint_stream(&data, DecodeOptions::strict()),
            Err(DecodeError::TrailingData { .. }) | Err(DecodeError::Exhausted { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_truncation_is_exhausted(cut in 1usize..64) {
            let data = folder_stream();
            let cut = cut.min(data.len());
            let truncated = &data[..data.len() - cut];
            let is_exhausted = matches!(
                decode_folder_stream(truncated, DecodeOptions::default()),
                Err(DecodeError::Exhausted { .. })
            );
            prop_assert!(is_exhausted);
        }

        #[test]
        fn prop_trailing_byte_is_rejected(extra in any::<u8>(), len in 1usize..4) {
            let mut data = blueprint_stream();
            data.extend(std::iter::repeat(extra).take(len));
            let is_trailing = matches!(
                decode_blueprint_stream(&data, DecodeOptions::default()),
                Err(DecodeError::TrailingData { remaining }) if remaining == len
            );
            prop_assert!(is_trailing);
        }
    }
}
