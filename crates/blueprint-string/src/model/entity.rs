//! Component data of one placed entity.

use rustc_hash::FxHashMap;

use crate::limits::PROTOTYPE_KEY;

/// One entity's component values, split by value kind.
///
/// The five maps are independent: the same key may appear in more than one.
/// Key order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Entity {
    pub integers: FxHashMap<String, i32>,
    pub booleans: FxHashMap<String, bool>,
    pub strings: FxHashMap<String, String>,
    pub string_lists: FxHashMap<String, Vec<String>>,
    pub byte_arrays: FxHashMap<String, Vec<u8>>,
}

impl Entity {
    /// Returns the entity's prototype name, if it has a non-empty one.
    pub fn prototype(&self) -> Option<&str> {
        self.strings
            .get(PROTOTYPE_KEY)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Returns true if the entity carries no component values at all.
    pub fn is_empty(&self) -> bool {
        self.integers.is_empty()
            && self.booleans.is_empty()
            && self.strings.is_empty()
            && self.string_lists.is_empty()
            && self.byte_arrays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prototype() {
        let mut entity = Entity::default();
        assert!(entity.is_empty());
        assert_eq!(entity.prototype(), None);

        entity.strings.insert(PROTOTYPE_KEY.to_string(), String::new());
        assert_eq!(entity.prototype(), None);

        entity.strings.insert(PROTOTYPE_KEY.to_string(), "SmokeStack".to_string());
        assert_eq!(entity.prototype(), Some("SmokeStack"));
        assert!(!entity.is_empty());
    }
}
