//! Decoded blueprints and folder trees.

use rustc_hash::FxHashMap;

use crate::model::Entity;

/// A named, saved collection of placed entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Blueprint {
    /// Version of the encoding library that wrote the stream.
    pub library_version: u32,
    /// Game version the blueprint was saved with.
    pub game_version: String,
    pub save_version: u32,
    pub name: String,
    /// Raw description; the stream always carries one, often empty.
    pub description: String,
    /// Occurrences of each prototype among `entities`.
    ///
    /// Derived while decoding, not read from the stream.
    pub component_counts: FxHashMap<String, u32>,
    /// Entities in placement order.
    pub entities: Vec<Entity>,
}

impl Blueprint {
    /// Returns the description, or `None` if it is empty.
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    /// Returns the number of entities with the given prototype.
    pub fn component_count(&self, prototype: &str) -> u32 {
        self.component_counts.get(prototype).copied().unwrap_or(0)
    }
}

/// A named container of blueprints and sub-folders.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlueprintFolder {
    pub library_version: u32,
    pub name: String,
    pub description: String,
    /// Child folders in stream order.
    pub folders: Vec<BlueprintFolder>,
    /// Child blueprints in stream order.
    pub blueprints: Vec<Blueprint>,
}

impl BlueprintFolder {
    /// Returns the description, or `None` if it is empty.
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    /// Iterates over every blueprint in the tree, depth-first.
    ///
    /// Sub-folders are visited before the folder's own blueprints, which is
    /// the order they appear in the stream.
    pub fn iter_blueprints(&self) -> impl Iterator<Item = &Blueprint> + '_ {
        let mut ordered = Vec::new();
        collect_blueprints(self, &mut ordered);
        ordered.into_iter()
    }

    /// Sums component counts over every blueprint in the tree.
    pub fn total_component_counts(&self) -> FxHashMap<String, u32> {
        let mut totals = FxHashMap::default();
        for blueprint in self.iter_blueprints() {
            for (name, count) in &blueprint.component_counts {
                *totals.entry(name.clone()).or_insert(0) += count;
            }
        }
        totals
    }
}

fn collect_blueprints<'a>(folder: &'a BlueprintFolder, out: &mut Vec<&'a Blueprint>) {
    for child in &folder.folders {
        collect_blueprints(child, out);
    }
    out.extend(folder.blueprints.iter());
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

/// Result of decoding a string whose kind is only known from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "camelCase"))]
pub enum BlueprintOrFolder {
    Blueprint(Blueprint),
    Folder(BlueprintFolder),
}

impl BlueprintOrFolder {
    /// Returns the name of the blueprint or folder.
    pub fn name(&self) -> &str {
        match self {
            BlueprintOrFolder::Blueprint(bp) => &bp.name,
            BlueprintOrFolder::Folder(folder) => &folder.name,
        }
    }

    pub fn library_version(&self) -> u32 {
        match self {
            BlueprintOrFolder::Blueprint(bp) => bp.library_version,
            BlueprintOrFolder::Folder(folder) => folder.library_version,
        }
    }

    pub fn as_blueprint(&self) -> Option<&Blueprint> {
        match self {
            BlueprintOrFolder::Blueprint(bp) => Some(bp),
            BlueprintOrFolder::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&BlueprintFolder> {
        match self {
            BlueprintOrFolder::Blueprint(_) => None,
            BlueprintOrFolder::Folder(folder) => Some(folder),
        }
    }
}

impl From<Blueprint> for BlueprintOrFolder {
    fn from(bp: Blueprint) -> Self {
        BlueprintOrFolder::Blueprint(bp)
    }
}

impl From<BlueprintFolder> for BlueprintOrFolder {
    fn from(folder: BlueprintFolder) -> Self {
        BlueprintOrFolder::Folder(folder)
    }
}
