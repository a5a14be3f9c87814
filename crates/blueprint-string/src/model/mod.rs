//! Data model types for decoded blueprint strings.
//!
//! - Entities (five typed component maps)
//! - Blueprints (version metadata, entities, derived prototype counts)
//! - Folders (trees of folders and blueprints)

pub mod blueprint;
pub mod entity;

pub use blueprint::{Blueprint, BlueprintFolder, BlueprintOrFolder};
pub use entity::Entity;
