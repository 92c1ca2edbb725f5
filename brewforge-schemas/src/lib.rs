//! Domain model for Brewforge: every BeerXML entity, its enumerations and
//! the property tables that drive XML (de)serialization.

pub mod brew_note;
pub mod document;
pub mod equipment;
pub mod fermentable;
pub mod file_formats;
pub mod hop;
pub mod instruction;
pub mod mash;
pub mod misc;
pub mod property;
pub mod recipe;
pub mod style;
pub mod water;
pub mod yeast;

pub use property::{Entity, EntityKind, PropertyTables, Value, ValueKind, Vocabulary};
