//! Per-entity property tables.
//!
//! Every entity type carries a static array of [`PropertyDef`]s that pairs an
//! internal attribute name with its BeerXML tag, the kind of value it holds and
//! a pair of typed accessors. Both XML directions are driven from these tables,
//! so adding a field to an entity means adding one line here and nothing in
//! the importer or exporter.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{
    brew_note::BrewNote, equipment::Equipment, fermentable::Fermentable, hop::Hop,
    instruction::Instruction, mash::Mash, mash::MashStep, misc::Misc, recipe::Recipe,
    style::Style, water::Water, yeast::Yeast,
};

/// The storage type of a mapped property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    Real,
    Integer,
    Date,
    DateTime,
    Text,
    /// Mapped to a closed vocabulary; read by dedicated per-entity code.
    Enumerated,
}

/// A typed property value moving between an entity and its XML text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Real(f64),
    Int(i64),
    Date(Option<NaiveDate>),
    DateTime(Option<NaiveDateTime>),
    Text(String),
}

pub struct PropertyDef<E: 'static> {
    /// Internal attribute name.
    pub name: &'static str,
    /// BeerXML tag, `None` for properties that never leave the store.
    pub xml_tag: Option<&'static str>,
    pub kind: ValueKind,
    pub get: fn(&E) -> Value,
    pub set: fn(&mut E, Value),
}

/// Discriminates the entity types that own a property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Hop,
    Fermentable,
    Misc,
    Yeast,
    Water,
    Style,
    Equipment,
    Mash,
    MashStep,
    Recipe,
    Instruction,
    BrewNote,
}

impl EntityKind {
    pub fn xml_tag(&self) -> &'static str {
        match self {
            EntityKind::Hop => "HOP",
            EntityKind::Fermentable => "FERMENTABLE",
            EntityKind::Misc => "MISC",
            EntityKind::Yeast => "YEAST",
            EntityKind::Water => "WATER",
            EntityKind::Style => "STYLE",
            EntityKind::Equipment => "EQUIPMENT",
            EntityKind::Mash => "MASH",
            EntityKind::MashStep => "MASH_STEP",
            EntityKind::Recipe => "RECIPE",
            EntityKind::Instruction => "INSTRUCTION",
            EntityKind::BrewNote => "BREWNOTE",
        }
    }

    /// Plural container tag used when several records are written together.
    pub fn container_tag(&self) -> &'static str {
        match self {
            EntityKind::Hop => "HOPS",
            EntityKind::Fermentable => "FERMENTABLES",
            EntityKind::Misc => "MISCS",
            EntityKind::Yeast => "YEASTS",
            EntityKind::Water => "WATERS",
            EntityKind::Style => "STYLES",
            EntityKind::Equipment => "EQUIPMENTS",
            EntityKind::Mash => "MASHS",
            EntityKind::MashStep => "MASH_STEPS",
            EntityKind::Recipe => "RECIPES",
            EntityKind::Instruction => "INSTRUCTIONS",
            EntityKind::BrewNote => "BREWNOTES",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Hop => "hop",
            EntityKind::Fermentable => "fermentable",
            EntityKind::Misc => "misc",
            EntityKind::Yeast => "yeast",
            EntityKind::Water => "water",
            EntityKind::Style => "style",
            EntityKind::Equipment => "equipment",
            EntityKind::Mash => "mash",
            EntityKind::MashStep => "mash step",
            EntityKind::Recipe => "recipe",
            EntityKind::Instruction => "instruction",
            EntityKind::BrewNote => "brew note",
        };
        f.write_str(name)
    }
}

/// Implemented by every type that round-trips through BeerXML.
pub trait Entity: Default + Clone + 'static {
    const KIND: EntityKind;

    fn properties() -> &'static [PropertyDef<Self>];

    /// Picks this type's table out of the shared bundle.
    fn table(tables: &PropertyTables) -> &PropertyTable<Self>;

    fn name(&self) -> &str;
}

/// A closed string vocabulary for an enumerated property.
pub trait Vocabulary: Sized + Copy + PartialEq + 'static {
    const VALUES: &'static [(&'static str, Self)];

    fn from_beerxml(text: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .find(|(s, _)| *s == text)
            .map(|(_, v)| *v)
    }

    fn as_beerxml(&self) -> &'static str {
        Self::VALUES
            .iter()
            .find(|(_, v)| v == self)
            .map_or("", |(s, _)| s)
    }

    /// First entry of the vocabulary, used when a value has to be guessed.
    fn first() -> Self {
        Self::VALUES[0].1
    }
}

/// Tag index over one entity type's static property array.
pub struct PropertyTable<E: 'static> {
    defs: &'static [PropertyDef<E>],
    by_tag: HashMap<&'static str, usize>,
}

impl<E: Entity> PropertyTable<E> {
    pub fn new() -> Self {
        let defs = E::properties();
        let by_tag = defs
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.xml_tag.map(|t| (t, i)))
            .collect();
        Self { defs, by_tag }
    }

    pub fn by_xml_tag(&self, tag: &str) -> Option<&PropertyDef<E>> {
        self.by_tag.get(tag).map(|&i| &self.defs[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&PropertyDef<E>> {
        self.defs.iter().find(|d| d.name == name)
    }

    /// All properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDef<E>> {
        self.defs.iter()
    }

    /// Properties that have an external tag, in declaration order.
    pub fn exported(&self) -> impl Iterator<Item = &PropertyDef<E>> {
        self.defs.iter().filter(|d| d.xml_tag.is_some())
    }
}

impl<E: Entity> Default for PropertyTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// One table per entity type. Built once and shared by reference.
pub struct PropertyTables {
    pub hop: PropertyTable<Hop>,
    pub fermentable: PropertyTable<Fermentable>,
    pub misc: PropertyTable<Misc>,
    pub yeast: PropertyTable<Yeast>,
    pub water: PropertyTable<Water>,
    pub style: PropertyTable<Style>,
    pub equipment: PropertyTable<Equipment>,
    pub mash: PropertyTable<Mash>,
    pub mash_step: PropertyTable<MashStep>,
    pub recipe: PropertyTable<Recipe>,
    pub instruction: PropertyTable<Instruction>,
    pub brew_note: PropertyTable<BrewNote>,
}

impl PropertyTables {
    pub fn new() -> Self {
        Self {
            hop: PropertyTable::new(),
            fermentable: PropertyTable::new(),
            misc: PropertyTable::new(),
            yeast: PropertyTable::new(),
            water: PropertyTable::new(),
            style: PropertyTable::new(),
            equipment: PropertyTable::new(),
            mash: PropertyTable::new(),
            mash_step: PropertyTable::new(),
            recipe: PropertyTable::new(),
            instruction: PropertyTable::new(),
            brew_note: PropertyTable::new(),
        }
    }
}

impl Default for PropertyTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds one `PropertyDef` for a struct field.
///
/// `enumerated` entries take the field's `Vocabulary` type so the getter can
/// render it; their setter is a no-op because vocabulary mapping is done by
/// per-entity import code.
#[macro_export]
macro_rules! property {
    (bool $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::Boolean,
            get: |e| $crate::property::Value::Bool(e.$field),
            set: |e, v| {
                if let $crate::property::Value::Bool(x) = v {
                    e.$field = x;
                }
            },
        }
    };
    (real $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::Real,
            get: |e| $crate::property::Value::Real(e.$field),
            set: |e, v| {
                if let $crate::property::Value::Real(x) = v {
                    e.$field = x;
                }
            },
        }
    };
    (int $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::Integer,
            get: |e| $crate::property::Value::Int(e.$field),
            set: |e, v| {
                if let $crate::property::Value::Int(x) = v {
                    e.$field = x;
                }
            },
        }
    };
    (date $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::Date,
            get: |e| $crate::property::Value::Date(e.$field),
            set: |e, v| {
                if let $crate::property::Value::Date(x) = v {
                    e.$field = x;
                }
            },
        }
    };
    (datetime $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::DateTime,
            get: |e| $crate::property::Value::DateTime(e.$field),
            set: |e, v| {
                if let $crate::property::Value::DateTime(x) = v {
                    e.$field = x;
                }
            },
        }
    };
    (text $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::Text,
            get: |e| $crate::property::Value::Text(e.$field.clone()),
            set: |e, v| {
                if let $crate::property::Value::Text(x) = v {
                    e.$field = x;
                }
            },
        }
    };
    (enumerated $name:literal, $tag:expr, $field:ident) => {
        $crate::property::PropertyDef {
            name: $name,
            xml_tag: $tag,
            kind: $crate::property::ValueKind::Enumerated,
            get: |e| {
                $crate::property::Value::Text(
                    $crate::property::Vocabulary::as_beerxml(&e.$field).to_string(),
                )
            },
            set: |_, _| {},
        }
    };
}

/// Implements `Vocabulary` for a fieldless enum from `"text" => Variant` pairs.
#[macro_export]
macro_rules! vocabulary {
    ($ty:ty { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl $crate::property::Vocabulary for $ty {
            const VALUES: &'static [(&'static str, Self)] = &[$(($text, <$ty>::$variant)),+];
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_index_every_tagged_property() {
        let tables = PropertyTables::new();
        let alpha = tables.hop.by_xml_tag("ALPHA").expect("ALPHA is mapped");
        assert_eq!(alpha.name, "alpha_pct");
        assert_eq!(alpha.kind, ValueKind::Real);
        assert!(tables.hop.by_xml_tag("NOT_A_TAG").is_none());

        // step_number never leaves the store
        let step_number = tables.mash_step.by_name("step_number").unwrap();
        assert!(step_number.xml_tag.is_none());
        assert!(tables.mash_step.exported().all(|d| d.name != "step_number"));
    }

    #[test]
    fn accessors_read_and_write_through_fn_pointers() {
        let tables = PropertyTables::new();
        let mut hop = Hop::default();
        let alpha = tables.hop.by_xml_tag("ALPHA").unwrap();
        (alpha.set)(&mut hop, Value::Real(12.5));
        assert_eq!(hop.alpha_pct, 12.5);
        assert_eq!((alpha.get)(&hop), Value::Real(12.5));

        // mismatched value kinds are ignored by the setter
        (alpha.set)(&mut hop, Value::Text("high".into()));
        assert_eq!(hop.alpha_pct, 12.5);
    }

    #[test]
    fn vocabulary_round_trips_external_names() {
        use crate::yeast::Flocculation;
        assert_eq!(Flocculation::from_beerxml("Very High"), Some(Flocculation::VeryHigh));
        assert_eq!(Flocculation::VeryHigh.as_beerxml(), "Very High");
        assert_eq!(Flocculation::from_beerxml("very high"), None);
        assert_eq!(Flocculation::first(), Flocculation::Low);
    }
}
