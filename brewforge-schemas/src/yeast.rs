use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use crate::{property, vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YeastType {
    #[default]
    Ale,
    Lager,
    Wheat,
    Wine,
    Champagne,
}

vocabulary!(YeastType {
    "Ale" => Ale,
    "Lager" => Lager,
    "Wheat" => Wheat,
    "Wine" => Wine,
    "Champagne" => Champagne,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YeastForm {
    #[default]
    Liquid,
    Dry,
    Slant,
    Culture,
}

vocabulary!(YeastForm {
    "Liquid" => Liquid,
    "Dry" => Dry,
    "Slant" => Slant,
    "Culture" => Culture,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flocculation {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
}

vocabulary!(Flocculation {
    "Low" => Low,
    "Medium" => Medium,
    "High" => High,
    "Very High" => VeryHigh,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Yeast {
    pub name: String,
    pub yeast_type: YeastType,
    pub form: YeastForm,
    pub amount: f64,
    pub amount_is_weight: bool,
    pub laboratory: String,
    pub product_id: String,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub flocculation: Flocculation,
    pub attenuation_pct: f64,
    pub notes: String,
    pub best_for: String,
    pub times_cultured: i64,
    pub max_reuse: i64,
    pub add_to_secondary: bool,
    pub inventory: i64,
}

static YEAST_PROPERTIES: &[PropertyDef<Yeast>] = &[
    property!(text "name", Some("NAME"), name),
    property!(enumerated "type", Some("TYPE"), yeast_type),
    property!(enumerated "form", Some("FORM"), form),
    property!(real "amount", Some("AMOUNT"), amount),
    property!(bool "amount_is_weight", Some("AMOUNT_IS_WEIGHT"), amount_is_weight),
    property!(text "laboratory", Some("LABORATORY"), laboratory),
    property!(text "product_id", Some("PRODUCT_ID"), product_id),
    property!(real "min_temperature_c", Some("MIN_TEMPERATURE"), min_temperature_c),
    property!(real "max_temperature_c", Some("MAX_TEMPERATURE"), max_temperature_c),
    property!(enumerated "flocculation", Some("FLOCCULATION"), flocculation),
    property!(real "attenuation_pct", Some("ATTENUATION"), attenuation_pct),
    property!(text "notes", Some("NOTES"), notes),
    property!(text "best_for", Some("BEST_FOR"), best_for),
    property!(int "times_cultured", Some("TIMES_CULTURED"), times_cultured),
    property!(int "max_reuse", Some("MAX_REUSE"), max_reuse),
    property!(bool "add_to_secondary", Some("ADD_TO_SECONDARY"), add_to_secondary),
    property!(int "inventory", None, inventory),
];

impl Entity for Yeast {
    const KIND: EntityKind = EntityKind::Yeast;

    fn properties() -> &'static [PropertyDef<Self>] {
        YEAST_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.yeast
    }

    fn name(&self) -> &str {
        &self.name
    }
}
