use crate::property;
use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use serde::{Deserialize, Serialize};

/// Water profile. Ion concentrations are in ppm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Water {
    pub name: String,
    pub amount_l: f64,
    pub calcium_ppm: f64,
    pub bicarbonate_ppm: f64,
    pub sulfate_ppm: f64,
    pub chloride_ppm: f64,
    pub sodium_ppm: f64,
    pub magnesium_ppm: f64,
    pub ph: f64,
    pub notes: String,
}

static WATER_PROPERTIES: &[PropertyDef<Water>] = &[
    property!(text "name", Some("NAME"), name),
    property!(real "amount_l", Some("AMOUNT"), amount_l),
    property!(real "calcium_ppm", Some("CALCIUM"), calcium_ppm),
    property!(real "bicarbonate_ppm", Some("BICARBONATE"), bicarbonate_ppm),
    property!(real "sulfate_ppm", Some("SULFATE"), sulfate_ppm),
    property!(real "chloride_ppm", Some("CHLORIDE"), chloride_ppm),
    property!(real "sodium_ppm", Some("SODIUM"), sodium_ppm),
    property!(real "magnesium_ppm", Some("MAGNESIUM"), magnesium_ppm),
    property!(real "ph", Some("PH"), ph),
    property!(text "notes", Some("NOTES"), notes),
];

impl Entity for Water {
    const KIND: EntityKind = EntityKind::Water;

    fn properties() -> &'static [PropertyDef<Self>] {
        WATER_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.water
    }

    fn name(&self) -> &str {
        &self.name
    }
}
