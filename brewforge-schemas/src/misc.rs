use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use crate::{property, vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiscType {
    #[default]
    Spice,
    Fining,
    WaterAgent,
    Herb,
    Flavor,
    Other,
}

vocabulary!(MiscType {
    "Spice" => Spice,
    "Fining" => Fining,
    "Water Agent" => WaterAgent,
    "Herb" => Herb,
    "Flavor" => Flavor,
    "Other" => Other,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiscUse {
    #[default]
    Boil,
    Mash,
    Primary,
    Secondary,
    Bottling,
}

vocabulary!(MiscUse {
    "Boil" => Boil,
    "Mash" => Mash,
    "Primary" => Primary,
    "Secondary" => Secondary,
    "Bottling" => Bottling,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Misc {
    pub name: String,
    pub misc_type: MiscType,
    pub misc_use: MiscUse,
    pub time_min: f64,
    pub amount: f64,
    pub amount_is_weight: bool,
    pub use_for: String,
    pub notes: String,
    pub inventory: f64,
}

static MISC_PROPERTIES: &[PropertyDef<Misc>] = &[
    property!(text "name", Some("NAME"), name),
    property!(enumerated "type", Some("TYPE"), misc_type),
    property!(enumerated "use", Some("USE"), misc_use),
    property!(real "time_min", Some("TIME"), time_min),
    property!(real "amount", Some("AMOUNT"), amount),
    property!(bool "amount_is_weight", Some("AMOUNT_IS_WEIGHT"), amount_is_weight),
    property!(text "use_for", Some("USE_FOR"), use_for),
    property!(text "notes", Some("NOTES"), notes),
    property!(real "inventory", None, inventory),
];

impl Entity for Misc {
    const KIND: EntityKind = EntityKind::Misc;

    fn properties() -> &'static [PropertyDef<Self>] {
        MISC_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.misc
    }

    fn name(&self) -> &str {
        &self.name
    }
}
