use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use crate::{property, vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HopUse {
    Mash,
    FirstWort,
    #[default]
    Boil,
    Aroma,
    DryHop,
}

vocabulary!(HopUse {
    "Mash" => Mash,
    "First Wort" => FirstWort,
    "Boil" => Boil,
    "Aroma" => Aroma,
    "Dry Hop" => DryHop,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HopType {
    Bittering,
    Aroma,
    #[default]
    Both,
}

vocabulary!(HopType {
    "Bittering" => Bittering,
    "Aroma" => Aroma,
    "Both" => Both,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HopForm {
    #[default]
    Pellet,
    Plug,
    Leaf,
}

vocabulary!(HopForm {
    "Pellet" => Pellet,
    "Plug" => Plug,
    "Leaf" => Leaf,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub name: String,
    pub alpha_pct: f64,
    pub amount_kg: f64,
    pub hop_use: HopUse,
    pub time_min: f64,
    pub notes: String,
    pub hop_type: HopType,
    pub form: HopForm,
    pub beta_pct: f64,
    pub hsi_pct: f64,
    pub origin: String,
    pub substitutes: String,
    pub humulene_pct: f64,
    pub caryophyllene_pct: f64,
    pub cohumulone_pct: f64,
    pub myrcene_pct: f64,
    pub inventory_kg: f64,
}

static HOP_PROPERTIES: &[PropertyDef<Hop>] = &[
    property!(text "name", Some("NAME"), name),
    property!(real "alpha_pct", Some("ALPHA"), alpha_pct),
    property!(real "amount_kg", Some("AMOUNT"), amount_kg),
    property!(enumerated "use", Some("USE"), hop_use),
    property!(real "time_min", Some("TIME"), time_min),
    property!(text "notes", Some("NOTES"), notes),
    property!(enumerated "type", Some("TYPE"), hop_type),
    property!(enumerated "form", Some("FORM"), form),
    property!(real "beta_pct", Some("BETA"), beta_pct),
    property!(real "hsi_pct", Some("HSI"), hsi_pct),
    property!(text "origin", Some("ORIGIN"), origin),
    property!(text "substitutes", Some("SUBSTITUTES"), substitutes),
    property!(real "humulene_pct", Some("HUMULENE"), humulene_pct),
    property!(real "caryophyllene_pct", Some("CARYOPHYLLENE"), caryophyllene_pct),
    property!(real "cohumulone_pct", Some("COHUMULONE"), cohumulone_pct),
    property!(real "myrcene_pct", Some("MYRCENE"), myrcene_pct),
    property!(real "inventory_kg", None, inventory_kg),
];

impl Entity for Hop {
    const KIND: EntityKind = EntityKind::Hop;

    fn properties() -> &'static [PropertyDef<Self>] {
        HOP_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.hop
    }

    fn name(&self) -> &str {
        &self.name
    }
}
