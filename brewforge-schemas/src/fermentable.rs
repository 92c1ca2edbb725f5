use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use crate::{property, vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FermentableType {
    #[default]
    Grain,
    Sugar,
    Extract,
    DryExtract,
    Adjunct,
}

vocabulary!(FermentableType {
    "Grain" => Grain,
    "Sugar" => Sugar,
    "Extract" => Extract,
    "Dry Extract" => DryExtract,
    "Adjunct" => Adjunct,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fermentable {
    pub name: String,
    pub fermentable_type: FermentableType,
    pub amount_kg: f64,
    pub yield_pct: f64,
    pub color_srm: f64,
    pub add_after_boil: bool,
    pub origin: String,
    pub supplier: String,
    pub notes: String,
    pub coarse_fine_diff_pct: f64,
    pub moisture_pct: f64,
    pub diastatic_power_lintner: f64,
    pub protein_pct: f64,
    pub max_in_batch_pct: f64,
    pub recommend_mash: bool,
    pub ibu_gal_per_lb: f64,
    pub is_mashed: bool,
    pub inventory_kg: f64,
}

static FERMENTABLE_PROPERTIES: &[PropertyDef<Fermentable>] = &[
    property!(text "name", Some("NAME"), name),
    property!(enumerated "type", Some("TYPE"), fermentable_type),
    property!(real "amount_kg", Some("AMOUNT"), amount_kg),
    property!(real "yield_pct", Some("YIELD"), yield_pct),
    property!(real "color_srm", Some("COLOR"), color_srm),
    property!(bool "add_after_boil", Some("ADD_AFTER_BOIL"), add_after_boil),
    property!(text "origin", Some("ORIGIN"), origin),
    property!(text "supplier", Some("SUPPLIER"), supplier),
    property!(text "notes", Some("NOTES"), notes),
    property!(real "coarse_fine_diff_pct", Some("COARSE_FINE_DIFF"), coarse_fine_diff_pct),
    property!(real "moisture_pct", Some("MOISTURE"), moisture_pct),
    property!(real "diastatic_power_lintner", Some("DIASTATIC_POWER"), diastatic_power_lintner),
    property!(real "protein_pct", Some("PROTEIN"), protein_pct),
    property!(real "max_in_batch_pct", Some("MAX_IN_BATCH"), max_in_batch_pct),
    property!(bool "recommend_mash", Some("RECOMMEND_MASH"), recommend_mash),
    property!(real "ibu_gal_per_lb", Some("IBU_GAL_PER_LB"), ibu_gal_per_lb),
    property!(bool "is_mashed", Some("IS_MASHED"), is_mashed),
    property!(real "inventory_kg", None, inventory_kg),
];

impl Entity for Fermentable {
    const KIND: EntityKind = EntityKind::Fermentable;

    fn properties() -> &'static [PropertyDef<Self>] {
        FERMENTABLE_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.fermentable
    }

    fn name(&self) -> &str {
        &self.name
    }
}
