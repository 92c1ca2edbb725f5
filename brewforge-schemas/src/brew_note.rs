use crate::property;
use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Measurements taken on one brew day of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrewNote {
    pub brew_date: Option<NaiveDateTime>,
    pub ferment_date: Option<NaiveDateTime>,
    pub notes: String,
    pub sg: f64,
    pub volume_into_bk_l: f64,
    pub strike_temp_c: f64,
    pub mash_final_temp_c: f64,
    pub og: f64,
    pub post_boil_volume_l: f64,
    pub volume_into_fermenter_l: f64,
    pub pitch_temp_c: f64,
    pub fg: f64,
    pub eff_into_bk_pct: f64,
    pub predicted_og: f64,
    pub brewhouse_eff_pct: f64,
    pub predicted_abv_pct: f64,
    pub actual_abv_pct: f64,
}

static BREW_NOTE_PROPERTIES: &[PropertyDef<BrewNote>] = &[
    property!(datetime "brew_date", Some("BREWDATE"), brew_date),
    property!(datetime "ferment_date", Some("DATE_FERMENTED_OUT"), ferment_date),
    property!(text "notes", Some("NOTES"), notes),
    property!(real "sg", Some("SG"), sg),
    property!(real "volume_into_bk_l", Some("VOLUME_INTO_BK"), volume_into_bk_l),
    property!(real "strike_temp_c", Some("STRIKE_TEMP"), strike_temp_c),
    property!(real "mash_final_temp_c", Some("MASH_FINAL_TEMP"), mash_final_temp_c),
    property!(real "og", Some("OG"), og),
    property!(real "post_boil_volume_l", Some("POST_BOIL_VOLUME"), post_boil_volume_l),
    property!(real "volume_into_fermenter_l", Some("VOLUME_INTO_FERMENTER"), volume_into_fermenter_l),
    property!(real "pitch_temp_c", Some("PITCH_TEMP"), pitch_temp_c),
    property!(real "fg", Some("FG"), fg),
    property!(real "eff_into_bk_pct", Some("EFF_INTO_BK"), eff_into_bk_pct),
    property!(real "predicted_og", Some("PREDICTED_OG"), predicted_og),
    property!(real "brewhouse_eff_pct", Some("BREWHOUSE_EFF"), brewhouse_eff_pct),
    property!(real "predicted_abv_pct", Some("PREDICTED_ABV"), predicted_abv_pct),
    property!(real "actual_abv_pct", Some("ACTUAL_ABV"), actual_abv_pct),
];

impl Entity for BrewNote {
    const KIND: EntityKind = EntityKind::BrewNote;

    fn properties() -> &'static [PropertyDef<Self>] {
        BREW_NOTE_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.brew_note
    }

    /// Brew notes are not named; they are identified by recipe and date.
    fn name(&self) -> &str {
        ""
    }
}
