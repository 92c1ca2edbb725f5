use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use crate::{property, vocabulary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecipeType {
    Extract,
    PartialMash,
    #[default]
    AllGrain,
}

vocabulary!(RecipeType {
    "Extract" => Extract,
    "Partial Mash" => PartialMash,
    "All Grain" => AllGrain,
});

/// Recipe scalars. Ingredients, style, equipment and mash are linked by the
/// store; see `RecipeDocument` for the assembled form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub recipe_type: RecipeType,
    pub brewer: String,
    pub asst_brewer: String,
    pub batch_size_l: f64,
    pub boil_size_l: f64,
    pub boil_time_min: f64,
    pub efficiency_pct: f64,
    pub notes: String,
    pub taste_notes: String,
    pub taste_rating: f64,
    pub og: f64,
    pub fg: f64,
    pub fermentation_stages: i64,
    pub primary_age_day: f64,
    pub primary_temp_c: f64,
    pub secondary_age_day: f64,
    pub secondary_temp_c: f64,
    pub tertiary_age_day: f64,
    pub tertiary_temp_c: f64,
    pub age_day: f64,
    pub age_temp_c: f64,
    pub date: Option<NaiveDate>,
    pub carbonation_vols: f64,
    pub forced_carbonation: bool,
    pub priming_sugar_name: String,
    pub carbonation_temp_c: f64,
    pub priming_sugar_equiv: f64,
    pub keg_priming_factor: f64,
    pub est_og: f64,
    pub est_fg: f64,
    pub est_abv_pct: f64,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            name: String::new(),
            recipe_type: RecipeType::default(),
            brewer: String::new(),
            asst_brewer: String::new(),
            batch_size_l: 0.0,
            boil_size_l: 0.0,
            boil_time_min: 60.0,
            efficiency_pct: 70.0,
            notes: String::new(),
            taste_notes: String::new(),
            taste_rating: 0.0,
            og: 1.0,
            fg: 1.0,
            fermentation_stages: 1,
            primary_age_day: 0.0,
            primary_temp_c: 0.0,
            secondary_age_day: 0.0,
            secondary_temp_c: 0.0,
            tertiary_age_day: 0.0,
            tertiary_temp_c: 0.0,
            age_day: 0.0,
            age_temp_c: 0.0,
            date: None,
            carbonation_vols: 0.0,
            forced_carbonation: false,
            priming_sugar_name: String::new(),
            carbonation_temp_c: 0.0,
            priming_sugar_equiv: 1.0,
            keg_priming_factor: 1.0,
            est_og: 1.0,
            est_fg: 1.0,
            est_abv_pct: 0.0,
        }
    }
}

static RECIPE_PROPERTIES: &[PropertyDef<Recipe>] = &[
    property!(text "name", Some("NAME"), name),
    property!(enumerated "type", Some("TYPE"), recipe_type),
    property!(text "brewer", Some("BREWER"), brewer),
    property!(text "asst_brewer", Some("ASST_BREWER"), asst_brewer),
    property!(real "batch_size_l", Some("BATCH_SIZE"), batch_size_l),
    property!(real "boil_size_l", Some("BOIL_SIZE"), boil_size_l),
    property!(real "boil_time_min", Some("BOIL_TIME"), boil_time_min),
    property!(real "efficiency_pct", Some("EFFICIENCY"), efficiency_pct),
    property!(text "notes", Some("NOTES"), notes),
    property!(text "taste_notes", Some("TASTE_NOTES"), taste_notes),
    property!(real "taste_rating", Some("TASTE_RATING"), taste_rating),
    property!(real "og", Some("OG"), og),
    property!(real "fg", Some("FG"), fg),
    property!(int "fermentation_stages", Some("FERMENTATION_STAGES"), fermentation_stages),
    property!(real "primary_age_day", Some("PRIMARY_AGE"), primary_age_day),
    property!(real "primary_temp_c", Some("PRIMARY_TEMP"), primary_temp_c),
    property!(real "secondary_age_day", Some("SECONDARY_AGE"), secondary_age_day),
    property!(real "secondary_temp_c", Some("SECONDARY_TEMP"), secondary_temp_c),
    property!(real "tertiary_age_day", Some("TERTIARY_AGE"), tertiary_age_day),
    property!(real "tertiary_temp_c", Some("TERTIARY_TEMP"), tertiary_temp_c),
    property!(real "age_day", Some("AGE"), age_day),
    property!(real "age_temp_c", Some("AGE_TEMP"), age_temp_c),
    property!(date "date", Some("DATE"), date),
    property!(real "carbonation_vols", Some("CARBONATION"), carbonation_vols),
    property!(bool "forced_carbonation", Some("FORCED_CARBONATION"), forced_carbonation),
    property!(text "priming_sugar_name", Some("PRIMING_SUGAR_NAME"), priming_sugar_name),
    property!(real "carbonation_temp_c", Some("CARBONATION_TEMP"), carbonation_temp_c),
    property!(real "priming_sugar_equiv", Some("PRIMING_SUGAR_EQUIV"), priming_sugar_equiv),
    property!(real "keg_priming_factor", Some("KEG_PRIMING_FACTOR"), keg_priming_factor),
    property!(real "est_og", None, est_og),
    property!(real "est_fg", None, est_fg),
    property!(real "est_abv_pct", None, est_abv_pct),
];

impl Entity for Recipe {
    const KIND: EntityKind = EntityKind::Recipe;

    fn properties() -> &'static [PropertyDef<Self>] {
        RECIPE_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.recipe
    }

    fn name(&self) -> &str {
        &self.name
    }
}
