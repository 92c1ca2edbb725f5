use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use crate::{property, vocabulary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleType {
    Lager,
    #[default]
    Ale,
    Mead,
    Wheat,
    Mixed,
    Cider,
}

vocabulary!(StyleType {
    "Lager" => Lager,
    "Ale" => Ale,
    "Mead" => Mead,
    "Wheat" => Wheat,
    "Mixed" => Mixed,
    "Cider" => Cider,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub category: String,
    pub category_number: String,
    pub style_letter: String,
    pub style_guide: String,
    pub style_type: StyleType,
    pub og_min: f64,
    pub og_max: f64,
    pub fg_min: f64,
    pub fg_max: f64,
    pub ibu_min: f64,
    pub ibu_max: f64,
    pub color_min_srm: f64,
    pub color_max_srm: f64,
    pub abv_min_pct: f64,
    pub abv_max_pct: f64,
    pub carb_min_vol: f64,
    pub carb_max_vol: f64,
    pub notes: String,
    pub profile: String,
    pub ingredients: String,
    pub examples: String,
}

static STYLE_PROPERTIES: &[PropertyDef<Style>] = &[
    property!(text "name", Some("NAME"), name),
    property!(text "category", Some("CATEGORY"), category),
    property!(text "category_number", Some("CATEGORY_NUMBER"), category_number),
    property!(text "style_letter", Some("STYLE_LETTER"), style_letter),
    property!(text "style_guide", Some("STYLE_GUIDE"), style_guide),
    property!(enumerated "type", Some("TYPE"), style_type),
    property!(real "og_min", Some("OG_MIN"), og_min),
    property!(real "og_max", Some("OG_MAX"), og_max),
    property!(real "fg_min", Some("FG_MIN"), fg_min),
    property!(real "fg_max", Some("FG_MAX"), fg_max),
    property!(real "ibu_min", Some("IBU_MIN"), ibu_min),
    property!(real "ibu_max", Some("IBU_MAX"), ibu_max),
    property!(real "color_min_srm", Some("COLOR_MIN"), color_min_srm),
    property!(real "color_max_srm", Some("COLOR_MAX"), color_max_srm),
    property!(real "abv_min_pct", Some("ABV_MIN"), abv_min_pct),
    property!(real "abv_max_pct", Some("ABV_MAX"), abv_max_pct),
    property!(real "carb_min_vol", Some("CARB_MIN"), carb_min_vol),
    property!(real "carb_max_vol", Some("CARB_MAX"), carb_max_vol),
    property!(text "notes", Some("NOTES"), notes),
    property!(text "profile", Some("PROFILE"), profile),
    property!(text "ingredients", Some("INGREDIENTS"), ingredients),
    property!(text "examples", Some("EXAMPLES"), examples),
];

impl Entity for Style {
    const KIND: EntityKind = EntityKind::Style;

    fn properties() -> &'static [PropertyDef<Self>] {
        STYLE_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.style
    }

    fn name(&self) -> &str {
        &self.name
    }
}
