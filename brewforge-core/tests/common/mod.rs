#![allow(dead_code)]

use brewforge_core::{EntityId, ImportOptions, ImportReport, Importer, Store, Validator};
use brewforge_schemas::PropertyTables;

pub struct StepFixture {
    pub name: &'static str,
    pub step_type: &'static str,
    pub temp_c: f64,
    pub infuse_l: f64,
}

pub const fn step(name: &'static str, step_type: &'static str, temp_c: f64, infuse_l: f64) -> StepFixture {
    StepFixture {
        name,
        step_type,
        temp_c,
        infuse_l,
    }
}

/// Brewhouse of the recipe fixture.
pub struct Brewhouse {
    pub grain_kg: f64,
    pub boil_size_l: f64,
    pub absorption_l_kg: f64,
    pub deadspace_l: f64,
}

impl Default for Brewhouse {
    fn default() -> Self {
        // 5 kg of grain, 10 L collected plus 5 L absorbed
        Self {
            grain_kg: 5.0,
            boil_size_l: 10.0,
            absorption_l_kg: 1.0,
            deadspace_l: 0.0,
        }
    }
}

pub fn recipe_xml(name: &str, brewhouse: &Brewhouse, steps: &[StepFixture]) -> String {
    let steps_xml: String = steps
        .iter()
        .map(|s| {
            format!(
                "      <MASH_STEP>
        <NAME>{}</NAME>
        <VERSION>1</VERSION>
        <TYPE>{}</TYPE>
        <STEP_TEMP>{}</STEP_TEMP>
        <STEP_TIME>60</STEP_TIME>
        <INFUSE_AMOUNT>{}</INFUSE_AMOUNT>
      </MASH_STEP>
",
                s.name, s.step_type, s.temp_c, s.infuse_l
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<RECIPES>
  <RECIPE>
    <NAME>{name}</NAME>
    <VERSION>1</VERSION>
    <TYPE>All Grain</TYPE>
    <BREWER>Ada</BREWER>
    <BATCH_SIZE>19</BATCH_SIZE>
    <BOIL_SIZE>{boil}</BOIL_SIZE>
    <BOIL_TIME>60</BOIL_TIME>
    <EFFICIENCY>72</EFFICIENCY>
    <STYLE>
      <NAME>Bitter</NAME>
      <VERSION>1</VERSION>
      <TYPE>Ale</TYPE>
      <CATEGORY>English Pale Ale</CATEGORY>
    </STYLE>
    <EQUIPMENT>
      <NAME>Cooler</NAME>
      <VERSION>1</VERSION>
      <BOIL_SIZE>{boil}</BOIL_SIZE>
      <BATCH_SIZE>19</BATCH_SIZE>
      <LAUTER_DEADSPACE>{dead}</LAUTER_DEADSPACE>
      <ABSORPTION>{abs}</ABSORPTION>
      <BOILING_POINT>100</BOILING_POINT>
    </EQUIPMENT>
    <HOPS>
      <HOP>
        <NAME>Fuggle</NAME>
        <VERSION>1</VERSION>
        <ALPHA>4.5</ALPHA>
        <AMOUNT>0.03</AMOUNT>
        <USE>Boil</USE>
        <TIME>60</TIME>
        <TYPE>Aroma</TYPE>
        <FORM>Pellet</FORM>
      </HOP>
    </HOPS>
    <FERMENTABLES>
      <FERMENTABLE>
        <NAME>Maris Otter</NAME>
        <VERSION>1</VERSION>
        <TYPE>Grain</TYPE>
        <AMOUNT>{grain}</AMOUNT>
        <YIELD>80</YIELD>
        <COLOR>3</COLOR>
      </FERMENTABLE>
    </FERMENTABLES>
    <YEASTS>
      <YEAST>
        <NAME>London Ale</NAME>
        <VERSION>1</VERSION>
        <TYPE>Ale</TYPE>
        <FORM>Liquid</FORM>
        <FLOCCULATION>High</FLOCCULATION>
        <ATTENUATION>73</ATTENUATION>
      </YEAST>
    </YEASTS>
    <MASH>
      <NAME>Single Infusion</NAME>
      <VERSION>1</VERSION>
      <GRAIN_TEMP>20</GRAIN_TEMP>
      <TUN_TEMP>20</TUN_TEMP>
      <SPARGE_TEMP>74</SPARGE_TEMP>
      <TUN_WEIGHT>0</TUN_WEIGHT>
      <MASH_STEPS>
{steps_xml}      </MASH_STEPS>
    </MASH>
  </RECIPE>
</RECIPES>
",
        boil = brewhouse.boil_size_l,
        dead = brewhouse.deadspace_l,
        abs = brewhouse.absorption_l_kg,
        grain = brewhouse.grain_kg,
    )
}

pub fn import(store: &mut Store, xml: &str, options: ImportOptions) -> ImportReport {
    let tables = PropertyTables::new();
    let validator = Validator::new().expect("embedded grammar loads");
    let mut importer = Importer::new(store, &tables, &validator, options);
    importer.import_document(xml.as_bytes()).expect("document imports")
}

/// Imports a recipe fixture and returns its id.
pub fn import_recipe(store: &mut Store, brewhouse: &Brewhouse, steps: &[StepFixture]) -> EntityId {
    let report = import(
        store,
        &recipe_xml("Ordinary Bitter", brewhouse, steps),
        ImportOptions::default(),
    );
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.recipes.len(), 1);
    report.recipes[0].id
}
