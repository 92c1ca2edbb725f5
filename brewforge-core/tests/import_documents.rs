mod common;

use brewforge_core::error::{BrewforgeError, ImportFailure};
use brewforge_core::xml::serialize::{write_entities, write_recipes};
use brewforge_core::xml::{ImportEvent, Severity};
use brewforge_core::{ImportOptions, Importer, Store, Validator};
use brewforge_schemas::{
    fermentable::Fermentable, hop::Hop, mash::Mash, recipe::Recipe, style::Style, water::Water,
    yeast::Yeast,
    EntityKind, PropertyTables,
};
use common::{import, recipe_xml, step, Brewhouse};

const HOP_LIBRARY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<HOPS>
  <HOP>
    <NAME>Cascade</NAME>
    <VERSION>1</VERSION>
    <ALPHA>5.5</ALPHA>
    <USE>Boil</USE>
    <TYPE>Aroma</TYPE>
    <FORM>Pellet</FORM>
    <FOO>bar</FOO>
  </HOP>
</HOPS>
";

fn lenient() -> ImportOptions {
    ImportOptions {
        enforce_validation: false,
    }
}

#[test]
fn recipe_is_assembled_with_everything_it_owns() {
    let mut store = Store::new();
    let xml = recipe_xml("Ordinary Bitter", &Brewhouse::default(), &[step("Rest", "Infusion", 65.0, 15.0)]);
    let report = import(&mut store, &xml, ImportOptions::default());

    assert!(report.validation.is_valid());
    assert_eq!(report.recipes.len(), 1);
    let imported = &report.recipes[0];
    assert!(imported.is_valid(), "{:?}", imported.diagnostics);

    let doc = store.recipe_document(imported.id).unwrap();
    assert_eq!(doc.recipe.brewer, "Ada");
    assert_eq!(doc.style.as_ref().map(|s| s.name.as_str()), Some("Bitter"));
    assert_eq!(doc.equipment.as_ref().map(|e| e.lauter_deadspace_l), Some(0.0));
    assert_eq!(doc.hops.len(), 1);
    assert_eq!(doc.yeasts.len(), 1);
    let mash = doc.mash.expect("mash is linked");
    assert_eq!(mash.steps.len(), 1);
    assert_eq!(mash.steps[0].step_number, 1);
    assert!(doc.recipe.est_og > 1.0);
    assert!(doc.recipe.est_fg < doc.recipe.est_og);

    // recipe-owned copies stay out of listings
    let style = store.iter::<Style>().next().unwrap();
    assert!(!style.display);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, ImportEvent::Created { kind: EntityKind::Recipe, .. })));
}

#[test]
fn unknown_fermentable_type_invalidates_only_the_recipe_flag() {
    let mut store = Store::new();
    let xml = recipe_xml("Ordinary Bitter", &Brewhouse::default(), &[step("Rest", "Infusion", 65.0, 15.0)])
        .replace("<TYPE>Grain</TYPE>", "<TYPE>Liquid Gold</TYPE>");
    let report = import(&mut store, &xml, ImportOptions::default());

    let imported = &report.recipes[0];
    assert!(!imported.is_valid());
    let problem = imported
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Invalid)
        .unwrap();
    assert_eq!(problem.kind, EntityKind::Fermentable);
    assert_eq!(problem.field.as_deref(), Some("TYPE"));

    // everything else is still there
    let doc = store.recipe_document(imported.id).unwrap();
    assert_eq!(doc.fermentables.len(), 1);
    assert_eq!(doc.hops.len(), 1);
    assert_eq!(doc.yeasts.len(), 1);
    assert!(doc.mash.is_some());
}

#[test]
fn recipe_without_mash_is_flagged() {
    let mut store = Store::new();
    let xml = recipe_xml("Extract Bitter", &Brewhouse::default(), &[]);
    let start = xml.find("    <MASH>").unwrap();
    let end = xml.find("</MASH>\n").unwrap() + "</MASH>\n".len();
    let xml = format!("{}{}", &xml[..start], &xml[end..]);

    let report = import(&mut store, &xml, ImportOptions::default());
    let imported = &report.recipes[0];
    assert!(imported
        .diagnostics
        .iter()
        .any(|d| d.kind == EntityKind::Recipe && d.field.as_deref() == Some("MASH")));
    assert_eq!(store.len::<Mash>(), 0);
}

#[test]
fn unknown_tags_are_ignored_and_reported_with_their_line() {
    let mut store = Store::new();
    let report = import(&mut store, HOP_LIBRARY, ImportOptions::default());

    assert!(report.validation.is_valid());
    assert_eq!(report.validation.ignored.len(), 1);
    let issue = &report.validation.ignored[0];
    assert_eq!(issue.line, 10);
    assert!(issue.message.starts_with("no declaration found for element 'FOO'"));

    assert_eq!(report.entities.len(), 1);
    let hop = store.find_by_name::<Hop>("Cascade").unwrap();
    assert_eq!(hop.data.alpha_pct, 5.5);
    assert!(hop.display);
}

#[test]
fn standalone_import_reuses_entities_by_name() {
    let mut store = Store::new();
    let first = import(&mut store, HOP_LIBRARY, ImportOptions::default());
    let altered = HOP_LIBRARY.replace("<ALPHA>5.5</ALPHA>", "<ALPHA>7.0</ALPHA>");
    let second = import(&mut store, &altered, ImportOptions::default());

    assert_eq!(store.len::<Hop>(), 1);
    assert!(!first.entities[0].reused);
    assert!(second.entities[0].reused);
    assert_eq!(first.entities[0].id, second.entities[0].id);
    assert!(matches!(
        second.events.as_slice(),
        [ImportEvent::Reused { kind: EntityKind::Hop, .. }]
    ));
    // the stored hop is not re-populated
    assert_eq!(store.find_by_name::<Hop>("Cascade").unwrap().data.alpha_pct, 5.5);
}

#[test]
fn fatal_validation_issues_refuse_the_document() {
    let mut store = Store::new();
    let xml = HOP_LIBRARY.replace("<ALPHA>5.5</ALPHA>", "<ALPHA>lots</ALPHA>");
    let tables = PropertyTables::new();
    let validator = Validator::new().unwrap();
    let mut importer = Importer::new(&mut store, &tables, &validator, ImportOptions::default());

    match importer.import_document(xml.as_bytes()) {
        Err(BrewforgeError::ValidationFailed(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].line, 6);
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }
    assert_eq!(store.len::<Hop>(), 0);
}

#[test]
fn structural_failure_rolls_the_recipe_back() {
    let mut store = Store::new();
    let xml = recipe_xml("Ordinary Bitter", &Brewhouse::default(), &[step("Rest", "Infusion", 65.0, 15.0)])
        .replace("<NAME>Fuggle</NAME>", "");
    let report = import(&mut store, &xml, lenient());

    assert!(!report.validation.is_valid());
    assert!(report.recipes.is_empty());
    assert!(matches!(
        report.failures.as_slice(),
        [ImportFailure::MissingName { kind: EntityKind::Hop, .. }]
    ));
    assert!(report.events.is_empty());
    assert_eq!(store.len::<Recipe>(), 0);
    assert_eq!(store.len::<Style>(), 0);
    assert_eq!(store.len::<Hop>(), 0);
    assert_eq!(store.len::<Fermentable>(), 0);
    assert_eq!(store.len::<Yeast>(), 0);
    assert!(!store.in_transaction());
}

#[test]
fn exported_recipe_imports_to_the_same_document() {
    let mut store = Store::new();
    let xml = recipe_xml(
        "Ordinary Bitter",
        &Brewhouse::default(),
        &[step("Rest", "Infusion", 65.0, 15.0), step("Mash Out", "Temperature", 76.0, 0.0)],
    );
    let report = import(&mut store, &xml, ImportOptions::default());
    let original = store.recipe_document(report.recipes[0].id).unwrap();

    let tables = PropertyTables::new();
    let exported = write_recipes(std::slice::from_ref(&original), &tables).unwrap();

    let mut other = Store::new();
    let again = import(&mut other, &exported, ImportOptions::default());
    assert!(again.validation.fatal.is_empty(), "{:?}", again.validation.fatal);
    let copy = other.recipe_document(again.recipes[0].id).unwrap();

    assert_eq!(copy, original);
}

#[test]
fn latin1_document_is_decoded_from_its_declaration() {
    let text = HOP_LIBRARY
        .replace("UTF-8", "ISO-8859-1")
        .replace("Cascade", "Hallertauer Mittelfr\u{fc}h");
    let bytes: Vec<u8> = text.chars().map(|c| c as u8).collect();
    assert!(std::str::from_utf8(&bytes).is_err());

    let mut store = Store::new();
    let tables = PropertyTables::new();
    let validator = Validator::new().unwrap();
    let mut importer = Importer::new(&mut store, &tables, &validator, ImportOptions::default());
    let report = importer.import_document(&bytes).unwrap();

    assert!(report.validation.is_valid(), "{:?}", report.validation.fatal);
    assert_eq!(report.entities.len(), 1);
    assert!(report.entities[0].is_valid());
    let hop = store.find_by_name::<Hop>("Hallertauer Mittelfr\u{fc}h").unwrap();
    assert_eq!(hop.data.alpha_pct, 5.5);
}

#[test]
fn free_text_keeps_its_whitespace_through_export() {
    let mut store = Store::new();
    let xml = HOP_LIBRARY.replace("<FOO>bar</FOO>", "<NOTES>  spicy\n</NOTES>");
    import(&mut store, &xml, ImportOptions::default());
    let hop = store.find_by_name::<Hop>("Cascade").unwrap().data.clone();
    assert_eq!(hop.notes, "  spicy\n");

    let tables = PropertyTables::new();
    let exported = write_entities(std::iter::once(&hop), &tables.hop).unwrap();
    let mut other = Store::new();
    import(&mut other, &exported, ImportOptions::default());
    let copy = other.find_by_name::<Hop>("Cascade").unwrap();
    assert_eq!(copy.data.notes, "  spicy\n");
    assert_eq!(copy.data.alpha_pct, 5.5);
}

#[test]
fn unreadable_water_does_not_invalidate_the_recipe() {
    let mut store = Store::new();
    let waters = "    <WATERS>
      <WATER>
        <NAME>Burton</NAME>
        <VERSION>1</VERSION>
        <AMOUNT>20</AMOUNT>
        <CALCIUM>plenty</CALCIUM>
      </WATER>
    </WATERS>
    <MASH>
";
    let xml = recipe_xml("Ordinary Bitter", &Brewhouse::default(), &[step("Rest", "Infusion", 65.0, 15.0)])
        .replacen("    <MASH>\n", waters, 1);
    let report = import(&mut store, &xml, lenient());

    assert!(!report.validation.is_valid());
    let imported = &report.recipes[0];
    assert!(imported.is_valid(), "{:?}", imported.diagnostics);
    let water_issue = imported
        .diagnostics
        .iter()
        .find(|d| d.kind == EntityKind::Water)
        .expect("water problem is kept");
    assert_eq!(water_issue.severity, Severity::Warning);
    assert_eq!(water_issue.field.as_deref(), Some("CALCIUM"));

    let doc = store.recipe_document(imported.id).unwrap();
    assert_eq!(doc.waters.len(), 1);
    assert_eq!(doc.waters[0].amount_l, 20.0);
    assert_eq!(store.len::<Water>(), 1);
}

#[test]
fn library_import_joins_a_transaction_opened_by_the_caller() {
    let mut store = Store::new();
    let tables = PropertyTables::new();
    let validator = Validator::new().unwrap();
    let mut importer = Importer::new(&mut store, &tables, &validator, ImportOptions::default());

    importer.begin().unwrap();
    let report = importer.import_document(HOP_LIBRARY.as_bytes()).unwrap();
    assert_eq!(report.entities.len(), 1);
    assert!(report.events.is_empty());
    assert!(importer.store().in_transaction());
    assert_eq!(importer.store().len::<Hop>(), 1);

    let events = importer.commit().unwrap();
    assert!(matches!(
        events.as_slice(),
        [ImportEvent::Created { kind: EntityKind::Hop, name, .. }] if name == "Cascade"
    ));
    assert!(!importer.store().in_transaction());
    assert_eq!(store.len::<Hop>(), 1);
}

#[test]
fn caller_rollback_discards_joined_imports() {
    let mut store = Store::new();
    let tables = PropertyTables::new();
    let validator = Validator::new().unwrap();
    let mut importer = Importer::new(&mut store, &tables, &validator, ImportOptions::default());

    importer.begin().unwrap();
    importer.import_document(HOP_LIBRARY.as_bytes()).unwrap();
    importer.rollback().unwrap();
    let report = importer.import_document(HOP_LIBRARY.as_bytes()).unwrap();

    // the rolled-back hop is gone, so this import creates it afresh
    assert!(matches!(
        report.events.as_slice(),
        [ImportEvent::Created { kind: EntityKind::Hop, .. }]
    ));
    assert_eq!(store.len::<Hop>(), 1);
}
