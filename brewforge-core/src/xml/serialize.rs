//! Entity and recipe export, driven by the same property tables as import.

use crate::xml::tree::{self, XmlElement, XmlError};
use brewforge_schemas::{
    document::{MashDocument, RecipeDocument},
    property::{Entity, PropertyTable, PropertyTables, Value},
    EntityKind,
};

/// One element per entity: `VERSION` first, then every tagged property in
/// table order.
pub fn entity_element<E: Entity>(entity: &E, table: &PropertyTable<E>) -> XmlElement {
    let mut element = XmlElement::new(E::KIND.xml_tag());
    element.push(XmlElement::with_text("VERSION", "1"));
    for def in table.exported() {
        if let Some(tag) = def.xml_tag {
            match format_value(&(def.get)(entity)) {
                Some(text) => element.push(XmlElement::with_text(tag, text)),
                None => element.push(XmlElement::new(tag)),
            }
        }
    }
    element
}

/// Text for a property value; `None` for an unset date.
pub fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Value::Real(r) => Some(r.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Date(d) => d.map(|d| d.format("%Y-%m-%d").to_string()),
        Value::DateTime(d) => d.map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string()),
        Value::Text(t) => Some(t.clone()),
    }
}

fn container<'a, E: Entity + 'a>(
    items: impl IntoIterator<Item = &'a E>,
    table: &PropertyTable<E>,
) -> XmlElement {
    let mut element = XmlElement::new(E::KIND.container_tag());
    for item in items {
        element.push(entity_element(item, table));
    }
    element
}

pub fn mash_element(mash: &MashDocument, tables: &PropertyTables) -> XmlElement {
    let mut element = entity_element(&mash.mash, &tables.mash);
    element.push(container(&mash.steps, &tables.mash_step));
    element
}

pub fn recipe_element(doc: &RecipeDocument, tables: &PropertyTables) -> XmlElement {
    let mut element = entity_element(&doc.recipe, &tables.recipe);
    if let Some(style) = &doc.style {
        element.push(entity_element(style, &tables.style));
    }
    element.push(container(&doc.hops, &tables.hop));
    element.push(container(&doc.fermentables, &tables.fermentable));
    element.push(container(&doc.miscs, &tables.misc));
    element.push(container(&doc.yeasts, &tables.yeast));
    element.push(container(&doc.waters, &tables.water));
    if let Some(mash) = &doc.mash {
        element.push(mash_element(mash, tables));
    }
    element.push(container(&doc.instructions, &tables.instruction));
    element.push(container(&doc.brew_notes, &tables.brew_note));
    if let Some(equipment) = &doc.equipment {
        element.push(entity_element(equipment, &tables.equipment));
    }
    element
}

/// Writes `elements` under the plural container for `kind`.
pub fn write_document(kind: EntityKind, elements: Vec<XmlElement>) -> Result<String, XmlError> {
    let mut root = XmlElement::new(kind.container_tag());
    root.children = elements;
    tree::write(&[root])
}

pub fn write_recipes(docs: &[RecipeDocument], tables: &PropertyTables) -> Result<String, XmlError> {
    write_document(
        EntityKind::Recipe,
        docs.iter().map(|d| recipe_element(d, tables)).collect(),
    )
}

/// Standalone export of a list of entities of one kind, e.g. a hop library.
pub fn write_entities<'a, E: Entity + 'a>(
    entities: impl IntoIterator<Item = &'a E>,
    table: &PropertyTable<E>,
) -> Result<String, XmlError> {
    write_document(
        E::KIND,
        entities.into_iter().map(|e| entity_element(e, table)).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewforge_schemas::{
        hop::{Hop, HopUse},
        mash::{MashStep, MashStepType},
    };

    #[test]
    fn entity_element_starts_with_version_and_skips_untagged() {
        let tables = PropertyTables::new();
        let hop = Hop {
            name: "Fuggle".into(),
            alpha_pct: 4.5,
            hop_use: HopUse::DryHop,
            inventory_kg: 3.0,
            ..Hop::default()
        };
        let element = entity_element(&hop, &tables.hop);
        assert_eq!(element.name, "HOP");
        assert_eq!(element.children[0].name, "VERSION");
        assert_eq!(element.child_text("ALPHA"), Some("4.5"));
        assert_eq!(element.child_text("USE"), Some("Dry Hop"));
        assert!(element.children.iter().all(|c| c.name != "INVENTORY"));
    }

    #[test]
    fn sparge_steps_are_written_as_infusion() {
        let tables = PropertyTables::new();
        let mut step = MashStep::new("Batch Sparge 1", MashStepType::BatchSparge);
        step.step_number = 3;
        let element = entity_element(&step, &tables.mash_step);
        assert_eq!(element.child_text("TYPE"), Some("Infusion"));
    }

    #[test]
    fn formats_values() {
        assert_eq!(format_value(&Value::Bool(true)).as_deref(), Some("TRUE"));
        assert_eq!(format_value(&Value::Real(1.0)).as_deref(), Some("1"));
        assert_eq!(format_value(&Value::Real(0.1)).as_deref(), Some("0.1"));
        assert_eq!(format_value(&Value::Date(None)), None);
    }

    #[test]
    fn writes_a_hop_library_under_hops() {
        let tables = PropertyTables::new();
        let hops = vec![
            Hop {
                name: "Saaz".into(),
                ..Hop::default()
            },
            Hop {
                name: "Cascade".into(),
                ..Hop::default()
            },
        ];
        let text = write_entities(&hops, &tables.hop).unwrap();
        assert!(text.starts_with("<?xml"));
        let doc = tree::parse(&text).unwrap();
        let root = &doc.children[0];
        assert_eq!(root.name, "HOPS");
        assert_eq!(root.children_named("HOP").count(), 2);
    }
}
