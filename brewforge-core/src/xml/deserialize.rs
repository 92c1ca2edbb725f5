//! Table-driven population of an entity from one XML element.

use crate::xml::diagnostic::{Diagnostic, Severity};
use crate::xml::tree::XmlElement;
use brewforge_schemas::property::{Entity, PropertyTable, Value, ValueKind};
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d %b %Y", "%d %b %y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_uppercase().as_str() {
        "TRUE" | "1" => Some(true),
        "FALSE" | "0" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
}

/// ISO-8601 date-time; a bare date is read as midnight.
pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Converts element text to the value kind a property expects.
pub fn coerce(text: &str, kind: ValueKind) -> Option<Value> {
    let trimmed = text.trim();
    match kind {
        ValueKind::Boolean => parse_bool(trimmed).map(Value::Bool),
        ValueKind::Real => trimmed.parse::<f64>().ok().map(Value::Real),
        ValueKind::Integer => trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| {
                // Some writers emit "3.0" for counts.
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .map(Value::Int),
        ValueKind::Date => parse_date(trimmed).map(|d| Value::Date(Some(d))),
        ValueKind::DateTime => parse_datetime(trimmed).map(|d| Value::DateTime(Some(d))),
        ValueKind::Text => Some(Value::Text(text.to_string())),
        ValueKind::Enumerated => None,
    }
}

/// Assigns every mapped, non-enumerated child of `element` onto `entity`.
///
/// Unmapped tags are skipped. A value that cannot be coerced leaves the
/// field untouched and yields an `Invalid` diagnostic; the remaining fields
/// are still read.
pub fn populate<E: Entity>(
    entity: &mut E,
    element: &XmlElement,
    table: &PropertyTable<E>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for child in &element.children {
        let Some(text) = child.text.as_deref() else {
            continue;
        };
        let Some(def) = table.by_xml_tag(&child.name) else {
            continue;
        };
        if def.kind == ValueKind::Enumerated {
            continue;
        }
        if def.kind != ValueKind::Text && text.trim().is_empty() {
            continue;
        }
        match coerce(text, def.kind) {
            Some(value) => (def.set)(entity, value),
            None => {
                let name = entity.name().to_string();
                tracing::warn!("Could not read {} '{}' {} from '{}'", E::KIND, name, child.name, text);
                diagnostics.push(Diagnostic::new(
                    E::KIND,
                    &name,
                    Some(&child.name),
                    Severity::Invalid,
                    format!("cannot read '{text}' as {:?}", def.kind),
                ));
            }
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree;
    use brewforge_schemas::{fermentable::Fermentable, recipe::Recipe, PropertyTables};

    #[test]
    fn coerces_each_kind() {
        assert_eq!(coerce("TRUE", ValueKind::Boolean), Some(Value::Bool(true)));
        assert_eq!(coerce("false", ValueKind::Boolean), Some(Value::Bool(false)));
        assert_eq!(coerce("1", ValueKind::Boolean), Some(Value::Bool(true)));
        assert_eq!(coerce(" 2.5 ", ValueKind::Real), Some(Value::Real(2.5)));
        assert_eq!(coerce("2,5", ValueKind::Real), None);
        assert_eq!(coerce("3.0", ValueKind::Integer), Some(Value::Int(3)));
        assert_eq!(
            coerce("3 Dec 2004", ValueKind::Date),
            Some(Value::Date(NaiveDate::from_ymd_opt(2004, 12, 3)))
        );
        assert_eq!(
            coerce("2021-05-01", ValueKind::DateTime),
            Some(Value::DateTime(
                NaiveDate::from_ymd_opt(2021, 5, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
            ))
        );
        assert_eq!(coerce("Grain", ValueKind::Enumerated), None);
    }

    #[test]
    fn populate_reads_mapped_tags_and_keeps_going_after_bad_values() {
        let doc = tree::parse(
            "<FERMENTABLE><NAME>Pale</NAME><AMOUNT>lots</AMOUNT><YIELD>80</YIELD>\
             <TYPE>Grain</TYPE><UNKNOWN>1</UNKNOWN><RECOMMEND_MASH>TRUE</RECOMMEND_MASH></FERMENTABLE>",
        )
        .unwrap();
        let element = &doc.children[0];
        let tables = PropertyTables::new();
        let mut fermentable = Fermentable::default();
        let diagnostics = populate(&mut fermentable, element, &tables.fermentable);

        assert_eq!(fermentable.name, "Pale");
        assert_eq!(fermentable.yield_pct, 80.0);
        assert!(fermentable.recommend_mash);
        assert_eq!(fermentable.amount_kg, 0.0);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field.as_deref(), Some("AMOUNT"));
        assert_eq!(diagnostics[0].severity, Severity::Invalid);
    }

    #[test]
    fn populate_reads_dates() {
        let doc = tree::parse("<RECIPE><NAME>r</NAME><DATE>2020-02-29</DATE></RECIPE>").unwrap();
        let tables = PropertyTables::new();
        let mut recipe = Recipe::default();
        assert!(populate(&mut recipe, &doc.children[0], &tables.recipe).is_empty());
        assert_eq!(recipe.date, NaiveDate::from_ymd_opt(2020, 2, 29));
    }
}
