//! Entity resolution and recipe assembly.
//!
//! Standalone entities are deduplicated by exact name. Entities nested in a
//! recipe are always fresh copies owned by that recipe. Each recipe is
//! assembled inside one store transaction and rolled back as a whole if
//! anything structural goes wrong.

use crate::analysis;
use crate::error::{BrewforgeError, ImportFailure, StoreError};
use crate::store::{EntityId, Store};
use crate::xml::deserialize::populate;
use crate::xml::diagnostic::{Diagnostic, Populated, Severity};
use crate::xml::enums::EnumFields;
use crate::xml::tree::{self, XmlElement};
use crate::xml::validator::{ValidationReport, Validator};
use brewforge_schemas::{
    brew_note::BrewNote,
    equipment::Equipment,
    fermentable::Fermentable,
    hop::Hop,
    instruction::Instruction,
    mash::{Mash, MashStep},
    misc::Misc,
    recipe::Recipe,
    style::Style,
    water::Water,
    yeast::Yeast,
    Entity, EntityKind, PropertyTables,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    /// Refuse documents with fatal validation issues.
    pub enforce_validation: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            enforce_validation: true,
        }
    }
}

/// Published once the transaction that produced it commits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportEvent {
    Created { kind: EntityKind, id: EntityId, name: String },
    Reused { kind: EntityKind, id: EntityId, name: String },
}

#[derive(Debug, Clone)]
pub struct ImportedRecipe {
    pub id: EntityId,
    pub name: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportedRecipe {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Invalid)
    }
}

/// Outcome of importing one standalone element.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
    pub reused: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolved {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Invalid)
    }
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub validation: ValidationReport,
    pub recipes: Vec<ImportedRecipe>,
    pub entities: Vec<Resolved>,
    pub failures: Vec<ImportFailure>,
    pub events: Vec<ImportEvent>,
}

/// Ingredient containers of a recipe, in processing order.
const INGREDIENTS: [(&str, EntityKind); 5] = [
    ("HOPS", EntityKind::Hop),
    ("FERMENTABLES", EntityKind::Fermentable),
    ("MISCS", EntityKind::Misc),
    ("YEASTS", EntityKind::Yeast),
    ("WATERS", EntityKind::Water),
];

pub struct Importer<'a> {
    store: &'a mut Store,
    tables: &'a PropertyTables,
    validator: &'a Validator,
    options: ImportOptions,
    pending: Vec<ImportEvent>,
    published: Vec<ImportEvent>,
}

fn record(result: Result<Resolved, ImportFailure>, report: &mut ImportReport) {
    match result {
        Ok(resolved) => report.entities.push(resolved),
        Err(failure) => {
            tracing::error!("Standalone import rolled back: {}", failure);
            report.failures.push(failure);
        }
    }
}

fn required_name<E: Entity>(element: &XmlElement) -> Result<String, ImportFailure> {
    match element.child_text("NAME") {
        Some(name) if !name.trim().is_empty() => Ok(name.to_string()),
        _ => Err(ImportFailure::MissingName {
            kind: E::KIND,
            line: element.line,
        }),
    }
}

impl<'a> Importer<'a> {
    pub fn new(
        store: &'a mut Store,
        tables: &'a PropertyTables,
        validator: &'a Validator,
        options: ImportOptions,
    ) -> Self {
        Self {
            store,
            tables,
            validator,
            options,
            pending: Vec::new(),
            published: Vec::new(),
        }
    }

    /// Validates, parses and imports a whole BeerXML document.
    ///
    /// Every RECIPE is imported in its own transaction. A document without
    /// recipes is read as a library of standalone entities.
    pub fn import_document(&mut self, bytes: &[u8]) -> Result<ImportReport, BrewforgeError> {
        let validation = self.validator.validate(bytes);
        if !validation.is_valid() {
            if self.options.enforce_validation {
                return Err(BrewforgeError::ValidationFailed(validation.fatal));
            }
            tracing::warn!(
                "Importing despite {} fatal validation issue(s)",
                validation.fatal.len()
            );
        }

        let text = tree::decode(bytes).map_err(|e| BrewforgeError::Xml(e.to_string()))?;
        let document = tree::parse(&text).map_err(|e| BrewforgeError::Xml(e.to_string()))?;

        let mut report = ImportReport {
            validation,
            ..ImportReport::default()
        };

        let recipes = document.descendants_named("RECIPE");
        if recipes.is_empty() {
            self.import_library(&document, &mut report);
        } else {
            for element in recipes {
                match self.import_recipe(element) {
                    Ok(recipe) => report.recipes.push(recipe),
                    Err(failure) => {
                        tracing::error!("Recipe import rolled back: {}", failure);
                        report.failures.push(failure);
                    }
                }
            }
        }

        report.events = std::mem::take(&mut self.published);
        Ok(report)
    }

    fn import_library(&mut self, document: &XmlElement, report: &mut ImportReport) {
        for element in document.descendants_named("EQUIPMENT") {
            record(self.import_entity::<Equipment>(element), report);
        }
        for element in document.descendants_named("FERMENTABLE") {
            record(self.import_entity::<Fermentable>(element), report);
        }
        for element in document.descendants_named("HOP") {
            record(self.import_entity::<Hop>(element), report);
        }
        for element in document.descendants_named("MISC") {
            record(self.import_entity::<Misc>(element), report);
        }
        for element in document.descendants_named("STYLE") {
            record(self.import_entity::<Style>(element), report);
        }
        for element in document.descendants_named("YEAST") {
            record(self.import_entity::<Yeast>(element), report);
        }
        for element in document.descendants_named("WATER") {
            record(self.import_entity::<Water>(element), report);
        }
        for element in document.descendants_named("MASH") {
            record(self.import_mash(element), report);
        }
    }

    // --- transactions ---

    pub fn store(&self) -> &Store {
        &*self.store
    }

    /// Opens a transaction that later imports join instead of committing
    /// on their own.
    pub fn begin(&mut self) -> Result<(), StoreError> {
        self.store.begin()
    }

    /// Commits the caller's transaction and returns the events it produced.
    pub fn commit(&mut self) -> Result<Vec<ImportEvent>, StoreError> {
        self.store.commit()?;
        self.published.append(&mut self.pending);
        Ok(std::mem::take(&mut self.published))
    }

    /// Rolls the caller's transaction back, dropping its events.
    pub fn rollback(&mut self) -> Result<(), StoreError> {
        self.store.rollback()?;
        self.pending.clear();
        Ok(())
    }

    /// Runs `work` in its own transaction, or inside the caller's if one is
    /// already open.
    fn transaction<T>(
        &mut self,
        work: impl FnOnce(&mut Self) -> Result<T, ImportFailure>,
    ) -> Result<T, ImportFailure> {
        let owned = !self.store.in_transaction();
        if owned {
            self.store.begin()?;
        }
        match work(self) {
            Ok(value) => {
                if owned {
                    self.store.commit()?;
                    self.published.append(&mut self.pending);
                }
                Ok(value)
            }
            Err(failure) => {
                if owned {
                    self.store.rollback()?;
                    self.pending.clear();
                }
                Err(failure)
            }
        }
    }

    fn created(&mut self, kind: EntityKind, id: EntityId, name: &str) {
        self.pending.push(ImportEvent::Created {
            kind,
            id,
            name: name.to_string(),
        });
    }

    // --- building blocks ---

    /// A fresh entity populated from `element`, enumerations included.
    fn build<T: EnumFields>(&self, element: &XmlElement) -> Populated<T> {
        let mut entity = T::default();
        let mut diagnostics = populate(&mut entity, element, T::table(self.tables));
        diagnostics.extend(entity.resolve_enums(element, &*self.store));
        Populated { entity, diagnostics }
    }

    /// Imports a named entity outside any recipe, reusing the first stored
    /// entity with the same name.
    pub fn import_entity<T: EnumFields>(&mut self, element: &XmlElement) -> Result<Resolved, ImportFailure> {
        let name = required_name::<T>(element)?;
        self.transaction(|this| {
            if let Some(existing) = this.store.find_by_name::<T>(&name) {
                let id = existing.id;
                tracing::debug!("Reusing existing {} '{}' (#{})", T::KIND, name, id);
                this.pending.push(ImportEvent::Reused {
                    kind: T::KIND,
                    id,
                    name: name.clone(),
                });
                return Ok(Resolved {
                    kind: T::KIND,
                    id,
                    name,
                    reused: true,
                    diagnostics: Vec::new(),
                });
            }
            let populated = this.build::<T>(element);
            let valid = populated.is_valid();
            let id = this.store.insert(populated.entity, true);
            this.created(T::KIND, id, &name);
            tracing::debug!("Created {} '{}' (#{}), valid: {}", T::KIND, name, id, valid);
            Ok(Resolved {
                kind: T::KIND,
                id,
                name,
                reused: false,
                diagnostics: populated.diagnostics,
            })
        })
    }

    /// A standalone mash is always created; it is listed only if no mash of
    /// the same name exists yet.
    pub fn import_mash(&mut self, element: &XmlElement) -> Result<Resolved, ImportFailure> {
        let name = required_name::<Mash>(element)?;
        self.transaction(|this| {
            let display = this.store.find_by_name::<Mash>(&name).is_none();
            let (id, diagnostics) = this.insert_mash(element, display)?;
            Ok(Resolved {
                kind: EntityKind::Mash,
                id,
                name,
                reused: false,
                diagnostics,
            })
        })
    }

    /// Persists a mash and then its steps in document order. Step problems
    /// are kept as warnings.
    fn insert_mash(
        &mut self,
        element: &XmlElement,
        display: bool,
    ) -> Result<(EntityId, Vec<Diagnostic>), ImportFailure> {
        let populated = self.build::<Mash>(element);
        let name = populated.entity.name.clone();
        let mut diagnostics = populated.diagnostics;
        let mash_id = self.store.insert(populated.entity, display);
        self.created(EntityKind::Mash, mash_id, &name);

        let steps = element
            .child("MASH_STEPS")
            .map(|s| s.children_named("MASH_STEP").collect::<Vec<_>>())
            .unwrap_or_default();
        for (index, step_element) in steps.into_iter().enumerate() {
            let mut step = self.build::<MashStep>(step_element);
            step.entity.step_number = index as i64 + 1;
            if !step.is_valid() {
                tracing::warn!("Mash '{}' step {} is invalid", name, step.entity.step_number);
            }
            diagnostics.extend(step.diagnostics.into_iter().map(Diagnostic::as_warning));
            let step_name = step.entity.name.clone();
            let step_id = self.store.insert_child(mash_id, step.entity)?;
            self.created(EntityKind::MashStep, step_id, &step_name);
        }
        Ok((mash_id, diagnostics))
    }

    /// A recipe-owned copy, linked to `recipe`.
    fn insert_owned<T: EnumFields>(
        &mut self,
        recipe: EntityId,
        element: &XmlElement,
        display: bool,
    ) -> Result<Vec<Diagnostic>, ImportFailure> {
        required_name::<T>(element)?;
        let populated = self.build::<T>(element);
        let name = populated.entity.name().to_string();
        let id = self.store.insert(populated.entity, display);
        self.store.link(recipe, T::KIND, id)?;
        self.created(T::KIND, id, &name);
        Ok(populated.diagnostics)
    }

    fn insert_ingredient(
        &mut self,
        recipe: EntityId,
        kind: EntityKind,
        element: &XmlElement,
    ) -> Result<Vec<Diagnostic>, ImportFailure> {
        match kind {
            EntityKind::Hop => self.insert_owned::<Hop>(recipe, element, false),
            EntityKind::Fermentable => self.insert_owned::<Fermentable>(recipe, element, false),
            EntityKind::Misc => self.insert_owned::<Misc>(recipe, element, false),
            EntityKind::Yeast => self.insert_owned::<Yeast>(recipe, element, false),
            _ => self.insert_owned::<Water>(recipe, element, false),
        }
    }

    // --- recipes ---

    pub fn import_recipe(&mut self, element: &XmlElement) -> Result<ImportedRecipe, ImportFailure> {
        let name = required_name::<Recipe>(element)?;
        let imported = self.transaction(|this| this.assemble_recipe(element, name))?;
        if let Err(e) = analysis::estimate(&mut *self.store, imported.id) {
            tracing::warn!("Could not estimate gravities for '{}': {}", imported.name, e);
        }
        if !imported.is_valid() {
            tracing::warn!("Recipe '{}' imported with problems; please review it", imported.name);
        }
        Ok(imported)
    }

    fn assemble_recipe(&mut self, element: &XmlElement, name: String) -> Result<ImportedRecipe, ImportFailure> {
        let id = self.store.insert(
            Recipe {
                name: name.clone(),
                ..Recipe::default()
            },
            true,
        );
        self.created(EntityKind::Recipe, id, &name);

        let populated = self.build::<Recipe>(element);
        let mut diagnostics = populated.diagnostics;
        self.store.update(id, populated.entity)?;

        let missing = |tag: &str| {
            Diagnostic::new(
                EntityKind::Recipe,
                &name,
                Some(tag),
                Severity::Invalid,
                format!("recipe has no {tag}"),
            )
        };

        match element.child("STYLE") {
            Some(style) => diagnostics.extend(self.insert_owned::<Style>(id, style, false)?),
            None => diagnostics.push(missing("STYLE")),
        }
        match element.child("EQUIPMENT") {
            Some(equipment) => diagnostics.extend(self.insert_owned::<Equipment>(id, equipment, false)?),
            None => diagnostics.push(missing("EQUIPMENT")),
        }

        for (container, kind) in INGREDIENTS {
            let Some(list) = element.child(container) else {
                continue;
            };
            for child in list.children_named(kind.xml_tag()) {
                let found = self.insert_ingredient(id, kind, child)?;
                if kind == EntityKind::Water {
                    diagnostics.extend(found.into_iter().map(Diagnostic::as_warning));
                } else {
                    diagnostics.extend(found);
                }
            }
        }

        match element.child("MASH") {
            Some(mash) => {
                let (mash_id, found) = self.insert_mash(mash, false)?;
                self.store.link(id, EntityKind::Mash, mash_id)?;
                diagnostics.extend(found);
            }
            None => diagnostics.push(missing("MASH")),
        }

        if let Some(list) = element.child("INSTRUCTIONS") {
            for child in list.children_named("INSTRUCTION") {
                let instruction = self.build::<Instruction>(child).entity;
                let step_name = instruction.name.clone();
                let child_id = self.store.insert_child(id, instruction)?;
                self.created(EntityKind::Instruction, child_id, &step_name);
            }
        }
        if let Some(list) = element.child("BREWNOTES") {
            for child in list.children_named("BREWNOTE") {
                let note = self.build::<BrewNote>(child).entity;
                let child_id = self.store.insert_child(id, note)?;
                self.created(EntityKind::BrewNote, child_id, "");
            }
        }

        Ok(ImportedRecipe { id, name, diagnostics })
    }
}
