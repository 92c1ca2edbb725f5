//! In-memory persistence boundary.
//!
//! One table per entity type, auto-assigned ids, parent ownership for mash
//! steps, instructions and brew notes, and a link table that ties ingredients
//! to recipes. Transactions are whole-store snapshots and do not nest.

use crate::error::{BrewforgeError, StoreError};
use brewforge_schemas::{
    brew_note::BrewNote,
    document::{MashDocument, RecipeDocument},
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
    Entity, EntityKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: EntityId,
    /// Shown in ingredient listings. Recipe-owned copies are hidden.
    pub display: bool,
    /// Owning mash or recipe for child records.
    #[serde(default)]
    pub parent: Option<EntityId>,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<T> {
    rows: Vec<Record<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T> Table<T> {
    fn get(&self, id: EntityId) -> Option<&Record<T>> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Record<T>> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }
}

/// Which records a recipe uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeLinks {
    pub recipe: EntityId,
    pub style: Option<EntityId>,
    pub equipment: Option<EntityId>,
    pub mash: Option<EntityId>,
    pub hops: Vec<EntityId>,
    pub fermentables: Vec<EntityId>,
    pub miscs: Vec<EntityId>,
    pub yeasts: Vec<EntityId>,
    pub waters: Vec<EntityId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreTables {
    next_id: u64,
    hops: Table<Hop>,
    fermentables: Table<Fermentable>,
    miscs: Table<Misc>,
    yeasts: Table<Yeast>,
    waters: Table<Water>,
    styles: Table<Style>,
    equipment: Table<Equipment>,
    mashes: Table<Mash>,
    mash_steps: Table<MashStep>,
    recipes: Table<Recipe>,
    instructions: Table<Instruction>,
    brew_notes: Table<BrewNote>,
    links: Vec<RecipeLinks>,
}

/// Entity types with a table in the store.
pub trait Stored: Entity {
    /// Kind of record a row of this type must be attached to.
    const PARENT: Option<EntityKind> = None;

    fn rows(tables: &StoreTables) -> &Table<Self>;
    fn rows_mut(tables: &mut StoreTables) -> &mut Table<Self>;
}

macro_rules! stored {
    ($ty:ty, $field:ident) => {
        stored!($ty, $field, None);
    };
    ($ty:ty, $field:ident, $parent:expr) => {
        impl Stored for $ty {
            const PARENT: Option<EntityKind> = $parent;

            fn rows(tables: &StoreTables) -> &Table<Self> {
                &tables.$field
            }

            fn rows_mut(tables: &mut StoreTables) -> &mut Table<Self> {
                &mut tables.$field
            }
        }
    };
}

stored!(Hop, hops);
stored!(Fermentable, fermentables);
stored!(Misc, miscs);
stored!(Yeast, yeasts);
stored!(Water, waters);
stored!(Style, styles);
stored!(Equipment, equipment);
stored!(Mash, mashes);
stored!(MashStep, mash_steps, Some(EntityKind::Mash));
stored!(Recipe, recipes);
stored!(Instruction, instructions, Some(EntityKind::Recipe));
stored!(BrewNote, brew_notes, Some(EntityKind::Recipe));

#[derive(Debug, Default)]
pub struct Store {
    tables: StoreTables,
    snapshot: Option<Box<StoreTables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, BrewforgeError> {
        let text = fs::read_to_string(path)
            .map_err(|e| BrewforgeError::FileIO(path.display().to_string(), e))?;
        let tables: StoreTables = serde_json::from_str(&text)?;
        Ok(Self {
            tables,
            snapshot: None,
        })
    }

    /// Loads `path`, or starts empty if it does not exist yet.
    pub fn open(path: &Path) -> Result<Self, BrewforgeError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No store at {}, starting empty", path.display());
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), BrewforgeError> {
        let text = serde_json::to_string_pretty(&self.tables)?;
        fs::write(path, text).map_err(|e| BrewforgeError::FileIO(path.display().to_string(), e))
    }

    // --- transactions ---

    pub fn begin(&mut self) -> Result<(), StoreError> {
        if self.snapshot.is_some() {
            return Err(StoreError::TransactionOpen);
        }
        self.snapshot = Some(Box::new(self.tables.clone()));
        Ok(())
    }

    pub fn commit(&mut self) -> Result<(), StoreError> {
        self.snapshot.take().map(|_| ()).ok_or(StoreError::NoTransaction)
    }

    pub fn rollback(&mut self) -> Result<(), StoreError> {
        let snapshot = self.snapshot.take().ok_or(StoreError::NoTransaction)?;
        self.tables = *snapshot;
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    // --- records ---

    fn next_id(&mut self) -> EntityId {
        self.tables.next_id += 1;
        EntityId(self.tables.next_id)
    }

    /// Inserts a top-level record.
    pub fn insert<T: Stored>(&mut self, data: T, display: bool) -> EntityId {
        let id = self.next_id();
        T::rows_mut(&mut self.tables).rows.push(Record {
            id,
            display,
            parent: None,
            data,
        });
        id
    }

    /// Inserts a record owned by `parent`, which must already exist.
    pub fn insert_child<T: Stored>(&mut self, parent: EntityId, data: T) -> Result<EntityId, StoreError> {
        let parent_kind = T::PARENT.ok_or(StoreError::NotLinkable(T::KIND))?;
        if !self.contains(parent_kind, parent) {
            return Err(StoreError::MissingParent {
                kind: T::KIND,
                parent_kind,
                parent,
            });
        }
        let id = self.next_id();
        T::rows_mut(&mut self.tables).rows.push(Record {
            id,
            display: true,
            parent: Some(parent),
            data,
        });
        Ok(id)
    }

    pub fn get<T: Stored>(&self, id: EntityId) -> Option<&Record<T>> {
        T::rows(&self.tables).get(id)
    }

    pub fn update<T: Stored>(&mut self, id: EntityId, data: T) -> Result<(), StoreError> {
        let record = T::rows_mut(&mut self.tables)
            .get_mut(id)
            .ok_or(StoreError::NotFound { kind: T::KIND, id })?;
        record.data = data;
        Ok(())
    }

    pub fn remove<T: Stored>(&mut self, id: EntityId) -> Result<Record<T>, StoreError> {
        let rows = &mut T::rows_mut(&mut self.tables).rows;
        let index = rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { kind: T::KIND, id })?;
        Ok(rows.remove(index))
    }

    pub fn iter<T: Stored>(&self) -> impl Iterator<Item = &Record<T>> {
        T::rows(&self.tables).rows.iter()
    }

    pub fn len<T: Stored>(&self) -> usize {
        T::rows(&self.tables).rows.len()
    }

    /// Exact, case-sensitive name lookup, oldest record first.
    pub fn find_by_name<T: Stored>(&self, name: &str) -> Option<&Record<T>> {
        self.iter::<T>().find(|r| r.data.name() == name)
    }

    pub fn children<T: Stored>(&self, parent: EntityId) -> Vec<&Record<T>> {
        self.iter::<T>().filter(|r| r.parent == Some(parent)).collect()
    }

    /// Steps of a mash in step-number order.
    pub fn mash_steps(&self, mash: EntityId) -> Vec<&Record<MashStep>> {
        let mut steps = self.children::<MashStep>(mash);
        steps.sort_by_key(|r| (r.data.step_number, r.id));
        steps
    }

    pub fn contains(&self, kind: EntityKind, id: EntityId) -> bool {
        let t = &self.tables;
        match kind {
            EntityKind::Hop => t.hops.contains(id),
            EntityKind::Fermentable => t.fermentables.contains(id),
            EntityKind::Misc => t.miscs.contains(id),
            EntityKind::Yeast => t.yeasts.contains(id),
            EntityKind::Water => t.waters.contains(id),
            EntityKind::Style => t.styles.contains(id),
            EntityKind::Equipment => t.equipment.contains(id),
            EntityKind::Mash => t.mashes.contains(id),
            EntityKind::MashStep => t.mash_steps.contains(id),
            EntityKind::Recipe => t.recipes.contains(id),
            EntityKind::Instruction => t.instructions.contains(id),
            EntityKind::BrewNote => t.brew_notes.contains(id),
        }
    }

    // --- recipe links ---

    pub fn links(&self, recipe: EntityId) -> Option<&RecipeLinks> {
        self.tables.links.iter().find(|l| l.recipe == recipe)
    }

    /// Attaches an existing record to a recipe. Style, equipment and mash
    /// replace any previous link; ingredients are appended in call order.
    pub fn link(&mut self, recipe: EntityId, kind: EntityKind, id: EntityId) -> Result<(), StoreError> {
        if !self.contains(EntityKind::Recipe, recipe) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Recipe,
                id: recipe,
            });
        }
        if !self.contains(kind, id) {
            return Err(StoreError::NotFound { kind, id });
        }
        let index = match self.tables.links.iter().position(|l| l.recipe == recipe) {
            Some(i) => i,
            None => {
                self.tables.links.push(RecipeLinks {
                    recipe,
                    ..RecipeLinks::default()
                });
                self.tables.links.len() - 1
            }
        };
        let links = &mut self.tables.links[index];
        match kind {
            EntityKind::Style => links.style = Some(id),
            EntityKind::Equipment => links.equipment = Some(id),
            EntityKind::Mash => links.mash = Some(id),
            EntityKind::Hop => links.hops.push(id),
            EntityKind::Fermentable => links.fermentables.push(id),
            EntityKind::Misc => links.miscs.push(id),
            EntityKind::Yeast => links.yeasts.push(id),
            EntityKind::Water => links.waters.push(id),
            EntityKind::MashStep | EntityKind::Recipe | EntityKind::Instruction | EntityKind::BrewNote => {
                return Err(StoreError::NotLinkable(kind))
            }
        }
        Ok(())
    }

    fn collect<T: Stored>(&self, ids: &[EntityId]) -> Vec<T> {
        ids.iter()
            .filter_map(|id| self.get::<T>(*id))
            .map(|r| r.data.clone())
            .collect()
    }

    pub fn mash_document(&self, mash: EntityId) -> Result<MashDocument, StoreError> {
        let record = self.get::<Mash>(mash).ok_or(StoreError::NotFound {
            kind: EntityKind::Mash,
            id: mash,
        })?;
        Ok(MashDocument {
            mash: record.data.clone(),
            steps: self.mash_steps(mash).into_iter().map(|r| r.data.clone()).collect(),
        })
    }

    /// Materializes a recipe and everything linked to it.
    pub fn recipe_document(&self, recipe: EntityId) -> Result<RecipeDocument, StoreError> {
        let record = self.get::<Recipe>(recipe).ok_or(StoreError::NotFound {
            kind: EntityKind::Recipe,
            id: recipe,
        })?;
        let links = self.links(recipe).cloned().unwrap_or(RecipeLinks {
            recipe,
            ..RecipeLinks::default()
        });
        let mash = links.mash.map(|m| self.mash_document(m)).transpose()?;
        Ok(RecipeDocument {
            recipe: record.data.clone(),
            style: links.style.and_then(|id| self.get::<Style>(id)).map(|r| r.data.clone()),
            equipment: links
                .equipment
                .and_then(|id| self.get::<Equipment>(id))
                .map(|r| r.data.clone()),
            mash,
            hops: self.collect(&links.hops),
            fermentables: self.collect(&links.fermentables),
            miscs: self.collect(&links.miscs),
            yeasts: self.collect(&links.yeasts),
            waters: self.collect(&links.waters),
            instructions: self
                .children::<Instruction>(recipe)
                .into_iter()
                .map(|r| r.data.clone())
                .collect(),
            brew_notes: self
                .children::<BrewNote>(recipe)
                .into_iter()
                .map(|r| r.data.clone())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewforge_schemas::mash::MashStepType;
    use tempfile::TempDir;

    fn hop(name: &str) -> Hop {
        Hop {
            name: name.to_string(),
            ..Hop::default()
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut store = Store::new();
        let a = store.insert(hop("Saaz"), true);
        let b = store.insert(hop("Saaz"), true);
        assert!(b > a);
        assert_eq!(store.find_by_name::<Hop>("Saaz").map(|r| r.id), Some(a));
        assert!(store.find_by_name::<Hop>("saaz").is_none());
    }

    #[test]
    fn mash_step_requires_existing_mash() {
        let mut store = Store::new();
        let err = store
            .insert_child(EntityId(99), MashStep::new("Rest", MashStepType::Infusion))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::MissingParent {
                kind: EntityKind::MashStep,
                parent_kind: EntityKind::Mash,
                parent: EntityId(99),
            }
        );

        let mash = store.insert(Mash::default(), true);
        let mut second = MashStep::new("Second", MashStepType::Temperature);
        second.step_number = 2;
        let mut first = MashStep::new("First", MashStepType::Infusion);
        first.step_number = 1;
        store.insert_child(mash, second).unwrap();
        store.insert_child(mash, first).unwrap();
        let names: Vec<_> = store.mash_steps(mash).iter().map(|r| r.data.name.clone()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn rollback_restores_snapshot() {
        let mut store = Store::new();
        store.insert(hop("Kept"), true);
        store.begin().unwrap();
        assert_eq!(store.begin(), Err(StoreError::TransactionOpen));
        store.insert(hop("Dropped"), true);
        store.rollback().unwrap();
        assert_eq!(store.len::<Hop>(), 1);
        assert!(!store.in_transaction());
        assert_eq!(store.commit(), Err(StoreError::NoTransaction));

        // ids handed out inside the rolled back transaction are reused
        let id = store.insert(hop("Next"), true);
        assert_eq!(id, EntityId(2));
    }

    #[test]
    fn recipe_document_collects_links_in_order() {
        let mut store = Store::new();
        let recipe = store.insert(Recipe { name: "IPA".into(), ..Recipe::default() }, true);
        let h1 = store.insert(hop("Magnum"), false);
        let h2 = store.insert(hop("Citra"), false);
        let style = store.insert(Style { name: "APA".into(), ..Style::default() }, false);
        store.link(recipe, EntityKind::Hop, h1).unwrap();
        store.link(recipe, EntityKind::Hop, h2).unwrap();
        store.link(recipe, EntityKind::Style, style).unwrap();
        store
            .insert_child(recipe, Instruction { name: "Mash in".into(), ..Instruction::default() })
            .unwrap();

        let doc = store.recipe_document(recipe).unwrap();
        assert_eq!(doc.hops.iter().map(|h| h.name.as_str()).collect::<Vec<_>>(), ["Magnum", "Citra"]);
        assert_eq!(doc.style.map(|s| s.name), Some("APA".to_string()));
        assert_eq!(doc.instructions.len(), 1);
        assert!(doc.mash.is_none());
    }

    #[test]
    fn saves_and_loads_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let mut store = Store::new();
        let mash = store.insert(Mash { name: "Single".into(), ..Mash::default() }, true);
        store.insert_child(mash, MashStep::new("Rest", MashStepType::Infusion)).unwrap();
        store.save(&path).unwrap();

        let loaded = Store::load(&path).unwrap();
        assert_eq!(loaded.len::<MashStep>(), 1);
        assert_eq!(loaded.mash_steps(mash)[0].data.name, "Rest");
        let next = Store::open(&dir.path().join("missing.json")).unwrap();
        assert_eq!(next.len::<Mash>(), 0);
    }
}
