//! Per-entity handling of enumerated fields.
//!
//! The generic table walk never touches these; each entity type decides
//! here how strict it is about missing or unknown vocabulary.

use crate::store::{Store, Stored};
use crate::xml::diagnostic::{Diagnostic, Severity};
use crate::xml::tree::XmlElement;
use brewforge_schemas::{
    brew_note::BrewNote,
    equipment::Equipment,
    fermentable::{Fermentable, FermentableType},
    hop::{Hop, HopForm, HopType, HopUse},
    instruction::Instruction,
    mash::{Mash, MashStep, MashStepType},
    misc::{Misc, MiscType, MiscUse},
    recipe::{Recipe, RecipeType},
    style::{Style, StyleType},
    water::Water,
    yeast::{Flocculation, Yeast, YeastForm, YeastType},
    Entity, Vocabulary,
};

/// Reads the enumerated fields of an entity after the generic walk.
///
/// `store` is consulted by entities that fall back to the value already
/// recorded on a same-named entity.
pub trait EnumFields: Stored {
    fn resolve_enums(&mut self, _element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        Vec::new()
    }
}

struct Reader<'a, E: Entity> {
    entity: &'a E,
    element: &'a XmlElement,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, E: Entity> Reader<'a, E> {
    fn new(entity: &'a E, element: &'a XmlElement) -> Self {
        Self {
            entity,
            element,
            diagnostics: Vec::new(),
        }
    }

    fn note(&mut self, tag: &str, severity: Severity, message: String) {
        match severity {
            Severity::Warning => tracing::warn!("{} '{}' {}: {}", E::KIND, self.entity.name(), tag, message),
            _ => tracing::error!("{} '{}' {}: {}", E::KIND, self.entity.name(), tag, message),
        }
        self.diagnostics
            .push(Diagnostic::new(E::KIND, self.entity.name(), Some(tag), severity, message));
    }

    fn text(&self, tag: &str) -> Option<&'a str> {
        self.element.child_text(tag).map(str::trim)
    }

    /// Missing or unknown values invalidate the entity.
    fn strict<V: Vocabulary>(&mut self, tag: &str) -> Option<V> {
        match self.text(tag) {
            None => {
                self.note(tag, Severity::Invalid, "missing value".to_string());
                None
            }
            Some(text) => {
                let value = V::from_beerxml(text);
                if value.is_none() {
                    self.note(tag, Severity::Invalid, format!("unrecognized value '{text}'"));
                }
                value
            }
        }
    }

    /// Missing values invalidate; unknown values take `existing` or
    /// `default` with a warning. With neither to fall back on the value is
    /// invalid.
    fn with_fallback<V: Vocabulary>(&mut self, tag: &str, existing: Option<V>, default: Option<V>) -> Option<V> {
        let text = match self.text(tag) {
            None => {
                self.note(tag, Severity::Invalid, "missing value".to_string());
                return None;
            }
            Some(text) => text,
        };
        if let Some(value) = V::from_beerxml(text) {
            return Some(value);
        }
        let (value, source) = match (existing, default) {
            (Some(v), _) => (v, "existing entry"),
            (None, Some(v)) => (v, "default"),
            (None, None) => {
                self.note(tag, Severity::Invalid, format!("unrecognized value '{text}'"));
                return None;
            }
        };
        self.note(
            tag,
            Severity::Warning,
            format!("unrecognized value '{text}', using {source} '{}'", value.as_beerxml()),
        );
        Some(value)
    }

    /// Missing or unknown values take the first vocabulary entry and are
    /// flagged for manual follow-up.
    fn guessed<V: Vocabulary>(&mut self, tag: &str) -> V {
        match self.text(tag).and_then(V::from_beerxml) {
            Some(value) => value,
            None => {
                let guess = V::first();
                let shown = self.text(tag).unwrap_or("");
                self.note(
                    tag,
                    Severity::FollowUp,
                    format!("could not read '{shown}', assuming '{}'; please check", guess.as_beerxml()),
                );
                guess
            }
        }
    }
}

impl EnumFields for Fermentable {
    fn resolve_enums(&mut self, element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        let mut reader = Reader::new(&*self, element);
        let fermentable_type = reader.strict::<FermentableType>("TYPE");
        let diagnostics = reader.diagnostics;
        if let Some(t) = fermentable_type {
            self.fermentable_type = t;
        }
        diagnostics
    }
}

impl EnumFields for Hop {
    fn resolve_enums(&mut self, element: &XmlElement, store: &Store) -> Vec<Diagnostic> {
        let existing = store.find_by_name::<Hop>(&self.name).map(|r| r.data.clone());
        let mut reader = Reader::new(&*self, element);
        let hop_use = reader.with_fallback::<HopUse>("USE", existing.as_ref().map(|h| h.hop_use), None);
        let hop_type = reader.with_fallback("TYPE", existing.as_ref().map(|h| h.hop_type), Some(HopType::Both));
        let form = reader.strict::<HopForm>("FORM");
        let diagnostics = reader.diagnostics;
        if let Some(v) = hop_use {
            self.hop_use = v;
        }
        if let Some(v) = hop_type {
            self.hop_type = v;
        }
        if let Some(v) = form {
            self.form = v;
        }
        diagnostics
    }
}

impl EnumFields for Misc {
    fn resolve_enums(&mut self, element: &XmlElement, store: &Store) -> Vec<Diagnostic> {
        let existing = store.find_by_name::<Misc>(&self.name).map(|r| r.data.clone());
        let mut reader = Reader::new(&*self, element);
        let misc_type =
            reader.with_fallback("TYPE", existing.as_ref().map(|m| m.misc_type), Some(MiscType::Flavor));
        let misc_use = reader.with_fallback::<MiscUse>("USE", existing.as_ref().map(|m| m.misc_use), None);
        let diagnostics = reader.diagnostics;
        if let Some(v) = misc_type {
            self.misc_type = v;
        }
        if let Some(v) = misc_use {
            self.misc_use = v;
        }
        diagnostics
    }
}

impl EnumFields for Yeast {
    fn resolve_enums(&mut self, element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        let mut reader = Reader::new(&*self, element);
        let yeast_type = reader.guessed::<YeastType>("TYPE");
        let form = reader.guessed::<YeastForm>("FORM");
        let flocculation = reader.guessed::<Flocculation>("FLOCCULATION");
        let diagnostics = reader.diagnostics;
        self.yeast_type = yeast_type;
        self.form = form;
        self.flocculation = flocculation;
        diagnostics
    }
}

impl EnumFields for Style {
    fn resolve_enums(&mut self, element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        let mut reader = Reader::new(&*self, element);
        let style_type = reader.strict::<StyleType>("TYPE");
        let diagnostics = reader.diagnostics;
        if let Some(t) = style_type {
            self.style_type = t;
        }
        diagnostics
    }
}

impl EnumFields for Recipe {
    fn resolve_enums(&mut self, element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        let mut reader = Reader::new(&*self, element);
        let recipe_type = reader.strict::<RecipeType>("TYPE");
        let diagnostics = reader.diagnostics;
        if let Some(t) = recipe_type {
            self.recipe_type = t;
        }
        diagnostics
    }
}

impl EnumFields for MashStep {
    fn resolve_enums(&mut self, element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        let mut reader = Reader::new(&*self, element);
        let step_type = match reader.text("TYPE") {
            Some(text) => {
                let parsed = MashStepType::from_beerxml_lenient(text);
                if parsed.is_none() {
                    reader.note(
                        "TYPE",
                        Severity::Invalid,
                        format!("unrecognized value '{text}', importing as Infusion"),
                    );
                }
                parsed.unwrap_or(MashStepType::Infusion)
            }
            None => {
                reader.note("TYPE", Severity::Invalid, "missing value, importing as Infusion".to_string());
                MashStepType::Infusion
            }
        };
        let diagnostics = reader.diagnostics;
        self.step_type = step_type;
        diagnostics
    }
}

impl EnumFields for Equipment {
    /// A hop utilization of zero is never meant literally.
    fn resolve_enums(&mut self, _element: &XmlElement, _store: &Store) -> Vec<Diagnostic> {
        if self.hop_utilization_pct == 0.0 {
            tracing::debug!("Equipment '{}': hop utilization 0 read as 100%", self.name);
            self.hop_utilization_pct = 100.0;
        }
        Vec::new()
    }
}

impl EnumFields for Water {}
impl EnumFields for Mash {}
impl EnumFields for Instruction {}
impl EnumFields for BrewNote {}
