use brewforge_schemas::EntityKind;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The entity was imported but must not be trusted as-is.
    Invalid,
    /// A value was guessed and the user should check it.
    FollowUp,
    /// A value was defaulted; the entity is still usable.
    Warning,
}

/// One problem found while reading an entity from XML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: EntityKind,
    pub entity_name: String,
    pub field: Option<String>,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: EntityKind,
        entity_name: &str,
        field: Option<&str>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity_name: entity_name.to_string(),
            field: field.map(str::to_string),
            severity,
            message: message.into(),
        }
    }

    /// Same diagnostic, downgraded to a warning.
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {} '{}'", self.severity, self.kind, self.entity_name)?;
        if let Some(field) = &self.field {
            write!(f, " {field}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// An entity read from XML together with everything that went wrong.
#[derive(Debug, Clone)]
pub struct Populated<E> {
    pub entity: E,
    pub diagnostics: Vec<Diagnostic>,
}

impl<E> Populated<E> {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Invalid)
    }
}
