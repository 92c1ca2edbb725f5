use crate::store::EntityId;
use crate::xml::validator::ValidationIssue;
use brewforge_schemas::EntityKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrewforgeError {
    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Document failed schema validation with {} fatal issue(s)", .0.len())]
    ValidationFailed(Vec<ValidationIssue>),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Import(#[from] ImportFailure),

    #[error(transparent)]
    Mash(#[from] MashError),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}

/// Problems with the embedded BeerXML grammar itself.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("grammar is not valid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("grammar root element '{0}' has no declaration")]
    MissingRoot(String),

    #[error("element '{parent}' refers to undeclared child '{child}'")]
    UndeclaredChild { parent: String, child: String },

    #[error("invalid issue pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("{kind} #{id} does not exist")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("cannot attach {kind} to missing {parent_kind} #{parent}")]
    MissingParent {
        kind: EntityKind,
        parent_kind: EntityKind,
        parent: EntityId,
    },

    #[error("{0} records cannot be attached that way")]
    NotLinkable(EntityKind),

    #[error("a transaction is already open")]
    TransactionOpen,

    #[error("no transaction is open")]
    NoTransaction,
}

/// A recipe or standalone import that was rolled back.
#[derive(Debug, Error)]
pub enum ImportFailure {
    #[error("{kind} element at line {line} has no NAME")]
    MissingName { kind: EntityKind, line: usize },

    #[error("store rejected the import: {0}")]
    Store(#[from] StoreError),
}

/// Physically infeasible or incomplete mash configurations.
#[derive(Debug, Error, PartialEq)]
pub enum MashError {
    #[error("recipe has no mash")]
    NoMash,

    #[error("mash has no steps")]
    NoSteps,

    #[error("first mash step '{0}' must be an infusion")]
    FirstStepNotInfusion(String),

    #[error("recipe has no grain in the mash")]
    NoGrain,

    #[error("mash thickness must be positive, got {0} L/kg")]
    NonPositiveThickness(f64),

    #[error("mash too thick for first step: strike water would be {strike_c:.1} C, boiling is {boiling_c:.1} C")]
    MashTooThick { strike_c: f64, boiling_c: f64 },

    #[error("infusion step '{step}' targets {step_c:.1} C, at or above boiling ({boiling_c:.1} C)")]
    InfusionAtBoiling { step: String, step_c: f64, boiling_c: f64 },

    #[error("decoction step '{step}' needs ratio {ratio}, outside [0, 1]")]
    DecoctionRatio { step: String, ratio: f64 },

    #[error("batch sparge needs at least one batch")]
    NoBatches,

    #[error(transparent)]
    Store(#[from] StoreError),
}
