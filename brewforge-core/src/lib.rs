//! BeerXML import/export and mash calculations for Brewforge.

pub mod analysis;
pub mod error;
pub mod logger;
pub mod mash;
pub mod store;
pub mod xml;

pub use error::{BrewforgeError, ImportFailure, MashError, StoreError};
pub use mash::{MashOutcome, MashWarning, MashWizard, MashWizardBuilder, SpargeMethod};
pub use store::{EntityId, Store};
pub use xml::{ImportOptions, ImportReport, Importer, Validator};
