pub mod deserialize;
pub mod diagnostic;
pub mod enums;
pub mod import;
pub mod serialize;
pub mod tree;
pub mod validator;

pub use diagnostic::{Diagnostic, Populated, Severity};
pub use import::{ImportEvent, ImportOptions, ImportReport, Importer};
pub use validator::{ValidationIssue, ValidationReport, Validator};
