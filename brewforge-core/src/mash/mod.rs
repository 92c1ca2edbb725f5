pub mod builder;
pub mod engine;
pub mod heat;
pub mod state;

pub use builder::{MashWizardBuilder, SpargeMethod};
pub use engine::MashWizard;
pub use state::{MashOutcome, MashWarning};
