use crate::store::EntityId;
use brewforge_schemas::mash::MashStep;
use serde::Serialize;

/// A step being worked on, with its store id if it is already persisted.
#[derive(Debug, Clone)]
pub struct WorkingStep {
    pub id: EntityId,
    pub step: MashStep,
}

/// Non-fatal findings of a mash calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MashWarning {
    /// The last no-sparge infusion would need water above boiling.
    FinalInfusionAboveBoiling { step: String, water_c: f64 },
    SpargeAboveBoiling { water_c: f64 },
    /// The mash already yields more wort than the boil needs.
    TooMuchWort { excess_l: f64 },
}

/// What a run changed, for reporting.
#[derive(Debug, Clone, Default)]
pub struct MashOutcome {
    pub steps: Vec<MashStep>,
    pub sparge_water_l: f64,
    pub warnings: Vec<MashWarning>,
}

impl MashOutcome {
    /// Water added across all steps, sparge included.
    pub fn total_infused_l(&self) -> f64 {
        self.steps.iter().map(|s| s.infuse_amount_l).sum()
    }
}
