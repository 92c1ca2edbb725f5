use crate::{
    error::{BrewforgeError, MashError},
    logger::MashScheduleLogger,
    mash::{engine::MashWizard, heat},
};
use serde::{Deserialize, Serialize};

/// How the grain is rinsed after the mash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SpargeMethod {
    /// The mash itself yields all the wort.
    None,
    Batch { batches: u32 },
    Fly,
}

impl Default for SpargeMethod {
    fn default() -> Self {
        SpargeMethod::Batch { batches: 1 }
    }
}

/// A fluent builder for a `MashWizard`.
pub struct MashWizardBuilder {
    sparge: SpargeMethod,
    thickness_l_kg: f64,
    default_boiling_c: f64,
    log_path: Option<String>,
}

impl Default for MashWizardBuilder {
    fn default() -> Self {
        Self {
            sparge: SpargeMethod::default(),
            thickness_l_kg: 3.0,
            default_boiling_c: heat::DEFAULT_BOILING_POINT_C,
            log_path: None,
        }
    }
}

impl MashWizardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sparge(mut self, sparge: SpargeMethod) -> Self {
        self.sparge = sparge;
        self
    }

    /// Water-to-grain ratio of the first infusion, in L/kg. Ignored without
    /// sparging, where the first step's own volume decides.
    pub fn with_thickness(mut self, thickness_l_kg: f64) -> Self {
        self.thickness_l_kg = thickness_l_kg;
        self
    }

    /// Boiling point used when the recipe has no equipment.
    pub fn with_default_boiling_point(mut self, celsius: f64) -> Self {
        self.default_boiling_c = celsius;
        self
    }

    /// Writes the computed schedule to the specified CSV file.
    pub fn with_schedule_logging_to_file(mut self, path: &str) -> Self {
        self.log_path = Some(path.to_string());
        self
    }

    pub fn build(self) -> Result<MashWizard, BrewforgeError> {
        if let SpargeMethod::Batch { batches: 0 } = self.sparge {
            return Err(MashError::NoBatches.into());
        }

        let logger = match self.log_path {
            Some(path) => Some(
                MashScheduleLogger::new(&path).map_err(|e| BrewforgeError::FileIO(path.clone(), e))?,
            ),
            None => None,
        };

        Ok(MashWizard {
            sparge: self.sparge,
            thickness_l_kg: self.thickness_l_kg,
            default_boiling_c: self.default_boiling_c,
            logger,
        })
    }
}
