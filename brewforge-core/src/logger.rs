use crate::error::BrewforgeError;
use brewforge_schemas::{mash::MashStep, Vocabulary};
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// One computed mash step as written to the schedule CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub mash: String,
    pub step_number: i64,
    pub name: String,
    pub step_type: String,
    pub infuse_amount_l: f64,
    pub infuse_temp_c: f64,
    pub step_temp_c: f64,
    pub decoction_amount_l: f64,
}

pub struct MashScheduleLogger {
    writer: Writer<fs::File>,
}

impl MashScheduleLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_steps(&mut self, mash: &str, steps: &[MashStep]) -> Result<(), anyhow::Error> {
        for step in steps {
            let row = ScheduleRow {
                mash: mash.to_string(),
                step_number: step.step_number,
                name: step.name.clone(),
                step_type: if step.step_type.is_sparge() {
                    format!("{:?}", step.step_type)
                } else {
                    step.step_type.as_beerxml().to_string()
                },
                infuse_amount_l: step.infuse_amount_l,
                infuse_temp_c: step.infuse_temp_c,
                step_temp_c: step.step_temp_c,
                decoction_amount_l: step.decoction_amount_l,
            };
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads a schedule CSV back.
pub fn read_schedule(path: &str) -> Result<Vec<ScheduleRow>, BrewforgeError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| BrewforgeError::CsvError(path.to_string(), e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| BrewforgeError::CsvError(path.to_string(), e)))
        .collect()
}
