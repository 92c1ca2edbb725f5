use super::{
    builder::SpargeMethod,
    heat,
    state::{MashOutcome, MashWarning, WorkingStep},
};
use crate::{
    analysis,
    error::{BrewforgeError, MashError},
    logger::MashScheduleLogger,
    store::{EntityId, Store},
};
use brewforge_schemas::mash::{Mash, MashStep, MashStepType};

/// Computes infusion volumes and temperatures for a recipe's mash.
pub struct MashWizard {
    pub(super) sparge: SpargeMethod,
    pub(super) thickness_l_kg: f64,
    pub(super) default_boiling_c: f64,
    pub(super) logger: Option<MashScheduleLogger>,
}

impl MashWizard {
    pub fn sparge(&self) -> SpargeMethod {
        self.sparge
    }

    /// Rewrites the steps of the recipe's mash in the store.
    ///
    /// Nothing is written until every precondition holds and the first
    /// infusion is feasible. After that each step is persisted as soon as it
    /// is computed, so a later failure (an impossible decoction) leaves the
    /// earlier steps updated.
    pub fn run(&mut self, store: &mut Store, recipe: EntityId) -> Result<MashOutcome, BrewforgeError> {
        let doc = store.recipe_document(recipe)?;
        let mash_id = store
            .links(recipe)
            .and_then(|l| l.mash)
            .ok_or(MashError::NoMash)?;
        let mash: Mash = store
            .get::<Mash>(mash_id)
            .map(|r| r.data.clone())
            .ok_or(MashError::NoMash)?;
        let params = analysis::brewhouse_params(&doc, self.default_boiling_c);
        let boiling = params.boiling_point_c;
        let grain = params.grain_mass_kg;

        let (sparges, mut steps): (Vec<WorkingStep>, Vec<WorkingStep>) = store
            .mash_steps(mash_id)
            .into_iter()
            .map(|r| WorkingStep {
                id: r.id,
                step: r.data.clone(),
            })
            .partition(|w| w.step.step_type.is_sparge());

        // --- preconditions ---
        let first_type = steps.first().map(|w| w.step.step_type);
        match first_type {
            None => return Err(MashError::NoSteps.into()),
            Some(MashStepType::Infusion) => {}
            Some(_) => return Err(MashError::FirstStepNotInfusion(steps[0].step.name.clone()).into()),
        }
        if grain <= 0.0 {
            return Err(MashError::NoGrain.into());
        }

        let thickness = match self.sparge {
            SpargeMethod::None => {
                if steps.len() == 1 {
                    steps[0].step.infuse_amount_l = params.target_total_mash_vol_l + params.lauter_deadspace_l;
                }
                steps[0].step.infuse_amount_l / grain
            }
            _ => self.thickness_l_kg,
        };
        if thickness <= 0.0 {
            return Err(MashError::NonPositiveThickness(thickness).into());
        }

        let tun_mc = mash.tun_specific_heat_cal_gc * mash.tun_weight_kg;
        let tf = steps[0].step.step_temp_c;
        let mut mass_water = thickness * grain;
        let mut mc = heat::CGRAIN_CAL_GC * grain;
        let tw = heat::strike_temp(
            mc,
            heat::CW_CAL_GC * mass_water,
            tun_mc,
            tf,
            mash.grain_temp_c,
            mash.tun_temp_c,
        );
        if tw > boiling {
            return Err(MashError::MashTooThick {
                strike_c: tw,
                boiling_c: boiling,
            }
            .into());
        }
        let hot_step = steps.iter().skip(1).find(|w| {
            !matches!(w.step.step_type, MashStepType::Temperature | MashStepType::Decoction)
                && w.step.step_temp_c >= boiling
        });
        if let Some(w) = hot_step {
            return Err(MashError::InfusionAtBoiling {
                step: w.step.name.clone(),
                step_c: w.step.step_temp_c,
                boiling_c: boiling,
            }
            .into());
        }

        // --- mutation starts here ---
        for sparge in &sparges {
            tracing::debug!("Removing previous sparge step '{}'", sparge.step.name);
            store.remove::<MashStep>(sparge.id)?;
        }
        for (i, working) in steps.iter_mut().enumerate() {
            working.step.step_number = i as i64 + 1;
        }

        steps[0].step.infuse_amount_l = mass_water;
        steps[0].step.infuse_temp_c = tw;
        store.update(steps[0].id, steps[0].step.clone())?;
        tracing::debug!("Step 1: {:.2} L at {:.1} C", mass_water, tw);

        mc += tun_mc;
        let (equip_kg, equip_c) = if mash.equip_adjust {
            (mash.tun_weight_kg, mash.tun_specific_heat_cal_gc)
        } else {
            (0.0, 0.0)
        };

        for i in 1..steps.len() {
            let tf = steps[i].step.step_temp_c;
            let t1 = steps[i - 1].step.step_temp_c;
            match steps[i].step.step_type {
                MashStepType::Temperature => {}
                MashStepType::Decoction => {
                    let water_kg: f64 = steps[..i].iter().map(|w| w.step.infuse_amount_l).sum();
                    let r = heat::decoction_ratio(water_kg, grain, equip_kg, equip_c, t1, tf, boiling);
                    if !(0.0..=1.0).contains(&r) {
                        tracing::error!("Decoction ratio for '{}' is {}", steps[i].step.name, r);
                        return Err(MashError::DecoctionRatio {
                            step: steps[i].step.name.clone(),
                            ratio: r,
                        }
                        .into());
                    }
                    steps[i].step.decoction_amount_l = r * (water_kg + grain / heat::GRAIN_DENSITY_KG_L);
                }
                _ => {
                    mc += mass_water * heat::CW_CAL_GC;
                    mass_water = heat::infusion_mass(mc, t1, tf, boiling);
                    steps[i].step.infuse_amount_l = mass_water;
                    steps[i].step.infuse_temp_c = boiling;
                }
            }
            store.update(steps[i].id, steps[i].step.clone())?;
        }

        let mut warnings = Vec::new();

        if self.sparge == SpargeMethod::None && steps.len() > 1 {
            let last = steps.len() - 1;
            let others: f64 = steps[..last].iter().map(|w| w.step.infuse_amount_l).sum();
            let t1 = steps[last - 1].step.step_temp_c;
            let tf = steps[last].step.step_temp_c;
            mass_water = (params.target_total_mash_vol_l + params.lauter_deadspace_l - others)
                * heat::WATER_DENSITY_KG_L;
            mc += mass_water * heat::CW_CAL_GC;
            let tw = heat::infusion_temp(mc, mass_water, t1, tf);
            if tw > boiling {
                tracing::warn!("Final infusion for '{}' needs {:.1} C water", steps[last].step.name, tw);
                warnings.push(MashWarning::FinalInfusionAboveBoiling {
                    step: steps[last].step.name.clone(),
                    water_c: tw,
                });
            }
            steps[last].step.infuse_amount_l = mass_water;
            steps[last].step.infuse_temp_c = tw;
            store.update(steps[last].id, steps[last].step.clone())?;
        }

        let mash_water: f64 = steps.iter().map(|w| w.step.infuse_amount_l).sum();
        let mut sparge_water = params.target_total_mash_vol_l - mash_water;

        if self.sparge != SpargeMethod::None && sparge_water >= heat::SPARGE_EPSILON_L {
            sparge_water += params.lauter_deadspace_l;
            let tf = mash.sparge_temp_c;
            let t1 = steps[steps.len() - 1].step.step_temp_c - heat::SPARGE_TEMP_DROP_C;
            let mc = grain * heat::CGRAIN_CAL_GC
                + params.absorption_l_kg * grain * heat::CW_CAL_GC
                + tun_mc;
            let tw = heat::infusion_temp(mc, sparge_water, t1, tf);
            if tw > boiling {
                tracing::warn!("Sparge water would need to be {:.1} C", tw);
                warnings.push(MashWarning::SpargeAboveBoiling { water_c: tw });
            }

            let (count, step_type) = match self.sparge {
                SpargeMethod::Batch { batches } => (batches, MashStepType::BatchSparge),
                _ => (1, MashStepType::FlySparge),
            };
            let volume = sparge_water / count as f64;
            for i in 1..=count {
                let name = match step_type {
                    MashStepType::BatchSparge => format!("Batch Sparge {i}"),
                    _ => "Fly Sparge".to_string(),
                };
                let mut step = MashStep::new(name, step_type);
                step.infuse_amount_l = volume;
                step.infuse_temp_c = tw;
                step.end_temp_c = tw;
                step.step_temp_c = tf;
                step.step_time_min = 15.0;
                step.step_number = steps.len() as i64 + 1;
                let id = store.insert_child(mash_id, step.clone())?;
                steps.push(WorkingStep { id, step });
            }
        } else if self.sparge != SpargeMethod::None && sparge_water <= -heat::SPARGE_EPSILON_L {
            tracing::warn!("Mash yields {:.2} L more wort than needed", -sparge_water);
            warnings.push(MashWarning::TooMuchWort {
                excess_l: -sparge_water,
            });
        }

        let outcome = MashOutcome {
            steps: steps.into_iter().map(|w| w.step).collect(),
            sparge_water_l: sparge_water.max(0.0),
            warnings,
        };

        if let Some(logger) = &mut self.logger {
            logger.log_steps(&mash.name, &outcome.steps)?;
        }
        Ok(outcome)
    }
}
