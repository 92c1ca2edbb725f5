//! Derived recipe quantities: grain bill, target volumes, gravity estimates.

use crate::error::StoreError;
use crate::mash::heat;
use crate::store::{EntityId, Store};
use brewforge_schemas::{
    document::RecipeDocument,
    fermentable::{Fermentable, FermentableType},
    recipe::Recipe,
};

/// Gravity points from 1 kg of pure extract dissolved to 1 L.
const POINTS_PER_KG_L: f64 = 384.0;
const DEFAULT_ATTENUATION_PCT: f64 = 75.0;
const ABV_FACTOR: f64 = 131.25;

/// Everything the mash calculator needs to know about the brewhouse.
#[derive(Debug, Clone, PartialEq)]
pub struct BrewhouseParams {
    pub grain_mass_kg: f64,
    /// Collected wort plus what the grain absorbs.
    pub target_total_mash_vol_l: f64,
    pub absorption_l_kg: f64,
    pub boiling_point_c: f64,
    pub lauter_deadspace_l: f64,
}

impl Default for BrewhouseParams {
    fn default() -> Self {
        Self {
            grain_mass_kg: 0.0,
            target_total_mash_vol_l: 0.0,
            absorption_l_kg: heat::GRAIN_ABSORPTION_L_KG,
            boiling_point_c: heat::DEFAULT_BOILING_POINT_C,
            lauter_deadspace_l: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimates {
    pub og: f64,
    pub fg: f64,
    pub abv_pct: f64,
}

fn is_mashed(f: &Fermentable) -> bool {
    f.fermentable_type == FermentableType::Grain || f.is_mashed
}

pub fn grains_in_mash_kg(doc: &RecipeDocument) -> f64 {
    doc.fermentables
        .iter()
        .filter(|f| is_mashed(f))
        .map(|f| f.amount_kg)
        .sum()
}

/// Wort that has to leave the tun: the kettle's pre-boil volume less any
/// top-up added in the kettle, or the recipe's boil size without equipment.
pub fn target_collected_wort_l(doc: &RecipeDocument) -> f64 {
    match &doc.equipment {
        Some(e) => e.boil_size_l - e.top_up_kettle_l,
        None => doc.recipe.boil_size_l,
    }
}

pub fn target_total_mash_vol_l(doc: &RecipeDocument) -> f64 {
    let absorption = doc
        .equipment
        .as_ref()
        .map_or(heat::GRAIN_ABSORPTION_L_KG, |e| e.grain_absorption_l_kg);
    target_collected_wort_l(doc) + absorption * grains_in_mash_kg(doc)
}

/// `default_boiling_c` applies when the recipe has no equipment.
pub fn brewhouse_params(doc: &RecipeDocument, default_boiling_c: f64) -> BrewhouseParams {
    let mut params = BrewhouseParams {
        grain_mass_kg: grains_in_mash_kg(doc),
        target_total_mash_vol_l: target_total_mash_vol_l(doc),
        boiling_point_c: default_boiling_c,
        ..BrewhouseParams::default()
    };
    if let Some(e) = &doc.equipment {
        params.absorption_l_kg = e.grain_absorption_l_kg;
        params.boiling_point_c = e.boiling_point_c;
        params.lauter_deadspace_l = e.lauter_deadspace_l;
    }
    params
}

pub fn estimates(doc: &RecipeDocument) -> Estimates {
    let batch_l = doc.recipe.batch_size_l;
    let efficiency = doc.recipe.efficiency_pct / 100.0;
    let points: f64 = if batch_l > 0.0 {
        doc.fermentables
            .iter()
            .map(|f| {
                let eff = if is_mashed(f) { efficiency } else { 1.0 };
                f.amount_kg * f.yield_pct / 100.0 * eff * POINTS_PER_KG_L / batch_l
            })
            .sum()
    } else {
        0.0
    };
    let og = 1.0 + points / 1000.0;

    let attenuation = doc
        .yeasts
        .iter()
        .map(|y| y.attenuation_pct)
        .filter(|a| *a > 0.0)
        .fold(None, |best: Option<f64>, a| Some(best.map_or(a, |b| b.max(a))))
        .unwrap_or(DEFAULT_ATTENUATION_PCT);
    let fg = 1.0 + (og - 1.0) * (1.0 - attenuation / 100.0);

    Estimates {
        og,
        fg,
        abv_pct: (og - fg) * ABV_FACTOR,
    }
}

/// Recomputes and stores the estimated gravities of a persisted recipe.
pub fn estimate(store: &mut Store, recipe: EntityId) -> Result<Estimates, StoreError> {
    let doc = store.recipe_document(recipe)?;
    let est = estimates(&doc);
    tracing::debug!(
        "Recipe '{}': OG {:.3}, FG {:.3}, ABV {:.1}%",
        doc.recipe.name,
        est.og,
        est.fg,
        est.abv_pct
    );
    let updated = Recipe {
        est_og: est.og,
        est_fg: est.fg,
        est_abv_pct: est.abv_pct,
        ..doc.recipe
    };
    store.update(recipe, updated)?;
    Ok(est)
}
