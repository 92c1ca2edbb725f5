use crate::{
    brew_note::BrewNote, equipment::Equipment, fermentable::Fermentable, hop::Hop,
    instruction::Instruction, mash::Mash, mash::MashStep, misc::Misc, recipe::Recipe,
    style::Style, water::Water, yeast::Yeast,
};
use serde::{Deserialize, Serialize};

/// A mash together with its steps in step-number order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MashDocument {
    pub mash: Mash,
    pub steps: Vec<MashStep>,
}

/// A recipe with everything it owns, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDocument {
    pub recipe: Recipe,
    pub style: Option<Style>,
    pub equipment: Option<Equipment>,
    pub mash: Option<MashDocument>,
    pub hops: Vec<Hop>,
    pub fermentables: Vec<Fermentable>,
    pub miscs: Vec<Misc>,
    pub yeasts: Vec<Yeast>,
    pub waters: Vec<Water>,
    pub instructions: Vec<Instruction>,
    pub brew_notes: Vec<BrewNote>,
}
