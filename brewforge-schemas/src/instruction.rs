use crate::property;
use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use serde::{Deserialize, Serialize};

/// A brew-day instruction belonging to exactly one recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub name: String,
    pub directions: String,
    pub has_timer: bool,
    pub timer_value: String,
    pub completed: bool,
    pub interval: f64,
}

static INSTRUCTION_PROPERTIES: &[PropertyDef<Instruction>] = &[
    property!(text "name", Some("NAME"), name),
    property!(text "directions", Some("DIRECTIONS"), directions),
    property!(bool "has_timer", Some("HAS_TIMER"), has_timer),
    property!(text "timer_value", Some("TIMER_VALUE"), timer_value),
    property!(bool "completed", Some("COMPLETED"), completed),
    property!(real "interval", Some("INTERVAL"), interval),
];

impl Entity for Instruction {
    const KIND: EntityKind = EntityKind::Instruction;

    fn properties() -> &'static [PropertyDef<Self>] {
        INSTRUCTION_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.instruction
    }

    fn name(&self) -> &str {
        &self.name
    }
}
