use crate::property;
use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables, Vocabulary};
use serde::{Deserialize, Serialize};

/// Kind of mash step. The two sparge variants only exist inside Brewforge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MashStepType {
    #[default]
    Infusion,
    Temperature,
    Decoction,
    BatchSparge,
    FlySparge,
}

impl MashStepType {
    pub fn is_sparge(&self) -> bool {
        matches!(self, MashStepType::BatchSparge | MashStepType::FlySparge)
    }

    /// Steps that add water to the tun.
    pub fn is_infusion(&self) -> bool {
        matches!(
            self,
            MashStepType::Infusion | MashStepType::BatchSparge | MashStepType::FlySparge
        )
    }

    /// Normalizes capitalization before matching, so `INFUSION` reads as `Infusion`.
    pub fn from_beerxml_lenient(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        let mut chars = lower.chars();
        let normalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => return None,
        };
        Self::from_beerxml(&normalized)
    }
}

impl Vocabulary for MashStepType {
    const VALUES: &'static [(&'static str, Self)] = &[
        ("Infusion", MashStepType::Infusion),
        ("Temperature", MashStepType::Temperature),
        ("Decoction", MashStepType::Decoction),
    ];

    fn as_beerxml(&self) -> &'static str {
        match self {
            MashStepType::Infusion | MashStepType::BatchSparge | MashStepType::FlySparge => {
                "Infusion"
            }
            MashStepType::Temperature => "Temperature",
            MashStepType::Decoction => "Decoction",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MashStep {
    pub name: String,
    pub step_type: MashStepType,
    pub infuse_amount_l: f64,
    pub step_temp_c: f64,
    pub step_time_min: f64,
    pub ramp_time_min: f64,
    pub end_temp_c: f64,
    pub infuse_temp_c: f64,
    pub decoction_amount_l: f64,
    /// 1-based position within the owning mash.
    pub step_number: i64,
}

impl MashStep {
    pub fn new(name: impl Into<String>, step_type: MashStepType) -> Self {
        Self {
            name: name.into(),
            step_type,
            ..Self::default()
        }
    }
}

static MASH_STEP_PROPERTIES: &[PropertyDef<MashStep>] = &[
    property!(text "name", Some("NAME"), name),
    property!(enumerated "type", Some("TYPE"), step_type),
    property!(real "infuse_amount_l", Some("INFUSE_AMOUNT"), infuse_amount_l),
    property!(real "step_temp_c", Some("STEP_TEMP"), step_temp_c),
    property!(real "step_time_min", Some("STEP_TIME"), step_time_min),
    property!(real "ramp_time_min", Some("RAMP_TIME"), ramp_time_min),
    property!(real "end_temp_c", Some("END_TEMP"), end_temp_c),
    property!(real "infuse_temp_c", Some("INFUSE_TEMP"), infuse_temp_c),
    property!(real "decoction_amount_l", Some("DECOCTION_AMOUNT"), decoction_amount_l),
    property!(int "step_number", None, step_number),
];

impl Entity for MashStep {
    const KIND: EntityKind = EntityKind::MashStep;

    fn properties() -> &'static [PropertyDef<Self>] {
        MASH_STEP_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.mash_step
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mash {
    pub name: String,
    pub grain_temp_c: f64,
    pub notes: String,
    pub tun_temp_c: f64,
    pub sparge_temp_c: f64,
    pub ph: f64,
    pub tun_weight_kg: f64,
    pub tun_specific_heat_cal_gc: f64,
    pub equip_adjust: bool,
}

impl Default for Mash {
    fn default() -> Self {
        Self {
            name: String::new(),
            grain_temp_c: 20.0,
            notes: String::new(),
            tun_temp_c: 20.0,
            sparge_temp_c: 74.0,
            ph: 7.0,
            tun_weight_kg: 0.0,
            tun_specific_heat_cal_gc: 0.0,
            equip_adjust: true,
        }
    }
}

static MASH_PROPERTIES: &[PropertyDef<Mash>] = &[
    property!(text "name", Some("NAME"), name),
    property!(real "grain_temp_c", Some("GRAIN_TEMP"), grain_temp_c),
    property!(text "notes", Some("NOTES"), notes),
    property!(real "tun_temp_c", Some("TUN_TEMP"), tun_temp_c),
    property!(real "sparge_temp_c", Some("SPARGE_TEMP"), sparge_temp_c),
    property!(real "ph", Some("PH"), ph),
    property!(real "tun_weight_kg", Some("TUN_WEIGHT"), tun_weight_kg),
    property!(real "tun_specific_heat_cal_gc", Some("TUN_SPECIFIC_HEAT"), tun_specific_heat_cal_gc),
    property!(bool "equip_adjust", Some("EQUIP_ADJUST"), equip_adjust),
];

impl Entity for Mash {
    const KIND: EntityKind = EntityKind::Mash;

    fn properties() -> &'static [PropertyDef<Self>] {
        MASH_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.mash
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparge_steps_export_as_infusion() {
        assert_eq!(MashStepType::BatchSparge.as_beerxml(), "Infusion");
        assert_eq!(MashStepType::FlySparge.as_beerxml(), "Infusion");
        assert_eq!(MashStepType::Decoction.as_beerxml(), "Decoction");
    }

    #[test]
    fn lenient_parse_normalizes_case() {
        assert_eq!(MashStepType::from_beerxml_lenient("INFUSION"), Some(MashStepType::Infusion));
        assert_eq!(MashStepType::from_beerxml_lenient("decoction"), Some(MashStepType::Decoction));
        assert_eq!(MashStepType::from_beerxml_lenient("Batch Sparge"), None);
        assert_eq!(MashStepType::from_beerxml_lenient(""), None);
    }
}
