use crate::property;
use crate::property::{Entity, EntityKind, PropertyDef, PropertyTable, PropertyTables};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub boil_size_l: f64,
    pub batch_size_l: f64,
    pub tun_volume_l: f64,
    pub tun_weight_kg: f64,
    pub tun_specific_heat_cal_gc: f64,
    pub top_up_water_l: f64,
    pub trub_chiller_loss_l: f64,
    pub evap_rate_pct_hr: f64,
    pub boil_time_min: f64,
    pub calc_boil_volume: bool,
    pub lauter_deadspace_l: f64,
    pub top_up_kettle_l: f64,
    pub hop_utilization_pct: f64,
    pub notes: String,
    pub grain_absorption_l_kg: f64,
    pub boiling_point_c: f64,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            name: String::new(),
            boil_size_l: 0.0,
            batch_size_l: 0.0,
            tun_volume_l: 0.0,
            tun_weight_kg: 0.0,
            tun_specific_heat_cal_gc: 0.0,
            top_up_water_l: 0.0,
            trub_chiller_loss_l: 0.0,
            evap_rate_pct_hr: 0.0,
            boil_time_min: 60.0,
            calc_boil_volume: false,
            lauter_deadspace_l: 0.0,
            top_up_kettle_l: 0.0,
            hop_utilization_pct: 100.0,
            notes: String::new(),
            grain_absorption_l_kg: 1.085,
            boiling_point_c: 100.0,
        }
    }
}

static EQUIPMENT_PROPERTIES: &[PropertyDef<Equipment>] = &[
    property!(text "name", Some("NAME"), name),
    property!(real "boil_size_l", Some("BOIL_SIZE"), boil_size_l),
    property!(real "batch_size_l", Some("BATCH_SIZE"), batch_size_l),
    property!(real "tun_volume_l", Some("TUN_VOLUME"), tun_volume_l),
    property!(real "tun_weight_kg", Some("TUN_WEIGHT"), tun_weight_kg),
    property!(real "tun_specific_heat_cal_gc", Some("TUN_SPECIFIC_HEAT"), tun_specific_heat_cal_gc),
    property!(real "top_up_water_l", Some("TOP_UP_WATER"), top_up_water_l),
    property!(real "trub_chiller_loss_l", Some("TRUB_CHILLER_LOSS"), trub_chiller_loss_l),
    property!(real "evap_rate_pct_hr", Some("EVAP_RATE"), evap_rate_pct_hr),
    property!(real "boil_time_min", Some("BOIL_TIME"), boil_time_min),
    property!(bool "calc_boil_volume", Some("CALC_BOIL_VOLUME"), calc_boil_volume),
    property!(real "lauter_deadspace_l", Some("LAUTER_DEADSPACE"), lauter_deadspace_l),
    property!(real "top_up_kettle_l", Some("TOP_UP_KETTLE"), top_up_kettle_l),
    property!(real "hop_utilization_pct", Some("HOP_UTILIZATION"), hop_utilization_pct),
    property!(text "notes", Some("NOTES"), notes),
    property!(real "grain_absorption_l_kg", Some("ABSORPTION"), grain_absorption_l_kg),
    property!(real "boiling_point_c", Some("BOILING_POINT"), boiling_point_c),
];

impl Entity for Equipment {
    const KIND: EntityKind = EntityKind::Equipment;

    fn properties() -> &'static [PropertyDef<Self>] {
        EQUIPMENT_PROPERTIES
    }

    fn table(tables: &PropertyTables) -> &PropertyTable<Self> {
        &tables.equipment
    }

    fn name(&self) -> &str {
        &self.name
    }
}
