//! Heat-balance constants and the strike-water equations.

/// Specific heat of water, cal/(g·°C).
pub const CW_CAL_GC: f64 = 1.0;
/// Specific heat of grain, cal/(g·°C).
pub const CGRAIN_CAL_GC: f64 = 0.4;
pub const GRAIN_DENSITY_KG_L: f64 = 1.26;
pub const GRAIN_ABSORPTION_L_KG: f64 = 1.085;
pub const DEFAULT_BOILING_POINT_C: f64 = 100.0;
/// Water density used to turn litres into kilograms.
pub const WATER_DENSITY_KG_L: f64 = 1.0;
/// Smallest sparge volume worth a step, in litres.
pub const SPARGE_EPSILON_L: f64 = 0.001;
/// Mash cools by about this much between the last rest and the sparge.
pub const SPARGE_TEMP_DROP_C: f64 = 10.0;

/// Strike temperature for the first infusion, accounting for the tun.
///
/// `grain_mc` and `water_mc` are thermal masses; `tun_mc` is the tun's.
pub fn strike_temp(grain_mc: f64, water_mc: f64, tun_mc: f64, target_c: f64, grain_c: f64, tun_c: f64) -> f64 {
    grain_mc / water_mc * (target_c - grain_c) + tun_mc / water_mc * (target_c - tun_c) + target_c
}

/// Mass of water at `water_c` needed to lift a mash of thermal mass `mc`
/// from `from_c` to `to_c`.
pub fn infusion_mass(mc: f64, from_c: f64, to_c: f64, water_c: f64) -> f64 {
    mc * (to_c - from_c) / (CW_CAL_GC * (water_c - to_c))
}

/// Temperature `mass` of water needs to lift thermal mass `mc` from
/// `from_c` to `to_c`.
pub fn infusion_temp(mc: f64, mass: f64, from_c: f64, to_c: f64) -> f64 {
    mc * (to_c - from_c) / (mass * CW_CAL_GC) + to_c
}

/// Fraction of the mash to pull, boil and return to reach `to_c`.
///
/// `water_kg` is the water already in the mash; the equipment terms are
/// zero unless the mash asks for equipment adjustment.
pub fn decoction_ratio(
    water_kg: f64,
    grain_kg: f64,
    equip_kg: f64,
    equip_c: f64,
    from_c: f64,
    to_c: f64,
    boiling_c: f64,
) -> f64 {
    let mash_heat = water_kg * CW_CAL_GC + grain_kg * CGRAIN_CAL_GC;
    ((mash_heat + equip_kg * equip_c) * (to_c - from_c))
        / (mash_heat * (boiling_c - to_c) + mash_heat * (to_c - from_c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_infusion_strike_temp() {
        // 5 kg grain at 20 C, 15 L water, no tun, mash at 65 C
        let tw = strike_temp(5.0 * CGRAIN_CAL_GC, 15.0 * CW_CAL_GC, 0.0, 65.0, 20.0, 20.0);
        assert!((tw - 71.0).abs() < 1e-9);
    }

    #[test]
    fn infusion_mass_and_temp_are_inverse() {
        let mc = 17.0;
        let mass = infusion_mass(mc, 52.0, 65.0, 100.0);
        assert!((infusion_temp(mc, mass, 52.0, 65.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn decoction_ratio_is_a_fraction_for_sane_mashes() {
        let r = decoction_ratio(15.0, 5.0, 0.0, 0.0, 52.0, 65.0, 100.0);
        assert!(r > 0.0 && r < 1.0);
        // stepping down can't be done by boiling part of the mash
        assert!(decoction_ratio(15.0, 5.0, 0.0, 0.0, 65.0, 52.0, 100.0) < 0.0);
    }
}
