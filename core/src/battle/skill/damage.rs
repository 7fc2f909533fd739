use rand::Rng;

use crate::config::BattleConfig;

/// How a skill effect's base damage is derived from the user's effective
/// offensive stats (4.4). `flat` is a per-skill additive term; for
/// `mag_ratio` it plays the legacy role the source calls `flat`.
#[derive(Debug, Clone, Copy)]
pub enum Scaling {
    Atk { coeff: f32, flat: f32 },
    Mag { coeff: f32, flat: f32 },
    MagRatio { ratio: f32, flat: f32 },
    Flat(f32),
}

pub fn compute_base_damage(scaling: Scaling, eff_atk: f32, eff_mag: f32) -> f32 {
    match scaling {
        Scaling::Atk { coeff, flat } => eff_atk * coeff + flat,
        Scaling::Mag { coeff, flat } => eff_mag * coeff + flat,
        Scaling::MagRatio { ratio, flat } => eff_mag * ratio + flat,
        Scaling::Flat(value) => value,
    }
}

/// Shared damage model, single source of truth per 4.4: subtract 60% of the
/// defensive stat, apply symmetric variance, floor to an integer, clamp to
/// a minimum of 1.
pub fn resolve_damage(base_damage: f32, defensive_stat: f32, config: &BattleConfig, rng: &mut impl Rng) -> i32 {
    let raw = base_damage - defensive_stat * config.defensive_multiplier;
    let variance = if config.variance_pct > 0.0 {
        rng.gen_range(-config.variance_pct..=config.variance_pct)
    } else {
        0.0
    };
    let varied = raw * (1.0 + variance);
    (varied.floor() as i32).max(1)
}

/// The stat-vs-stat landing curve for DoT application (4.4).
pub fn dot_landing_chance(att_stat: f32, def_stat: f32, config: &BattleConfig) -> f64 {
    let p = config.dot_landing_base + config.dot_landing_coeff * (att_stat - def_stat);
    p.clamp(config.dot_landing_min, config.dot_landing_max) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deterministic() -> BattleConfig {
        BattleConfig::deterministic()
    }

    #[test]
    fn basic_hit_matches_scenario_one() {
        let config = deterministic();
        let base = compute_base_damage(Scaling::Atk { coeff: 1.0, flat: 0.0 }, 16.0, 0.0);
        let damage = resolve_damage(base, 6.0, &config, &mut rand::thread_rng());
        assert_eq!(damage, 12);
    }

    #[test]
    fn ember_bolt_matches_scenario_three() {
        let config = deterministic();
        let base = compute_base_damage(Scaling::Mag { coeff: 0.85, flat: 0.0 }, 0.0, 17.0);
        let damage = resolve_damage(base, 4.0, &config, &mut rand::thread_rng());
        assert_eq!(damage, 12);
    }

    #[test]
    fn wind_strike_components_match_scenario_six() {
        let config = deterministic();
        let physical = compute_base_damage(Scaling::Atk { coeff: 0.33, flat: 16.0 }, 16.0, 0.0);
        let physical_damage = resolve_damage(physical, 6.0, &config, &mut rand::thread_rng());
        assert_eq!(physical_damage, 17);

        let magical = compute_base_damage(Scaling::Mag { coeff: 0.22, flat: 16.0 }, 0.0, 6.0);
        let magical_damage = resolve_damage(magical, 4.0, &config, &mut rand::thread_rng());
        assert_eq!(magical_damage, 14);
    }

    #[test]
    fn damage_never_drops_below_one() {
        let config = deterministic();
        let base = compute_base_damage(Scaling::Flat(1.0), 0.0, 0.0);
        let damage = resolve_damage(base, 999.0, &config, &mut rand::thread_rng());
        assert_eq!(damage, 1);
    }
}
