use serde::{Deserialize, Serialize};

/// Tunable constants for the battle core.
///
/// Centralizes the magic numbers named throughout the damage, timeline, and
/// status formulas so tests can override a single field (e.g. disabling
/// variance for exact-number assertions) instead of threading constants
/// through every call site.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleConfig {
    /// Uniform +/- spread applied to damage after the defensive subtraction.
    pub variance_pct: f32,
    /// Coefficient multiplying the defender's defensive stat in the shared
    /// damage model (`raw = base_damage - defensive * defensive_multiplier`).
    pub defensive_multiplier: f32,
    /// Base probability of a successful flee, before flag gating.
    pub flee_base_chance: f64,
    /// Gauge value a combatant must reach to be considered ready.
    pub ctb_threshold: f32,
    /// Gauge increase per tick for a combatant at `ctb_reference_speed`.
    pub ctb_base_rate: f32,
    /// Speed value the base rate is calibrated against.
    pub ctb_reference_speed: f32,
    /// DoT landing-roll curve: `p = clamp(base + coeff*(att-def), min, max)`.
    pub dot_landing_base: f32,
    pub dot_landing_coeff: f32,
    pub dot_landing_min: f32,
    pub dot_landing_max: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            variance_pct: 0.10,
            defensive_multiplier: 0.6,
            flee_base_chance: 0.5,
            ctb_threshold: 1000.0,
            ctb_base_rate: 100.0,
            ctb_reference_speed: 100.0,
            dot_landing_base: 0.70,
            dot_landing_coeff: 0.03,
            dot_landing_min: 0.10,
            dot_landing_max: 0.95,
        }
    }
}

impl BattleConfig {
    /// A config with variance disabled, used by tests that assert exact
    /// damage numbers (see the scenario suite).
    pub fn deterministic() -> Self {
        Self {
            variance_pct: 0.0,
            ..Self::default()
        }
    }
}
