use rand::Rng;
use tracing::debug;

use crate::battle::models::{Combatant, DamageType, Element, StatKind};
use crate::battle::status::{StatusEvent, StatusInstance};
use crate::config::BattleConfig;

use super::damage::{compute_base_damage, resolve_damage, Scaling};

/// Accumulated effect on one target across every `SkillEffect` in a skill,
/// using get-or-create semantics so additive components (Wind Strike's
/// physical + magical halves) land in the same bucket (4.4).
#[derive(Debug, Default)]
pub struct TargetChange {
    pub target_id: String,
    pub damage: f32,
    pub healed: f32,
    pub mp_delta: f32,
    pub status_applied: Vec<StatusInstance>,
    pub status_removed: Vec<String>,
}

impl TargetChange {
    fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            ..Default::default()
        }
    }
}

#[derive(Default)]
pub struct SkillResolutionResult {
    pub changes: Vec<TargetChange>,
    /// Events that don't belong to the target currently being resolved
    /// (e.g. a shield's retaliation landing on the attacker instead).
    pub status_events: Vec<StatusEvent>,
    pub message: Option<String>,
}

impl SkillResolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn change_mut(&mut self, target_id: &str) -> &mut TargetChange {
        if let Some(index) = self.changes.iter().position(|c| c.target_id == target_id) {
            &mut self.changes[index]
        } else {
            self.changes.push(TargetChange::new(target_id));
            self.changes.last_mut().unwrap()
        }
    }
}

/// A factory baking in whatever caster-side data a status needs at apply
/// time (e.g. Burn's tick power from the caster's magic stat), since the
/// status behavior never holds a live reference back to its source.
pub type StatusFactory = fn(&Combatant) -> StatusInstance;

/// One declared step of a skill's resolution (4.4, 4.5). Declaration order
/// within a `SkillDefinition` is resolution order.
#[derive(Clone, Copy)]
pub enum SkillEffect {
    Damage {
        scaling: Scaling,
        damage_type: DamageType,
        element: Element,
    },
    Heal {
        scaling: Scaling,
    },
    /// Only rolls if the same target already took damage > 0 this
    /// resolution (post-hit chance effects, 4.4).
    ChanceStatusOnHit {
        status: StatusFactory,
        chance: f64,
    },
    /// Unconditional status application. `self_apply` redirects the effect
    /// onto the user instead of the command's targets (e.g. Wind Strike's
    /// self-buff after its damage components).
    ApplyStatusAlways {
        status: StatusFactory,
        self_apply: bool,
    },
}

impl SkillEffect {
    pub fn is_self_apply(&self) -> bool {
        matches!(self, SkillEffect::ApplyStatusAlways { self_apply: true, .. })
    }

    /// Applies this effect to one target, mutating its `TargetChange` and
    /// staging any events that must be routed elsewhere (retaliations).
    pub fn apply(
        &self,
        user: &Combatant,
        target: &Combatant,
        config: &BattleConfig,
        rng: &mut impl Rng,
        result: &mut SkillResolutionResult,
    ) {
        match *self {
            SkillEffect::Damage { scaling, damage_type, element } => {
                let eff_atk = user.effective_stat(StatKind::Atk);
                let eff_mag = user.effective_stat(StatKind::Mag);
                let base = compute_base_damage(scaling, eff_atk, eff_mag);
                let defensive = match damage_type {
                    DamageType::Physical => target.effective_stat(StatKind::Def),
                    DamageType::Magic => target.effective_stat(StatKind::Mres),
                };
                let raw = resolve_damage(base, defensive, config, rng) as f32;
                let adjustment = target
                    .statuses
                    .apply_incoming_damage_modifiers(raw, element, damage_type, Some(user.id.as_str()));

                let change = result.change_mut(&target.id);
                change.damage += adjustment.amount;
                change.healed += adjustment.bonus_heal;
                result.status_events.extend(adjustment.events);
            }
            SkillEffect::Heal { scaling } => {
                let eff_mag = user.effective_stat(StatKind::Mag);
                let eff_atk = user.effective_stat(StatKind::Atk);
                let amount = compute_base_damage(scaling, eff_atk, eff_mag);
                let change = result.change_mut(&target.id);
                change.healed += amount;
            }
            SkillEffect::ChanceStatusOnHit { status, chance } => {
                let already_hit = result
                    .changes
                    .iter()
                    .find(|c| c.target_id == target.id)
                    .map(|c| c.damage > 0.0)
                    .unwrap_or(false);
                if already_hit && rng.gen_bool(chance) {
                    let instance = status(user);
                    debug!(status = %instance.id, target = %target.id, "status proc landed");
                    let change = result.change_mut(&target.id);
                    change.status_applied.push(instance);
                }
            }
            SkillEffect::ApplyStatusAlways { status, .. } => {
                let instance = status(user);
                let change = result.change_mut(&target.id);
                change.status_applied.push(instance);
            }
        }
    }
}
