//! Concrete status effects referenced by the scenario suite and the skill
//! library. Each constructor bakes in whatever source-side data it needs
//! (e.g. a DoT's tick power) at apply time, since the behavior itself never
//! gets a live reference back to its source combatant.

use crate::battle::models::{DamageType, Element, StatModifierSet, StatKind};

use super::effect::{IncomingDamageAdjustment, StatusBehavior, StatusHookContext, StatusInstance};
use super::events::StatusEvent;

struct StatBuff {
    stat: StatKind,
    mult_bonus: f32,
    add_bonus: f32,
}

impl StatusBehavior for StatBuff {
    fn modify_stats(&self, stats: &mut StatModifierSet) {
        let slot = stats.get_mut(self.stat);
        slot.mult += self.mult_bonus;
        slot.add += self.add_bonus;
    }
}

/// `defend_1`: +25% defense, +15% magic resistance, 1 turn.
pub fn defend() -> StatusInstance {
    StatusInstance::new(
        "defend_1",
        "Defend",
        1,
        Box::new(DefendBehavior),
    )
}

struct DefendBehavior;

impl StatusBehavior for DefendBehavior {
    fn modify_stats(&self, stats: &mut StatModifierSet) {
        stats.def.mult += 0.25;
        stats.mres.mult += 0.15;
    }
}

/// `affirmation_1`: +10% defense, 3 turns.
pub fn affirmation() -> StatusInstance {
    StatusInstance::new(
        "affirmation_1",
        "Affirmation I",
        3,
        Box::new(StatBuff {
            stat: StatKind::Def,
            mult_bonus: 0.10,
            add_bonus: 0.0,
        }),
    )
}

/// `flow_1`: +15% speed, 3 turns.
pub fn flow() -> StatusInstance {
    StatusInstance::new(
        "flow_1",
        "Flow I",
        3,
        Box::new(StatBuff {
            stat: StatKind::Spd,
            mult_bonus: 0.15,
            add_bonus: 0.0,
        }),
    )
}

struct RegenBehavior {
    per_tick: f32,
}

impl StatusBehavior for RegenBehavior {
    fn on_turn_end(&self, ctx: &StatusHookContext) -> Vec<StatusEvent> {
        vec![StatusEvent::DamageTick {
            target: ctx.owner_id.to_string(),
            amount: self.per_tick,
            kind: "regen".to_string(),
            damage_type: DamageType::Magic,
            source_status_id: ctx.status_id.to_string(),
            source_combatant: None,
        }]
    }
}

/// `regen_1`: heals a flat amount at end-of-turn for 3 turns.
pub fn regen(per_tick: f32) -> StatusInstance {
    StatusInstance::new("regen_1", "Regen", 3, Box::new(RegenBehavior { per_tick }))
}

struct BurnBehavior {
    tick_power: f32,
}

impl StatusBehavior for BurnBehavior {
    fn on_turn_end(&self, ctx: &StatusHookContext) -> Vec<StatusEvent> {
        vec![StatusEvent::DamageTick {
            target: ctx.owner_id.to_string(),
            amount: -self.tick_power,
            kind: "burn".to_string(),
            damage_type: DamageType::Magic,
            source_status_id: ctx.status_id.to_string(),
            source_combatant: None,
        }]
    }

    fn on_before_owner_takes_damage(
        &self,
        amount: f32,
        element: Element,
        _damage_type: DamageType,
        _attacker_id: Option<&str>,
        _ctx: &StatusHookContext,
    ) -> IncomingDamageAdjustment {
        let amount = if element == Element::Fire { amount * 1.05 } else { amount };
        IncomingDamageAdjustment::unchanged(amount)
    }
}

/// `burn_1`: damage-over-time tagged `dot`; tick power is baked in from the
/// caster's magic stat at apply time (`floor(mag * 0.25)`), duration 3,
/// stacks up to 3 with oldest-eviction per 4.7.
pub fn burn(caster_mag: f32) -> StatusInstance {
    let tick_power = (caster_mag * 0.25).floor();
    StatusInstance::new("burn_1", "Burn", 3, Box::new(BurnBehavior { tick_power }))
        .stackable()
        .max_stacks(3)
        .with_tags(["dot", "fire"])
}

struct FrostbiteBehavior;

impl StatusBehavior for FrostbiteBehavior {
    fn modify_stats(&self, stats: &mut StatModifierSet) {
        stats.spd.mult -= 0.15;
    }

    fn on_before_owner_takes_damage(
        &self,
        amount: f32,
        element: Element,
        _damage_type: DamageType,
        _attacker_id: Option<&str>,
        _ctx: &StatusHookContext,
    ) -> IncomingDamageAdjustment {
        let amount = if element == Element::Ice { amount * 1.05 } else { amount };
        IncomingDamageAdjustment::unchanged(amount)
    }
}

/// `frostbite_1`: -15% speed, +5% ice damage taken, 3 turns.
pub fn frostbite() -> StatusInstance {
    StatusInstance::new("frostbite_1", "Frostbite I", 3, Box::new(FrostbiteBehavior))
        .with_tags(["debuff", "ice"])
}

struct IceShieldBehavior {
    phys_reduction: f32,
    ice_reduction: f32,
    retaliation_chance: f64,
}

impl StatusBehavior for IceShieldBehavior {
    fn on_before_owner_takes_damage(
        &self,
        amount: f32,
        element: Element,
        damage_type: DamageType,
        attacker_id: Option<&str>,
        ctx: &StatusHookContext,
    ) -> IncomingDamageAdjustment {
        let mut amount = amount;
        if damage_type == DamageType::Physical {
            amount *= 1.0 - self.phys_reduction;
        }
        if element == Element::Ice {
            amount *= 1.0 - self.ice_reduction;
        }

        let mut events = Vec::new();
        if self.retaliation_chance >= 1.0 {
            if let Some(attacker) = attacker_id {
                events.push(StatusEvent::Retaliation {
                    attacker: attacker.to_string(),
                    amount: 0.0,
                    kind: "retaliation".to_string(),
                    damage_type,
                    source_status_id: ctx.status_id.to_string(),
                    owner: Some(ctx.owner_id.to_string()),
                    status_to_apply: Some(frostbite()),
                });
            }
        }

        IncomingDamageAdjustment {
            amount,
            bonus_heal: 0.0,
            events,
        }
    }
}

/// `ice_shield_1` (Chill Ward): 15% physical reduction, 20% bonus ice
/// reduction, retaliates with `frostbite_1` on the attacker, 3 turns.
/// Tagged `elemental_shield` so 4.7's exclusivity rule evicts any other
/// shield already on the owner.
pub fn ice_shield() -> StatusInstance {
    StatusInstance::new(
        "ice_shield_1",
        "Chill Ward",
        3,
        Box::new(IceShieldBehavior {
            phys_reduction: 0.15,
            ice_reduction: 0.20,
            retaliation_chance: 1.0,
        }),
    )
    .with_tags(["elemental_shield", "ice"])
}
