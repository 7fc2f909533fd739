use crate::battle::models::{DamageType, Element, StatModifierSet};

use super::effect::{IncomingDamageAdjustment, StatusHookContext, StatusInstance};
use super::events::StatusEvent;

/// Per-combatant stack of active statuses. Owns ordering, stacking rules,
/// and hook dispatch; never touches hp/mp itself (4.7).
pub struct StatusManager {
    owner_id: String,
    effects: Vec<StatusInstance>,
}

impl StatusManager {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            effects: Vec::new(),
        }
    }

    pub fn effects(&self) -> &[StatusInstance] {
        &self.effects
    }

    pub fn has(&self, status_id: &str) -> bool {
        self.effects.iter().any(|e| e.id == status_id)
    }

    pub fn count(&self, status_id: &str) -> usize {
        self.effects.iter().filter(|e| e.id == status_id).count()
    }

    /// Attach a new status, applying the rules in 4.7 in order: elemental
    /// shield exclusivity, `max_stacks` eviction, non-stackable replacement,
    /// then the one-shot end-of-turn skip flag.
    pub fn add(&mut self, mut incoming: StatusInstance) {
        let ctx = StatusHookContext {
            owner_id: &self.owner_id,
            status_id: &incoming.id,
        };

        if incoming.has_tag("elemental_shield") {
            let mut remaining = Vec::with_capacity(self.effects.len());
            for existing in self.effects.drain(..) {
                if existing.has_tag("elemental_shield") {
                    let expire_ctx = StatusHookContext {
                        owner_id: &self.owner_id,
                        status_id: &existing.id,
                    };
                    existing.behavior.on_expire(&expire_ctx);
                } else {
                    remaining.push(existing);
                }
            }
            self.effects = remaining;
        }

        if let Some(max_stacks) = incoming.max_stacks {
            let max_stacks = max_stacks as usize;
            let same_id_count = self.count(&incoming.id);
            if max_stacks > 0 && same_id_count >= max_stacks {
                let to_evict = same_id_count - (max_stacks - 1);
                let mut evicted = 0;
                let mut remaining = Vec::with_capacity(self.effects.len());
                for existing in self.effects.drain(..) {
                    if existing.id == incoming.id && evicted < to_evict {
                        let expire_ctx = StatusHookContext {
                            owner_id: &self.owner_id,
                            status_id: &existing.id,
                        };
                        existing.behavior.on_expire(&expire_ctx);
                        evicted += 1;
                    } else {
                        remaining.push(existing);
                    }
                }
                self.effects = remaining;
            }
        } else if !incoming.stackable {
            self.remove_by_id(&incoming.id);
        }

        incoming.skip_next_end_of_turn_decrement = true;
        incoming.behavior.on_apply(&ctx);
        self.effects.push(incoming);
    }

    pub fn remove_by_id(&mut self, status_id: &str) {
        let owner_id = self.owner_id.clone();
        self.effects.retain(|existing| {
            if existing.id == status_id {
                let ctx = StatusHookContext {
                    owner_id: &owner_id,
                    status_id: &existing.id,
                };
                existing.behavior.on_expire(&ctx);
                false
            } else {
                true
            }
        });
    }

    pub fn on_turn_start(&self) {
        for effect in &self.effects {
            let ctx = StatusHookContext {
                owner_id: &self.owner_id,
                status_id: &effect.id,
            };
            effect.behavior.on_turn_start(&ctx);
        }
    }

    /// Fire `on_turn_end` for every effect, collecting emitted events; then
    /// decrement durations (honoring the one-shot skip flag) and purge
    /// anything that expired, firing `on_expire`.
    pub fn on_turn_end(&mut self) -> Vec<StatusEvent> {
        let mut events = Vec::new();
        for effect in &self.effects {
            let ctx = StatusHookContext {
                owner_id: &self.owner_id,
                status_id: &effect.id,
            };
            events.extend(effect.behavior.on_turn_end(&ctx));
        }

        let owner_id = self.owner_id.clone();
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            if effect.skip_next_end_of_turn_decrement {
                effect.skip_next_end_of_turn_decrement = false;
            } else {
                effect.duration_turns -= 1;
            }
            if effect.duration_turns <= 0 {
                expired.push(effect.id.clone());
            }
        }
        self.effects.retain(|effect| {
            let keep = effect.duration_turns > 0;
            if !keep {
                let ctx = StatusHookContext {
                    owner_id: &owner_id,
                    status_id: &effect.id,
                };
                effect.behavior.on_expire(&ctx);
            }
            keep
        });
        let _ = expired;
        events
    }

    /// Aggregate every effect's stat contribution into one modifier set,
    /// starting from the identity (mult=1.0, add=0.0 per axis).
    pub fn stat_modifiers(&self) -> StatModifierSet {
        let mut modifiers = StatModifierSet::default();
        for effect in &self.effects {
            effect.behavior.modify_stats(&mut modifiers);
        }
        modifiers
    }

    /// Run every effect's `on_before_owner_takes_damage` hook in stack
    /// order, folding the amount (last-returned value wins), summing bonus
    /// heals, and concatenating emitted events (4.4).
    pub fn apply_incoming_damage_modifiers(
        &self,
        amount: f32,
        element: Element,
        damage_type: DamageType,
        attacker_id: Option<&str>,
    ) -> IncomingDamageAdjustment {
        let mut current = amount;
        let mut bonus_heal = 0.0;
        let mut events = Vec::new();
        for effect in &self.effects {
            let ctx = StatusHookContext {
                owner_id: &self.owner_id,
                status_id: &effect.id,
            };
            let adjustment = effect
                .behavior
                .on_before_owner_takes_damage(current, element, damage_type, attacker_id, &ctx);
            current = adjustment.amount;
            bonus_heal += adjustment.bonus_heal;
            events.extend(adjustment.events);
        }
        IncomingDamageAdjustment {
            amount: current,
            bonus_heal,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::status::library;

    #[test]
    fn stackable_false_replaces_same_id() {
        let mut manager = StatusManager::new("setia");
        manager.add(library::defend());
        manager.add(library::defend());
        assert_eq!(manager.count("defend_1"), 1);
    }

    #[test]
    fn elemental_shield_exclusivity_holds() {
        let mut manager = StatusManager::new("setia");
        manager.add(library::ice_shield());
        manager.add(library::ice_shield());
        let shields = manager
            .effects()
            .iter()
            .filter(|e| e.has_tag("elemental_shield"))
            .count();
        assert_eq!(shields, 1);
    }

    #[test]
    fn max_stacks_evicts_oldest() {
        let mut manager = StatusManager::new("trail_wolf");
        for _ in 0..5 {
            manager.add(library::burn(17.0));
        }
        assert!(manager.count("burn_1") <= 3);
    }

    #[test]
    fn freshly_applied_status_skips_first_decrement() {
        let mut manager = StatusManager::new("setia");
        manager.add(library::defend());
        manager.on_turn_end();
        assert!(manager.has("defend_1"), "defend should survive its first end-of-turn");
    }

    #[test]
    fn expires_after_duration_elapses() {
        let mut manager = StatusManager::new("setia");
        manager.add(library::defend());
        manager.on_turn_end();
        manager.on_turn_end();
        assert!(!manager.has("defend_1"));
    }
}
