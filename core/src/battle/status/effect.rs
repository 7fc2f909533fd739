use std::collections::HashSet;

use crate::battle::models::{DamageType, Element, StatModifierSet};

use super::events::StatusEvent;

/// Minimal context handed to a status hook: enough to label the events it
/// emits, never enough to reach back into live combatant state directly.
/// Owner mutation happens exclusively through the events a hook returns,
/// which the session applies through the single mutation gate.
pub struct StatusHookContext<'a> {
    pub owner_id: &'a str,
    pub status_id: &'a str,
}

/// Result of folding a status's `on_before_owner_takes_damage` hook: the
/// (possibly modified) incoming amount, any bonus heal it grants the owner,
/// and any events it wants to emit (typically retaliations).
pub struct IncomingDamageAdjustment {
    pub amount: f32,
    pub bonus_heal: f32,
    pub events: Vec<StatusEvent>,
}

impl IncomingDamageAdjustment {
    pub fn unchanged(amount: f32) -> Self {
        Self {
            amount,
            bonus_heal: 0.0,
            events: Vec::new(),
        }
    }
}

/// The behavior side of a status: what it does, independent of its
/// bookkeeping (duration, stacking, tags), which `StatusInstance` owns.
///
/// Default methods are no-ops so a concrete status only implements the
/// hooks relevant to its family (stat buff, DoT/HoT, elemental shield).
pub trait StatusBehavior: Send + Sync {
    fn modify_stats(&self, _stats: &mut StatModifierSet) {}

    fn on_apply(&self, _ctx: &StatusHookContext) {}

    fn on_turn_start(&self, _ctx: &StatusHookContext) {}

    fn on_turn_end(&self, _ctx: &StatusHookContext) -> Vec<StatusEvent> {
        Vec::new()
    }

    fn on_expire(&self, _ctx: &StatusHookContext) {}

    fn on_before_owner_takes_damage(
        &self,
        amount: f32,
        _element: Element,
        _damage_type: DamageType,
        _attacker_id: Option<&str>,
        _ctx: &StatusHookContext,
    ) -> IncomingDamageAdjustment {
        IncomingDamageAdjustment::unchanged(amount)
    }
}

/// A named ongoing modifier attached to one combatant: bookkeeping
/// (duration, stacking rules, tags) plus its behavior.
pub struct StatusInstance {
    pub id: String,
    pub name: String,
    pub duration_turns: i32,
    pub dispellable: bool,
    pub stackable: bool,
    pub max_stacks: Option<u32>,
    pub tags: HashSet<String>,
    pub skip_next_end_of_turn_decrement: bool,
    pub behavior: Box<dyn StatusBehavior>,
}

impl StatusInstance {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration_turns: i32,
        behavior: Box<dyn StatusBehavior>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_turns,
            dispellable: true,
            stackable: false,
            max_stacks: None,
            tags: HashSet::new(),
            skip_next_end_of_turn_decrement: false,
            behavior,
        }
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    pub fn max_stacks(mut self, n: u32) -> Self {
        self.max_stacks = Some(n);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = &'static str>) -> Self {
        self.tags.extend(tags.into_iter().map(str::to_string));
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
