use crate::battle::models::DamageType;
use crate::battle::session::{ActionResult, TargetResult};

use super::effect::StatusInstance;

/// A status never mutates hp/mp directly; it describes the side effect it
/// wants and lets the bridge in this module translate a batch of them into
/// exactly one `ActionResult`, which the session then applies through the
/// single mutation gate.
pub enum StatusEvent {
    /// `amount > 0` heals, `amount < 0` damages. `kind` disambiguates for FX
    /// and filtering ("burn", "regen", "poison", ...).
    DamageTick {
        target: String,
        amount: f32,
        kind: String,
        damage_type: DamageType,
        source_status_id: String,
        source_combatant: Option<String>,
    },
    ApplyStatus {
        target: String,
        status: StatusInstance,
        source_combatant: Option<String>,
        reason: Option<String>,
    },
    RemoveStatus {
        target: String,
        status_id: String,
        reason: Option<String>,
    },
    Retaliation {
        attacker: String,
        amount: f32,
        kind: String,
        damage_type: DamageType,
        source_status_id: String,
        owner: Option<String>,
        status_to_apply: Option<StatusInstance>,
    },
}

impl StatusEvent {
    pub fn target_id(&self) -> &str {
        match self {
            StatusEvent::DamageTick { target, .. } => target,
            StatusEvent::ApplyStatus { target, .. } => target,
            StatusEvent::RemoveStatus { target, .. } => target,
            StatusEvent::Retaliation { attacker, .. } => attacker,
        }
    }
}

/// Per 4.8: fold a sequence of `StatusEvent`s (end-of-turn ticks,
/// retaliations, chained status applies) into one `ActionResult`. Per-target
/// hp/mp deltas aggregate; applied/removed statuses collect in event order.
pub fn build_action_result_from_status_events(events: Vec<StatusEvent>) -> ActionResult {
    let mut results: Vec<TargetResult> = Vec::new();

    let mut find_or_create = |target: &str, results: &mut Vec<TargetResult>| -> usize {
        if let Some(pos) = results.iter().position(|r| r.target_id == target) {
            pos
        } else {
            results.push(TargetResult::new(target));
            results.len() - 1
        }
    };

    for event in events {
        match event {
            StatusEvent::DamageTick { target, amount, .. } => {
                let idx = find_or_create(&target, &mut results);
                results[idx].hp_delta += amount;
            }
            StatusEvent::ApplyStatus { target, status, .. } => {
                let idx = find_or_create(&target, &mut results);
                results[idx].status_applied.push(status);
            }
            StatusEvent::RemoveStatus { target, status_id, .. } => {
                let idx = find_or_create(&target, &mut results);
                results[idx].status_removed.push(status_id);
            }
            StatusEvent::Retaliation {
                attacker,
                amount,
                status_to_apply,
                ..
            } => {
                let idx = find_or_create(&attacker, &mut results);
                results[idx].hp_delta += amount;
                if let Some(status) = status_to_apply {
                    results[idx].status_applied.push(status);
                }
            }
        }
    }

    ActionResult::from_targets(results)
}
