use rand::Rng;

use crate::battle::command::CommandType;
use crate::battle::models::Combatant;
use crate::battle::registry::SkillDefinition;
use crate::battle::session::{ActionResult, TargetResult};
use crate::battle::status::build_action_result_from_status_events;
use crate::config::BattleConfig;

use super::effects::SkillResolutionResult;

/// Pure conversion layer (4.5): resolves a skill's effects against a user
/// and its command targets, then translates the result into an
/// `ActionResult`. Never touches session state.
pub struct ActionResolver;

impl ActionResolver {
    /// Runs every effect of `skill` in declaration order against `targets`
    /// (or the user alone, for effects that declare self-apply).
    pub fn resolve_skill(
        skill: &SkillDefinition,
        user: &Combatant,
        targets: &[&Combatant],
        config: &BattleConfig,
        rng: &mut impl Rng,
    ) -> SkillResolutionResult {
        let mut result = SkillResolutionResult::new();
        let self_as_slice = [user];

        for effect in &skill.effects {
            let effect_targets: &[&Combatant] = if effect.is_self_apply() {
                &self_as_slice
            } else {
                targets
            };
            for target in effect_targets {
                effect.apply(user, target, config, rng, &mut result);
            }
        }

        result
    }

    /// Translates a `SkillResolutionResult` into the `ActionResult` the
    /// session gate consumes (4.5): `hp_delta = healed - damage`, status
    /// events that target a different combatant (retaliations) are merged
    /// in alongside the per-target changes.
    pub fn to_action_result(
        actor_id: &str,
        command_type: CommandType,
        skill_id: &str,
        result: SkillResolutionResult,
    ) -> ActionResult {
        let mut targets: Vec<TargetResult> = result
            .changes
            .into_iter()
            .map(|change| TargetResult {
                target_id: change.target_id,
                hp_delta: change.healed - change.damage,
                mp_delta: change.mp_delta,
                status_applied: change.status_applied,
                status_removed: change.status_removed,
            })
            .collect();

        if !result.status_events.is_empty() {
            let extra = build_action_result_from_status_events(result.status_events);
            targets.extend(extra.targets);
        }

        ActionResult {
            actor_id: Some(actor_id.to_string()),
            command_type: Some(command_type),
            skill_id: Some(skill_id.to_string()),
            item_id: None,
            targets,
            success: true,
            consumed_items: Vec::new(),
        }
    }
}
