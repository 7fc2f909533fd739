use rand::Rng;
use tracing::{debug, warn};

use crate::battle::command::{BattleCommand, CommandType};
use crate::battle::models::Combatant;
use crate::battle::registry::BattleRegistry;
use crate::battle::session::{ActionResult, Session, TargetResult};
use crate::battle::skill::{ActionResolver, SkillResolutionResult};
use crate::battle::status::library::defend;
use crate::config::BattleConfig;

/// One pure function per `CommandType` (4.3): given a command plus enough
/// context to resolve it, produce the `ActionResult` the session gate will
/// apply, or `None` for a command that doesn't mutate anything this turn.
pub struct CommandHandlers;

impl CommandHandlers {
    /// `defend`: applies `defend_1` to the actor. Never fails on a valid
    /// actor id.
    pub fn handle_defend(actor_id: &str) -> ActionResult {
        let mut target = TargetResult::new(actor_id);
        target.status_applied.push(defend());
        ActionResult {
            actor_id: Some(actor_id.to_string()),
            command_type: Some(CommandType::Defend),
            skill_id: None,
            item_id: None,
            targets: vec![target],
            success: true,
            consumed_items: Vec::new(),
        }
    }

    /// `flee`: no target mutation regardless of outcome; success is gated
    /// by `can_escape` and a base-chance roll. The turn is always consumed
    /// by the caller whether or not the roll succeeds.
    pub fn handle_flee(can_escape: bool, config: &BattleConfig, rng: &mut impl Rng) -> bool {
        can_escape && rng.gen_bool(config.flee_base_chance)
    }

    /// `equip_weapon`: a free action (4.9's non-goal list in 8's boundary
    /// behaviors: a free action does not consume a turn). Battle-local only,
    /// never touches persistent equipment state.
    pub fn handle_equip_weapon(actor_id: &str) -> ActionResult {
        ActionResult {
            actor_id: Some(actor_id.to_string()),
            command_type: Some(CommandType::EquipWeapon),
            skill_id: None,
            item_id: None,
            targets: Vec::new(),
            success: true,
            consumed_items: Vec::new(),
        }
    }

    /// `skill`: full resolution via the shared damage model and effect
    /// pipeline. MP shortfall is a soft failure: returns `None`, the mapper
    /// stays in PLAYER_COMMAND, nothing is staged.
    pub fn handle_skill(
        command: &BattleCommand,
        session: &Session,
        registry: &BattleRegistry,
        config: &BattleConfig,
        rng: &mut impl Rng,
    ) -> Option<ActionResult> {
        let skill_id = command.skill_id.as_deref()?;
        let skill = registry.skill(skill_id)?;

        let user = session.get(&command.actor_id)?;
        if user.mp < skill.meta.mp_cost {
            debug!(actor = %command.actor_id, skill = %skill_id, "insufficient mp, skill soft-failed");
            return None;
        }

        let targets: Vec<&Combatant> = command
            .targets
            .iter()
            .filter_map(|id| session.get(id))
            .collect();
        if targets.is_empty() {
            warn!(skill = %skill_id, "skill command resolved to zero valid targets");
            return None;
        }

        let resolution: SkillResolutionResult = ActionResolver::resolve_skill(skill, user, &targets, config, rng);
        let mut result = ActionResolver::to_action_result(&command.actor_id, CommandType::Skill, skill_id, resolution);
        result.targets.push({
            let mut mp_change = TargetResult::new(&command.actor_id);
            mp_change.mp_delta = -(skill.meta.mp_cost as f32);
            mp_change
        });
        Some(result)
    }

    /// `item`: delegates to the item-effect registry. A missing effect list
    /// is a soft failure (availability was already validated pre-dispatch).
    pub fn handle_item(
        command: &BattleCommand,
        session: &Session,
        registry: &BattleRegistry,
        config: &BattleConfig,
        rng: &mut impl Rng,
    ) -> Option<ActionResult> {
        let item_id = command.item_id.as_deref()?;
        let effects = registry.item_effects(item_id)?;
        let user = session.get(&command.actor_id)?;
        let targets: Vec<&Combatant> = command
            .targets
            .iter()
            .filter_map(|id| session.get(id))
            .collect();
        let targets = if targets.is_empty() { vec![user] } else { targets };

        let mut resolution = SkillResolutionResult::new();
        for effect in effects {
            for target in &targets {
                effect.apply(user, target, config, rng, &mut resolution);
            }
        }

        let mut result = ActionResolver::to_action_result(&command.actor_id, CommandType::Item, item_id, resolution);
        result.item_id = Some(item_id.to_string());
        result.skill_id = None;
        result.consumed_items.push((item_id.to_string(), 1));
        Some(result)
    }
}
