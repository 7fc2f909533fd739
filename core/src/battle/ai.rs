//! A deterministic weakest-target policy (2: "Automatic balance tuning or
//! AI beyond a deterministic weakest-target policy" is explicitly out of
//! scope). Mirrors the teacher's `ai_system::select_ai_move` shape: pick
//! the first usable action, skip unusable ones, fall back to a basic
//! attack when nothing else is affordable.

use crate::battle::command::{BattleCommand, CommandSource, CommandType};
use crate::battle::models::Combatant;
use crate::battle::registry::BattleRegistry;
use crate::battle::session::Session;

pub struct AiPolicy;

impl AiPolicy {
    /// Builds the command for `actor_id`'s enemy turn: the cheapest skill
    /// in `skill_ids` the actor can afford, targeting the living party
    /// member with the lowest current hp (ties broken by roster order).
    /// Falls back to `defend` if nothing is affordable.
    pub fn select_command(
        actor_id: &str,
        skill_ids: &[String],
        session: &Session,
        registry: &BattleRegistry,
    ) -> BattleCommand {
        let Some(actor) = session.get(actor_id) else {
            return BattleCommand::defend(actor_id);
        };

        let Some(target) = weakest_target(session, &session.party) else {
            return BattleCommand::defend(actor_id);
        };

        let affordable = skill_ids
            .iter()
            .filter_map(|id| registry.skill(id))
            .filter(|skill| skill.meta.mp_cost <= actor.mp)
            .min_by_key(|skill| skill.meta.mp_cost);

        match affordable {
            Some(skill) => {
                let mut command = BattleCommand::skill(actor_id, skill.id.clone(), vec![target.id.clone()]);
                command.source = CommandSource::Ai;
                command
            }
            None => {
                let mut command = BattleCommand::defend(actor_id);
                command.source = CommandSource::Ai;
                command.command_type = CommandType::Defend;
                command
            }
        }
    }
}

fn weakest_target<'a>(session: &'a Session, roster: &'a [Combatant]) -> Option<&'a Combatant> {
    let _ = session;
    roster.iter().filter(|c| c.alive()).min_by_key(|c| c.hp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::models::{BaseStats, Side};
    use crate::battle::registry::{SkillDefinition, SkillMeta};
    use crate::battle::session::BattleFlags;
    use crate::battle::models::{Element, MenuGroup, TargetType};

    fn stats() -> BaseStats {
        BaseStats {
            atk: 10.0,
            mag: 10.0,
            defense: 10.0,
            mres: 10.0,
            spd: 10.0,
            luck: 0.0,
        }
    }

    #[test]
    fn targets_the_lowest_hp_living_party_member() {
        let session = Session::new(
            vec![
                Combatant::new("setia", "Setia", Side::Party, 80, 50, stats()),
                Combatant::new("kaira", "Kaira", Side::Party, 20, 50, stats()),
            ],
            vec![Combatant::new("wolf", "TrailWolf", Side::Enemy, 45, 0, stats())],
            BattleFlags::default(),
        );
        let mut registry = BattleRegistry::new();
        registry.register_skill(SkillDefinition {
            id: "bite".to_string(),
            name: "Bite".to_string(),
            meta: SkillMeta {
                menu_group: MenuGroup::Attack,
                mp_cost: 0,
                element: Element::Physical,
                target_type: TargetType::SingleEnemy,
            },
            effects: Vec::new(),
        });

        let command = AiPolicy::select_command("wolf", &["bite".to_string()], &session, &registry);
        assert_eq!(command.targets, vec!["kaira".to_string()]);
        assert_eq!(command.source, CommandSource::Ai);
    }

    #[test]
    fn defends_when_no_skill_is_affordable() {
        let session = Session::new(
            vec![Combatant::new("setia", "Setia", Side::Party, 80, 50, stats())],
            vec![Combatant::new("wolf", "TrailWolf", Side::Enemy, 45, 0, stats())],
            BattleFlags::default(),
        );
        let registry = BattleRegistry::new();
        let command = AiPolicy::select_command("wolf", &[], &session, &registry);
        assert_eq!(command.command_type, CommandType::Defend);
    }
}
