use tracing::warn;

use crate::battle::command::CommandType;
use crate::battle::models::{Combatant, Side};
use crate::battle::outcome::BattleGains;
use crate::battle::status::StatusInstance;

/// Per-target mutation: the only currency `Session::apply_action_result`
/// accepts. `hp_delta`/`mp_delta` are signed floats (positive heals,
/// negative damages/spends) so several contributions can sum before the
/// session rounds and clamps them.
pub struct TargetResult {
    pub target_id: String,
    pub hp_delta: f32,
    pub mp_delta: f32,
    pub status_applied: Vec<StatusInstance>,
    pub status_removed: Vec<String>,
}

impl TargetResult {
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            hp_delta: 0.0,
            mp_delta: 0.0,
            status_applied: Vec::new(),
            status_removed: Vec::new(),
        }
    }
}

/// Canonical mutation package produced by the resolver and consumed by the
/// session gate. Never constructed with live combatant references: only
/// ids and deltas cross this boundary.
pub struct ActionResult {
    pub actor_id: Option<String>,
    pub command_type: Option<CommandType>,
    pub skill_id: Option<String>,
    pub item_id: Option<String>,
    pub targets: Vec<TargetResult>,
    pub success: bool,
    pub consumed_items: Vec<(String, u32)>,
}

impl ActionResult {
    pub fn from_targets(targets: Vec<TargetResult>) -> Self {
        Self {
            actor_id: None,
            command_type: None,
            skill_id: None,
            item_id: None,
            targets,
            success: true,
            consumed_items: Vec::new(),
        }
    }
}

/// Battle-global flags that affect turn flow but are not combatant state.
pub struct BattleFlags {
    pub is_boss: bool,
    pub can_escape: bool,
    pub phase_index: u32,
    pub aura: Option<String>,
    pub weather: Option<String>,
}

impl Default for BattleFlags {
    fn default() -> Self {
        Self {
            is_boss: false,
            can_escape: true,
            phase_index: 0,
            aura: None,
            weather: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Victory,
    Defeat,
}

/// The authoritative board: combatants, flags, logs, and the gains buffer.
/// The *only* mutation gate (invariant 1): hp/mp/status lists change solely
/// through `apply_action_result`.
pub struct Session {
    pub party: Vec<Combatant>,
    pub enemies: Vec<Combatant>,
    pub flags: BattleFlags,
    pub xp_log: Vec<String>,
    pub loot_log: Vec<String>,
    pub turn_count: u32,
    pub gains: BattleGains,
}

impl Session {
    pub fn new(party: Vec<Combatant>, enemies: Vec<Combatant>, flags: BattleFlags) -> Self {
        Self {
            party,
            enemies,
            flags,
            xp_log: Vec::new(),
            loot_log: Vec::new(),
            turn_count: 0,
            gains: BattleGains::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.party
            .iter()
            .chain(self.enemies.iter())
            .find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.party
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|c| c.id == id)
    }

    pub fn is_ko(&self, id: &str) -> bool {
        self.get(id).map(|c| !c.alive()).unwrap_or(true)
    }

    pub fn all_ids_in_order(&self) -> Vec<String> {
        self.party
            .iter()
            .chain(self.enemies.iter())
            .map(|c| c.id.clone())
            .collect()
    }

    /// Applies an `ActionResult` through the single mutation gate, per the
    /// ordered steps in 4.6: hp before mp before status add/remove, per
    /// target, in the order the result lists them.
    pub fn apply_action_result(&mut self, result: ActionResult) {
        for target in result.targets {
            let side = match self.get(&target.target_id) {
                Some(c) => c.side,
                None => {
                    warn!(target_id = %target.target_id, "apply_action_result: unknown combatant id, skipping");
                    continue;
                }
            };

            let Some(combatant) = self.get_mut(&target.target_id) else {
                continue;
            };

            let was_alive = combatant.alive();
            let new_hp = (combatant.hp as f32 + target.hp_delta).round();
            let clamped_hp = new_hp.clamp(0.0, combatant.max_hp as f32) as u32;
            combatant.set_hp(clamped_hp);

            if was_alive && !combatant.alive() && side == Side::Enemy {
                self.gains.mark_defeated(&target.target_id);
            }

            let new_mp = (combatant.mp as f32 + target.mp_delta).round();
            let clamped_mp = new_mp.clamp(0.0, combatant.max_mp as f32) as u32;
            combatant.set_mp(clamped_mp);

            for status_id in &target.status_removed {
                combatant.statuses.remove_by_id(status_id);
            }
            for status in target.status_applied {
                combatant.statuses.add(status);
            }
        }

        if result.success && !result.consumed_items.is_empty() {
            self.gains.consume_items(&result.consumed_items);
        }
    }

    /// `ongoing | victory | defeat` by checking whether each side still has
    /// a living member. Mutual KO resolves to victory by design (4.6).
    pub fn check_battle_outcome(&self) -> Outcome {
        let party_alive = self.party.iter().any(Combatant::alive);
        let enemies_alive = self.enemies.iter().any(Combatant::alive);
        match (party_alive, enemies_alive) {
            (true, true) => Outcome::Ongoing,
            (_, false) => Outcome::Victory,
            (false, true) => Outcome::Defeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::models::BaseStats;

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
    fn unknown_target_id_is_skipped_not_panicked() {
        let mut session = Session::new(
            vec![Combatant::new("setia", "Setia", Side::Party, 100, 50, stats())],
            vec![],
            BattleFlags::default(),
        );
        let mut target = TargetResult::new("ghost");
        target.hp_delta = -10.0;
        session.apply_action_result(ActionResult::from_targets(vec![target]));
        assert_eq!(session.get("setia").unwrap().hp, 100);
    }

    #[test]
    fn hp_clamps_to_max_hp() {
        let mut session = Session::new(
            vec![Combatant::new("setia", "Setia", Side::Party, 100, 50, stats())],
            vec![],
            BattleFlags::default(),
        );
        let mut target = TargetResult::new("setia");
        target.hp_delta = 999.0;
        session.apply_action_result(ActionResult::from_targets(vec![target]));
        assert_eq!(session.get("setia").unwrap().hp, 100);
    }

    #[test]
    fn hp_clamps_to_zero_not_negative() {
        let mut session = Session::new(
            vec![Combatant::new("setia", "Setia", Side::Party, 100, 50, stats())],
            vec![],
            BattleFlags::default(),
        );
        let mut target = TargetResult::new("setia");
        target.hp_delta = -999.0;
        session.apply_action_result(ActionResult::from_targets(vec![target]));
        assert_eq!(session.get("setia").unwrap().hp, 0);
        assert!(!session.get("setia").unwrap().alive());
    }

    #[test]
    fn defeating_an_enemy_marks_it_in_gains() {
        let mut session = Session::new(
            vec![],
            vec![Combatant::new("wolf", "TrailWolf", Side::Enemy, 10, 0, stats())],
            BattleFlags::default(),
        );
        let mut target = TargetResult::new("wolf");
        target.hp_delta = -100.0;
        session.apply_action_result(ActionResult::from_targets(vec![target]));
        assert!(session.gains.defeated_enemies.contains("wolf"));
    }

    #[test]
    fn mutual_ko_resolves_to_victory() {
        let session = Session::new(
            vec![Combatant::new("setia", "Setia", Side::Party, 0, 50, stats())],
            vec![Combatant::new("wolf", "TrailWolf", Side::Enemy, 0, 0, stats())],
            BattleFlags::default(),
        );
        assert_eq!(session.check_battle_outcome(), Outcome::Victory);
    }

    #[test]
    fn ongoing_while_both_sides_have_survivors() {
        let session = Session::new(
            vec![Combatant::new("setia", "Setia", Side::Party, 10, 50, stats())],
            vec![Combatant::new("wolf", "TrailWolf", Side::Enemy, 10, 0, stats())],
            BattleFlags::default(),
        );
        assert_eq!(session.check_battle_outcome(), Outcome::Ongoing);
    }
}
