use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};

use crate::battle::ai::AiPolicy;
use crate::battle::command::{BattleCommand, CommandSource, CommandType};
use crate::battle::command_handlers::CommandHandlers;
use crate::battle::models::Side;
use crate::battle::outcome::BattleOutcome;
use crate::battle::registry::BattleRegistry;
use crate::battle::router::{BattleEvent, HitPayload, Router};
use crate::battle::session::{Outcome, Session};
use crate::battle::timeline::Timeline;
use crate::config::BattleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitCtb,
    PrepareActor,
    PlayerCommand,
    EnemyCommand,
    ResolveAction,
    PostResolve,
    BattleEnd,
}

/// Owns the battle's phase and every turn-flow decision (4.2). Never
/// computes damage, never touches hp/mp directly: the session gate is the
/// only writer.
pub struct ActionMapper {
    phase: Phase,
    ready_batch: Vec<String>,
    last_side: Option<Side>,
    party_cursor: usize,
    enemy_cursor: usize,
    current_actor: Option<String>,
    pending_command: Option<BattleCommand>,
    outcome: Option<BattleOutcome>,
    enemy_skills: HashMap<String, Vec<String>>,
}

impl ActionMapper {
    pub fn new(enemy_skills: HashMap<String, Vec<String>>) -> Self {
        Self {
            phase: Phase::WaitCtb,
            ready_batch: Vec::new(),
            last_side: None,
            party_cursor: 0,
            enemy_cursor: 0,
            current_actor: None,
            pending_command: None,
            outcome: None,
            enemy_skills,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::BattleEnd
    }

    /// Deposits a player command. Only takes effect while waiting in
    /// PLAYER_COMMAND for the matching actor.
    pub fn on_player_command(&mut self, command: BattleCommand) {
        if self.phase == Phase::PlayerCommand {
            if let Some(actor) = &self.current_actor {
                if *actor == command.actor_id {
                    self.pending_command = Some(command);
                }
            }
        }
    }

    /// Advances the state machine. Ticks the timeline by `dt` exactly once
    /// per call (in WAIT_CTB), then runs every phase transition that
    /// doesn't require external input (a player command, a fresh ready
    /// batch) before returning. Idempotent once BATTLE_END is reached.
    pub fn update(
        &mut self,
        dt: f32,
        session: &mut Session,
        timeline: &mut Timeline,
        registry: &BattleRegistry,
        router: &Router,
        config: &BattleConfig,
        rng: &mut impl Rng,
    ) {
        if self.phase == Phase::BattleEnd {
            return;
        }

        let mut ticked = false;
        loop {
            match self.phase {
                Phase::BattleEnd => break,
                Phase::WaitCtb => {
                    if ticked {
                        break;
                    }
                    ticked = true;
                    let is_ko = |id: &str| session.is_ko(id);
                    if let Some(batch) = timeline.update(dt, is_ko) {
                        let alive: Vec<String> = batch.into_iter().filter(|id| !session.is_ko(id)).collect();
                        if alive.is_empty() {
                            break;
                        }
                        self.ready_batch = alive;
                        self.phase = Phase::PrepareActor;
                        continue;
                    }
                    break;
                }
                Phase::PrepareActor => {
                    let Some(actor_id) = self.pick_next_actor(session) else {
                        self.ready_batch.clear();
                        self.phase = Phase::WaitCtb;
                        continue;
                    };
                    let Some(combatant) = session.get(&actor_id) else {
                        continue;
                    };
                    combatant.statuses.on_turn_start();
                    self.last_side = Some(combatant.side);
                    self.current_actor = Some(actor_id.clone());
                    self.phase = if combatant.side == Side::Party {
                        Phase::PlayerCommand
                    } else {
                        Phase::EnemyCommand
                    };
                }
                Phase::PlayerCommand => {
                    if self.pending_command.is_some() {
                        self.phase = Phase::ResolveAction;
                        continue;
                    }
                    break;
                }
                Phase::EnemyCommand => {
                    let actor_id = self.current_actor.clone().expect("enemy command requires a current actor");
                    let skill_ids = self.enemy_skills.get(&actor_id).cloned().unwrap_or_default();
                    let command = AiPolicy::select_command(&actor_id, &skill_ids, session, registry);
                    self.pending_command = Some(command);
                    self.phase = Phase::ResolveAction;
                }
                Phase::ResolveAction => {
                    let Some(mut command) = self.pending_command.take() else {
                        self.phase = Phase::PlayerCommand;
                        continue;
                    };
                    if command.command_type == CommandType::Flee {
                        let success = CommandHandlers::handle_flee(session.flags.can_escape, config, rng);
                        command.reason = Some(if success { "success".to_string() } else { "failed".to_string() });
                        self.pending_command = Some(command);
                        self.phase = Phase::PostResolve;
                        continue;
                    }
                    let result = Self::resolve_command(&command, session, registry, config, rng);
                    match result {
                        Some(action_result) => {
                            session.apply_action_result(action_result);
                            self.publish_resolution(router, &command);
                            self.phase = Phase::PostResolve;
                            self.pending_command = Some(command);
                        }
                        None => {
                            if command.source == CommandSource::Player {
                                debug!(actor = %command.actor_id, "command soft-failed, returning to player command");
                                self.phase = Phase::PlayerCommand;
                            } else {
                                self.phase = Phase::PostResolve;
                            }
                        }
                    }
                }
                Phase::PostResolve => {
                    let command = self.pending_command.take();
                    let free_action = matches!(command.as_ref().map(|c| c.command_type), Some(CommandType::EquipWeapon));
                    let fled = matches!(command.as_ref().map(|c| c.command_type), Some(CommandType::Flee))
                        && command.as_ref().map(|c| c.reason.as_deref() == Some("success")).unwrap_or(false);

                    if free_action {
                        self.phase = Phase::PlayerCommand;
                        continue;
                    }

                    if fled {
                        self.finish(BattleOutcome::fled(
                            session.xp_log.clone(),
                            session.loot_log.clone(),
                            session.gains.clone(),
                        ));
                        timeline.pause();
                        break;
                    }

                    match session.check_battle_outcome() {
                        Outcome::Victory => {
                            self.finish(BattleOutcome::victory(
                                session.xp_log.clone(),
                                session.loot_log.clone(),
                                session.gains.clone(),
                            ));
                            timeline.pause();
                            break;
                        }
                        Outcome::Defeat => {
                            self.finish(BattleOutcome::defeat(
                                session.xp_log.clone(),
                                session.loot_log.clone(),
                                session.gains.clone(),
                            ));
                            timeline.pause();
                            break;
                        }
                        Outcome::Ongoing => {}
                    }

                    if let Some(actor_id) = &self.current_actor {
                        if let Some(combatant) = session.get_mut(actor_id) {
                            let events = combatant.statuses.on_turn_end();
                            if !events.is_empty() {
                                let tick_result = crate::battle::status::build_action_result_from_status_events(events);
                                session.apply_action_result(tick_result);
                            }
                        }
                        timeline.reset_gauge(actor_id);
                    }
                    self.current_actor = None;
                    self.phase = Phase::WaitCtb;
                }
            }
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        info!(victory = outcome.victory, defeat = outcome.defeat, fled = outcome.fled, "battle outcome built");
        self.outcome = Some(outcome);
        self.phase = Phase::BattleEnd;
    }

    fn publish_resolution(&self, router: &Router, command: &BattleCommand) {
        if command.command_type == CommandType::Skill {
            router.publish(BattleEvent::Hit(HitPayload {
                actor: command.actor_id.clone(),
                target: command.targets.first().cloned().unwrap_or_default(),
                skill: command.skill_id.clone(),
                damage: 0.0,
                element: None,
                is_enemy: command.source == CommandSource::Ai,
            }));
        }
    }

    fn resolve_command(
        command: &BattleCommand,
        session: &Session,
        registry: &BattleRegistry,
        config: &BattleConfig,
        rng: &mut impl Rng,
    ) -> Option<crate::battle::session::ActionResult> {
        match command.command_type {
            CommandType::Skill => CommandHandlers::handle_skill(command, session, registry, config, rng),
            CommandType::Item => CommandHandlers::handle_item(command, session, registry, config, rng),
            CommandType::Defend => Some(CommandHandlers::handle_defend(&command.actor_id)),
            CommandType::EquipWeapon => Some(CommandHandlers::handle_equip_weapon(&command.actor_id)),
            CommandType::Flee => None,
            CommandType::Wait => None,
        }
    }

    /// Partitions the ready batch by side, alternating with memory of the
    /// last side resolved, and walks a stable round-robin cursor within the
    /// chosen side. Dead actors are filtered out, matching the "selected
    /// actor dies between PREPARE_ACTOR and resolution" edge case (4.2).
    fn pick_next_actor(&mut self, session: &Session) -> Option<String> {
        let party_ready: Vec<&String> = self
            .ready_batch
            .iter()
            .filter(|id| session.get(id).map(|c| c.side == Side::Party && c.alive()).unwrap_or(false))
            .collect();
        let enemy_ready: Vec<&String> = self
            .ready_batch
            .iter()
            .filter(|id| session.get(id).map(|c| c.side == Side::Enemy && c.alive()).unwrap_or(false))
            .collect();

        if party_ready.is_empty() && enemy_ready.is_empty() {
            return None;
        }

        let prefer_party = match self.last_side {
            Some(Side::Party) => false,
            Some(Side::Enemy) => true,
            None => true,
        };

        let chosen_side_is_party = if party_ready.is_empty() {
            false
        } else if enemy_ready.is_empty() {
            true
        } else {
            prefer_party
        };

        let picked = if chosen_side_is_party {
            let id = party_ready[self.party_cursor % party_ready.len()].clone();
            self.party_cursor = self.party_cursor.wrapping_add(1);
            id
        } else {
            let id = enemy_ready[self.enemy_cursor % enemy_ready.len()].clone();
            self.enemy_cursor = self.enemy_cursor.wrapping_add(1);
            id
        };

        self.ready_batch.retain(|id| id != &picked);
        Some(picked)
    }
}
