use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info_span;

use crate::battle::command::BattleCommand;
use crate::battle::mapper::ActionMapper;
use crate::battle::models::{BattleRequest, CharacterInstance, Combatant, Side};
use crate::battle::outcome::BattleOutcome;
use crate::battle::registry::BattleRegistry;
use crate::battle::router::Router;
use crate::battle::session::{BattleFlags, Session};
use crate::battle::timeline::Timeline;
use crate::config::BattleConfig;

/// Everything one running battle needs, bundled for the HTTP shell's
/// per-battle-id map (10.6). One `tick`/`on_player_command` at a time.
pub struct BattleRuntime {
    pub session: Session,
    pub timeline: Timeline,
    pub mapper: ActionMapper,
    pub router: Router,
    pub config: BattleConfig,
    pub rng: StdRng,
}

impl BattleRuntime {
    /// Boots a battle from a request plus the enemy roster it names,
    /// matching the "single source of truth" deterministic seeding rule
    /// (8: determinism).
    pub fn new(request: &BattleRequest, enemies: Vec<(&Combatant, Vec<String>)>, registry: &BattleRegistry) -> Self {
        let config = BattleConfig::default();
        let party: Vec<Combatant> = request
            .party
            .iter()
            .cloned()
            .map(|character: CharacterInstance| character.into())
            .collect();

        let enemy_combatants: Vec<Combatant> = enemies.iter().map(|(template, _)| clone_enemy(template)).collect();

        let mut timeline = Timeline::new(&config);
        for combatant in party.iter().chain(enemy_combatants.iter()) {
            timeline.add(combatant.id.clone(), combatant.base_stats.spd);
        }

        let mut enemy_skills = HashMap::new();
        for (template, skill_ids) in &enemies {
            enemy_skills.insert(template.id.clone(), skill_ids.clone());
        }

        let _ = registry;
        Self {
            session: Session::new(party, enemy_combatants, BattleFlags::default()),
            timeline,
            mapper: ActionMapper::new(enemy_skills),
            router: Router::new(),
            config,
            rng: StdRng::seed_from_u64(request.seed),
        }
    }

    /// Advances the battle by one host tick, opening a per-battle tracing
    /// span the way the teacher opens per-request spans (10.2, 9's
    /// "global mutable debug state" note).
    pub fn tick(&mut self, battle_id: &str, registry: &BattleRegistry, dt: f32) -> Option<&BattleOutcome> {
        let span = info_span!("battle", battle_id = %battle_id);
        let _guard = span.enter();
        self.mapper.update(
            dt,
            &mut self.session,
            &mut self.timeline,
            registry,
            &self.router,
            &self.config,
            &mut self.rng,
        );
        self.mapper.outcome()
    }

    pub fn on_player_command(&mut self, command: BattleCommand) {
        self.mapper.on_player_command(command);
    }

    pub fn is_finished(&self) -> bool {
        self.mapper.is_finished()
    }
}

fn clone_enemy(template: &Combatant) -> Combatant {
    let mut combatant = Combatant::new(
        template.id.clone(),
        template.name.clone(),
        Side::Enemy,
        template.hp,
        template.mp,
        template.base_stats.clone(),
    );
    combatant.max_hp = template.max_hp;
    combatant.max_mp = template.max_mp;
    combatant
}
