use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use core::battle::models::BaseStats;
use core::battle::registry::{BattleRegistry, EnemyTemplate};
use core::battle::runtime::BattleRuntime;
use core::battle::skill::library as skills;

/// Shared application state: the registry is built once at startup and
/// never mutated again, mirroring the teacher's pokedex/moves split; the
/// per-battle-id map takes the place of the teacher's
/// `DashMap<String, GameSession>` (10.6).
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BattleRegistry>,
    /// `enemy_party_id` -> ordered list of enemy template ids. A real
    /// deployment would load this alongside enemy packs (10.5); it is
    /// fixed starter content here.
    pub enemy_parties: Arc<HashMap<String, Vec<String>>>,
    pub battles: Arc<DashMap<String, BattleRuntime>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(build_registry()),
            enemy_parties: Arc::new(enemy_parties()),
            battles: Arc::new(DashMap::new()),
        }
    }

    pub fn battle_count(&self) -> usize {
        self.battles.len()
    }
}

fn build_registry() -> BattleRegistry {
    let mut registry = BattleRegistry::new();
    for skill in skills::all() {
        registry.register_skill(skill);
    }
    for template in enemy_templates() {
        registry.register_enemy_template(template);
    }
    registry
}

fn enemy_templates() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate {
            id: "trail_wolf".to_string(),
            name: "Trail Wolf".to_string(),
            hp: 45,
            mp: 0,
            base_stats: BaseStats { atk: 12.0, mag: 0.0, defense: 6.0, mres: 4.0, spd: 11.0, luck: 0.0 },
            skill_ids: vec!["setia_attack_1".to_string()],
            xp_reward: 12,
            gold_reward: 5,
        },
        EnemyTemplate {
            id: "ember_wisp".to_string(),
            name: "Ember Wisp".to_string(),
            hp: 30,
            mp: 20,
            base_stats: BaseStats { atk: 4.0, mag: 17.0, defense: 3.0, mres: 8.0, spd: 9.0, luck: 0.0 },
            skill_ids: vec!["ember_bolt_1".to_string()],
            xp_reward: 18,
            gold_reward: 8,
        },
    ]
}

fn enemy_parties() -> HashMap<String, Vec<String>> {
    let mut parties = HashMap::new();
    parties.insert("forest_trail".to_string(), vec!["trail_wolf".to_string()]);
    parties.insert("ember_pair".to_string(), vec!["trail_wolf".to_string(), "ember_wisp".to_string()]);
    parties
}
