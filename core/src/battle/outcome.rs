use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Battle-local progression buffer (4.10). Never writes to the persistent
/// save ledger itself; the enclosing caller performs the authoritative
/// commit once it receives this alongside `BattleOutcome`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BattleGains {
    pub xp_by_actor: HashMap<String, u64>,
    pub gold: u64,
    pub items_gained: Vec<(String, u32)>,
    pub items_consumed: Vec<(String, u32)>,
    pub defeated_enemies: HashSet<String>,
    pub tags: HashSet<String>,
}

impl BattleGains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_xp(&mut self, actor_id: &str, amount: u64) {
        *self.xp_by_actor.entry(actor_id.to_string()).or_insert(0) += amount;
    }

    pub fn mark_defeated(&mut self, enemy_id: &str) {
        self.defeated_enemies.insert(enemy_id.to_string());
    }

    pub fn consume_items(&mut self, items: &[(String, u32)]) {
        self.items_consumed.extend(items.iter().cloned());
    }
}

/// Built exactly once at `BATTLE_END` (4.10). Handed back to the overworld
/// subsystem; the core never mutates anything beyond this boundary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub victory: bool,
    pub defeat: bool,
    /// Distinguishes a successful flee from victory/defeat: neither
    /// `victory` nor `defeat` can express "the battle ended because the
    /// party escaped" (open question in design notes 9, resolved here).
    pub fled: bool,
    pub xp_log: Vec<String>,
    pub loot_log: Vec<String>,
    pub set_flags: HashSet<String>,
    pub clear_flags: HashSet<String>,
    pub gains: BattleGains,
}

impl BattleOutcome {
    pub fn victory(xp_log: Vec<String>, loot_log: Vec<String>, gains: BattleGains) -> Self {
        Self {
            victory: true,
            defeat: false,
            fled: false,
            xp_log,
            loot_log,
            set_flags: HashSet::new(),
            clear_flags: HashSet::new(),
            gains,
        }
    }

    pub fn defeat(xp_log: Vec<String>, loot_log: Vec<String>, gains: BattleGains) -> Self {
        Self {
            victory: false,
            defeat: true,
            fled: false,
            xp_log,
            loot_log,
            set_flags: HashSet::new(),
            clear_flags: HashSet::new(),
            gains,
        }
    }

    pub fn fled(xp_log: Vec<String>, loot_log: Vec<String>, gains: BattleGains) -> Self {
        Self {
            victory: false,
            defeat: false,
            fled: true,
            xp_log,
            loot_log,
            set_flags: HashSet::new(),
            clear_flags: HashSet::new(),
            gains,
        }
    }
}
