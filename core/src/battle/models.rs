use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::status::manager::StatusManager;

/// Which roster a combatant belongs to. Replaces the source's heuristic
/// `combatant in enemies` membership test with an explicit field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Party,
    Enemy,
}

impl Side {
    pub fn is_enemy(self) -> bool {
        matches!(self, Side::Enemy)
    }
}

/// Elemental affinity of a skill, status, or weapon.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Physical,
    Fire,
    Ice,
    Wind,
    Earth,
    Light,
    Shadow,
    Neutral,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageType {
    Physical,
    Magic,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    SingleEnemy,
    AllEnemies,
    SingleAlly,
    AllAllies,
    SelfOnly,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuGroup {
    Attack,
    Support,
    Special,
}

/// Base stat block. `luck` is optional in the data model; `0` is used as
/// "not rolled" rather than threading an `Option` through every formula.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BaseStats {
    pub atk: f32,
    pub mag: f32,
    pub defense: f32,
    pub mres: f32,
    pub spd: f32,
    pub luck: f32,
}

impl BaseStats {
    pub fn get(&self, stat: StatKind) -> f32 {
        match stat {
            StatKind::Atk => self.atk,
            StatKind::Mag => self.mag,
            StatKind::Def => self.defense,
            StatKind::Mres => self.mres,
            StatKind::Spd => self.spd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Atk,
    Mag,
    Def,
    Mres,
    Spd,
}

/// Aggregate multiplier/additive pair a `StatusManager` computes once per
/// effective-stat lookup. Initialized to the identity (mult=1.0, add=0.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatModifier {
    pub mult: f32,
    pub add: f32,
}

impl Default for StatModifier {
    fn default() -> Self {
        Self { mult: 1.0, add: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatModifierSet {
    pub atk: StatModifier,
    pub mag: StatModifier,
    pub def: StatModifier,
    pub mres: StatModifier,
    pub spd: StatModifier,
}

impl StatModifierSet {
    pub fn get(&self, stat: StatKind) -> StatModifier {
        match stat {
            StatKind::Atk => self.atk,
            StatKind::Mag => self.mag,
            StatKind::Def => self.def,
            StatKind::Mres => self.mres,
            StatKind::Spd => self.spd,
        }
    }

    pub fn get_mut(&mut self, stat: StatKind) -> &mut StatModifier {
        match stat {
            StatKind::Atk => &mut self.atk,
            StatKind::Mag => &mut self.mag,
            StatKind::Def => &mut self.def,
            StatKind::Mres => &mut self.mres,
            StatKind::Spd => &mut self.spd,
        }
    }
}

/// A participant in battle: party member or enemy.
///
/// `id` is assigned once at construction and is the only thing callers may
/// use to address the combatant afterward (invariant 4: id stability).
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub base_stats: BaseStats,
    pub tags: HashSet<String>,
    pub statuses: StatusManager,
}

impl Combatant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, side: Side, hp: u32, mp: u32, base_stats: BaseStats) -> Self {
        let id = id.into();
        Self {
            name: name.into(),
            side,
            hp,
            max_hp: hp,
            mp,
            max_mp: mp,
            base_stats,
            tags: HashSet::new(),
            statuses: StatusManager::new(id.clone()),
            id,
        }
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    /// Effective stat: base * mult + add, per invariant-adjacent definition
    /// in the damage model (4.4).
    pub fn effective_stat(&self, stat: StatKind) -> f32 {
        let base = self.base_stats.get(stat);
        let modifier = self.statuses.stat_modifiers().get(stat);
        base * modifier.mult + modifier.add
    }

    pub fn set_hp(&mut self, new_hp: u32) {
        self.hp = new_hp.min(self.max_hp);
    }

    pub fn set_mp(&mut self, new_mp: u32) {
        self.mp = new_mp.min(self.max_mp);
    }
}

/// A roster snapshot handed in with a `BattleRequest`: enough to construct
/// a `Combatant` without the enclosing system knowing battle-core internals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterInstance {
    pub id: String,
    pub name: String,
    pub level: u8,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub stats: CharacterStats,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterStats {
    pub atk: f32,
    pub mag: f32,
    pub defense: f32,
    pub mres: f32,
    pub spd: f32,
    #[serde(default)]
    pub luck: f32,
}

impl From<CharacterStats> for BaseStats {
    fn from(s: CharacterStats) -> Self {
        BaseStats {
            atk: s.atk,
            mag: s.mag,
            defense: s.defense,
            mres: s.mres,
            spd: s.spd,
            luck: s.luck,
        }
    }
}

impl From<CharacterInstance> for Combatant {
    fn from(c: CharacterInstance) -> Self {
        let mut combatant = Combatant::new(c.id, c.name, Side::Party, c.hp, c.mp, c.stats.into());
        combatant.max_hp = c.max_hp;
        combatant.max_mp = c.max_mp;
        combatant
    }
}

/// Request from the enclosing overworld/exploration subsystem to boot a
/// battle. Out of scope collaborators only ever see this and `BattleOutcome`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleRequest {
    pub region_id: String,
    pub encounter_id: String,
    pub enemy_party_id: String,
    pub seed: u64,
    #[serde(default)]
    pub backdrop_id: Option<String>,
    pub party: Vec<CharacterInstance>,
}
