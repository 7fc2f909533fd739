use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Skill,
    Item,
    Defend,
    Flee,
    EquipWeapon,
    Wait,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandSource {
    Player,
    Ai,
}

/// A neutral description of a player or AI intent. `BattleCommand`s live for
/// exactly one phase: deposited in PLAYER_COMMAND/ENEMY_COMMAND, consumed in
/// RESOLVE_ACTION.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleCommand {
    pub actor_id: String,
    pub command_type: CommandType,
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item_qty: Option<u32>,
    #[serde(default)]
    pub targets: Vec<String>,
    pub source: CommandSource,
    #[serde(default)]
    pub reason: Option<String>,
}

impl BattleCommand {
    pub fn skill(actor_id: impl Into<String>, skill_id: impl Into<String>, targets: Vec<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            command_type: CommandType::Skill,
            skill_id: Some(skill_id.into()),
            item_id: None,
            item_qty: None,
            targets,
            source: CommandSource::Player,
            reason: None,
        }
    }

    pub fn defend(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            command_type: CommandType::Defend,
            skill_id: None,
            item_id: None,
            item_qty: None,
            targets: Vec::new(),
            source: CommandSource::Player,
            reason: None,
        }
    }

    pub fn flee(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            command_type: CommandType::Flee,
            skill_id: None,
            item_id: None,
            item_qty: None,
            targets: Vec::new(),
            source: CommandSource::Player,
            reason: None,
        }
    }
}
