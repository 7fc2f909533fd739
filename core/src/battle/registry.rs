use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::models::{BaseStats, Element, MenuGroup, TargetType};
use crate::battle::skill::{SkillEffect, StatusFactory};
use crate::error::{BattleError, BattleResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillMeta {
    pub menu_group: MenuGroup,
    pub mp_cost: u32,
    pub element: Element,
    pub target_type: TargetType,
}

/// A skill's data plus its ordered list of effects (4.5). Resolved once by
/// id at command-handling time, never mutated afterward.
#[derive(Debug, Clone)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub meta: SkillMeta,
    pub effects: Vec<SkillEffect>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub hp: u32,
    pub mp: u32,
    pub base_stats: BaseStats,
    pub skill_ids: Vec<String>,
    #[serde(default)]
    pub xp_reward: u64,
    #[serde(default)]
    pub gold_reward: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub target_type: TargetType,
}

/// Holds every skill/enemy/item/item-effect/status-factory registered by
/// enemy packs, keyed by id. First write wins; a pack registering an id a
/// second time is a no-op logged at debug (packs may be loaded more than
/// once defensively).
#[derive(Default)]
pub struct BattleRegistry {
    skills: HashMap<String, SkillDefinition>,
    enemy_templates: HashMap<String, EnemyTemplate>,
    items: HashMap<String, ItemDef>,
    item_effects: HashMap<String, Vec<SkillEffect>>,
    status_factories: HashMap<String, StatusFactory>,
    registered_packs: HashMap<String, ()>,
}

impl BattleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    pub fn enemy_template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemy_templates.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    pub fn item_effects(&self, id: &str) -> Option<&[SkillEffect]> {
        self.item_effects.get(id).map(Vec::as_slice)
    }

    pub fn status_factory(&self, id: &str) -> Option<StatusFactory> {
        self.status_factories.get(id).copied()
    }

    pub fn register_item_effects(&mut self, item_id: impl Into<String>, effects: Vec<SkillEffect>) {
        self.item_effects.entry(item_id.into()).or_insert(effects);
    }

    pub fn register_status_factory(&mut self, status_id: impl Into<String>, factory: StatusFactory) {
        self.status_factories.entry(status_id.into()).or_insert(factory);
    }

    pub fn register_skill(&mut self, skill: SkillDefinition) {
        self.skills.entry(skill.id.clone()).or_insert(skill);
    }

    pub fn register_enemy_template(&mut self, template: EnemyTemplate) {
        self.enemy_templates
            .entry(template.id.clone())
            .or_insert(template);
    }

    pub fn register_item(&mut self, item: ItemDef) {
        self.items.entry(item.id.clone()).or_insert(item);
    }

    /// Registers a pack, enforcing idempotent first-write-wins at the pack
    /// level (10.5): the same `pack_id` registering twice is an error, not a
    /// silent no-op, since a pack bundles multiple ids and a partial
    /// re-registration would be ambiguous.
    pub fn register_pack(&mut self, pack: &dyn EnemyPack) -> BattleResult<()> {
        let pack_id = pack.pack_id().to_string();
        if self.registered_packs.contains_key(&pack_id) {
            return Err(BattleError::DuplicateEnemyPack { pack_id });
        }
        pack.register(self)?;
        self.registered_packs.insert(pack_id, ());
        debug!(pack_id = %pack.pack_id(), "enemy pack registered");
        Ok(())
    }
}

/// Entry point every enemy pack implements to populate the shared registry
/// (10.5). `pack_id` must be unique across every pack loaded into one
/// registry; `register` is expected to be total (no partial writes on
/// error) since the caller only records success after it returns `Ok`.
pub trait EnemyPack {
    fn pack_id(&self) -> &str;
    fn register(&self, registry: &mut BattleRegistry) -> BattleResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyPack;
    impl EnemyPack for EmptyPack {
        fn pack_id(&self) -> &str {
            "empty"
        }
        fn register(&self, _registry: &mut BattleRegistry) -> BattleResult<()> {
            Ok(())
        }
    }

    #[test]
    fn registering_same_pack_twice_errors() {
        let mut registry = BattleRegistry::new();
        registry.register_pack(&EmptyPack).unwrap();
        let err = registry.register_pack(&EmptyPack).unwrap_err();
        matches!(err, BattleError::DuplicateEnemyPack { .. });
    }

    #[test]
    fn registering_same_skill_twice_keeps_first() {
        let mut registry = BattleRegistry::new();
        registry.register_skill(SkillDefinition {
            id: "ember_bolt_1".to_string(),
            name: "Ember Bolt".to_string(),
            meta: SkillMeta {
                menu_group: MenuGroup::Attack,
                mp_cost: 4,
                element: Element::Fire,
                target_type: TargetType::SingleEnemy,
            },
            effects: Vec::new(),
        });
        registry.register_skill(SkillDefinition {
            id: "ember_bolt_1".to_string(),
            name: "Overwritten".to_string(),
            meta: SkillMeta {
                menu_group: MenuGroup::Attack,
                mp_cost: 99,
                element: Element::Fire,
                target_type: TargetType::SingleEnemy,
            },
            effects: Vec::new(),
        });
        assert_eq!(registry.skill("ember_bolt_1").unwrap().name, "Ember Bolt");
    }
}
