//! Concrete skill definitions used by the scenario suite and the default
//! enemy pack. A real content pack would load these from data; a handful
//! of hardcoded definitions is enough to ground the resolver end to end.

use crate::battle::models::{DamageType, Element, MenuGroup, StatKind, TargetType};
use crate::battle::registry::{SkillDefinition, SkillMeta};
use crate::battle::status::library::{burn, flow, ice_shield};

use super::damage::Scaling;
use super::effects::SkillEffect;

pub fn setia_attack_1() -> SkillDefinition {
    SkillDefinition {
        id: "setia_attack_1".to_string(),
        name: "Strike".to_string(),
        meta: SkillMeta {
            menu_group: MenuGroup::Attack,
            mp_cost: 0,
            element: Element::Physical,
            target_type: TargetType::SingleEnemy,
        },
        effects: vec![SkillEffect::Damage {
            scaling: Scaling::Atk { coeff: 1.0, flat: 0.0 },
            damage_type: DamageType::Physical,
            element: Element::Physical,
        }],
    }
}

/// Two additive components (physical + magical) plus a self-buff, per the
/// multi-component scenario.
pub fn setia_wind_strike_1() -> SkillDefinition {
    SkillDefinition {
        id: "setia_wind_strike_1".to_string(),
        name: "Wind Strike".to_string(),
        meta: SkillMeta {
            menu_group: MenuGroup::Attack,
            mp_cost: 40,
            element: Element::Wind,
            target_type: TargetType::SingleEnemy,
        },
        effects: vec![
            SkillEffect::Damage {
                scaling: Scaling::Atk { coeff: 0.33, flat: 16.0 },
                damage_type: DamageType::Physical,
                element: Element::Wind,
            },
            SkillEffect::Damage {
                scaling: Scaling::Mag { coeff: 0.22, flat: 16.0 },
                damage_type: DamageType::Magic,
                element: Element::Wind,
            },
            SkillEffect::ApplyStatusAlways {
                status: |_user| flow(),
                self_apply: true,
            },
        ],
    }
}

/// Magic damage plus a 25% chance to apply Burn, only after landing a hit.
pub fn ember_bolt_1() -> SkillDefinition {
    SkillDefinition {
        id: "ember_bolt_1".to_string(),
        name: "Ember Bolt".to_string(),
        meta: SkillMeta {
            menu_group: MenuGroup::Attack,
            mp_cost: 6,
            element: Element::Fire,
            target_type: TargetType::SingleEnemy,
        },
        effects: vec![
            SkillEffect::Damage {
                scaling: Scaling::Mag { coeff: 0.85, flat: 0.0 },
                damage_type: DamageType::Magic,
                element: Element::Fire,
            },
            SkillEffect::ChanceStatusOnHit {
                status: |user| burn(user.effective_stat(StatKind::Mag)),
                chance: 0.25,
            },
        ],
    }
}

/// Pure support skill: applies Chill Ward to the target ally.
pub fn nyra_ice_shield_1() -> SkillDefinition {
    SkillDefinition {
        id: "nyra_ice_shield_1".to_string(),
        name: "Chill Ward".to_string(),
        meta: SkillMeta {
            menu_group: MenuGroup::Support,
            mp_cost: 12,
            element: Element::Ice,
            target_type: TargetType::SingleAlly,
        },
        effects: vec![SkillEffect::ApplyStatusAlways {
            status: |_user| ice_shield(),
            self_apply: false,
        }],
    }
}

/// All skills the core ships with. An enemy pack's `register` calls this
/// (or a subset) to populate a `BattleRegistry`.
pub fn all() -> Vec<SkillDefinition> {
    vec![
        setia_attack_1(),
        setia_wind_strike_1(),
        ember_bolt_1(),
        nyra_ice_shield_1(),
    ]
}
