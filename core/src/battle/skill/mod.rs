//! Skill resolution: the shared damage model, effect pipeline, pure
//! resolver, and the concrete skill library (4.4, 4.5).

pub mod damage;
pub mod effects;
pub mod library;
pub mod resolver;

pub use damage::{compute_base_damage, dot_landing_chance, resolve_damage, Scaling};
pub use effects::{SkillEffect, SkillResolutionResult, StatusFactory, TargetChange};
pub use resolver::ActionResolver;
