//! Status effect stack: stat modifiers, damage-over-time, shields,
//! retaliations, and buff/debuff lifecycles (4.7, 4.8).

pub mod effect;
pub mod events;
pub mod library;
pub mod manager;

pub use effect::{IncomingDamageAdjustment, StatusBehavior, StatusHookContext, StatusInstance};
pub use events::{build_action_result_from_status_events, StatusEvent};
pub use manager::StatusManager;
