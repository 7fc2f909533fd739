use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::error;

/// Outbound topics the router publishes to (6). Closed set: FX/UI
/// subscribers match on this instead of parsing a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Hit,
    Heal,
    StatusApply,
    StatusTick,
    StatusExpire,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HitPayload {
    pub actor: String,
    pub target: String,
    pub skill: Option<String>,
    pub damage: f32,
    pub element: Option<String>,
    pub is_enemy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealPayload {
    pub actor: String,
    pub target: String,
    pub skill: Option<String>,
    pub heal: f32,
    pub element: Option<String>,
    pub is_enemy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusApplyPayload {
    pub owner: String,
    pub status: String,
    pub kind: String,
    pub element: Option<String>,
    pub is_enemy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusTickPayload {
    pub owner: String,
    pub status: String,
    pub amount: f32,
    pub tick_kind: String,
    pub kind: String,
    pub element: Option<String>,
    pub is_enemy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusExpirePayload {
    pub owner: String,
    pub status: String,
    pub is_enemy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BattleEvent {
    Hit(HitPayload),
    Heal(HealPayload),
    StatusApply(StatusApplyPayload),
    StatusTick(StatusTickPayload),
    StatusExpire(StatusExpirePayload),
}

impl BattleEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BattleEvent::Hit(_) => Topic::Hit,
            BattleEvent::Heal(_) => Topic::Heal,
            BattleEvent::StatusApply(_) => Topic::StatusApply,
            BattleEvent::StatusTick(_) => Topic::StatusTick,
            BattleEvent::StatusExpire(_) => Topic::StatusExpire,
        }
    }
}

type Subscriber = Box<dyn Fn(&BattleEvent) -> Result<(), String> + Send + Sync>;

/// A synchronous pub/sub event bus (6). Subscribers run inline on publish;
/// a subscriber error is caught and logged, never interrupting the
/// mechanical pipeline (7).
#[derive(Default)]
pub struct Router {
    subscribers: HashMap<Topic, Vec<Subscriber>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, topic: Topic, handler: Subscriber) {
        self.subscribers.entry(topic).or_default().push(handler);
    }

    pub fn publish(&self, event: BattleEvent) {
        let Some(handlers) = self.subscribers.get(&event.topic()) else {
            return;
        };
        for handler in handlers {
            if let Err(message) = handler(&event) {
                error!(topic = ?event.topic(), error = %message, "battle event subscriber failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn publish_reaches_subscribers_on_its_topic_only() {
        let mut router = Router::new();
        let hit_count = Arc::new(AtomicUsize::new(0));
        let heal_count = Arc::new(AtomicUsize::new(0));

        let hit_clone = hit_count.clone();
        router.subscribe(
            Topic::Hit,
            Box::new(move |_event| {
                hit_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );
        let heal_clone = heal_count.clone();
        router.subscribe(
            Topic::Heal,
            Box::new(move |_event| {
                heal_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        router.publish(BattleEvent::Hit(HitPayload {
            actor: "setia".to_string(),
            target: "wolf".to_string(),
            skill: Some("setia_attack_1".to_string()),
            damage: 12.0,
            element: None,
            is_enemy: true,
        }));

        assert_eq!(hit_count.load(Ordering::SeqCst), 1);
        assert_eq!(heal_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn a_failing_subscriber_does_not_stop_the_next_one() {
        let mut router = Router::new();
        let second_ran = Arc::new(AtomicUsize::new(0));

        router.subscribe(Topic::Hit, Box::new(|_event| Err("boom".to_string())));
        let second_clone = second_ran.clone();
        router.subscribe(
            Topic::Hit,
            Box::new(move |_event| {
                second_clone.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        router.publish(BattleEvent::Hit(HitPayload {
            actor: "setia".to_string(),
            target: "wolf".to_string(),
            skill: None,
            damage: 1.0,
            element: None,
            is_enemy: true,
        }));

        assert_eq!(second_ran.load(Ordering::SeqCst), 1);
    }
}
