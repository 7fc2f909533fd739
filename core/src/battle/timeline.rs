use std::collections::HashMap;

use crate::config::BattleConfig;

/// Batch of combatant ids that reached readiness on the same `update` call.
/// Iteration order is the stable add-order, per 4.1's tie-breaking rule.
pub type ReadyBatch = Vec<String>;

struct Gauge {
    value: f32,
    speed: f32,
}

/// Charge-time scheduler: each living combatant accrues a per-tick gauge at
/// a rate proportional to its speed; those reaching the threshold form a
/// ready batch. The mapper owns everything downstream of readiness; the
/// timeline itself never looks at phases or statuses.
pub struct Timeline {
    order: Vec<String>,
    gauges: HashMap<String, Gauge>,
    paused: bool,
    threshold: f32,
    base_rate: f32,
    reference_speed: f32,
}

impl Timeline {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            order: Vec::new(),
            gauges: HashMap::new(),
            paused: false,
            threshold: config.ctb_threshold,
            base_rate: config.ctb_base_rate,
            reference_speed: config.ctb_reference_speed.max(1.0),
        }
    }

    pub fn add(&mut self, id: impl Into<String>, speed: f32) {
        let id = id.into();
        if !self.gauges.contains_key(&id) {
            self.order.push(id.clone());
            self.gauges.insert(id, Gauge { value: 0.0, speed });
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.gauges.remove(id);
        self.order.retain(|existing| existing != id);
    }

    pub fn reset_gauge(&mut self, id: &str) {
        if let Some(gauge) = self.gauges.get_mut(id) {
            gauge.value = 0.0;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ratio(&self, id: &str) -> f32 {
        self.gauges
            .get(id)
            .map(|gauge| (gauge.value / self.threshold).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    pub fn commit_threshold(&self) -> f32 {
        self.threshold
    }

    /// Advance every non-KO'd combatant's gauge by `dt`, returning those that
    /// reached the threshold this call (or `None` if none did).
    ///
    /// `is_ko` is supplied by the caller (the session owns liveness) so the
    /// timeline never needs a reference to combatant state.
    pub fn update(&mut self, dt: f32, is_ko: impl Fn(&str) -> bool) -> Option<ReadyBatch> {
        if self.paused {
            return None;
        }
        let mut ready = Vec::new();
        for id in &self.order {
            if is_ko(id) {
                continue;
            }
            let Some(gauge) = self.gauges.get_mut(id) else { continue };
            if gauge.value >= self.threshold {
                continue;
            }
            let rate = self.base_rate * (gauge.speed / self.reference_speed);
            gauge.value = (gauge.value + rate * dt).min(self.threshold);
            if gauge.value >= self.threshold {
                ready.push(id.clone());
            }
        }
        if ready.is_empty() {
            None
        } else {
            Some(ready)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_threshold_at_reference_speed() {
        let config = BattleConfig::default();
        let ticks = (config.ctb_threshold / config.ctb_base_rate).ceil() as u32;
        let mut timeline = Timeline::new(&config);
        timeline.add("a", config.ctb_reference_speed);
        let mut last = None;
        for _ in 0..ticks {
            last = timeline.update(1.0, |_| false);
        }
        assert_eq!(last, Some(vec!["a".to_string()]));
    }

    #[test]
    fn ko_combatants_never_ready() {
        let config = BattleConfig::default();
        let mut timeline = Timeline::new(&config);
        timeline.add("a", 999.0);
        let ready = timeline.update(1000.0, |_| true);
        assert_eq!(ready, None);
    }

    #[test]
    fn paused_timeline_does_not_advance() {
        let config = BattleConfig::default();
        let mut timeline = Timeline::new(&config);
        timeline.add("a", config.ctb_reference_speed);
        timeline.pause();
        assert_eq!(timeline.update(1000.0, |_| false), None);
        assert_eq!(timeline.ratio("a"), 0.0);
    }

    #[test]
    fn unknown_id_operations_are_no_ops() {
        let config = BattleConfig::default();
        let mut timeline = Timeline::new(&config);
        timeline.reset_gauge("ghost");
        timeline.remove("ghost");
        assert_eq!(timeline.ratio("ghost"), 0.0);
    }

    #[test]
    fn gauge_bounds_stay_within_threshold() {
        let config = BattleConfig::default();
        let mut timeline = Timeline::new(&config);
        timeline.add("a", config.ctb_reference_speed * 50.0);
        timeline.update(1000.0, |_| false);
        assert!(timeline.ratio("a") <= 1.0);
    }
}
