//! Read-time heat decay
//!
//! Stored heat never changes after a node is recorded. Consumers that want
//! older knowledge to rank lower can apply a half-life at read time:
//!
//! `effective = heat * 0.5 ^ (age / half_life)`
//!
//! The result is computed from `(now - created_at)` only and is never written
//! back to the node.

use chrono::{DateTime, Duration, Utc};

use crate::node::{KnowledgeNode, MAX_HEAT};

/// Exponential decay policy applied when ranking
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeatDecay {
    /// Time for heat to halve. `None` disables decay.
    half_life: Option<Duration>,
}

impl HeatDecay {
    /// No decay: effective heat equals stored heat
    pub fn disabled() -> Self {
        Self { half_life: None }
    }

    /// Decay with the given half-life. Non-positive durations disable decay.
    pub fn with_half_life(half_life: Duration) -> Self {
        if half_life <= Duration::zero() {
            return Self::disabled();
        }
        Self {
            half_life: Some(half_life),
        }
    }

    /// Convenience constructor from fractional hours
    pub fn from_hours(hours: f64) -> Self {
        if !hours.is_finite() || hours <= 0.0 {
            return Self::disabled();
        }
        Self::with_half_life(Duration::milliseconds((hours * 3_600_000.0) as i64))
    }

    pub fn is_enabled(&self) -> bool {
        self.half_life.is_some()
    }

    pub fn half_life(&self) -> Option<Duration> {
        self.half_life
    }

    /// Heat of `node` as observed at `now`
    pub fn effective_heat(&self, node: &KnowledgeNode, now: DateTime<Utc>) -> f64 {
        let Some(half_life) = self.half_life else {
            return node.heat;
        };

        // Clock skew can put created_at in the future; treat that as age zero.
        let age = (now - node.created_at).max(Duration::zero());
        let age_ms = age.num_milliseconds() as f64;
        let half_life_ms = half_life.num_milliseconds() as f64;

        let factor = 0.5_f64.powf(age_ms / half_life_ms);
        (node.heat * factor).clamp(0.0, MAX_HEAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Category;

    fn node_aged(hours: i64, heat: f64) -> (KnowledgeNode, DateTime<Utc>) {
        let now = Utc::now();
        let node = KnowledgeNode::builder()
            .category(Category::Insight)
            .content("aged")
            .heat(heat)
            .created_at(now - Duration::hours(hours))
            .build()
            .unwrap();
        (node, now)
    }

    #[test]
    fn test_disabled_returns_stored_heat() {
        let (node, now) = node_aged(1000, 0.6);
        assert_eq!(HeatDecay::disabled().effective_heat(&node, now), 0.6);
        assert!(!HeatDecay::default().is_enabled());
    }

    #[test]
    fn test_one_half_life_halves_heat() {
        let (node, now) = node_aged(24, 1.0);
        let decay = HeatDecay::with_half_life(Duration::hours(24));
        assert!((decay.effective_heat(&node, now) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_two_half_lives_quarter_heat() {
        let (node, now) = node_aged(48, 0.8);
        let decay = HeatDecay::from_hours(24.0);
        assert!((decay.effective_heat(&node, now) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_half_life_accessor() {
        assert_eq!(HeatDecay::from_hours(1.5).half_life(), Some(Duration::minutes(90)));
        assert_eq!(HeatDecay::disabled().half_life(), None);
    }

    #[test]
    fn test_future_created_at_is_not_amplified() {
        let (node, now) = node_aged(-5, 0.9);
        let decay = HeatDecay::from_hours(1.0);
        assert_eq!(decay.effective_heat(&node, now), 0.9);
    }

    #[test]
    fn test_invalid_half_life_disables() {
        assert!(!HeatDecay::from_hours(0.0).is_enabled());
        assert!(!HeatDecay::from_hours(-3.0).is_enabled());
        assert!(!HeatDecay::from_hours(f64::NAN).is_enabled());
        assert!(!HeatDecay::with_half_life(Duration::zero()).is_enabled());
    }

    #[test]
    fn test_decay_does_not_touch_node() {
        let (node, now) = node_aged(10, 1.0);
        let before = node.clone();
        let _ = HeatDecay::from_hours(1.0).effective_heat(&node, now);
        assert_eq!(node, before);
    }
}
