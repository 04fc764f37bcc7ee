//! Turns horizontal scroll-wheel / touchpad deltas into page turns.
//!
//! Vertical-dominant events are ignored so that ordinary scrolling inside a
//! folder or the search results never flips pages.  Horizontal deltas are
//! accumulated until they cross [`ScrollConfig::activation_threshold`]; after
//! a turn, further events are ignored for
//! [`ScrollConfig::debounce_ms`] so that one swipe flips exactly one page.
//!
//! Scrolling content to the left (negative `dx`) reveals the next page.

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Tuning knobs for scroll paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Accumulated horizontal travel needed to turn a page.  Default: `80.0`.
    pub activation_threshold: f64,
    /// Quiet period after a turn (ms).  Default: `800`.
    pub debounce_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            activation_threshold: 80.0,
            debounce_ms: 800,
        }
    }
}

/// Direction of a page turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Next,
    Previous,
}

/// Horizontal-scroll accumulator.
#[derive(Debug)]
pub struct ScrollPager {
    config: ScrollConfig,
    accumulated: f64,
    last_turn: Option<Instant>,
}

impl ScrollPager {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            accumulated: 0.0,
            last_turn: None,
        }
    }

    /// Feed one scroll event.  Returns a page turn once enough horizontal
    /// travel has built up.
    pub fn scroll(&mut self, dx: f64, dy: f64, now: Instant) -> Option<PageTurn> {
        if dx.abs() <= dy.abs() || dx == 0.0 {
            return None;
        }
        if let Some(last) = self.last_turn {
            if now.saturating_duration_since(last) < Duration::from_millis(self.config.debounce_ms) {
                return None;
            }
        }

        self.accumulated += dx;
        let threshold = self.config.activation_threshold;
        let turn = if self.accumulated <= -threshold {
            PageTurn::Next
        } else if self.accumulated >= threshold {
            PageTurn::Previous
        } else {
            return None;
        };
        debug!("scroll turn {:?} after {:.1}", turn, self.accumulated);
        self.accumulated = 0.0;
        self.last_turn = Some(now);
        Some(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager() -> ScrollPager {
        ScrollPager::new(ScrollConfig::default())
    }

    #[test]
    fn default_config_values() {
        let cfg = ScrollConfig::default();
        assert_eq!(cfg.activation_threshold, 80.0);
        assert_eq!(cfg.debounce_ms, 800);
    }

    #[test]
    fn accumulates_until_threshold() {
        let t = Instant::now();
        let mut p = pager();
        assert_eq!(p.scroll(-30.0, 0.0, t), None);
        assert_eq!(p.scroll(-30.0, 0.0, t), None);
        assert_eq!(p.scroll(-30.0, 0.0, t), Some(PageTurn::Next));
    }

    #[test]
    fn positive_travel_turns_back() {
        let mut p = pager();
        assert_eq!(p.scroll(90.0, 10.0, Instant::now()), Some(PageTurn::Previous));
    }

    #[test]
    fn exactly_at_threshold_turns() {
        let mut p = pager();
        assert_eq!(p.scroll(-80.0, 0.0, Instant::now()), Some(PageTurn::Next));
    }

    #[test]
    fn vertical_dominant_events_are_ignored() {
        let mut p = pager();
        let t = Instant::now();
        assert_eq!(p.scroll(-100.0, 150.0, t), None);
        assert_eq!(p.scroll(0.0, 0.0, t), None);
        assert_eq!(p.accumulated, 0.0);
    }

    #[test]
    fn debounce_swallows_follow_up_events() {
        let t0 = Instant::now();
        let mut p = pager();
        assert_eq!(p.scroll(-100.0, 0.0, t0), Some(PageTurn::Next));
        assert_eq!(p.scroll(-100.0, 0.0, t0 + Duration::from_millis(400)), None);
        assert_eq!(p.accumulated, 0.0, "debounced events must not accumulate");
        assert_eq!(
            p.scroll(-100.0, 0.0, t0 + Duration::from_millis(900)),
            Some(PageTurn::Next)
        );
    }

    #[test]
    fn opposing_deltas_cancel_out() {
        let t = Instant::now();
        let mut p = pager();
        assert_eq!(p.scroll(-60.0, 0.0, t), None);
        assert_eq!(p.scroll(50.0, 0.0, t), None);
        assert_eq!(p.scroll(-60.0, 0.0, t), None);
    }

    #[test]
    fn deserialize_partial_config() {
        let cfg: ScrollConfig = serde_json::from_str(r#"{ "debounce_ms": 250 }"#).unwrap();
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.activation_threshold, 80.0);
    }
}
