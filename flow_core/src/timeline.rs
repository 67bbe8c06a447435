// Timeline controller: the one piece of mutable state in the engine.
// Both ends saturate. Arbitrary jumps are checked, single steps are clamped.
// See DESIGN.md: Timeline Controller

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};

/// Navigation intent reported by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "step", rename_all = "snake_case")]
pub enum NavigationEvent {
    Next,
    Previous,
    GoTo(usize),
}

impl NavigationEvent {
    /// Map a `KeyboardEvent.key` value to an intent. Unbound keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" => Some(NavigationEvent::Next),
            "ArrowLeft" => Some(NavigationEvent::Previous),
            _ => None,
        }
    }
}

/// Current step over a timeline of `total` scenes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    current: usize,
    total: usize,
}

impl Timeline {
    /// Start at step 0. `total` must be at least 1.
    pub fn new(total: usize) -> FlowResult<Self> {
        if total == 0 {
            return Err(FlowError::EmptyTimeline);
        }
        Ok(Timeline { current: 0, total })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.total
    }

    /// Move one step forward. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        let next = (self.current + 1).min(self.total - 1);
        self.set(next)
    }

    /// Move one step back. Returns whether the step changed.
    pub fn retreat(&mut self) -> bool {
        let prev = self.current.saturating_sub(1);
        self.set(prev)
    }

    /// Jump straight to `step`. Out-of-range targets leave the step untouched.
    pub fn jump_to(&mut self, step: usize) -> FlowResult<bool> {
        if step >= self.total {
            tracing::warn!(step, total = self.total, "rejected jump outside timeline");
            return Err(FlowError::OutOfRangeStep {
                step,
                total: self.total,
            });
        }
        Ok(self.set(step))
    }

    /// Apply a navigation intent. Returns whether the step changed.
    pub fn apply(&mut self, event: NavigationEvent) -> FlowResult<bool> {
        match event {
            NavigationEvent::Next => Ok(self.advance()),
            NavigationEvent::Previous => Ok(self.retreat()),
            NavigationEvent::GoTo(step) => self.jump_to(step),
        }
    }

    fn set(&mut self, step: usize) -> bool {
        if step == self.current {
            return false;
        }
        tracing::trace!(from = self.current, to = step, "timeline step changed");
        self.current = step;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_zero() {
        let timeline = Timeline::new(8).unwrap();
        assert_eq!(timeline.current(), 0);
        assert!(timeline.is_first());
        assert!(!timeline.is_last());
    }

    #[test]
    fn empty_timeline_is_rejected() {
        assert!(matches!(Timeline::new(0), Err(FlowError::EmptyTimeline)));
    }

    #[test]
    fn retreat_saturates_at_zero() {
        let mut timeline = Timeline::new(3).unwrap();
        assert!(!timeline.retreat());
        assert_eq!(timeline.current(), 0);
    }

    #[test]
    fn advance_saturates_at_last() {
        let mut timeline = Timeline::new(3).unwrap();
        assert!(timeline.advance());
        assert!(timeline.advance());
        assert!(!timeline.advance());
        assert_eq!(timeline.current(), 2);
        assert!(timeline.is_last());
    }

    #[test]
    fn single_scene_never_moves() {
        let mut timeline = Timeline::new(1).unwrap();
        assert!(timeline.is_first() && timeline.is_last());
        assert!(!timeline.advance());
        assert!(!timeline.retreat());
        assert_eq!(timeline.current(), 0);
    }

    #[test]
    fn rejected_jump_keeps_step() {
        let mut timeline = Timeline::new(8).unwrap();
        timeline.jump_to(5).unwrap();
        let err = timeline.jump_to(8).unwrap_err();
        assert!(matches!(err, FlowError::OutOfRangeStep { step: 8, total: 8 }));
        assert_eq!(timeline.current(), 5);
    }

    #[test]
    fn jump_to_current_reports_no_change() {
        let mut timeline = Timeline::new(4).unwrap();
        assert!(!timeline.jump_to(0).unwrap());
        assert!(timeline.jump_to(3).unwrap());
    }

    #[test]
    fn arrow_keys_map_to_events() {
        assert_eq!(NavigationEvent::from_key("ArrowRight"), Some(NavigationEvent::Next));
        assert_eq!(NavigationEvent::from_key("ArrowLeft"), Some(NavigationEvent::Previous));
        assert_eq!(NavigationEvent::from_key("Enter"), None);
    }

    #[test]
    fn events_deserialize_from_surface_json() {
        let event: NavigationEvent = serde_json::from_str(r#"{"type":"go_to","step":4}"#).unwrap();
        assert_eq!(event, NavigationEvent::GoTo(4));
        let event: NavigationEvent = serde_json::from_str(r#"{"type":"next"}"#).unwrap();
        assert_eq!(event, NavigationEvent::Next);
    }

    mod property_tests {
        use super::*;

        fn event_strategy(total: usize) -> impl Strategy<Value = NavigationEvent> {
            prop_oneof![
                Just(NavigationEvent::Next),
                Just(NavigationEvent::Previous),
                (0..total * 2).prop_map(NavigationEvent::GoTo),
            ]
        }

        proptest! {
            #[test]
            fn step_stays_in_range(
                (total, events) in (1usize..12).prop_flat_map(|total| {
                    (Just(total), prop::collection::vec(event_strategy(total), 0..40))
                })
            ) {
                let mut timeline = Timeline::new(total).unwrap();
                for event in events {
                    let _ = timeline.apply(event);
                    prop_assert!(timeline.current() < total);
                }
            }

            #[test]
            fn jump_lands_exactly(total in 1usize..20, start in 0usize..20, target in 0usize..20) {
                let mut timeline = Timeline::new(total).unwrap();
                let _ = timeline.jump_to(start % total);
                let before = timeline.current();
                match timeline.jump_to(target) {
                    Ok(_) => prop_assert_eq!(timeline.current(), target),
                    Err(_) => {
                        prop_assert!(target >= total);
                        prop_assert_eq!(timeline.current(), before);
                    }
                }
            }

            #[test]
            fn single_steps_move_by_at_most_one(total in 1usize..12, start in 0usize..12, forward: bool) {
                let mut timeline = Timeline::new(total).unwrap();
                let _ = timeline.jump_to(start % total);
                let before = timeline.current();
                if forward { timeline.advance(); } else { timeline.retreat(); }
                let delta = timeline.current().abs_diff(before);
                prop_assert!(delta <= 1);
            }
        }
    }
}
