//! Single-shot delay timer driving the automatic scene switch
//!
//! The timer is a plain state machine. It never sleeps on its own; the engine
//! waits until [`SwitchTimer::deadline`] and then calls [`SwitchTimer::expire`].
//! Every scene or streaming notification goes through [`SwitchTimer::evaluate`],
//! which rebuilds the state from the current truth instead of patching a
//! decision taken earlier.

use tokio::time::Instant;
use tracing::debug;

use super::rule::SwitchRule;

/// Timer state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    /// Countdown running since `scene` became active
    Armed { deadline: Instant, scene: String },
}

/// At most one pending switch at any time
#[derive(Debug, Default)]
pub struct SwitchTimer {
    state: TimerState,
}

impl SwitchTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    /// Pending deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            TimerState::Armed { deadline, .. } => Some(*deadline),
            TimerState::Idle => None,
        }
    }

    /// Re-evaluate against the current scene and streaming state.
    ///
    /// A repeated evaluation while already armed for the same scene keeps the
    /// running deadline rather than restarting the countdown.
    pub fn evaluate(&mut self, current_scene: &str, is_streaming: bool, rule: &SwitchRule, now: Instant) {
        if !is_streaming || !rule.matches_from(current_scene) {
            self.cancel();
            return;
        }

        if let TimerState::Armed { scene, .. } = &self.state {
            if scene == current_scene {
                // Same activation, keep the running countdown
                return;
            }
        }

        let deadline = now + rule.delay();
        debug!(
            "Arming scene switch: {:?} -> {:?} in {}s",
            rule.from_scene, rule.to_scene, rule.delay_seconds
        );
        self.state = TimerState::Armed {
            deadline,
            scene: current_scene.to_string(),
        };
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns `true` exactly once per arming; the timer is idle afterwards.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.state = TimerState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Stop any pending countdown. Idempotent.
    pub fn cancel(&mut self) {
        if self.is_armed() {
            debug!("Scene switch timer cancelled");
        }
        self.state = TimerState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn rule(delay: u32) -> SwitchRule {
        SwitchRule::new(delay, "Intro", "Main")
    }

    #[test]
    fn test_arms_on_from_scene_while_streaming() {
        let now = Instant::now();
        let mut timer = SwitchTimer::new();

        timer.evaluate("Intro", true, &rule(5), now);

        assert_eq!(timer.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_stays_idle_when_not_streaming() {
        let mut timer = SwitchTimer::new();
        timer.evaluate("Intro", false, &rule(5), Instant::now());
        assert_eq!(timer.state(), &TimerState::Idle);
    }

    #[test]
    fn test_other_scene_cancels() {
        let now = Instant::now();
        let mut timer = SwitchTimer::new();
        timer.evaluate("Intro", true, &rule(5), now);
        timer.evaluate("Main", true, &rule(5), now);
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_streaming_stop_cancels() {
        let now = Instant::now();
        let mut timer = SwitchTimer::new();
        timer.evaluate("Intro", true, &rule(5), now);
        timer.evaluate("Intro", false, &rule(5), now + Duration::from_secs(3));

        assert!(!timer.expire(now + Duration::from_secs(5)));
        assert!(!timer.expire(now + Duration::from_secs(60)));
    }

    #[test]
    fn test_repeated_evaluation_keeps_deadline() {
        let now = Instant::now();
        let mut timer = SwitchTimer::new();
        timer.evaluate("Intro", true, &rule(5), now);
        timer.evaluate("Intro", true, &rule(5), now + Duration::from_secs(2));
        assert_eq!(timer.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_expires_exactly_once() {
        for delay in [0, 1, 5, 3600] {
            let now = Instant::now();
            let mut timer = SwitchTimer::new();
            timer.evaluate("Intro", true, &rule(delay), now);

            let at = now + Duration::from_secs(u64::from(delay));
            if delay > 0 {
                assert!(!timer.expire(at - Duration::from_millis(1)));
            }
            assert!(timer.expire(at));
            assert!(!timer.expire(at));
            assert_eq!(timer.state(), &TimerState::Idle);
        }
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = SwitchTimer::new();
        timer.cancel();
        timer.cancel();
        assert_eq!(timer.state(), &TimerState::Idle);
    }
}
