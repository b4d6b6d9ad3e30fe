use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use web_time::{SystemTime, UNIX_EPOCH};

/// Sweep angles wrap at this many degrees.
pub const SWEEP_DEGREES: i64 = 90;

/// Wall-clock source in milliseconds.
pub trait Clock {
    fn now_millis(&self) -> i64;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis().min(i64::MAX as u128) as i64)
            .unwrap_or(0)
    }
}

/// Clock advanced by hand; clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_millis: i64) {
        self.millis.fetch_add(delta_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Active { reference_millis: i64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PhaseTransition {
    Activated,
    Deactivated,
}

/// Two-state sweep clock for the instruction arrows.
///
/// Idle -> Active on the first update that sees the governing mode active;
/// the reference time is captured then. Active -> Idle on the first update
/// that sees it inactive; nothing carries over to the next activation.
///
/// While Idle the angle free-runs from the time the clock was created, which
/// only the calibration test arrow observes.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    phase: AnimationPhase,
    created_millis: i64,
}

impl AnimationClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            phase: AnimationPhase::Idle,
            created_millis: now_millis,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, AnimationPhase::Active { .. })
    }

    pub fn update(&mut self, governing_mode_active: bool, now_millis: i64) -> Option<PhaseTransition> {
        match (self.phase, governing_mode_active) {
            (AnimationPhase::Idle, true) => {
                self.phase = AnimationPhase::Active {
                    reference_millis: now_millis,
                };
                log::debug!("arrow animation started at {now_millis} ms");
                Some(PhaseTransition::Activated)
            }
            (AnimationPhase::Active { .. }, false) => {
                self.phase = AnimationPhase::Idle;
                log::debug!("arrow animation stopped at {now_millis} ms");
                Some(PhaseTransition::Deactivated)
            }
            _ => None,
        }
    }

    /// `((now - reference) / rate_divisor) mod 90`, in whole degrees.
    ///
    /// Recomputed from the reference on every call. Time running backwards
    /// past the reference reads as zero.
    pub fn angle_degrees(&self, now_millis: i64, rate_divisor_millis: i64) -> i32 {
        let reference = match self.phase {
            AnimationPhase::Active { reference_millis } => reference_millis,
            AnimationPhase::Idle => self.created_millis,
        };
        let elapsed = now_millis.saturating_sub(reference).max(0);
        ((elapsed / rate_divisor_millis.max(1)) % SWEEP_DEGREES) as i32
    }

    pub fn sample(&mut self, governing_mode_active: bool, now_millis: i64, rate_divisor_millis: i64) -> i32 {
        self.update(governing_mode_active, now_millis);
        self.angle_degrees(now_millis, rate_divisor_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_restarts_sweep_at_zero() {
        let mut clock = AnimationClock::new(0);
        assert_eq!(clock.update(true, 123_456), Some(PhaseTransition::Activated));
        assert_eq!(clock.angle_degrees(123_456, 10), 0);
        assert_eq!(clock.angle_degrees(123_456 + 20, 10), 2);
        assert_eq!(clock.angle_degrees(123_456 + 905, 10), 0);
        assert_eq!(clock.angle_degrees(123_456 + 915, 10), 1);
    }

    #[test]
    fn angle_stays_in_range_and_grows_between_wraps() {
        let mut clock = AnimationClock::new(0);
        clock.update(true, 1_000);
        let mut previous = 0;
        for t in (1_000..20_000).step_by(7) {
            let angle = clock.angle_degrees(t, 10);
            assert!((0..90).contains(&angle));
            if angle < previous {
                assert!(previous >= 88, "unexpected drop {previous} -> {angle}");
            }
            previous = angle;
        }
    }

    #[test]
    fn deactivation_discards_progress() {
        let mut clock = AnimationClock::new(0);
        clock.update(true, 0);
        assert_eq!(clock.angle_degrees(500, 10), 50);
        assert_eq!(clock.update(false, 500), Some(PhaseTransition::Deactivated));
        assert_eq!(clock.phase(), AnimationPhase::Idle);

        assert_eq!(clock.update(true, 9_999), Some(PhaseTransition::Activated));
        assert_eq!(clock.angle_degrees(9_999, 10), 0);
    }

    #[test]
    fn repeated_updates_in_same_state_are_not_transitions() {
        let mut clock = AnimationClock::new(0);
        assert_eq!(clock.update(false, 10), None);
        clock.update(true, 20);
        assert_eq!(clock.update(true, 30), None);
        assert_eq!(clock.phase(), AnimationPhase::Active { reference_millis: 20 });
    }

    #[test]
    fn angle_is_idempotent_for_same_time() {
        let mut clock = AnimationClock::new(0);
        let a = clock.sample(true, 777, 20);
        let b = clock.sample(true, 777, 20);
        assert_eq!(a, b);
        assert_eq!(clock.sample(true, 777 + 40, 20), 2);
    }

    #[test]
    fn backwards_time_reads_as_zero() {
        let mut clock = AnimationClock::new(0);
        clock.update(true, 5_000);
        assert_eq!(clock.angle_degrees(4_000, 10), 0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now_millis(), 150);
        other.set(7);
        assert_eq!(clock.now_millis(), 7);
    }
}
