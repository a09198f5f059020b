//! Readiness handshake timing.
//!
//! An embedded console announces itself to the host on a bounded
//! exponential schedule until the host is heard from; a standalone console
//! instead arms a demo-activation deadline. All deadlines live in this
//! struct and are injected `Instant`s, so the driver owns the clock and
//! teardown is dropping the value.

use std::time::{Duration, Instant};

/// Standalone consoles self-activate a demo customer after this long with
/// no host contact.
pub const DEMO_ACTIVATION_DELAY: Duration = Duration::from_secs(2);

/// Schedule for unacknowledged readiness announcements. The first
/// announcement fires immediately; each following gap grows fourfold from
/// `base_delay` up to `max_delay`, and the schedule disarms for good after
/// `max_attempts` announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceBackoff {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for AnnounceBackoff {
    fn default() -> Self {
        AnnounceBackoff {
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
            max_attempts: 5,
        }
    }
}

impl AnnounceBackoff {
    /// Gap after the `attempt`th announcement (1-indexed).
    fn delay_after(self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        let scaled = self
            .base_delay
            .saturating_mul(1_u32.checked_shl(2 * exponent).unwrap_or(u32::MAX));
        scaled.min(self.max_delay.max(self.base_delay))
    }
}

/// Timer state for one console session.
#[derive(Debug, Clone)]
pub struct Handshake {
    backoff: AnnounceBackoff,
    next_announce: Option<Instant>,
    attempts_made: u32,
    demo_due: Option<Instant>,
}

impl Handshake {
    /// Embedded surface: announcements armed from `now`, no demo timer.
    pub fn embedded(now: Instant) -> Self {
        Self::embedded_with(now, AnnounceBackoff::default())
    }

    pub fn embedded_with(now: Instant, backoff: AnnounceBackoff) -> Self {
        Handshake {
            backoff,
            next_announce: (backoff.max_attempts > 0).then_some(now),
            attempts_made: 0,
            demo_due: None,
        }
    }

    /// Standalone surface: no announcements, demo activation armed.
    pub fn standalone(now: Instant) -> Self {
        Handshake {
            backoff: AnnounceBackoff::default(),
            next_announce: None,
            attempts_made: 0,
            demo_due: Some(now + DEMO_ACTIVATION_DELAY),
        }
    }

    /// If an announcement is due, consume it and schedule the next one.
    /// Returns the 1-indexed attempt number to emit.
    pub fn poll_announce(&mut self, now: Instant) -> Option<u32> {
        let due = self.next_announce?;
        if now < due {
            return None;
        }
        self.attempts_made += 1;
        self.next_announce = if self.attempts_made >= self.backoff.max_attempts {
            None
        } else {
            Some(now + self.backoff.delay_after(self.attempts_made))
        };
        Some(self.attempts_made)
    }

    /// The host was heard from; no further announcements are needed.
    pub fn mark_host_seen(&mut self) {
        self.next_announce = None;
    }

    /// If the demo deadline passed, consume it. Fires at most once.
    pub fn poll_demo(&mut self, now: Instant) -> bool {
        match self.demo_due {
            Some(due) if now >= due => {
                self.demo_due = None;
                true
            }
            _ => false,
        }
    }

    /// Host contact before the demo deadline keeps the real session.
    pub fn cancel_demo(&mut self) {
        self.demo_due = None;
    }

    pub fn announcements_armed(&self) -> bool {
        self.next_announce.is_some()
    }

    /// Earliest pending deadline, for the driver's sleep.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.next_announce, self.demo_due) {
            (Some(announce), Some(demo)) => Some(announce.min(demo)),
            (Some(announce), None) => Some(announce),
            (None, Some(demo)) => Some(demo),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnounceBackoff, DEMO_ACTIVATION_DELAY, Handshake};
    use std::time::{Duration, Instant};

    #[test]
    fn announce_schedule_grows_fourfold_and_respects_budget() {
        let start = Instant::now();
        let mut handshake = Handshake::embedded(start);

        assert_eq!(handshake.poll_announce(start), Some(1));
        let mut expected_gaps = Vec::new();
        let mut clock = start;
        while let Some(next) = handshake.next_deadline() {
            expected_gaps.push(next - clock);
            clock = next;
            assert!(handshake.poll_announce(next).is_some());
        }
        assert_eq!(
            expected_gaps,
            vec![
                Duration::from_millis(50),
                Duration::from_millis(200),
                Duration::from_millis(800),
                Duration::from_millis(3200),
            ]
        );
        // Budget of five spent; nothing ever fires again.
        assert!(!handshake.announcements_armed());
        assert_eq!(handshake.poll_announce(clock + Duration::from_secs(60)), None);
    }

    #[test]
    fn announce_gap_caps_at_max_delay() {
        let backoff = AnnounceBackoff {
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(500),
            max_attempts: 10,
        };
        let start = Instant::now();
        let mut handshake = Handshake::embedded_with(start, backoff);
        let mut clock = start;
        for _ in 0..5 {
            let Some(next) = handshake.next_deadline() else {
                unreachable!("schedule still armed");
            };
            clock = next;
            assert!(handshake.poll_announce(clock).is_some());
        }
        let Some(next) = handshake.next_deadline() else {
            unreachable!("schedule still armed");
        };
        assert_eq!(next - clock, Duration::from_millis(500));
    }

    #[test]
    fn announce_is_not_due_before_its_deadline() {
        let start = Instant::now();
        let mut handshake = Handshake::embedded(start);
        assert_eq!(handshake.poll_announce(start), Some(1));
        assert_eq!(handshake.poll_announce(start + Duration::from_millis(10)), None);
        assert_eq!(
            handshake.poll_announce(start + Duration::from_millis(50)),
            Some(2)
        );
    }

    #[test]
    fn host_contact_disarms_announcements() {
        let start = Instant::now();
        let mut handshake = Handshake::embedded(start);
        assert_eq!(handshake.poll_announce(start), Some(1));
        handshake.mark_host_seen();
        assert!(!handshake.announcements_armed());
        assert_eq!(handshake.next_deadline(), None);
        assert_eq!(handshake.poll_announce(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn demo_timer_fires_once_and_is_cancellable() {
        let start = Instant::now();
        let mut handshake = Handshake::standalone(start);
        assert_eq!(handshake.next_deadline(), Some(start + DEMO_ACTIVATION_DELAY));
        assert!(!handshake.poll_demo(start + Duration::from_secs(1)));
        assert!(handshake.poll_demo(start + DEMO_ACTIVATION_DELAY));
        assert!(!handshake.poll_demo(start + Duration::from_secs(10)));

        let mut cancelled = Handshake::standalone(start);
        cancelled.cancel_demo();
        assert!(!cancelled.poll_demo(start + Duration::from_secs(10)));
        assert_eq!(cancelled.next_deadline(), None);
    }

    #[test]
    fn standalone_surface_never_announces() {
        let start = Instant::now();
        let mut handshake = Handshake::standalone(start);
        assert_eq!(handshake.poll_announce(start + Duration::from_secs(10)), None);
    }
}
