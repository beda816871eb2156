// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user submission cooldown.
//!
//! Only successful submissions start a cooldown window. A denied attempt does
//! not reset it, so repeated retries keep counting down from the original
//! success.

use std::collections::HashMap;
use std::time::Duration;

use intake_core::UserId;
use tokio::time::Instant;

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// The user may submit now.
    Allowed,
    /// The user must wait; `seconds_remaining` is rounded up.
    Denied { seconds_remaining: u64 },
}

/// Tracks the last successful submission per user.
#[derive(Debug)]
pub struct SubmissionCooldown {
    cooldown: Duration,
    last_success: HashMap<UserId, Instant>,
}

impl SubmissionCooldown {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_success: HashMap::new(),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Decide whether `user` may submit at `now`. Pure query.
    pub fn check(&self, user: UserId, now: Instant) -> CooldownDecision {
        let Some(last) = self.last_success.get(&user) else {
            return CooldownDecision::Allowed;
        };

        let elapsed = now.saturating_duration_since(*last);
        if elapsed >= self.cooldown {
            return CooldownDecision::Allowed;
        }

        let remaining_ms = (self.cooldown - elapsed).as_millis() as u64;
        CooldownDecision::Denied {
            seconds_remaining: remaining_ms.div_ceil(1000),
        }
    }

    /// Start a new cooldown window for `user`.
    pub fn record_success(&mut self, user: UserId, now: Instant) {
        self.last_success.insert(user, now);
    }

    /// Number of users with a recorded submission.
    pub fn tracked_users(&self) -> usize {
        self.last_success.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId(12345);
    const BOB: UserId = UserId(67890);

    #[test]
    fn unknown_user_is_allowed() {
        let cooldown = SubmissionCooldown::from_secs(60);
        assert_eq!(cooldown.check(ALICE, Instant::now()), CooldownDecision::Allowed);
        assert_eq!(cooldown.tracked_users(), 0);
    }

    #[test]
    fn denied_within_window_with_rounded_up_seconds() {
        let mut cooldown = SubmissionCooldown::from_secs(60);
        let t0 = Instant::now();
        cooldown.record_success(ALICE, t0);

        assert_eq!(
            cooldown.check(ALICE, t0),
            CooldownDecision::Denied { seconds_remaining: 60 }
        );
        assert_eq!(
            cooldown.check(ALICE, t0 + Duration::from_millis(10_500)),
            CooldownDecision::Denied { seconds_remaining: 50 }
        );
        assert_eq!(
            cooldown.check(ALICE, t0 + Duration::from_millis(59_001)),
            CooldownDecision::Denied { seconds_remaining: 1 }
        );
    }

    #[test]
    fn allowed_once_window_elapsed() {
        let mut cooldown = SubmissionCooldown::from_secs(60);
        let t0 = Instant::now();
        cooldown.record_success(ALICE, t0);

        assert_eq!(
            cooldown.check(ALICE, t0 + Duration::from_secs(60)),
            CooldownDecision::Allowed
        );
        assert_eq!(
            cooldown.check(ALICE, t0 + Duration::from_secs(3600)),
            CooldownDecision::Allowed
        );
    }

    #[test]
    fn check_does_not_reset_window() {
        let mut cooldown = SubmissionCooldown::from_secs(60);
        let t0 = Instant::now();
        cooldown.record_success(ALICE, t0);

        for secs in [5, 20, 40] {
            let _ = cooldown.check(ALICE, t0 + Duration::from_secs(secs));
        }
        assert_eq!(
            cooldown.check(ALICE, t0 + Duration::from_secs(60)),
            CooldownDecision::Allowed
        );
    }

    #[test]
    fn users_are_independent() {
        let mut cooldown = SubmissionCooldown::from_secs(60);
        let t0 = Instant::now();
        cooldown.record_success(ALICE, t0);

        assert_eq!(cooldown.check(BOB, t0), CooldownDecision::Allowed);
        assert!(matches!(cooldown.check(ALICE, t0), CooldownDecision::Denied { .. }));
        assert_eq!(cooldown.tracked_users(), 1);
    }
}
