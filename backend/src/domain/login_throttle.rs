//! Failed-login throttling policy.
//!
//! Consecutive failures for one email are counted inside a rolling window.
//! Reaching the limit locks the email for the lockout period; a successful
//! login clears the record. The policy is pure: callers load and store the
//! [`LoginAttempts`] record through a port.

use chrono::{DateTime, Duration, Utc};

/// Failure bookkeeping for a single email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempts {
    pub failures: u32,
    pub last_failure_at: DateTime<Utc>,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Outcome of consulting the policy before verifying a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allowed,
    Locked { until: DateTime<Utc> },
}

/// Limits applied to failed logins.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use muncho_crm::domain::{LoginThrottlePolicy, ThrottleDecision};
///
/// let policy = LoginThrottlePolicy::new(2, 15);
/// let now = Utc::now();
/// let once = policy.record_failure(None, now);
/// let twice = policy.record_failure(Some(once), now);
/// assert!(matches!(policy.check(Some(&twice), now), ThrottleDecision::Locked { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginThrottlePolicy {
    max_failures: u32,
    lockout: Duration,
}

impl Default for LoginThrottlePolicy {
    fn default() -> Self {
        Self::new(5, 15)
    }
}

impl LoginThrottlePolicy {
    /// Build a policy locking after `max_failures` for `lockout_minutes`.
    ///
    /// The failure window equals the lockout period, so a quiet spell of that
    /// length also forgives earlier failures. A zero limit is treated as one.
    #[must_use]
    pub fn new(max_failures: u32, lockout_minutes: u32) -> Self {
        Self {
            max_failures: max_failures.max(1),
            lockout: Duration::minutes(i64::from(lockout_minutes)),
        }
    }

    /// Configured lockout period.
    #[must_use]
    pub fn lockout(&self) -> Duration {
        self.lockout
    }

    /// Whether `attempts` no longer counts: its lock has run out, or no lock
    /// was set and the last failure is older than the lockout period.
    #[must_use]
    pub fn is_stale(&self, attempts: &LoginAttempts, now: DateTime<Utc>) -> bool {
        match attempts.locked_until {
            Some(until) => until <= now,
            None => now - attempts.last_failure_at > self.lockout,
        }
    }

    /// Decide whether a login attempt may proceed.
    #[must_use]
    pub fn check(&self, attempts: Option<&LoginAttempts>, now: DateTime<Utc>) -> ThrottleDecision {
        match attempts.and_then(|a| a.locked_until) {
            Some(until) if until > now => ThrottleDecision::Locked { until },
            _ => ThrottleDecision::Allowed,
        }
    }

    /// Fold one more failure into the record, locking when the limit is hit.
    #[must_use]
    pub fn record_failure(
        &self,
        attempts: Option<LoginAttempts>,
        now: DateTime<Utc>,
    ) -> LoginAttempts {
        let previous = attempts
            .filter(|a| !self.is_stale(a, now))
            .map_or(0, |a| a.failures);
        let failures = previous.saturating_add(1);
        let locked_until = (failures >= self.max_failures).then(|| now + self.lockout);
        LoginAttempts {
            failures,
            last_failure_at: now,
            locked_until,
        }
    }
}

/// Whole minutes left on a lock, rounded up.
#[must_use]
pub fn remaining_minutes(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (until - now).num_seconds().max(0);
    (seconds + 59) / 60
}

/// User-facing lockout message.
#[must_use]
pub fn lockout_message(minutes: i64) -> String {
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Temporarily locked—try again in {minutes} {unit} or reset your password.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn policy() -> LoginThrottlePolicy {
        LoginThrottlePolicy::default()
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    fn fail_times(policy: &LoginThrottlePolicy, times: u32, now: DateTime<Utc>) -> LoginAttempts {
        let mut attempts = None;
        for _ in 0..times {
            attempts = Some(policy.record_failure(attempts, now));
        }
        attempts.expect("at least one failure")
    }

    #[rstest]
    fn four_failures_do_not_lock(policy: LoginThrottlePolicy, now: DateTime<Utc>) {
        let attempts = fail_times(&policy, 4, now);
        assert_eq!(attempts.failures, 4);
        assert_eq!(policy.check(Some(&attempts), now), ThrottleDecision::Allowed);
    }

    #[rstest]
    fn fifth_failure_locks_for_fifteen_minutes(policy: LoginThrottlePolicy, now: DateTime<Utc>) {
        let attempts = fail_times(&policy, 5, now);
        let until = now + Duration::minutes(15);
        assert_eq!(attempts.locked_until, Some(until));
        assert_eq!(
            policy.check(Some(&attempts), now + Duration::minutes(14)),
            ThrottleDecision::Locked { until }
        );
        assert_eq!(
            policy.check(Some(&attempts), until),
            ThrottleDecision::Allowed
        );
    }

    #[rstest]
    fn quiet_window_forgives_failures(policy: LoginThrottlePolicy, now: DateTime<Utc>) {
        let attempts = fail_times(&policy, 4, now);
        let later = now + Duration::minutes(16);
        let next = policy.record_failure(Some(attempts), later);
        assert_eq!(next.failures, 1);
        assert!(next.locked_until.is_none());
    }

    #[rstest]
    fn failure_after_expired_lock_starts_over(policy: LoginThrottlePolicy, now: DateTime<Utc>) {
        let locked = fail_times(&policy, 5, now);
        let next = policy.record_failure(Some(locked), now + Duration::minutes(20));
        assert_eq!(next.failures, 1);
    }

    #[rstest]
    #[case(900, 15)]
    #[case(61, 2)]
    #[case(60, 1)]
    #[case(0, 0)]
    fn remaining_minutes_round_up(now: DateTime<Utc>, #[case] seconds: i64, #[case] expected: i64) {
        assert_eq!(remaining_minutes(now + Duration::seconds(seconds), now), expected);
    }

    #[rstest]
    fn lockout_message_pluralises() {
        assert_eq!(
            lockout_message(15),
            "Temporarily locked—try again in 15 minutes or reset your password."
        );
        assert!(lockout_message(1).contains("1 minute or"));
    }
}
