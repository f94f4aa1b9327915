use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::identity::models::LockoutState;

/// Account lockout state machine.
///
/// Two states: *Active* (counter below threshold) and *Locked* (`is_locked`
/// with `locked_until` set). Every transition is a pure function of the
/// current state and the clock; persisting the result is the caller's job.
///
/// A lock whose `locked_until` has passed is treated as expired at read time,
/// before the stored record is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    threshold: u32,
    duration: Duration,
}

impl LockoutPolicy {
    pub const DEFAULT_THRESHOLD: u32 = 5;
    pub const DEFAULT_DURATION_MINUTES: i64 = 30;

    pub fn new(threshold: u32, duration: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            duration,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the account must be refused at `now`.
    pub fn is_locked(&self, state: &LockoutState, now: DateTime<Utc>) -> bool {
        state.is_locked && state.locked_until.map_or(true, |until| now < until)
    }

    /// Whether a stored lock has run out and should be reset.
    pub fn is_expired(&self, state: &LockoutState, now: DateTime<Utc>) -> bool {
        state.is_locked && state.locked_until.is_some_and(|until| now >= until)
    }

    /// Locked -> Active once `locked_until` has passed; otherwise unchanged.
    pub fn expire_if_due(&self, state: &LockoutState, now: DateTime<Utc>) -> LockoutState {
        if self.is_expired(state, now) {
            self.record_success()
        } else {
            state.clone()
        }
    }

    /// One more failed verification; locks on reaching the threshold.
    pub fn record_failure(&self, state: &LockoutState, now: DateTime<Utc>) -> LockoutState {
        let failed_login_attempts = state.failed_login_attempts.saturating_add(1);

        if failed_login_attempts >= self.threshold {
            LockoutState {
                failed_login_attempts,
                is_locked: true,
                locked_until: Some(now + self.duration),
            }
        } else {
            LockoutState {
                failed_login_attempts,
                is_locked: state.is_locked,
                locked_until: state.locked_until,
            }
        }
    }

    /// Any state -> Active with a zeroed counter.
    pub fn record_success(&self) -> LockoutState {
        LockoutState::default()
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_THRESHOLD,
            Duration::minutes(Self::DEFAULT_DURATION_MINUTES),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail_times(policy: &LockoutPolicy, times: u32, now: DateTime<Utc>) -> LockoutState {
        (0..times).fold(LockoutState::default(), |state, _| {
            policy.record_failure(&state, now)
        })
    }

    #[test]
    fn test_four_failures_stay_active() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();

        let state = fail_times(&policy, 4, now);

        assert_eq!(state.failed_login_attempts, 4);
        assert!(!state.is_locked);
        assert!(state.locked_until.is_none());
        assert!(!policy.is_locked(&state, now));
    }

    #[test]
    fn test_fifth_failure_locks_for_thirty_minutes() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();

        let state = fail_times(&policy, 5, now);

        assert_eq!(state.failed_login_attempts, 5);
        assert!(state.is_locked);
        assert_eq!(state.locked_until, Some(now + Duration::minutes(30)));
        assert!(policy.is_locked(&state, now));
        assert!(policy.is_locked(&state, now + Duration::minutes(29)));
    }

    #[test]
    fn test_lock_expires_lazily() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let state = fail_times(&policy, 5, now);
        let later = now + Duration::minutes(30);

        assert!(!policy.is_locked(&state, later));
        assert!(policy.is_expired(&state, later));
        assert_eq!(policy.expire_if_due(&state, later), LockoutState::default());
    }

    #[test]
    fn test_expire_if_due_keeps_active_lock() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let state = fail_times(&policy, 5, now);

        assert!(!policy.is_expired(&state, now));
        assert_eq!(policy.expire_if_due(&state, now), state);
    }

    #[test]
    fn test_expire_if_due_keeps_active_counter() {
        let policy = LockoutPolicy::default();
        let now = Utc::now();
        let state = fail_times(&policy, 3, now);

        assert_eq!(policy.expire_if_due(&state, now), state);
    }

    #[test]
    fn test_success_resets_everything() {
        let policy = LockoutPolicy::default();
        let state = fail_times(&policy, 5, Utc::now());

        assert!(state.is_locked);
        assert_eq!(policy.record_success(), LockoutState::default());
    }

    #[test]
    fn test_lock_without_deadline_stays_locked() {
        let policy = LockoutPolicy::default();
        let state = LockoutState {
            failed_login_attempts: 5,
            is_locked: true,
            locked_until: None,
        };

        assert!(policy.is_locked(&state, Utc::now()));
        assert!(!policy.is_expired(&state, Utc::now()));
    }

    #[test]
    fn test_custom_threshold() {
        let policy = LockoutPolicy::new(2, Duration::minutes(5));
        let now = Utc::now();

        assert!(!fail_times(&policy, 1, now).is_locked);
        let locked = fail_times(&policy, 2, now);
        assert!(locked.is_locked);
        assert_eq!(locked.locked_until, Some(now + Duration::minutes(5)));
    }
}
