pub const DEFAULT_BACKOFF_CEILING_SECONDS: u64 = 64;
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of recording one fetch failure.
pub struct BackoffDecision {
    pub sleep_seconds: u64,
    pub should_stop: bool,
}

#[derive(Debug, Clone)]
/// Tracks the consecutive fetch-failure streak and computes the bounded
/// exponential sleep schedule. Purely computational; the dispatch loop owns
/// the actual sleeping.
pub struct FetchBackoff {
    consecutive_failures: u32,
    ceiling_seconds: u64,
    max_consecutive_failures: u32,
}

impl FetchBackoff {
    pub fn new(ceiling_seconds: u64, max_consecutive_failures: u32) -> Self {
        Self {
            consecutive_failures: 0,
            ceiling_seconds: ceiling_seconds.max(1),
            max_consecutive_failures: max_consecutive_failures.max(1),
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Any successful fetch cycle resets the streak.
    pub fn on_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Records one failure and returns `min(ceiling, 2^(streak-1))` along
    /// with whether the streak has exceeded the fatal threshold.
    pub fn on_failure(&mut self) -> BackoffDecision {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let exponent = self.consecutive_failures.saturating_sub(1).min(63);
        let doubled = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        BackoffDecision {
            sleep_seconds: doubled.min(self.ceiling_seconds),
            should_stop: self.consecutive_failures > self.max_consecutive_failures,
        }
    }
}

impl Default for FetchBackoff {
    fn default() -> Self {
        Self::new(
            DEFAULT_BACKOFF_CEILING_SECONDS,
            DEFAULT_MAX_CONSECUTIVE_FAILURES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_failure_sequence_doubles_up_to_ceiling_then_stops() {
        let mut backoff = FetchBackoff::default();
        let expected_sleeps = [1, 2, 4, 8, 16, 32, 64, 64, 64, 64];
        for expected in expected_sleeps {
            let decision = backoff.on_failure();
            assert_eq!(decision.sleep_seconds, expected);
            assert!(!decision.should_stop);
        }
        let decision = backoff.on_failure();
        assert!(decision.should_stop);
    }

    #[test]
    fn unit_success_resets_the_streak() {
        let mut backoff = FetchBackoff::default();
        backoff.on_failure();
        backoff.on_failure();
        assert_eq!(backoff.consecutive_failures(), 2);
        backoff.on_success();
        assert_eq!(backoff.consecutive_failures(), 0);
        assert_eq!(backoff.on_failure().sleep_seconds, 1);
    }

    #[test]
    fn regression_custom_ceiling_and_threshold_are_honored() {
        let mut backoff = FetchBackoff::new(4, 3);
        assert_eq!(backoff.on_failure().sleep_seconds, 1);
        assert_eq!(backoff.on_failure().sleep_seconds, 2);
        assert_eq!(backoff.on_failure().sleep_seconds, 4);
        let decision = backoff.on_failure();
        assert_eq!(decision.sleep_seconds, 4);
        assert!(decision.should_stop);
    }
}
