use std::time::{Duration, Instant};

/// Result of polling an [`IdleWatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    /// Activity was recent enough, nothing to do.
    Active,
    /// The warning threshold was just crossed; fires once per arming.
    WarnNow,
    /// Warning already delivered, logout deadline not yet reached.
    Warned,
    /// The idle timeout elapsed; the session should be logged out.
    Expired,
}

/// Inactivity watchdog for one session. Two countdowns run from the last
/// recorded activity: a warning at `idle_timeout - warning_time`, and the
/// logout at `idle_timeout`. Any touch resets both and re-arms the warning.
///
/// This is pure deadline bookkeeping; the session sweeper drives it with a
/// clock and acts on the returned state.
#[derive(Debug)]
pub struct IdleWatch {
    idle_timeout: Duration,
    warning_time: Duration,
    last_activity: Instant,
    warned: bool,
}

impl IdleWatch {
    pub fn new(idle_timeout: Duration, warning_time: Duration) -> Self {
        Self::starting_at(idle_timeout, warning_time, Instant::now())
    }

    pub fn starting_at(idle_timeout: Duration, warning_time: Duration, now: Instant) -> Self {
        Self {
            idle_timeout,
            warning_time: warning_time.min(idle_timeout),
            last_activity: now,
            warned: false,
        }
    }

    /// Record activity, resetting both countdowns.
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
        self.warned = false;
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.idle_for(now) >= self.idle_timeout
    }

    pub fn poll(&mut self, now: Instant) -> IdleState {
        let idle = self.idle_for(now);
        if idle >= self.idle_timeout {
            return IdleState::Expired;
        }
        if idle >= self.idle_timeout - self.warning_time {
            if self.warned {
                return IdleState::Warned;
            }
            self.warned = true;
            return IdleState::WarnNow;
        }
        IdleState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(900);
    const WARNING: Duration = Duration::from_secs(60);

    #[test]
    fn warning_fires_once_at_threshold() {
        let start = Instant::now();
        let mut watch = IdleWatch::starting_at(TIMEOUT, WARNING, start);

        assert_eq!(watch.poll(start + Duration::from_secs(1)), IdleState::Active);
        assert_eq!(watch.poll(start + TIMEOUT - WARNING), IdleState::WarnNow);
        // Subsequent polls inside the warning window do not re-fire.
        assert_eq!(
            watch.poll(start + TIMEOUT - Duration::from_secs(30)),
            IdleState::Warned
        );
    }

    #[test]
    fn full_timeout_expires() {
        let start = Instant::now();
        let mut watch = IdleWatch::starting_at(TIMEOUT, WARNING, start);
        assert_eq!(watch.poll(start + TIMEOUT), IdleState::Expired);
        assert!(watch.is_expired(start + TIMEOUT));
    }

    #[test]
    fn touch_rearms_both_countdowns() {
        let start = Instant::now();
        let mut watch = IdleWatch::starting_at(TIMEOUT, WARNING, start);

        assert_eq!(watch.poll(start + TIMEOUT - WARNING), IdleState::WarnNow);
        watch.touch(start + TIMEOUT - WARNING + Duration::from_secs(1));

        let rebase = start + TIMEOUT - WARNING + Duration::from_secs(1);
        assert_eq!(watch.poll(rebase + Duration::from_secs(1)), IdleState::Active);
        // Warning fires again after the reset.
        assert_eq!(watch.poll(rebase + TIMEOUT - WARNING), IdleState::WarnNow);
        assert_eq!(watch.poll(rebase + TIMEOUT), IdleState::Expired);
    }

    #[test]
    fn warning_longer_than_timeout_is_clamped() {
        let start = Instant::now();
        let mut watch =
            IdleWatch::starting_at(Duration::from_secs(10), Duration::from_secs(60), start);
        assert_eq!(watch.poll(start), IdleState::WarnNow);
        assert_eq!(watch.poll(start + Duration::from_secs(10)), IdleState::Expired);
    }
}
