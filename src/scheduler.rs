use std::time::{Duration, Instant};

pub const DEFAULT_UPDATE_DELAY: Duration = Duration::from_secs(5);

/// Single-shot, re-armable deadline that collapses bursts of accessory writes
/// into one heat pump update.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl UpdateScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm, or push back an already armed deadline.
    pub fn request_update(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once when the deadline has passed, disarming the scheduler.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_scheduler_never_fires() {
        let mut s = UpdateScheduler::default();
        assert!(!s.is_armed());
        assert!(!s.take_due(Instant::now() + Duration::from_secs(60)));
    }

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut s = UpdateScheduler::new(Duration::from_secs(5));
        s.request_update(start);

        assert!(!s.take_due(start + Duration::from_secs(4)));
        assert!(s.take_due(start + Duration::from_secs(5)));
        assert!(!s.take_due(start + Duration::from_secs(6)));
        assert!(!s.is_armed());
    }

    #[test]
    fn rearm_pushes_deadline_back() {
        let start = Instant::now();
        let mut s = UpdateScheduler::new(Duration::from_secs(5));
        s.request_update(start);
        s.request_update(start + Duration::from_secs(3));

        assert!(!s.take_due(start + Duration::from_secs(5)));
        assert_eq!(s.deadline(), Some(start + Duration::from_secs(8)));
        assert!(s.take_due(start + Duration::from_secs(8)));
    }
}
