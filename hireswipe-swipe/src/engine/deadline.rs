use std::time::{Duration, Instant};

use super::{SwipeError, SwipeResult};

/// Point after which a write must not commit.
///
/// Checked inside the store transaction, so a swipe that finishes late rolls
/// back instead of committing behind a caller that was already told it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn after(budget: Duration) -> Self {
        Self(Some(Instant::now() + budget))
    }

    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    pub fn check(&self) -> SwipeResult<()> {
        if self.is_expired() {
            return Err(SwipeError::DeadlineExceeded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_deadline_never_expires() {
        assert!(Deadline::none().check().is_ok());
        assert!(!Deadline::default().is_expired());
    }

    #[test]
    fn past_deadline_is_exceeded() {
        let deadline = Deadline::at(Instant::now() - Duration::from_millis(1));
        assert!(matches!(deadline.check(), Err(SwipeError::DeadlineExceeded)));
    }

    #[test]
    fn future_deadline_passes() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(deadline.check().is_ok());
    }
}
