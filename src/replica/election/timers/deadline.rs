use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

/// SharedDeadline is the countdown shared between a timer handle and its task. The handle arms
/// it with `set()`, the task consumes it with `take()`.
///
/// Every `set()` bumps a reset epoch. When the task finds the deadline unarmed, it learns the
/// epoch it elapsed in, and an alert carrying that epoch is stale as soon as the handle arms the
/// countdown again.
#[derive(Clone)]
pub(super) struct SharedDeadline {
    inner: Arc<Mutex<Countdown>>,
}

struct Countdown {
    armed: Option<Instant>,
    reset_epoch: u64,
}

#[derive(Debug, PartialEq)]
pub(super) enum Wake {
    /// Sleep until this instant, then take again.
    At(Instant),
    /// Nobody armed the countdown since the last take.
    Elapsed { reset_epoch: u64 },
}

impl SharedDeadline {
    pub(super) fn new() -> Self {
        SharedDeadline {
            inner: Arc::new(Mutex::new(Countdown {
                armed: None,
                reset_epoch: 0,
            })),
        }
    }

    pub(super) fn set(&self, deadline: Instant) {
        let mut countdown = self.lock();
        countdown.armed = Some(deadline);
        countdown.reset_epoch += 1;
    }

    pub(super) fn take(&self) -> Wake {
        let mut countdown = self.lock();
        match countdown.armed.take() {
            Some(deadline) => Wake::At(deadline),
            None => Wake::Elapsed {
                reset_epoch: countdown.reset_epoch,
            },
        }
    }

    pub(super) fn reset_epoch(&self) -> u64 {
        self.lock().reset_epoch
    }

    // Countdown has no invariant a panicking holder could break, so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, Countdown> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn take_disarms_and_reports_epoch() {
        let deadline = SharedDeadline::new();
        let task_side = deadline.clone();
        assert_eq!(task_side.take(), Wake::Elapsed { reset_epoch: 0 });

        let now = Instant::now();
        deadline.set(now);
        deadline.set(now + Duration::from_millis(5));
        assert_eq!(task_side.take(), Wake::At(now + Duration::from_millis(5)));
        assert_eq!(task_side.take(), Wake::Elapsed { reset_epoch: 2 });
        assert_eq!(task_side.take(), Wake::Elapsed { reset_epoch: 2 });
    }

    #[test]
    fn set_after_elapse_moves_epoch_on() {
        let deadline = SharedDeadline::new();
        deadline.set(Instant::now());
        deadline.take();

        let elapsed_in = match deadline.take() {
            Wake::Elapsed { reset_epoch } => reset_epoch,
            other => panic!("Expected elapsed, got {:?}", other),
        };
        assert_eq!(elapsed_in, deadline.reset_epoch());

        deadline.set(Instant::now());
        assert_ne!(elapsed_in, deadline.reset_epoch());
    }
}
