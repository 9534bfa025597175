use tokio::time::{Duration, Instant};

/// Clock lets timer tasks run against either tokio's clock or a test controlled one.
#[async_trait::async_trait]
pub(crate) trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    async fn sleep_until(&mut self, deadline: Instant);

    async fn sleep(&mut self, duration: Duration) {
        let deadline = self.now() + duration;
        self.sleep_until(deadline).await;
    }
}

#[derive(Copy, Clone)]
pub(crate) struct RealClock;

#[async_trait::async_trait]
impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&mut self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

/// Returns a clock that only moves when the paired controller advances it.
#[cfg(test)]
pub(crate) fn mocked_clock() -> (MockClock, MockClockController) {
    let start = Instant::now();
    let (tx, rx) = tokio::sync::watch::channel(start);

    (
        MockClock { now: rx },
        MockClockController {
            now: tx,
            start,
        },
    )
}

#[cfg(test)]
#[derive(Clone)]
pub(crate) struct MockClock {
    now: tokio::sync::watch::Receiver<Instant>,
}

#[cfg(test)]
#[async_trait::async_trait]
impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.now.borrow()
    }

    async fn sleep_until(&mut self, deadline: Instant) {
        while *self.now.borrow() < deadline {
            self.now.changed().await.expect("MockClockController dropped");
        }
    }
}

#[cfg(test)]
pub(crate) struct MockClockController {
    now: tokio::sync::watch::Sender<Instant>,
    start: Instant,
}

#[cfg(test)]
impl MockClockController {
    pub(crate) fn elapsed_time(&self) -> Duration {
        *self.now.borrow() - self.start
    }

    /// Sleepers only promise to wake at or after their deadline. Advance in steps smaller than
    /// the timeouts under test, or several deadlines collapse into one wake up.
    pub(crate) fn advance(&mut self, duration: Duration) {
        let new_now = *self.now.borrow() + duration;
        self.now.send(new_now).expect("MockClock dropped");
    }
}
