use crate::actor;
use crate::replica::election::timers::deadline::{SharedDeadline, Wake};
use crate::replica::election::timers::time::{Clock, RealClock};
use crate::replica::FollowerTimeoutTick;
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::{Arc, Weak};
use tokio::time::{Duration, Instant};

/// FollowerTimerHandle is the election timer. Once the countdown elapses without a
/// `reset_timeout()`, the timer task alerts the actor with a `FollowerTimeoutTick`, and keeps
/// re-alerting until the countdown is reset or the handle is dropped. Dropping the handle stops
/// the timer for good.
///
/// An alert may already sit in the actor's queue when the countdown is reset. The tick carries
/// the reset epoch it elapsed in, so the actor can tell it apart with `is_pending_alert()`.
pub(crate) struct FollowerTimerHandle<C: Clock = RealClock> {
    shared: Arc<Shared<C>>,
}

struct Shared<C: Clock> {
    deadline: SharedDeadline,
    timeout_range: RangeInclusive<Duration>,
    clock: C,
}

struct FollowerTimerTask<C: Clock> {
    weak_shared: Weak<Shared<C>>,
    deadline: SharedDeadline,
    actor_client: actor::WeakActorClient,
    generation: u64,
    clock: C,
    // How long to wait between repeated alerts while the alert stays unanswered.
    realert_interval: Duration,
}

impl FollowerTimerHandle {
    pub(crate) fn spawn_timer_task(
        min_timeout: Duration,
        max_timeout: Duration,
        actor_client: actor::WeakActorClient,
        generation: u64,
    ) -> Self {
        let (task, handle) = FollowerTimerTask::new(min_timeout, max_timeout, actor_client, generation, RealClock);
        tokio::task::spawn(task.run());

        handle
    }
}

impl<C: Clock> FollowerTimerHandle<C> {
    /// Restart the countdown with a freshly drawn random timeout. Clears a raised alert.
    pub(crate) fn reset_timeout(&self) {
        self.shared.reset_timeout();
    }

    /// True if `tick` was raised since the last `reset_timeout()`.
    pub(crate) fn is_pending_alert(&self, tick: &FollowerTimeoutTick) -> bool {
        tick.reset_epoch == self.shared.deadline.reset_epoch()
    }

    #[cfg(test)]
    pub(crate) fn pending_alert(&self, generation: u64) -> FollowerTimeoutTick {
        FollowerTimeoutTick {
            generation,
            reset_epoch: self.shared.deadline.reset_epoch(),
        }
    }
}

impl<C: Clock> Shared<C> {
    fn reset_timeout(&self) {
        let rand_timeout = rand::thread_rng().gen_range(self.timeout_range.clone());
        self.deadline.set(self.clock.now() + rand_timeout);
    }
}

impl<C: Clock> FollowerTimerTask<C> {
    fn new(
        min_timeout: Duration,
        max_timeout: Duration,
        actor_client: actor::WeakActorClient,
        generation: u64,
        clock: C,
    ) -> (Self, FollowerTimerHandle<C>) {
        let deadline = SharedDeadline::new();
        let shared = Arc::new(Shared {
            deadline: deadline.clone(),
            timeout_range: RangeInclusive::new(min_timeout, max_timeout),
            clock: clock.clone(),
        });

        // The countdown must be running before the task starts, otherwise the task would alert
        // immediately.
        shared.reset_timeout();

        let task = FollowerTimerTask {
            weak_shared: Arc::downgrade(&shared),
            deadline,
            actor_client,
            generation,
            clock,
            realert_interval: min_timeout,
        };

        (task, FollowerTimerHandle { shared })
    }

    async fn run(mut self) {
        loop {
            match self.deadline.take() {
                Wake::At(wake_time) => {
                    self.sleep_until(wake_time).await;
                }
                Wake::Elapsed { reset_epoch } => {
                    // Slept until the deadline and nobody pushed it out.
                    if self.is_stopped() {
                        return;
                    }
                    let tick = FollowerTimeoutTick {
                        generation: self.generation,
                        reset_epoch,
                    };
                    if self.actor_client.follower_timeout(tick).await.is_err() {
                        return;
                    }
                    let realert_interval = self.realert_interval;
                    self.clock.sleep(realert_interval).await;
                }
            }

            if self.is_stopped() {
                return;
            }
        }
    }

    async fn sleep_until(&mut self, wake_time: Instant) {
        self.clock.sleep_until(wake_time).await;
    }

    fn is_stopped(&self) -> bool {
        self.weak_shared.strong_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorClient, TestUtilActor};
    use crate::replica::election::timers::time;

    const GENERATION: u64 = 7;

    #[tokio::test]
    async fn follower_timer_handle_reset_and_timeout() {
        // -- setup --
        let timeout = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);
        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        // -- execute & verify --

        // 1. Spawn task, assert there is no event in the queue.
        let (timer_task, timer_handle) = FollowerTimerTask::new(
            // Not testing jitter, so make min/max the same.
            timeout,
            timeout,
            strong_actor_client.weak(),
            GENERATION,
            mock_clock,
        );
        tokio::task::spawn(timer_task.run());
        actor.assert_no_event().await;

        // 2. Advance time and reset timeout many times, assert no event
        for _ in 0..5 {
            mock_clock_controller.advance(timeout / 2);
            timer_handle.reset_timeout();
        }
        actor.assert_no_event().await;
        assert_eq!(mock_clock_controller.elapsed_time(), timeout * 5 / 2);

        // 3. No timeout before T=3.5, since the last reset was at T=2.5.
        let one_ns = Duration::from_nanos(1);
        mock_clock_controller.advance(timeout - one_ns);
        actor.assert_no_event().await;

        // 4. Timeout at exactly T=3.5.
        mock_clock_controller.advance(one_ns);
        actor
            .assert_follower_timeout_event(timer_handle.pending_alert(GENERATION))
            .await;
    }

    #[tokio::test]
    async fn follower_timer_alert_stays_raised_until_reset() {
        // -- setup --
        let timeout = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);
        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        let (timer_task, timer_handle) =
            FollowerTimerTask::new(timeout, timeout, strong_actor_client.weak(), GENERATION, mock_clock);
        tokio::task::spawn(timer_task.run());
        let expected_tick = timer_handle.pending_alert(GENERATION);

        // -- execute & verify --

        // 1. Time out and nobody resets: alert is repeated every re-alert interval.
        mock_clock_controller.advance(timeout);
        actor.assert_follower_timeout_event(expected_tick).await;
        actor.assert_no_event().await;

        mock_clock_controller.advance(timeout);
        actor.assert_follower_timeout_event(expected_tick).await;
        actor.assert_no_event().await;

        // 2. Reset clears the alert, including the ones already delivered. Keep resetting, and
        // nothing more arrives.
        timer_handle.reset_timeout();
        assert!(!timer_handle.is_pending_alert(&expected_tick));
        for _ in 0..5 {
            mock_clock_controller.advance(timeout / 2);
            timer_handle.reset_timeout();
        }
        actor.assert_no_event().await;
    }

    #[tokio::test]
    async fn follower_timer_handle_drop() {
        // -- setup --
        let timeout = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);
        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        // -- execute --
        let (timer_task, timer_handle) =
            FollowerTimerTask::new(timeout, timeout, strong_actor_client.weak(), GENERATION, mock_clock);
        let task_join_handle = tokio::task::spawn(timer_task.run());
        drop(timer_handle);

        // -- verify --
        // Fast-fwd past the deadline. Task must exit without alerting.
        mock_clock_controller.advance(timeout * 2);
        task_join_handle.await.unwrap();
        actor.assert_no_event().await;
    }

    #[tokio::test]
    async fn follower_timer_exits_when_actor_is_gone() {
        let timeout = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        let (timer_task, _timer_handle) =
            FollowerTimerTask::new(timeout, timeout, strong_actor_client.weak(), GENERATION, mock_clock);
        let task_join_handle = tokio::task::spawn(timer_task.run());

        drop(strong_actor_client);
        drop(rx);
        mock_clock_controller.advance(timeout);

        tokio::time::timeout(Duration::from_secs(5), task_join_handle)
            .await
            .expect("Timer task should exit")
            .unwrap();
    }
}
