use crate::actor;
use crate::replica::election::timers::deadline::{SharedDeadline, Wake};
use crate::replica::election::timers::time::{Clock, RealClock};
use crate::replica::{LeaderTimerTick, ReplicaId, Term};
use std::sync::{Arc, Weak};
use tokio::time::Duration;

/// LeaderTimerHandle drives heartbeats to one peer while we are leader for one term. The task
/// exits when the handle is dropped, i.e. when we stop being leader of that term.
pub(crate) struct LeaderTimerHandle<C: Clock = RealClock> {
    shared: Arc<Shared<C>>,
}

struct Shared<C: Clock> {
    heartbeat_duration: Duration,
    next_heartbeat_time: SharedDeadline,
    clock: C,
}

struct LeaderTimerTask<C: Clock> {
    weak_shared: Weak<Shared<C>>,
    next_heartbeat_time: SharedDeadline,
    actor_client: actor::WeakActorClient,
    tick: LeaderTimerTick,
    clock: C,
}

impl LeaderTimerHandle {
    pub(crate) fn spawn_timer_task(
        heartbeat_duration: Duration,
        actor_client: actor::WeakActorClient,
        peer_id: ReplicaId,
        term: Term,
    ) -> Self {
        let (task, handle) = LeaderTimerTask::new(heartbeat_duration, actor_client, peer_id, term, RealClock);
        tokio::task::spawn(task.run());

        handle
    }
}

impl<C: Clock> LeaderTimerHandle<C> {
    /// Push out the next heartbeat to one full heartbeat duration from now.
    pub(crate) fn reset_heartbeat_timer(&self) {
        self.shared.reset_heartbeat_timer();
    }
}

impl<C: Clock> Shared<C> {
    fn reset_heartbeat_timer(&self) {
        self.next_heartbeat_time.set(self.clock.now() + self.heartbeat_duration);
    }
}

impl<C: Clock> LeaderTimerTask<C> {
    fn new(
        heartbeat_duration: Duration,
        actor_client: actor::WeakActorClient,
        peer_id: ReplicaId,
        term: Term,
        clock: C,
    ) -> (Self, LeaderTimerHandle<C>) {
        let next_heartbeat_time = SharedDeadline::new();
        let shared = Arc::new(Shared {
            heartbeat_duration,
            next_heartbeat_time: next_heartbeat_time.clone(),
            clock: clock.clone(),
        });

        let task = LeaderTimerTask {
            weak_shared: Arc::downgrade(&shared),
            next_heartbeat_time,
            actor_client,
            tick: LeaderTimerTick { peer_id, term },
            clock,
        };

        (task, LeaderTimerHandle { shared })
    }

    async fn run(mut self) {
        // The deadline starts out empty, so the first iteration ticks right away. A newly elected
        // leader should announce itself to its peers as soon as possible.
        loop {
            match self.next_heartbeat_time.take() {
                Wake::At(wake_time) => {
                    self.clock.sleep_until(wake_time).await;
                }
                Wake::Elapsed { .. } => match self.weak_shared.upgrade() {
                    Some(shared) => {
                        if self.actor_client.leader_timer(self.tick.clone()).await.is_err() {
                            return;
                        }
                        shared.reset_heartbeat_timer();
                    }
                    None => return,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorClient, TestUtilActor};
    use crate::replica::election::timers::time;

    #[tokio::test]
    async fn leader_timer_handle_lifecycle() {
        // -- setup --
        let heartbeat_duration = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);

        let peer_id = ReplicaId::new("127.0.0.1:5002");
        let term = Term::new(10);
        let expected_tick = LeaderTimerTick {
            peer_id: peer_id.clone(),
            term,
        };
        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        // -- execute & verify --

        // 1. Spawn task, the first heartbeat is immediate.
        let (timer_task, timer_handle) =
            LeaderTimerTask::new(heartbeat_duration, strong_actor_client.weak(), peer_id, term, mock_clock);
        let task_join_handle = tokio::task::spawn(timer_task.run());

        actor.assert_leader_heartbeat_event(expected_tick.clone()).await;
        actor.assert_no_event().await;

        // 2. One heartbeat per heartbeat duration.
        for _ in 0..5 {
            mock_clock_controller.advance(heartbeat_duration);
            actor.assert_leader_heartbeat_event(expected_tick.clone()).await;
            actor.assert_no_event().await;
        }

        // 3. A big leap still produces a single heartbeat.
        mock_clock_controller.advance(heartbeat_duration * 5);
        actor.assert_leader_heartbeat_event(expected_tick.clone()).await;
        actor.assert_no_event().await;

        // 4. Drop handle, task exits without sending more events.
        drop(timer_handle);
        mock_clock_controller.advance(heartbeat_duration);
        task_join_handle.await.unwrap();
        actor.assert_no_event().await;
    }

    #[tokio::test]
    async fn leader_timer_handle_resetting_timeout() {
        // -- setup --
        let heartbeat_duration = Duration::from_millis(100);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);

        let peer_id = ReplicaId::new("127.0.0.1:5002");
        let term = Term::new(3);
        let expected_tick = LeaderTimerTick {
            peer_id: peer_id.clone(),
            term,
        };
        let (mock_clock, mut mock_clock_controller) = time::mocked_clock();

        let (timer_task, timer_handle) =
            LeaderTimerTask::new(heartbeat_duration, strong_actor_client.weak(), peer_id, term, mock_clock);
        tokio::task::spawn(timer_task.run());

        actor.assert_leader_heartbeat_event(expected_tick.clone()).await;
        actor.assert_no_event().await;

        // -- execute & verify --

        // 1. Keep resetting every half duration, so no heartbeat is due.
        for _ in 0..5 {
            mock_clock_controller.advance(heartbeat_duration / 2);
            timer_handle.reset_heartbeat_timer();
        }
        actor.assert_no_event().await;
        assert_eq!(mock_clock_controller.elapsed_time(), heartbeat_duration * 5 / 2);

        // 2. Last reset was at T=2.5, nothing at T=3.
        mock_clock_controller.advance(heartbeat_duration / 2);
        actor.assert_no_event().await;

        // 3. Heartbeat at T=3.5.
        mock_clock_controller.advance(heartbeat_duration / 2);
        actor.assert_leader_heartbeat_event(expected_tick).await;
    }
}
