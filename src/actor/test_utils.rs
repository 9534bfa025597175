use crate::actor::Event;
use crate::replica::{FollowerTimeoutTick, LeaderTimerTick};
use std::time::Duration;
use tokio::sync::mpsc;

/// TestUtilActor stands in for the replica actor, so tests can observe the events that timers and
/// peer calls send to it.
pub(crate) struct TestUtilActor {
    rx: mpsc::Receiver<Event>,
    quiet_period: Duration,
}

impl TestUtilActor {
    pub(crate) fn new(rx: mpsc::Receiver<Event>) -> Self {
        TestUtilActor {
            rx,
            quiet_period: Duration::from_millis(10),
        }
    }

    pub(crate) async fn recv(&mut self) -> Event {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("Unexpected timeout")
            .expect("Expected event")
    }

    pub(crate) async fn assert_leader_heartbeat_event(&mut self, expected: LeaderTimerTick) {
        match self.recv().await {
            Event::LeaderTimer(tick) => assert_eq!(tick, expected),
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    pub(crate) async fn assert_follower_timeout_event(&mut self, expected: FollowerTimeoutTick) {
        match self.recv().await {
            Event::FollowerTimeout(tick) => assert_eq!(tick, expected),
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    pub(crate) async fn assert_no_event(&mut self) {
        if let Ok(event) = tokio::time::timeout(self.quiet_period, self.rx.recv()).await {
            panic!("Expected no event, got: {:?}", event);
        }
    }
}
