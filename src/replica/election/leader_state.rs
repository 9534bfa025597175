use crate::replica::election::timers::LeaderTimerHandle;
use crate::replica::ReplicaId;
use std::collections::HashMap;

pub(crate) struct LeaderStateTracker {
    peer_state: HashMap<ReplicaId, PeerState>,
}

impl LeaderStateTracker {
    pub(super) fn new(peer_state: HashMap<ReplicaId, PeerState>) -> Self {
        LeaderStateTracker { peer_state }
    }

    pub(crate) fn peer_state_mut(&mut self, peer_id: &ReplicaId) -> Option<&mut PeerState> {
        self.peer_state.get_mut(peer_id)
    }
}

/// PeerState tracks the heartbeat exchange between the leader and one peer.
pub(crate) struct PeerState {
    // Held to send heartbeats to this peer
    leader_timer_handle: LeaderTimerHandle,

    // SeqNo is a logical clock of the leader's heartbeats to this peer, restarted each term. Only
    // one heartbeat is allowed in flight, and replies older than the newest received are dropped.
    last_sent_seq_no: u64,
    last_received_seq_no: u64,
}

impl PeerState {
    pub(super) fn new(leader_timer_handle: LeaderTimerHandle) -> Self {
        PeerState {
            leader_timer_handle,
            last_sent_seq_no: 0,
            last_received_seq_no: 0,
        }
    }

    pub(crate) fn has_outstanding_request(&self) -> bool {
        self.last_received_seq_no < self.last_sent_seq_no
    }

    pub(crate) fn next_seq_no(&mut self) -> u64 {
        self.last_sent_seq_no += 1;
        self.last_sent_seq_no
    }

    /// Returns true if `received_seq_no` is a reply we were waiting for.
    pub(crate) fn ratchet_fwd_received_seq_no(&mut self, received_seq_no: u64) -> bool {
        if self.last_received_seq_no < received_seq_no && received_seq_no <= self.last_sent_seq_no {
            self.last_received_seq_no = received_seq_no;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset_heartbeat_timer(&self) {
        self.leader_timer_handle.reset_heartbeat_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorClient;
    use crate::replica::Term;
    use std::time::Duration;

    #[tokio::test]
    async fn one_heartbeat_in_flight() {
        let (strong_actor_client, _rx) = ActorClient::new(10);
        let timer = LeaderTimerHandle::spawn_timer_task(
            Duration::from_secs(60),
            strong_actor_client.weak(),
            ReplicaId::new("127.0.0.1:5002"),
            Term::new(1),
        );
        let mut peer_state = PeerState::new(timer);

        assert!(!peer_state.has_outstanding_request());
        let first = peer_state.next_seq_no();
        assert!(peer_state.has_outstanding_request());

        // Unknown and future seq-nos are dropped.
        assert!(!peer_state.ratchet_fwd_received_seq_no(first + 1));
        assert!(peer_state.ratchet_fwd_received_seq_no(first));
        assert!(!peer_state.has_outstanding_request());

        // Duplicate reply is dropped.
        assert!(!peer_state.ratchet_fwd_received_seq_no(first));
    }
}
