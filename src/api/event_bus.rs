use crate::replica::ElectionStateChangeListener;
use crate::replica::ElectionStateSnapshot;

/// An election event, as observed by the local replica.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ElectionEvent {
    Leader,
    Candidate,
    Follower(FollowerEventData),
    FollowerNoLeader,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FollowerEventData {
    pub leader_replica_id: String,
}

/// ElectionEventListener follows the local replica's role. Consuming it is subtle: it doesn't
/// queue intermediate events. If several transitions happen between two `next_event()` calls,
/// only the most recent one is returned.
#[derive(Clone)]
pub struct ElectionEventListener {
    election_state_change_listener: ElectionStateChangeListener,
}

impl ElectionEventListener {
    pub(crate) fn new(election_state_change_listener: ElectionStateChangeListener) -> Self {
        ElectionEventListener {
            election_state_change_listener,
        }
    }

    /// `next_event()` waits for the next change. Returns None once the replica has shut down.
    pub async fn next_event(&mut self) -> Option<ElectionEvent> {
        self.election_state_change_listener
            .next()
            .await
            .map(ElectionEvent::from)
    }

    pub fn current(&self) -> ElectionEvent {
        ElectionEvent::from(self.election_state_change_listener.current())
    }
}

// ------- Conversions --------

impl From<ElectionStateSnapshot> for ElectionEvent {
    fn from(election_state: ElectionStateSnapshot) -> Self {
        match election_state {
            ElectionStateSnapshot::Leader => ElectionEvent::Leader,
            ElectionStateSnapshot::Candidate => ElectionEvent::Candidate,
            ElectionStateSnapshot::Follower(leader_id) => ElectionEvent::Follower(FollowerEventData {
                leader_replica_id: leader_id.into_inner(),
            }),
            ElectionStateSnapshot::FollowerNoLeader => ElectionEvent::FollowerNoLeader,
        }
    }
}
