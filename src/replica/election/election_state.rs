use crate::actor::WeakActorClient;
use crate::replica::election::leader_state::LeaderStateTracker;
use crate::replica::election::state_change_listener::{self, ElectionStateChangeNotifier};
use crate::replica::election::timers::{FollowerTimerHandle, LeaderTimerHandle};
use crate::replica::election::{ElectionStateChangeListener, ElectionStateSnapshot, PeerState};
use crate::replica::{FollowerTimeoutTick, ReplicaId, Term};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct ElectionConfig {
    pub my_replica_id: ReplicaId,
    pub leader_heartbeat_duration: Duration,
    pub follower_min_timeout: Duration,
    pub follower_max_timeout: Duration,
}

/// ElectionState holds state specific to the replica's role in an election, and the timers that
/// go with that role. Its methods are responsible for "what" to do. It is NOT responsible for
/// validating terms or membership, or knowing "when" to do something.
pub(crate) struct ElectionState {
    state: State,
    config: ElectionConfig,
    actor_client: WeakActorClient,
    state_change_notifier: ElectionStateChangeNotifier,
    // Bumped every time an election timer is created. Identifies the only timer whose
    // timeouts are still meaningful.
    timer_generation: u64,
}

impl ElectionState {
    /// `new_follower()` creates a new ElectionState instance that starts out as a follower with
    /// no known leader.
    pub(crate) fn new_follower(
        config: ElectionConfig,
        actor_client: WeakActorClient,
    ) -> (Self, ElectionStateChangeListener) {
        let timer_generation = 1;
        let initial_state = State::Follower(FollowerState::new(
            None,
            Self::spawn_election_timer(&config, &actor_client, timer_generation),
        ));
        let (notifier, listener) = state_change_listener::new(Self::current_state_impl(&initial_state));

        let election_state = Self {
            state: initial_state,
            config,
            actor_client,
            state_change_notifier: notifier,
            timer_generation,
        };

        (election_state, listener)
    }

    pub(crate) fn transition_to_follower(&mut self, new_leader: Option<ReplicaId>) {
        let timer = self.next_election_timer();
        self.state = State::Follower(FollowerState::new(new_leader, timer));
        self.notify_new_state();
    }

    pub(crate) fn transition_to_candidate_and_vote_for_self(&mut self) {
        let timer = self.next_election_timer();
        let mut cs = CandidateState::new(timer);

        // Vote for self
        cs.add_received_vote(self.config.my_replica_id.clone());

        self.state = State::Candidate(cs);
        self.notify_new_state();
    }

    pub(crate) fn transition_to_leader(&mut self, term: Term, peer_ids: HashSet<ReplicaId>) {
        let mut peer_state = HashMap::with_capacity(peer_ids.len());
        for peer_id in peer_ids {
            let leader_timer_handle = LeaderTimerHandle::spawn_timer_task(
                self.config.leader_heartbeat_duration,
                self.actor_client.clone(),
                peer_id.clone(),
                term,
            );
            peer_state.insert(peer_id, PeerState::new(leader_timer_handle));
        }

        self.state = State::Leader(LeaderState {
            tracker: LeaderStateTracker::new(peer_state),
        });
        self.notify_new_state();
    }

    pub(crate) fn current_state(&self) -> ElectionStateSnapshot {
        Self::current_state_impl(&self.state)
    }

    fn current_state_impl(state: &State) -> ElectionStateSnapshot {
        match state {
            State::Leader(_) => ElectionStateSnapshot::Leader,
            State::Candidate(_) => ElectionStateSnapshot::Candidate,
            State::Follower(FollowerState { leader: None, .. }) => ElectionStateSnapshot::FollowerNoLeader,
            State::Follower(FollowerState {
                leader: Some(leader_id),
                ..
            }) => ElectionStateSnapshot::Follower(leader_id.clone()),
        }
    }

    fn notify_new_state(&self) {
        self.state_change_notifier
            .notify_new_state(Self::current_state_impl(&self.state));
    }

    /// Returns true if `tick` comes from the election timer we currently hold, and that timer
    /// hasn't been reset since raising it.
    pub(crate) fn is_current_election_alert(&self, tick: &FollowerTimeoutTick) -> bool {
        match self.election_timer() {
            Some(timer) => tick.generation == self.timer_generation && timer.is_pending_alert(tick),
            None => false,
        }
    }

    fn election_timer(&self) -> Option<&FollowerTimerHandle> {
        match &self.state {
            State::Leader(_) => None,
            State::Candidate(cs) => Some(&cs.election_timer),
            State::Follower(fs) => Some(&fs.election_timer),
        }
    }

    pub(crate) fn reset_timeout_if_follower(&self) {
        if let State::Follower(fs) = &self.state {
            fs.election_timer.reset_timeout();
        }
    }

    /// Record `leader_id` as leader if we're a follower that believes in a different (or no)
    /// leader. Returns false if we're not a follower.
    pub(crate) fn set_leader_if_follower(&mut self, leader_id: &ReplicaId) -> bool {
        if let State::Follower(fs) = &mut self.state {
            if fs.leader.as_ref() != Some(leader_id) {
                fs.leader.replace(leader_id.clone());
                self.notify_new_state();
            }
            true
        } else {
            false
        }
    }

    /// Return number of votes received if candidate, or None if no longer Candidate.
    pub(crate) fn add_vote_if_candidate(&mut self, vote_from: ReplicaId) -> Option<usize> {
        if let State::Candidate(cs) = &mut self.state {
            Some(cs.add_received_vote(vote_from))
        } else {
            None
        }
    }

    pub(crate) fn is_candidate(&self) -> bool {
        matches!(self.state, State::Candidate(_))
    }

    pub(crate) fn leader_state_mut(&mut self) -> Option<&mut LeaderStateTracker> {
        if let State::Leader(ls) = &mut self.state {
            Some(&mut ls.tracker)
        } else {
            None
        }
    }

    fn next_election_timer(&mut self) -> FollowerTimerHandle {
        self.timer_generation += 1;
        Self::spawn_election_timer(&self.config, &self.actor_client, self.timer_generation)
    }

    fn spawn_election_timer(
        config: &ElectionConfig,
        actor_client: &WeakActorClient,
        generation: u64,
    ) -> FollowerTimerHandle {
        FollowerTimerHandle::spawn_timer_task(
            config.follower_min_timeout,
            config.follower_max_timeout,
            actor_client.clone(),
            generation,
        )
    }

    /// The tick our election timer would raise if it elapsed right now.
    #[cfg(test)]
    pub(crate) fn pending_alert(&self) -> Option<FollowerTimeoutTick> {
        self.election_timer()
            .map(|timer| timer.pending_alert(self.timer_generation))
    }
}

impl fmt::Debug for ElectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Leader(_) => write!(f, "Leader"),
            State::Candidate(cs) => write!(f, "Candidate(Votes={})", cs.received_votes_from.len()),
            State::Follower(FollowerState {
                leader: Some(leader_id),
                ..
            }) => write!(f, "Follower(Leader={:?})", leader_id),
            State::Follower(FollowerState { leader: None, .. }) => write!(f, "Follower(Leader=None)"),
        }
    }
}

enum State {
    Leader(LeaderState),
    Candidate(CandidateState),
    Follower(FollowerState),
}

struct LeaderState {
    tracker: LeaderStateTracker,
}

struct CandidateState {
    received_votes_from: HashSet<ReplicaId>,
    // Fires if this election doesn't conclude in time.
    election_timer: FollowerTimerHandle,
}

struct FollowerState {
    leader: Option<ReplicaId>,
    election_timer: FollowerTimerHandle,
}

impl CandidateState {
    fn new(election_timer: FollowerTimerHandle) -> Self {
        Self {
            received_votes_from: HashSet::with_capacity(3),
            election_timer,
        }
    }

    /// `add_received_vote()` returns the number of unique votes we've received after adding the
    /// provided `vote_from`
    fn add_received_vote(&mut self, vote_from: ReplicaId) -> usize {
        self.received_votes_from.insert(vote_from);
        self.received_votes_from.len()
    }
}

impl FollowerState {
    fn new(leader: Option<ReplicaId>, election_timer: FollowerTimerHandle) -> Self {
        Self { leader, election_timer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorClient;

    fn config() -> ElectionConfig {
        ElectionConfig {
            my_replica_id: ReplicaId::new("127.0.0.1:5001"),
            leader_heartbeat_duration: Duration::from_secs(60),
            follower_min_timeout: Duration::from_secs(300),
            follower_max_timeout: Duration::from_secs(500),
        }
    }

    #[tokio::test]
    async fn transitions_are_published() {
        let (strong_actor_client, _rx) = ActorClient::new(10);
        let (mut election_state, mut listener) = ElectionState::new_follower(config(), strong_actor_client.weak());
        assert_eq!(listener.current(), ElectionStateSnapshot::FollowerNoLeader);

        election_state.transition_to_candidate_and_vote_for_self();
        assert_eq!(listener.next().await, Some(ElectionStateSnapshot::Candidate));

        let leader = ReplicaId::new("127.0.0.1:5002");
        election_state.transition_to_follower(Some(leader.clone()));
        assert_eq!(listener.next().await, Some(ElectionStateSnapshot::Follower(leader)));

        election_state.transition_to_leader(Term::new(4), HashSet::new());
        assert_eq!(listener.next().await, Some(ElectionStateSnapshot::Leader));
    }

    #[tokio::test]
    async fn candidate_counts_unique_votes_including_self() {
        let (strong_actor_client, _rx) = ActorClient::new(10);
        let (mut election_state, _listener) = ElectionState::new_follower(config(), strong_actor_client.weak());
        assert_eq!(election_state.add_vote_if_candidate(ReplicaId::new("127.0.0.1:5002")), None);

        election_state.transition_to_candidate_and_vote_for_self();
        assert_eq!(election_state.add_vote_if_candidate(ReplicaId::new("127.0.0.1:5002")), Some(2));
        assert_eq!(election_state.add_vote_if_candidate(ReplicaId::new("127.0.0.1:5002")), Some(2));
        assert_eq!(election_state.add_vote_if_candidate(ReplicaId::new("127.0.0.1:5003")), Some(3));
    }

    #[tokio::test]
    async fn only_latest_election_timer_is_current() {
        let (strong_actor_client, _rx) = ActorClient::new(10);
        let (mut election_state, _listener) = ElectionState::new_follower(config(), strong_actor_client.weak());
        let first = election_state.pending_alert().unwrap();
        assert!(election_state.is_current_election_alert(&first));

        election_state.transition_to_candidate_and_vote_for_self();
        let second = election_state.pending_alert().unwrap();
        assert!(!election_state.is_current_election_alert(&first));
        assert!(election_state.is_current_election_alert(&second));

        // Leaders have no election timer.
        election_state.transition_to_leader(Term::new(1), HashSet::new());
        assert_eq!(election_state.pending_alert(), None);
        assert!(!election_state.is_current_election_alert(&second));
    }

    #[tokio::test]
    async fn reset_makes_raised_alert_stale() {
        let (strong_actor_client, _rx) = ActorClient::new(10);
        let (election_state, _listener) = ElectionState::new_follower(config(), strong_actor_client.weak());
        let raised = election_state.pending_alert().unwrap();

        election_state.reset_timeout_if_follower();
        assert!(!election_state.is_current_election_alert(&raised));
        assert!(election_state.is_current_election_alert(&election_state.pending_alert().unwrap()));
    }

    #[tokio::test]
    async fn set_leader_only_as_follower() {
        let (strong_actor_client, _rx) = ActorClient::new(10);
        let (mut election_state, listener) = ElectionState::new_follower(config(), strong_actor_client.weak());
        let leader = ReplicaId::new("127.0.0.1:5003");

        assert!(election_state.set_leader_if_follower(&leader));
        assert_eq!(listener.current(), ElectionStateSnapshot::Follower(leader.clone()));

        election_state.transition_to_candidate_and_vote_for_self();
        assert!(!election_state.set_leader_if_follower(&leader));
        assert_eq!(listener.current(), ElectionStateSnapshot::Candidate);
    }
}
