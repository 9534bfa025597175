use crate::actor::WeakActorClient;
use crate::grpc::{
    proto_append_entry_error, proto_append_entry_result, proto_request_vote_error, proto_request_vote_result,
    ProtoAppendEntryReq, ProtoAppendEntryResult, ProtoRequestVoteReq, ProtoRequestVoteResult,
};
use crate::replica::election::{ElectionState, ElectionStateSnapshot};
use crate::replica::local_state::{PersistentLocalState, Term};
use crate::replica::peer_client::{PeerCallError, PeerClients};
use crate::replica::peers::{ClusterTracker, ReplicaId};
use crate::replica::replica_api::{
    AppendEntryError, AppendEntryInput, AppendEntryOutput, AppendEntryReplyFromPeer, AppendEntryReplyFromPeerError,
    FollowerTimeoutTick, LeaderTimerTick, RequestVoteError, RequestVoteInput, RequestVoteOutput,
    RequestVoteReplyFromPeer, RequestVoteResult, TermOutOfDateInfo,
};
use tokio::time::Duration;

pub(crate) struct ReplicaConfig<S>
where
    S: PersistentLocalState,
{
    pub logger: slog::Logger,
    pub cluster_tracker: ClusterTracker,
    pub local_state: S,
    pub election_state: ElectionState,
    pub actor_client: WeakActorClient,
    pub peer_clients: PeerClients,
    pub vote_retry_interval: Duration,
}

/// Replica is the election state machine of one metadata replica. It is only ever driven by the
/// replica actor, one event at a time, so none of its methods are async. Anything that needs to
/// wait (peer calls, retries) is spawned and reports back to the actor as a new event.
pub(crate) struct Replica<S>
where
    S: PersistentLocalState,
{
    logger: slog::Logger,
    my_replica_id: ReplicaId,
    cluster_tracker: ClusterTracker,
    local_state: S,
    election_state: ElectionState,
    actor_client: WeakActorClient,
    peer_clients: PeerClients,
    vote_retry_interval: Duration,
}

impl<S> Replica<S>
where
    S: PersistentLocalState,
{
    pub(crate) fn new(config: ReplicaConfig<S>) -> Self {
        Replica {
            logger: config.logger,
            my_replica_id: config.cluster_tracker.my_replica_id().clone(),
            cluster_tracker: config.cluster_tracker,
            local_state: config.local_state,
            election_state: config.election_state,
            actor_client: config.actor_client,
            peer_clients: config.peer_clients,
            vote_retry_interval: config.vote_retry_interval,
        }
    }

    pub(crate) fn server_handle_request_vote(
        &mut self,
        input: RequestVoteInput,
    ) -> Result<RequestVoteOutput, RequestVoteError> {
        if !self.cluster_tracker.contains_member(&input.candidate_id) {
            return Err(RequestVoteError::CandidateNotInCluster);
        }

        // Read our local term/vote state as 1 atomic action.
        let (current_term, mut opt_voted_for) = self.local_state.voted_for_current_term();

        if input.candidate_term < current_term {
            slog::info!(
                self.logger,
                "Not granting vote to {:?}. Candidate term {:?} is behind ours {:?}.",
                input.candidate_id,
                input.candidate_term,
                current_term
            );
            return Ok(RequestVoteOutput { vote_granted: false });
        }

        // Newer term: adopt it, forget any leader, and step down regardless of role.
        if self.local_state.store_term_if_increased(input.candidate_term) {
            self.election_state.transition_to_follower(None);
            slog::info!(
                self.logger,
                "Observed term {:?} in RequestVote. Transitioned to follower.",
                input.candidate_term
            );
            opt_voted_for = None;
        }

        if let Some(voted_for) = opt_voted_for {
            if *voted_for == input.candidate_id {
                // Candidate retried a call we've already answered.
                slog::info!(self.logger, "Re-granting vote to {:?}.", input.candidate_id);
                self.election_state.reset_timeout_if_follower();
                return Ok(RequestVoteOutput { vote_granted: true });
            }

            slog::info!(self.logger, "Not granting vote. We already voted for {:?}.", voted_for);
            return Ok(RequestVoteOutput { vote_granted: false });
        }

        let granted = self
            .local_state
            .store_vote_for_term_if_unvoted(input.candidate_term, input.candidate_id.clone());
        if granted {
            slog::info!(
                self.logger,
                "Voting for {:?} in term {:?}.",
                input.candidate_id,
                input.candidate_term
            );
            // Give the candidate a chance to win before we start competing with it.
            self.election_state.reset_timeout_if_follower();
        }

        Ok(RequestVoteOutput { vote_granted: granted })
    }

    pub(crate) fn handle_request_vote_reply_from_peer(&mut self, reply: RequestVoteReplyFromPeer) {
        let current_term = self.local_state.current_term();
        if current_term != reply.term {
            slog::info!(
                self.logger,
                "Received vote for outdated term {:?}, current term: {:?}.",
                reply.term,
                current_term,
            );
            return;
        }

        match reply.result {
            RequestVoteResult::VoteGranted => {
                let num_votes_received = match self.election_state.add_vote_if_candidate(reply.peer_id) {
                    Some(v) => v,
                    None => {
                        slog::info!(
                            self.logger,
                            "Received vote for term {:?} after transitioning to election state: {:?}",
                            reply.term,
                            self.election_state,
                        );
                        return;
                    }
                };

                slog::info!(
                    self.logger,
                    "Received {}/{} votes for term {:?}",
                    num_votes_received,
                    self.cluster_tracker.num_voting_replicas(),
                    reply.term,
                );
                self.transition_to_leader_if_majority(reply.term, num_votes_received);
            }
            RequestVoteResult::VoteNotGranted => {
                slog::info!(
                    self.logger,
                    "Vote not granted from {:?} for term {:?}",
                    reply.peer_id,
                    reply.term,
                );
            }
            RequestVoteResult::RetryableFailure => {
                if !self.election_state.is_candidate() {
                    return;
                }
                if !self.cluster_tracker.contains_member(&reply.peer_id) {
                    slog::error!(self.logger, "Peer {:?} not found while retrying RequestVote", reply.peer_id);
                    return;
                }
                tokio::task::spawn(call_peer_request_vote(
                    self.logger.clone(),
                    self.peer_clients.clone(),
                    reply.peer_id,
                    self.new_request_vote_request(reply.term),
                    self.actor_client.clone(),
                    reply.term,
                    Some(self.vote_retry_interval),
                ));
            }
        }
    }

    /// Majority means strictly more than half of all voting replicas, me included.
    fn get_majority_vote_count(num_voting_replicas: usize) -> usize {
        (num_voting_replicas / 2) + 1
    }

    fn transition_to_leader_if_majority(&mut self, term: Term, num_votes_received: usize) {
        if num_votes_received >= Self::get_majority_vote_count(self.cluster_tracker.num_voting_replicas()) {
            self.election_state
                .transition_to_leader(term, self.cluster_tracker.peer_ids());
            slog::info!(self.logger, "Won election for term {:?}. Now leader.", term);
        }
    }

    pub(crate) fn server_handle_append_entry(
        &mut self,
        input: AppendEntryInput,
    ) -> Result<AppendEntryOutput, AppendEntryError> {
        if !self.cluster_tracker.contains_member(&input.leader_id) {
            return Err(AppendEntryError::ClientNotInCluster);
        }

        let current_term = self.local_state.current_term();
        if input.leader_term < current_term {
            slog::info!(
                self.logger,
                "Rejecting heartbeat from {:?}. Its term {:?} is behind ours {:?}.",
                input.leader_id,
                input.leader_term,
                current_term
            );
            return Err(AppendEntryError::ClientTermOutOfDate(TermOutOfDateInfo { current_term }));
        }

        let increased = self.local_state.store_term_if_increased(input.leader_term);
        if increased || !self.election_state.set_leader_if_follower(&input.leader_id) {
            // Either a newer term, or a leader emerged for the term we're campaigning in.
            self.election_state
                .transition_to_follower(Some(input.leader_id.clone()));
            slog::info!(
                self.logger,
                "Following {:?} in term {:?}.",
                input.leader_id,
                input.leader_term
            );
        } else {
            self.election_state.reset_timeout_if_follower();
        }

        Ok(AppendEntryOutput {})
    }

    pub(crate) fn handle_append_entry_reply_from_peer(&mut self, reply: AppendEntryReplyFromPeer) {
        let logger = self
            .logger
            .new(slog::o!("Peer" => reply.peer_id.to_string(), "SeqNo" => reply.seq_no));
        slog::debug!(logger, "AE reply from peer result: {:?}", reply.result);

        let current_term = self.local_state.current_term();
        if current_term != reply.term {
            slog::info!(
                logger,
                "Received AE reply for outdated term {:?}, but we're on term {:?}",
                reply.term,
                current_term
            );
            return;
        }

        let peer_state = match self.election_state.leader_state_mut() {
            Some(leader_state) => match leader_state.peer_state_mut(&reply.peer_id) {
                Some(peer_state) => peer_state,
                None => {
                    slog::warn!(logger, "Peer not found while handling AE reply");
                    return;
                }
            },
            None => {
                slog::info!(logger, "No longer leader");
                return;
            }
        };

        if !peer_state.ratchet_fwd_received_seq_no(reply.seq_no) {
            slog::info!(logger, "Dropping stale AE reply");
            return;
        }

        match reply.result {
            Ok(_) => slog::debug!(logger, "Successful AE reply"),
            Err(AppendEntryReplyFromPeerError::RetryableFailure(err_msg)) => {
                // Next heartbeat is the retry.
                slog::debug!(logger, "AE failure: {}", err_msg);
            }
            Err(AppendEntryReplyFromPeerError::StaleTerm { new_term }) => {
                if self.local_state.store_term_if_increased(new_term) {
                    self.election_state.transition_to_follower(None);
                    slog::info!(logger, "Peer is on newer term {:?}. Transitioned to follower.", new_term);
                } else {
                    slog::warn!(
                        logger,
                        "Peer reported stale term, but its term {:?} isn't newer than ours.",
                        new_term
                    );
                }
            }
        }
    }

    pub(crate) fn handle_leader_timer(&mut self, tick: LeaderTimerTick) {
        let current_term = self.local_state.current_term();
        if current_term != tick.term {
            slog::debug!(
                self.logger,
                "Received leader heartbeat for outdated term {:?}, current term: {:?}",
                tick.term,
                current_term
            );
            return;
        }

        let peer_state = match self.election_state.leader_state_mut() {
            Some(leader_state) => match leader_state.peer_state_mut(&tick.peer_id) {
                Some(peer_state) => peer_state,
                None => {
                    slog::error!(self.logger, "Missing peer {:?} in LeaderStateTracker", tick.peer_id);
                    return;
                }
            },
            None => {
                slog::debug!(self.logger, "Received leader timer event but no longer leader.");
                return;
            }
        };

        if peer_state.has_outstanding_request() {
            slog::warn!(self.logger, "Previous heartbeat to {:?} still in flight", tick.peer_id);
            return;
        }

        let seq_no = peer_state.next_seq_no();
        peer_state.reset_heartbeat_timer();

        let request = ProtoAppendEntryReq {
            client_node_id: self.my_replica_id.clone().into_inner(),
            term: current_term.as_u64(),
        };
        tokio::task::spawn(call_peer_append_entry(
            self.logger.clone(),
            self.peer_clients.clone(),
            request,
            self.actor_client.clone(),
            tick.peer_id,
            current_term,
            seq_no,
        ));
    }

    pub(crate) fn handle_follower_timeout(&mut self, tick: FollowerTimeoutTick) {
        if !self.election_state.is_current_election_alert(&tick) {
            slog::debug!(self.logger, "Discarding stale election timeout {:?}", tick);
            return;
        }

        match self.election_state.current_state() {
            ElectionStateSnapshot::Follower(leader_id) => {
                self.election_state.transition_to_follower(None);
                slog::info!(self.logger, "Lost heartbeat from leader {:?}. Forgot leader.", leader_id);
            }
            ElectionStateSnapshot::FollowerNoLeader | ElectionStateSnapshot::Candidate => {
                self.start_election();
            }
            ElectionStateSnapshot::Leader => {
                slog::warn!(self.logger, "Leader received election timeout. Ignoring.");
            }
        }
    }

    fn start_election(&mut self) {
        // Vote for self on local state before transitioning to candidate.
        let new_term = self.local_state.increment_term_and_vote_for_self();
        self.election_state.transition_to_candidate_and_vote_for_self();
        slog::info!(
            self.logger,
            "Started election for term {:?}. Election state: {:?}",
            new_term,
            self.election_state,
        );

        // Single replica cluster wins on its own vote.
        self.transition_to_leader_if_majority(new_term, 1);

        for peer_id in self.cluster_tracker.iter_peers() {
            tokio::task::spawn(call_peer_request_vote(
                self.logger.clone(),
                self.peer_clients.clone(),
                peer_id.clone(),
                self.new_request_vote_request(new_term),
                self.actor_client.clone(),
                new_term,
                None,
            ));
        }
    }

    fn new_request_vote_request(&self, term: Term) -> ProtoRequestVoteReq {
        ProtoRequestVoteReq {
            client_node_id: self.my_replica_id.clone().into_inner(),
            term: term.as_u64(),
        }
    }
}

async fn call_peer_request_vote(
    logger: slog::Logger,
    peer_clients: PeerClients,
    peer_id: ReplicaId,
    rpc_request: ProtoRequestVoteReq,
    callback: WeakActorClient,
    term: Term,
    delay: Option<Duration>,
) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    slog::debug!(logger, "ClientWire - {:?} - {:?}", peer_id, rpc_request);
    let rpc_reply = peer_clients.request_vote(&peer_id, rpc_request).await;
    slog::debug!(logger, "ClientWire - {:?} - {:?}", peer_id, rpc_reply);

    let callback_input = RequestVoteReplyFromPeer {
        peer_id,
        term,
        result: convert_request_vote_rpc_reply(&logger, rpc_reply),
    };

    // Actor is gone if this fails. Nobody left to tell.
    let _ = callback.notify_request_vote_reply_from_peer(callback_input).await;
}

fn convert_request_vote_rpc_reply(
    logger: &slog::Logger,
    rpc_reply: Result<ProtoRequestVoteResult, PeerCallError>,
) -> RequestVoteResult {
    match rpc_reply {
        Ok(rpc_result) => match rpc_result.result {
            Some(proto_request_vote_result::Result::Ok(success_reply)) => {
                if success_reply.vote_granted {
                    RequestVoteResult::VoteGranted
                } else {
                    RequestVoteResult::VoteNotGranted
                }
            }
            Some(proto_request_vote_result::Result::Err(err)) => match err.err {
                Some(proto_request_vote_error::Err::ServerFault(fault)) => {
                    slog::warn!(logger, "RequestVote Service Fault: {:?}", fault.message);
                    RequestVoteResult::RetryableFailure
                }
                None => {
                    slog::warn!(logger, "Malformed RequestVote Err");
                    RequestVoteResult::RetryableFailure
                }
            },
            None => {
                slog::warn!(logger, "Malformed RequestVote Result");
                RequestVoteResult::RetryableFailure
            }
        },
        Err(e) => {
            slog::info!(logger, "RequestVote call failed: {}", e);
            RequestVoteResult::RetryableFailure
        }
    }
}

async fn call_peer_append_entry(
    logger: slog::Logger,
    peer_clients: PeerClients,
    rpc_request: ProtoAppendEntryReq,
    callback: WeakActorClient,
    peer_id: ReplicaId,
    term: Term,
    seq_no: u64,
) {
    slog::debug!(logger, "ClientWire - {:?} - {:?}", peer_id, rpc_request);
    let rpc_reply = peer_clients.append_entry(&peer_id, rpc_request).await;
    slog::debug!(logger, "ClientWire - {:?} - {:?}", peer_id, rpc_reply);

    let callback_input = AppendEntryReplyFromPeer {
        peer_id,
        term,
        seq_no,
        result: convert_append_entry_rpc_reply(rpc_reply),
    };

    let _ = callback.notify_append_entry_reply_from_peer(callback_input).await;
}

fn convert_append_entry_rpc_reply(
    rpc_reply: Result<ProtoAppendEntryResult, PeerCallError>,
) -> Result<(), AppendEntryReplyFromPeerError> {
    match rpc_reply {
        Ok(rpc_result) => match rpc_result.result {
            Some(proto_append_entry_result::Result::Ok(_)) => Ok(()),
            Some(proto_append_entry_result::Result::Err(err)) => match err.err {
                Some(proto_append_entry_error::Err::ServerFault(payload)) => Err(
                    AppendEntryReplyFromPeerError::RetryableFailure(format!("Explicit server fault: {:?}", payload.message)),
                ),
                Some(proto_append_entry_error::Err::StaleTerm(payload)) => Err(AppendEntryReplyFromPeerError::StaleTerm {
                    new_term: Term::new(payload.current_term),
                }),
                Some(proto_append_entry_error::Err::ClientNotInCluster(_)) => {
                    // Retry in case peer's membership is out of date. Not expecting this in practice.
                    Err(AppendEntryReplyFromPeerError::RetryableFailure(
                        "Peer doesn't think we're in the cluster".into(),
                    ))
                }
                None => Err(AppendEntryReplyFromPeerError::RetryableFailure(
                    "Malformed AppendEntry Err".into(),
                )),
            },
            None => Err(AppendEntryReplyFromPeerError::RetryableFailure(
                "Malformed AppendEntry Result".into(),
            )),
        },
        Err(e) => Err(AppendEntryReplyFromPeerError::RetryableFailure(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorClient;
    use crate::actor::Event;
    use crate::replica::election::ElectionConfig;
    use crate::replica::VolatileLocalState;
    use tokio::sync::mpsc;

    const A: &str = "127.0.0.1:1";
    const B: &str = "127.0.0.1:2";
    const C: &str = "127.0.0.1:3";

    struct Harness {
        replica: Replica<VolatileLocalState>,
        // Kept so the weak actor client stays usable.
        _actor_client: ActorClient,
        _rx: mpsc::Receiver<Event>,
    }

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    fn create_replica(me: &str, members: &[&str]) -> Harness {
        let (actor_client, rx) = ActorClient::new(100);
        let my_replica_id = ReplicaId::new(me);
        let cluster_tracker =
            ClusterTracker::create_valid_cluster(my_replica_id.clone(), members.iter().map(|m| ReplicaId::new(*m)))
                .unwrap();
        let (election_state, _listener) = ElectionState::new_follower(
            ElectionConfig {
                my_replica_id: my_replica_id.clone(),
                // Long enough that no timer fires during a test.
                leader_heartbeat_duration: Duration::from_secs(60),
                follower_min_timeout: Duration::from_secs(300),
                follower_max_timeout: Duration::from_secs(500),
            },
            actor_client.weak(),
        );

        let replica = Replica::new(ReplicaConfig {
            logger: test_logger(),
            cluster_tracker,
            local_state: VolatileLocalState::new(my_replica_id),
            election_state,
            actor_client: actor_client.weak(),
            peer_clients: PeerClients::new(Duration::from_millis(50)),
            vote_retry_interval: Duration::from_secs(60),
        });

        Harness {
            replica,
            _actor_client: actor_client,
            _rx: rx,
        }
    }

    fn time_out(replica: &mut Replica<VolatileLocalState>) {
        let tick = replica.election_state.pending_alert().unwrap();
        replica.handle_follower_timeout(tick);
    }

    fn vote_request(term: u64, candidate: &str) -> RequestVoteInput {
        RequestVoteInput {
            candidate_term: Term::new(term),
            candidate_id: ReplicaId::new(candidate),
        }
    }

    fn heartbeat(term: u64, leader: &str) -> AppendEntryInput {
        AppendEntryInput {
            leader_term: Term::new(term),
            leader_id: ReplicaId::new(leader),
        }
    }

    fn vote_reply(term: u64, peer: &str, result: RequestVoteResult) -> RequestVoteReplyFromPeer {
        RequestVoteReplyFromPeer {
            peer_id: ReplicaId::new(peer),
            term: Term::new(term),
            result,
        }
    }

    #[test]
    fn majority_vote_count() {
        type Repl = Replica<VolatileLocalState>;
        assert_eq!(Repl::get_majority_vote_count(1), 1);
        assert_eq!(Repl::get_majority_vote_count(2), 2);
        assert_eq!(Repl::get_majority_vote_count(3), 2);
        assert_eq!(Repl::get_majority_vote_count(4), 3);
        assert_eq!(Repl::get_majority_vote_count(5), 3);
    }

    #[tokio::test]
    async fn three_replicas_elect_first_to_time_out() {
        let cluster = [A, B, C];
        let mut a = create_replica(A, &cluster);
        let mut b = create_replica(B, &cluster);
        let mut c = create_replica(C, &cluster);

        // A times out first and campaigns for term 1.
        time_out(&mut a.replica);
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Candidate);
        assert_eq!(a.replica.local_state.current_term(), Term::new(1));

        // B and C grant.
        let b_vote = b.replica.server_handle_request_vote(vote_request(1, A)).unwrap();
        let c_vote = c.replica.server_handle_request_vote(vote_request(1, A)).unwrap();
        assert!(b_vote.vote_granted);
        assert!(c_vote.vote_granted);

        // 2 of 3 is a majority.
        a.replica
            .handle_request_vote_reply_from_peer(vote_reply(1, B, RequestVoteResult::VoteGranted));
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Leader);

        // Late vote changes nothing.
        a.replica
            .handle_request_vote_reply_from_peer(vote_reply(1, C, RequestVoteResult::VoteGranted));
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Leader);

        // Heartbeats make B and C followers of A.
        b.replica.server_handle_append_entry(heartbeat(1, A)).unwrap();
        c.replica.server_handle_append_entry(heartbeat(1, A)).unwrap();
        assert_eq!(
            b.replica.election_state.current_state(),
            ElectionStateSnapshot::Follower(ReplicaId::new(A))
        );
        assert_eq!(
            c.replica.election_state.current_state(),
            ElectionStateSnapshot::Follower(ReplicaId::new(A))
        );
    }

    #[tokio::test]
    async fn one_vote_per_term() {
        let mut b = create_replica(B, &[A, B, C]);

        assert!(b.replica.server_handle_request_vote(vote_request(1, A)).unwrap().vote_granted);
        assert!(!b.replica.server_handle_request_vote(vote_request(1, C)).unwrap().vote_granted);

        // Retry from the candidate we voted for.
        assert!(b.replica.server_handle_request_vote(vote_request(1, A)).unwrap().vote_granted);

        // Newer term resets the vote.
        assert!(b.replica.server_handle_request_vote(vote_request(2, C)).unwrap().vote_granted);
        assert_eq!(b.replica.local_state.current_term(), Term::new(2));
    }

    #[tokio::test]
    async fn stale_vote_request_is_denied() {
        let mut b = create_replica(B, &[A, B, C]);
        b.replica.server_handle_append_entry(heartbeat(5, A)).unwrap();

        let output = b.replica.server_handle_request_vote(vote_request(4, C)).unwrap();
        assert!(!output.vote_granted);
        assert_eq!(b.replica.local_state.current_term(), Term::new(5));
    }

    #[tokio::test]
    async fn unknown_replicas_are_rejected() {
        let mut b = create_replica(B, &[A, B, C]);
        let stranger = "127.0.0.1:9";

        assert!(matches!(
            b.replica.server_handle_request_vote(vote_request(1, stranger)),
            Err(RequestVoteError::CandidateNotInCluster)
        ));
        assert!(matches!(
            b.replica.server_handle_append_entry(heartbeat(1, stranger)),
            Err(AppendEntryError::ClientNotInCluster)
        ));
        assert_eq!(b.replica.local_state.current_term(), Term::new(0));
    }

    #[tokio::test]
    async fn leader_steps_down_on_higher_term() {
        let mut a = create_replica(A, &[A, B, C]);
        time_out(&mut a.replica);
        a.replica
            .handle_request_vote_reply_from_peer(vote_reply(1, B, RequestVoteResult::VoteGranted));
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Leader);

        let output = a.replica.server_handle_request_vote(vote_request(3, C)).unwrap();
        assert!(output.vote_granted);
        assert_eq!(a.replica.local_state.current_term(), Term::new(3));
        assert_eq!(
            a.replica.election_state.current_state(),
            ElectionStateSnapshot::FollowerNoLeader
        );
    }

    #[tokio::test]
    async fn candidate_follows_leader_of_same_term() {
        let mut a = create_replica(A, &[A, B, C]);
        time_out(&mut a.replica);
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Candidate);

        a.replica.server_handle_append_entry(heartbeat(1, C)).unwrap();
        assert_eq!(
            a.replica.election_state.current_state(),
            ElectionStateSnapshot::Follower(ReplicaId::new(C))
        );
    }

    #[tokio::test]
    async fn stale_heartbeat_is_rejected() {
        let mut b = create_replica(B, &[A, B, C]);
        b.replica.server_handle_append_entry(heartbeat(3, A)).unwrap();

        match b.replica.server_handle_append_entry(heartbeat(2, C)) {
            Err(AppendEntryError::ClientTermOutOfDate(info)) => assert_eq!(info.current_term, Term::new(3)),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(
            b.replica.election_state.current_state(),
            ElectionStateSnapshot::Follower(ReplicaId::new(A))
        );
    }

    #[tokio::test]
    async fn follower_forgets_leader_then_campaigns() {
        let mut b = create_replica(B, &[A, B, C]);
        b.replica.server_handle_append_entry(heartbeat(1, A)).unwrap();

        // First timeout only forgets the leader.
        time_out(&mut b.replica);
        assert_eq!(
            b.replica.election_state.current_state(),
            ElectionStateSnapshot::FollowerNoLeader
        );
        assert_eq!(b.replica.local_state.current_term(), Term::new(1));

        // Second one starts an election.
        time_out(&mut b.replica);
        assert_eq!(b.replica.election_state.current_state(), ElectionStateSnapshot::Candidate);
        assert_eq!(b.replica.local_state.current_term(), Term::new(2));

        // Timing out as candidate starts another one.
        time_out(&mut b.replica);
        assert_eq!(b.replica.local_state.current_term(), Term::new(3));
    }

    #[tokio::test]
    async fn timeout_from_replaced_timer_is_discarded() {
        let mut a = create_replica(A, &[A, B, C]);
        let stale_tick = a.replica.election_state.pending_alert().unwrap();
        time_out(&mut a.replica);
        assert_eq!(a.replica.local_state.current_term(), Term::new(1));

        a.replica.handle_follower_timeout(stale_tick);
        assert_eq!(a.replica.local_state.current_term(), Term::new(1));
    }

    #[tokio::test]
    async fn timeout_raised_before_heartbeat_is_discarded() {
        let mut b = create_replica(B, &[A, B, C]);
        b.replica.server_handle_append_entry(heartbeat(1, A)).unwrap();

        // Timer elapses and queues a timeout, but a heartbeat is processed ahead of it.
        let queued_tick = b.replica.election_state.pending_alert().unwrap();
        b.replica.server_handle_append_entry(heartbeat(1, A)).unwrap();

        b.replica.handle_follower_timeout(queued_tick);
        assert_eq!(
            b.replica.election_state.current_state(),
            ElectionStateSnapshot::Follower(ReplicaId::new(A))
        );
    }

    #[tokio::test]
    async fn timeout_raised_before_granting_vote_is_discarded() {
        let mut b = create_replica(B, &[A, B, C]);
        let queued_tick = b.replica.election_state.pending_alert().unwrap();

        // Granting a vote resets the timer.
        assert!(b.replica.server_handle_request_vote(vote_request(1, A)).unwrap().vote_granted);

        b.replica.handle_follower_timeout(queued_tick);
        assert_eq!(
            b.replica.election_state.current_state(),
            ElectionStateSnapshot::FollowerNoLeader
        );
        assert_eq!(b.replica.local_state.current_term(), Term::new(1));
    }

    #[tokio::test]
    async fn leader_steps_down_on_higher_term_heartbeat() {
        let mut a = create_replica(A, &[A, B, C]);
        time_out(&mut a.replica);
        a.replica
            .handle_request_vote_reply_from_peer(vote_reply(1, B, RequestVoteResult::VoteGranted));
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Leader);

        a.replica.server_handle_append_entry(heartbeat(2, C)).unwrap();
        assert_eq!(a.replica.local_state.current_term(), Term::new(2));
        assert_eq!(
            a.replica.election_state.current_state(),
            ElectionStateSnapshot::Follower(ReplicaId::new(C))
        );
    }

    #[tokio::test]
    async fn candidate_steps_down_on_higher_term_vote_request() {
        let mut a = create_replica(A, &[A, B, C]);
        time_out(&mut a.replica);
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Candidate);

        let output = a.replica.server_handle_request_vote(vote_request(2, C)).unwrap();
        assert!(output.vote_granted);
        assert_eq!(a.replica.local_state.current_term(), Term::new(2));
        assert_eq!(
            a.replica.election_state.current_state(),
            ElectionStateSnapshot::FollowerNoLeader
        );
    }

    #[tokio::test]
    async fn campaign_at_largest_term_does_not_overflow() {
        let mut b = create_replica(B, &[A, B, C]);
        b.replica.server_handle_append_entry(heartbeat(u64::MAX, A)).unwrap();

        // Forget leader, then campaign.
        time_out(&mut b.replica);
        time_out(&mut b.replica);
        assert_eq!(b.replica.election_state.current_state(), ElectionStateSnapshot::Candidate);
        assert_eq!(b.replica.local_state.current_term(), Term::new(u64::MAX));
    }

    #[tokio::test]
    async fn vote_for_old_term_is_ignored() {
        let mut a = create_replica(A, &[A, B, C]);
        time_out(&mut a.replica);
        time_out(&mut a.replica);
        assert_eq!(a.replica.local_state.current_term(), Term::new(2));

        a.replica
            .handle_request_vote_reply_from_peer(vote_reply(1, B, RequestVoteResult::VoteGranted));
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Candidate);
    }

    #[tokio::test]
    async fn single_replica_cluster_elects_itself() {
        let mut a = create_replica(A, &[A]);
        time_out(&mut a.replica);
        assert_eq!(a.replica.election_state.current_state(), ElectionStateSnapshot::Leader);
    }

    #[tokio::test]
    async fn leader_steps_down_on_stale_term_reply() {
        let mut a = create_replica(A, &[A, B, C]);
        time_out(&mut a.replica);
        a.replica
            .handle_request_vote_reply_from_peer(vote_reply(1, B, RequestVoteResult::VoteGranted));

        let seq_no = a
            .replica
            .election_state
            .leader_state_mut()
            .and_then(|ls| ls.peer_state_mut(&ReplicaId::new(C)))
            .map(|ps| ps.next_seq_no())
            .unwrap();

        a.replica.handle_append_entry_reply_from_peer(AppendEntryReplyFromPeer {
            peer_id: ReplicaId::new(C),
            term: Term::new(1),
            seq_no,
            result: Err(AppendEntryReplyFromPeerError::StaleTerm { new_term: Term::new(4) }),
        });

        assert_eq!(a.replica.local_state.current_term(), Term::new(4));
        assert_eq!(
            a.replica.election_state.current_state(),
            ElectionStateSnapshot::FollowerNoLeader
        );
    }
}
