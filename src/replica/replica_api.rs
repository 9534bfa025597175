use crate::replica::local_state::Term;
use crate::replica::peers::ReplicaId;

#[derive(Debug)]
pub(crate) struct RequestVoteInput {
    pub(crate) candidate_term: Term,
    pub(crate) candidate_id: ReplicaId,
}

#[derive(Debug)]
pub(crate) struct RequestVoteOutput {
    pub(crate) vote_granted: bool,
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum RequestVoteError {
    #[error("Requesting candidate is not in the cluster")]
    CandidateNotInCluster,
    #[error("We (server) are unavailable because actor is dead RIP")]
    ActorExited,
}

/// AppendEntryInput is a leader heartbeat. There are no log entries in it.
#[derive(Debug)]
pub(crate) struct AppendEntryInput {
    pub(crate) leader_term: Term,
    pub(crate) leader_id: ReplicaId,
}

#[derive(Debug)]
pub(crate) struct AppendEntryOutput {
    // Nothing
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum AppendEntryError {
    #[error("Client is not in cluster")]
    ClientNotInCluster,
    #[error("Client's term is out of date")]
    ClientTermOutOfDate(TermOutOfDateInfo),
    #[error("We (server) are unavailable because actor is dead RIP")]
    ActorExited,
}

#[derive(Debug)]
pub(crate) struct TermOutOfDateInfo {
    pub(crate) current_term: Term,
}

#[derive(Debug)]
pub(crate) struct RequestVoteReplyFromPeer {
    pub(crate) peer_id: ReplicaId,
    pub(crate) term: Term,
    pub(crate) result: RequestVoteResult,
}

#[derive(Debug, PartialEq)]
pub(crate) enum RequestVoteResult {
    VoteGranted,
    VoteNotGranted,
    RetryableFailure,
}

#[derive(Debug)]
pub(crate) struct AppendEntryReplyFromPeer {
    pub(crate) peer_id: ReplicaId,
    pub(crate) term: Term,
    pub(crate) seq_no: u64,
    pub(crate) result: Result<(), AppendEntryReplyFromPeerError>,
}

#[derive(Debug)]
pub(crate) enum AppendEntryReplyFromPeerError {
    StaleTerm { new_term: Term },
    // Unreachable, timed out, or otherwise unusable reply. Heartbeat wasn't delivered.
    RetryableFailure(String),
}

/// LeaderTimerTick contains info for a single tick of a leader's per-peer timer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LeaderTimerTick {
    pub(crate) peer_id: ReplicaId,
    pub(crate) term: Term,
}

/// FollowerTimeoutTick is raised by an election timer. `generation` identifies which timer raised
/// it, so that a tick from a timer we've since replaced can be discarded. `reset_epoch` identifies
/// which countdown of that timer elapsed, so that a tick from before a reset is discarded too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FollowerTimeoutTick {
    pub(crate) generation: u64,
    pub(crate) reset_epoch: u64,
}
