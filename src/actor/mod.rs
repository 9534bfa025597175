use crate::replica;
use crate::server::ShutdownSignal;
use std::error::Error;
use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};

#[cfg(test)]
mod test_utils;

#[cfg(test)]
pub(crate) use test_utils::TestUtilActor;

// All replica election state is owned by a single task. Every check-then-act sequence (vote
// grant, term adoption, tallying votes) runs inside `handle_event()`, so the actor queue is the
// only synchronization point the election logic needs.
#[derive(Debug)]
pub(crate) enum Event {
    // Leader: Step down if candidate's term is newer, then maybe grant vote.
    // Candidate: Step down if candidate's term is newer, then maybe grant vote.
    // Follower: Grant vote if we haven't voted for someone else this term.
    RequestVote(
        replica::RequestVoteInput,
        Callback<replica::RequestVoteOutput, replica::RequestVoteError>,
    ),

    // Leader: discard
    // Candidate: Tally vote. Transition to leader on majority. Retry peer on failure.
    // Follower: discard
    RequestVoteReplyFromPeer(replica::RequestVoteReplyFromPeer),

    // Leader: Reject stale term, otherwise transition to follower of the caller.
    // Candidate: Reject stale term, otherwise transition to follower of the caller.
    // Follower: Reject stale term, otherwise record leader and reset timeout.
    AppendEntry(
        replica::AppendEntryInput,
        Callback<replica::AppendEntryOutput, replica::AppendEntryError>,
    ),

    // Leader: Step down if peer reports a newer term.
    // Candidate: discard
    // Follower: discard
    AppendEntryReplyFromPeer(replica::AppendEntryReplyFromPeer),

    // Leader: Send heartbeat to the peer in the tick.
    // Candidate: discard
    // Follower: discard
    LeaderTimer(replica::LeaderTimerTick),

    // Leader: NOT POSSIBLE - discard
    // Candidate: Start a new election for the next term.
    // Follower: Forget leader if we had one, otherwise start an election.
    FollowerTimeout(replica::FollowerTimeoutTick),
}

#[derive(Debug)]
pub(crate) struct Callback<O: Debug, E: Error>(oneshot::Sender<Result<O, E>>);

impl<O: Debug, E: Error> Callback<O, E> {
    pub(crate) fn send(self, message: Result<O, E>) {
        // Caller may have given up waiting (e.g. rpc cancelled). Nothing to do about it.
        let _ = self.0.send(message);
    }
}

/// ActorClient is the strong handle to the replica actor. The actor exits once every
/// `ActorClient` has been dropped.
#[derive(Clone)]
pub(crate) struct ActorClient {
    sender: mpsc::Sender<Event>,
}

/// WeakActorClient is held by everything the replica itself spawns (timers, peer calls), so
/// those tasks don't keep the actor alive.
#[derive(Clone)]
pub(crate) struct WeakActorClient {
    sender: mpsc::WeakSender<Event>,
}

#[derive(Debug, thiserror::Error)]
#[error("Replica actor has exited")]
pub(crate) struct ActorExited;

impl ActorClient {
    pub(crate) fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (ActorClient { sender: tx }, rx)
    }

    pub(crate) fn weak(&self) -> WeakActorClient {
        WeakActorClient {
            sender: self.sender.downgrade(),
        }
    }

    pub(crate) async fn request_vote(
        &self,
        input: replica::RequestVoteInput,
    ) -> Result<replica::RequestVoteOutput, replica::RequestVoteError> {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Event::RequestVote(input, Callback(tx))).await.is_err() {
            return Err(replica::RequestVoteError::ActorExited);
        }

        rx.await.unwrap_or(Err(replica::RequestVoteError::ActorExited))
    }

    pub(crate) async fn append_entry(
        &self,
        input: replica::AppendEntryInput,
    ) -> Result<replica::AppendEntryOutput, replica::AppendEntryError> {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(Event::AppendEntry(input, Callback(tx))).await.is_err() {
            return Err(replica::AppendEntryError::ActorExited);
        }

        rx.await.unwrap_or(Err(replica::AppendEntryError::ActorExited))
    }
}

impl WeakActorClient {
    pub(crate) async fn notify_request_vote_reply_from_peer(
        &self,
        input: replica::RequestVoteReplyFromPeer,
    ) -> Result<(), ActorExited> {
        self.send(Event::RequestVoteReplyFromPeer(input)).await
    }

    pub(crate) async fn notify_append_entry_reply_from_peer(
        &self,
        input: replica::AppendEntryReplyFromPeer,
    ) -> Result<(), ActorExited> {
        self.send(Event::AppendEntryReplyFromPeer(input)).await
    }

    pub(crate) async fn leader_timer(&self, input: replica::LeaderTimerTick) -> Result<(), ActorExited> {
        self.send(Event::LeaderTimer(input)).await
    }

    pub(crate) async fn follower_timeout(&self, input: replica::FollowerTimeoutTick) -> Result<(), ActorExited> {
        self.send(Event::FollowerTimeout(input)).await
    }

    async fn send(&self, event: Event) -> Result<(), ActorExited> {
        let sender = self.sender.upgrade().ok_or(ActorExited)?;
        sender.send(event).await.map_err(|_| ActorExited)
    }
}

/// ReplicaActor is replica logic in actor model.
pub(crate) struct ReplicaActor<S>
where
    S: replica::PersistentLocalState,
{
    logger: slog::Logger,
    receiver: mpsc::Receiver<Event>,
    replica: replica::Replica<S>,
}

impl<S> ReplicaActor<S>
where
    S: replica::PersistentLocalState + Send + 'static,
{
    pub(crate) fn new(logger: slog::Logger, receiver: mpsc::Receiver<Event>, replica: replica::Replica<S>) -> Self {
        ReplicaActor {
            logger,
            receiver,
            replica,
        }
    }

    pub(crate) async fn run_event_loop(mut self, shutdown_signal: ShutdownSignal) {
        slog::info!(self.logger, "Replica event loop started");
        let shutdown = shutdown_signal.wait();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                opt_event = self.receiver.recv() => match opt_event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                _ = &mut shutdown => break,
            }
        }

        slog::info!(self.logger, "Replica event loop exited");
    }

    // This must NOT be async. Any long running work must be spawned on another task
    // and come back to this actor as an event.
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::RequestVote(input, callback) => {
                let result = self.replica.server_handle_request_vote(input);
                callback.send(result);
            }
            Event::RequestVoteReplyFromPeer(reply) => {
                self.replica.handle_request_vote_reply_from_peer(reply);
            }
            Event::AppendEntry(input, callback) => {
                let result = self.replica.server_handle_append_entry(input);
                callback.send(result);
            }
            Event::AppendEntryReplyFromPeer(reply) => {
                self.replica.handle_append_entry_reply_from_peer(reply);
            }
            Event::LeaderTimer(tick) => {
                self.replica.handle_leader_timer(tick);
            }
            Event::FollowerTimeout(tick) => {
                self.replica.handle_follower_timeout(tick);
            }
        }
    }
}
