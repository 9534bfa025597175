use crate::actor::WeakActorClient;
use crate::replica::election::{ElectionConfig, ElectionState, ElectionStateChangeListener};
use crate::replica::peer_client::PeerClients;
use crate::replica::peers::InvalidCluster;
use crate::replica::{ClusterTracker, Replica, ReplicaConfig, ReplicaId, VolatileLocalState};
use std::time::Duration;

pub(crate) struct ReplicaTimings {
    pub leader_heartbeat_duration: Duration,
    pub follower_min_timeout: Duration,
    pub follower_max_timeout: Duration,
    pub peer_rpc_timeout: Duration,
}

pub(crate) fn create_replica(
    logger: slog::Logger,
    my_replica_id: ReplicaId,
    cluster_members: Vec<ReplicaId>,
    actor_client: WeakActorClient,
    timings: ReplicaTimings,
) -> Result<(Replica<VolatileLocalState>, ElectionStateChangeListener), InvalidCluster> {
    let cluster_tracker = ClusterTracker::create_valid_cluster(my_replica_id.clone(), cluster_members)?;

    let (election_state, election_state_change_listener) = ElectionState::new_follower(
        ElectionConfig {
            my_replica_id: my_replica_id.clone(),
            leader_heartbeat_duration: timings.leader_heartbeat_duration,
            follower_min_timeout: timings.follower_min_timeout,
            follower_max_timeout: timings.follower_max_timeout,
        },
        actor_client.clone(),
    );

    let replica = Replica::new(ReplicaConfig {
        logger,
        cluster_tracker,
        local_state: VolatileLocalState::new(my_replica_id),
        election_state,
        actor_client,
        peer_clients: PeerClients::new(timings.peer_rpc_timeout),
        // A failed vote request is retried no sooner than the next heartbeat would be.
        vote_retry_interval: timings.leader_heartbeat_duration,
    });

    Ok((replica, election_state_change_listener))
}
