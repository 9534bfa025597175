mod election;
mod local_state;
mod peer_client;
mod peers;
mod replica;
mod replica_api;
mod replica_wiring;

pub(crate) use election::ElectionStateChangeListener;
pub(crate) use election::ElectionStateSnapshot;
pub(crate) use local_state::PersistentLocalState;
pub use local_state::Term;
pub(crate) use local_state::VolatileLocalState;
pub(crate) use peers::ClusterTracker;
pub(crate) use peers::InvalidCluster;
pub use peers::ReplicaId;
pub(crate) use replica::Replica;
pub(crate) use replica::ReplicaConfig;
pub(crate) use replica_api::*;
pub(crate) use replica_wiring::create_replica;
pub(crate) use replica_wiring::ReplicaTimings;

#[cfg(test)]
pub(crate) use election::new_election_state_channel;
