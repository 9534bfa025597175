use std::collections::HashSet;
use std::fmt;

/// ReplicaId identifies a metadata replica by its advertised `host:port` address. The same value
/// is what clients get back from `whoIsLeader`, so it must be dialable.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ReplicaId(String);

impl ReplicaId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        ReplicaId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ClusterTracker holds the fixed membership of the cluster, as seen by one replica.
#[derive(Clone)]
pub(crate) struct ClusterTracker {
    my_replica_id: ReplicaId,
    peer_ids: HashSet<ReplicaId>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum InvalidCluster {
    #[error("Replica {0:?} is listed more than once")]
    DuplicateMember(ReplicaId),
    #[error("My replica {0:?} is not listed in the cluster")]
    MeNotInCluster(ReplicaId),
}

impl ClusterTracker {
    pub(crate) fn create_valid_cluster<I>(my_replica_id: ReplicaId, members: I) -> Result<Self, InvalidCluster>
    where
        I: IntoIterator<Item = ReplicaId>,
    {
        let mut found_me = false;
        let mut seen = HashSet::new();
        let mut peer_ids = HashSet::new();
        for member in members {
            if !seen.insert(member.clone()) {
                return Err(InvalidCluster::DuplicateMember(member));
            }
            if member == my_replica_id {
                found_me = true;
            } else {
                peer_ids.insert(member);
            }
        }

        if !found_me {
            return Err(InvalidCluster::MeNotInCluster(my_replica_id));
        }

        Ok(ClusterTracker {
            my_replica_id,
            peer_ids,
        })
    }

    pub(crate) fn my_replica_id(&self) -> &ReplicaId {
        &self.my_replica_id
    }

    pub(crate) fn contains_member(&self, replica_id: &ReplicaId) -> bool {
        &self.my_replica_id == replica_id || self.peer_ids.contains(replica_id)
    }

    pub(crate) fn peer_ids(&self) -> HashSet<ReplicaId> {
        self.peer_ids.clone()
    }

    pub(crate) fn iter_peers(&self) -> impl Iterator<Item = &ReplicaId> {
        self.peer_ids.iter()
    }

    /// Number of replicas that vote in an election, including me.
    pub(crate) fn num_voting_replicas(&self) -> usize {
        self.peer_ids.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ReplicaId> {
        raw.iter().map(|s| ReplicaId::new(*s)).collect()
    }

    #[test]
    fn valid_cluster_excludes_me_from_peers() {
        let me = ReplicaId::new("127.0.0.1:5001");
        let tracker =
            ClusterTracker::create_valid_cluster(me.clone(), ids(&["127.0.0.1:5001", "127.0.0.1:5002", "127.0.0.1:5003"]))
                .unwrap();

        assert_eq!(tracker.num_voting_replicas(), 3);
        assert!(!tracker.peer_ids().contains(&me));
        assert!(tracker.contains_member(&me));
        assert!(tracker.contains_member(&ReplicaId::new("127.0.0.1:5003")));
        assert!(!tracker.contains_member(&ReplicaId::new("127.0.0.1:5004")));
    }

    #[test]
    fn me_missing_from_cluster() {
        let me = ReplicaId::new("127.0.0.1:5009");
        let result = ClusterTracker::create_valid_cluster(me.clone(), ids(&["127.0.0.1:5001"]));
        assert_eq!(result.err(), Some(InvalidCluster::MeNotInCluster(me)));
    }

    #[test]
    fn duplicate_member() {
        let me = ReplicaId::new("127.0.0.1:5001");
        let result = ClusterTracker::create_valid_cluster(me, ids(&["127.0.0.1:5001", "127.0.0.1:5002", "127.0.0.1:5002"]));
        assert_eq!(
            result.err(),
            Some(InvalidCluster::DuplicateMember(ReplicaId::new("127.0.0.1:5002")))
        );
    }
}
