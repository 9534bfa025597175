use std::convert::TryFrom;
use tokio::time::Duration;

/// Tuning knobs of a metadata replica. Unset values take their defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetaStoreOptions {
    pub leader_heartbeat_duration: Option<Duration>,
    pub follower_min_timeout: Option<Duration>,
    pub follower_max_timeout: Option<Duration>,
    /// Bound on one requestVote or appendEntry call to a peer, connect included.
    pub peer_rpc_timeout: Option<Duration>,
    /// Bound on one hasBlock call to a block store, connect included.
    pub block_store_rpc_timeout: Option<Duration>,
    /// Reject modifyFile/deleteFile on replicas that aren't leader. Off by default: every replica
    /// accepts writes into its own table.
    pub require_leader_for_writes: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct MetaStoreOptionsValidated {
    pub leader_heartbeat_duration: Duration,
    pub follower_min_timeout: Duration,
    pub follower_max_timeout: Duration,
    pub peer_rpc_timeout: Duration,
    pub block_store_rpc_timeout: Duration,
    pub require_leader_for_writes: bool,
}

impl MetaStoreOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.leader_heartbeat_duration >= self.follower_min_timeout {
            return Err("Follower minimum timeout must be greater than leader's heartbeat");
        }
        if self.follower_min_timeout >= self.follower_max_timeout {
            return Err("Follower minimum timeout must be less than maximum timeout");
        }
        if self.peer_rpc_timeout >= self.follower_min_timeout {
            return Err("Peer RPC timeout must be less than the follower's minimum timeout");
        }
        if self.block_store_rpc_timeout == Duration::from_secs(0) {
            return Err("Block store RPC timeout must be non-zero");
        }

        Ok(())
    }
}

impl TryFrom<MetaStoreOptions> for MetaStoreOptionsValidated {
    type Error = &'static str;

    fn try_from(options: MetaStoreOptions) -> Result<Self, Self::Error> {
        let values = MetaStoreOptionsValidated {
            leader_heartbeat_duration: options.leader_heartbeat_duration.unwrap_or(Duration::from_millis(100)),
            follower_min_timeout: options.follower_min_timeout.unwrap_or(Duration::from_millis(300)),
            follower_max_timeout: options.follower_max_timeout.unwrap_or(Duration::from_millis(500)),
            peer_rpc_timeout: options.peer_rpc_timeout.unwrap_or(Duration::from_millis(80)),
            block_store_rpc_timeout: options.block_store_rpc_timeout.unwrap_or(Duration::from_secs(1)),
            require_leader_for_writes: options.require_leader_for_writes.unwrap_or(false),
        };

        values.validate()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let validated = MetaStoreOptionsValidated::try_from(MetaStoreOptions::default()).unwrap();
        assert_eq!(validated.leader_heartbeat_duration, Duration::from_millis(100));
        assert_eq!(validated.follower_min_timeout, Duration::from_millis(300));
        assert_eq!(validated.follower_max_timeout, Duration::from_millis(500));
        assert_eq!(validated.peer_rpc_timeout, Duration::from_millis(80));
        assert!(!validated.require_leader_for_writes);
    }

    #[test]
    fn heartbeat_must_beat_timeout() {
        let options = MetaStoreOptions {
            leader_heartbeat_duration: Some(Duration::from_millis(300)),
            ..Default::default()
        };
        assert!(MetaStoreOptionsValidated::try_from(options).is_err());
    }

    #[test]
    fn timeout_range_must_be_ordered() {
        let options = MetaStoreOptions {
            follower_min_timeout: Some(Duration::from_millis(600)),
            ..Default::default()
        };
        assert!(MetaStoreOptionsValidated::try_from(options).is_err());
    }

    #[test]
    fn peer_rpc_must_fit_in_timeout() {
        let options = MetaStoreOptions {
            peer_rpc_timeout: Some(Duration::from_millis(300)),
            ..Default::default()
        };
        assert!(MetaStoreOptionsValidated::try_from(options).is_err());
    }
}
