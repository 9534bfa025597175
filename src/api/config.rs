use crate::api::MetaStoreOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fs, io};
use tokio::time::Duration;

/// ClusterConfig is the static layout of a deployment, shared by every process in it.
///
/// ```json
/// {
///   "metastores": ["127.0.0.1:5001", "127.0.0.1:5002", "127.0.0.1:5003"],
///   "blockstores": ["127.0.0.1:6001", "127.0.0.1:6002"],
///   "options": { "leader_heartbeat_millis": 100 }
/// }
/// ```
///
/// Each address is both where that process listens and how the others reach it. A process is
/// started with its index into the relevant list.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClusterConfig {
    pub metastores: Vec<String>,
    pub blockstores: Vec<String>,
    #[serde(default)]
    pub options: OptionsConfig,
}

/// Durations are in milliseconds.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    pub leader_heartbeat_millis: Option<u64>,
    pub follower_min_timeout_millis: Option<u64>,
    pub follower_max_timeout_millis: Option<u64>,
    pub peer_rpc_timeout_millis: Option<u64>,
    pub block_store_rpc_timeout_millis: Option<u64>,
    pub require_leader_for_writes: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Can't read config file: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config lists no {0}")]
    Empty(&'static str),
    #[error("Index {index} is out of range, config lists {count} {kind}")]
    NoSuchMember {
        kind: &'static str,
        index: usize,
        count: usize,
    },
}

impl ClusterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ClusterConfig = serde_json::from_str(raw)?;
        if config.metastores.is_empty() {
            return Err(ConfigError::Empty("metastores"));
        }
        if config.blockstores.is_empty() {
            return Err(ConfigError::Empty("blockstores"));
        }

        Ok(config)
    }

    pub fn metastore_addr(&self, index: usize) -> Result<&str, ConfigError> {
        Self::member(&self.metastores, "metastores", index)
    }

    pub fn blockstore_addr(&self, index: usize) -> Result<&str, ConfigError> {
        Self::member(&self.blockstores, "blockstores", index)
    }

    /// Address of the block store shard that owns a block, by `BlockHash::shard_for`.
    pub fn blockstore_for(&self, hash: &crate::BlockHash) -> Option<&str> {
        hash.shard_for(self.blockstores.len())
            .map(|index| self.blockstores[index].as_str())
    }

    fn member<'a>(members: &'a [String], kind: &'static str, index: usize) -> Result<&'a str, ConfigError> {
        members
            .get(index)
            .map(String::as_str)
            .ok_or(ConfigError::NoSuchMember {
                kind,
                index,
                count: members.len(),
            })
    }
}

impl From<OptionsConfig> for MetaStoreOptions {
    fn from(config: OptionsConfig) -> Self {
        MetaStoreOptions {
            leader_heartbeat_duration: config.leader_heartbeat_millis.map(Duration::from_millis),
            follower_min_timeout: config.follower_min_timeout_millis.map(Duration::from_millis),
            follower_max_timeout: config.follower_max_timeout_millis.map(Duration::from_millis),
            peer_rpc_timeout: config.peer_rpc_timeout_millis.map(Duration::from_millis),
            block_store_rpc_timeout: config.block_store_rpc_timeout_millis.map(Duration::from_millis),
            require_leader_for_writes: config.require_leader_for_writes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockHash;

    #[test]
    fn parse_minimal() {
        let config = ClusterConfig::from_json(
            r#"{"metastores": ["127.0.0.1:5001", "127.0.0.1:5002"], "blockstores": ["127.0.0.1:6001"]}"#,
        )
        .unwrap();

        assert_eq!(config.metastore_addr(1).unwrap(), "127.0.0.1:5002");
        assert_eq!(config.blockstore_addr(0).unwrap(), "127.0.0.1:6001");
        assert_eq!(config.options, OptionsConfig::default());
        assert!(matches!(
            config.metastore_addr(2),
            Err(ConfigError::NoSuchMember { index: 2, count: 2, .. })
        ));
    }

    #[test]
    fn parse_options() {
        let config = ClusterConfig::from_json(
            r#"{
                "metastores": ["127.0.0.1:5001"],
                "blockstores": ["127.0.0.1:6001"],
                "options": {"leader_heartbeat_millis": 50, "require_leader_for_writes": true}
            }"#,
        )
        .unwrap();

        let options = MetaStoreOptions::from(config.options);
        assert_eq!(options.leader_heartbeat_duration, Some(Duration::from_millis(50)));
        assert_eq!(options.follower_min_timeout, None);
        assert_eq!(options.require_leader_for_writes, Some(true));
    }

    #[test]
    fn reject_bad_configs() {
        assert!(matches!(
            ClusterConfig::from_json(r#"{"metastores": [], "blockstores": ["127.0.0.1:6001"]}"#),
            Err(ConfigError::Empty("metastores"))
        ));
        assert!(matches!(
            ClusterConfig::from_json(r#"{"metastores": ["127.0.0.1:5001"]}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ClusterConfig::from_json(
                r#"{"metastores": ["a:1"], "blockstores": ["b:1"], "options": {"heartbeat": 5}}"#
            ),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn block_shard_lookup() {
        let config = ClusterConfig::from_json(
            r#"{"metastores": ["127.0.0.1:5001"], "blockstores": ["127.0.0.1:6001", "127.0.0.1:6002", "127.0.0.1:6003"]}"#,
        )
        .unwrap();

        assert_eq!(config.blockstore_for(&BlockHash::new("a")), Some("127.0.0.1:6002"));
        assert_eq!(config.blockstore_for(&BlockHash::new("not hex")), None);
    }
}
