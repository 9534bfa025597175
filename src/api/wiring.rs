use crate::actor::{ActorClient, ReplicaActor};
use crate::api::config::{ClusterConfig, ConfigError};
use crate::api::event_bus::ElectionEventListener;
use crate::api::options::{MetaStoreOptions, MetaStoreOptionsValidated};
use crate::blockstore::{BlockStore, RemoteBlockStores};
use crate::metadata::{MetadataService, WriteGuard};
use crate::replica::{self, ReplicaId, ReplicaTimings};
use crate::server::{self, BlockStoreRpcServer, MetaStoreRpcServer, ShutdownHandle};
use std::convert::TryFrom;
use std::sync::Arc;
use tokio::net::TcpListener;

const ACTOR_QUEUE_SIZE: usize = 64;

pub struct MetaStoreConfig {
    pub cluster: ClusterConfig,
    /// Position of this replica in `cluster.metastores`.
    pub my_index: usize,
    pub logger: slog::Logger,
}

pub struct BlockStoreConfig {
    pub cluster: ClusterConfig,
    /// Position of this shard in `cluster.blockstores`.
    pub my_index: usize,
    pub logger: slog::Logger,
}

#[derive(Debug, thiserror::Error)]
pub enum MetaStoreCreationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("Illegal options for configuring metastore: {0}")]
    IllegalOptions(String),
    #[error("Invalid cluster: {0}")]
    InvalidCluster(String),
    #[error("Cannot listen on {0}")]
    InvalidAddress(String),
}

/// MetaStore is a running metadata replica. Dropping it shuts down the replica's server and
/// its election actor.
pub struct MetaStore {
    replica_id: ReplicaId,
    event_listener: ElectionEventListener,
    _shutdown_handle: ShutdownHandle,
}

impl MetaStore {
    pub fn replica_id(&self) -> &ReplicaId {
        &self.replica_id
    }

    pub fn event_listener(&self) -> ElectionEventListener {
        self.event_listener.clone()
    }
}

/// BlockStoreHandle is a running block store shard. Dropping it shuts down the shard's server.
pub struct BlockStoreHandle {
    addr: String,
    _shutdown_handle: ShutdownHandle,
}

impl BlockStoreHandle {
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

pub async fn try_create_metastore(config: MetaStoreConfig) -> Result<MetaStore, MetaStoreCreationError> {
    let cluster = config.cluster;
    let my_addr = cluster.metastore_addr(config.my_index)?.to_string();
    let my_replica_id = ReplicaId::new(my_addr.clone());
    let root_logger = config
        .logger
        .new(slog::o!("replica" => my_addr.clone()));

    let options = MetaStoreOptionsValidated::try_from(MetaStoreOptions::from(cluster.options.clone()))
        .map_err(|e| MetaStoreCreationError::IllegalOptions(e.to_string()))?;
    let listener = bind(&my_addr).await?;

    let (actor_client, actor_queue_rx) = ActorClient::new(ACTOR_QUEUE_SIZE);

    let (replica, election_state_change_listener) = replica::create_replica(
        root_logger.clone(),
        my_replica_id.clone(),
        cluster.metastores.iter().cloned().map(ReplicaId::new).collect(),
        actor_client.weak(),
        ReplicaTimings {
            leader_heartbeat_duration: options.leader_heartbeat_duration,
            follower_min_timeout: options.follower_min_timeout,
            follower_max_timeout: options.follower_max_timeout,
            peer_rpc_timeout: options.peer_rpc_timeout,
        },
    )
    .map_err(|e| MetaStoreCreationError::InvalidCluster(e.to_string()))?;

    let (shutdown_handle, shutdown_signal) = server::shutdown_signal();

    let replica_actor = ReplicaActor::new(root_logger.clone(), actor_queue_rx, replica);
    tokio::spawn(replica_actor.run_event_loop(shutdown_signal.clone()));

    let oracle = RemoteBlockStores::new(
        root_logger.clone(),
        cluster.blockstores.clone(),
        options.block_store_rpc_timeout,
    );
    let write_guard = if options.require_leader_for_writes {
        WriteGuard::LeaderOnly(election_state_change_listener.clone())
    } else {
        WriteGuard::AnyReplica
    };
    let metadata = MetadataService::new(root_logger.clone(), Arc::new(oracle), write_guard);

    let rpc_server = MetaStoreRpcServer::new(
        root_logger.clone(),
        my_replica_id.clone(),
        actor_client,
        election_state_change_listener.clone(),
        metadata,
    );
    tokio::spawn(rpc_server.run(listener, shutdown_signal));

    slog::info!(root_logger, "Metastore started with cluster {:?}", cluster.metastores);

    Ok(MetaStore {
        replica_id: my_replica_id,
        event_listener: ElectionEventListener::new(election_state_change_listener),
        _shutdown_handle: shutdown_handle,
    })
}

pub async fn try_create_blockstore(config: BlockStoreConfig) -> Result<BlockStoreHandle, MetaStoreCreationError> {
    let my_addr = config.cluster.blockstore_addr(config.my_index)?.to_string();
    let logger = config.logger.new(slog::o!("blockstore" => my_addr.clone()));
    let listener = bind(&my_addr).await?;

    let (shutdown_handle, shutdown_signal) = server::shutdown_signal();
    let rpc_server = BlockStoreRpcServer::new(logger, BlockStore::new());
    tokio::spawn(rpc_server.run(listener, shutdown_signal));

    Ok(BlockStoreHandle {
        addr: my_addr,
        _shutdown_handle: shutdown_handle,
    })
}

async fn bind(addr: &str) -> Result<TcpListener, MetaStoreCreationError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| MetaStoreCreationError::InvalidAddress(format!("'{}': {}", addr, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(json: &str) -> ClusterConfig {
        ClusterConfig::from_json(json).unwrap()
    }

    #[tokio::test]
    async fn rejects_index_outside_cluster() {
        let config = MetaStoreConfig {
            cluster: cluster(r#"{"metastores": ["127.0.0.1:7101"], "blockstores": ["127.0.0.1:7201"]}"#),
            my_index: 3,
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        };

        let result = try_create_metastore(config).await;
        assert!(matches!(
            result,
            Err(MetaStoreCreationError::InvalidConfig(ConfigError::NoSuchMember { .. }))
        ));
    }

    #[tokio::test]
    async fn rejects_illegal_options() {
        let config = MetaStoreConfig {
            cluster: cluster(
                r#"{
                    "metastores": ["127.0.0.1:7102"],
                    "blockstores": ["127.0.0.1:7202"],
                    "options": {"follower_min_timeout_millis": 500, "follower_max_timeout_millis": 400}
                }"#,
            ),
            my_index: 0,
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        };

        let result = try_create_metastore(config).await;
        assert!(matches!(result, Err(MetaStoreCreationError::IllegalOptions(_))));
    }

    #[tokio::test]
    async fn rejects_unresolvable_address() {
        let config = MetaStoreConfig {
            cluster: cluster(r#"{"metastores": ["not an address"], "blockstores": ["127.0.0.1:7203"]}"#),
            my_index: 0,
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        };

        let result = try_create_metastore(config).await;
        assert!(matches!(result, Err(MetaStoreCreationError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn rejects_address_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken_addr = taken.local_addr().unwrap().to_string();
        let cluster = cluster(&format!(
            r#"{{"metastores": ["{0}"], "blockstores": ["{0}"]}}"#,
            taken_addr
        ));

        let metastore = try_create_metastore(MetaStoreConfig {
            cluster: cluster.clone(),
            my_index: 0,
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        })
        .await;
        assert!(matches!(metastore, Err(MetaStoreCreationError::InvalidAddress(_))));

        let blockstore = try_create_blockstore(BlockStoreConfig {
            cluster,
            my_index: 0,
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        })
        .await;
        assert!(matches!(blockstore, Err(MetaStoreCreationError::InvalidAddress(_))));
    }
}
