use crate::blockstore::BlockHash;
use crate::connection::{Connect, ConnectError, ConnectionPool};
use crate::grpc::grpc_block_store_client::GrpcBlockStoreClient;
use crate::grpc::ProtoHasBlockReq;
use std::collections::HashSet;
use tokio::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// BlockPresenceOracle answers "does the block store at `location` hold block `hash`?".
#[async_trait::async_trait]
pub(crate) trait BlockPresenceOracle: Send + Sync {
    async fn has_block(&self, location: &str, hash: &BlockHash) -> Result<bool, OracleError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum OracleError {
    #[error("{0} is not a configured block store")]
    UnknownLocation(String),
    #[error("Block store {location} is unavailable: {reason}")]
    Unavailable { location: String, reason: String },
}

#[async_trait::async_trait]
impl Connect for GrpcBlockStoreClient<Channel> {
    async fn connect(endpoint: Endpoint) -> Result<Self, ConnectError> {
        let channel = endpoint.connect().await?;
        Ok(GrpcBlockStoreClient::new(channel))
    }
}

/// RemoteBlockStores asks the configured block store shards over gRPC.
pub(crate) struct RemoteBlockStores {
    logger: slog::Logger,
    locations: HashSet<String>,
    pool: ConnectionPool<GrpcBlockStoreClient<Channel>>,
    rpc_timeout: Duration,
}

impl RemoteBlockStores {
    pub(crate) fn new(logger: slog::Logger, locations: Vec<String>, rpc_timeout: Duration) -> Self {
        RemoteBlockStores {
            logger,
            locations: locations.into_iter().collect(),
            pool: ConnectionPool::new(),
            rpc_timeout,
        }
    }

    async fn call_has_block(&self, location: &str, hash: &BlockHash) -> Result<bool, String> {
        let mut client = self.pool.get(location).await.map_err(|e| e.to_string())?;
        let request = ProtoHasBlockReq {
            hash: hash.as_str().to_string(),
        };
        slog::debug!(self.logger, "ClientWire - {} - {:?}", location, request);
        let reply = client.has_block(request).await.map_err(|status| status.to_string())?;
        slog::debug!(self.logger, "ClientWire - {} - {:?}", location, reply);

        Ok(reply.into_inner().present)
    }
}

#[async_trait::async_trait]
impl BlockPresenceOracle for RemoteBlockStores {
    async fn has_block(&self, location: &str, hash: &BlockHash) -> Result<bool, OracleError> {
        if !self.locations.contains(location) {
            return Err(OracleError::UnknownLocation(location.to_string()));
        }

        let reason = match tokio::time::timeout(self.rpc_timeout, self.call_has_block(location, hash)).await {
            Ok(Ok(present)) => return Ok(present),
            Ok(Err(reason)) => reason,
            Err(_elapsed) => "Timed out".to_string(),
        };

        slog::warn!(self.logger, "HasBlock call to {} failed: {}", location, reason);
        self.pool.evict(location).await;
        Err(OracleError::Unavailable {
            location: location.to_string(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_logger() -> slog::Logger {
        slog::Logger::root(slog::Discard, slog::o!())
    }

    #[tokio::test]
    async fn unknown_location() {
        let oracle = RemoteBlockStores::new(
            test_logger(),
            vec!["127.0.0.1:7001".to_string()],
            Duration::from_millis(100),
        );

        let result = oracle.has_block("127.0.0.1:7002", &BlockHash::new("ab")).await;
        assert_eq!(result, Err(OracleError::UnknownLocation("127.0.0.1:7002".to_string())));
    }

    #[tokio::test]
    async fn unreachable_location() {
        // Nothing listens on port 1.
        let oracle = RemoteBlockStores::new(test_logger(), vec!["127.0.0.1:1".to_string()], Duration::from_millis(500));

        let result = oracle.has_block("127.0.0.1:1", &BlockHash::new("ab")).await;
        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }
}
