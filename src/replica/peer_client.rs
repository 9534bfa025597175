use crate::connection::{Connect, ConnectError, ConnectionPool};
use crate::grpc::grpc_meta_store_client::GrpcMetaStoreClient;
use crate::grpc::{ProtoAppendEntryReq, ProtoAppendEntryResult, ProtoRequestVoteReq, ProtoRequestVoteResult};
use crate::replica::ReplicaId;
use std::future::Future;
use tokio::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;

pub(crate) type PeerRpcClient = GrpcMetaStoreClient<Channel>;

#[async_trait::async_trait]
impl Connect for GrpcMetaStoreClient<Channel> {
    async fn connect(endpoint: Endpoint) -> Result<Self, ConnectError> {
        let channel = endpoint.connect().await?;
        Ok(GrpcMetaStoreClient::new(channel))
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum PeerCallError {
    #[error("Can't connect to peer: {0}")]
    Connect(#[from] ConnectError),
    #[error("Peer rpc failed: {0}")]
    Rpc(#[from] Status),
    #[error("Timed out calling peer")]
    Timeout,
}

/// PeerClients is how the replica talks to the other replicas. Every call is bounded by the same
/// timeout, and a peer whose call fails gets its connection dropped, so the next round starts
/// with a fresh connect.
#[derive(Clone)]
pub(crate) struct PeerClients {
    pool: ConnectionPool<PeerRpcClient>,
    rpc_timeout: Duration,
}

impl PeerClients {
    pub(crate) fn new(rpc_timeout: Duration) -> Self {
        PeerClients {
            pool: ConnectionPool::new(),
            rpc_timeout,
        }
    }

    pub(crate) async fn request_vote(
        &self,
        peer_id: &ReplicaId,
        request: ProtoRequestVoteReq,
    ) -> Result<ProtoRequestVoteResult, PeerCallError> {
        self.call(peer_id, |mut client| async move {
            client.request_vote(request).await.map(|r| r.into_inner())
        })
        .await
    }

    pub(crate) async fn append_entry(
        &self,
        peer_id: &ReplicaId,
        request: ProtoAppendEntryReq,
    ) -> Result<ProtoAppendEntryResult, PeerCallError> {
        self.call(peer_id, |mut client| async move {
            client.append_entry(request).await.map(|r| r.into_inner())
        })
        .await
    }

    async fn call<F, Fut, T>(&self, peer_id: &ReplicaId, rpc: F) -> Result<T, PeerCallError>
    where
        F: FnOnce(PeerRpcClient) -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        let attempt = async {
            let client = self.pool.get(peer_id.as_str()).await?;
            rpc(client).await.map_err(PeerCallError::from)
        };

        let result = match tokio::time::timeout(self.rpc_timeout, attempt).await {
            Ok(result) => result,
            Err(_elapsed) => Err(PeerCallError::Timeout),
        };

        if let Err(PeerCallError::Rpc(_)) | Err(PeerCallError::Timeout) = &result {
            self.pool.evict(peer_id.as_str()).await;
        }

        result
    }
}
