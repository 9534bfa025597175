use crate::blockstore::{BlockHash, BlockStore};
use crate::grpc::grpc_block_store_server::{GrpcBlockStore, GrpcBlockStoreServer};
use crate::grpc::{
    ProtoGetBlockReq, ProtoGetBlockResult, ProtoHasBlockReq, ProtoHasBlockResult, ProtoStoreBlockReq,
    ProtoStoreBlockResult,
};
use crate::server::ShutdownSignal;
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// BlockStoreRpcServer exposes one block store shard.
pub(crate) struct BlockStoreRpcServer {
    logger: slog::Logger,
    store: BlockStore,
}

impl BlockStoreRpcServer {
    pub(crate) fn new(logger: slog::Logger, store: BlockStore) -> Self {
        BlockStoreRpcServer { logger, store }
    }

    /// Serve on an already bound `listener`, so that bind failures surface to whoever created it.
    pub(crate) async fn run(self, listener: TcpListener, shutdown_signal: ShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", listener.local_addr());

        let result = Server::builder()
            .add_service(GrpcBlockStoreServer::new(self))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal.wait())
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }
}

#[async_trait::async_trait]
impl GrpcBlockStore for BlockStoreRpcServer {
    async fn store_block(
        &self,
        rpc_request_wrapped: Request<ProtoStoreBlockReq>,
    ) -> Result<Response<ProtoStoreBlockResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        // Block bytes are too noisy to log.
        slog::debug!(
            self.logger,
            "ServerWire - StoreBlock {} ({} bytes)",
            rpc_request.hash,
            rpc_request.data.len()
        );

        self.store
            .store_block(BlockHash::new(rpc_request.hash), Bytes::from(rpc_request.data))
            .await;

        Ok(Response::new(ProtoStoreBlockResult {}))
    }

    async fn get_block(
        &self,
        rpc_request_wrapped: Request<ProtoGetBlockReq>,
    ) -> Result<Response<ProtoGetBlockResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);

        let rpc_result = match self.store.get_block(&BlockHash::new(rpc_request.hash)).await {
            Some(data) => ProtoGetBlockResult {
                found: true,
                data: data.to_vec(),
            },
            None => ProtoGetBlockResult {
                found: false,
                data: Vec::new(),
            },
        };

        Ok(Response::new(rpc_result))
    }

    async fn has_block(
        &self,
        rpc_request_wrapped: Request<ProtoHasBlockReq>,
    ) -> Result<Response<ProtoHasBlockResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let present = self.store.has_block(&BlockHash::new(rpc_request.hash)).await;
        slog::debug!(self.logger, "ServerWire - present={}", present);

        Ok(Response::new(ProtoHasBlockResult { present }))
    }
}
