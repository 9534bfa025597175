use crate::actor::ActorClient;
use crate::blockstore::BlockHash;
use crate::grpc::grpc_meta_store_server::{GrpcMetaStore, GrpcMetaStoreServer};
use crate::grpc::{
    proto_append_entry_error, proto_append_entry_result, proto_delete_file_result, proto_file_error,
    proto_modify_file_result, proto_request_vote_error, proto_request_vote_result, ProtoAppendEntryError,
    ProtoAppendEntryReq, ProtoAppendEntryResult, ProtoAppendEntrySuccess, ProtoBlockRef, ProtoClientNotInCluster,
    ProtoClientStaleTerm, ProtoDeleteFileReq, ProtoDeleteFileResult, ProtoFileError, ProtoFileNotFound,
    ProtoFileOpSuccess, ProtoIsLeaderReq, ProtoIsLeaderResult, ProtoMissingBlocks, ProtoModifyFileReq,
    ProtoModifyFileResult, ProtoNotLeader, ProtoReadFileReq, ProtoReadFileResult, ProtoRequestVoteError,
    ProtoRequestVoteReq, ProtoRequestVoteResult, ProtoRequestVoteSuccess, ProtoServerFault, ProtoWhoIsLeaderReq,
    ProtoWhoIsLeaderResult, ProtoWrongVersion,
};
use crate::metadata::{BlockRef, DeleteFileError, FileVersion, MetadataService, ModifyFileError};
use crate::replica::{
    AppendEntryError, AppendEntryInput, AppendEntryOutput, ElectionStateChangeListener, ElectionStateSnapshot,
    ReplicaId, RequestVoteError, RequestVoteInput, RequestVoteOutput, Term,
};
use crate::server::ShutdownSignal;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

/// MetaStoreRpcServer serves both the replica-to-replica election RPCs and the client-facing
/// metadata RPCs of one replica.
pub(crate) struct MetaStoreRpcServer {
    logger: slog::Logger,
    my_replica_id: ReplicaId,
    local_replica: ActorClient,
    election_state: ElectionStateChangeListener,
    metadata: MetadataService,
}

impl MetaStoreRpcServer {
    pub(crate) fn new(
        logger: slog::Logger,
        my_replica_id: ReplicaId,
        local_replica: ActorClient,
        election_state: ElectionStateChangeListener,
        metadata: MetadataService,
    ) -> Self {
        MetaStoreRpcServer {
            logger,
            my_replica_id,
            local_replica,
            election_state,
            metadata,
        }
    }

    /// Serve on an already bound `listener`, so that bind failures surface to whoever created it.
    pub(crate) async fn run(self, listener: TcpListener, shutdown_signal: ShutdownSignal) {
        let logger = self.logger.clone();
        slog::info!(logger, "Listening on '{:?}'", listener.local_addr());

        let result = Server::builder()
            .add_service(GrpcMetaStoreServer::new(self))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal.wait())
            .await;

        slog::info!(logger, "Server run() has exited: {:?}", result);
    }

    // ------- Election --------

    async fn handle_request_vote(&self, rpc_request: ProtoRequestVoteReq) -> ProtoRequestVoteResult {
        let app_input = RequestVoteInput {
            candidate_term: Term::new(rpc_request.term),
            candidate_id: ReplicaId::new(rpc_request.client_node_id),
        };
        let app_result = self.local_replica.request_vote(app_input).await;
        Self::convert_request_vote_result(app_result)
    }

    fn convert_request_vote_result(app_result: Result<RequestVoteOutput, RequestVoteError>) -> ProtoRequestVoteResult {
        match app_result {
            Ok(ok) => ProtoRequestVoteResult {
                result: Some(proto_request_vote_result::Result::Ok(ProtoRequestVoteSuccess {
                    vote_granted: ok.vote_granted,
                })),
            },
            Err(RequestVoteError::CandidateNotInCluster) => ProtoRequestVoteResult {
                result: Some(proto_request_vote_result::Result::Ok(ProtoRequestVoteSuccess {
                    vote_granted: false,
                })),
            },
            Err(RequestVoteError::ActorExited) => ProtoRequestVoteResult {
                result: Some(proto_request_vote_result::Result::Err(ProtoRequestVoteError {
                    err: Some(proto_request_vote_error::Err::ServerFault(ProtoServerFault {
                        message: "Server internal replica task has exited".to_string(),
                    })),
                })),
            },
        }
    }

    async fn handle_append_entry(&self, rpc_request: ProtoAppendEntryReq) -> ProtoAppendEntryResult {
        let app_input = AppendEntryInput {
            leader_term: Term::new(rpc_request.term),
            leader_id: ReplicaId::new(rpc_request.client_node_id),
        };
        let app_result = self.local_replica.append_entry(app_input).await;
        Self::convert_append_entry_result(app_result)
    }

    fn convert_append_entry_result(app_result: Result<AppendEntryOutput, AppendEntryError>) -> ProtoAppendEntryResult {
        let err = match app_result {
            Ok(_) => {
                return ProtoAppendEntryResult {
                    result: Some(proto_append_entry_result::Result::Ok(ProtoAppendEntrySuccess {})),
                }
            }
            Err(AppendEntryError::ClientNotInCluster) => {
                proto_append_entry_error::Err::ClientNotInCluster(ProtoClientNotInCluster {})
            }
            Err(AppendEntryError::ClientTermOutOfDate(term_info)) => {
                proto_append_entry_error::Err::StaleTerm(ProtoClientStaleTerm {
                    current_term: term_info.current_term.as_u64(),
                })
            }
            Err(AppendEntryError::ActorExited) => proto_append_entry_error::Err::ServerFault(ProtoServerFault {
                message: "Server internal replica task has exited".to_string(),
            }),
        };

        ProtoAppendEntryResult {
            result: Some(proto_append_entry_result::Result::Err(ProtoAppendEntryError {
                err: Some(err),
            })),
        }
    }

    // ------- Leader discovery --------

    fn current_leader(&self) -> Option<ReplicaId> {
        match self.election_state.current() {
            ElectionStateSnapshot::Leader => Some(self.my_replica_id.clone()),
            ElectionStateSnapshot::Follower(leader_id) => Some(leader_id),
            ElectionStateSnapshot::Candidate | ElectionStateSnapshot::FollowerNoLeader => None,
        }
    }

    // ------- Versioning protocol --------

    async fn handle_read_file(&self, rpc_request: ProtoReadFileReq) -> ProtoReadFileResult {
        let output = self.metadata.read_file(&rpc_request.filename).await;
        ProtoReadFileResult {
            version: output.version.as_u64(),
            hashlist: output.hashlist.into_iter().map(Self::convert_block_ref_output).collect(),
        }
    }

    async fn handle_modify_file(&self, rpc_request: ProtoModifyFileReq) -> ProtoModifyFileResult {
        let hashlist = rpc_request
            .hashlist
            .into_iter()
            .map(Self::convert_block_ref_input)
            .collect();
        let app_result = self
            .metadata
            .modify_file(rpc_request.filename, FileVersion::new(rpc_request.version), hashlist)
            .await;

        let err = match app_result {
            Ok(()) => {
                return ProtoModifyFileResult {
                    result: Some(proto_modify_file_result::Result::Ok(ProtoFileOpSuccess {})),
                }
            }
            Err(ModifyFileError::WrongVersion { current_version }) => {
                Self::wrong_version_error(current_version)
            }
            Err(ModifyFileError::MissingBlocks { missing }) => proto_file_error::Err::MissingBlocks(ProtoMissingBlocks {
                hashes: missing.into_iter().map(BlockHash::into_inner).collect(),
            }),
            Err(ModifyFileError::NotLeader { leader }) => Self::not_leader_error(leader),
            Err(e @ ModifyFileError::BlockStoreUnavailable { .. }) | Err(e @ ModifyFileError::UnknownBlockStore { .. }) => {
                proto_file_error::Err::ServerFault(ProtoServerFault { message: e.to_string() })
            }
        };

        ProtoModifyFileResult {
            result: Some(proto_modify_file_result::Result::Err(ProtoFileError { err: Some(err) })),
        }
    }

    async fn handle_delete_file(&self, rpc_request: ProtoDeleteFileReq) -> ProtoDeleteFileResult {
        let app_result = self
            .metadata
            .delete_file(rpc_request.filename, FileVersion::new(rpc_request.version))
            .await;

        let err = match app_result {
            Ok(()) => {
                return ProtoDeleteFileResult {
                    result: Some(proto_delete_file_result::Result::Ok(ProtoFileOpSuccess {})),
                }
            }
            Err(DeleteFileError::FileNotFound) => proto_file_error::Err::FileNotFound(ProtoFileNotFound {}),
            Err(DeleteFileError::WrongVersion { current_version }) => Self::wrong_version_error(current_version),
            Err(DeleteFileError::NotLeader { leader }) => Self::not_leader_error(leader),
        };

        ProtoDeleteFileResult {
            result: Some(proto_delete_file_result::Result::Err(ProtoFileError { err: Some(err) })),
        }
    }

    fn wrong_version_error(current_version: FileVersion) -> proto_file_error::Err {
        proto_file_error::Err::WrongVersion(ProtoWrongVersion {
            current_version: current_version.as_u64(),
        })
    }

    fn not_leader_error(leader: Option<ReplicaId>) -> proto_file_error::Err {
        proto_file_error::Err::NotLeader(ProtoNotLeader {
            leader_id: leader.map(ReplicaId::into_inner).unwrap_or_default(),
        })
    }

    fn convert_block_ref_input(proto: ProtoBlockRef) -> BlockRef {
        BlockRef::new(BlockHash::new(proto.hash), proto.location)
    }

    fn convert_block_ref_output(block: BlockRef) -> ProtoBlockRef {
        ProtoBlockRef {
            hash: block.hash.into_inner(),
            location: block.location,
        }
    }
}

#[async_trait::async_trait]
impl GrpcMetaStore for MetaStoreRpcServer {
    async fn request_vote(
        &self,
        rpc_request_wrapped: Request<ProtoRequestVoteReq>,
    ) -> Result<Response<ProtoRequestVoteResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_request_vote(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        Ok(Response::new(rpc_result))
    }

    async fn append_entry(
        &self,
        rpc_request_wrapped: Request<ProtoAppendEntryReq>,
    ) -> Result<Response<ProtoAppendEntryResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_append_entry(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        Ok(Response::new(rpc_result))
    }

    async fn who_is_leader(
        &self,
        _rpc_request: Request<ProtoWhoIsLeaderReq>,
    ) -> Result<Response<ProtoWhoIsLeaderResult>, Status> {
        Ok(Response::new(ProtoWhoIsLeaderResult {
            leader_id: self.current_leader().map(ReplicaId::into_inner).unwrap_or_default(),
        }))
    }

    async fn is_leader(&self, _rpc_request: Request<ProtoIsLeaderReq>) -> Result<Response<ProtoIsLeaderResult>, Status> {
        Ok(Response::new(ProtoIsLeaderResult {
            is_leader: self.election_state.current() == ElectionStateSnapshot::Leader,
        }))
    }

    async fn read_file(
        &self,
        rpc_request_wrapped: Request<ProtoReadFileReq>,
    ) -> Result<Response<ProtoReadFileResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_read_file(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        Ok(Response::new(rpc_result))
    }

    async fn modify_file(
        &self,
        rpc_request_wrapped: Request<ProtoModifyFileReq>,
    ) -> Result<Response<ProtoModifyFileResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_modify_file(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        Ok(Response::new(rpc_result))
    }

    async fn delete_file(
        &self,
        rpc_request_wrapped: Request<ProtoDeleteFileReq>,
    ) -> Result<Response<ProtoDeleteFileResult>, Status> {
        let rpc_request = rpc_request_wrapped.into_inner();

        slog::debug!(self.logger, "ServerWire - {:?}", rpc_request);
        let rpc_result = self.handle_delete_file(rpc_request).await;
        slog::debug!(self.logger, "ServerWire - {:?}", rpc_result);

        Ok(Response::new(rpc_result))
    }
}
