use crate::blockstore::BlockHash;
use crate::connection::Connect;
use crate::grpc::grpc_block_store_client::GrpcBlockStoreClient;
use crate::grpc::grpc_meta_store_client::GrpcMetaStoreClient;
use crate::grpc::{
    proto_delete_file_result, proto_file_error, proto_modify_file_result, ProtoBlockRef, ProtoDeleteFileReq,
    ProtoFileError, ProtoGetBlockReq, ProtoHasBlockReq, ProtoIsLeaderReq, ProtoModifyFileReq, ProtoReadFileReq,
    ProtoStoreBlockReq, ProtoWhoIsLeaderReq,
};
use crate::metadata::{BlockRef, DeleteFileError, FileVersion, ModifyFileError, ReadFileOutput};
use crate::replica::ReplicaId;
use bytes::Bytes;
use std::error::Error;
use std::fmt;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;

/// ClientError is a call that didn't produce an answer from the server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to connect: {0}")]
    Connect(String),
    #[error("RPC failed: {0}")]
    Rpc(#[from] Status),
    #[error("Server fault: {0}")]
    ServerFault(String),
    #[error("Malformed reply: {0}")]
    MalformedReply(&'static str),
}

/// RequestError is either the server's answer `E`, or no answer at all.
#[derive(Debug)]
pub enum RequestError<E> {
    Rejected(E),
    Client(ClientError),
}

impl<E> From<ClientError> for RequestError<E> {
    fn from(e: ClientError) -> Self {
        RequestError::Client(e)
    }
}

impl<E> From<Status> for RequestError<E> {
    fn from(e: Status) -> Self {
        RequestError::Client(ClientError::Rpc(e))
    }
}

impl<E: fmt::Display> fmt::Display for RequestError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Rejected(e) => write!(f, "Rejected: {}", e),
            RequestError::Client(e) => write!(f, "{}", e),
        }
    }
}

impl<E: Error + 'static> Error for RequestError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RequestError::Rejected(e) => Some(e),
            RequestError::Client(e) => Some(e),
        }
    }
}

async fn connect<C: Connect>(addr: &str) -> Result<C, ClientError> {
    let endpoint = Endpoint::from_shared(format!("http://{}", addr)).map_err(|e| ClientError::Connect(e.to_string()))?;
    C::connect(endpoint)
        .await
        .map_err(|e| ClientError::Connect(e.to_string()))
}

/// MetaStoreClient talks to one metadata replica.
#[derive(Clone)]
pub struct MetaStoreClient {
    inner: GrpcMetaStoreClient<Channel>,
}

impl MetaStoreClient {
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        Ok(MetaStoreClient {
            inner: connect(addr).await?,
        })
    }

    pub async fn who_is_leader(&mut self) -> Result<Option<ReplicaId>, ClientError> {
        let reply = self.inner.who_is_leader(ProtoWhoIsLeaderReq {}).await?.into_inner();
        if reply.leader_id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ReplicaId::new(reply.leader_id)))
        }
    }

    pub async fn is_leader(&mut self) -> Result<bool, ClientError> {
        let reply = self.inner.is_leader(ProtoIsLeaderReq {}).await?.into_inner();
        Ok(reply.is_leader)
    }

    pub async fn read_file(&mut self, filename: &str) -> Result<ReadFileOutput, ClientError> {
        let reply = self
            .inner
            .read_file(ProtoReadFileReq {
                filename: filename.to_string(),
            })
            .await?
            .into_inner();

        Ok(ReadFileOutput {
            version: FileVersion::new(reply.version),
            hashlist: reply
                .hashlist
                .into_iter()
                .map(|block| BlockRef::new(BlockHash::new(block.hash), block.location))
                .collect(),
        })
    }

    pub async fn modify_file(
        &mut self,
        filename: &str,
        version: FileVersion,
        hashlist: Vec<BlockRef>,
    ) -> Result<(), RequestError<ModifyFileError>> {
        let request = ProtoModifyFileReq {
            filename: filename.to_string(),
            version: version.as_u64(),
            hashlist: hashlist
                .into_iter()
                .map(|block| ProtoBlockRef {
                    hash: block.hash.into_inner(),
                    location: block.location,
                })
                .collect(),
        };
        let reply = self.inner.modify_file(request).await?.into_inner();

        match reply.result {
            Some(proto_modify_file_result::Result::Ok(_)) => Ok(()),
            Some(proto_modify_file_result::Result::Err(ProtoFileError { err: Some(err) })) => {
                Err(Self::convert_modify_file_error(err))
            }
            Some(proto_modify_file_result::Result::Err(ProtoFileError { err: None })) => {
                Err(ClientError::MalformedReply("ModifyFile Err without payload").into())
            }
            None => Err(ClientError::MalformedReply("ModifyFile without result").into()),
        }
    }

    fn convert_modify_file_error(err: proto_file_error::Err) -> RequestError<ModifyFileError> {
        match err {
            proto_file_error::Err::WrongVersion(payload) => RequestError::Rejected(ModifyFileError::WrongVersion {
                current_version: FileVersion::new(payload.current_version),
            }),
            proto_file_error::Err::MissingBlocks(payload) => RequestError::Rejected(ModifyFileError::MissingBlocks {
                missing: payload.hashes.into_iter().map(BlockHash::new).collect(),
            }),
            proto_file_error::Err::NotLeader(payload) => RequestError::Rejected(ModifyFileError::NotLeader {
                leader: Self::convert_leader(payload.leader_id),
            }),
            proto_file_error::Err::ServerFault(fault) => ClientError::ServerFault(fault.message).into(),
            proto_file_error::Err::FileNotFound(_) => ClientError::MalformedReply("FileNotFound from ModifyFile").into(),
        }
    }

    pub async fn delete_file(&mut self, filename: &str, version: FileVersion) -> Result<(), RequestError<DeleteFileError>> {
        let request = ProtoDeleteFileReq {
            filename: filename.to_string(),
            version: version.as_u64(),
        };
        let reply = self.inner.delete_file(request).await?.into_inner();

        let err = match reply.result {
            Some(proto_delete_file_result::Result::Ok(_)) => return Ok(()),
            Some(proto_delete_file_result::Result::Err(ProtoFileError { err: Some(err) })) => err,
            Some(proto_delete_file_result::Result::Err(ProtoFileError { err: None })) => {
                return Err(ClientError::MalformedReply("DeleteFile Err without payload").into())
            }
            None => return Err(ClientError::MalformedReply("DeleteFile without result").into()),
        };

        Err(match err {
            proto_file_error::Err::FileNotFound(_) => RequestError::Rejected(DeleteFileError::FileNotFound),
            proto_file_error::Err::WrongVersion(payload) => RequestError::Rejected(DeleteFileError::WrongVersion {
                current_version: FileVersion::new(payload.current_version),
            }),
            proto_file_error::Err::NotLeader(payload) => RequestError::Rejected(DeleteFileError::NotLeader {
                leader: Self::convert_leader(payload.leader_id),
            }),
            proto_file_error::Err::ServerFault(fault) => ClientError::ServerFault(fault.message).into(),
            proto_file_error::Err::MissingBlocks(_) => ClientError::MalformedReply("MissingBlocks from DeleteFile").into(),
        })
    }

    fn convert_leader(leader_id: String) -> Option<ReplicaId> {
        if leader_id.is_empty() {
            None
        } else {
            Some(ReplicaId::new(leader_id))
        }
    }
}

/// BlockStoreClient talks to one block store shard.
#[derive(Clone)]
pub struct BlockStoreClient {
    inner: GrpcBlockStoreClient<Channel>,
}

impl BlockStoreClient {
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        Ok(BlockStoreClient {
            inner: connect(addr).await?,
        })
    }

    /// Store `data` under its own hash, and return the hash.
    pub async fn store_block(&mut self, data: Bytes) -> Result<BlockHash, ClientError> {
        let hash = BlockHash::of(&data);
        self.inner
            .store_block(ProtoStoreBlockReq {
                hash: hash.as_str().to_string(),
                data: data.to_vec(),
            })
            .await?;

        Ok(hash)
    }

    pub async fn get_block(&mut self, hash: &BlockHash) -> Result<Option<Bytes>, ClientError> {
        let reply = self
            .inner
            .get_block(ProtoGetBlockReq {
                hash: hash.as_str().to_string(),
            })
            .await?
            .into_inner();

        if reply.found {
            Ok(Some(Bytes::from(reply.data)))
        } else {
            Ok(None)
        }
    }

    pub async fn has_block(&mut self, hash: &BlockHash) -> Result<bool, ClientError> {
        let reply = self
            .inner
            .has_block(ProtoHasBlockReq {
                hash: hash.as_str().to_string(),
            })
            .await?
            .into_inner();

        Ok(reply.present)
    }
}
