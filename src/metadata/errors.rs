use crate::blockstore::BlockHash;
use crate::metadata::FileVersion;
use crate::replica::ReplicaId;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModifyFileError {
    /// Retry with `current_version.next()`, against a hashlist built on top of `current_version`.
    #[error("Wrong version, file is at {current_version:?}")]
    WrongVersion { current_version: FileVersion },
    /// Upload these blocks to their shards, then retry the same call.
    #[error("{} block(s) missing from their block store", .missing.len())]
    MissingBlocks { missing: Vec<BlockHash> },
    #[error("Not leader, leader is {leader:?}")]
    NotLeader { leader: Option<ReplicaId> },
    #[error("Block store {location} is unavailable")]
    BlockStoreUnavailable { location: String },
    #[error("{location} is not a configured block store")]
    UnknownBlockStore { location: String },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DeleteFileError {
    #[error("File not found")]
    FileNotFound,
    #[error("Wrong version, file is at {current_version:?}")]
    WrongVersion { current_version: FileVersion },
    #[error("Not leader, leader is {leader:?}")]
    NotLeader { leader: Option<ReplicaId> },
}
