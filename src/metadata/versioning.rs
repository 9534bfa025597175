use crate::blockstore::{BlockHash, BlockPresenceOracle, OracleError};
use crate::metadata::{BlockRef, DeleteFileError, FileVersion, MetadataTable, ModifyFileError, ReadFileOutput};
use crate::replica::{ElectionStateChangeListener, ElectionStateSnapshot, ReplicaId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// WriteGuard decides who may modify or delete files.
#[derive(Clone)]
pub(crate) enum WriteGuard {
    /// Every replica accepts writes into its own table.
    AnyReplica,
    /// Only the current leader accepts writes. Others point the caller at the leader.
    LeaderOnly(ElectionStateChangeListener),
}

impl WriteGuard {
    fn check(&self) -> Result<(), Option<ReplicaId>> {
        match self {
            WriteGuard::AnyReplica => Ok(()),
            WriteGuard::LeaderOnly(listener) => match listener.current() {
                ElectionStateSnapshot::Leader => Ok(()),
                ElectionStateSnapshot::Follower(leader_id) => Err(Some(leader_id)),
                ElectionStateSnapshot::Candidate | ElectionStateSnapshot::FollowerNoLeader => Err(None),
            },
        }
    }
}

/// MetadataService implements optimistic concurrency over the replica's `MetadataTable`.
///
/// The table lock is held for the whole of a modification, block presence checks included, so
/// check-then-commit is atomic with respect to every other call on this replica.
#[derive(Clone)]
pub(crate) struct MetadataService {
    logger: slog::Logger,
    table: Arc<Mutex<MetadataTable>>,
    oracle: Arc<dyn BlockPresenceOracle>,
    write_guard: WriteGuard,
}

impl MetadataService {
    pub(crate) fn new(logger: slog::Logger, oracle: Arc<dyn BlockPresenceOracle>, write_guard: WriteGuard) -> Self {
        MetadataService {
            logger,
            table: Arc::new(Mutex::new(MetadataTable::new())),
            oracle,
            write_guard,
        }
    }

    pub(crate) async fn read_file(&self, filename: &str) -> ReadFileOutput {
        self.table.lock().await.read(filename)
    }

    pub(crate) async fn modify_file(
        &self,
        filename: String,
        version: FileVersion,
        hashlist: Vec<BlockRef>,
    ) -> Result<(), ModifyFileError> {
        self.write_guard
            .check()
            .map_err(|leader| ModifyFileError::NotLeader { leader })?;

        let mut table = self.table.lock().await;

        let current_version = table.current_version(&filename);
        if version != current_version.next() {
            slog::info!(
                self.logger,
                "Rejecting modify of {:?}: asked for {:?}, current is {:?}",
                filename,
                version,
                current_version
            );
            return Err(ModifyFileError::WrongVersion { current_version });
        }

        let missing = self.find_missing_blocks(&hashlist).await?;
        if !missing.is_empty() {
            slog::info!(
                self.logger,
                "Rejecting modify of {:?}: {} missing block(s)",
                filename,
                missing.len()
            );
            return Err(ModifyFileError::MissingBlocks { missing });
        }

        slog::info!(self.logger, "Committed {:?} at {:?}", filename, version);
        table.install(filename, version, hashlist);

        Ok(())
    }

    pub(crate) async fn delete_file(&self, filename: String, version: FileVersion) -> Result<(), DeleteFileError> {
        self.write_guard
            .check()
            .map_err(|leader| DeleteFileError::NotLeader { leader })?;

        let mut table = self.table.lock().await;

        if !table.is_active(&filename) {
            return Err(DeleteFileError::FileNotFound);
        }

        let current_version = table.current_version(&filename);
        if version != current_version.next() {
            slog::info!(
                self.logger,
                "Rejecting delete of {:?}: asked for {:?}, current is {:?}",
                filename,
                version,
                current_version
            );
            return Err(DeleteFileError::WrongVersion { current_version });
        }

        slog::info!(self.logger, "Deleted {:?} at {:?}", filename, version);
        table.tombstone(filename, version);

        Ok(())
    }

    /// Hashes absent from their block store, deduplicated, in hashlist order.
    async fn find_missing_blocks(&self, hashlist: &[BlockRef]) -> Result<Vec<BlockHash>, ModifyFileError> {
        let mut checked = HashSet::with_capacity(hashlist.len());
        let mut missing = Vec::new();

        for block in hashlist {
            if !checked.insert((block.location.as_str(), &block.hash)) {
                continue;
            }

            match self.oracle.has_block(&block.location, &block.hash).await {
                Ok(true) => {}
                Ok(false) => {
                    if !missing.contains(&block.hash) {
                        missing.push(block.hash.clone());
                    }
                }
                Err(OracleError::UnknownLocation(location)) => {
                    return Err(ModifyFileError::UnknownBlockStore { location });
                }
                Err(OracleError::Unavailable { location, reason }) => {
                    slog::warn!(self.logger, "Block store {} unavailable: {}", location, reason);
                    return Err(ModifyFileError::BlockStoreUnavailable { location });
                }
            }
        }

        Ok(missing)
    }
}
