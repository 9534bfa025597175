use crate::blockstore::BlockHash;
use std::fmt;

/// FileVersion of an active file or tombstone. Version 0 means the file was never written, so
/// the first accepted modification is version 1.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileVersion(u64);

impl FileVersion {
    pub const NEVER_WRITTEN: FileVersion = FileVersion(0);

    pub fn new(version: u64) -> Self {
        FileVersion(version)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The only version a modification or deletion may claim next.
    pub fn next(&self) -> Self {
        FileVersion(self.0 + 1)
    }
}

impl fmt::Debug for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// BlockRef points at one block of a file: its hash, and the address of the block store shard
/// holding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRef {
    pub hash: BlockHash,
    pub location: String,
}

impl BlockRef {
    pub fn new<S: Into<String>>(hash: BlockHash, location: S) -> Self {
        BlockRef {
            hash,
            location: location.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadFileOutput {
    pub version: FileVersion,
    /// Block sequence of the file, in order. Empty for deleted and never written files.
    pub hashlist: Vec<BlockRef>,
}
