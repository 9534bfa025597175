use crate::metadata::{BlockRef, FileVersion, ReadFileOutput};
use std::collections::HashMap;

/// MetadataTable maps each filename to either its active record or the tombstone of its last
/// deletion. A single map of one or the other keeps the two mutually exclusive.
pub(crate) struct MetadataTable {
    files: HashMap<String, Entry>,
}

enum Entry {
    Active { version: FileVersion, hashlist: Vec<BlockRef> },
    Tombstone { version: FileVersion },
}

impl MetadataTable {
    pub(crate) fn new() -> Self {
        MetadataTable { files: HashMap::new() }
    }

    pub(crate) fn read(&self, filename: &str) -> ReadFileOutput {
        match self.files.get(filename) {
            Some(Entry::Active { version, hashlist }) => ReadFileOutput {
                version: *version,
                hashlist: hashlist.clone(),
            },
            Some(Entry::Tombstone { version }) => ReadFileOutput {
                version: *version,
                hashlist: Vec::new(),
            },
            None => ReadFileOutput {
                version: FileVersion::NEVER_WRITTEN,
                hashlist: Vec::new(),
            },
        }
    }

    /// Version of the active record, else of the tombstone, else `NEVER_WRITTEN`.
    pub(crate) fn current_version(&self, filename: &str) -> FileVersion {
        match self.files.get(filename) {
            Some(Entry::Active { version, .. }) | Some(Entry::Tombstone { version }) => *version,
            None => FileVersion::NEVER_WRITTEN,
        }
    }

    pub(crate) fn is_active(&self, filename: &str) -> bool {
        matches!(self.files.get(filename), Some(Entry::Active { .. }))
    }

    /// Install a new active record, replacing an older record or a tombstone.
    pub(crate) fn install(&mut self, filename: String, version: FileVersion, hashlist: Vec<BlockRef>) {
        self.files.insert(filename, Entry::Active { version, hashlist });
    }

    /// Replace the active record with a tombstone at `version`.
    pub(crate) fn tombstone(&mut self, filename: String, version: FileVersion) {
        self.files.insert(filename, Entry::Tombstone { version });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockstore::BlockHash;

    #[test]
    fn lifecycle() {
        let mut table = MetadataTable::new();
        let hashlist = vec![BlockRef::new(BlockHash::new("h1"), "127.0.0.1:7001")];

        assert_eq!(table.current_version("f.txt"), FileVersion::NEVER_WRITTEN);
        assert!(!table.is_active("f.txt"));

        table.install("f.txt".into(), FileVersion::new(1), hashlist.clone());
        assert!(table.is_active("f.txt"));
        assert_eq!(
            table.read("f.txt"),
            ReadFileOutput {
                version: FileVersion::new(1),
                hashlist
            }
        );

        table.tombstone("f.txt".into(), FileVersion::new(2));
        assert!(!table.is_active("f.txt"));
        assert_eq!(table.current_version("f.txt"), FileVersion::new(2));
        assert!(table.read("f.txt").hashlist.is_empty());

        table.install("f.txt".into(), FileVersion::new(3), Vec::new());
        assert!(table.is_active("f.txt"));
        assert_eq!(table.current_version("f.txt"), FileVersion::new(3));
    }
}
