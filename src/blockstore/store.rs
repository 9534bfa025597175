use crate::blockstore::BlockHash;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// BlockStore is one shard's in-memory hash to bytes map. Blocks are never deleted; a block that
/// no file references anymore just stays.
#[derive(Clone)]
pub(crate) struct BlockStore {
    blocks: Arc<RwLock<HashMap<BlockHash, Bytes>>>,
}

impl BlockStore {
    pub(crate) fn new() -> Self {
        BlockStore {
            blocks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub(crate) async fn store_block(&self, hash: BlockHash, data: Bytes) {
        self.blocks.write().await.insert(hash, data);
    }

    pub(crate) async fn get_block(&self, hash: &BlockHash) -> Option<Bytes> {
        self.blocks.read().await.get(hash).cloned()
    }

    pub(crate) async fn has_block(&self, hash: &BlockHash) -> bool {
        self.blocks.read().await.contains_key(hash)
    }
}
