use sha2::{Digest, Sha256};
use std::fmt;

/// BlockHash is the lowercase hex SHA-256 digest of a block's bytes. It is both the block's key
/// in a block store and, read as a big integer, what picks the shard the block lives on.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash(String);

impl BlockHash {
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        BlockHash(hex::encode(hasher.finalize()))
    }

    /// Wrap a hash that came off the wire. Not validated; a hash that isn't hex simply never
    /// matches a stored block.
    pub fn new<S: Into<String>>(hash: S) -> Self {
        BlockHash(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Index of the shard this block belongs to: the hash as a hex integer, modulo
    /// `shard_count`. None if there are no shards, or if the hash isn't hex.
    pub fn shard_for(&self, shard_count: usize) -> Option<usize> {
        if shard_count == 0 || self.0.is_empty() {
            return None;
        }

        // Digest doesn't fit in any primitive, so reduce one hex digit at a time.
        let modulus = shard_count as u128;
        let mut remainder = 0u128;
        for c in self.0.chars() {
            let digit = c.to_digit(16)? as u128;
            remainder = (remainder * 16 + digit) % modulus;
        }

        Some(remainder as usize)
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex() {
        assert_eq!(
            BlockHash::of(b"hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn shard_is_hash_mod_count() {
        assert_eq!(BlockHash::new("0").shard_for(3), Some(0));
        assert_eq!(BlockHash::new("a").shard_for(3), Some(1));
        assert_eq!(BlockHash::new("ff").shard_for(4), Some(3));
        assert_eq!(BlockHash::new("100").shard_for(7), Some(256 % 7));
        assert_eq!(BlockHash::new("FF").shard_for(10), Some(5));

        // 2cf2...9824 is even, and its last hex digit (4) makes it 0 mod 4.
        assert_eq!(BlockHash::of(b"hello").shard_for(2), Some(0));
        assert_eq!(BlockHash::of(b"hello").shard_for(4), Some(0));
        assert_eq!(BlockHash::of(b"hello").shard_for(1), Some(0));
    }

    #[test]
    fn shard_for_bad_input() {
        assert_eq!(BlockHash::new("abc").shard_for(0), None);
        assert_eq!(BlockHash::new("xyz").shard_for(3), None);
        assert_eq!(BlockHash::new("").shard_for(3), None);
    }
}
