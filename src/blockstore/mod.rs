mod hash;
mod oracle;
mod store;

pub use hash::BlockHash;
pub(crate) use oracle::BlockPresenceOracle;
pub(crate) use oracle::OracleError;
pub(crate) use oracle::RemoteBlockStores;
pub(crate) use store::BlockStore;
