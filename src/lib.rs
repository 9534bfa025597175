mod actor;
mod api;
mod blockstore;
mod connection;
mod metadata;
mod replica;
mod server;
mod grpc {
    include!("../generated/metastore.rs");
}

pub use api::create_root_logger_for_file;
pub use api::create_root_logger_for_stdout;
pub use api::try_create_blockstore;
pub use api::try_create_metastore;
pub use api::BlockStoreClient;
pub use api::BlockStoreConfig;
pub use api::BlockStoreHandle;
pub use api::ClientError;
pub use api::ClusterConfig;
pub use api::ConfigError;
pub use api::ElectionEvent;
pub use api::ElectionEventListener;
pub use api::FollowerEventData;
pub use api::MetaStore;
pub use api::MetaStoreClient;
pub use api::MetaStoreConfig;
pub use api::MetaStoreCreationError;
pub use api::MetaStoreOptions;
pub use api::OptionsConfig;
pub use api::RequestError;
pub use blockstore::BlockHash;
pub use metadata::BlockRef;
pub use metadata::DeleteFileError;
pub use metadata::FileVersion;
pub use metadata::ModifyFileError;
pub use metadata::ReadFileOutput;
pub use replica::ReplicaId;

// `crate::{root_mod}` holds no code, only `mod` and `pub use` statements. No `mod` is `pub`;
// exports go through individual use statements, so each root_mod can organize its internals
// freely.
