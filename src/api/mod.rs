//! This mod is meant to hold most of the code for the library's client-facing API.
mod client;
mod config;
mod event_bus;
mod logging;
mod options;
mod wiring;

pub use client::BlockStoreClient;
pub use client::ClientError;
pub use client::MetaStoreClient;
pub use client::RequestError;
pub use config::ClusterConfig;
pub use config::ConfigError;
pub use config::OptionsConfig;
pub use event_bus::ElectionEvent;
pub use event_bus::ElectionEventListener;
pub use event_bus::FollowerEventData;
pub use logging::create_root_logger_for_file;
pub use logging::create_root_logger_for_stdout;
pub use options::MetaStoreOptions;
pub use wiring::try_create_blockstore;
pub use wiring::try_create_metastore;
pub use wiring::BlockStoreConfig;
pub use wiring::BlockStoreHandle;
pub use wiring::MetaStore;
pub use wiring::MetaStoreConfig;
pub use wiring::MetaStoreCreationError;
