mod blockstore_server;
mod metastore_server;
mod shutdown;

pub(crate) use blockstore_server::BlockStoreRpcServer;
pub(crate) use metastore_server::MetaStoreRpcServer;
pub(crate) use shutdown::shutdown_signal;
pub(crate) use shutdown::ShutdownHandle;
pub(crate) use shutdown::ShutdownSignal;
