mod pool;

pub(crate) use pool::Connect;
pub(crate) use pool::ConnectError;
pub(crate) use pool::ConnectionPool;
