use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;
use tonic::codegen::http::uri;
use tonic::transport::Endpoint;

/// Connect is implemented by the gRPC clients that live in a `ConnectionPool`.
#[async_trait::async_trait]
pub(crate) trait Connect: Sized + Clone + Send + 'static {
    async fn connect(endpoint: Endpoint) -> Result<Self, ConnectError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConnectError {
    #[error("Invalid address: {0}")]
    InvalidUri(#[from] uri::InvalidUri),
    #[error("Failed to connect: {0}")]
    ConnectFailure(Box<dyn Error + Send + Sync>),
}

impl From<tonic::transport::Error> for ConnectError {
    fn from(e: tonic::transport::Error) -> Self {
        ConnectError::ConnectFailure(e.into())
    }
}

/// ConnectionPool holds at most one connection per `host:port` address. Connections are only
/// established when first needed, and a caller that sees a connection misbehave evicts it so that
/// the next call reconnects.
pub(crate) struct ConnectionPool<C: Connect> {
    connections: Arc<Mutex<HashMap<String, C>>>,
}

impl<C: Connect> Clone for ConnectionPool<C> {
    fn clone(&self) -> Self {
        ConnectionPool {
            connections: self.connections.clone(),
        }
    }
}

impl<C: Connect> ConnectionPool<C> {
    pub(crate) fn new() -> Self {
        ConnectionPool {
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) async fn get(&self, addr: &str) -> Result<C, ConnectError> {
        if let Some(client) = self.connections.lock().await.get(addr) {
            return Ok(client.clone());
        }

        // Lock isn't held while connecting, so one slow address can't stall calls to the others.
        // Two concurrent connects to the same address are possible, last one wins.
        let endpoint = Endpoint::from_shared(format!("http://{}", addr))?;
        let client = C::connect(endpoint).await?;
        self.connections.lock().await.insert(addr.to_string(), client.clone());

        Ok(client)
    }

    pub(crate) async fn evict(&self, addr: &str) {
        self.connections.lock().await.remove(addr);
    }

    #[cfg(test)]
    pub(crate) async fn is_cached(&self, addr: &str) -> bool {
        self.connections.lock().await.contains_key(addr)
    }
}
