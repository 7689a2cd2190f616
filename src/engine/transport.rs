use crate::protocol::client_messages::ClientMessage;
use crate::protocol::models::Setup;
use crate::protocol::server_messages::ServerMessage;
use crate::{LiveClient, Result};
use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One open live connection as seen by the engine.
pub trait Transport: Send {
    fn send(&mut self, message: ClientMessage) -> BoxFuture<'_, Result<()>>;
    /// `Ok(None)` once the peer has closed the connection normally.
    fn next_message(&mut self) -> BoxFuture<'_, Result<Option<ServerMessage>>>;
    fn close(&mut self) -> BoxFuture<'_, Result<()>>;
}

/// Opens live connections. The returned transport has already sent `setup`.
pub trait Connector: Send + Sync {
    fn connect(&self, setup: Setup) -> BoxFuture<'_, Result<Box<dyn Transport>>>;
}

/// Connector for the hosted WebSocket endpoint.
#[derive(Clone)]
pub struct WsConnector {
    url: String,
    api_key: String,
}

impl WsConnector {
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for WsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnector")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Connector for WsConnector {
    fn connect(&self, setup: Setup) -> BoxFuture<'_, Result<Box<dyn Transport>>> {
        Box::pin(async move {
            let mut client = LiveClient::connect(&self.url, &self.api_key).await?;
            client.send(ClientMessage::setup(setup)).await?;
            Ok(Box::new(WsTransport { client }) as Box<dyn Transport>)
        })
    }
}

struct WsTransport {
    client: LiveClient,
}

impl Transport for WsTransport {
    fn send(&mut self, message: ClientMessage) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.client.send(message).await })
    }

    fn next_message(&mut self) -> BoxFuture<'_, Result<Option<ServerMessage>>> {
        Box::pin(async move { self.client.next_message().await })
    }

    fn close(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.client.close().await })
    }
}
