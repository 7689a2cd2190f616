use crate::error::Result;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const LIVE_WS_URL: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Build the live endpoint URL with the API key attached as a query parameter.
///
/// # Errors
/// Returns an error if `base` is not a valid URL.
#[allow(clippy::result_large_err)]
pub fn live_url(base: &str, api_key: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// Establish a WebSocket connection to the live endpoint.
///
/// # Errors
/// Returns an error if the URL is invalid or the handshake fails.
pub async fn connect(base: &str, api_key: &str) -> Result<WsStream> {
    let url = live_url(base, api_key)?;

    let req = tokio_tungstenite::tungstenite::client::IntoClientRequest::into_client_request(
        url.as_str(),
    )?;
    let (ws_stream, response) = connect_async(req).await?;

    tracing::info!(status = %response.status(), "Connected to live endpoint");

    Ok(ws_stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_url_carries_key() {
        let url = live_url(LIVE_WS_URL, "abc 123").unwrap();
        assert_eq!(url.scheme(), "wss");
        assert!(url.as_str().ends_with("BidiGenerateContent?key=abc+123"));
    }
}
