use super::config::DeepgramConfig;
use anyhow::{Context, Result};
use futures::stream::{SplitSink, SplitStream};
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::handshake::client::generate_key;
use tokio_tungstenite::tungstenite::http::Request;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::info;

pub type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
pub type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Open the live transcription socket and split it into send/receive halves.
///
/// The caller owns both halves: binary PCM frames go down the sink, JSON
/// recognition events come up the stream.
pub async fn connect(config: &DeepgramConfig) -> Result<(WsSink, WsSource)> {
    let url = config.ws_url();
    info!("Connecting to transcription backend: {}", config.endpoint);

    let request = build_ws_request(&url, &config.api_key)?;

    let (ws_stream, _) = connect_async(request)
        .await
        .context("Failed to connect to transcription backend")?;

    info!("Connected to transcription backend");

    Ok(ws_stream.split())
}

/// Graceful end-of-stream control message, sent before closing the socket
pub fn close_stream_message() -> Message {
    Message::Text(serde_json::json!({ "type": "CloseStream" }).to_string())
}

fn build_ws_request(url: &str, api_key: &str) -> Result<Request<()>> {
    let uri: tokio_tungstenite::tungstenite::http::Uri =
        url.parse().context("Invalid transcription backend URL")?;

    let host = uri
        .host()
        .context("Transcription backend URL has no host")?
        .to_string();

    Request::builder()
        .uri(uri)
        .header("Host", host)
        .header("Connection", "Upgrade")
        .header("Upgrade", "websocket")
        .header("Sec-WebSocket-Version", "13")
        .header("Sec-WebSocket-Key", generate_key())
        .header("Authorization", format!("Token {}", api_key))
        .body(())
        .context("Failed to build WebSocket request")
}
