//! Full-duplex text-frame transport to one CDP endpoint. No ping/pong is
//! sent — closes are the only disconnect signal. The stream is hidden
//! behind sink/stream traits so the receiver loop (src/connection.rs) can
//! be driven against an in-process mock in tests instead of a live socket.

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::{CdpError, Result};

type RealWs = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// The sending half of a target's transport. Owned exclusively by
/// `Connection::call`-style senders; never touched by the receiver loop.
#[async_trait::async_trait]
pub trait TransportSink: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;
}

/// The receiving half, owned exclusively by the background receiver loop —
/// one per connection.
#[async_trait::async_trait]
pub trait TransportStream: Send {
    /// Returns `Ok(None)` when the remote side closed the connection.
    async fn recv_text(&mut self) -> Result<Option<String>>;
}

pub struct WebSocketSink(SplitSink<RealWs, WsMessage>);
pub struct WebSocketStreamHalf(SplitStream<RealWs>);

/// Opens the WebSocket at `ws_url` with no keepalive ping — an idle
/// connection is expected to stay silent until the browser has something
/// to say — and splits it into independent send/receive halves.
pub async fn connect(ws_url: &str) -> Result<(WebSocketSink, WebSocketStreamHalf)> {
    let (ws, _response) = tokio_tungstenite::connect_async(ws_url).await?;
    let (sink, stream) = ws.split();
    Ok((WebSocketSink(sink), WebSocketStreamHalf(stream)))
}

#[async_trait::async_trait]
impl TransportSink for WebSocketSink {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.0.send(WsMessage::Text(text.into())).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransportStream for WebSocketStreamHalf {
    async fn recv_text(&mut self) -> Result<Option<String>> {
        loop {
            match self.0.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(WsMessage::Binary(_))) => {
                    // CDP never sends binary frames; ignore anything that
                    // isn't text.
                    continue;
                }
                Some(Ok(WsMessage::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(CdpError::Ws(err)),
            }
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use tokio::sync::mpsc;

    /// An in-process stand-in for a live browser socket: `outbound` captures
    /// everything `Connection` sends, `inbound` feeds frames to the receiver
    /// as if the browser had sent them.
    pub struct MockSink(pub mpsc::UnboundedSender<String>);
    pub struct MockStream(pub mpsc::UnboundedReceiver<String>);

    pub struct MockHandle {
        pub inbound: mpsc::UnboundedSender<String>,
        pub outbound: mpsc::UnboundedReceiver<String>,
    }

    pub fn pair() -> ((MockSink, MockStream), MockHandle) {
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        (
            (MockSink(out_tx), MockStream(in_rx)),
            MockHandle {
                inbound: in_tx,
                outbound: out_rx,
            },
        )
    }

    #[async_trait::async_trait]
    impl TransportSink for MockSink {
        async fn send_text(&mut self, text: String) -> Result<()> {
            self.0.send(text).map_err(|_| CdpError::ConnectionLost)
        }
    }

    #[async_trait::async_trait]
    impl TransportStream for MockStream {
        async fn recv_text(&mut self) -> Result<Option<String>> {
            Ok(self.0.recv().await)
        }
    }
}
