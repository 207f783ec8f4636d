//! Tokio WebSocket transport
//!
//! The real [`Connector`]: each `open()` spawns a socket task around
//! `tokio_tungstenite::connect_async` and returns a handle immediately.
//! Handshake outcome, inbound frames, and closure all come back through
//! the client event channel tagged with the session generation. Must be
//! used inside a tokio runtime.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_util::sync::CancellationToken;

use claw_core::TransportError;
use claw_protocol::Outbound;

use super::{ConnectRequest, Connector, Transport, TransportEvent, TransportEventKind};
use crate::event::ClientEvent;

/// Closure code reported when the stream ends without a close frame.
const NO_CLOSE_FRAME: u16 = 1006;
/// Closure code when a close frame carries no status.
const NO_STATUS: u16 = 1005;

/// Opens WebSocket transports that report through an event channel.
pub struct WsConnector {
    events: mpsc::Sender<ClientEvent>,
}

impl WsConnector {
    /// Create a connector delivering events into the given channel.
    pub fn new(events: mpsc::Sender<ClientEvent>) -> Self {
        Self { events }
    }
}

impl Connector for WsConnector {
    fn open(&mut self, request: ConnectRequest) -> Result<Box<dyn Transport>, TransportError> {
        let (frames_tx, frames_rx) = mpsc::unbounded_channel::<String>();
        let cancel = CancellationToken::new();

        tokio::spawn(run_session(
            request,
            frames_rx,
            self.events.clone(),
            cancel.clone(),
        ));

        Ok(Box::new(WsTransport {
            frames: frames_tx,
            cancel,
        }))
    }
}

/// Handle to a live (or connecting) socket task.
struct WsTransport {
    frames: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl Transport for WsTransport {
    fn send(&mut self, frame: &Outbound) -> Result<(), TransportError> {
        let json = frame
            .to_json()
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        self.frames.send(json).map_err(|_| TransportError::Closed)
    }

    fn close(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The socket task: handshake, then pump frames both ways until the
/// link closes, errors, or the handle cancels it.
async fn run_session(
    request: ConnectRequest,
    mut frames: mpsc::UnboundedReceiver<String>,
    events: mpsc::Sender<ClientEvent>,
    cancel: CancellationToken,
) {
    let session = request.session;
    let emit = |kind: TransportEventKind| {
        let events = events.clone();
        async move {
            let _ = events
                .send(ClientEvent::Transport(TransportEvent { session, kind }))
                .await;
        }
    };

    let connected = tokio::select! {
        _ = cancel.cancelled() => return,
        result = connect_async(&request.url) => result,
    };

    let stream = match connected {
        Ok((stream, _response)) => stream,
        Err(e) => {
            emit(TransportEventKind::Error(e.to_string())).await;
            return;
        }
    };

    emit(TransportEventKind::Opened).await;

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(WsMessage::Close(None)).await;
                return;
            }

            frame = frames.recv() => match frame {
                Some(json) => {
                    if let Err(e) = sink.send(WsMessage::Text(json)).await {
                        emit(TransportEventKind::Error(e.to_string())).await;
                        return;
                    }
                }
                // Handle dropped without an explicit close.
                None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    return;
                }
            },

            incoming = source.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    emit(TransportEventKind::Message(text)).await;
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.into_owned()))
                        .unwrap_or((NO_STATUS, String::new()));
                    emit(TransportEventKind::Closed { code, reason }).await;
                    return;
                }
                // Pings are answered by the library; binary frames are
                // not part of the gateway contract.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(TransportEventKind::Error(e.to_string())).await;
                    return;
                }
                None => {
                    emit(TransportEventKind::Closed {
                        code: NO_CLOSE_FRAME,
                        reason: "connection reset".to_string(),
                    })
                    .await;
                    return;
                }
            }
        }
    }
}
