use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_channel::mpsc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use framing::BlockReader;
use hub_protocol::{HubError, SystemEvent};
use hub_runtime::{hub_debug, hub_error, hub_info, Actor, HubMessage, ReconnectMessage, SocketMessage};

use crate::constants::socket::{CONNECT_TIMEOUT_MS, PING_INTERVAL_SECS, READ_BUFFER_SIZE};

/// SocketActor owns the TCP session with the router.
///
/// Responsibilities:
/// - Dial the router and split the stream into read and write halves
/// - Run the read loop: bytes through the block reader, complete blocks
///   to the HubActor
/// - Transmit pre-encoded block text on request
/// - Send the periodic keep-alive while connected
/// - Report session loss to both HubActor and ReconnectActor
pub struct SocketActor {
    hub_tx: mpsc::Sender<HubMessage>,
    reconnect_tx: mpsc::Sender<ReconnectMessage>,
    event_tx: mpsc::Sender<SystemEvent>,
    /// Own inbox sender, cloned into the keep-alive task so pings travel
    /// the same ordered path as caller commands.
    socket_tx: mpsc::Sender<SocketMessage>,

    /// Shared with RoutingApi; gates transmission without locking.
    connected: Arc<AtomicBool>,

    writer: Option<OwnedWriteHalf>,
    read_task: Option<JoinHandle<()>>,
    ping_task: Option<JoinHandle<()>>,
}

impl SocketActor {
    pub fn new(
        hub_tx: mpsc::Sender<HubMessage>,
        reconnect_tx: mpsc::Sender<ReconnectMessage>,
        event_tx: mpsc::Sender<SystemEvent>,
        socket_tx: mpsc::Sender<SocketMessage>,
        connected: Arc<AtomicBool>,
    ) -> Self {
        Self {
            hub_tx,
            reconnect_tx,
            event_tx,
            socket_tx,
            connected,
            writer: None,
            read_task: None,
            ping_task: None,
        }
    }

    async fn handle_connect(&mut self, host: String, port: u16) -> Result<(), HubError> {
        // A fresh dial replaces whatever session was up.
        self.teardown(false);

        let addr = format!("{}:{}", host, port);
        hub_info!("SocketActor: dialing {}", addr);

        let stream = match tokio::time::timeout(
            Duration::from_millis(CONNECT_TIMEOUT_MS),
            TcpStream::connect(&addr),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                hub_error!("SocketActor: connect to {} failed: {}", addr, e);
                self.report_lost(format!("connect failed: {}", e));
                return Ok(());
            }
            Err(_) => {
                hub_error!("SocketActor: connect to {} timed out", addr);
                self.report_lost("connect timed out".into());
                return Ok(());
            }
        };

        // Small writes, each one a complete block. Coalescing delay only
        // hurts here.
        if let Err(e) = stream.set_nodelay(true) {
            hub_debug!("SocketActor: set_nodelay failed: {}", e);
        }

        let (read_half, write_half) = stream.into_split();
        self.writer = Some(write_half);
        self.connected.store(true, Ordering::SeqCst);

        self.read_task = Some(spawn_read_loop(
            read_half,
            self.hub_tx.clone(),
            self.reconnect_tx.clone(),
            self.connected.clone(),
        ));
        self.ping_task = Some(spawn_ping_loop(
            self.socket_tx.clone(),
            self.connected.clone(),
        ));

        if self
            .hub_tx
            .clone()
            .try_send(HubMessage::SocketConnected)
            .is_err()
        {
            hub_error!("SocketActor: HubActor unavailable on connect");
        }
        let _ = self
            .reconnect_tx
            .clone()
            .try_send(ReconnectMessage::ConnectionEstablished);

        Ok(())
    }

    async fn handle_send(&mut self, text: String) -> Result<(), HubError> {
        let writer = match self.writer.as_mut() {
            Some(w) => w,
            None => {
                hub_debug!("SocketActor: send while disconnected, dropped");
                return Ok(());
            }
        };

        if let Err(e) = writer.write_all(text.as_bytes()).await {
            hub_error!("SocketActor: write failed: {}", e);
            self.teardown(false);
            self.report_lost(format!("write failed: {}", e));
        }

        Ok(())
    }

    fn handle_close(&mut self) {
        hub_info!("SocketActor: closing session");
        self.teardown(false);
        // Manual close: the HubActor hears about it, the ReconnectActor
        // does not (the caller already cleared the target).
        if self
            .hub_tx
            .clone()
            .try_send(HubMessage::SocketClosed {
                reason: "closed by caller".into(),
            })
            .is_err()
        {
            hub_error!("SocketActor: HubActor unavailable on close");
        }
    }

    /// Drops the writer and aborts the background tasks. Does not notify
    /// anyone; callers decide who needs to hear about it.
    fn teardown(&mut self, keep_connected_flag: bool) {
        if !keep_connected_flag {
            self.connected.store(false, Ordering::SeqCst);
        }
        if let Some(task) = self.read_task.take() {
            task.abort();
        }
        if let Some(task) = self.ping_task.take() {
            task.abort();
        }
        self.writer = None;
    }

    fn report_lost(&mut self, reason: String) {
        if self
            .hub_tx
            .clone()
            .try_send(HubMessage::SocketClosed {
                reason: reason.clone(),
            })
            .is_err()
        {
            hub_error!("SocketActor: HubActor unavailable on loss");
        }
        let _ = self
            .reconnect_tx
            .clone()
            .try_send(ReconnectMessage::ConnectionLost);
        let _ = self.event_tx.try_send(SystemEvent::StatusUpdate {
            message: format!("Connection lost: {}", reason),
        });
    }
}

impl Actor for SocketActor {
    type Message = SocketMessage;

    fn name(&self) -> &'static str {
        "SocketActor"
    }

    async fn handle(&mut self, msg: SocketMessage) -> Result<(), HubError> {
        match msg {
            SocketMessage::Connect { host, port } => self.handle_connect(host, port).await,
            SocketMessage::Send { text } => self.handle_send(text).await,
            SocketMessage::Close => {
                self.handle_close();
                Ok(())
            }
        }
    }

    async fn shutdown(&mut self) {
        self.teardown(false);
    }
}

/// Read loop: raw bytes through the framer and assembler, complete blocks
/// to the HubActor. Runs until EOF or a read error, then reports the loss.
fn spawn_read_loop(
    mut read_half: tokio::net::tcp::OwnedReadHalf,
    hub_tx: mpsc::Sender<HubMessage>,
    reconnect_tx: mpsc::Sender<ReconnectMessage>,
    connected: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BlockReader::new();
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        let reason = loop {
            match read_half.read(&mut buf).await {
                Ok(0) => break "remote closed".to_string(),
                Ok(n) => {
                    let chunk = buf.get(..n).unwrap_or_default();
                    for block in reader.feed(chunk) {
                        if hub_tx
                            .clone()
                            .try_send(HubMessage::Block(block))
                            .is_err()
                        {
                            hub_error!("SocketActor: HubActor inbox full, block dropped");
                        }
                    }
                }
                Err(e) => break format!("read failed: {}", e),
            }
        };

        // Only report if the session was still considered up; a manual
        // close or replacement dial already cleared the flag.
        if connected.swap(false, Ordering::SeqCst) {
            hub_info!("SocketActor: read loop ended: {}", reason);
            if hub_tx
                .clone()
                .try_send(HubMessage::SocketClosed { reason })
                .is_err()
            {
                hub_error!("SocketActor: HubActor unavailable on read loop exit");
            }
            let _ = reconnect_tx
                .clone()
                .try_send(ReconnectMessage::ConnectionLost);
        }
    })
}

/// Keep-alive loop: queues a ping on the actor's own inbox at a fixed
/// interval while the session is up. Routing through the inbox keeps
/// pings and command text on one writer.
fn spawn_ping_loop(
    socket_tx: mpsc::Sender<SocketMessage>,
    connected: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PING_INTERVAL_SECS));
        // The first tick fires immediately; the device just saw us connect.
        interval.tick().await;

        loop {
            interval.tick().await;
            if !connected.load(Ordering::SeqCst) {
                break;
            }
            if socket_tx
                .clone()
                .try_send(SocketMessage::Send {
                    text: hub_protocol::encode::PING.to_string(),
                })
                .is_err()
            {
                break;
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use futures::stream::StreamExt;
    use tokio::net::TcpListener;

    struct Harness {
        actor: SocketActor,
        hub_rx: mpsc::Receiver<HubMessage>,
        reconnect_rx: mpsc::Receiver<ReconnectMessage>,
        _event_rx: mpsc::Receiver<SystemEvent>,
        socket_rx: mpsc::Receiver<SocketMessage>,
        connected: Arc<AtomicBool>,
    }

    fn harness() -> Harness {
        let (hub_tx, hub_rx) = mpsc::channel(100);
        let (reconnect_tx, reconnect_rx) = mpsc::channel(100);
        let (event_tx, event_rx) = mpsc::channel(100);
        let (socket_tx, socket_rx) = mpsc::channel(100);
        let connected = Arc::new(AtomicBool::new(false));

        let actor = SocketActor::new(
            hub_tx,
            reconnect_tx,
            event_tx,
            socket_tx,
            connected.clone(),
        );
        Harness {
            actor,
            hub_rx,
            reconnect_rx,
            _event_rx: event_rx,
            socket_rx,
            connected,
        }
    }

    #[tokio::test]
    async fn test_connect_and_receive_block() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut h = harness();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream
                .write_all(b"VIDEO OUTPUT ROUTING:\n0 3\n\n")
                .await
                .unwrap();
            // Hold the stream open long enough for the read loop.
            tokio::time::sleep(Duration::from_millis(200)).await;
        });

        h.actor
            .handle(SocketMessage::Connect {
                host: addr.ip().to_string(),
                port: addr.port(),
            })
            .await
            .unwrap();

        assert!(h.connected.load(Ordering::SeqCst));

        let msg = h.hub_rx.next().await.unwrap();
        assert!(matches!(msg, HubMessage::SocketConnected));
        let msg = h.reconnect_rx.next().await.unwrap();
        assert!(matches!(msg, ReconnectMessage::ConnectionEstablished));

        let msg = h.hub_rx.next().await.unwrap();
        match msg {
            HubMessage::Block(block) => {
                assert_eq!(block.name, "VIDEO OUTPUT ROUTING");
                assert_eq!(block.lines, vec!["0 3"]);
            }
            other => panic!("Wrong message: {:?}", other),
        }

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_reaches_peer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut h = harness();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 256];
            let n = stream.read(&mut buf).await.unwrap();
            String::from_utf8(buf[..n].to_vec()).unwrap()
        });

        h.actor
            .handle(SocketMessage::Connect {
                host: addr.ip().to_string(),
                port: addr.port(),
            })
            .await
            .unwrap();
        h.actor
            .handle(SocketMessage::Send {
                text: "VIDEO OUTPUT ROUTING:\n2 5\n\n".into(),
            })
            .await
            .unwrap();

        assert_eq!(server.await.unwrap(), "VIDEO OUTPUT ROUTING:\n2 5\n\n");
    }

    #[tokio::test]
    async fn test_remote_close_reports_loss() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut h = harness();

        h.actor
            .handle(SocketMessage::Connect {
                host: addr.ip().to_string(),
                port: addr.port(),
            })
            .await
            .unwrap();

        // Accept and immediately drop the server side.
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);

        // SocketConnected, then SocketClosed when the read loop sees EOF.
        let msg = h.hub_rx.next().await.unwrap();
        assert!(matches!(msg, HubMessage::SocketConnected));
        let msg = h.hub_rx.next().await.unwrap();
        assert!(matches!(msg, HubMessage::SocketClosed { .. }));

        let msg = h.reconnect_rx.next().await.unwrap();
        assert!(matches!(msg, ReconnectMessage::ConnectionEstablished));
        let msg = h.reconnect_rx.next().await.unwrap();
        assert!(matches!(msg, ReconnectMessage::ConnectionLost));

        assert!(!h.connected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_connect_failure_reports_loss() {
        let mut h = harness();

        // Nothing listens on this port; bind-then-drop reserves a dead one.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        h.actor
            .handle(SocketMessage::Connect {
                host: addr.ip().to_string(),
                port: addr.port(),
            })
            .await
            .unwrap();

        let msg = h.hub_rx.next().await.unwrap();
        assert!(matches!(msg, HubMessage::SocketClosed { .. }));
        let msg = h.reconnect_rx.next().await.unwrap();
        assert!(matches!(msg, ReconnectMessage::ConnectionLost));
        assert!(!h.connected.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_manual_close_skips_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut h = harness();

        h.actor
            .handle(SocketMessage::Connect {
                host: addr.ip().to_string(),
                port: addr.port(),
            })
            .await
            .unwrap();
        let _ = listener.accept().await.unwrap();

        h.actor.handle(SocketMessage::Close).await.unwrap();

        let msg = h.hub_rx.next().await.unwrap();
        assert!(matches!(msg, HubMessage::SocketConnected));
        let msg = h.hub_rx.next().await.unwrap();
        match msg {
            HubMessage::SocketClosed { reason } => assert_eq!(reason, "closed by caller"),
            other => panic!("Wrong message: {:?}", other),
        }

        // ConnectionEstablished only; no ConnectionLost for a manual close.
        let msg = h.reconnect_rx.next().await.unwrap();
        assert!(matches!(msg, ReconnectMessage::ConnectionEstablished));
        assert!(h.reconnect_rx.try_next().is_err());
    }

    #[tokio::test]
    async fn test_send_while_disconnected_is_dropped() {
        let mut h = harness();

        h.actor
            .handle(SocketMessage::Send {
                text: "PING\n\n".into(),
            })
            .await
            .unwrap();

        assert!(h.hub_rx.try_next().is_err());
        assert!(h.socket_rx.try_next().is_err());
    }
}
