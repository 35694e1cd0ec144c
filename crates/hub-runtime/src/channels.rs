use framing::Block;
use futures_channel::mpsc;
use hub_protocol::{HubCommand, SystemEvent};

/// Messages for the HubActor: caller commands plus everything the
/// transport reports back.
#[derive(Debug, Clone)]
pub enum HubMessage {
    /// Command from the hosting shell
    Command(HubCommand),
    /// A complete protocol block from the device
    Block(Block),
    /// Transport established a session
    SocketConnected,
    /// Transport lost or closed the session
    SocketClosed { reason: String },
}

/// Messages for the SocketActor, which owns the TCP connection.
#[derive(Debug, Clone)]
pub enum SocketMessage {
    Connect { host: String, port: u16 },
    /// Pre-encoded block text to transmit
    Send { text: String },
    Close,
}

/// Messages for the ReconnectActor.
#[derive(Debug, Clone)]
pub enum ReconnectMessage {
    /// Remember where to reconnect after a drop
    RegisterTarget { host: String, port: u16 },
    /// Forget the target (manual disconnect)
    ClearTarget,
    /// Connection dropped; start the backoff schedule
    ConnectionLost,
    /// Connection is up again; reset the backoff schedule
    ConnectionEstablished,
}

/// Handles for spawning actors
pub struct ActorHandles {
    pub hub_rx: mpsc::Receiver<HubMessage>,
    pub socket_rx: mpsc::Receiver<SocketMessage>,
    pub reconnect_rx: mpsc::Receiver<ReconnectMessage>,
    pub event_tx: mpsc::Sender<SystemEvent>,
}

/// Channel manager for actor communication
///
/// This manages all communication channels between actors and provides
/// a unified interface for sending messages.
pub struct ChannelManager {
    // Senders for each actor (all Clone)
    // Using bounded channels to prevent memory exhaustion under high load
    hub_tx: mpsc::Sender<HubMessage>,
    socket_tx: mpsc::Sender<SocketMessage>,
    reconnect_tx: mpsc::Sender<ReconnectMessage>,

    // Event receiver (NOT cloned, replaced with dummy in Clone impl)
    // Note: Clone creates a disconnected receiver - use take_event_receiver() before cloning
    event_rx: mpsc::Receiver<SystemEvent>,
}

impl Clone for ChannelManager {
    fn clone(&self) -> Self {
        // The real event_rx should be taken with take_event_receiver() before cloning
        let (_dummy_tx, dummy_rx) = mpsc::channel(1);
        Self {
            hub_tx: self.hub_tx.clone(),
            socket_tx: self.socket_tx.clone(),
            reconnect_tx: self.reconnect_tx.clone(),
            event_rx: dummy_rx, // Dummy receiver (disconnected)
        }
    }
}

impl ChannelManager {
    /// Create a new channel manager and actor handles
    ///
    /// Returns (ChannelManager for the shell, ActorHandles for spawning actors)
    ///
    /// Channel capacities:
    /// - hub_tx: 512 - commands plus the device's startup dump (a large
    ///   router announces hundreds of blocks in one burst)
    /// - socket_tx: 256 - outbound command text (moderate frequency)
    /// - reconnect_tx: 64 - reconnection scheduling (low frequency)
    /// - event_tx: 1024 - events for the shell
    pub fn new() -> (Self, ActorHandles) {
        let (hub_tx, hub_rx) = mpsc::channel(512);
        let (socket_tx, socket_rx) = mpsc::channel(256);
        let (reconnect_tx, reconnect_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(1024);

        let handles = ActorHandles {
            hub_rx,
            socket_rx,
            reconnect_rx,
            event_tx,
        };

        let manager = Self {
            hub_tx,
            socket_tx,
            reconnect_tx,
            event_rx,
        };

        (manager, handles)
    }

    /// Send a command to the HubActor
    pub fn send_command(&self, cmd: HubCommand) -> Result<(), String> {
        self.hub_tx
            .clone()
            .try_send(HubMessage::Command(cmd))
            .map_err(|e| {
                if e.is_full() {
                    "System overloaded: Too many pending commands. Please slow down.".to_string()
                } else {
                    "System error: Hub actor unavailable.".to_string()
                }
            })
    }

    /// Open a connection to the router and register it for auto-reconnect
    pub fn connect(&self, host: &str, port: u16) -> Result<(), String> {
        self.reconnect_tx
            .clone()
            .try_send(ReconnectMessage::RegisterTarget {
                host: host.to_string(),
                port,
            })
            .map_err(|_| "System error: Reconnect actor unavailable.".to_string())?;
        self.socket_tx
            .clone()
            .try_send(SocketMessage::Connect {
                host: host.to_string(),
                port,
            })
            .map_err(|_| "System error: Socket actor unavailable.".to_string())
    }

    /// Close the connection and stop reconnecting
    pub fn disconnect(&self) -> Result<(), String> {
        self.reconnect_tx
            .clone()
            .try_send(ReconnectMessage::ClearTarget)
            .map_err(|_| "System error: Reconnect actor unavailable.".to_string())?;
        self.socket_tx
            .clone()
            .try_send(SocketMessage::Close)
            .map_err(|_| "System error: Socket actor unavailable.".to_string())
    }

    /// Transmit pre-encoded block text as-is (diagnostics and tests)
    pub fn send_raw(&self, text: &str) -> Result<(), String> {
        self.socket_tx
            .clone()
            .try_send(SocketMessage::Send {
                text: text.to_string(),
            })
            .map_err(|_| "System error: Socket actor unavailable.".to_string())
    }

    /// Get mutable reference to event receiver
    ///
    /// This allows the shell to poll for events from actors
    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<SystemEvent> {
        &mut self.event_rx
    }

    /// Take ownership of event receiver
    ///
    /// This allows the shell to move the receiver into a spawned task
    pub fn take_event_receiver(&mut self) -> mpsc::Receiver<SystemEvent> {
        let (_new_tx, new_rx) = mpsc::channel(1);
        // Note: _new_tx is dropped, so events sent after this call will be lost
        // This is intentional - the receiver should only be taken once
        std::mem::replace(&mut self.event_rx, new_rx)
    }

    /// Clone senders for direct actor-to-actor communication
    ///
    /// These clones can be passed to actors for internal messaging
    pub fn hub_sender(&self) -> mpsc::Sender<HubMessage> {
        self.hub_tx.clone()
    }

    pub fn socket_sender(&self) -> mpsc::Sender<SocketMessage> {
        self.socket_tx.clone()
    }

    pub fn reconnect_sender(&self) -> mpsc::Sender<ReconnectMessage> {
        self.reconnect_tx.clone()
    }
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new().0
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use futures::stream::StreamExt;

    #[tokio::test]
    async fn test_channel_manager_creation() {
        let (_manager, _handles) = ChannelManager::new();
        // Just verify it can be created
    }

    #[tokio::test]
    async fn test_send_route_command() {
        let (manager, mut handles) = ChannelManager::new();

        manager
            .send_command(HubCommand::Route {
                output: 2,
                source: 5,
                force: false,
            })
            .unwrap();

        // Verify message was routed to HubActor
        let msg = handles.hub_rx.next().await.unwrap();
        match msg {
            HubMessage::Command(HubCommand::Route { output, source, .. }) => {
                assert_eq!(output, 2);
                assert_eq!(source, 5);
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[tokio::test]
    async fn test_connect_registers_and_dials() {
        let (manager, mut handles) = ChannelManager::new();

        manager.connect("192.168.1.10", 9990).unwrap();

        let msg = handles.reconnect_rx.next().await.unwrap();
        match msg {
            ReconnectMessage::RegisterTarget { host, port } => {
                assert_eq!(host, "192.168.1.10");
                assert_eq!(port, 9990);
            }
            _ => panic!("Wrong message type"),
        }

        let msg = handles.socket_rx.next().await.unwrap();
        match msg {
            SocketMessage::Connect { host, port } => {
                assert_eq!(host, "192.168.1.10");
                assert_eq!(port, 9990);
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[tokio::test]
    async fn test_disconnect_clears_target() {
        let (manager, mut handles) = ChannelManager::new();

        manager.disconnect().unwrap();

        let msg = handles.reconnect_rx.next().await.unwrap();
        assert!(matches!(msg, ReconnectMessage::ClearTarget));
        let msg = handles.socket_rx.next().await.unwrap();
        assert!(matches!(msg, SocketMessage::Close));
    }

    #[tokio::test]
    async fn test_event_receiver() {
        let (mut manager, mut handles) = ChannelManager::new();

        // Simulate an actor sending an event
        handles
            .event_tx
            .try_send(SystemEvent::StatusUpdate {
                message: "Test".into(),
            })
            .ok();

        // Drop handles to close channels
        drop(handles);

        // Receive event
        let event = manager.event_receiver().next().await.unwrap();
        match event {
            SystemEvent::StatusUpdate { message } => {
                assert_eq!(message, "Test");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[tokio::test]
    async fn test_actor_to_actor_messaging() {
        let (manager, mut handles) = ChannelManager::new();

        // Get a clone of the hub sender (as the socket actor would)
        let mut hub_tx = manager.hub_sender();

        // Simulate SocketActor forwarding a block
        hub_tx
            .try_send(HubMessage::Block(Block {
                name: "VIDEO OUTPUT ROUTING".into(),
                lines: vec!["0 3".into()],
            }))
            .ok();

        // Verify HubActor receives it
        let msg = handles.hub_rx.next().await.unwrap();
        match msg {
            HubMessage::Block(block) => {
                assert_eq!(block.name, "VIDEO OUTPUT ROUTING");
                assert_eq!(block.lines, vec!["0 3"]);
            }
            _ => panic!("Wrong message type"),
        }
    }
}
