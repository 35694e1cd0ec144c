use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_channel::mpsc;

use hub_protocol::{HubError, SystemEvent};
use hub_runtime::{hub_debug, hub_info, Actor, ReconnectMessage, SocketMessage};

use crate::backoff::calculate_retry_delay;

/// Where to reconnect after a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectTarget {
    pub host: String,
    pub port: u16,
}

/// ReconnectActor redials the router after an unplanned drop.
///
/// Responsibilities:
/// - Remember the host/port when the caller connects
/// - On connection loss, schedule a redial with exponential backoff
/// - Reset the backoff schedule once a session is re-established
/// - Stand down entirely when the caller disconnects on purpose
///
/// Retries continue indefinitely at the capped delay; the router being
/// down for an hour is not a reason to give up on it.
pub struct ReconnectActor {
    target: Option<ReconnectTarget>,
    attempt: u32,
    socket_tx: mpsc::Sender<SocketMessage>,
    event_tx: mpsc::Sender<SystemEvent>,
    /// Checked by in-flight retry tasks so a ClearTarget cancels a redial
    /// that is already sleeping.
    armed: Arc<AtomicBool>,
}

impl ReconnectActor {
    pub fn new(
        socket_tx: mpsc::Sender<SocketMessage>,
        event_tx: mpsc::Sender<SystemEvent>,
    ) -> Self {
        Self {
            target: None,
            attempt: 0,
            socket_tx,
            event_tx,
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn handle_register_target(&mut self, host: String, port: u16) {
        hub_info!("ReconnectActor: watching {}:{}", host, port);
        self.target = Some(ReconnectTarget { host, port });
        self.attempt = 0;
        self.armed.store(true, Ordering::SeqCst);
    }

    fn handle_clear_target(&mut self) {
        hub_info!("ReconnectActor: standing down");
        self.target = None;
        self.attempt = 0;
        self.armed.store(false, Ordering::SeqCst);
    }

    fn handle_connection_lost(&mut self) {
        let target = match &self.target {
            Some(t) => t.clone(),
            None => {
                hub_debug!("ReconnectActor: loss with no target, ignoring");
                return;
            }
        };

        self.attempt = self.attempt.saturating_add(1);
        let delay_ms = calculate_retry_delay(self.attempt);

        hub_info!(
            "ReconnectActor: retry {} to {}:{} in {}ms",
            self.attempt,
            target.host,
            target.port,
            delay_ms
        );
        let _ = self.event_tx.try_send(SystemEvent::StatusUpdate {
            message: format!(
                "Reconnecting to {}:{} (attempt {})...",
                target.host, target.port, self.attempt
            ),
        });

        let socket_tx = self.socket_tx.clone();
        let armed = self.armed.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if !armed.load(Ordering::SeqCst) {
                return;
            }
            let _ = socket_tx.clone().try_send(SocketMessage::Connect {
                host: target.host,
                port: target.port,
            });
        });
    }

    fn handle_connection_established(&mut self) {
        if self.attempt > 0 {
            hub_info!(
                "ReconnectActor: session restored after {} attempts",
                self.attempt
            );
        }
        self.attempt = 0;
    }
}

impl Actor for ReconnectActor {
    type Message = ReconnectMessage;

    fn name(&self) -> &'static str {
        "ReconnectActor"
    }

    async fn handle(&mut self, msg: ReconnectMessage) -> Result<(), HubError> {
        match msg {
            ReconnectMessage::RegisterTarget { host, port } => {
                self.handle_register_target(host, port)
            }
            ReconnectMessage::ClearTarget => self.handle_clear_target(),
            ReconnectMessage::ConnectionLost => self.handle_connection_lost(),
            ReconnectMessage::ConnectionEstablished => self.handle_connection_established(),
        }
        Ok(())
    }
}
