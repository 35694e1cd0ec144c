use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_channel::mpsc;

use hub_protocol::{encode, HubError, LockState, RouteEntry};
use hub_runtime::SocketMessage;
use hub_state::{HubState, OutputKind};

/// The write path: validates against current state, enforces the lock
/// policy, encodes, and hands the text to the transport.
///
/// Never mutates state. A route only becomes real when the device echoes
/// it back and the interpreters record it, so optimistic local writes
/// would just drift from the hardware.
///
/// Gated operations return `Ok(false)` when the target's lock suppressed
/// the write; that is an answer, not an error. `NotConnected` is an error.
#[derive(Clone)]
pub struct RoutingApi {
    socket_tx: mpsc::Sender<SocketMessage>,
    connected: Arc<AtomicBool>,
}

impl RoutingApi {
    pub fn new(socket_tx: mpsc::Sender<SocketMessage>, connected: Arc<AtomicBool>) -> Self {
        Self {
            socket_tx,
            connected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, text: String) -> Result<(), HubError> {
        if !self.is_connected() {
            return Err(HubError::NotConnected);
        }
        self.socket_tx
            .clone()
            .try_send(SocketMessage::Send { text })
            .map_err(|_| HubError::ChannelClosed("Socket actor unavailable".into()))
    }

    /// Route `source` to a video output (global id). Denied by the
    /// output's lock unless forced.
    pub fn set_output_route(
        &self,
        state: &HubState,
        output: usize,
        source: usize,
        force: bool,
    ) -> Result<bool, HubError> {
        let counts = state.counts();
        if source >= counts.inputs {
            return Err(HubError::OutOfRangeIndex {
                space: "video inputs".into(),
                index: source,
                count: counts.inputs,
            });
        }
        let port = state.output(output).ok_or_else(|| HubError::OutOfRangeIndex {
            space: "video outputs".into(),
            index: output,
            count: counts.total_outputs(),
        })?;

        if port.lock == LockState::Owned && !force {
            return Ok(false);
        }

        let text = match port.kind {
            OutputKind::Primary => encode::route_output(port.wire_index, source),
            OutputKind::Monitor => encode::route_monitor(port.wire_index, source),
        };
        self.send(text)?;
        Ok(true)
    }

    /// Route one serial port to another. Denied by the destination's lock
    /// unless forced.
    pub fn set_serial_route(
        &self,
        state: &HubState,
        serial: usize,
        source: usize,
        force: bool,
    ) -> Result<bool, HubError> {
        let count = state.counts().serials;
        if source >= count {
            return Err(HubError::OutOfRangeIndex {
                space: "serial ports".into(),
                index: source,
                count,
            });
        }
        let port = state.serial(serial).ok_or_else(|| HubError::OutOfRangeIndex {
            space: "serial ports".into(),
            index: serial,
            count,
        })?;

        if port.lock == LockState::Owned && !force {
            return Ok(false);
        }

        self.send(encode::route_serial(serial, source))?;
        Ok(true)
    }

    /// Rename an input. Labels are not lock-gated.
    pub fn set_input_label(
        &self,
        state: &HubState,
        input: usize,
        name: &str,
    ) -> Result<(), HubError> {
        let counts = state.counts();
        if state.input(input).is_none() {
            return Err(HubError::OutOfRangeIndex {
                space: "video inputs".into(),
                index: input,
                count: counts.inputs,
            });
        }
        self.send(encode::rename_input(input, name))
    }

    /// Rename a video output (global id). Labels are not lock-gated.
    pub fn set_output_label(
        &self,
        state: &HubState,
        output: usize,
        name: &str,
    ) -> Result<(), HubError> {
        let counts = state.counts();
        let port = state.output(output).ok_or_else(|| HubError::OutOfRangeIndex {
            space: "video outputs".into(),
            index: output,
            count: counts.total_outputs(),
        })?;

        let text = match port.kind {
            OutputKind::Primary => encode::rename_output(port.wire_index, name),
            OutputKind::Monitor => encode::rename_monitor(port.wire_index, name),
        };
        self.send(text)
    }

    /// Rename a serial port. Labels are not lock-gated.
    pub fn set_serial_label(
        &self,
        state: &HubState,
        serial: usize,
        name: &str,
    ) -> Result<(), HubError> {
        let count = state.counts().serials;
        if state.serial(serial).is_none() {
            return Err(HubError::OutOfRangeIndex {
                space: "serial ports".into(),
                index: serial,
                count,
            });
        }
        self.send(encode::rename_serial(serial, name))
    }

    /// Set a video output's lock. Only `Unlocked`/`Owned` exist on the
    /// write side; a toggle request is resolved by the caller first.
    pub fn set_output_locked(
        &self,
        state: &HubState,
        output: usize,
        lock: LockState,
    ) -> Result<(), HubError> {
        let counts = state.counts();
        let port = state.output(output).ok_or_else(|| HubError::OutOfRangeIndex {
            space: "video outputs".into(),
            index: output,
            count: counts.total_outputs(),
        })?;

        let text = match port.kind {
            OutputKind::Primary => encode::lock_output(port.wire_index, lock),
            OutputKind::Monitor => encode::lock_monitor(port.wire_index, lock),
        };
        self.send(text)
    }

    /// Set a serial port's lock.
    pub fn set_serial_locked(
        &self,
        state: &HubState,
        serial: usize,
        lock: LockState,
    ) -> Result<(), HubError> {
        let count = state.counts().serials;
        if state.serial(serial).is_none() {
            return Err(HubError::OutOfRangeIndex {
                space: "serial ports".into(),
                index: serial,
                count,
            });
        }
        self.send(encode::lock_serial(serial, lock))
    }

    /// Bulk routing. Partitions by output kind and transmits at most two
    /// blocks, one per kind. Not lock-gated; bulk import restores a known
    /// layout and is expected to win. Returns the number of routes sent.
    pub fn set_multiple_output_routes(
        &self,
        state: &HubState,
        routes: &[RouteEntry],
    ) -> Result<usize, HubError> {
        let counts = state.counts();
        let mut primary = Vec::new();
        let mut monitor = Vec::new();

        for entry in routes {
            if entry.source >= counts.inputs {
                return Err(HubError::OutOfRangeIndex {
                    space: "video inputs".into(),
                    index: entry.source,
                    count: counts.inputs,
                });
            }
            let port = state
                .output(entry.output)
                .ok_or_else(|| HubError::OutOfRangeIndex {
                    space: "video outputs".into(),
                    index: entry.output,
                    count: counts.total_outputs(),
                })?;
            match port.kind {
                OutputKind::Primary => primary.push((port.wire_index, entry.source)),
                OutputKind::Monitor => monitor.push((port.wire_index, entry.source)),
            }
        }

        for text in encode::route_many(&primary, &monitor) {
            self.send(text)?;
        }
        Ok(routes.len())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use futures_channel::mpsc;
    use hub_protocol::PortCounts;

    fn test_api() -> (RoutingApi, mpsc::Receiver<SocketMessage>) {
        let (socket_tx, socket_rx) = mpsc::channel(100);
        let connected = Arc::new(AtomicBool::new(true));
        (RoutingApi::new(socket_tx, connected), socket_rx)
    }

    fn sized_state() -> HubState {
        let mut state = HubState::new();
        state.apply_counts(&PortCounts {
            inputs: 16,
            outputs: 16,
            monitors: 4,
            serials: 2,
        });
        state
    }

    fn sent_text(rx: &mut mpsc::Receiver<SocketMessage>) -> String {
        match rx.try_next() {
            Ok(Some(SocketMessage::Send { text })) => text,
            other => panic!("Expected Send, got {:?}", other),
        }
    }

    #[test]
    fn test_route_transmits_wire_text() {
        let (api, mut rx) = test_api();
        let state = sized_state();

        let sent = api.set_output_route(&state, 0, 3, false).unwrap();
        assert!(sent);
        assert_eq!(sent_text(&mut rx), "VIDEO OUTPUT ROUTING:\n0 3\n\n");
    }

    #[test]
    fn test_monitor_route_uses_wire_index() {
        let (api, mut rx) = test_api();
        let state = sized_state();

        // Global id 18 = primary count 16 + local index 2.
        api.set_output_route(&state, 18, 5, false).unwrap();
        assert_eq!(
            sent_text(&mut rx),
            "VIDEO MONITORING OUTPUT ROUTING:\n2 5\n\n"
        );
    }

    #[test]
    fn test_lock_gate_suppresses_route() {
        let (api, mut rx) = test_api();
        let mut state = sized_state();
        state.output_mut(4).unwrap().lock = LockState::Owned;

        let sent = api.set_output_route(&state, 4, 5, false).unwrap();
        assert!(!sent);
        assert!(rx.try_next().is_err()); // nothing transmitted
    }

    #[test]
    fn test_force_bypasses_lock_gate() {
        let (api, mut rx) = test_api();
        let mut state = sized_state();
        state.output_mut(4).unwrap().lock = LockState::Owned;

        let sent = api.set_output_route(&state, 4, 5, true).unwrap();
        assert!(sent);
        assert_eq!(sent_text(&mut rx), "VIDEO OUTPUT ROUTING:\n4 5\n\n");
    }

    #[test]
    fn test_not_connected_is_an_error() {
        let (socket_tx, _socket_rx) = mpsc::channel(100);
        let api = RoutingApi::new(socket_tx, Arc::new(AtomicBool::new(false)));
        let state = sized_state();

        match api.set_output_route(&state, 0, 1, false) {
            Err(HubError::NotConnected) => {}
            other => panic!("Expected NotConnected, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_output_is_an_error() {
        let (api, _rx) = test_api();
        let state = sized_state();

        match api.set_output_route(&state, 99, 1, false) {
            Err(HubError::OutOfRangeIndex { index, .. }) => assert_eq!(index, 99),
            other => panic!("Expected OutOfRangeIndex, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_not_lock_gated() {
        let (api, mut rx) = test_api();
        let mut state = sized_state();
        state.output_mut(2).unwrap().lock = LockState::Owned;

        api.set_output_label(&state, 2, "Program").unwrap();
        assert_eq!(sent_text(&mut rx), "OUTPUT LABELS:\n2 Program\n\n");
    }

    #[test]
    fn test_serial_route_gated() {
        let (api, mut rx) = test_api();
        let mut state = sized_state();
        state.serial_mut(0).unwrap().lock = LockState::Owned;

        assert!(!api.set_serial_route(&state, 0, 1, false).unwrap());
        assert!(rx.try_next().is_err());

        assert!(api.set_serial_route(&state, 0, 1, true).unwrap());
        assert_eq!(sent_text(&mut rx), "SERIAL PORT ROUTING:\n0 1\n\n");
    }

    #[test]
    fn test_set_lock_transmits_code() {
        let (api, mut rx) = test_api();
        let state = sized_state();

        api.set_output_locked(&state, 1, LockState::Owned).unwrap();
        assert_eq!(sent_text(&mut rx), "VIDEO OUTPUT LOCKS:\n1 O\n\n");

        api.set_output_locked(&state, 17, LockState::Unlocked).unwrap();
        assert_eq!(sent_text(&mut rx), "MONITORING OUTPUT LOCKS:\n1 U\n\n");
    }

    #[test]
    fn test_bulk_routes_at_most_two_blocks() {
        let (api, mut rx) = test_api();
        let state = sized_state();

        let routes = vec![
            RouteEntry { output: 0, source: 1 },
            RouteEntry { output: 1, source: 2 },
            RouteEntry { output: 16, source: 3 }, // first monitor
            RouteEntry { output: 19, source: 4 }, // last monitor
        ];
        let applied = api.set_multiple_output_routes(&state, &routes).unwrap();
        assert_eq!(applied, 4);

        assert_eq!(sent_text(&mut rx), "VIDEO OUTPUT ROUTING:\n0 1\n1 2\n\n");
        assert_eq!(
            sent_text(&mut rx),
            "VIDEO MONITORING OUTPUT ROUTING:\n0 3\n3 4\n\n"
        );
        assert!(rx.try_next().is_err());
    }

    #[test]
    fn test_bulk_rejects_out_of_range_before_sending() {
        let (api, mut rx) = test_api();
        let state = sized_state();

        let routes = vec![
            RouteEntry { output: 0, source: 1 },
            RouteEntry { output: 50, source: 1 },
        ];
        assert!(api.set_multiple_output_routes(&state, &routes).is_err());
        assert!(rx.try_next().is_err()); // whole batch rejected
    }
}
