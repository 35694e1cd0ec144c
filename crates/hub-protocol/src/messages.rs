use serde::{Deserialize, Serialize};

use crate::lock::LockState;

/// Port population announced by the device in its `VIDEOHUB DEVICE` block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortCounts {
    pub inputs: usize,
    pub outputs: usize,
    pub monitors: usize,
    pub serials: usize,
}

impl PortCounts {
    /// Total routable video destinations: primaries then monitors.
    pub fn total_outputs(&self) -> usize {
        self.outputs + self.monitors
    }
}

/// Device identity reported after connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceInfo {
    pub model_name: String,
    pub counts: PortCounts,
}

/// One destination/source pair in the global output space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteEntry {
    pub output: usize,
    pub source: usize,
}

/// Commands from the hosting shell to the actor system.
///
/// All output indices are global ids: primaries first, then monitoring
/// outputs. Translation to per-kind wire indices happens at the point of
/// encoding, against current device state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HubCommand {
    /// Route a source to a video output. `force` bypasses the lock gate.
    Route {
        output: usize,
        source: usize,
        force: bool,
    },

    /// Route a source to a serial port.
    RouteSerial {
        serial: usize,
        source: usize,
        force: bool,
    },

    /// Restore the output's previously confirmed route.
    ReturnToPrevious { output: usize, force: bool },

    /// Apply many routes at once (bulk import).
    RouteMany { routes: Vec<RouteEntry> },

    /// Rename an input port.
    RenameInput { input: usize, name: String },

    /// Rename a video output (primary or monitoring).
    RenameOutput { output: usize, name: String },

    /// Rename a serial port.
    RenameSerial { serial: usize, name: String },

    /// Set a video output's lock to an explicit state.
    SetOutputLock { output: usize, lock: LockState },

    /// Set a serial port's lock to an explicit state.
    SetSerialLock { serial: usize, lock: LockState },

    /// Flip a video output's lock based on its current state.
    ToggleOutputLock { output: usize },

    /// Flip a serial port's lock based on its current state.
    ToggleSerialLock { serial: usize },

    /// Remember an output as the target for staged routing.
    SelectDestination { output: usize },

    /// Stage a route from `source` to the selected destination.
    StageRoute { source: usize },

    /// Transmit the staged route, if any.
    Take { force: bool },

    /// Discard the staged route.
    ClearStaged,
}

/// Events from the actor system to the hosting shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SystemEvent {
    /// TCP session established and handshake seen
    Connected,

    /// TCP session ended (either side)
    Disconnected,

    /// Device identity or port counts changed
    DeviceChanged { info: DeviceInfo },

    /// One or more port names changed
    LabelsChanged,

    /// A confirmed route: `output` (global id) now carries `source`
    RoutingChanged { output: usize, source: usize },

    /// A confirmed serial route: port `serial` now carries `source`
    SerialRoutingChanged { serial: usize, source: usize },

    /// One or more lock states changed
    LocksChanged,

    /// One or more port hardware statuses changed
    StatusChanged,

    /// Selected destination changed
    SelectionChanged { output: Option<usize> },

    /// Staged route changed (None = cleared or taken)
    QueueChanged { staged: Option<RouteEntry> },

    /// Status message for user display
    StatusUpdate { message: String },

    /// Error occurred
    Error { message: String },
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization() {
        let cmd = HubCommand::Route {
            output: 4,
            source: 1,
            force: false,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: HubCommand = serde_json::from_str(&json).unwrap();

        match deserialized {
            HubCommand::Route {
                output,
                source,
                force,
            } => {
                assert_eq!(output, 4);
                assert_eq!(source, 1);
                assert!(!force);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = SystemEvent::RoutingChanged {
            output: 2,
            source: 7,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: SystemEvent = serde_json::from_str(&json).unwrap();

        match deserialized {
            SystemEvent::RoutingChanged { output, source } => {
                assert_eq!(output, 2);
                assert_eq!(source, 7);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_total_outputs() {
        let counts = PortCounts {
            inputs: 16,
            outputs: 16,
            monitors: 4,
            serials: 2,
        };
        assert_eq!(counts.total_outputs(), 20);
    }
}
