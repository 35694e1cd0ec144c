use serde::{Deserialize, Serialize};

use hub_protocol::LockState;

use crate::fallback::FallbackStack;

/// Hardware status reported for video ports before the device says otherwise.
pub const DEFAULT_VIDEO_STATUS: &str = "BNC";
/// Hardware status reported for serial ports before the device says otherwise.
pub const DEFAULT_SERIAL_STATUS: &str = "RS422";

/// Which address space a video output lives in on the wire.
///
/// Primary outputs and monitoring outputs are one contiguous global id
/// space to callers (primaries first), but each kind counts from zero in
/// its own protocol blocks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputKind {
    Primary,
    Monitor,
}

fn display_label(id: usize, name: &str) -> String {
    format!("{}: {}", id + 1, name)
}

/// A video source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputPort {
    pub id: usize,
    pub name: String,
    pub label: String,
    pub status: String,
}

impl InputPort {
    pub fn with_defaults(id: usize) -> Self {
        let name = format!("Input {}", id + 1);
        let label = display_label(id, &name);
        Self {
            id,
            name,
            label,
            status: DEFAULT_VIDEO_STATUS.to_string(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.label = display_label(self.id, name);
    }
}

/// A video destination, primary or monitoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputPort {
    /// Position in the global output space (primaries first).
    pub id: usize,
    /// Position within this output's own kind, as used on the wire.
    pub wire_index: usize,
    pub kind: OutputKind,
    pub name: String,
    pub label: String,
    pub status: String,
    /// Input currently routed here.
    pub route: usize,
    pub lock: LockState,
    pub fallback: FallbackStack,
}

impl OutputPort {
    pub fn with_defaults(wire_index: usize, kind: OutputKind, fallback_cap: usize) -> Self {
        let name = format!("Output {}", wire_index + 1);
        let label = display_label(wire_index, &name);
        Self {
            id: wire_index,
            wire_index,
            kind,
            name,
            label,
            status: DEFAULT_VIDEO_STATUS.to_string(),
            route: wire_index,
            lock: LockState::default(),
            fallback: FallbackStack::with_cap(fallback_cap),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.label = display_label(self.id, name);
    }

    /// Reassign the global id after a resize and keep the label in step.
    pub fn set_id(&mut self, id: usize) {
        self.id = id;
        self.label = display_label(id, &self.name);
    }
}

/// An RS-422 port; source and destination in one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerialPort {
    pub id: usize,
    pub name: String,
    pub label: String,
    pub status: String,
    /// Serial port currently routed here.
    pub route: usize,
    pub lock: LockState,
}

impl SerialPort {
    pub fn with_defaults(id: usize) -> Self {
        let name = format!("Serial {}", id + 1);
        let label = display_label(id, &name);
        Self {
            id,
            name,
            label,
            status: DEFAULT_SERIAL_STATUS.to_string(),
            route: id,
            lock: LockState::default(),
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.label = display_label(self.id, name);
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults() {
        let input = InputPort::with_defaults(0);
        assert_eq!(input.name, "Input 1");
        assert_eq!(input.label, "1: Input 1");
        assert_eq!(input.status, "BNC");
    }

    #[test]
    fn test_output_defaults_identity_route() {
        let output = OutputPort::with_defaults(3, OutputKind::Primary, 20);
        assert_eq!(output.route, 3);
        assert_eq!(output.lock, LockState::Unlocked);
        assert!(output.fallback.is_empty());
    }

    #[test]
    fn test_rename_refreshes_label() {
        let mut input = InputPort::with_defaults(4);
        input.set_name("Camera 5");
        assert_eq!(input.label, "5: Camera 5");
    }

    #[test]
    fn test_set_id_refreshes_label() {
        let mut output = OutputPort::with_defaults(1, OutputKind::Monitor, 20);
        output.set_id(17);
        assert_eq!(output.label, "18: Output 2");
        assert_eq!(output.wire_index, 1);
    }

    #[test]
    fn test_serial_defaults() {
        let serial = SerialPort::with_defaults(1);
        assert_eq!(serial.status, "RS422");
        assert_eq!(serial.route, 1);
    }
}
