use serde::{Deserialize, Serialize};

use hub_protocol::{DeviceInfo, PortCounts, RouteEntry};

use crate::fallback::DEFAULT_FALLBACK_CAP;
use crate::ports::{InputPort, OutputKind, OutputPort, SerialPort};

/// The adapter's view of the router.
///
/// Fixed-size vectors sized from the device's announced counts, indexed
/// directly by port id. Outputs live in two vectors (primary, monitor)
/// matching the wire's address spaces; callers address them through one
/// global id space, primaries first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubState {
    device: DeviceInfo,
    inputs: Vec<InputPort>,
    primaries: Vec<OutputPort>,
    monitors: Vec<OutputPort>,
    serials: Vec<SerialPort>,
    fallback_cap: usize,
    pub selected_destination: Option<usize>,
}

impl HubState {
    /// Empty state; ports appear once the device announces its counts.
    pub fn new() -> Self {
        Self::with_fallback_cap(DEFAULT_FALLBACK_CAP)
    }

    pub fn with_fallback_cap(fallback_cap: usize) -> Self {
        Self {
            device: DeviceInfo::default(),
            inputs: Vec::new(),
            primaries: Vec::new(),
            monitors: Vec::new(),
            serials: Vec::new(),
            fallback_cap,
            selected_destination: None,
        }
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn counts(&self) -> PortCounts {
        self.device.counts
    }

    pub fn set_model_name(&mut self, name: &str) {
        self.device.model_name = name.to_string();
    }

    /// Resize every port vector to the announced counts.
    ///
    /// Surviving indices keep their names, routes, locks and fallback
    /// history; indices past the new count are dropped; new indices get
    /// defaults. Monitor global ids shift whenever the primary count
    /// changes, so they are recomputed unconditionally.
    pub fn apply_counts(&mut self, counts: &PortCounts) {
        self.inputs.truncate(counts.inputs);
        for id in self.inputs.len()..counts.inputs {
            self.inputs.push(InputPort::with_defaults(id));
        }

        self.primaries.truncate(counts.outputs);
        for id in self.primaries.len()..counts.outputs {
            self.primaries
                .push(OutputPort::with_defaults(id, OutputKind::Primary, self.fallback_cap));
        }

        self.monitors.truncate(counts.monitors);
        for id in self.monitors.len()..counts.monitors {
            self.monitors
                .push(OutputPort::with_defaults(id, OutputKind::Monitor, self.fallback_cap));
        }
        for monitor in self.monitors.iter_mut() {
            monitor.set_id(counts.outputs + monitor.wire_index);
        }

        self.serials.truncate(counts.serials);
        for id in self.serials.len()..counts.serials {
            self.serials.push(SerialPort::with_defaults(id));
        }

        self.device.counts = *counts;

        if let Some(selected) = self.selected_destination {
            if selected >= counts.total_outputs() {
                self.selected_destination = None;
            }
        }
    }

    pub fn input(&self, id: usize) -> Option<&InputPort> {
        self.inputs.get(id)
    }

    pub fn input_mut(&mut self, id: usize) -> Option<&mut InputPort> {
        self.inputs.get_mut(id)
    }

    /// Look up a video output by global id.
    pub fn output(&self, id: usize) -> Option<&OutputPort> {
        if id < self.primaries.len() {
            self.primaries.get(id)
        } else {
            self.monitors.get(id - self.primaries.len())
        }
    }

    pub fn output_mut(&mut self, id: usize) -> Option<&mut OutputPort> {
        if id < self.primaries.len() {
            self.primaries.get_mut(id)
        } else {
            let local = id - self.primaries.len();
            self.monitors.get_mut(local)
        }
    }

    /// Look up a primary output by its wire index.
    pub fn primary(&self, wire_index: usize) -> Option<&OutputPort> {
        self.primaries.get(wire_index)
    }

    pub fn primary_mut(&mut self, wire_index: usize) -> Option<&mut OutputPort> {
        self.primaries.get_mut(wire_index)
    }

    /// Look up a monitoring output by its wire index.
    pub fn monitor(&self, wire_index: usize) -> Option<&OutputPort> {
        self.monitors.get(wire_index)
    }

    pub fn monitor_mut(&mut self, wire_index: usize) -> Option<&mut OutputPort> {
        self.monitors.get_mut(wire_index)
    }

    pub fn serial(&self, id: usize) -> Option<&SerialPort> {
        self.serials.get(id)
    }

    pub fn serial_mut(&mut self, id: usize) -> Option<&mut SerialPort> {
        self.serials.get_mut(id)
    }

    pub fn selected_output(&self) -> Option<&OutputPort> {
        self.selected_destination.and_then(|id| self.output(id))
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputPort> {
        self.inputs.iter()
    }

    /// All video outputs in global id order: primaries, then monitors.
    pub fn outputs(&self) -> impl Iterator<Item = &OutputPort> {
        self.primaries.iter().chain(self.monitors.iter())
    }

    pub fn serials(&self) -> impl Iterator<Item = &SerialPort> {
        self.serials.iter()
    }

    /// Current routing table, for bulk export.
    pub fn routing_table(&self) -> Vec<RouteEntry> {
        self.outputs()
            .map(|output| RouteEntry {
                output: output.id,
                source: output.route,
            })
            .collect()
    }

    /// Per-output routing history, for bulk export.
    pub fn route_history(&self) -> Vec<(usize, Vec<usize>)> {
        self.outputs()
            .map(|output| (output.id, output.fallback.sources()))
            .collect()
    }
}

impl Default for HubState {
    fn default() -> Self {
        Self::new()
    }
}
