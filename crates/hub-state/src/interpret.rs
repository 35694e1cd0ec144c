//! Inbound block interpreters.
//!
//! Every block the device sends, solicited or not, flows through [`apply`].
//! Handlers loop over the block's data lines; a line that fails to parse or
//! addresses a port outside the announced range is skipped and reported as
//! a warning, never a hard error. The device is the source of truth, so a
//! confirmed route is recorded even if this controller never asked for it.

use framing::Block;
use hub_protocol::encode::{
    INPUT_LABELS, MONITORING_OUTPUT_LABELS, MONITORING_OUTPUT_LOCKS, OUTPUT_LABELS,
    SERIAL_PORT_LABELS, SERIAL_PORT_LOCKS, SERIAL_PORT_ROUTING, VIDEO_MONITORING_OUTPUT_ROUTING,
    VIDEO_OUTPUT_LOCKS, VIDEO_OUTPUT_ROUTING,
};
use hub_protocol::{DeviceInfo, HubError, LockState, RouteEntry};

use crate::ports::OutputKind;
use crate::store::HubState;

/// Inbound-only block names.
pub const VIDEOHUB_DEVICE: &str = "VIDEOHUB DEVICE";
pub const VIDEO_INPUT_STATUS: &str = "VIDEO INPUT STATUS";
pub const VIDEO_OUTPUT_STATUS: &str = "VIDEO OUTPUT STATUS";
pub const SERIAL_PORT_STATUS: &str = "SERIAL PORT STATUS";

/// What a block did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Device identity block; the store has been resized to the new counts.
    Device(DeviceInfo),
    /// Port names changed.
    Labels { changed: usize },
    /// Confirmed video routes, global output ids.
    Routing(Vec<RouteEntry>),
    /// Confirmed serial routes.
    SerialRouting(Vec<RouteEntry>),
    /// Lock states changed.
    Locks { changed: usize },
    /// Hardware statuses changed.
    Status { changed: usize },
    /// Unrecognized block name; nothing touched.
    Ignored,
}

/// An applied block: what changed plus any lines that had to be skipped.
#[derive(Debug)]
pub struct Applied {
    pub outcome: Outcome,
    pub warnings: Vec<HubError>,
}

/// Dispatch a block to its interpreter.
pub fn apply(state: &mut HubState, block: &Block) -> Applied {
    match block.name.as_str() {
        VIDEOHUB_DEVICE => apply_device(state, block),
        INPUT_LABELS | OUTPUT_LABELS | MONITORING_OUTPUT_LABELS | SERIAL_PORT_LABELS => {
            apply_labels(state, block)
        }
        VIDEO_OUTPUT_ROUTING | VIDEO_MONITORING_OUTPUT_ROUTING => apply_video_routing(state, block),
        SERIAL_PORT_ROUTING => apply_serial_routing(state, block),
        VIDEO_OUTPUT_LOCKS | MONITORING_OUTPUT_LOCKS | SERIAL_PORT_LOCKS => {
            apply_locks(state, block)
        }
        VIDEO_INPUT_STATUS | VIDEO_OUTPUT_STATUS | SERIAL_PORT_STATUS => apply_status(state, block),
        _ => Applied {
            outcome: Outcome::Ignored,
            warnings: Vec::new(),
        },
    }
}

/// `index rest-of-line`; a bare index means an empty rest.
fn split_index(line: &str) -> Option<(usize, &str)> {
    match line.split_once(' ') {
        Some((num, rest)) => num.parse().ok().map(|n| (n, rest)),
        None => line.parse().ok().map(|n| (n, "")),
    }
}

/// `dest src`, both numeric, nothing else.
fn split_pair(line: &str) -> Option<(usize, usize)> {
    let (dest, src) = line.split_once(' ')?;
    Some((dest.parse().ok()?, src.trim().parse().ok()?))
}

fn malformed(block: &Block, line: &str) -> HubError {
    HubError::MalformedLine {
        block: block.name.clone(),
        line: line.to_string(),
    }
}

fn out_of_range(space: &str, index: usize, count: usize) -> HubError {
    HubError::OutOfRangeIndex {
        space: space.to_string(),
        index,
        count,
    }
}

fn apply_device(state: &mut HubState, block: &Block) -> Applied {
    let mut warnings = Vec::new();
    let mut counts = state.counts();
    let mut model_name = state.device().model_name.clone();

    for line in &block.lines {
        let (attribute, value) = match line.split_once(": ") {
            Some(pair) => pair,
            None => continue, // attributes we don't track may be bare flags
        };

        match attribute {
            "Model name" => model_name = value.to_string(),
            "Video inputs" => match value.parse() {
                Ok(n) => counts.inputs = n,
                Err(_) => warnings.push(malformed(block, line)),
            },
            "Video outputs" => match value.parse() {
                Ok(n) => counts.outputs = n,
                Err(_) => warnings.push(malformed(block, line)),
            },
            "Video monitoring outputs" => match value.parse() {
                Ok(n) => counts.monitors = n,
                Err(_) => warnings.push(malformed(block, line)),
            },
            "Serial ports" => match value.parse() {
                Ok(n) => counts.serials = n,
                Err(_) => warnings.push(malformed(block, line)),
            },
            _ => {}
        }
    }

    state.apply_counts(&counts);
    state.set_model_name(&model_name);

    Applied {
        outcome: Outcome::Device(state.device().clone()),
        warnings,
    }
}

fn apply_labels(state: &mut HubState, block: &Block) -> Applied {
    let mut warnings = Vec::new();
    let mut changed = 0;
    let counts = state.counts();
    let count = match block.name.as_str() {
        INPUT_LABELS => counts.inputs,
        OUTPUT_LABELS => counts.outputs,
        MONITORING_OUTPUT_LABELS => counts.monitors,
        _ => counts.serials,
    };

    for line in &block.lines {
        let (index, name) = match split_index(line) {
            Some(parts) => parts,
            None => {
                warnings.push(malformed(block, line));
                continue;
            }
        };

        let applied = match block.name.as_str() {
            INPUT_LABELS => state.input_mut(index).map(|input| input.set_name(name)),
            OUTPUT_LABELS => state.primary_mut(index).map(|output| output.set_name(name)),
            MONITORING_OUTPUT_LABELS => {
                state.monitor_mut(index).map(|output| output.set_name(name))
            }
            SERIAL_PORT_LABELS => state.serial_mut(index).map(|serial| serial.set_name(name)),
            _ => None,
        };

        match applied {
            Some(()) => changed += 1,
            None => warnings.push(out_of_range(&block.name, index, count)),
        }
    }

    Applied {
        outcome: Outcome::Labels { changed },
        warnings,
    }
}

fn apply_video_routing(state: &mut HubState, block: &Block) -> Applied {
    let mut warnings = Vec::new();
    let mut confirmed = Vec::new();
    let kind = if block.name == VIDEO_MONITORING_OUTPUT_ROUTING {
        OutputKind::Monitor
    } else {
        OutputKind::Primary
    };
    let count = match kind {
        OutputKind::Primary => state.counts().outputs,
        OutputKind::Monitor => state.counts().monitors,
    };

    for line in &block.lines {
        let (dest, src) = match split_pair(line) {
            Some(pair) => pair,
            None => {
                warnings.push(malformed(block, line));
                continue;
            }
        };

        let output = match kind {
            OutputKind::Primary => state.primary_mut(dest),
            OutputKind::Monitor => state.monitor_mut(dest),
        };

        match output {
            Some(output) => {
                output.fallback.push(src);
                output.route = src;
                confirmed.push(RouteEntry {
                    output: output.id,
                    source: src,
                });
            }
            None => warnings.push(out_of_range(&block.name, dest, count)),
        }
    }

    Applied {
        outcome: Outcome::Routing(confirmed),
        warnings,
    }
}

fn apply_serial_routing(state: &mut HubState, block: &Block) -> Applied {
    let mut warnings = Vec::new();
    let mut confirmed = Vec::new();
    let count = state.counts().serials;

    for line in &block.lines {
        let (dest, src) = match split_pair(line) {
            Some(pair) => pair,
            None => {
                warnings.push(malformed(block, line));
                continue;
            }
        };

        match state.serial_mut(dest) {
            Some(serial) => {
                serial.route = src;
                confirmed.push(RouteEntry {
                    output: dest,
                    source: src,
                });
            }
            None => warnings.push(out_of_range(&block.name, dest, count)),
        }
    }

    Applied {
        outcome: Outcome::SerialRouting(confirmed),
        warnings,
    }
}

fn apply_locks(state: &mut HubState, block: &Block) -> Applied {
    let mut warnings = Vec::new();
    let mut changed = 0;
    let counts = state.counts();
    let count = match block.name.as_str() {
        VIDEO_OUTPUT_LOCKS => counts.outputs,
        MONITORING_OUTPUT_LOCKS => counts.monitors,
        _ => counts.serials,
    };

    for line in &block.lines {
        let (index, code) = match split_index(line) {
            Some(parts) => parts,
            None => {
                warnings.push(malformed(block, line));
                continue;
            }
        };

        let lock = match LockState::from_wire(code) {
            Ok(lock) => lock,
            Err(err) => {
                warnings.push(err);
                continue;
            }
        };

        let applied = match block.name.as_str() {
            VIDEO_OUTPUT_LOCKS => state.primary_mut(index).map(|output| output.lock = lock),
            MONITORING_OUTPUT_LOCKS => state.monitor_mut(index).map(|output| output.lock = lock),
            SERIAL_PORT_LOCKS => state.serial_mut(index).map(|serial| serial.lock = lock),
            _ => None,
        };

        match applied {
            Some(()) => changed += 1,
            None => warnings.push(out_of_range(&block.name, index, count)),
        }
    }

    Applied {
        outcome: Outcome::Locks { changed },
        warnings,
    }
}

fn apply_status(state: &mut HubState, block: &Block) -> Applied {
    let mut warnings = Vec::new();
    let mut changed = 0;
    let counts = state.counts();
    let count = match block.name.as_str() {
        VIDEO_INPUT_STATUS => counts.inputs,
        // Output status addresses the global id space.
        VIDEO_OUTPUT_STATUS => counts.total_outputs(),
        _ => counts.serials,
    };

    for line in &block.lines {
        let (index, status) = match split_index(line) {
            Some(parts) => parts,
            None => {
                warnings.push(malformed(block, line));
                continue;
            }
        };

        // Output status addresses the global id space, unlike routing,
        // labels and locks which are per kind.
        let applied = match block.name.as_str() {
            VIDEO_INPUT_STATUS => state
                .input_mut(index)
                .map(|input| input.status = status.to_string()),
            VIDEO_OUTPUT_STATUS => state
                .output_mut(index)
                .map(|output| output.status = status.to_string()),
            SERIAL_PORT_STATUS => state
                .serial_mut(index)
                .map(|serial| serial.status = status.to_string()),
            _ => None,
        };

        match applied {
            Some(()) => changed += 1,
            None => warnings.push(out_of_range(&block.name, index, count)),
        }
    }

    Applied {
        outcome: Outcome::Status { changed },
        warnings,
    }
}
