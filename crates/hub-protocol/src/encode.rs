//! Outbound command text.
//!
//! Every command is a block: header line naming the block type, one data
//! line per entry, blank line terminator. The device answers with `ACK`
//! and a confirming block; nothing here waits for either.
//!
//! Indices in this module are wire indices: zero-based within the block's
//! own address space. Monitoring outputs count from zero in their blocks
//! even though the rest of the system addresses them with global ids.

use crate::lock::LockState;

pub const VIDEO_OUTPUT_ROUTING: &str = "VIDEO OUTPUT ROUTING";
pub const VIDEO_MONITORING_OUTPUT_ROUTING: &str = "VIDEO MONITORING OUTPUT ROUTING";
pub const SERIAL_PORT_ROUTING: &str = "SERIAL PORT ROUTING";
pub const INPUT_LABELS: &str = "INPUT LABELS";
pub const OUTPUT_LABELS: &str = "OUTPUT LABELS";
pub const MONITORING_OUTPUT_LABELS: &str = "MONITORING OUTPUT LABELS";
pub const SERIAL_PORT_LABELS: &str = "SERIAL PORT LABELS";
pub const VIDEO_OUTPUT_LOCKS: &str = "VIDEO OUTPUT LOCKS";
pub const MONITORING_OUTPUT_LOCKS: &str = "MONITORING OUTPUT LOCKS";
pub const SERIAL_PORT_LOCKS: &str = "SERIAL PORT LOCKS";

/// Keep-alive, sent periodically on an idle connection.
pub const PING: &str = "PING\n\n";

fn block(name: &str, lines: &[String]) -> String {
    let mut out = String::with_capacity(name.len() + 2 + lines.iter().map(|l| l.len() + 1).sum::<usize>() + 1);
    out.push_str(name);
    out.push_str(":\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}

fn single(name: &str, line: String) -> String {
    block(name, &[line])
}

pub fn route_output(dest: usize, source: usize) -> String {
    single(VIDEO_OUTPUT_ROUTING, format!("{} {}", dest, source))
}

pub fn route_monitor(dest: usize, source: usize) -> String {
    single(
        VIDEO_MONITORING_OUTPUT_ROUTING,
        format!("{} {}", dest, source),
    )
}

pub fn route_serial(dest: usize, source: usize) -> String {
    single(SERIAL_PORT_ROUTING, format!("{} {}", dest, source))
}

pub fn rename_input(input: usize, name: &str) -> String {
    single(INPUT_LABELS, format!("{} {}", input, name))
}

pub fn rename_output(dest: usize, name: &str) -> String {
    single(OUTPUT_LABELS, format!("{} {}", dest, name))
}

pub fn rename_monitor(dest: usize, name: &str) -> String {
    single(MONITORING_OUTPUT_LABELS, format!("{} {}", dest, name))
}

pub fn rename_serial(serial: usize, name: &str) -> String {
    single(SERIAL_PORT_LABELS, format!("{} {}", serial, name))
}

pub fn lock_output(dest: usize, lock: LockState) -> String {
    single(VIDEO_OUTPUT_LOCKS, format!("{} {}", dest, lock.to_wire()))
}

pub fn lock_monitor(dest: usize, lock: LockState) -> String {
    single(
        MONITORING_OUTPUT_LOCKS,
        format!("{} {}", dest, lock.to_wire()),
    )
}

pub fn lock_serial(serial: usize, lock: LockState) -> String {
    single(SERIAL_PORT_LOCKS, format!("{} {}", serial, lock.to_wire()))
}

/// Bulk routing: all primary routes in one block, all monitor routes in
/// another. Either slice may be empty; at most two blocks come back.
/// Pairs are `(wire_index, source)`.
pub fn route_many(primary: &[(usize, usize)], monitor: &[(usize, usize)]) -> Vec<String> {
    let mut out = Vec::with_capacity(2);
    if !primary.is_empty() {
        let lines: Vec<String> = primary
            .iter()
            .map(|(dest, src)| format!("{} {}", dest, src))
            .collect();
        out.push(block(VIDEO_OUTPUT_ROUTING, &lines));
    }
    if !monitor.is_empty() {
        let lines: Vec<String> = monitor
            .iter()
            .map(|(dest, src)| format!("{} {}", dest, src))
            .collect();
        out.push(block(VIDEO_MONITORING_OUTPUT_ROUTING, &lines));
    }
    out
}
