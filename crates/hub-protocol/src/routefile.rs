//! Bulk route file codec.
//!
//! The file carries the full routing table as comma-separated `dest src`
//! pairs, zero-based, followed by an optional `:` and free-form commentary
//! which is ignored on import. Export appends the per-output routing
//! history after the colon so an operator can see where each destination
//! has been. File I/O stays with the caller; this module is text in,
//! text out.

use crate::errors::HubError;
use crate::messages::RouteEntry;

const COMMENTARY: &str = "  : Ports are zero based, so '0' in this file references port '1'. \
You may add your own text here after the colon.";

/// Parse a route file against the device's current dimensions.
///
/// Every pair must name a destination below `outputs` and a source below
/// `inputs`, and the file may not carry more pairs than there are outputs.
/// The first failure aborts the whole import; partial application would
/// leave the router in a state nobody asked for.
pub fn parse(text: &str, outputs: usize, inputs: usize) -> Result<Vec<RouteEntry>, HubError> {
    let routes_text = match text.split(':').next() {
        Some(head) => head,
        None => return Err(HubError::RouteFile("empty file".into())),
    };

    let mut routes = Vec::new();
    for pair in routes_text.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let mut parts = pair.split_whitespace();
        let dest = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| {
                HubError::RouteFile(format!("'{}' does not start with a valid destination", pair))
            })?;
        let source = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| {
                HubError::RouteFile(format!("'{}' does not carry a valid source", pair))
            })?;
        if parts.next().is_some() {
            return Err(HubError::RouteFile(format!(
                "'{}' has trailing tokens, expected 'dest src'",
                pair
            )));
        }

        if dest >= outputs {
            return Err(HubError::RouteFile(format!(
                "{} is an invalid destination, router has {} outputs (zero based)",
                dest, outputs
            )));
        }
        if source >= inputs {
            return Err(HubError::RouteFile(format!(
                "{} is an invalid source, router has {} inputs (zero based)",
                source, inputs
            )));
        }

        routes.push(RouteEntry {
            output: dest,
            source,
        });
    }

    if routes.is_empty() {
        return Err(HubError::RouteFile("no routes found before the colon".into()));
    }
    if routes.len() > outputs {
        return Err(HubError::RouteFile(format!(
            "{} routes for a router with {} outputs",
            routes.len(),
            outputs
        )));
    }

    Ok(routes)
}

/// Render the routing table plus per-output history. `history` pairs each
/// output id with the sources it has carried, oldest first.
pub fn format(routes: &[RouteEntry], history: &[(usize, Vec<usize>)]) -> String {
    let pairs: Vec<String> = routes
        .iter()
        .map(|r| format!("{} {}", r.output, r.source))
        .collect();

    let mut out = pairs.join(",");
    out.push_str(COMMENTARY);
    out.push_str("\n\nRouting history:\n");
    for (output, sources) in history {
        let trail: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        out.push_str(&format!("{}  {}\n", output, trail.join(" ")));
    }
    out
}
