use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default bound on remembered routes per output.
pub const DEFAULT_FALLBACK_CAP: usize = 20;

/// Bounded history of the sources an output has carried.
///
/// Every route the hardware confirms is pushed, so the top of the stack is
/// always the output's current source and "the previous route" is the entry
/// beneath it. When the stack fills, the oldest entry is dropped.
///
/// The `-1` sentinel reseeds an emptied stack so that repeated
/// return-to-previous requests settle into a harmless no-op instead of
/// underflowing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackStack {
    entries: VecDeque<i64>,
    cap: usize,
}

impl FallbackStack {
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_FALLBACK_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap.min(64)),
            cap: cap.max(2),
        }
    }

    /// Record a confirmed route. Oldest entry gives way at the cap.
    pub fn push(&mut self, source: usize) {
        if self.entries.len() >= self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(source as i64);
    }

    /// The route to fall back to, consuming the current one.
    ///
    /// The current route sits on top (it was pushed when the hardware
    /// confirmed it), so reaching the previous route takes two pops. An
    /// emptied stack is reseeded with the sentinel; `None` means there is
    /// nowhere to return to and no command should be sent.
    pub fn pop_previous(&mut self) -> Option<usize> {
        let _current = self.entries.pop_back();
        let previous = self.entries.pop_back();

        if self.entries.is_empty() {
            self.entries.push_back(-1);
        }

        match previous {
            Some(src) if src >= 0 => Some(src as usize),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remembered sources oldest first, sentinel excluded. For export.
    pub fn sources(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|&&src| src >= 0)
            .map(|&src| src as usize)
            .collect()
    }
}

impl Default for FallbackStack {
    fn default() -> Self {
        Self::new()
    }
}
