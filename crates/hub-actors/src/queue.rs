use hub_protocol::RouteEntry;

/// At most one staged routing operation, held until taken or discarded.
///
/// The take workflow lets an operator line up a route without changing
/// anything on air: select a destination, stage a source against it, then
/// commit with take or abandon with clear. Staging again overwrites; there
/// is never more than one pending operation.
#[derive(Debug, Default)]
pub struct QueueTake {
    staged: Option<RouteEntry>,
}

impl QueueTake {
    pub fn new() -> Self {
        Self { staged: None }
    }

    /// Stage a route, replacing any previous staged operation.
    pub fn stage(&mut self, output: usize, source: usize) {
        self.staged = Some(RouteEntry { output, source });
    }

    /// Commit: clears and returns the staged operation, if any.
    pub fn take(&mut self) -> Option<RouteEntry> {
        self.staged.take()
    }

    /// Discard the staged operation. Returns whether one was held.
    pub fn clear(&mut self) -> bool {
        self.staged.take().is_some()
    }

    /// Re-point the staged operation at a newly selected destination,
    /// keeping its source. No-op when nothing is staged.
    pub fn retarget(&mut self, output: usize) {
        if let Some(op) = &mut self.staged {
            op.output = output;
        }
    }

    pub fn staged(&self) -> Option<RouteEntry> {
        self.staged
    }

    pub fn is_idle(&self) -> bool {
        self.staged.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_and_take() {
        let mut queue = QueueTake::new();
        assert!(queue.is_idle());

        queue.stage(3, 7);
        assert_eq!(queue.staged(), Some(RouteEntry { output: 3, source: 7 }));

        let op = queue.take().unwrap();
        assert_eq!(op.output, 3);
        assert_eq!(op.source, 7);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_stage_overwrites() {
        let mut queue = QueueTake::new();
        queue.stage(3, 7);
        queue.stage(3, 2);
        assert_eq!(queue.take(), Some(RouteEntry { output: 3, source: 2 }));
    }

    #[test]
    fn test_clear_discards() {
        let mut queue = QueueTake::new();
        queue.stage(1, 1);
        assert!(queue.clear());
        assert!(queue.is_idle());
        assert!(!queue.clear());
    }

    #[test]
    fn test_take_when_idle() {
        let mut queue = QueueTake::new();
        assert_eq!(queue.take(), None);
    }

    #[test]
    fn test_retarget_keeps_source() {
        let mut queue = QueueTake::new();
        queue.stage(1, 9);
        queue.retarget(4);
        assert_eq!(queue.staged(), Some(RouteEntry { output: 4, source: 9 }));
    }

    #[test]
    fn test_retarget_when_idle_is_noop() {
        let mut queue = QueueTake::new();
        queue.retarget(4);
        assert!(queue.is_idle());
    }
}
