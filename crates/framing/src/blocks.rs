use crate::lines::LineFramer;

/// One protocol message: a header naming the block type and the data lines
/// that followed it, in arrival order. The header's trailing `:` and the
/// terminating blank line are not part of the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub lines: Vec<String>,
}

/// Result of feeding one line to the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fed {
    /// A blank line closed the current block.
    Block(Block),
    /// A bare `ACK` outside any block. The device sends one per accepted
    /// command; nothing upstream needs it, so it is consumed here.
    Ack,
    /// Line consumed, block still open (or header just seen).
    Pending,
    /// Non-header, non-blank, non-ACK line while idle. Dropped.
    Malformed,
}

enum AssemblerState {
    Idle,
    Reading(Block),
}

/// Rebuilds protocol blocks from a stream of lines.
///
/// A block opens with a header line containing `:` (the name is everything
/// before the first `:`, trimmed), accumulates data lines, and closes on the
/// first blank line. A blank line while idle is a no-op; the device pads its
/// startup dump with them.
pub struct BlockAssembler {
    state: AssemblerState,
    acks: u64,
    malformed: u64,
}

impl BlockAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Idle,
            acks: 0,
            malformed: 0,
        }
    }

    pub fn feed_line(&mut self, line: &str) -> Fed {
        match &mut self.state {
            AssemblerState::Idle => {
                if line.is_empty() {
                    Fed::Pending
                } else if line == "ACK" {
                    self.acks = self.acks.saturating_add(1);
                    Fed::Ack
                } else if let Some(idx) = line.find(':') {
                    let name = match line.get(..idx) {
                        Some(head) => head.trim().to_string(),
                        None => return Fed::Malformed,
                    };
                    self.state = AssemblerState::Reading(Block {
                        name,
                        lines: Vec::new(),
                    });
                    Fed::Pending
                } else {
                    self.malformed = self.malformed.saturating_add(1);
                    Fed::Malformed
                }
            }
            AssemblerState::Reading(block) => {
                if line.is_empty() {
                    let done = std::mem::replace(
                        block,
                        Block {
                            name: String::new(),
                            lines: Vec::new(),
                        },
                    );
                    self.state = AssemblerState::Idle;
                    Fed::Block(done)
                } else {
                    block.lines.push(line.to_string());
                    Fed::Pending
                }
            }
        }
    }

    /// Drop a partially-read block. Called on disconnect; the device resends
    /// its full state on the next connection.
    pub fn reset(&mut self) {
        self.state = AssemblerState::Idle;
    }

    pub fn acks(&self) -> u64 {
        self.acks
    }

    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}

impl Default for BlockAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Framer and assembler composed: raw socket chunks in, finished blocks out.
pub struct BlockReader {
    framer: LineFramer,
    assembler: BlockAssembler,
}

impl BlockReader {
    pub fn new() -> Self {
        Self {
            framer: LineFramer::new(),
            assembler: BlockAssembler::new(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Block> {
        let mut blocks = Vec::new();
        for line in self.framer.feed(chunk) {
            if let Fed::Block(block) = self.assembler.feed_line(&line) {
                blocks.push(block);
            }
        }
        blocks
    }

    pub fn reset(&mut self) {
        self.framer.reset();
        self.assembler.reset();
    }

    pub fn acks(&self) -> u64 {
        self.assembler.acks()
    }

    pub fn malformed(&self) -> u64 {
        self.assembler.malformed()
    }
}

impl Default for BlockReader {
    fn default() -> Self {
        Self::new()
    }
}
