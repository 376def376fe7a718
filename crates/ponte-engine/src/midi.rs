//! Block-scoped MIDI packet buffer.

use smallvec::SmallVec;

use crate::events::MidiBytes;

/// One MIDI event with a sample-accurate frame offset into the current block.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiPacket {
    frame: usize,
    bytes: MidiBytes,
}

impl MidiPacket {
    pub fn new(frame: usize, bytes: &[u8]) -> Self {
        Self {
            frame,
            bytes: SmallVec::from_slice(bytes),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Accumulates MIDI packets for exactly one processing block.
///
/// The writer pushes packets in frame order; `advance_block` discards the
/// previous block's events at the top of the next one.
#[derive(Debug, Default)]
pub struct MidiBuffer {
    packets: Vec<MidiPacket>,
}

impl MidiBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous block's events.
    pub fn advance_block(&mut self) {
        self.packets.clear();
    }

    /// Clear all accumulated state (explicit reset request).
    pub fn reset(&mut self) {
        self.packets.clear();
    }

    pub fn push(&mut self, packet: MidiPacket) {
        self.packets.push(packet);
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MidiPacket> {
        self.packets.iter()
    }
}
