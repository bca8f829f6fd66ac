//! Retransmission wrapper: a frozen, already-serialized frame plus the
//! packet class it was originally sent in. See §4.6.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{classify, EncodeFrame, FrameType, GetFrameType};
use crate::error::Error;

/// Coarse encryption-level / handshake-phase tag a packet belonged to.
/// Retained so loss recovery can place a retransmit in the right class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketClass {
    Initial,
    Handshake,
    ZeroRtt,
    OneRtt,
}

/// A frame reconstructed for retransmission: the frozen bytes of some
/// already-serialized frame, plus the class of packet it originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetransmissionFrame {
    frozen: Bytes,
    originating_packet: PacketClass,
}

impl RetransmissionFrame {
    /// Wraps `frozen` (the serialized bytes of another frame) with the
    /// packet class it was originally carried in.
    pub fn new(frozen: Bytes, originating_packet: PacketClass) -> Self {
        Self { frozen, originating_packet }
    }

    /// The packet class the wrapped frame was originally sent in.
    pub fn originating_packet(&self) -> PacketClass {
        self.originating_packet
    }

    /// The frozen, already-serialized bytes of the wrapped frame.
    pub fn frozen(&self) -> &Bytes {
        &self.frozen
    }

    /// The variant tag of the wrapped frame, read from its first byte.
    pub fn wrapped_type(&self) -> Result<FrameType, Error> {
        let first = *self.frozen.first().ok_or_else(|| Error::truncated(1, 0))?;
        Ok(classify(first))
    }
}

impl GetFrameType for RetransmissionFrame {
    fn frame_type(&self) -> FrameType {
        self.wrapped_type().unwrap_or(FrameType::Unknown)
    }
}

impl EncodeFrame for RetransmissionFrame {
    fn encoding_size(&self) -> usize {
        self.frozen.len()
    }
}

impl<T: BufMut> WriteFrame<RetransmissionFrame> for T {
    fn put_frame(&mut self, frame: &RetransmissionFrame) {
        self.put_slice(&frame.frozen);
    }
}
