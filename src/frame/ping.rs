//! PING frame: a single byte, no fields. See §4.3.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{wire, EncodeFrame, FrameType, GetFrameType};

/// `PING` — one byte, elicits an acknowledgement from the peer but carries
/// no data of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingFrame;

impl PingFrame {
    /// Builds a `PING` frame. There are no fields to supply.
    pub fn new() -> Self {
        Self
    }

    /// Parses a `PING` frame from the start of `buf`. Total: cannot fail.
    pub fn parse(_buf: Bytes) -> Self {
        Self
    }
}

impl GetFrameType for PingFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::Ping
    }
}

impl EncodeFrame for PingFrame {
    fn encoding_size(&self) -> usize {
        1
    }
}

impl<T: BufMut> WriteFrame<PingFrame> for T {
    fn put_frame(&mut self, _frame: &PingFrame) {
        self.put_u8(wire::PING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::io::serialize;

    #[test]
    fn is_exactly_one_byte() {
        let frame = PingFrame;
        let mut buf = [0u8; 1];
        assert_eq!(serialize(&frame, &mut buf).unwrap(), 1);
        assert_eq!(buf, [0x07]);
    }
}
