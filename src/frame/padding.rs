//! PADDING frame: a single byte, no fields. See §4.3.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{wire, EncodeFrame, FrameType, GetFrameType};

/// `PADDING` — one byte, carries no information of its own. Used to pad a
/// packet out to a minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddingFrame;

impl PaddingFrame {
    /// Builds a `PADDING` frame. There are no fields to supply.
    pub fn new() -> Self {
        Self
    }

    /// Parses a `PADDING` frame from the start of `buf`. Total: cannot fail.
    pub fn parse(_buf: Bytes) -> Self {
        Self
    }
}

impl GetFrameType for PaddingFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::Padding
    }
}

impl EncodeFrame for PaddingFrame {
    fn encoding_size(&self) -> usize {
        1
    }
}

impl<T: BufMut> WriteFrame<PaddingFrame> for T {
    fn put_frame(&mut self, _frame: &PaddingFrame) {
        self.put_u8(wire::PADDING);
    }
}
