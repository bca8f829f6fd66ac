//! BLOCKED frame: first byte, varint offset. See §4.3.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, VarInt, WriteVarInt};

fn decode(buf: &[u8]) -> Result<(VarInt, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(1, buf.len()))?;
    let (rest, offset) = be_varint(rest).map_err(unwrap_nom)?;
    Ok((offset, buf.len() - rest.len()))
}

/// `BLOCKED` — the sender reports it is connection-flow-control blocked at
/// `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedFrame(Repr<VarInt>);

impl BlockedFrame {
    /// Builds a `BLOCKED` frame reporting `offset`.
    pub fn new(offset: VarInt) -> Self {
        Self(Repr::Owned(offset))
    }

    /// Parses a `BLOCKED` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    pub fn offset(&self) -> Result<VarInt, Error> {
        match &self.0 {
            Repr::Owned(v) => Ok(*v),
            Repr::Borrowed(buf) => decode(buf).map(|(v, _)| v),
        }
    }
}

impl GetFrameType for BlockedFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::Blocked
    }
}

impl EncodeFrame for BlockedFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(v) => 1 + v.encoding_size(),
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<BlockedFrame> for T {
    fn put_frame(&mut self, frame: &BlockedFrame) {
        match &frame.0 {
            Repr::Owned(v) => {
                self.put_u8(wire::BLOCKED);
                self.put_varint(v);
            }
            Repr::Borrowed(buf) => {
                let size = frame.encoding_size();
                self.put_slice(&buf[..size]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::io::serialize;

    #[test]
    fn round_trips_through_parse() {
        let frame = BlockedFrame::new(VarInt::from_u32(5000));
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        assert_eq!(buf[0], 0x08);
        let parsed = BlockedFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.offset().unwrap().into_inner(), 5000);
    }
}
