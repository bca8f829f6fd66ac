//! STREAM_ID_BLOCKED frame: first byte, varint stream id. See §4.3.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, VarInt, WriteVarInt};

fn decode(buf: &[u8]) -> Result<(VarInt, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(1, buf.len()))?;
    let (rest, stream_id) = be_varint(rest).map_err(unwrap_nom)?;
    Ok((stream_id, buf.len() - rest.len()))
}

/// `STREAM_ID_BLOCKED` — the sender reports it is blocked by the peer's
/// `MAX_STREAM_ID` limit and cannot open a new stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamIdBlockedFrame(Repr<VarInt>);

impl StreamIdBlockedFrame {
    /// Builds a `STREAM_ID_BLOCKED` frame reporting `stream_id`.
    pub fn new(stream_id: VarInt) -> Self {
        Self(Repr::Owned(stream_id))
    }

    /// Parses a `STREAM_ID_BLOCKED` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    pub fn stream_id(&self) -> Result<VarInt, Error> {
        match &self.0 {
            Repr::Owned(v) => Ok(*v),
            Repr::Borrowed(buf) => decode(buf).map(|(v, _)| v),
        }
    }
}

impl GetFrameType for StreamIdBlockedFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::StreamIdBlocked
    }
}

impl EncodeFrame for StreamIdBlockedFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(v) => 1 + v.encoding_size(),
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<StreamIdBlockedFrame> for T {
    fn put_frame(&mut self, frame: &StreamIdBlockedFrame) {
        match &frame.0 {
            Repr::Owned(v) => {
                self.put_u8(wire::STREAM_ID_BLOCKED);
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
        let frame = StreamIdBlockedFrame::new(VarInt::from_u32(17));
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        assert_eq!(buf, [0x0a, 17]);
        let parsed = StreamIdBlockedFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.stream_id().unwrap().into_inner(), 17);
    }
}
