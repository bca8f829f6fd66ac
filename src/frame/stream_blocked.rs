//! STREAM_BLOCKED frame: first byte, varint stream id, varint offset. See
//! §4.3. As with `MAX_STREAM_DATA`, the offset field's width is decoded
//! independently of the stream id's rather than reusing it.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, VarInt, WriteVarInt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    stream_id: VarInt,
    offset: VarInt,
}

fn decode(buf: &[u8]) -> Result<(Fields, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(1, buf.len()))?;
    let (rest, stream_id) = be_varint(rest).map_err(unwrap_nom)?;
    let (rest, offset) = be_varint(rest).map_err(unwrap_nom)?;
    let consumed = buf.len() - rest.len();
    Ok((Fields { stream_id, offset }, consumed))
}

/// `STREAM_BLOCKED` — the sender reports it is stream-flow-control blocked
/// at `offset` on `stream_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamBlockedFrame(Repr<Fields>);

impl StreamBlockedFrame {
    /// Builds a `STREAM_BLOCKED` frame from field values.
    pub fn new(stream_id: VarInt, offset: VarInt) -> Self {
        Self(Repr::Owned(Fields { stream_id, offset }))
    }

    /// Parses a `STREAM_BLOCKED` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    fn fields(&self) -> Result<Fields, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.clone()),
            Repr::Borrowed(buf) => decode(buf).map(|(f, _)| f),
        }
    }

    pub fn stream_id(&self) -> Result<VarInt, Error> {
        self.fields().map(|f| f.stream_id)
    }

    pub fn offset(&self) -> Result<VarInt, Error> {
        self.fields().map(|f| f.offset)
    }
}

impl GetFrameType for StreamBlockedFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::StreamBlocked
    }
}

impl EncodeFrame for StreamBlockedFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => 1 + f.stream_id.encoding_size() + f.offset.encoding_size(),
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<StreamBlockedFrame> for T {
    fn put_frame(&mut self, frame: &StreamBlockedFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                self.put_u8(wire::STREAM_BLOCKED);
                self.put_varint(&f.stream_id);
                self.put_varint(&f.offset);
            }
            Repr::Borrowed(buf) => {
                let size = frame.encoding_size();
                self.put_slice(&buf[..size]);
            }
        }
    }
}
