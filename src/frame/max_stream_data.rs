//! MAX_STREAM_DATA frame: first byte, varint stream id, varint maximum. See
//! §4.3.
//!
//! The original's field-length helper for this frame returns the varint size
//! of the *stream id* rather than the maximum when computing where the
//! maximum field ends; this implementation decodes both fields by their own
//! widths instead of reusing one's width for the other.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, VarInt, WriteVarInt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    stream_id: VarInt,
    maximum: VarInt,
}

fn decode(buf: &[u8]) -> Result<(Fields, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(1, buf.len()))?;
    let (rest, stream_id) = be_varint(rest).map_err(unwrap_nom)?;
    let (rest, maximum) = be_varint(rest).map_err(unwrap_nom)?;
    let consumed = buf.len() - rest.len();
    Ok((Fields { stream_id, maximum }, consumed))
}

/// `MAX_STREAM_DATA` — advertises the maximum amount of data the sender is
/// willing to receive on one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxStreamDataFrame(Repr<Fields>);

impl MaxStreamDataFrame {
    /// Builds a `MAX_STREAM_DATA` frame from field values.
    pub fn new(stream_id: VarInt, maximum: VarInt) -> Self {
        Self(Repr::Owned(Fields { stream_id, maximum }))
    }

    /// Parses a `MAX_STREAM_DATA` frame from the start of `buf`.
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

    pub fn maximum(&self) -> Result<VarInt, Error> {
        self.fields().map(|f| f.maximum)
    }
}

impl GetFrameType for MaxStreamDataFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::MaxStreamData
    }
}

impl EncodeFrame for MaxStreamDataFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => 1 + f.stream_id.encoding_size() + f.maximum.encoding_size(),
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<MaxStreamDataFrame> for T {
    fn put_frame(&mut self, frame: &MaxStreamDataFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                self.put_u8(wire::MAX_STREAM_DATA);
                self.put_varint(&f.stream_id);
                self.put_varint(&f.maximum);
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
    fn field_widths_are_independent() {
        // stream_id needs 4 bytes, maximum needs only 1: the total must
        // reflect both widths, not double-count either one.
        let frame = MaxStreamDataFrame::new(VarInt::from_u32(70_000), VarInt::from_u32(10));
        let mut buf = vec![0u8; frame.encoding_size()];
        let n = serialize(&frame, &mut buf).unwrap();
        assert_eq!(n, 1 + 4 + 1);

        let parsed = MaxStreamDataFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.stream_id().unwrap().into_inner(), 70_000);
        assert_eq!(parsed.maximum().unwrap().into_inner(), 10);
    }
}
