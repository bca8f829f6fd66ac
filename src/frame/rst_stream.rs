//! RST_STREAM frame: first byte, varint stream id, 16-bit error code, varint
//! final offset. See §4.3.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, read_uint_be, write_uint_be, VarInt, WriteVarInt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    stream_id: VarInt,
    error_code: u16,
    final_offset: VarInt,
}

fn decode(buf: &[u8]) -> Result<(Fields, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(2, buf.len()))?;
    let (rest, stream_id) = be_varint(rest).map_err(unwrap_nom)?;
    let error_code = read_uint_be(rest, 2)? as u16;
    let (rest, final_offset) = be_varint(&rest[2..]).map_err(unwrap_nom)?;
    let consumed = buf.len() - rest.len();
    Ok((Fields { stream_id, error_code, final_offset }, consumed))
}

/// `RST_STREAM` — abruptly terminates a stream, carrying the error that
/// caused it and the final offset the sender reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RstStreamFrame(Repr<Fields>);

impl RstStreamFrame {
    /// Builds an `RST_STREAM` frame from field values.
    pub fn new(stream_id: VarInt, error_code: u16, final_offset: VarInt) -> Self {
        Self(Repr::Owned(Fields { stream_id, error_code, final_offset }))
    }

    /// Parses an `RST_STREAM` frame from the start of `buf`. Total: field
    /// access may fail later if `buf` is truncated.
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

    pub fn error_code(&self) -> Result<u16, Error> {
        self.fields().map(|f| f.error_code)
    }

    pub fn final_offset(&self) -> Result<VarInt, Error> {
        self.fields().map(|f| f.final_offset)
    }
}

impl GetFrameType for RstStreamFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::RstStream
    }
}

impl EncodeFrame for RstStreamFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => 1 + f.stream_id.encoding_size() + 2 + f.final_offset.encoding_size(),
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<RstStreamFrame> for T {
    fn put_frame(&mut self, frame: &RstStreamFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                self.put_u8(wire::RST_STREAM);
                self.put_varint(&f.stream_id);
                let mut code = [0u8; 2];
                write_uint_be(f.error_code as u64, 2, &mut code);
                self.put_slice(&code);
                self.put_varint(&f.final_offset);
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
    fn worked_example() {
        // stream_id=1, error_code=0x0007, final_offset=42
        let frame = RstStreamFrame::new(VarInt::from_u32(1), 7, VarInt::from_u32(42));
        let mut buf = [0u8; 16];
        let n = serialize(&frame, &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x01, 0x01, 0x00, 0x07, 0x2a]);

        let parsed = RstStreamFrame::parse(Bytes::copy_from_slice(&buf[..n]));
        assert_eq!(parsed.stream_id().unwrap(), VarInt::from_u32(1));
        assert_eq!(parsed.error_code().unwrap(), 7);
        assert_eq!(parsed.final_offset().unwrap(), VarInt::from_u32(42));
    }

    #[test]
    fn round_trips_through_parse() {
        let frame = RstStreamFrame::new(VarInt::from_u32(9001), 0xbeef, VarInt::from_u32(123_456));
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        let parsed = RstStreamFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.stream_id().unwrap().into_inner(), 9001);
        assert_eq!(parsed.error_code().unwrap(), 0xbeef);
        assert_eq!(parsed.final_offset().unwrap().into_inner(), 123_456);
        assert_eq!(parsed.encoding_size(), frame.encoding_size());
    }

    #[test]
    fn truncated_buffer_is_reported() {
        let frame = RstStreamFrame::parse(Bytes::from_static(&[0x01, 0x01]));
        assert!(matches!(frame.error_code(), Err(Error::Truncated { .. })));
    }
}
