//! STOP_SENDING frame: first byte, varint stream id, 16-bit error code. See §4.3.
//!
//! The original hard-codes the stream id to 4 bytes (it reads the error code
//! from a fixed offset rather than from wherever the stream id's own decode
//! ends), which only coincidentally matches this variant's own `size() == 7`
//! claim. This implementation decodes the stream id as a proper varint, like
//! every other frame's stream id, so `size()` tracks the value actually
//! stored rather than assuming a fixed width.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, read_uint_be, write_uint_be, VarInt, WriteVarInt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    stream_id: VarInt,
    error_code: u16,
}

fn decode(buf: &[u8]) -> Result<(Fields, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(2, buf.len()))?;
    let (rest, stream_id) = be_varint(rest).map_err(unwrap_nom)?;
    let error_code = read_uint_be(rest, 2)? as u16;
    let consumed = buf.len() - (rest.len() - 2);
    Ok((Fields { stream_id, error_code }, consumed))
}

/// `STOP_SENDING` — asks the peer to stop sending on a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSendingFrame(Repr<Fields>);

impl StopSendingFrame {
    /// Builds a `STOP_SENDING` frame from field values.
    pub fn new(stream_id: VarInt, error_code: u16) -> Self {
        Self(Repr::Owned(Fields { stream_id, error_code }))
    }

    /// Parses a `STOP_SENDING` frame from the start of `buf`.
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
}

impl GetFrameType for StopSendingFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::StopSending
    }
}

impl EncodeFrame for StopSendingFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => 1 + f.stream_id.encoding_size() + 2,
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<StopSendingFrame> for T {
    fn put_frame(&mut self, frame: &StopSendingFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                self.put_u8(wire::STOP_SENDING);
                self.put_varint(&f.stream_id);
                let mut code = [0u8; 2];
                write_uint_be(f.error_code as u64, 2, &mut code);
                self.put_slice(&code);
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
    fn size_tracks_the_stream_id_varint_width() {
        // A 1-byte varint stream id: [type, stream_id, error_hi, error_lo].
        let small = StopSendingFrame::new(VarInt::from_u32(3), 0x1234);
        assert_eq!(small.encoding_size(), 4);
        let mut buf = [0u8; 4];
        serialize(&small, &mut buf).unwrap();
        assert_eq!(buf, [0x0c, 0x03, 0x12, 0x34]);

        // A 4-byte varint stream id brings size to 7, matching the
        // original's fixed-width encoding as one case of this range.
        let wide = StopSendingFrame::new(VarInt::from_u32(70_000), 0x1234);
        assert_eq!(wide.encoding_size(), 7);
    }

    #[test]
    fn round_trips() {
        let frame = StopSendingFrame::new(VarInt::from_u32(70_000), 7);
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        let parsed = StopSendingFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.stream_id().unwrap().into_inner(), 70_000);
        assert_eq!(parsed.error_code().unwrap(), 7);
    }
}
