//! STREAM frame: the one variant with sub-flags packed into its first byte
//! and payload bytes of its own. See §4.3.
//!
//! The original's owned-mode `has_length_field()` always answers `true`,
//! regardless of whether the frame was actually built with the length field
//! included; this implementation records that choice at construction time
//! instead of assuming it.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{byte_at, unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, VarInt, WriteVarInt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    stream_id: VarInt,
    offset: VarInt,
    include_length_field: bool,
    fin: bool,
    data: Bytes,
}

struct Decoded {
    stream_id: VarInt,
    offset: VarInt,
    has_offset_field: bool,
    has_length_field: bool,
    fin: bool,
    data_offset: usize,
    data_len: usize,
}

fn decode(buf: &[u8]) -> Result<Decoded, Error> {
    let first = byte_at(buf, 0)?;
    let has_offset_field = first & wire::STREAM_OFF_BIT != 0;
    let has_length_field = first & wire::STREAM_LEN_BIT != 0;
    let fin = first & wire::STREAM_FIN_BIT != 0;

    let rest = buf.get(1..).ok_or_else(|| Error::truncated(1, buf.len()))?;
    let (rest, stream_id) = be_varint(rest).map_err(unwrap_nom)?;

    let (rest, offset) = if has_offset_field {
        be_varint(rest).map_err(unwrap_nom)?
    } else {
        (rest, VarInt::from_u32(0))
    };

    let (rest, data_len) = if has_length_field {
        let (rest, len) = be_varint(rest).map_err(unwrap_nom)?;
        (rest, len.into_inner() as usize)
    } else {
        (rest, rest.len())
    };

    if rest.len() < data_len {
        return Err(Error::truncated(data_len, rest.len()));
    }
    let data_offset = buf.len() - rest.len();

    Ok(Decoded {
        stream_id,
        offset,
        has_offset_field,
        has_length_field,
        fin,
        data_offset,
        data_len,
    })
}

/// `STREAM` — carries a contiguous range of one stream's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame(Repr<Fields>);

impl StreamFrame {
    /// Builds a `STREAM` frame. The offset bit is chosen as `offset != 0`;
    /// `include_length_field` lets the caller suppress the length field for
    /// a frame known to be last in its packet; `fin` marks the final byte.
    pub fn new(stream_id: VarInt, offset: VarInt, include_length_field: bool, fin: bool, data: Bytes) -> Self {
        Self(Repr::Owned(Fields {
            stream_id,
            offset,
            include_length_field,
            fin,
            data,
        }))
    }

    /// Parses a `STREAM` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    pub fn stream_id(&self) -> Result<VarInt, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.stream_id),
            Repr::Borrowed(buf) => decode(buf).map(|d| d.stream_id),
        }
    }

    pub fn offset(&self) -> Result<VarInt, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.offset),
            Repr::Borrowed(buf) => decode(buf).map(|d| d.offset),
        }
    }

    pub fn has_offset_field(&self) -> Result<bool, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.offset.into_inner() != 0),
            Repr::Borrowed(buf) => decode(buf).map(|d| d.has_offset_field),
        }
    }

    pub fn has_length_field(&self) -> Result<bool, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.include_length_field),
            Repr::Borrowed(buf) => decode(buf).map(|d| d.has_length_field),
        }
    }

    pub fn fin(&self) -> Result<bool, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.fin),
            Repr::Borrowed(buf) => decode(buf).map(|d| d.fin),
        }
    }

    pub fn data(&self) -> Result<Bytes, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.data.clone()),
            Repr::Borrowed(buf) => {
                let d = decode(buf)?;
                Ok(buf.slice(d.data_offset..d.data_offset + d.data_len))
            }
        }
    }
}

impl GetFrameType for StreamFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::Stream
    }
}

impl EncodeFrame for StreamFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => {
                let mut n = 1 + f.stream_id.encoding_size();
                if f.offset.into_inner() != 0 {
                    n += f.offset.encoding_size();
                }
                if f.include_length_field {
                    n += VarInt::from_u32(f.data.len() as u32).encoding_size();
                }
                n + f.data.len()
            }
            Repr::Borrowed(buf) => decode(buf)
                .map(|d| d.data_offset + d.data_len)
                .unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<StreamFrame> for T {
    fn put_frame(&mut self, frame: &StreamFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                let mut first = wire::STREAM_BASE;
                let has_offset = f.offset.into_inner() != 0;
                if has_offset {
                    first |= wire::STREAM_OFF_BIT;
                }
                if f.include_length_field {
                    first |= wire::STREAM_LEN_BIT;
                }
                if f.fin {
                    first |= wire::STREAM_FIN_BIT;
                }
                self.put_u8(first);
                self.put_varint(&f.stream_id);
                if has_offset {
                    self.put_varint(&f.offset);
                }
                if f.include_length_field {
                    self.put_varint(&VarInt::from_u32(f.data.len() as u32));
                }
                self.put_slice(&f.data);
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
    fn worked_example_minimal() {
        // stream_id=0, offset=0, no length field, not fin, data=b"hi".
        let frame = StreamFrame::new(VarInt::from_u32(0), VarInt::from_u32(0), false, false, Bytes::from_static(b"hi"));
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        assert_eq!(buf, [0x10, 0x00, b'h', b'i']);
    }

    #[test]
    fn all_sub_flags_set() {
        let frame = StreamFrame::new(
            VarInt::from_u32(3),
            VarInt::from_u32(10),
            true,
            true,
            Bytes::from_static(b"xyz"),
        );
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        assert_eq!(buf[0], 0x10 | 0x04 | 0x02 | 0x01);

        let parsed = StreamFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.stream_id().unwrap().into_inner(), 3);
        assert_eq!(parsed.offset().unwrap().into_inner(), 10);
        assert!(parsed.has_length_field().unwrap());
        assert!(parsed.fin().unwrap());
        assert_eq!(parsed.data().unwrap(), Bytes::from_static(b"xyz"));
    }

    #[test]
    fn owned_has_length_field_tracks_the_builder_choice() {
        let suppressed = StreamFrame::new(VarInt::from_u32(0), VarInt::from_u32(0), false, false, Bytes::from_static(b"z"));
        assert!(!suppressed.has_length_field().unwrap());
        let included = StreamFrame::new(VarInt::from_u32(0), VarInt::from_u32(0), true, false, Bytes::from_static(b"z"));
        assert!(included.has_length_field().unwrap());
    }

    #[test]
    fn missing_length_field_means_data_runs_to_end_of_buffer() {
        // No L bit: payload is "everything else in the buffer".
        let raw = Bytes::from_static(&[0x10, 0x05, b'r', b'e', b's', b't']);
        let frame = StreamFrame::parse(raw);
        assert_eq!(frame.data().unwrap(), Bytes::from_static(b"rest"));
    }
}
