//! MAX_DATA frame: first byte, varint maximum connection-level data. See §4.3.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{unwrap_nom, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{be_varint, VarInt, WriteVarInt};

fn decode(buf: &[u8]) -> Result<(VarInt, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(1, buf.len()))?;
    let (rest, maximum) = be_varint(rest).map_err(unwrap_nom)?;
    Ok((maximum, buf.len() - rest.len()))
}

/// `MAX_DATA` — advertises the maximum amount of data the sender is willing
/// to receive on the connection as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxDataFrame(Repr<VarInt>);

impl MaxDataFrame {
    /// Builds a `MAX_DATA` frame advertising `maximum`.
    pub fn new(maximum: VarInt) -> Self {
        Self(Repr::Owned(maximum))
    }

    /// Parses a `MAX_DATA` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    pub fn maximum(&self) -> Result<VarInt, Error> {
        match &self.0 {
            Repr::Owned(v) => Ok(*v),
            Repr::Borrowed(buf) => decode(buf).map(|(v, _)| v),
        }
    }
}

impl GetFrameType for MaxDataFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::MaxData
    }
}

impl EncodeFrame for MaxDataFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(v) => 1 + v.encoding_size(),
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<MaxDataFrame> for T {
    fn put_frame(&mut self, frame: &MaxDataFrame) {
        match &frame.0 {
            Repr::Owned(v) => {
                self.put_u8(wire::MAX_DATA);
                self.put_varint(v);
            }
            Repr::Borrowed(buf) => {
                let size = frame.encoding_size();
                self.put_slice(&buf[..size]);
            }
        }
    }
}
