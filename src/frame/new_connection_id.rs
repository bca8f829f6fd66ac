//! NEW_CONNECTION_ID frame: first byte, 16-bit sequence, fixed 8-byte
//! connection id, 16-byte stateless-reset token. See §4.3.
//!
//! The original hard-codes this frame's `size()` to 11, which only accounts
//! for the type byte, sequence, and connection id — not the 16-byte
//! stateless-reset token its own `store()` also writes. Reporting 11 here
//! would violate the round-trip law (an owned frame serialized and reparsed
//! must equal itself): `encoding_size()` instead returns the true total of 27.

use bytes::{BufMut, Bytes};

use super::io::WriteFrame;
use super::{byte_at, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;
use crate::varint::{read_uint_be, write_uint_be};

const CONNECTION_ID_LEN: usize = 8;
const STATELESS_RESET_TOKEN_LEN: usize = 16;
const TOTAL_LEN: usize = 1 + 2 + CONNECTION_ID_LEN + STATELESS_RESET_TOKEN_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    sequence: u16,
    connection_id: Bytes,
    stateless_reset_token: Bytes,
}

fn decode(buf: &[u8]) -> Result<(Fields, usize), Error> {
    if buf.len() < TOTAL_LEN {
        return Err(Error::truncated(TOTAL_LEN, buf.len()));
    }
    let sequence = read_uint_be(&buf[1..3], 2)? as u16;
    let connection_id = Bytes::copy_from_slice(&buf[3..3 + CONNECTION_ID_LEN]);
    let token_start = 3 + CONNECTION_ID_LEN;
    let stateless_reset_token =
        Bytes::copy_from_slice(&buf[token_start..token_start + STATELESS_RESET_TOKEN_LEN]);
    Ok((
        Fields { sequence, connection_id, stateless_reset_token },
        TOTAL_LEN,
    ))
}

/// `NEW_CONNECTION_ID` — supplies an additional connection id the peer may
/// switch to, along with the stateless-reset token that proves continuity if
/// this connection's state is ever lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConnectionIdFrame(Repr<Fields>);

impl NewConnectionIdFrame {
    /// Builds a `NEW_CONNECTION_ID` frame. Panics if `connection_id` is not
    /// exactly 8 bytes or `stateless_reset_token` is not exactly 16 bytes.
    pub fn new(sequence: u16, connection_id: Bytes, stateless_reset_token: Bytes) -> Self {
        assert_eq!(connection_id.len(), CONNECTION_ID_LEN);
        assert_eq!(stateless_reset_token.len(), STATELESS_RESET_TOKEN_LEN);
        Self(Repr::Owned(Fields {
            sequence,
            connection_id,
            stateless_reset_token,
        }))
    }

    /// Parses a `NEW_CONNECTION_ID` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    fn fields(&self) -> Result<Fields, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.clone()),
            Repr::Borrowed(buf) => decode(buf).map(|(f, _)| f),
        }
    }

    pub fn sequence(&self) -> Result<u16, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.sequence),
            Repr::Borrowed(buf) => {
                let hi = byte_at(buf, 1)?;
                let lo = byte_at(buf, 2)?;
                Ok(u16::from_be_bytes([hi, lo]))
            }
        }
    }

    pub fn connection_id(&self) -> Result<Bytes, Error> {
        self.fields().map(|f| f.connection_id)
    }

    pub fn stateless_reset_token(&self) -> Result<Bytes, Error> {
        self.fields().map(|f| f.stateless_reset_token)
    }
}

impl GetFrameType for NewConnectionIdFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::NewConnectionId
    }
}

impl EncodeFrame for NewConnectionIdFrame {
    fn encoding_size(&self) -> usize {
        TOTAL_LEN
    }
}

impl<T: BufMut> WriteFrame<NewConnectionIdFrame> for T {
    fn put_frame(&mut self, frame: &NewConnectionIdFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                self.put_u8(wire::NEW_CONNECTION_ID);
                let mut sequence = [0u8; 2];
                write_uint_be(f.sequence as u64, 2, &mut sequence);
                self.put_slice(&sequence);
                self.put_slice(&f.connection_id);
                self.put_slice(&f.stateless_reset_token);
            }
            Repr::Borrowed(buf) => self.put_slice(&buf[..TOTAL_LEN]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::io::serialize;

    #[test]
    fn encoding_size_accounts_for_the_reset_token() {
        let frame = NewConnectionIdFrame::new(
            7,
            Bytes::from_static(&[1; 8]),
            Bytes::from_static(&[2; 16]),
        );
        assert_eq!(frame.encoding_size(), 27);
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        assert_eq!(buf.len(), 27);
    }

    #[test]
    fn round_trips_through_parse() {
        let frame = NewConnectionIdFrame::new(
            42,
            Bytes::from_static(&[0xaa; 8]),
            Bytes::from_static(&[0xbb; 16]),
        );
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        let parsed = NewConnectionIdFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.sequence().unwrap(), 42);
        assert_eq!(parsed.connection_id().unwrap(), Bytes::from_static(&[0xaa; 8]));
        assert_eq!(
            parsed.stateless_reset_token().unwrap(),
            Bytes::from_static(&[0xbb; 16])
        );
    }

    #[test]
    fn truncated_buffer_is_reported() {
        let frame = NewConnectionIdFrame::parse(Bytes::from_static(&[0x0b, 0, 7]));
        assert!(matches!(frame.connection_id(), Err(Error::Truncated { .. })));
    }
}
