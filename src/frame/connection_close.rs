//! CONNECTION_CLOSE frame: transport-level connection termination. See §4.3.

use bytes::{BufMut, Bytes};

use super::close_common::{self, Fields};
use super::io::WriteFrame;
use super::{wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;

/// `CONNECTION_CLOSE` — terminates the connection with a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCloseFrame(Repr<Fields>);

impl ConnectionCloseFrame {
    /// Builds a `CONNECTION_CLOSE` frame from an error code and reason phrase.
    pub fn new(error_code: u16, reason: Bytes) -> Self {
        Self(Repr::Owned(Fields { error_code, reason }))
    }

    /// Parses a `CONNECTION_CLOSE` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    fn fields(&self) -> Result<Fields, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.clone()),
            Repr::Borrowed(buf) => close_common::decode(buf).map(|(f, _)| f),
        }
    }

    pub fn error_code(&self) -> Result<u16, Error> {
        self.fields().map(|f| f.error_code)
    }

    pub fn reason(&self) -> Result<Bytes, Error> {
        self.fields().map(|f| f.reason)
    }
}

impl GetFrameType for ConnectionCloseFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::ConnectionClose
    }
}

impl EncodeFrame for ConnectionCloseFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => close_common::encoding_size(f),
            Repr::Borrowed(buf) => close_common::decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<ConnectionCloseFrame> for T {
    fn put_frame(&mut self, frame: &ConnectionCloseFrame) {
        match &frame.0 {
            Repr::Owned(f) => close_common::write(self, wire::CONNECTION_CLOSE, f),
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
    fn round_trips_with_a_reason_phrase() {
        let frame = ConnectionCloseFrame::new(0x0a, Bytes::from_static(b"boom"));
        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        assert_eq!(buf, [0x02, 0x00, 0x0a, 0x04, b'b', b'o', b'o', b'm']);

        let parsed = ConnectionCloseFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.error_code().unwrap(), 0x0a);
        assert_eq!(parsed.reason().unwrap(), Bytes::from_static(b"boom"));
    }

    #[test]
    fn empty_reason_phrase() {
        let frame = ConnectionCloseFrame::new(0, Bytes::new());
        assert_eq!(frame.encoding_size(), 4);
    }
}
