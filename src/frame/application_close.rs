//! APPLICATION_CLOSE frame: application-level connection termination. Same
//! layout as `CONNECTION_CLOSE`, but the error code is drawn from the
//! application's own error namespace rather than the transport's. See §4.3.

use bytes::{BufMut, Bytes};

use super::close_common::{self, Fields};
use super::io::WriteFrame;
use super::{wire, EncodeFrame, FrameType, GetFrameType, Repr};
use crate::error::Error;

/// `APPLICATION_CLOSE` — terminates the connection with an application error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationCloseFrame(Repr<Fields>);

impl ApplicationCloseFrame {
    /// Builds an `APPLICATION_CLOSE` frame from an error code and reason phrase.
    pub fn new(error_code: u16, reason: Bytes) -> Self {
        Self(Repr::Owned(Fields { error_code, reason }))
    }

    /// Parses an `APPLICATION_CLOSE` frame from the start of `buf`.
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

impl GetFrameType for ApplicationCloseFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::ApplicationClose
    }
}

impl EncodeFrame for ApplicationCloseFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => close_common::encoding_size(f),
            Repr::Borrowed(buf) => close_common::decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<ApplicationCloseFrame> for T {
    fn put_frame(&mut self, frame: &ApplicationCloseFrame) {
        match &frame.0 {
            Repr::Owned(f) => close_common::write(self, wire::APPLICATION_CLOSE, f),
            Repr::Borrowed(buf) => {
                let size = frame.encoding_size();
                self.put_slice(&buf[..size]);
            }
        }
    }
}
