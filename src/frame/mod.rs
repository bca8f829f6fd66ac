//! Parsing and serialization of QUIC frames carried in a packet payload.
//!
//! Mirrors `gm-quic`'s `qbase::frame` module in shape — one file per concrete
//! frame kind, a closed [`FrameType`] enumeration, and a pair of thin traits
//! ([`GetFrameType`], [`EncodeFrame`]) that every frame implements — but
//! targets the bit-packed wire format of an early QUIC draft rather than
//! RFC 9000, and gives every frame a dual borrowed/owned representation (see
//! the crate-level docs).

use bytes::{BufMut, Bytes};
use enum_dispatch::enum_dispatch;

mod ack;
mod application_close;
mod blocked;
mod close_common;
mod connection_close;
mod max_data;
mod max_stream_data;
mod max_stream_id;
mod new_connection_id;
mod padding;
mod ping;
pub mod factory;
mod retransmission;
mod rst_stream;
mod stop_sending;
mod stream;
mod stream_blocked;
mod stream_id_blocked;

pub use ack::{AckBlock, AckBlockSection, AckFrame};
pub use application_close::ApplicationCloseFrame;
pub use blocked::BlockedFrame;
pub use connection_close::ConnectionCloseFrame;
pub use factory::FrameFactory;
pub use max_data::MaxDataFrame;
pub use max_stream_data::MaxStreamDataFrame;
pub use max_stream_id::MaxStreamIdFrame;
pub use new_connection_id::NewConnectionIdFrame;
pub use padding::PaddingFrame;
pub use ping::PingFrame;
pub use retransmission::{PacketClass, RetransmissionFrame};
pub use rst_stream::RstStreamFrame;
pub use stop_sending::StopSendingFrame;
pub use stream::StreamFrame;
pub use stream_blocked::StreamBlockedFrame;
pub use stream_id_blocked::StreamIdBlockedFrame;

use crate::error::Error;

/// Internal storage mode shared by every concrete frame type: either a
/// window into an externally-owned buffer (parsed, zero-copy), or the
/// decoded field values (built in memory).
///
/// This is the "tagged variant internally" option called out in the spec's
/// design notes for unifying the borrowed/owned dual representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Repr<Owned> {
    /// A window, starting at this frame's first byte, into the buffer the
    /// frame was parsed out of. May extend past this frame's own bytes (it
    /// reaches to the end of the enclosing packet payload); field decoders
    /// must compute the frame's true extent rather than assuming `len()`
    /// is exactly the frame size.
    Borrowed(Bytes),
    /// Field values decoded into memory, or supplied directly by a builder.
    Owned(Owned),
}

/// The closed set of frame kinds this codec understands, plus the `UNKNOWN`
/// sentinel for anything else. See §3 and §6 of the specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Padding,
    RstStream,
    ConnectionClose,
    ApplicationClose,
    MaxData,
    MaxStreamData,
    MaxStreamId,
    Ping,
    Blocked,
    StreamBlocked,
    StreamIdBlocked,
    NewConnectionId,
    StopSending,
    Ack,
    Stream,
    Unknown,
}

/// First-byte wire values, see §6 of the specification.
pub mod wire {
    pub const PADDING: u8 = 0x00;
    pub const RST_STREAM: u8 = 0x01;
    pub const CONNECTION_CLOSE: u8 = 0x02;
    pub const APPLICATION_CLOSE: u8 = 0x03;
    pub const MAX_DATA: u8 = 0x04;
    pub const MAX_STREAM_DATA: u8 = 0x05;
    pub const MAX_STREAM_ID: u8 = 0x06;
    pub const PING: u8 = 0x07;
    pub const BLOCKED: u8 = 0x08;
    pub const STREAM_BLOCKED: u8 = 0x09;
    pub const STREAM_ID_BLOCKED: u8 = 0x0a;
    pub const NEW_CONNECTION_ID: u8 = 0x0b;
    pub const STOP_SENDING: u8 = 0x0c;

    pub const STREAM_BASE: u8 = 0x10;
    pub const STREAM_MAX: u8 = 0x17;
    pub const STREAM_OFF_BIT: u8 = 0x04;
    pub const STREAM_LEN_BIT: u8 = 0x02;
    pub const STREAM_FIN_BIT: u8 = 0x01;

    pub const ACK_BASE: u8 = 0xa0;
    pub const ACK_MAX: u8 = 0xbf;
    pub const ACK_BLOCKS_BIT: u8 = 0x10;
    pub const ACK_LL_SHIFT: u8 = 2;
    pub const ACK_MM_MASK: u8 = 0x03;
}

/// Maps a payload's first byte to the frame variant it encodes. See §4.2:
/// the STREAM and ACK ranges are checked as bounded ranges (not an
/// unconditional `b >= STREAM_BASE`, which would swallow ACK's range since
/// ACK's base byte sits numerically above STREAM's).
pub fn classify(first_byte: u8) -> FrameType {
    if (wire::STREAM_BASE..=wire::STREAM_MAX).contains(&first_byte) {
        return FrameType::Stream;
    }
    if (wire::ACK_BASE..=wire::ACK_MAX).contains(&first_byte) {
        return FrameType::Ack;
    }
    match first_byte {
        wire::PADDING => FrameType::Padding,
        wire::RST_STREAM => FrameType::RstStream,
        wire::CONNECTION_CLOSE => FrameType::ConnectionClose,
        wire::APPLICATION_CLOSE => FrameType::ApplicationClose,
        wire::MAX_DATA => FrameType::MaxData,
        wire::MAX_STREAM_DATA => FrameType::MaxStreamData,
        wire::MAX_STREAM_ID => FrameType::MaxStreamId,
        wire::PING => FrameType::Ping,
        wire::BLOCKED => FrameType::Blocked,
        wire::STREAM_BLOCKED => FrameType::StreamBlocked,
        wire::STREAM_ID_BLOCKED => FrameType::StreamIdBlocked,
        wire::NEW_CONNECTION_ID => FrameType::NewConnectionId,
        wire::STOP_SENDING => FrameType::StopSending,
        _ => FrameType::Unknown,
    }
}

/// Implemented by every frame type; returns its variant tag.
#[enum_dispatch]
pub trait GetFrameType {
    fn frame_type(&self) -> FrameType;
}

/// Implemented by every frame type; reports its exact wire size.
#[enum_dispatch]
pub trait EncodeFrame {
    /// Exact number of bytes [`io::WriteFrame::put_frame`] will write for
    /// this frame.
    fn encoding_size(&self) -> usize;
}

/// Frame serialization, parallel to `gm-quic`'s `frame::io` module.
pub mod io {
    use super::EncodeFrame;
    use crate::error::Error;
    use bytes::BufMut;

    /// Implemented for any `BufMut` target; writes a frame's wire bytes.
    pub trait WriteFrame<T> {
        fn put_frame(&mut self, frame: &T);
    }

    /// Writes `frame` into `buf`, returning the number of bytes written, or
    /// `OversizeOutput` if `buf` is smaller than `frame.encoding_size()`.
    pub fn serialize<T>(frame: &T, buf: &mut [u8]) -> Result<usize, Error>
    where
        T: EncodeFrame,
        for<'a> &'a mut [u8]: WriteFrame<T>,
    {
        let needed = frame.encoding_size();
        if buf.len() < needed {
            return Err(Error::OversizeOutput {
                needed,
                available: buf.len(),
            });
        }
        let mut cursor = &mut buf[..needed];
        cursor.put_frame(frame);
        Ok(needed)
    }
}

/// The sum type of every frame this codec can produce from `create`, plus
/// [`RetransmissionFrame`] for frames reconstructed for loss recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
#[enum_dispatch(GetFrameType, EncodeFrame)]
pub enum Frame {
    Padding(PaddingFrame),
    Ping(PingFrame),
    RstStream(RstStreamFrame),
    ConnectionClose(ConnectionCloseFrame),
    ApplicationClose(ApplicationCloseFrame),
    MaxData(MaxDataFrame),
    MaxStreamData(MaxStreamDataFrame),
    MaxStreamId(MaxStreamIdFrame),
    Blocked(BlockedFrame),
    StreamBlocked(StreamBlockedFrame),
    StreamIdBlocked(StreamIdBlockedFrame),
    NewConnectionId(NewConnectionIdFrame),
    StopSending(StopSendingFrame),
    Ack(AckFrame),
    Stream(StreamFrame),
    Retransmission(RetransmissionFrame),
}

impl<T: BufMut> io::WriteFrame<Frame> for T {
    fn put_frame(&mut self, frame: &Frame) {
        match frame {
            Frame::Padding(f) => self.put_frame(f),
            Frame::Ping(f) => self.put_frame(f),
            Frame::RstStream(f) => self.put_frame(f),
            Frame::ConnectionClose(f) => self.put_frame(f),
            Frame::ApplicationClose(f) => self.put_frame(f),
            Frame::MaxData(f) => self.put_frame(f),
            Frame::MaxStreamData(f) => self.put_frame(f),
            Frame::MaxStreamId(f) => self.put_frame(f),
            Frame::Blocked(f) => self.put_frame(f),
            Frame::StreamBlocked(f) => self.put_frame(f),
            Frame::StreamIdBlocked(f) => self.put_frame(f),
            Frame::NewConnectionId(f) => self.put_frame(f),
            Frame::StopSending(f) => self.put_frame(f),
            Frame::Ack(f) => self.put_frame(f),
            Frame::Stream(f) => self.put_frame(f),
            Frame::Retransmission(f) => self.put_frame(f),
        }
    }
}

/// Reads the byte `n` at `offset` out of `buf`, as `Truncated` rather than a panic.
pub(crate) fn byte_at(buf: &[u8], offset: usize) -> Result<u8, Error> {
    buf.get(offset)
        .copied()
        .ok_or_else(|| Error::truncated(offset + 1, buf.len()))
}

/// Unwraps a `nom` parse result down to this crate's own `Error`, collapsing
/// `nom::Err::Incomplete` (which our parsers never produce, since they check
/// lengths up front) into a `Truncated` of the same shape.
pub(crate) fn unwrap_nom(e: nom::Err<Error>) -> Error {
    match e {
        nom::Err::Error(err) | nom::Err::Failure(err) => err,
        nom::Err::Incomplete(_) => Error::truncated(1, 0),
    }
}
