//! Frame construction: classify-and-parse, a per-variant reuse cache for the
//! hot receive path, and per-variant builders. See §4.5.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};

use super::ack::{AckBlockSection, AckFrame};
use super::application_close::ApplicationCloseFrame;
use super::blocked::BlockedFrame;
use super::connection_close::ConnectionCloseFrame;
use super::io::serialize;
use super::max_data::MaxDataFrame;
use super::max_stream_data::MaxStreamDataFrame;
use super::max_stream_id::MaxStreamIdFrame;
use super::new_connection_id::NewConnectionIdFrame;
use super::padding::PaddingFrame;
use super::ping::PingFrame;
use super::retransmission::{PacketClass, RetransmissionFrame};
use super::rst_stream::RstStreamFrame;
use super::stop_sending::StopSendingFrame;
use super::stream::StreamFrame;
use super::stream_blocked::StreamBlockedFrame;
use super::stream_id_blocked::StreamIdBlockedFrame;
use super::{classify, EncodeFrame, Frame, FrameType};
use crate::error::Error;
use crate::varint::VarInt;

fn parse_known(ty: FrameType, buf: Bytes) -> Option<Frame> {
    Some(match ty {
        FrameType::Padding => Frame::Padding(PaddingFrame::parse(buf)),
        FrameType::Ping => Frame::Ping(PingFrame::parse(buf)),
        FrameType::RstStream => Frame::RstStream(RstStreamFrame::parse(buf)),
        FrameType::ConnectionClose => Frame::ConnectionClose(ConnectionCloseFrame::parse(buf)),
        FrameType::ApplicationClose => Frame::ApplicationClose(ApplicationCloseFrame::parse(buf)),
        FrameType::MaxData => Frame::MaxData(MaxDataFrame::parse(buf)),
        FrameType::MaxStreamData => Frame::MaxStreamData(MaxStreamDataFrame::parse(buf)),
        FrameType::MaxStreamId => Frame::MaxStreamId(MaxStreamIdFrame::parse(buf)),
        FrameType::Blocked => Frame::Blocked(BlockedFrame::parse(buf)),
        FrameType::StreamBlocked => Frame::StreamBlocked(StreamBlockedFrame::parse(buf)),
        FrameType::StreamIdBlocked => Frame::StreamIdBlocked(StreamIdBlockedFrame::parse(buf)),
        FrameType::NewConnectionId => Frame::NewConnectionId(NewConnectionIdFrame::parse(buf)),
        FrameType::StopSending => Frame::StopSending(StopSendingFrame::parse(buf)),
        FrameType::Ack => Frame::Ack(AckFrame::parse(buf)),
        FrameType::Stream => Frame::Stream(StreamFrame::parse(buf)),
        FrameType::Unknown => return None,
    })
}

/// Classifies `buf`'s first byte and constructs the matching borrowed frame.
/// Returns `None` (the null-frame sentinel) for an unknown first byte.
pub fn create(buf: Bytes) -> Option<Frame> {
    let first = *buf.first()?;
    let ty = classify(first);
    if ty == FrameType::Unknown {
        tracing::trace!(byte = first, "create: unknown frame type");
        return None;
    }
    parse_known(ty, buf)
}

/// The sentinel "no frame" value, for symmetry with the other builders.
pub fn create_null_frame() -> Option<Frame> {
    None
}

/// Per-variant reuse cache for the hot receive path: repeated calls with the
/// same frame variant rebind the cached slot instead of allocating a new
/// frame value. Not thread-safe — each thread wanting `fast_create` needs
/// its own `FrameFactory`.
#[derive(Debug, Default)]
pub struct FrameFactory {
    cache: HashMap<FrameType, Frame>,
}

impl FrameFactory {
    pub fn new() -> Self {
        Self { cache: HashMap::new() }
    }

    /// Like [`create`], but rebinds a cached frame of the same variant
    /// rather than constructing a fresh one when possible. `Bytes` is
    /// reference-counted, so rebinding never copies the underlying buffer.
    pub fn fast_create(&mut self, buf: Bytes) -> Option<&Frame> {
        let first = *buf.first()?;
        let ty = classify(first);
        if ty == FrameType::Unknown {
            tracing::trace!(byte = first, "fast_create: unknown frame type");
            return None;
        }
        let frame = parse_known(ty, buf)?;
        if self.cache.contains_key(&ty) {
            tracing::trace!(?ty, "fast_create: rebinding cached frame instance");
        }
        self.cache.insert(ty, frame);
        self.cache.get(&ty)
    }
}

/// Serializes `inner` into a private buffer and wraps it as a
/// [`RetransmissionFrame`] tagged with the packet class it originated from.
pub fn create_retransmission_frame(inner: &Frame, originating_packet: PacketClass) -> Result<Frame, Error> {
    let mut buf = BytesMut::zeroed(inner.encoding_size());
    serialize(inner, &mut buf)?;
    Ok(Frame::Retransmission(RetransmissionFrame::new(
        buf.freeze(),
        originating_packet,
    )))
}

pub fn create_stream_frame(data: Bytes, stream_id: VarInt, offset: VarInt, include_length_field: bool, fin: bool) -> Frame {
    Frame::Stream(StreamFrame::new(stream_id, offset, include_length_field, fin, data))
}

pub fn create_ack_frame(largest_acknowledged: u64, ack_delay: u16, first_ack_block_length: u64) -> Frame {
    Frame::Ack(AckFrame::new(largest_acknowledged, ack_delay, AckBlockSection::new(first_ack_block_length, 4)))
}

pub fn create_connection_close_frame(error_code: u16, reason: Bytes) -> Frame {
    Frame::ConnectionClose(ConnectionCloseFrame::new(error_code, reason))
}

pub fn create_application_close_frame(error_code: u16, reason: Bytes) -> Frame {
    Frame::ApplicationClose(ApplicationCloseFrame::new(error_code, reason))
}

pub fn create_max_data_frame(maximum_data: VarInt) -> Frame {
    Frame::MaxData(MaxDataFrame::new(maximum_data))
}

pub fn create_max_stream_data_frame(stream_id: VarInt, maximum_data: VarInt) -> Frame {
    Frame::MaxStreamData(MaxStreamDataFrame::new(stream_id, maximum_data))
}

pub fn create_max_stream_id_frame(maximum_stream_id: VarInt) -> Frame {
    Frame::MaxStreamId(MaxStreamIdFrame::new(maximum_stream_id))
}

pub fn create_blocked_frame(offset: VarInt) -> Frame {
    Frame::Blocked(BlockedFrame::new(offset))
}

pub fn create_stream_blocked_frame(stream_id: VarInt, offset: VarInt) -> Frame {
    Frame::StreamBlocked(StreamBlockedFrame::new(stream_id, offset))
}

pub fn create_stream_id_blocked_frame(stream_id: VarInt) -> Frame {
    Frame::StreamIdBlocked(StreamIdBlockedFrame::new(stream_id))
}

pub fn create_rst_stream_frame(stream_id: VarInt, error_code: u16, final_offset: VarInt) -> Frame {
    Frame::RstStream(RstStreamFrame::new(stream_id, error_code, final_offset))
}

pub fn create_stop_sending_frame(stream_id: VarInt, error_code: u16) -> Frame {
    Frame::StopSending(StopSendingFrame::new(stream_id, error_code))
}

pub fn create_new_connection_id_frame(sequence: u16, connection_id: Bytes, stateless_reset_token: Bytes) -> Frame {
    Frame::NewConnectionId(NewConnectionIdFrame::new(sequence, connection_id, stateless_reset_token))
}
