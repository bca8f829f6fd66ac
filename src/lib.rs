//! A codec for the frame layer of an early QUIC draft: parsing, building, and
//! serializing the packet-payload frames defined in §4 of the protocol.
//!
//! Every frame type has a dual representation — a zero-copy view into a
//! caller-owned buffer (produced by [`frame::factory::create`] and friends),
//! or an owned value built from field arguments — unified behind the
//! [`frame::GetFrameType`] and [`frame::EncodeFrame`] traits. See the
//! [`frame`] module for the full catalogue of frame kinds.

pub mod error;
pub mod frame;
pub mod varint;

pub use error::Error;
pub use frame::{Frame, FrameType};
pub use varint::VarInt;
