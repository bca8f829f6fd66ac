//! Variable-length integer encoding and the other fixed-width primitives
//! every frame is built from.
//!
//! A varint is 1, 2, 4, or 8 bytes. The top two bits of the first byte pick
//! the length (`00`→1, `01`→2, `10`→4, `11`→8); the remaining bits of that
//! byte plus all following bytes are the big-endian value.

use bytes::BufMut;
use derive_more::Deref;
use nom::IResult;

use crate::error::Error;

/// A decoded varint, guaranteed to fit in 62 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deref)]
pub struct VarInt(u64);

impl VarInt {
    /// Largest value a varint can represent: `2^62 - 1`.
    pub const MAX: u64 = (1 << 62) - 1;

    /// Builds a varint from a `u32`, which always fits.
    pub const fn from_u32(value: u32) -> Self {
        Self(value as u64)
    }

    /// Builds a varint from a `u64`, rejecting values that don't fit in 62 bits.
    pub fn new(value: u64) -> Result<Self, Error> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(Error::VarintOverflow)
        }
    }

    /// The decoded value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Bytes this varint occupies on the wire.
    pub fn encoding_size(self) -> usize {
        encoded_len(self.0)
    }
}

impl From<VarInt> for u64 {
    fn from(value: VarInt) -> u64 {
        value.0
    }
}

impl TryFrom<u64> for VarInt {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Error> {
        Self::new(value)
    }
}

/// Smallest legal encoded length, in bytes, for `value`.
fn encoded_len(value: u64) -> usize {
    if value < (1 << 6) {
        1
    } else if value < (1 << 14) {
        2
    } else if value < (1 << 30) {
        4
    } else {
        8
    }
}

/// `nom`-style parser for a varint at the start of `input`.
pub fn be_varint(input: &[u8]) -> IResult<&[u8], VarInt, Error> {
    let first = *input
        .first()
        .ok_or_else(|| nom::Err::Error(Error::truncated(1, input.len())))?;
    let len = 1usize << (first >> 6);
    if input.len() < len {
        return Err(nom::Err::Error(Error::truncated(len, input.len())));
    }
    let mut value = (first & 0x3f) as u64;
    for &byte in &input[1..len] {
        value = (value << 8) | byte as u64;
    }
    Ok((&input[len..], VarInt(value)))
}

/// Length, in bytes, of the varint encoded at the start of `buf` — without
/// decoding its value. This is the buffer-probing form of `varint_size`; the
/// value-probing form is [`VarInt::encoding_size`].
pub fn varint_len_at(buf: &[u8]) -> Result<usize, Error> {
    let first = *buf.first().ok_or_else(|| Error::truncated(1, buf.len()))?;
    let len = 1usize << (first >> 6);
    if buf.len() < len {
        return Err(Error::truncated(len, buf.len()));
    }
    Ok(len)
}

/// Writes a varint with [`BufMut`], matching `gm-quic`'s `qbase::varint` idiom.
pub trait WriteVarInt {
    /// Encodes `v` using its minimal legal width.
    fn put_varint(&mut self, v: &VarInt);
}

impl<T: BufMut> WriteVarInt for T {
    fn put_varint(&mut self, v: &VarInt) {
        let value = v.0;
        match encoded_len(value) {
            1 => self.put_u8(value as u8),
            2 => self.put_u16(0x4000 | value as u16),
            4 => self.put_u32(0x8000_0000 | value as u32),
            8 => self.put_u64(0xc000_0000_0000_0000 | value),
            _ => unreachable!("varint values are always <= 2^62 - 1"),
        }
    }
}

/// Reads a big-endian unsigned integer of `width` bytes (`width` ∈ {1,2,4,8}).
pub fn read_uint_be(buf: &[u8], width: usize) -> Result<u64, Error> {
    if buf.len() < width {
        return Err(Error::truncated(width, buf.len()));
    }
    let mut value = 0u64;
    for &byte in &buf[..width] {
        value = (value << 8) | byte as u64;
    }
    Ok(value)
}

/// Writes `value` as a big-endian unsigned integer of `width` bytes into `buf`,
/// returning `width`.
pub fn write_uint_be(value: u64, width: usize, buf: &mut [u8]) -> usize {
    for (i, slot) in buf[..width].iter_mut().enumerate() {
        *slot = (value >> (8 * (width - 1 - i))) as u8;
    }
    width
}

/// Maps a 2-bit length selector (as found in `LL`/`MM` sub-flags) to a byte width.
pub const fn width_from_selector(selector: u8) -> usize {
    1usize << (selector & 0b11)
}

/// Maps a byte width (1, 2, 4, or 8) to its 2-bit length selector.
pub fn selector_from_width(width: usize) -> u8 {
    match width {
        1 => 0b00,
        2 => 0b01,
        4 => 0b10,
        8 => 0b11,
        _ => panic!("invalid field width {width}"),
    }
}
