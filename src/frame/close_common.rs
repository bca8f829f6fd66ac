//! Shared field layout for `CONNECTION_CLOSE` and `APPLICATION_CLOSE`: first
//! byte, 16-bit error code, varint reason-phrase length, reason-phrase bytes.
//! See §4.3. The two frames differ only in their first byte and the
//! namespace their error code is drawn from; this module carries the one
//! decode/encode routine both wrap.

use bytes::{BufMut, Bytes};

use super::unwrap_nom;
use crate::error::Error;
use crate::varint::{be_varint, read_uint_be, write_uint_be, VarInt, WriteVarInt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Fields {
    pub(super) error_code: u16,
    pub(super) reason: Bytes,
}

pub(super) fn decode(buf: &[u8]) -> Result<(Fields, usize), Error> {
    let rest = buf.get(1..).ok_or_else(|| Error::truncated(2, buf.len()))?;
    let error_code = read_uint_be(rest, 2)? as u16;
    let (rest, reason_len) = be_varint(&rest[2..]).map_err(unwrap_nom)?;
    let reason_len = reason_len.into_inner() as usize;
    if rest.len() < reason_len {
        return Err(Error::truncated(reason_len, rest.len()));
    }
    let start = buf.len() - rest.len();
    let reason = Bytes::copy_from_slice(&buf[start..start + reason_len]);
    let consumed = start + reason_len;
    Ok((Fields { error_code, reason }, consumed))
}

pub(super) fn encoding_size(f: &Fields) -> usize {
    1 + 2 + VarInt::from_u32(f.reason.len() as u32).encoding_size() + f.reason.len()
}

pub(super) fn write<T: BufMut>(out: &mut T, first_byte: u8, f: &Fields) {
    out.put_u8(first_byte);
    let mut code = [0u8; 2];
    write_uint_be(f.error_code as u64, 2, &mut code);
    out.put_slice(&code);
    let reason_len = VarInt::from_u32(f.reason.len() as u32);
    out.put_varint(&reason_len);
    out.put_slice(&f.reason);
}
