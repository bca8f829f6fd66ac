//! ACK frame and its ack-block section. First byte `0b101NLLMM`. See §4.3–§4.4.
//!
//! The original's ack-block serializer writes every block's length back to
//! the section's base pointer instead of the advancing cursor, so only the
//! last block written survives in the output; this implementation writes
//! each block at the cursor where it belongs.

use bytes::{BufMut, Bytes};

use super::{byte_at, wire, EncodeFrame, FrameType, GetFrameType, Repr};
use super::io::WriteFrame;
use crate::error::Error;
use crate::varint::{read_uint_be, selector_from_width, width_from_selector, write_uint_be};

/// One `(gap, length)` pair: `length` contiguous acknowledged packet numbers,
/// preceded by `gap` unacknowledged ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckBlock {
    pub gap: u8,
    pub length: u64,
}

impl AckBlock {
    pub fn new(gap: u8, length: u64) -> Self {
        Self { gap, length }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SectionRepr {
    Borrowed {
        buf: Bytes,
        count: u8,
        block_width: usize,
    },
    Owned {
        first_ack_block_length: u64,
        blocks: Vec<AckBlock>,
        block_width: usize,
    },
}

/// The ack-block section of an `ACK` frame: a first-ack-block length
/// followed by `count` `(gap, length)` blocks, all fields `block_width` bytes
/// wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckBlockSection(SectionRepr);

impl AckBlockSection {
    /// Builds an owned section with no blocks yet, using `block_width` for
    /// every length field (the original fixes this at 4 bytes).
    pub fn new(first_ack_block_length: u64, block_width: usize) -> Self {
        Self(SectionRepr::Owned {
            first_ack_block_length,
            blocks: Vec::new(),
            block_width,
        })
    }

    pub(super) fn from_borrowed(buf: Bytes, count: u8, block_width: usize) -> Self {
        Self(SectionRepr::Borrowed { buf, count, block_width })
    }

    /// Appends a block to an owned section. No-op on a borrowed section.
    pub fn add_ack_block(&mut self, block: AckBlock) {
        if let SectionRepr::Owned { blocks, .. } = &mut self.0 {
            blocks.push(block);
        }
    }

    pub fn block_width(&self) -> usize {
        match &self.0 {
            SectionRepr::Borrowed { block_width, .. } => *block_width,
            SectionRepr::Owned { block_width, .. } => *block_width,
        }
    }

    pub fn count(&self) -> u8 {
        match &self.0 {
            SectionRepr::Borrowed { count, .. } => *count,
            SectionRepr::Owned { blocks, .. } => blocks.len() as u8,
        }
    }

    pub fn first_ack_block_length(&self) -> Result<u64, Error> {
        match &self.0 {
            SectionRepr::Owned { first_ack_block_length, .. } => Ok(*first_ack_block_length),
            SectionRepr::Borrowed { buf, block_width, .. } => {
                read_uint_be(buf.as_ref(), *block_width)
            }
        }
    }

    /// Bytes this section occupies: `block_width + (block_width + 1) × count`.
    pub fn size(&self) -> usize {
        let width = self.block_width();
        width + (width + 1) * self.count() as usize
    }

    /// Writes the section, returning bytes written. Each block's length is
    /// written at its own cursor position, not the section's base.
    pub fn store<T: BufMut>(&self, out: &mut T) -> usize {
        let width = self.block_width();
        match &self.0 {
            SectionRepr::Owned { first_ack_block_length, blocks, .. } => {
                let mut field = vec![0u8; width];
                write_uint_be(*first_ack_block_length, width, &mut field);
                out.put_slice(&field);
                for block in blocks {
                    out.put_u8(block.gap);
                    write_uint_be(block.length, width, &mut field);
                    out.put_slice(&field);
                }
                self.size()
            }
            SectionRepr::Borrowed { buf, .. } => {
                let size = self.size();
                out.put_slice(&buf[..size]);
                size
            }
        }
    }

    /// Iterates the section's blocks in wire order. Non-destructive.
    pub fn iter(&self) -> AckBlockIter<'_> {
        AckBlockIter { section: self, index: 0 }
    }

    fn block_at(&self, index: u8) -> Result<AckBlock, Error> {
        match &self.0 {
            SectionRepr::Owned { blocks, .. } => blocks
                .get(index as usize)
                .copied()
                .ok_or_else(|| Error::truncated(index as usize + 1, blocks.len())),
            SectionRepr::Borrowed { buf, block_width, .. } => {
                let width = *block_width;
                let offset = width + (1 + width) * index as usize;
                let gap = byte_at(buf, offset)?;
                let length_start = offset + 1;
                let length_bytes = buf
                    .get(length_start..length_start + width)
                    .ok_or_else(|| Error::truncated(width, buf.len().saturating_sub(length_start)))?;
                let length = read_uint_be(length_bytes, width)?;
                Ok(AckBlock::new(gap, length))
            }
        }
    }
}

/// Iterator over an [`AckBlockSection`]'s blocks, in wire order.
pub struct AckBlockIter<'a> {
    section: &'a AckBlockSection,
    index: u8,
}

impl Iterator for AckBlockIter<'_> {
    type Item = Result<AckBlock, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.section.count() {
            return None;
        }
        let result = self.section.block_at(self.index);
        self.index += 1;
        Some(result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fields {
    largest_acknowledged: u64,
    ack_delay: u16,
    section: AckBlockSection,
}

fn ll_selector_for(value: u64) -> u8 {
    if value <= 0xff {
        0
    } else if value <= 0xffff {
        1
    } else if value <= 0xffff_ffff {
        2
    } else {
        3
    }
}

fn decode(buf: &Bytes) -> Result<(Fields, usize), Error> {
    let raw = buf.as_ref();
    let first = byte_at(raw, 0)?;
    let has_blocks = first & wire::ACK_BLOCKS_BIT != 0;
    let ll = (first & 0x0c) >> wire::ACK_LL_SHIFT;
    let mm = first & wire::ACK_MM_MASK;
    let ll_width = width_from_selector(ll);
    let mm_width = width_from_selector(mm);

    let mut offset = 1usize;
    let count = if has_blocks {
        let c = byte_at(raw, offset)?;
        offset += 1;
        c
    } else {
        0
    };

    let largest_acknowledged = read_uint_be(
        raw.get(offset..)
            .ok_or_else(|| Error::truncated(ll_width, raw.len().saturating_sub(offset)))?,
        ll_width,
    )?;
    offset += ll_width;

    let ack_delay = read_uint_be(
        raw.get(offset..)
            .ok_or_else(|| Error::truncated(2, raw.len().saturating_sub(offset)))?,
        2,
    )? as u16;
    offset += 2;

    let section_len = mm_width + (mm_width + 1) * count as usize;
    if raw.len() < offset + section_len {
        return Err(Error::truncated(section_len, raw.len().saturating_sub(offset)));
    }
    let section = AckBlockSection::from_borrowed(buf.slice(offset..offset + section_len), count, mm_width);
    let consumed = offset + section_len;

    Ok((
        Fields {
            largest_acknowledged,
            ack_delay,
            section,
        },
        consumed,
    ))
}

/// `ACK` — acknowledges receipt of one or more packet-number ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckFrame(Repr<Fields>);

impl AckFrame {
    /// Builds an `ACK` frame. `LL` is chosen at serialization time as the
    /// smallest width that fits `largest_acknowledged`; `section`'s own
    /// `block_width` becomes `MM`.
    pub fn new(largest_acknowledged: u64, ack_delay: u16, section: AckBlockSection) -> Self {
        Self(Repr::Owned(Fields {
            largest_acknowledged,
            ack_delay,
            section,
        }))
    }

    /// Parses an `ACK` frame from the start of `buf`.
    pub fn parse(buf: Bytes) -> Self {
        Self(Repr::Borrowed(buf))
    }

    fn fields(&self) -> Result<Fields, Error> {
        match &self.0 {
            Repr::Owned(f) => Ok(f.clone()),
            Repr::Borrowed(buf) => decode(buf).map(|(f, _)| f),
        }
    }

    pub fn largest_acknowledged(&self) -> Result<u64, Error> {
        self.fields().map(|f| f.largest_acknowledged)
    }

    pub fn ack_delay(&self) -> Result<u16, Error> {
        self.fields().map(|f| f.ack_delay)
    }

    pub fn num_blocks(&self) -> Result<u8, Error> {
        self.fields().map(|f| f.section.count())
    }

    /// Whether this frame carries any ack blocks beyond the first run.
    /// Derived from the block count rather than stored separately.
    pub fn has_ack_blocks(&self) -> Result<bool, Error> {
        self.num_blocks().map(|n| n > 0)
    }

    pub fn ack_block_section(&self) -> Result<AckBlockSection, Error> {
        self.fields().map(|f| f.section)
    }
}

impl GetFrameType for AckFrame {
    fn frame_type(&self) -> FrameType {
        FrameType::Ack
    }
}

impl EncodeFrame for AckFrame {
    fn encoding_size(&self) -> usize {
        match &self.0 {
            Repr::Owned(f) => {
                let ll_width = width_from_selector(ll_selector_for(f.largest_acknowledged));
                let mut n = 1 + ll_width + 2 + f.section.size();
                if f.section.count() > 0 {
                    n += 1;
                }
                n
            }
            Repr::Borrowed(buf) => decode(buf).map(|(_, n)| n).unwrap_or(buf.len()),
        }
    }
}

impl<T: BufMut> WriteFrame<AckFrame> for T {
    fn put_frame(&mut self, frame: &AckFrame) {
        match &frame.0 {
            Repr::Owned(f) => {
                let ll = ll_selector_for(f.largest_acknowledged);
                let ll_width = width_from_selector(ll);
                let mm = selector_from_width(f.section.block_width());
                let count = f.section.count();

                let mut first = wire::ACK_BASE | (ll << wire::ACK_LL_SHIFT) | mm;
                if count > 0 {
                    first |= wire::ACK_BLOCKS_BIT;
                }
                self.put_u8(first);
                if count > 0 {
                    self.put_u8(count);
                }

                let mut largest = vec![0u8; ll_width];
                write_uint_be(f.largest_acknowledged, ll_width, &mut largest);
                self.put_slice(&largest);

                let mut delay = [0u8; 2];
                write_uint_be(f.ack_delay as u64, 2, &mut delay);
                self.put_slice(&delay);

                f.section.store(self);
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
    fn worked_example_no_blocks() {
        // largest_acknowledged=0x42, ack_delay=0, no blocks, MM width=4.
        // 1 (type) + 1 (largest, LL=1 byte) + 2 (ack_delay) + 4 (section,
        // MM=4 bytes) = 8 bytes total.
        let section = AckBlockSection::new(0x42, 4);
        let frame = AckFrame::new(0x42, 0, section);
        let mut buf = vec![0u8; frame.encoding_size()];
        let n = serialize(&frame, &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xa2, 0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x42]);

        let parsed = AckFrame::parse(Bytes::from(buf));
        assert_eq!(parsed.largest_acknowledged().unwrap(), 0x42);
        assert_eq!(parsed.ack_delay().unwrap(), 0);
        assert_eq!(parsed.num_blocks().unwrap(), 0);
        assert!(!parsed.has_ack_blocks().unwrap());
        assert_eq!(
            parsed.ack_block_section().unwrap().first_ack_block_length().unwrap(),
            0x42
        );
    }

    #[test]
    fn round_trips_with_blocks() {
        let mut section = AckBlockSection::new(10, 4);
        section.add_ack_block(AckBlock::new(2, 5));
        section.add_ack_block(AckBlock::new(1, 3));
        let frame = AckFrame::new(1000, 42, section);

        let mut buf = vec![0u8; frame.encoding_size()];
        serialize(&frame, &mut buf).unwrap();
        let parsed = AckFrame::parse(Bytes::from(buf));

        assert_eq!(parsed.largest_acknowledged().unwrap(), 1000);
        assert_eq!(parsed.ack_delay().unwrap(), 42);
        assert!(parsed.has_ack_blocks().unwrap());
        assert_eq!(parsed.num_blocks().unwrap(), 2);

        let section = parsed.ack_block_section().unwrap();
        let blocks: Vec<AckBlock> = section.iter().map(|b| b.unwrap()).collect();
        assert_eq!(blocks, vec![AckBlock::new(2, 5), AckBlock::new(1, 3)]);
    }

    #[test]
    fn serializer_does_not_clobber_later_blocks_with_the_first() {
        // Regression test for the original's base-pointer bug: every block
        // must keep its own distinct length in the output.
        let mut section = AckBlockSection::new(0, 1);
        section.add_ack_block(AckBlock::new(0, 11));
        section.add_ack_block(AckBlock::new(0, 22));
        section.add_ack_block(AckBlock::new(0, 33));

        let mut out = Vec::new();
        section.store(&mut out);

        let parsed = AckBlockSection::from_borrowed(Bytes::from(out), 3, 1);
        let lengths: Vec<u64> = parsed.iter().map(|b| b.unwrap().length).collect();
        assert_eq!(lengths, vec![11, 22, 33]);
    }

    #[test]
    fn iteration_is_restartable() {
        let mut section = AckBlockSection::new(0, 2);
        section.add_ack_block(AckBlock::new(5, 7));
        let first_pass: Vec<_> = section.iter().map(|b| b.unwrap()).collect();
        let second_pass: Vec<_> = section.iter().map(|b| b.unwrap()).collect();
        assert_eq!(first_pass, second_pass);
    }
}
