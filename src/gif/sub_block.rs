use alloc::vec::Vec;

use super::cursor::ByteCursor;
use crate::error::GifError;
use crate::offsets::{Span, SubBlockOffsets};

/// Concatenated payload of a sub-block sequence.
#[derive(Debug)]
pub(crate) struct SubBlocks {
    pub data: Vec<u8>,
    /// Payload length of each non-empty sub-block, in order.
    pub lengths: Vec<u8>,
    pub offsets: SubBlockOffsets,
    /// Offset just past the zero-length terminator.
    pub end: usize,
}

/// Read length-prefixed sub-blocks starting at `start` until a zero length.
pub(crate) fn read_sub_blocks(cursor: &ByteCursor<'_>, start: usize) -> Result<SubBlocks, GifError> {
    let mut data = Vec::new();
    let mut lengths = Vec::new();
    let mut offset = start;
    loop {
        let len = cursor.read_u8(offset)?;
        if len == 0 {
            let terminator = Span::at(offset, 1);
            offset += 1;
            return Ok(SubBlocks {
                data,
                lengths,
                offsets: SubBlockOffsets {
                    span: Span::new(start, offset),
                    terminator,
                },
                end: offset,
            });
        }
        offset += 1;
        data.extend_from_slice(cursor.read_bytes(offset, usize::from(len))?);
        lengths.push(len);
        offset += usize::from(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_until_terminator() {
        let bytes = [3, b'a', b'b', b'c', 2, b'd', b'e', 0, 0xAA];
        let blocks = read_sub_blocks(&ByteCursor::new(&bytes), 0).unwrap();
        assert_eq!(blocks.data, b"abcde");
        assert_eq!(blocks.lengths, [3, 2]);
        assert_eq!(blocks.end, 8);
        assert_eq!(blocks.offsets.span, Span::new(0, 8));
        assert_eq!(blocks.offsets.terminator, Span::new(7, 8));
    }

    #[test]
    fn empty_sequence_is_just_a_terminator() {
        let blocks = read_sub_blocks(&ByteCursor::new(&[0xFF, 0]), 1).unwrap();
        assert!(blocks.data.is_empty());
        assert_eq!(blocks.end, 2);
    }

    #[test]
    fn missing_terminator_is_truncated() {
        let bytes = [2, 1, 2];
        assert!(matches!(
            read_sub_blocks(&ByteCursor::new(&bytes), 0),
            Err(GifError::TruncatedInput { offset: 3, .. })
        ));
    }

    #[test]
    fn short_payload_is_truncated() {
        let bytes = [5, 1, 2];
        assert!(matches!(
            read_sub_blocks(&ByteCursor::new(&bytes), 0),
            Err(GifError::TruncatedInput {
                offset: 1,
                needed: 5,
                ..
            })
        ));
    }
}
