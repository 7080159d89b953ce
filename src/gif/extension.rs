//! Plain text, comment and application extensions.
//!
//! All three start with the 0x21 introducer and a label byte. Comments and
//! plain text are a bare sub-block sequence. Application extensions carry a
//! fixed identifier block followed by sub-blocks.

use super::cursor::ByteCursor;
use super::sub_block::read_sub_blocks;
use crate::document::{ApplicationExtension, CommentExtension, PlainTextExtension};
use crate::error::GifError;
use crate::offsets::{ApplicationOffsets, ExtensionOffsets, Span};

pub(crate) const EXTENSION_INTRODUCER: u8 = 0x21;
pub(crate) const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
pub(crate) const PLAIN_TEXT_LABEL: u8 = 0x01;
pub(crate) const APPLICATION_LABEL: u8 = 0xFF;
pub(crate) const COMMENT_LABEL: u8 = 0xFE;

/// Sub-block id of the NETSCAPE2.0 / ANIMEXTS1.0 looping payload.
const LOOP_SUB_BLOCK_ID: u8 = 0x01;

/// A parsed extension, its byte offsets when tracked, and the offset just
/// past it.
pub(crate) struct Parsed<T, O> {
    pub value: T,
    pub offsets: Option<O>,
    pub end: usize,
}

/// Parse the sub-block body shared by plain text and comment extensions.
fn parse_data_extension(
    cursor: &ByteCursor<'_>,
    start: usize,
    track_offsets: bool,
) -> Result<Parsed<alloc::vec::Vec<u8>, ExtensionOffsets>, GifError> {
    let blocks = read_sub_blocks(cursor, start + 2)?;
    let offsets = track_offsets.then(|| ExtensionOffsets {
        span: Span::new(start, blocks.end),
        introducer: Span::at(start, 1),
        label: Span::at(start + 1, 1),
        data: blocks.offsets,
    });
    Ok(Parsed {
        value: blocks.data,
        offsets,
        end: blocks.end,
    })
}

/// Parse a plain text extension whose introducer is at `start`.
pub(crate) fn parse_plain_text(
    cursor: &ByteCursor<'_>,
    start: usize,
    track_offsets: bool,
) -> Result<Parsed<PlainTextExtension, ExtensionOffsets>, GifError> {
    let parsed = parse_data_extension(cursor, start, track_offsets)?;
    log::debug!("plain text extension at {start}: {} bytes", parsed.value.len());
    Ok(Parsed {
        value: PlainTextExtension { data: parsed.value },
        offsets: parsed.offsets,
        end: parsed.end,
    })
}

/// Parse a comment extension whose introducer is at `start`.
pub(crate) fn parse_comment(
    cursor: &ByteCursor<'_>,
    start: usize,
    track_offsets: bool,
) -> Result<Parsed<CommentExtension, ExtensionOffsets>, GifError> {
    let parsed = parse_data_extension(cursor, start, track_offsets)?;
    log::debug!("comment extension at {start}: {} bytes", parsed.value.len());
    Ok(Parsed {
        value: CommentExtension { data: parsed.value },
        offsets: parsed.offsets,
        end: parsed.end,
    })
}

/// Parse an application extension whose introducer is at `start`.
pub(crate) fn parse_application(
    cursor: &ByteCursor<'_>,
    start: usize,
    track_offsets: bool,
) -> Result<Parsed<ApplicationExtension, ApplicationOffsets>, GifError> {
    let block_size_at = start + 2;
    let block_size = cursor.read_u8(block_size_at)?;
    let identifier_at = block_size_at + 1;
    let identifier = cursor
        .read_bytes(identifier_at, usize::from(block_size))?
        .to_vec();
    let data_at = identifier_at + usize::from(block_size);
    let blocks = read_sub_blocks(cursor, data_at)?;

    // Loop count: first sub-block is exactly [0x01, lo, hi].
    let loop_count = match blocks.lengths.first().copied() {
        Some(3) if blocks.data[0] == LOOP_SUB_BLOCK_ID => {
            Some(u16::from_le_bytes([blocks.data[1], blocks.data[2]]))
        }
        _ => None,
    };

    let offsets = track_offsets.then(|| ApplicationOffsets {
        span: Span::new(start, blocks.end),
        introducer: Span::at(start, 1),
        label: Span::at(start + 1, 1),
        block_size: Span::at(block_size_at, 1),
        identifier: Span::at(identifier_at, usize::from(block_size)),
        data: blocks.offsets,
        loop_count: loop_count.map(|_| Span::at(data_at + 2, 2)),
    });

    log::debug!(
        "application extension at {start}: {:?}, loop count {loop_count:?}",
        alloc::string::String::from_utf8_lossy(&identifier)
    );

    Ok(Parsed {
        value: ApplicationExtension {
            block_size,
            identifier,
            data: blocks.data,
            loop_count,
        },
        offsets,
        end: blocks.end,
    })
}

/// Skip an extension with an unrecognized label by reading its body as a
/// generic sub-block sequence. Returns the offset just past it.
pub(crate) fn skip_unknown(cursor: &ByteCursor<'_>, start: usize) -> Result<usize, GifError> {
    Ok(read_sub_blocks(cursor, start + 2)?.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn netscape_loop(count: u16) -> Vec<u8> {
        let mut b = alloc::vec![EXTENSION_INTRODUCER, APPLICATION_LABEL, 11];
        b.extend_from_slice(b"NETSCAPE2.0");
        b.extend_from_slice(&[3, LOOP_SUB_BLOCK_ID]);
        b.extend_from_slice(&count.to_le_bytes());
        b.push(0);
        b
    }

    #[test]
    fn netscape_loop_extension_is_nineteen_bytes() {
        let bytes = netscape_loop(5);
        let parsed = parse_application(&ByteCursor::new(&bytes), 0, true).unwrap();
        assert_eq!(parsed.end, 19);
        assert_eq!(parsed.value.identifier, b"NETSCAPE2.0");
        assert_eq!(parsed.value.loop_count, Some(5));
        assert_eq!(parsed.value.data, [1, 5, 0]);
        let offsets = parsed.offsets.unwrap();
        assert_eq!(offsets.block_size, Span::new(2, 3));
        assert_eq!(offsets.identifier, Span::new(3, 14));
        assert_eq!(offsets.loop_count, Some(Span::new(16, 18)));
        assert_eq!(offsets.data.terminator, Span::new(18, 19));
    }

    #[test]
    fn untracked_parse_builds_no_offsets() {
        let bytes = netscape_loop(2);
        let parsed = parse_application(&ByteCursor::new(&bytes), 0, false).unwrap();
        assert!(parsed.offsets.is_none());
        assert_eq!(parsed.value.loop_count, Some(2));
        assert_eq!(parsed.end, 19);

        let bytes = [EXTENSION_INTRODUCER, COMMENT_LABEL, 1, b'a', 0];
        let parsed = parse_comment(&ByteCursor::new(&bytes), 0, false).unwrap();
        assert!(parsed.offsets.is_none());
        assert_eq!(parsed.end, 5);
    }

    #[test]
    fn application_without_loop_payload() {
        let mut bytes = alloc::vec![EXTENSION_INTRODUCER, APPLICATION_LABEL, 11];
        bytes.extend_from_slice(b"XMP DataXMP");
        bytes.extend_from_slice(&[4, b'<', b'x', b'/', b'>', 2, b'a', b'b', 0]);
        let parsed = parse_application(&ByteCursor::new(&bytes), 0, true).unwrap();
        assert_eq!(parsed.value.loop_count, None);
        assert_eq!(parsed.value.data, b"<x/>ab");
        assert_eq!(parsed.end, bytes.len());
    }

    #[test]
    fn multi_block_comment_is_concatenated() {
        let bytes = [
            EXTENSION_INTRODUCER,
            COMMENT_LABEL,
            3,
            b'h',
            b'e',
            b'y',
            2,
            b'!',
            b'!',
            0,
        ];
        let parsed = parse_comment(&ByteCursor::new(&bytes), 0, true).unwrap();
        assert_eq!(parsed.value.text(), "hey!!");
        assert_eq!(parsed.end, 10);
        assert_eq!(parsed.offsets.unwrap().data.span, Span::new(2, 10));
    }

    #[test]
    fn single_block_comment_matches_fixed_layout() {
        let bytes = [EXTENSION_INTRODUCER, COMMENT_LABEL, 2, b'o', b'k', 0, 0x3B];
        let parsed = parse_comment(&ByteCursor::new(&bytes), 0, true).unwrap();
        assert_eq!(parsed.value.data, b"ok");
        assert_eq!(parsed.end, 6);
    }

    #[test]
    fn plain_text_keeps_grid_header() {
        let mut bytes = alloc::vec![EXTENSION_INTRODUCER, PLAIN_TEXT_LABEL, 12];
        bytes.extend_from_slice(&[0; 12]);
        bytes.extend_from_slice(&[2, b'h', b'i', 0]);
        let parsed = parse_plain_text(&ByteCursor::new(&bytes), 0, true).unwrap();
        assert_eq!(parsed.value.data.len(), 14);
        assert_eq!(&parsed.value.data[12..], b"hi");
        assert_eq!(parsed.end, bytes.len());
    }

    #[test]
    fn truncated_application_identifier() {
        let bytes = [EXTENSION_INTRODUCER, APPLICATION_LABEL, 11, b'N', b'E'];
        assert!(matches!(
            parse_application(&ByteCursor::new(&bytes), 0, true),
            Err(GifError::TruncatedInput { offset: 3, needed: 11, .. })
        ));
    }

    #[test]
    fn unknown_extension_skips_sub_blocks() {
        let bytes = [EXTENSION_INTRODUCER, 0x42, 2, 9, 9, 0, 0x3B];
        assert_eq!(skip_unknown(&ByteCursor::new(&bytes), 0).unwrap(), 6);
    }
}
