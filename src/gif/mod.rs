//! GIF block grammar.
//!
//! `Header → LogicalScreenDescriptor → [GlobalColorTable] → blocks* → [Trailer]`
//!
//! Parsing works on explicit offsets through [`cursor::ByteCursor`]; every
//! parser returns the offset just past what it consumed, and those offsets
//! double as the provenance spans recorded in [`crate::offsets`].

mod cursor;
mod extension;
mod frame;
pub(crate) mod lzw;
pub(crate) mod packed;
mod sub_block;

use alloc::vec::Vec;

use enough::Stop;

use crate::color::{COLOR_BYTES, ColorTable};
use crate::decode::UnknownExtensionPolicy;
use crate::document::{Document, ExtensionSet, Header, LogicalScreenDescriptor, Version};
use crate::error::{DecodeWarning, GifError};
use crate::limits::Limits;
use crate::offsets::{
    DocumentOffsets, ExtensionSetOffsets, HeaderOffsets, ScreenDescriptorOffsets, Span,
};
use cursor::ByteCursor;
use extension::{
    APPLICATION_LABEL, COMMENT_LABEL, EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL,
    PLAIN_TEXT_LABEL,
};
use frame::{FrameOutcome, FrameParser, IMAGE_SEPARATOR};
use packed::ScreenPacked;

pub(crate) const SIGNATURE: &[u8; 3] = b"GIF";
pub(crate) const TRAILER: u8 = 0x3B;
/// Header (6) plus logical screen descriptor (7).
pub(crate) const MIN_LEN: usize = 13;

const HEADER_LEN: usize = 6;
const SCREEN_DESCRIPTOR_LEN: usize = 7;

/// Decode knobs threaded through the parsers.
#[derive(Clone, Debug)]
pub(crate) struct ParseOptions<'a> {
    pub limits: Option<&'a Limits>,
    pub track_offsets: bool,
    pub unknown_extensions: UnknownExtensionPolicy,
}

/// What to do after meeting an unrecognized extension label.
pub(crate) enum UnknownAction {
    /// Stop parsing; no further blocks are read.
    Halt,
    /// Continue at this offset.
    Resume(usize),
}

/// Record a warning and log it.
pub(crate) fn push_warning(warnings: &mut Vec<DecodeWarning>, warning: DecodeWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}

pub(crate) fn handle_unknown_extension(
    cursor: &ByteCursor<'_>,
    offset: usize,
    label: u8,
    policy: UnknownExtensionPolicy,
    warnings: &mut Vec<DecodeWarning>,
) -> Result<UnknownAction, GifError> {
    match policy {
        UnknownExtensionPolicy::Error => Err(GifError::UnknownExtensionLabel { label, offset }),
        UnknownExtensionPolicy::Stop => {
            push_warning(warnings, DecodeWarning::UnknownExtensionLabel { label, offset });
            Ok(UnknownAction::Halt)
        }
        UnknownExtensionPolicy::SkipSubBlocks => {
            push_warning(warnings, DecodeWarning::UnknownExtensionLabel { label, offset });
            Ok(UnknownAction::Resume(extension::skip_unknown(cursor, offset)?))
        }
    }
}

/// Read a color table of `len` entries at `offset`.
pub(crate) fn read_color_table(
    cursor: &ByteCursor<'_>,
    offset: usize,
    len: usize,
) -> Result<(ColorTable, Span), GifError> {
    let bytes = cursor.read_bytes(offset, len * COLOR_BYTES)?;
    Ok((
        ColorTable::from_rgb_bytes(bytes),
        Span::at(offset, bytes.len()),
    ))
}

/// Header and logical screen descriptor, the fixed 13-byte prefix.
pub(crate) struct Preamble {
    pub header: Header,
    pub screen_descriptor: LogicalScreenDescriptor,
    pub header_offsets: HeaderOffsets,
    pub screen_offsets: ScreenDescriptorOffsets,
}

/// Parse and validate the fixed prefix. Shared by probing and decoding.
pub(crate) fn parse_preamble(data: &[u8]) -> Result<Preamble, GifError> {
    if data.is_empty() {
        return Err(GifError::InvalidInput("empty input".into()));
    }
    if data.len() < MIN_LEN {
        return Err(GifError::InvalidInput(alloc::format!(
            "{} bytes is too short for a GIF header and screen descriptor",
            data.len()
        )));
    }
    let cursor = ByteCursor::new(data);
    let signature = cursor.read_array::<3>(0)?;
    if &signature != SIGNATURE {
        return Err(GifError::InvalidInput("missing GIF signature".into()));
    }
    let version = Version::from_bytes(cursor.read_array::<3>(3)?);
    if let Version::Unknown(bytes) = version {
        log::debug!("unrecognized GIF version {bytes:?}, parsing as 89a");
    }

    let at = HEADER_LEN;
    let screen_descriptor = LogicalScreenDescriptor {
        width: cursor.read_u16_le(at)?,
        height: cursor.read_u16_le(at + 2)?,
        packed: ScreenPacked::from_byte(cursor.read_u8(at + 4)?),
        background_color_index: cursor.read_u8(at + 5)?,
        pixel_aspect_ratio_raw: cursor.read_u8(at + 6)?,
    };

    Ok(Preamble {
        header: Header { signature, version },
        screen_descriptor,
        header_offsets: HeaderOffsets {
            span: Span::at(0, HEADER_LEN),
            signature: Span::at(0, 3),
            version: Span::at(3, 3),
        },
        screen_offsets: ScreenDescriptorOffsets {
            span: Span::at(at, SCREEN_DESCRIPTOR_LEN),
            width: Span::at(at, 2),
            height: Span::at(at + 2, 2),
            packed: Span::at(at + 4, 1),
            background_color_index: Span::at(at + 5, 1),
            pixel_aspect_ratio: Span::at(at + 6, 1),
        },
    })
}

/// Parse a whole GIF stream into a [`Document`].
pub(crate) fn parse_document(
    data: &[u8],
    options: &ParseOptions<'_>,
    stop: &dyn Stop,
) -> Result<Document, GifError> {
    let preamble = parse_preamble(data)?;
    let screen = preamble.screen_descriptor;
    if let Some(limits) = options.limits {
        limits.check(u32::from(screen.width), u32::from(screen.height))?;
    }
    log::debug!(
        "{:?} {}x{} logical screen, global color table: {}",
        preamble.header.version,
        screen.width,
        screen.height,
        screen.packed.global_color_table_flag,
    );

    let cursor = ByteCursor::new(data);
    let mut offset = MIN_LEN;

    let mut global_color_table = None;
    let mut global_color_table_span = None;
    if screen.packed.global_color_table_flag {
        let (table, span) =
            read_color_table(&cursor, offset, screen.packed.global_color_table_len())?;
        offset = span.end;
        global_color_table = Some(table);
        global_color_table_span = Some(span);
    }

    let mut frames = Vec::new();
    let mut frame_offsets = Vec::new();
    let mut extensions = ExtensionSet::default();
    let mut extension_offsets = ExtensionSetOffsets::default();
    let mut warnings = Vec::new();
    let mut trailer = None;

    let frame_parser = FrameParser {
        cursor,
        global_color_table: global_color_table.as_ref(),
        options,
        stop,
    };

    loop {
        stop.check()?;
        if cursor.at_end(offset) {
            push_warning(&mut warnings, DecodeWarning::MissingTrailer { offset });
            break;
        }
        let byte = cursor.read_u8(offset)?;
        let starts_frame = match byte {
            IMAGE_SEPARATOR => true,
            EXTENSION_INTRODUCER => cursor.read_u8(offset + 1)? == GRAPHIC_CONTROL_LABEL,
            _ => false,
        };

        if starts_frame {
            if let Some(limits) = options.limits {
                limits.check_frame_count(frames.len())?;
            }
            match frame_parser.parse(frames.len(), offset, &mut warnings)? {
                FrameOutcome::Decoded {
                    frame,
                    offsets,
                    end,
                } => {
                    frames.push(*frame);
                    frame_offsets.extend(offsets);
                    offset = end;
                }
                FrameOutcome::NoImage { offset: next } => offset = next,
                FrameOutcome::Halted { offset: at } => {
                    offset = at;
                    break;
                }
            }
            continue;
        }

        match byte {
            EXTENSION_INTRODUCER => {
                let label = cursor.read_u8(offset + 1)?;
                match label {
                    PLAIN_TEXT_LABEL => {
                        let parsed =
                            extension::parse_plain_text(&cursor, offset, options.track_offsets)?;
                        extensions.text = Some(parsed.value);
                        extension_offsets.text = parsed.offsets;
                        offset = parsed.end;
                    }
                    APPLICATION_LABEL => {
                        let parsed =
                            extension::parse_application(&cursor, offset, options.track_offsets)?;
                        extensions.application = Some(parsed.value);
                        extension_offsets.application = parsed.offsets;
                        offset = parsed.end;
                    }
                    COMMENT_LABEL => {
                        let parsed =
                            extension::parse_comment(&cursor, offset, options.track_offsets)?;
                        extensions.comment = Some(parsed.value);
                        extension_offsets.comment = parsed.offsets;
                        offset = parsed.end;
                    }
                    _ => match handle_unknown_extension(
                        &cursor,
                        offset,
                        label,
                        options.unknown_extensions,
                        &mut warnings,
                    )? {
                        UnknownAction::Resume(next) => offset = next,
                        UnknownAction::Halt => break,
                    },
                }
            }
            TRAILER => {
                trailer = Some(Span::at(offset, 1));
                offset += 1;
                break;
            }
            other => {
                log::debug!("unexpected byte 0x{other:02X} at offset {offset}, stopping");
                push_warning(&mut warnings, DecodeWarning::MissingTrailer { offset });
                break;
            }
        }
    }

    if trailer.is_some() && offset < cursor.len() {
        log::debug!("{} bytes after the trailer ignored", cursor.len() - offset);
    }
    log::debug!(
        "decoded {} frames, {} warnings",
        frames.len(),
        warnings.len()
    );

    let offsets = options.track_offsets.then(|| DocumentOffsets {
        span: Span::new(0, offset),
        header: preamble.header_offsets,
        screen_descriptor: preamble.screen_offsets,
        global_color_table: global_color_table_span,
        frames: frame_offsets,
        extensions: extension_offsets,
        trailer,
    });

    Ok(Document {
        byte_len: data.len(),
        header: preamble.header,
        screen_descriptor: screen,
        global_color_table,
        frames,
        extensions,
        trailer: trailer.is_some(),
        warnings,
        offsets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    fn options() -> ParseOptions<'static> {
        ParseOptions {
            limits: None,
            track_offsets: true,
            unknown_extensions: UnknownExtensionPolicy::Stop,
        }
    }

    fn screen(packed: u8) -> Vec<u8> {
        let mut out = b"GIF89a".to_vec();
        out.extend_from_slice(&[4, 0, 3, 0, packed, 0, 0]);
        out
    }

    #[test]
    fn preamble_fields() {
        let bytes = screen(0b1001_0001);
        let p = parse_preamble(&bytes).unwrap();
        assert_eq!(p.header.version, Version::Gif89a);
        assert_eq!((p.screen_descriptor.width, p.screen_descriptor.height), (4, 3));
        assert!(p.screen_descriptor.packed.global_color_table_flag);
        assert_eq!(p.screen_descriptor.packed.color_resolution, 1);
        assert_eq!(p.screen_descriptor.packed.global_color_table_len(), 4);
        assert_eq!(p.screen_offsets.packed, Span::new(10, 11));
    }

    #[test]
    fn short_and_foreign_inputs_are_rejected() {
        assert!(matches!(parse_preamble(&[]), Err(GifError::InvalidInput(_))));
        assert!(matches!(
            parse_preamble(b"GIF89a\x01\x00"),
            Err(GifError::InvalidInput(_))
        ));
        let mut png = screen(0);
        png[..3].copy_from_slice(b"PNG");
        assert!(matches!(parse_preamble(&png), Err(GifError::InvalidInput(_))));
    }

    #[test]
    fn header_only_stream_lacks_trailer() {
        let bytes = screen(0);
        let doc = parse_document(&bytes, &options(), &Unstoppable).unwrap();
        assert!(doc.frames().is_empty());
        assert!(!doc.trailer());
        assert_eq!(doc.warnings(), [DecodeWarning::MissingTrailer { offset: 13 }]);
    }

    #[test]
    fn global_table_then_trailer() {
        let mut bytes = screen(0b1000_0000);
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, TRAILER]);
        let doc = parse_document(&bytes, &options(), &Unstoppable).unwrap();
        assert!(doc.trailer());
        assert!(doc.warnings().is_empty());
        assert_eq!(doc.global_color_table().unwrap().len(), 2);
        let offsets = doc.offsets().unwrap();
        assert_eq!(offsets.global_color_table, Some(Span::new(13, 19)));
        assert_eq!(offsets.trailer, Some(Span::new(19, 20)));
        assert_eq!(offsets.span, Span::new(0, 20));
    }

    #[test]
    fn truncated_global_table_is_an_error() {
        let mut bytes = screen(0b1000_0001);
        bytes.extend_from_slice(&[0; 5]);
        assert!(matches!(
            parse_document(&bytes, &options(), &Unstoppable),
            Err(GifError::TruncatedInput {
                offset: 13,
                needed: 12,
                ..
            })
        ));
    }

    #[test]
    fn top_level_extensions_last_wins() {
        let mut bytes = screen(0);
        bytes.extend_from_slice(&[EXTENSION_INTRODUCER, COMMENT_LABEL, 1, b'x', 0]);
        bytes.extend_from_slice(&[EXTENSION_INTRODUCER, COMMENT_LABEL, 1, b'y', 0]);
        bytes.push(TRAILER);
        let doc = parse_document(&bytes, &options(), &Unstoppable).unwrap();
        assert_eq!(doc.extensions().comment.as_ref().unwrap().text(), "y");
        assert_eq!(
            doc.offsets().unwrap().extensions.comment.unwrap().span,
            Span::new(18, 23)
        );
    }

    #[test]
    fn offsets_are_opt_in() {
        let mut bytes = screen(0);
        bytes.push(TRAILER);
        let opts = ParseOptions {
            track_offsets: false,
            ..options()
        };
        let doc = parse_document(&bytes, &opts, &Unstoppable).unwrap();
        assert!(doc.offsets().is_none());
        assert!(doc.trailer());
    }

    #[test]
    fn unknown_top_level_label_under_each_policy() {
        let mut bytes = screen(0);
        bytes.extend_from_slice(&[EXTENSION_INTRODUCER, 0x42, 1, 0, 0, TRAILER]);

        let doc = parse_document(&bytes, &options(), &Unstoppable).unwrap();
        assert!(!doc.trailer());
        assert_eq!(
            doc.warnings(),
            [DecodeWarning::UnknownExtensionLabel {
                label: 0x42,
                offset: 13
            }]
        );

        let skip = ParseOptions {
            unknown_extensions: UnknownExtensionPolicy::SkipSubBlocks,
            ..options()
        };
        let doc = parse_document(&bytes, &skip, &Unstoppable).unwrap();
        assert!(doc.trailer());

        let strict = ParseOptions {
            unknown_extensions: UnknownExtensionPolicy::Error,
            ..options()
        };
        assert!(matches!(
            parse_document(&bytes, &strict, &Unstoppable),
            Err(GifError::UnknownExtensionLabel {
                label: 0x42,
                offset: 13
            })
        ));
    }

    #[test]
    fn stray_byte_ends_the_block_loop() {
        let mut bytes = screen(0);
        bytes.extend_from_slice(&[0x00, TRAILER]);
        let doc = parse_document(&bytes, &options(), &Unstoppable).unwrap();
        assert!(!doc.trailer());
        assert_eq!(doc.warnings(), [DecodeWarning::MissingTrailer { offset: 13 }]);
    }

    #[test]
    fn frame_limit_is_enforced() {
        let limits = Limits {
            max_frames: Some(0),
            ..Limits::default()
        };
        let mut bytes = screen(0);
        bytes.extend_from_slice(&[IMAGE_SEPARATOR, 0, 0, 0, 0, 1, 0, 1, 0, 0, 2, 0, TRAILER]);
        let opts = ParseOptions {
            limits: Some(&limits),
            ..options()
        };
        assert!(matches!(
            parse_document(&bytes, &opts, &Unstoppable),
            Err(GifError::LimitExceeded(_))
        ));
    }

    #[test]
    fn canvas_limit_is_enforced() {
        let limits = Limits {
            max_width: Some(3),
            ..Limits::default()
        };
        let bytes = screen(0);
        let opts = ParseOptions {
            limits: Some(&limits),
            ..options()
        };
        assert!(matches!(
            parse_document(&bytes, &opts, &Unstoppable),
            Err(GifError::LimitExceeded(_))
        ));
    }

    #[test]
    fn graphic_control_without_image_yields_no_frame() {
        let mut bytes = screen(0);
        bytes.extend_from_slice(&[EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL, 4, 0, 0, 0, 0, 0]);
        bytes.push(TRAILER);
        let doc = parse_document(&bytes, &options(), &Unstoppable).unwrap();
        assert!(doc.frames().is_empty());
        assert!(doc.trailer());
    }
}
