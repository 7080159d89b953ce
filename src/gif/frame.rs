//! Per-frame grammar: optional graphic control extension, interleaved
//! extensions, image descriptor, optional local color table, image data.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::cursor::ByteCursor;
use super::extension::{
    self, APPLICATION_LABEL, COMMENT_LABEL, EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL,
    PLAIN_TEXT_LABEL,
};
use super::lzw;
use super::packed::{GraphicControlPacked, ImageDescriptorPacked};
use super::sub_block::read_sub_blocks;
use super::{ParseOptions, UnknownAction, handle_unknown_extension, push_warning, read_color_table};
use crate::color::{ColorTable, MISSING_COLOR};
use crate::document::{ExtensionSet, Frame, GraphicControlExtension, ImageDescriptor};
use crate::error::{DecodeWarning, GifError};
use crate::offsets::{
    ExtensionSetOffsets, FrameOffsets, GraphicControlOffsets, ImageDataOffsets,
    ImageDescriptorOffsets, Span,
};
use crate::pixel::{ColorTableSource, Pixel};
use enough::Stop;

pub(crate) const IMAGE_SEPARATOR: u8 = 0x2C;

const GRAPHIC_CONTROL_LEN: usize = 8;
const IMAGE_DESCRIPTOR_LEN: usize = 10;

/// Result of parsing one frame.
pub(crate) enum FrameOutcome {
    Decoded {
        frame: Box<Frame>,
        /// Present only when offsets are tracked.
        offsets: Option<FrameOffsets>,
        end: usize,
    },
    /// No image descriptor followed the frame's extensions; parsing resumes
    /// at `offset` in the top-level loop.
    NoImage { offset: usize },
    /// An unknown extension label stopped parsing at `offset`.
    Halted { offset: usize },
}

/// Decodes one frame starting at a graphic control extension or an image
/// separator.
pub(crate) struct FrameParser<'a, 'd> {
    pub cursor: ByteCursor<'d>,
    pub global_color_table: Option<&'a ColorTable>,
    pub options: &'a ParseOptions<'a>,
    pub stop: &'a dyn Stop,
}

impl FrameParser<'_, '_> {
    pub(crate) fn parse(
        &self,
        index: usize,
        start: usize,
        warnings: &mut Vec<DecodeWarning>,
    ) -> Result<FrameOutcome, GifError> {
        let cursor = &self.cursor;
        let track = self.options.track_offsets;
        let mut offset = start;

        let mut graphic_control = None;
        if cursor.read_u8(offset)? == EXTENSION_INTRODUCER
            && cursor.read_u8(offset + 1)? == GRAPHIC_CONTROL_LABEL
        {
            graphic_control = Some(parse_graphic_control(cursor, offset)?);
            offset += GRAPHIC_CONTROL_LEN;
        }

        let mut extensions = ExtensionSet::default();
        let mut extension_offsets = ExtensionSetOffsets::default();
        let (descriptor_start, image_descriptor) = loop {
            match cursor.read_u8(offset)? {
                EXTENSION_INTRODUCER => {
                    let label = cursor.read_u8(offset + 1)?;
                    offset = match label {
                        PLAIN_TEXT_LABEL => {
                            let parsed = extension::parse_plain_text(cursor, offset, track)?;
                            extensions.text = Some(parsed.value);
                            extension_offsets.text = parsed.offsets;
                            parsed.end
                        }
                        APPLICATION_LABEL => {
                            let parsed = extension::parse_application(cursor, offset, track)?;
                            extensions.application = Some(parsed.value);
                            extension_offsets.application = parsed.offsets;
                            parsed.end
                        }
                        COMMENT_LABEL => {
                            let parsed = extension::parse_comment(cursor, offset, track)?;
                            extensions.comment = Some(parsed.value);
                            extension_offsets.comment = parsed.offsets;
                            parsed.end
                        }
                        // A second graphic control extension lands here too.
                        _ => match handle_unknown_extension(
                            cursor,
                            offset,
                            label,
                            self.options.unknown_extensions,
                            warnings,
                        )? {
                            UnknownAction::Resume(next) => next,
                            UnknownAction::Halt => return Ok(FrameOutcome::Halted { offset }),
                        },
                    };
                }
                IMAGE_SEPARATOR => break (offset, parse_image_descriptor(cursor, offset)?),
                _ => {
                    log::debug!("frame {index}: no image descriptor before offset {offset}");
                    return Ok(FrameOutcome::NoImage { offset });
                }
            }
        };
        offset = descriptor_start + IMAGE_DESCRIPTOR_LEN;

        let width = u32::from(image_descriptor.width);
        let height = u32::from(image_descriptor.height);
        if let Some(limits) = self.options.limits {
            limits.check(width, height)?;
        }

        let mut local_color_table = None;
        let mut local_color_table_span = None;
        if image_descriptor.packed.local_color_table_flag {
            let len = image_descriptor.packed.local_color_table_len();
            let (table, span) = read_color_table(cursor, offset, len)?;
            offset = span.end;
            local_color_table = Some(table);
            local_color_table_span = Some(span);
        }

        let image_data_start = offset;
        let min_code_size = cursor.read_u8(offset)?;
        let blocks = read_sub_blocks(cursor, offset + 1)?;
        let end = blocks.end;
        let sub_block_offsets = blocks.offsets;

        let pixel_count = image_descriptor.pixel_count();
        if let Some(limits) = self.options.limits {
            let bytes = pixel_count
                .checked_mul(core::mem::size_of::<Pixel>() + 1)
                .ok_or_else(|| {
                    GifError::LimitExceeded(alloc::format!("frame {index} is too large to allocate"))
                })?;
            limits.check_memory(bytes)?;
        }
        self.stop.check()?;

        if image_descriptor.packed.interlace_flag {
            log::debug!("frame {index}: interlaced rows are left in stream order");
        }
        let lzw = lzw::decompress(min_code_size, &blocks.data, pixel_count);
        if let Some(cause) = lzw.failure {
            push_warning(
                warnings,
                DecodeWarning::MalformedLzwStream {
                    frame: index,
                    produced: lzw.produced,
                    expected: pixel_count,
                    cause,
                },
            );
        }

        let (table, color_table_source) = match (&local_color_table, self.global_color_table) {
            (Some(local), _) => (Some(local), ColorTableSource::Local),
            (None, Some(global)) => (Some(global), ColorTableSource::Global),
            (None, None) => (None, ColorTableSource::None),
        };
        let transparent = graphic_control.and_then(|g| g.transparent_index());
        let resolved = resolve_pixels(&lzw.indices, table, transparent);
        if table.is_none() && pixel_count > 0 {
            push_warning(warnings, DecodeWarning::MissingColorTable { frame: index });
        } else if let Some((first_index, count)) = resolved.out_of_range {
            push_warning(
                warnings,
                DecodeWarning::OutOfRangeColorIndex {
                    frame: index,
                    count,
                    first_index,
                    table_len: table.map_or(0, ColorTable::len),
                },
            );
        }

        log::debug!(
            "frame {index}: {width}x{height} at ({}, {}), {} compressed bytes, {color_table_source:?} palette",
            image_descriptor.left,
            image_descriptor.top,
            blocks.data.len(),
        );

        let frame = Frame {
            index,
            graphic_control,
            extensions,
            image_descriptor,
            local_color_table,
            min_code_size,
            compressed_data: blocks.data,
            indices: lzw.indices,
            pixels: resolved.pixels,
            color_table_source,
        };
        let offsets = track.then(|| FrameOffsets {
            span: Span::new(start, end),
            graphic_control: graphic_control.map(|_| graphic_control_offsets(start)),
            extensions: extension_offsets,
            image_descriptor: image_descriptor_offsets(descriptor_start),
            local_color_table: local_color_table_span,
            image_data: ImageDataOffsets {
                span: Span::new(image_data_start, end),
                min_code_size: Span::at(image_data_start, 1),
                data: sub_block_offsets,
            },
        });
        Ok(FrameOutcome::Decoded {
            frame: Box::new(frame),
            offsets,
            end,
        })
    }
}

/// Parse the fixed 8-byte graphic control extension at `start`.
fn parse_graphic_control(
    cursor: &ByteCursor<'_>,
    start: usize,
) -> Result<GraphicControlExtension, GifError> {
    let block = cursor.read_array::<GRAPHIC_CONTROL_LEN>(start)?;
    let gce = GraphicControlExtension {
        block_size: block[2],
        packed: GraphicControlPacked::from_byte(block[3]),
        delay: u16::from_le_bytes([block[4], block[5]]),
        transparent_color_index: block[6],
        terminator: block[7],
    };
    log::trace!("graphic control extension at {start}: {gce:?}");
    Ok(gce)
}

fn graphic_control_offsets(start: usize) -> GraphicControlOffsets {
    GraphicControlOffsets {
        span: Span::at(start, GRAPHIC_CONTROL_LEN),
        introducer: Span::at(start, 1),
        label: Span::at(start + 1, 1),
        block_size: Span::at(start + 2, 1),
        packed: Span::at(start + 3, 1),
        delay_time: Span::at(start + 4, 2),
        transparent_color_index: Span::at(start + 6, 1),
        terminator: Span::at(start + 7, 1),
    }
}

/// Parse the 10-byte image descriptor whose separator is at `start`.
fn parse_image_descriptor(
    cursor: &ByteCursor<'_>,
    start: usize,
) -> Result<ImageDescriptor, GifError> {
    cursor.read_bytes(start, IMAGE_DESCRIPTOR_LEN)?;
    let descriptor = ImageDescriptor {
        left: cursor.read_u16_le(start + 1)?,
        top: cursor.read_u16_le(start + 3)?,
        width: cursor.read_u16_le(start + 5)?,
        height: cursor.read_u16_le(start + 7)?,
        packed: ImageDescriptorPacked::from_byte(cursor.read_u8(start + 9)?),
    };
    log::trace!("image descriptor at {start}: {descriptor:?}");
    Ok(descriptor)
}

fn image_descriptor_offsets(start: usize) -> ImageDescriptorOffsets {
    ImageDescriptorOffsets {
        span: Span::at(start, IMAGE_DESCRIPTOR_LEN),
        separator: Span::at(start, 1),
        left: Span::at(start + 1, 2),
        top: Span::at(start + 3, 2),
        width: Span::at(start + 5, 2),
        height: Span::at(start + 7, 2),
        packed: Span::at(start + 9, 1),
    }
}

struct ResolvedPixels {
    pixels: Vec<Pixel>,
    /// First out-of-range index and how many pixels were out of range.
    out_of_range: Option<(u8, usize)>,
}

/// Map palette indices to pixels. The transparent index wins over the table;
/// indices past the end of the table become [`MISSING_COLOR`].
fn resolve_pixels(indices: &[u8], table: Option<&ColorTable>, transparent: Option<u8>) -> ResolvedPixels {
    let mut out_of_range: Option<(u8, usize)> = None;
    let pixels = indices
        .iter()
        .map(|&index| {
            if Some(index) == transparent {
                return Pixel::Transparent;
            }
            match table.and_then(|t| t.get(usize::from(index))) {
                Some(color) => Pixel::Color(color),
                None => {
                    match &mut out_of_range {
                        Some((_, count)) => *count += 1,
                        None => out_of_range = Some((index, 1)),
                    }
                    Pixel::Color(MISSING_COLOR)
                }
            }
        })
        .collect();
    ResolvedPixels {
        pixels,
        out_of_range,
    }
}
