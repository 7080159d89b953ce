//! Byte provenance for every parsed field.
//!
//! Produced only when [`crate::DecodeRequest::with_offsets`] is enabled. Every
//! [`Span`] is a half-open range into the decoded buffer, so the same input
//! always yields the same tree.

use alloc::vec::Vec;
use core::ops::Range;

/// Half-open byte range `start..end` in the source buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of `len` bytes starting at `start`.
    pub const fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderOffsets {
    pub span: Span,
    pub signature: Span,
    pub version: Span,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenDescriptorOffsets {
    pub span: Span,
    pub width: Span,
    pub height: Span,
    pub packed: Span,
    pub background_color_index: Span,
    pub pixel_aspect_ratio: Span,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphicControlOffsets {
    pub span: Span,
    pub introducer: Span,
    pub label: Span,
    pub block_size: Span,
    pub packed: Span,
    pub delay_time: Span,
    pub transparent_color_index: Span,
    pub terminator: Span,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageDescriptorOffsets {
    pub span: Span,
    pub separator: Span,
    pub left: Span,
    pub top: Span,
    pub width: Span,
    pub height: Span,
    pub packed: Span,
}

/// Offsets of a sub-block sequence: the length-prefixed blocks and the
/// zero-length terminator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubBlockOffsets {
    /// From the first length byte through the terminator.
    pub span: Span,
    pub terminator: Span,
}

/// Offsets of a plain-text or comment extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtensionOffsets {
    pub span: Span,
    pub introducer: Span,
    pub label: Span,
    pub data: SubBlockOffsets,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplicationOffsets {
    pub span: Span,
    pub introducer: Span,
    pub label: Span,
    pub block_size: Span,
    pub identifier: Span,
    pub data: SubBlockOffsets,
    /// The two loop-count bytes, when the payload carries a loop count.
    pub loop_count: Option<Span>,
}

/// Offsets of the extensions kept for one container (document or frame).
/// Last occurrence of each kind wins, as in the decoded tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtensionSetOffsets {
    pub text: Option<ExtensionOffsets>,
    pub comment: Option<ExtensionOffsets>,
    pub application: Option<ApplicationOffsets>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageDataOffsets {
    pub span: Span,
    pub min_code_size: Span,
    pub data: SubBlockOffsets,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOffsets {
    /// From the graphic control extension (or the image separator) through
    /// the image data terminator.
    pub span: Span,
    pub graphic_control: Option<GraphicControlOffsets>,
    pub extensions: ExtensionSetOffsets,
    pub image_descriptor: ImageDescriptorOffsets,
    pub local_color_table: Option<Span>,
    pub image_data: ImageDataOffsets,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentOffsets {
    /// From byte 0 through the last consumed byte (including the trailer).
    pub span: Span,
    pub header: HeaderOffsets,
    pub screen_descriptor: ScreenDescriptorOffsets,
    pub global_color_table: Option<Span>,
    pub frames: Vec<FrameOffsets>,
    pub extensions: ExtensionSetOffsets,
    pub trailer: Option<Span>,
}
