//! The decoded GIF tree.
//!
//! Everything here is built once by [`crate::DecodeRequest::decode`] and is
//! read-only afterwards. A [`Document`] owns all of its data, so it is `Send`
//! and `Sync` and can be shared freely.

use alloc::string::String;
use alloc::vec::Vec;

use crate::color::ColorTable;
use crate::error::DecodeWarning;
use crate::gif::packed::{GraphicControlPacked, ImageDescriptorPacked, ScreenPacked};
use crate::offsets::DocumentOffsets;
use crate::pixel::{ColorTableSource, Pixel};

/// GIF version from the 6-byte header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Version {
    Gif87a,
    Gif89a,
    /// Any other three version bytes.
    Unknown([u8; 3]),
}

impl Version {
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        match &bytes {
            b"87a" => Self::Gif87a,
            b"89a" => Self::Gif89a,
            _ => Self::Unknown(bytes),
        }
    }

    pub fn as_bytes(&self) -> [u8; 3] {
        match self {
            Self::Gif87a => *b"87a",
            Self::Gif89a => *b"89a",
            Self::Unknown(b) => *b,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub signature: [u8; 3],
    pub version: Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogicalScreenDescriptor {
    pub width: u16,
    pub height: u16,
    pub packed: ScreenPacked,
    pub background_color_index: u8,
    /// Raw aspect byte; see [`Self::pixel_aspect_ratio`].
    pub pixel_aspect_ratio_raw: u8,
}

impl LogicalScreenDescriptor {
    /// `(raw + 15) / 64`, or 0.0 when the raw byte is 0 (unspecified).
    pub fn pixel_aspect_ratio(&self) -> f32 {
        pixel_aspect_ratio(self.pixel_aspect_ratio_raw)
    }
}

pub(crate) fn pixel_aspect_ratio(raw: u8) -> f32 {
    if raw == 0 {
        0.0
    } else {
        (f32::from(raw) + 15.0) / 64.0
    }
}

/// Per-frame timing, disposal and transparency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphicControlExtension {
    pub block_size: u8,
    pub packed: GraphicControlPacked,
    /// Raw delay in hundredths of a second.
    pub delay: u16,
    /// Only meaningful when `packed.transparent_color_flag` is set.
    pub transparent_color_index: u8,
    pub terminator: u8,
}

impl GraphicControlExtension {
    /// Delay in milliseconds (raw value × 10).
    pub fn delay_ms(&self) -> u32 {
        u32::from(self.delay) * 10
    }

    pub fn transparent_index(&self) -> Option<u8> {
        self.packed
            .transparent_color_flag
            .then_some(self.transparent_color_index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub packed: ImageDescriptorPacked,
}

impl ImageDescriptor {
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Plain text extension (label 0x01). The payload includes the 12-byte text
/// grid header as stored in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlainTextExtension {
    pub data: Vec<u8>,
}

impl PlainTextExtension {
    pub fn text(&self) -> String {
        latin1(&self.data)
    }
}

/// Comment extension (label 0xFE).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentExtension {
    pub data: Vec<u8>,
}

impl CommentExtension {
    pub fn text(&self) -> String {
        latin1(&self.data)
    }
}

/// Application extension (label 0xFF), e.g. the `NETSCAPE2.0` loop block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationExtension {
    pub block_size: u8,
    /// Identifier and authentication code, normally 8 + 3 bytes.
    pub identifier: Vec<u8>,
    /// Concatenated sub-block payload after the identifier block.
    pub data: Vec<u8>,
    /// Animation loop count (0 = forever) from a NETSCAPE-style payload.
    pub loop_count: Option<u16>,
}

impl ApplicationExtension {
    /// The 8-byte application identifier, e.g. `NETSCAPE`.
    pub fn application_identifier(&self) -> &[u8] {
        &self.identifier[..self.identifier.len().min(8)]
    }

    /// The authentication code following the identifier, e.g. `2.0`.
    pub fn authentication_code(&self) -> &[u8] {
        self.identifier.get(8..).unwrap_or(&[])
    }

    pub fn identifier_text(&self) -> String {
        latin1(&self.identifier)
    }
}

/// One char per byte, so every payload has a text view.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Extensions attached to a document or a frame; a later occurrence of a
/// kind replaces the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    pub text: Option<PlainTextExtension>,
    pub comment: Option<CommentExtension>,
    pub application: Option<ApplicationExtension>,
}

impl ExtensionSet {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.comment.is_none() && self.application.is_none()
    }
}

/// One decoded image of the stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub(crate) index: usize,
    pub(crate) graphic_control: Option<GraphicControlExtension>,
    pub(crate) extensions: ExtensionSet,
    pub(crate) image_descriptor: ImageDescriptor,
    pub(crate) local_color_table: Option<ColorTable>,
    pub(crate) min_code_size: u8,
    pub(crate) compressed_data: Vec<u8>,
    pub(crate) indices: Vec<u8>,
    pub(crate) pixels: Vec<Pixel>,
    pub(crate) color_table_source: ColorTableSource,
}

impl Frame {
    /// Position of this frame in stream order, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn graphic_control(&self) -> Option<&GraphicControlExtension> {
        self.graphic_control.as_ref()
    }

    /// Extensions found between the graphic control extension and the image
    /// descriptor.
    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn image_descriptor(&self) -> &ImageDescriptor {
        &self.image_descriptor
    }

    /// `(left, top, width, height)` on the logical screen.
    pub fn dimensions(&self) -> (u16, u16, u16, u16) {
        let d = &self.image_descriptor;
        (d.left, d.top, d.width, d.height)
    }

    pub fn width(&self) -> u16 {
        self.image_descriptor.width
    }

    pub fn height(&self) -> u16 {
        self.image_descriptor.height
    }

    pub fn local_color_table(&self) -> Option<&ColorTable> {
        self.local_color_table.as_ref()
    }

    pub fn color_table_source(&self) -> ColorTableSource {
        self.color_table_source
    }

    /// Transparent palette index, if the graphic control extension sets one.
    pub fn transparent_color_index(&self) -> Option<u8> {
        self.graphic_control.and_then(|g| g.transparent_index())
    }

    pub fn delay_ms(&self) -> Option<u32> {
        self.graphic_control.map(|g| g.delay_ms())
    }

    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }

    /// LZW-compressed image data with sub-block framing removed.
    pub fn compressed_data(&self) -> &[u8] {
        &self.compressed_data
    }

    /// Palette indices produced by LZW, `width * height` long.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Resolved pixels in row-major order, `width * height` long.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Frame pixels as RGBA8; transparent pixels have alpha 0.
    #[cfg(feature = "rgb")]
    pub fn to_rgba8(&self) -> Vec<rgb::RGBA8> {
        self.pixels.iter().map(|p| rgb::RGBA8::from(*p)).collect()
    }

    /// Frame pixels as an [`imgref::ImgVec`] of RGBA8.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGBA8> {
        imgref::ImgVec::new(
            self.to_rgba8(),
            usize::from(self.width()),
            usize::from(self.height()),
        )
    }
}

/// A fully decoded GIF stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub(crate) byte_len: usize,
    pub(crate) header: Header,
    pub(crate) screen_descriptor: LogicalScreenDescriptor,
    pub(crate) global_color_table: Option<ColorTable>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) extensions: ExtensionSet,
    pub(crate) trailer: bool,
    pub(crate) warnings: Vec<DecodeWarning>,
    pub(crate) offsets: Option<DocumentOffsets>,
}

impl Document {
    /// Size of the decoded input buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn version(&self) -> Version {
        self.header.version
    }

    pub fn screen_descriptor(&self) -> &LogicalScreenDescriptor {
        &self.screen_descriptor
    }

    /// Logical screen `(width, height)`.
    pub fn dimensions(&self) -> (u16, u16) {
        (self.screen_descriptor.width, self.screen_descriptor.height)
    }

    pub fn global_color_table(&self) -> Option<&ColorTable> {
        self.global_color_table.as_ref()
    }

    /// Frames in stream order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Top-level text, comment and application extensions (last one of
    /// each kind).
    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Loop count from a top-level application extension.
    pub fn loop_count(&self) -> Option<u16> {
        self.extensions.application.as_ref()?.loop_count
    }

    /// Whether the stream ended with the 0x3B trailer.
    pub fn trailer(&self) -> bool {
        self.trailer
    }

    /// Recoverable anomalies, in the order they were found.
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Byte provenance, present when the decode was run with
    /// [`crate::DecodeRequest::with_offsets`].
    pub fn offsets(&self) -> Option<&DocumentOffsets> {
        self.offsets.as_ref()
    }
}
