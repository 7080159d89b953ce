//! # zengif
//!
//! GIF87a / GIF89a decoder that keeps the whole block structure.
//!
//! Decoding yields a [`Document`]: header, logical screen descriptor, color
//! tables, top-level extensions, and every frame with its graphic control
//! extension, image descriptor, raw compressed data, LZW-decoded palette
//! indices and resolved [`Pixel`]s. Optionally the byte span of every field
//! is recorded as well (see [`offsets`]).
//!
//! ## Malformed input
//!
//! Structural damage (short buffer, bad signature, a block cut off mid-way)
//! is an error. Damage inside a block's content is recovered and reported as
//! a [`DecodeWarning`] on the document:
//!
//! - a bad or short LZW stream pads the frame with index 0
//! - palette indices past the end of the table resolve to [`MISSING_COLOR`]
//! - a stream that ends without the `0x3B` trailer keeps what was decoded
//!
//! ## Non-Goals
//!
//! - Encoding
//! - Interlaced row reordering (rows stay in stream order)
//! - Frame compositing / disposal rendering
//!
//! ## Usage
//!
//! ```no_run
//! use zengif::{DecodeRequest, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your GIF bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.version);
//!
//! let doc = DecodeRequest::new(data)
//!     .with_offsets(true)
//!     .decode(Unstoppable)?;
//! for frame in doc.frames() {
//!     println!("frame {}: {:?} ms", frame.index(), frame.delay_ms());
//! }
//! for warning in doc.warnings() {
//!     eprintln!("{warning}");
//! }
//! # Ok::<(), zengif::GifError>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod color;
mod decode;
mod document;
mod error;
mod gif;
mod info;
mod limits;
pub mod offsets;
mod pixel;

// Re-exports
pub use color::{Color, ColorTable, MISSING_COLOR, color_table_len};
pub use decode::{DecodeRequest, UnknownExtensionPolicy};
pub use document::{
    ApplicationExtension, CommentExtension, Document, ExtensionSet, Frame,
    GraphicControlExtension, Header, ImageDescriptor, LogicalScreenDescriptor,
    PlainTextExtension, Version,
};
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeWarning, GifError, LzwFailure};
pub use gif::packed::{DisposalMethod, GraphicControlPacked, ImageDescriptorPacked, ScreenPacked};
pub use info::{ImageInfo, probe};
pub use limits::Limits;
pub use pixel::{ColorTableSource, Pixel};

/// Decode `data` with default settings: no limits, no offsets, unknown
/// extensions stop the block loop.
///
/// A few bytes can declare a 65535x65535 frame, so untrusted input should go
/// through [`DecodeRequest::with_limits`] instead.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<Document, GifError> {
    DecodeRequest::new(data).decode(stop)
}
