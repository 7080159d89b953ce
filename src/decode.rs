use enough::Stop;

use crate::document::Document;
use crate::error::GifError;
use crate::gif::{self, ParseOptions};
use crate::limits::Limits;

/// What to do with an extension whose label is none of plain text (0x01),
/// graphic control (0xF9), comment (0xFE) or application (0xFF).
///
/// A graphic control extension that appears after a frame's first one is
/// handled by this policy too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnknownExtensionPolicy {
    /// Record a warning and stop reading blocks. Frames decoded so far are
    /// kept; the document has no trailer.
    #[default]
    Stop,
    /// Record a warning and skip the block as a generic sub-block sequence.
    SkipSubBlocks,
    /// Fail the decode with [`GifError::UnknownExtensionLabel`].
    Error,
}

/// A pending decode of one GIF buffer.
///
/// Consumed by [`decode`](Self::decode), which hands back the immutable
/// [`Document`]. Decoding the same bytes again with the same settings yields
/// an equal document.
///
/// ```
/// use zengif::{DecodeRequest, Unstoppable};
///
/// let gif: &[u8] = &[
///     b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0x80, 0, 0,
///     0, 0, 0, 255, 255, 255,
///     0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0,
///     2, 2, 0x4C, 0x01, 0,
///     0x3B,
/// ];
/// let doc = DecodeRequest::new(gif).with_offsets(true).decode(Unstoppable)?;
/// assert_eq!(doc.frames().len(), 1);
/// assert!(doc.offsets().is_some());
/// # Ok::<(), zengif::GifError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    offsets: bool,
    unknown_extensions: UnknownExtensionPolicy,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            offsets: false,
            unknown_extensions: UnknownExtensionPolicy::default(),
        }
    }

    /// Apply resource limits to the canvas, every frame and the frame count.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Record the byte span of every parsed field in
    /// [`Document::offsets`]. Off by default.
    pub fn with_offsets(mut self, enabled: bool) -> Self {
        self.offsets = enabled;
        self
    }

    pub fn with_unknown_extensions(mut self, policy: UnknownExtensionPolicy) -> Self {
        self.unknown_extensions = policy;
        self
    }

    /// Run the decode. `stop` is polled before every top-level block and
    /// before each frame's LZW pass.
    pub fn decode(self, stop: impl Stop) -> Result<Document, GifError> {
        let options = ParseOptions {
            limits: self.limits,
            track_offsets: self.offsets,
            unknown_extensions: self.unknown_extensions,
        };
        gif::parse_document(self.data, &options, &stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::{StopReason, Unstoppable};

    const ONE_PIXEL: &[u8] = &[
        b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0x80, 0, 0, //
        0, 0, 0, 255, 255, 255, //
        0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0, //
        2, 2, 0x4C, 0x01, 0, //
        0x3B,
    ];

    struct AlwaysStop;

    impl Stop for AlwaysStop {
        fn check(&self) -> Result<(), StopReason> {
            Err(StopReason::Cancelled)
        }
    }

    #[test]
    fn defaults() {
        let request = DecodeRequest::new(ONE_PIXEL);
        assert!(request.limits.is_none());
        assert!(!request.offsets);
        assert_eq!(request.unknown_extensions, UnknownExtensionPolicy::Stop);
    }

    #[test]
    fn decoding_twice_gives_equal_documents() {
        let a = DecodeRequest::new(ONE_PIXEL).decode(Unstoppable).unwrap();
        let b = DecodeRequest::new(ONE_PIXEL).decode(Unstoppable).unwrap();
        assert_eq!(a, b);
        assert!(a.trailer());
        assert!(a.offsets().is_none());
    }

    #[test]
    fn cancellation_is_reported() {
        let result = DecodeRequest::new(ONE_PIXEL).decode(AlwaysStop);
        assert!(matches!(result, Err(GifError::Cancelled(_))));
    }

    #[test]
    fn limits_apply() {
        let limits = Limits {
            max_pixels: Some(0),
            ..Limits::default()
        };
        let result = DecodeRequest::new(ONE_PIXEL)
            .with_limits(&limits)
            .decode(Unstoppable);
        assert!(matches!(result, Err(GifError::LimitExceeded(_))));
    }
}
