/// Resource limits for a decode.
///
/// All fields default to `None` (no limit). Canvas and frame dimensions are
/// both checked against the width/height/pixel bounds.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for one frame's decoded pixels.
    pub max_memory_bytes: Option<u64>,
    /// Maximum number of frames.
    pub max_frames: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), crate::GifError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(crate::GifError::LimitExceeded(alloc::format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(crate::GifError::LimitExceeded(alloc::format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(crate::GifError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), crate::GifError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(crate::GifError::LimitExceeded(alloc::format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }

    /// Check that decoding one more frame stays within the frame limit.
    pub(crate) fn check_frame_count(&self, frames: usize) -> Result<(), crate::GifError> {
        if let Some(max_frames) = self.max_frames {
            if frames as u64 >= max_frames {
                return Err(crate::GifError::LimitExceeded(alloc::format!(
                    "frame count exceeds limit {max_frames}"
                )));
            }
        }
        Ok(())
    }
}
