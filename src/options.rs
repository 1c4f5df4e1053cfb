// Decode configuration.
// The pixel budget is a memory guard checked straight after IHDR, before
// any image-sized allocation is attempted.

use crate::error::DecodeError;

/// Default cap on `width * height` (4096 x 4096).
pub const DEFAULT_MAX_PIXELS: u64 = 4096 * 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Images with more pixels than this fail with `OutOfMemory`.
    pub max_pixels: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeOptions {
    pub const fn new() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    pub const fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DecodeError> {
        if self.max_pixels == 0 {
            return Err(DecodeError::InvalidArgument);
        }
        Ok(())
    }
}
