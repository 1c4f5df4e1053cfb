//! zlib decompression seam.
//!
//! The decoder never links a decompressor directly; it is handed an
//! [`Inflate`] implementation. [`ZlibInflater`] (feature `zlib`) wraps
//! `miniz_oxide`; tests and firmware can pass their own, including a plain
//! closure.

use core::fmt;

/// Failure reported by an [`Inflate`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateError {
    /// Stream is not valid zlib/DEFLATE (bad header, codes or checksum).
    Corrupt,
    /// Stream ended before the final block.
    Truncated,
    /// Stream holds more data than the output buffer.
    OutputOverflow,
    /// Decompressor could not allocate its working state.
    OutOfMemory,
}

impl fmt::Display for InflateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InflateError::Corrupt => write!(f, "inflate: corrupt stream"),
            InflateError::Truncated => write!(f, "inflate: truncated stream"),
            InflateError::OutputOverflow => write!(f, "inflate: output buffer too small"),
            InflateError::OutOfMemory => write!(f, "inflate: out of memory"),
        }
    }
}

impl core::error::Error for InflateError {}

/// A zlib decompressor.
///
/// `output` is exactly as long as the decoder expects the inflated data
/// to be; implementations return how many bytes they wrote.
pub trait Inflate {
    fn inflate(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, InflateError>;
}

impl<F> Inflate for F
where
    F: FnMut(&[u8], &mut [u8]) -> Result<usize, InflateError>,
{
    fn inflate(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, InflateError> {
        self(input, output)
    }
}

/// One-shot zlib inflater backed by `miniz_oxide`.
///
/// Decompressor state (~11KB) is heap-allocated per call and freed on
/// return; the output slice doubles as the LZ dictionary.
#[cfg(feature = "zlib")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ZlibInflater;

#[cfg(feature = "zlib")]
impl ZlibInflater {
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(feature = "zlib")]
impl Inflate for ZlibInflater {
    fn inflate(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, InflateError> {
        use alloc::boxed::Box;
        use miniz_oxide::inflate::TINFLStatus;
        use miniz_oxide::inflate::core::{DecompressorOxide, decompress, inflate_flags};

        // zeroed state, allocated fallibly
        let layout = core::alloc::Layout::new::<DecompressorOxide>();
        let ptr = unsafe { alloc::alloc::alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(InflateError::OutOfMemory);
        }
        // all-zero is the decompressor's initial state
        let mut decomp = unsafe { Box::from_raw(ptr as *mut DecompressorOxide) };

        let flags = inflate_flags::TINFL_FLAG_PARSE_ZLIB_HEADER
            | inflate_flags::TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF;

        let (status, consumed, produced) = decompress(&mut *decomp, input, output, 0, flags);

        match status {
            TINFLStatus::Done => {
                if consumed < input.len() {
                    log::debug!("inflate: {} trailing bytes after zlib stream", input.len() - consumed);
                }
                Ok(produced)
            }
            TINFLStatus::NeedsMoreInput | TINFLStatus::FailedCannotMakeProgress => {
                Err(InflateError::Truncated)
            }
            TINFLStatus::HasMoreOutput => Err(InflateError::OutputOverflow),
            _ => Err(InflateError::Corrupt),
        }
    }
}
