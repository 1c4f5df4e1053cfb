//! Decoded image handle and the decode pipeline.
//!
//! `signature + IHDR -> IDAT assembly -> inflate -> defilter`. Every stage
//! hands the next one an owned buffer or an error; whatever a failing call
//! allocated is dropped before it returns, and the handle only ever owns
//! the final pixel buffer.

use alloc::vec::Vec;

use crate::error::{DecodeError, Stage};
use crate::filter::defilter;
use crate::header::{ImageDescriptor, PixelFormat, parse_header};
use crate::inflate::{Inflate, InflateError};
use crate::options::DecodeOptions;
use crate::payload::collect_idat;

/// A decoded (or failed) PNG.
///
/// Pixel data is row-major, `stride()` bytes per row with no filter
/// bytes. Sub-byte formats stay bit-packed MSB-first as on the wire;
/// 16-bit samples are big-endian.
#[derive(Debug)]
pub struct ImageHandle {
    descriptor: Option<ImageDescriptor>,
    pixels: Option<Vec<u8>>,
    state: Result<(), DecodeError>,
}

impl Default for ImageHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageHandle {
    /// Empty handle; nothing decoded, no error recorded.
    pub const fn new() -> Self {
        Self {
            descriptor: None,
            pixels: None,
            state: Ok(()),
        }
    }

    /// Parse only the signature and IHDR. Drops any previously decoded
    /// pixels.
    pub fn read_header(&mut self, data: &[u8]) -> Result<ImageDescriptor, DecodeError> {
        self.pixels = None;
        self.descriptor = None;
        let result = parse_header(data).map(|(descriptor, _)| descriptor);
        match result {
            Ok(descriptor) => {
                self.descriptor = Some(descriptor);
                self.state = Ok(());
            }
            Err(err) => self.record(err),
        }
        result
    }

    /// Run the full pipeline on `data`, replacing whatever the handle held.
    ///
    /// On failure the handle keeps the descriptor if IHDR was readable,
    /// owns no pixel buffer, and reports the error via [`last_error`].
    ///
    /// [`last_error`]: ImageHandle::last_error
    pub fn decode_into<I>(
        &mut self,
        data: &[u8],
        options: &DecodeOptions,
        inflater: &mut I,
    ) -> Result<(), DecodeError>
    where
        I: Inflate + ?Sized,
    {
        self.pixels = None;
        self.descriptor = None;
        match self.run(data, options, inflater) {
            Ok(pixels) => {
                self.pixels = Some(pixels);
                self.state = Ok(());
            }
            Err(err) => self.record(err),
        }
        self.state
    }

    fn run<I>(
        &mut self,
        data: &[u8],
        options: &DecodeOptions,
        inflater: &mut I,
    ) -> Result<Vec<u8>, DecodeError>
    where
        I: Inflate + ?Sized,
    {
        options.validate()?;

        let (desc, next) = parse_header(data)?;
        self.descriptor = Some(desc);

        if desc.pixel_count() > options.max_pixels {
            log::debug!(
                "png: {}x{} exceeds pixel limit {}",
                desc.width,
                desc.height,
                options.max_pixels
            );
            return Err(DecodeError::OutOfMemory);
        }
        let raw_len = desc.raw_len().ok_or(DecodeError::OutOfMemory)?;

        let idat = collect_idat(data, next)?;

        let mut raw = Vec::new();
        raw.try_reserve_exact(raw_len)
            .map_err(|_| DecodeError::OutOfMemory)?;
        raw.resize(raw_len, 0u8);

        let produced = inflater.inflate(&idat, &mut raw).map_err(|err| {
            log::debug!("png: {}", err);
            match err {
                InflateError::OutOfMemory => DecodeError::OutOfMemory,
                _ => DecodeError::malformed(Stage::Decompress),
            }
        })?;
        drop(idat);

        if produced != raw_len {
            log::debug!("png: inflated {} bytes, expected {}", produced, raw_len);
            return Err(DecodeError::malformed(Stage::Decompress));
        }

        defilter(raw, &desc)
    }

    fn record(&mut self, err: DecodeError) {
        log::debug!("{}", err);
        self.pixels = None;
        self.state = Err(err);
    }

    pub fn descriptor(&self) -> Option<&ImageDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.width)
    }

    pub fn height(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.height)
    }

    pub fn format(&self) -> Option<PixelFormat> {
        self.descriptor.map(|d| d.format)
    }

    pub fn bit_depth(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.format.bit_depth())
    }

    pub fn components(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.format.components())
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.bits_per_pixel)
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.descriptor.map_or(0, |d| d.bytes_per_pixel)
    }

    /// Bytes per row of the pixel buffer.
    pub fn stride(&self) -> usize {
        self.descriptor
            .and_then(|d| d.scanline_bytes())
            .unwrap_or(0)
    }

    /// Length of the pixel buffer; 0 unless decoded.
    pub fn size(&self) -> usize {
        self.pixels.as_ref().map_or(0, |p| p.len())
    }

    /// Decoded pixels; `None` unless the last decode succeeded.
    pub fn pixel_buffer(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.pixel_buffer()?.get(start..start + stride)
    }

    pub fn is_decoded(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn last_error(&self) -> Option<DecodeError> {
        self.state.err()
    }

    /// Take ownership of the pixel buffer.
    pub fn into_pixels(self) -> Option<Vec<u8>> {
        self.pixels
    }
}

/// Decode with explicit options and decompressor.
pub fn decode_with<I>(
    data: &[u8],
    options: &DecodeOptions,
    inflater: &mut I,
) -> Result<ImageHandle, DecodeError>
where
    I: Inflate + ?Sized,
{
    let mut handle = ImageHandle::new();
    handle.decode_into(data, options, inflater)?;
    Ok(handle)
}

/// Decode with default options and the built-in zlib inflater.
#[cfg(feature = "zlib")]
pub fn decode(data: &[u8]) -> Result<ImageHandle, DecodeError> {
    decode_with(data, &DecodeOptions::default(), &mut crate::inflate::ZlibInflater)
}
