// Signature + IHDR validation and pixel-format derivation.
// Colour types: 0=greyscale, 2=RGB, 4=grey+alpha, 6=RGBA.
// Palette (3) and Adam7 are rejected as unsupported rather than malformed.

use crate::chunk::{CHUNK_IHDR, ChunkScanner, PNG_SIG, be_u32};
use crate::error::{DecodeError, Stage};

const COLOR_GREYSCALE: u8 = 0;
const COLOR_RGB: u8 = 2;
const COLOR_PALETTE: u8 = 3;
const COLOR_GREY_ALPHA: u8 = 4;
const COLOR_RGBA: u8 = 6;

const IHDR_LEN: usize = 13;

const INTERLACE_NONE: u8 = 0;
const INTERLACE_ADAM7: u8 = 1;

/// Sample layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Luminance1,
    Luminance2,
    Luminance4,
    Luminance8,
    Luminance16,
    LuminanceAlpha1,
    LuminanceAlpha2,
    LuminanceAlpha4,
    LuminanceAlpha8,
    LuminanceAlpha16,
    Rgb8,
    Rgb16,
    Rgba8,
    Rgba16,
}

impl PixelFormat {
    /// Map an IHDR colour type / bit depth pair; `None` if unsupported.
    pub const fn from_ihdr(color_type: u8, bit_depth: u8) -> Option<Self> {
        use PixelFormat::*;
        let format = match (color_type, bit_depth) {
            (COLOR_GREYSCALE, 1) => Luminance1,
            (COLOR_GREYSCALE, 2) => Luminance2,
            (COLOR_GREYSCALE, 4) => Luminance4,
            (COLOR_GREYSCALE, 8) => Luminance8,
            (COLOR_GREYSCALE, 16) => Luminance16,
            (COLOR_RGB, 8) => Rgb8,
            (COLOR_RGB, 16) => Rgb16,
            (COLOR_GREY_ALPHA, 1) => LuminanceAlpha1,
            (COLOR_GREY_ALPHA, 2) => LuminanceAlpha2,
            (COLOR_GREY_ALPHA, 4) => LuminanceAlpha4,
            (COLOR_GREY_ALPHA, 8) => LuminanceAlpha8,
            (COLOR_GREY_ALPHA, 16) => LuminanceAlpha16,
            (COLOR_RGBA, 8) => Rgba8,
            (COLOR_RGBA, 16) => Rgba16,
            _ => return None,
        };
        Some(format)
    }

    pub const fn components(&self) -> u32 {
        use PixelFormat::*;
        match self {
            Luminance1 | Luminance2 | Luminance4 | Luminance8 | Luminance16 => 1,
            LuminanceAlpha1 | LuminanceAlpha2 | LuminanceAlpha4 | LuminanceAlpha8
            | LuminanceAlpha16 => 2,
            Rgb8 | Rgb16 => 3,
            Rgba8 | Rgba16 => 4,
        }
    }

    pub const fn bit_depth(&self) -> u32 {
        use PixelFormat::*;
        match self {
            Luminance1 | LuminanceAlpha1 => 1,
            Luminance2 | LuminanceAlpha2 => 2,
            Luminance4 | LuminanceAlpha4 => 4,
            Luminance8 | LuminanceAlpha8 | Rgb8 | Rgba8 => 8,
            Luminance16 | LuminanceAlpha16 | Rgb16 | Rgba16 => 16,
        }
    }

    /// PNG colour type byte this format is stored as.
    pub const fn color_type(&self) -> u8 {
        match self.components() {
            1 => COLOR_GREYSCALE,
            2 => COLOR_GREY_ALPHA,
            3 => COLOR_RGB,
            _ => COLOR_RGBA,
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self.components(), 2 | 4)
    }

    pub const fn bits_per_pixel(&self) -> u32 {
        self.bit_depth() * self.components()
    }

    /// Whole bytes per pixel, rounded up; 1 for sub-byte formats.
    pub const fn bytes_per_pixel(&self) -> u32 {
        self.bits_per_pixel().div_ceil(8)
    }
}

/// Image geometry and format taken from IHDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub bits_per_pixel: u32,
    pub bytes_per_pixel: u32,
}

impl ImageDescriptor {
    pub const fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            bits_per_pixel: format.bits_per_pixel(),
            bytes_per_pixel: format.bytes_per_pixel(),
        }
    }

    // byte length of one unfiltered row (without the leading filter byte)
    pub fn scanline_bytes(&self) -> Option<usize> {
        let bits = (self.width as usize).checked_mul(self.bits_per_pixel as usize)?;
        Some(bits.div_ceil(8))
    }

    /// Inflated size: every row plus its filter-type byte.
    pub fn raw_len(&self) -> Option<usize> {
        self.scanline_bytes()?
            .checked_add(1)?
            .checked_mul(self.height as usize)
    }

    /// Size of the defiltered pixel buffer.
    pub fn pixel_len(&self) -> Option<usize> {
        self.scanline_bytes()?.checked_mul(self.height as usize)
    }

    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Parse the signature and IHDR; returns the descriptor and the offset of
/// the chunk following IHDR.
pub fn parse_header(data: &[u8]) -> Result<(ImageDescriptor, usize), DecodeError> {
    if data.len() < PNG_SIG.len() || data[..PNG_SIG.len()] != PNG_SIG {
        return Err(DecodeError::NotAPng);
    }

    let mut chunks = ChunkScanner::after_signature(data);
    let ihdr = match chunks.next() {
        Some(chunk) => chunk?,
        None => {
            log::debug!("png: no chunks after signature");
            return Err(DecodeError::malformed(Stage::HeaderParse));
        }
    };
    if !ihdr.is(CHUNK_IHDR) || ihdr.payload_len() != IHDR_LEN {
        return Err(DecodeError::malformed(Stage::HeaderParse));
    }

    let cdata = ihdr.payload(data);
    let width = be_u32(cdata, 0);
    let height = be_u32(cdata, 4);
    let bit_depth = cdata[8];
    let color_type = cdata[9];
    let compression = cdata[10];
    let filter = cdata[11];
    let interlace = cdata[12];

    if width == 0 || height == 0 {
        log::debug!("png: zero dimensions {}x{}", width, height);
        return Err(DecodeError::malformed(Stage::HeaderParse));
    }
    if compression != 0 || filter != 0 {
        log::debug!("png: bad methods compression={} filter={}", compression, filter);
        return Err(DecodeError::malformed(Stage::HeaderParse));
    }
    match interlace {
        INTERLACE_NONE => {}
        INTERLACE_ADAM7 => return Err(DecodeError::UnsupportedInterlace),
        _ => return Err(DecodeError::malformed(Stage::HeaderParse)),
    }

    if color_type == COLOR_PALETTE {
        log::debug!("png: palette image rejected");
        return Err(DecodeError::UnsupportedFormat);
    }
    let format =
        PixelFormat::from_ihdr(color_type, bit_depth).ok_or(DecodeError::UnsupportedFormat)?;

    log::debug!(
        "png: {}x{} {:?} ({} bpp)",
        width,
        height,
        format,
        format.bits_per_pixel()
    );

    Ok((ImageDescriptor::new(width, height, format), chunks.position()))
}

/// Validate the header without touching the image data.
pub fn read_header(data: &[u8]) -> Result<ImageDescriptor, DecodeError> {
    parse_header(data).map(|(descriptor, _)| descriptor)
}
