// Scanline unfiltering.
// Rows are reconstructed strictly top-to-bottom, bytes left-to-right: every
// predictor reads only bytes that are already reconstructed. The raw
// buffer is compacted in place (row y moves back by y+1 bytes) so the
// pixel buffer reuses the inflate allocation.

use alloc::vec::Vec;

use crate::error::{DecodeError, Stage};
use crate::header::ImageDescriptor;

/// Per-scanline filter type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterType {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

impl TryFrom<u8> for FilterType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FilterType::None),
            1 => Ok(FilterType::Sub),
            2 => Ok(FilterType::Up),
            3 => Ok(FilterType::Average),
            4 => Ok(FilterType::Paeth),
            _ => Err(DecodeError::malformed(Stage::Defilter)),
        }
    }
}

/// Reconstruct one scanline in place.
///
/// `prev` is the reconstructed row above, or `None` for the first row
/// (treated as all zeroes). `bpp` is the filter stride in bytes.
pub fn unfilter_row(filter: FilterType, row: &mut [u8], prev: Option<&[u8]>, bpp: usize) {
    let len = row.len();
    match (filter, prev) {
        (FilterType::None, _) => {}
        (FilterType::Sub, _) => {
            for i in bpp..len {
                row[i] = row[i].wrapping_add(row[i - bpp]);
            }
        }
        (FilterType::Up, None) => {}
        (FilterType::Up, Some(prev)) => {
            for i in 0..len {
                row[i] = row[i].wrapping_add(prev[i]);
            }
        }
        (FilterType::Average, None) => {
            for i in bpp..len {
                row[i] = row[i].wrapping_add(row[i - bpp] / 2);
            }
        }
        (FilterType::Average, Some(prev)) => {
            for i in 0..len {
                let a = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let b = prev[i] as u16;
                row[i] = row[i].wrapping_add(((a + b) / 2) as u8);
            }
        }
        // with no row above Paeth always picks the left neighbour
        (FilterType::Paeth, None) => {
            for i in bpp..len {
                row[i] = row[i].wrapping_add(row[i - bpp]);
            }
        }
        (FilterType::Paeth, Some(prev)) => {
            for i in 0..len {
                let a = if i >= bpp { row[i - bpp] } else { 0 };
                let b = prev[i];
                let c = if i >= bpp { prev[i - bpp] } else { 0 };
                row[i] = row[i].wrapping_add(paeth(a, b, c));
            }
        }
    }
}

/// Paeth predictor: whichever of left, above, upper-left is closest to
/// `a + b - c`; ties prefer `a`, then `b`.
#[inline]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a = a as i16;
    let b = b as i16;
    let c = c as i16;
    let p = a + b - c;
    let pa = (p - a).unsigned_abs();
    let pb = (p - b).unsigned_abs();
    let pc = (p - c).unsigned_abs();
    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

/// Turn the inflated, filter-tagged buffer into the final pixel buffer of
/// `scanline_bytes * height` bytes.
///
/// The returned `Vec` is the input allocation, truncated: its capacity
/// stays at `raw_len`, one spare byte per row. Shrinking would mean an
/// infallible reallocation.
pub fn defilter(mut raw: Vec<u8>, desc: &ImageDescriptor) -> Result<Vec<u8>, DecodeError> {
    let sizes = (desc.scanline_bytes(), desc.raw_len(), desc.pixel_len());
    let (Some(stride), Some(expected), Some(out_len)) = sizes else {
        return Err(DecodeError::OutOfMemory);
    };
    if raw.len() != expected {
        log::debug!("png: raw length {} != expected {}", raw.len(), expected);
        return Err(DecodeError::malformed(Stage::Defilter));
    }

    let bpp = desc.bytes_per_pixel as usize;

    for y in 0..desc.height as usize {
        let src = y * (stride + 1);
        let filter = FilterType::try_from(raw[src]).inspect_err(|_| {
            log::debug!("png: bad filter type {} on row {}", raw[src], y);
        })?;

        let dst = y * stride;
        raw.copy_within(src + 1..src + 1 + stride, dst);

        let (done, rest) = raw.split_at_mut(dst);
        let prev = if y == 0 { None } else { Some(&done[dst - stride..]) };
        unfilter_row(filter, &mut rest[..stride], prev, bpp);
    }

    raw.truncate(out_len);
    Ok(raw)
}
