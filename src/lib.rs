// smol-png: minimal no_std PNG decoder for bundled firmware image assets.
// chunk:   bounds-checked chunk walker (CRCs read, not verified)
// header:  signature + IHDR validation, pixel format derivation
// payload: IDAT concatenation up to IEND
// inflate: injected zlib decompressor; miniz_oxide-backed default
// filter:  None/Sub/Up/Average/Paeth reconstruction, in place
// image:   ImageHandle, decode pipeline and accessors
// pixel:   sample / luma access over bit-packed rows
// draw:    embedded-graphics Gray8 adapter (feature "embedded-graphics")
//
// Non-interlaced greyscale, grey+alpha, RGB and RGBA at 1-16 bits.
// Palette and Adam7 images are rejected as unsupported.

#![no_std]

extern crate alloc;

pub mod chunk;
pub mod error;
pub mod filter;
pub mod header;
pub mod image;
pub mod inflate;
pub mod options;
pub mod payload;
mod pixel;

#[cfg(feature = "embedded-graphics")]
pub mod draw;

#[cfg(test)]
mod testutil;

pub use error::{DecodeError, Stage};
pub use header::{ImageDescriptor, PixelFormat, read_header};
pub use image::{ImageHandle, decode_with};
pub use inflate::{Inflate, InflateError};
pub use options::DecodeOptions;

#[cfg(feature = "zlib")]
pub use image::decode;
#[cfg(feature = "zlib")]
pub use inflate::ZlibInflater;

#[cfg(feature = "embedded-graphics")]
pub use draw::Gray8Image;
