// Decode error taxonomy; closed, one variant per failure class.
// Malformed carries the pipeline phase so callers can tell where
// a broken file gave out without a source line number.

use core::fmt;

/// Pipeline phase a failure was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SignatureCheck,
    HeaderParse,
    ChunkScan,
    Decompress,
    Defilter,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::SignatureCheck => write!(f, "signature check"),
            Stage::HeaderParse => write!(f, "header parse"),
            Stage::ChunkScan => write!(f, "chunk scan"),
            Stage::Decompress => write!(f, "decompress"),
            Stage::Defilter => write!(f, "defilter"),
        }
    }
}

/// Why a decode failed.
///
/// `Malformed` means the file is broken; `UnsupportedFormat` and
/// `UnsupportedInterlace` mean the file is valid PNG but outside what
/// this decoder handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeError {
    /// Input does not start with the PNG signature.
    NotAPng,
    /// Container or data is corrupt at the given stage.
    Malformed { stage: Stage },
    /// Colour type / bit depth pair not handled (includes all palette images).
    UnsupportedFormat,
    /// Adam7 interlaced image.
    UnsupportedInterlace,
    /// An allocation failed, or the image is larger than the configured budget.
    OutOfMemory,
    /// Caller-supplied configuration is unusable.
    InvalidArgument,
}

impl DecodeError {
    pub const fn malformed(stage: Stage) -> Self {
        DecodeError::Malformed { stage }
    }

    /// Phase the error is attributed to, where one applies.
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            DecodeError::NotAPng => Some(Stage::SignatureCheck),
            DecodeError::Malformed { stage } => Some(*stage),
            DecodeError::UnsupportedFormat | DecodeError::UnsupportedInterlace => {
                Some(Stage::HeaderParse)
            }
            DecodeError::OutOfMemory | DecodeError::InvalidArgument => None,
        }
    }

    /// The input is not a usable PNG file.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, DecodeError::NotAPng | DecodeError::Malformed { .. })
    }

    /// The input is a valid PNG this decoder chooses not to handle.
    pub const fn is_unsupported(&self) -> bool {
        matches!(
            self,
            DecodeError::UnsupportedFormat | DecodeError::UnsupportedInterlace
        )
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotAPng => write!(f, "png: invalid signature"),
            DecodeError::Malformed { stage } => write!(f, "png: malformed data during {}", stage),
            DecodeError::UnsupportedFormat => write!(f, "png: unsupported colour type / bit depth"),
            DecodeError::UnsupportedInterlace => write!(f, "png: interlaced PNGs not supported"),
            DecodeError::OutOfMemory => write!(f, "png: out of memory"),
            DecodeError::InvalidArgument => write!(f, "png: invalid argument"),
        }
    }
}

impl core::error::Error for DecodeError {}
