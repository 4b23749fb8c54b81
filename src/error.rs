//! Errors returned by conversions and host commands.

use crate::limits::LimitExceeded;
use crate::pixel::PixelType;

/// Failure of a conversion or host command.
///
/// Implements [`core::error::Error`] so callers can wrap it in their own
/// error types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImageError {
    /// The image is not in the one representation the operation accepts.
    ///
    /// Raised before any work begins; the image is left untouched.
    UnsupportedImageType {
        /// Representation of the image that was passed in.
        found: PixelType,
        /// Representation the operation requires.
        expected: PixelType,
    },
    /// `width × height` does not match the buffer length, or a dimension is zero.
    InvalidDimensions {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
        /// Number of samples actually supplied.
        len: usize,
    },
    /// A configured dimension limit was exceeded.
    Limit(LimitExceeded),
}

impl core::fmt::Display for ImageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedImageType { found, expected } => {
                write!(f, "unsupported image type {found}, expected {expected}")
            }
            Self::InvalidDimensions { width, height, len } => write!(
                f,
                "invalid dimensions {width}x{height} for a buffer of {len} samples"
            ),
            Self::Limit(err) => write!(f, "limit exceeded: {err}"),
        }
    }
}

impl core::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Limit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LimitExceeded> for ImageError {
    fn from(err: LimitExceeded) -> Self {
        Self::Limit(err)
    }
}
