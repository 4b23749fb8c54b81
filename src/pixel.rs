//! Typed pixel buffer definitions.
//!
//! Uses `imgref::ImgVec` for 2D pixel data with typed pixels from the `rgb` crate.
//! [`PixelType`] is the bare tag; [`PixelData`] carries the buffer.

use imgref::ImgVec;
use rgb::{Gray, Rgb};

/// Pixel representation tag of a host image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum PixelType {
    /// 8-bit unsigned grayscale.
    Gray8 = 0,
    /// 16-bit unsigned grayscale.
    Gray16 = 1,
    /// 32-bit floating point grayscale.
    GrayF32 = 2,
    /// 8-bit palette indices, displayed through a color model.
    Indexed8 = 3,
    /// 8-bit RGB.
    Rgb8 = 4,
}

impl PixelType {
    /// Short human-readable name, used in user-facing messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray8 => "8-bit grayscale",
            Self::Gray16 => "16-bit grayscale",
            Self::GrayF32 => "32-bit float grayscale",
            Self::Indexed8 => "8-bit indexed color",
            Self::Rgb8 => "RGB color",
        }
    }

    /// Bytes per pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 | Self::Indexed8 => 1,
            Self::Gray16 => 2,
            Self::GrayF32 => 4,
            Self::Rgb8 => 3,
        }
    }
}

impl core::fmt::Display for PixelType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel data of a host image in a typed buffer.
///
/// The variant determines both the pixel format and precision.
/// Width and height are embedded in the `ImgVec`.
#[non_exhaustive]
pub enum PixelData {
    Gray8(ImgVec<Gray<u8>>),
    Gray16(ImgVec<Gray<u16>>),
    GrayF32(ImgVec<Gray<f32>>),
    /// Palette indices. Only meaningful together with a
    /// [`ColorModel`](crate::ColorModel).
    Indexed8(ImgVec<u8>),
    Rgb8(ImgVec<Rgb<u8>>),
}

impl PixelData {
    /// The representation tag of this buffer.
    pub fn pixel_type(&self) -> PixelType {
        match self {
            PixelData::Gray8(_) => PixelType::Gray8,
            PixelData::Gray16(_) => PixelType::Gray16,
            PixelData::GrayF32(_) => PixelType::GrayF32,
            PixelData::Indexed8(_) => PixelType::Indexed8,
            PixelData::Rgb8(_) => PixelType::Rgb8,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        match self {
            PixelData::Gray8(img) => img.width(),
            PixelData::Gray16(img) => img.width(),
            PixelData::GrayF32(img) => img.width(),
            PixelData::Indexed8(img) => img.width(),
            PixelData::Rgb8(img) => img.width(),
        }
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        match self {
            PixelData::Gray8(img) => img.height(),
            PixelData::Gray16(img) => img.height(),
            PixelData::GrayF32(img) => img.height(),
            PixelData::Indexed8(img) => img.height(),
            PixelData::Rgb8(img) => img.height(),
        }
    }

    /// Whether this is a single-channel grayscale buffer.
    pub fn is_grayscale(&self) -> bool {
        matches!(
            self,
            PixelData::Gray8(_) | PixelData::Gray16(_) | PixelData::GrayF32(_)
        )
    }

    /// Borrow the float grayscale buffer, if that is the representation.
    pub fn as_gray_f32(&self) -> Option<&ImgVec<Gray<f32>>> {
        match self {
            PixelData::GrayF32(img) => Some(img),
            _ => None,
        }
    }

    /// Borrow the 16-bit grayscale buffer, if that is the representation.
    pub fn as_gray16(&self) -> Option<&ImgVec<Gray<u16>>> {
        match self {
            PixelData::Gray16(img) => Some(img),
            _ => None,
        }
    }

    /// Mutably borrow the 16-bit grayscale buffer.
    pub fn as_gray16_mut(&mut self) -> Option<&mut ImgVec<Gray<u16>>> {
        match self {
            PixelData::Gray16(img) => Some(img),
            _ => None,
        }
    }
}

impl core::fmt::Debug for PixelData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let variant = match self {
            PixelData::Gray8(_) => "Gray8",
            PixelData::Gray16(_) => "Gray16",
            PixelData::GrayF32(_) => "GrayF32",
            PixelData::Indexed8(_) => "Indexed8",
            PixelData::Rgb8(_) => "Rgb8",
        };
        write!(
            f,
            "PixelData::{}({}x{})",
            variant,
            self.width(),
            self.height()
        )
    }
}
