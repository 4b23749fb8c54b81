//! Float32 to unsigned 16-bit grayscale conversion.
//!
//! Every sample is widened to `f64`, clamped to `[0, 65535]` and rounded by
//! adding 0.5 and truncating toward zero. This is not round-half-to-even:
//! 2.5 becomes 3 and 3.5 becomes 4.
//!
//! The transform is elementwise and position-preserving. Output index `i`
//! always comes from input index `i`.

use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};
use rgb::Gray;

use crate::error::ImageError;
use crate::limits::CastLimits;

/// Largest value representable in the output.
pub const U16_MAX_F64: f64 = u16::MAX as f64;

/// What a NaN sample becomes.
///
/// NaN compares false against both clamp bounds, so it needs an explicit rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NanPolicy {
    /// NaN becomes 0.
    #[default]
    Zero,
    /// NaN becomes the given value.
    Value(u16),
}

/// Conversion settings.
///
/// `CastOptions::default()` is the plain clamp-and-round transform with NaN
/// mapped to 0 and no dimension limits.
///
/// # Example
///
/// ```
/// use cast16::{CastLimits, CastOptions, NanPolicy};
///
/// let opts = CastOptions::new()
///     .with_nan_policy(NanPolicy::Value(u16::MAX))
///     .with_limits(CastLimits::none().with_max_pixels(16_000_000));
/// let out = opts.cast_slice(&[f32::NAN, 1.5], 2, 1).unwrap();
/// assert_eq!(out, [65535, 2]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CastOptions {
    /// NaN handling.
    pub nan: NanPolicy,
    /// Dimension limits checked before allocating the output.
    pub limits: CastLimits,
}

impl CastOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the NaN policy.
    pub fn with_nan_policy(mut self, nan: NanPolicy) -> Self {
        self.nan = nan;
        self
    }

    /// Set dimension limits.
    pub fn with_limits(mut self, limits: CastLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Convert one sample.
    #[inline]
    pub fn cast_sample(&self, value: f32) -> u16 {
        if value.is_nan() {
            return match self.nan {
                NanPolicy::Zero => 0,
                NanPolicy::Value(v) => v,
            };
        }
        // At most 65535.5 here, which truncates to 65535.
        (clamp_sample(f64::from(value)) + 0.5) as u16
    }

    /// Convert a row-major buffer of `width × height` samples.
    ///
    /// Fails with [`ImageError::InvalidDimensions`] if either dimension is
    /// zero or the product does not equal `input.len()`, and with
    /// [`ImageError::Limit`] if a limit is exceeded. Nothing is allocated on
    /// failure.
    pub fn cast_slice(
        &self,
        input: &[f32],
        width: usize,
        height: usize,
    ) -> Result<Vec<u16>, ImageError> {
        check_dimensions(input.len(), width, height)?;
        self.limits.check(width as u64, height as u64)?;
        log::debug!("casting {width}x{height} float samples to u16");
        Ok(input.iter().map(|&v| self.cast_sample(v)).collect())
    }

    /// Convert a typed float image.
    ///
    /// Strided inputs are walked row by row; the output is always contiguous
    /// with the same width and height.
    pub fn cast_image(
        &self,
        img: ImgRef<'_, Gray<f32>>,
    ) -> Result<ImgVec<Gray<u16>>, ImageError> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions {
                width,
                height,
                len: img.buf().len(),
            });
        }
        self.limits.check(width as u64, height as u64)?;
        log::debug!("casting {width}x{height} float image to 16-bit gray");
        let mut out = Vec::with_capacity(width * height);
        for row in img.rows() {
            out.extend(row.iter().map(|p| Gray::new(self.cast_sample(p.value()))));
        }
        Ok(ImgVec::new(out, width, height))
    }
}

/// Clamp to `[0, 65535]`.
///
/// Values already inside the range are returned unchanged. NaN passes through.
#[inline]
pub fn clamp_sample(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else if value > U16_MAX_F64 {
        U16_MAX_F64
    } else {
        value
    }
}

/// Convert one sample with the default NaN policy (NaN becomes 0).
#[inline]
pub fn cast_sample(value: f32) -> u16 {
    CastOptions::default().cast_sample(value)
}

/// Convert a row-major `width × height` float buffer to a new u16 buffer.
///
/// ```
/// let out = cast16::cast_to_u16(&[-5.0, 0.0, 100.25, 100.75, 65535.0, 70000.0], 3, 2).unwrap();
/// assert_eq!(out, [0, 0, 100, 101, 65535, 65535]);
/// ```
pub fn cast_to_u16(input: &[f32], width: usize, height: usize) -> Result<Vec<u16>, ImageError> {
    CastOptions::default().cast_slice(input, width, height)
}

/// Require `width > 0`, `height > 0` and `width × height == len`.
pub(crate) fn check_dimensions(len: usize, width: usize, height: usize) -> Result<(), ImageError> {
    let valid = width > 0 && height > 0 && width.checked_mul(height) == Some(len);
    if valid {
        Ok(())
    } else {
        Err(ImageError::InvalidDimensions { width, height, len })
    }
}
