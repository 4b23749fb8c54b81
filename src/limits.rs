//! Size caps for conversions.
//!
//! A conversion allocates one `u16` per pixel. [`CastLimits`] bounds that
//! allocation by pixel count and by output size in bytes; the check runs
//! before anything is allocated.

use core::mem::size_of;

/// Bytes per output sample.
pub const OUTPUT_SAMPLE_BYTES: u64 = size_of::<u16>() as u64;

/// Caps on the output of a conversion. `None` means unbounded.
///
/// # Example
///
/// ```
/// use cast16::CastLimits;
///
/// let limits = CastLimits::none().with_max_output_bytes(32 * 1024 * 1024);
/// assert!(limits.check(4096, 4096).is_ok());
/// assert!(limits.check(8192, 4096).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CastLimits {
    /// Maximum `width × height`.
    pub max_pixels: Option<u64>,
    /// Maximum size of the output buffer in bytes.
    pub max_output_bytes: Option<u64>,
}

impl CastLimits {
    /// Unbounded.
    pub fn none() -> Self {
        Self::default()
    }

    /// Cap `width × height`.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Cap the output buffer size.
    pub fn with_max_output_bytes(mut self, max: u64) -> Self {
        self.max_output_bytes = Some(max);
        self
    }

    /// Output size in bytes for a `width × height` conversion, saturating.
    pub fn output_bytes(width: u64, height: u64) -> u64 {
        width
            .saturating_mul(height)
            .saturating_mul(OUTPUT_SAMPLE_BYTES)
    }

    /// Check a `width × height` conversion against the caps.
    pub fn check(&self, width: u64, height: u64) -> Result<(), LimitExceeded> {
        let pixels = width.saturating_mul(height);
        match self.max_pixels {
            Some(max) if pixels > max => {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    max,
                });
            }
            _ => {}
        }
        let bytes = Self::output_bytes(width, height);
        match self.max_output_bytes {
            Some(max) if bytes > max => Err(LimitExceeded::OutputBytes { actual: bytes, max }),
            _ => Ok(()),
        }
    }
}

/// A conversion would exceed one of the [`CastLimits`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Too many pixels.
    Pixels {
        /// `width × height` of the rejected conversion.
        actual: u64,
        /// Configured cap.
        max: u64,
    },
    /// Output buffer too large.
    OutputBytes {
        /// Bytes the output would take.
        actual: u64,
        /// Configured cap.
        max: u64,
    },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pixels { actual, max } => write!(f, "{actual} pixels, at most {max} allowed"),
            Self::OutputBytes { actual, max } => {
                write!(f, "output of {actual} bytes, at most {max} allowed")
            }
        }
    }
}

impl core::error::Error for LimitExceeded {}
