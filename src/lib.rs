//! Float32 to 16-bit grayscale conversion for image viewers.
//!
//! The core is a single elementwise transform:
//!
//! - [`cast_to_u16`] / [`CastOptions`] — clamp each `f32` sample to
//!   `[0, 65535]` and round it half up into a new `u16` buffer
//! - [`auto_window_level`] / [`WindowLevelOptions`] — histogram-based display
//!   window and level for 16-bit data, with [`rebin_in_place`] and
//!   [`offset_to_zero`] for preparing clipped intensities
//!
//! Around it sits the boundary a host application talks to:
//!
//! - [`ImageHandle`] — the host's image: [`PixelData`], [`ColorModel`],
//!   display range
//! - [`ImageCommand`] — explicit entry point, implemented by
//!   [`CastToGray16`] and [`AutoWindowLevel`]
//! - [`ErrorReporter`] — the host's user-facing error channel
//! - [`ImageError`] / [`CastLimits`] — failures and output size caps
//!
//! Nothing here holds state between calls; every function may run
//! concurrently on independent buffers.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod color;
mod command;
mod convert;
mod error;
mod image;
mod limits;
mod pixel;
mod window_level;

pub use color::{ColorModel, LUT_SIZE};
pub use command::{AutoWindowLevel, CastToGray16, ErrorReporter, ImageCommand};
pub use convert::{CastOptions, NanPolicy, U16_MAX_F64, cast_sample, cast_to_u16, clamp_sample};
pub use error::ImageError;
pub use image::ImageHandle;
pub use limits::{CastLimits, LimitExceeded, OUTPUT_SAMPLE_BYTES};
pub use pixel::{PixelData, PixelType};
pub use window_level::{
    HistogramSample, WindowLevel, WindowLevelOptions, auto_window_level, offset_to_zero,
    rebin_in_place,
};

// Re-exports for hosts building images.
pub use imgref::{Img, ImgRef, ImgRefMut, ImgVec};
pub use rgb;
pub use rgb::{Gray, Rgb};
