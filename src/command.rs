//! Host-invoked image commands.
//!
//! A host looks up its active image itself and passes it to
//! [`ImageCommand::run`] together with the channel it uses to show errors to
//! the user. Commands validate the pixel type first and leave the image
//! untouched when it is not the one they handle.
//!
//! # Usage
//!
//! ```
//! use cast16::{CastToGray16, ImageCommand, ImageHandle, PixelType};
//!
//! let mut image = ImageHandle::from_gray_f32(vec![-5.0, 0.0, 100.25, 100.75, 65535.0, 70000.0], 3, 2)?;
//! let mut errors: Vec<String> = Vec::new();
//! CastToGray16::new().run(&mut image, &mut errors)?;
//!
//! assert_eq!(image.pixel_type(), PixelType::Gray16);
//! assert!(errors.is_empty());
//! # Ok::<(), cast16::ImageError>(())
//! ```

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::convert::CastOptions;
use crate::error::ImageError;
use crate::image::ImageHandle;
use crate::pixel::{PixelData, PixelType};
use crate::window_level::{HistogramSample, WindowLevelOptions};

/// The host's user-facing error channel.
///
/// # Object safety
///
/// This trait is object-safe. Commands take `&mut dyn ErrorReporter`.
pub trait ErrorReporter {
    /// Show `message` to the user.
    fn error(&mut self, message: &str);
}

/// Collects messages, for hosts that display them later.
impl ErrorReporter for Vec<String> {
    fn error(&mut self, message: &str) {
        self.push(String::from(message));
    }
}

/// Discards messages.
impl ErrorReporter for () {
    fn error(&mut self, _message: &str) {}
}

/// An operation a host can run on an image.
pub trait ImageCommand {
    /// Name shown in the host's menus and in error messages.
    fn name(&self) -> &'static str;

    /// The one pixel type this command accepts.
    fn accepts(&self) -> PixelType;

    /// Whether `pixel_type` can be passed to [`run`](Self::run).
    fn supports(&self, pixel_type: PixelType) -> bool {
        pixel_type == self.accepts()
    }

    /// Run on `image`, reporting user-facing errors to `reporter`.
    fn run(
        &self,
        image: &mut ImageHandle,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<(), ImageError>;
}

/// Reject `image` unless it has the command's pixel type.
///
/// The rejection is reported to the user as well as returned.
fn require_type(
    command: &dyn ImageCommand,
    image: &ImageHandle,
    reporter: &mut dyn ErrorReporter,
) -> Result<(), ImageError> {
    let found = image.pixel_type();
    let expected = command.accepts();
    if found == expected {
        return Ok(());
    }
    log::warn!("{}: rejected {found} image", command.name());
    reporter.error(&format!(
        "{} only supports {expected} images, not {found}",
        command.name()
    ));
    Err(ImageError::UnsupportedImageType { found, expected })
}

/// Replace a 32-bit float grayscale image with a 16-bit one.
///
/// Samples are clamped to `[0, 65535]` and rounded half up. The image keeps
/// its dimensions and its color model (the same `Arc`).
#[derive(Clone, Copy, Debug, Default)]
pub struct CastToGray16 {
    options: CastOptions,
}

impl CastToGray16 {
    /// Command with default conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Command with explicit conversion options.
    pub fn with_options(options: CastOptions) -> Self {
        Self { options }
    }

    /// The conversion options in use.
    pub fn options(&self) -> &CastOptions {
        &self.options
    }
}

impl ImageCommand for CastToGray16 {
    fn name(&self) -> &'static str {
        "Cast to 16-bit"
    }

    fn accepts(&self) -> PixelType {
        PixelType::GrayF32
    }

    fn run(
        &self,
        image: &mut ImageHandle,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<(), ImageError> {
        require_type(self, image, reporter)?;
        let Some(src) = image.pixels().as_gray_f32() else {
            return Err(ImageError::UnsupportedImageType {
                found: image.pixel_type(),
                expected: self.accepts(),
            });
        };
        let converted = self.options.cast_image(src.as_ref())?;
        let color_model = image.color_model().map(Arc::clone);
        image.replace_pixels(PixelData::Gray16(converted), color_model);
        Ok(())
    }
}

/// Set the display range of a 16-bit grayscale image from its histogram.
///
/// Pixels are not modified; only the display range changes. The window is
/// computed in rescaled units and mapped back to raw sample values through
/// the options' intercept and slope. When the histogram has no populated bin
/// or the window is 1 or narrower, the display range is left as it was.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoWindowLevel {
    options: WindowLevelOptions,
}

impl AutoWindowLevel {
    /// Command with default histogram settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Command with explicit histogram settings.
    pub fn with_options(options: WindowLevelOptions) -> Self {
        Self { options }
    }
}

impl ImageCommand for AutoWindowLevel {
    fn name(&self) -> &'static str {
        "Auto Window/Level"
    }

    fn accepts(&self) -> PixelType {
        PixelType::Gray16
    }

    fn run(
        &self,
        image: &mut ImageHandle,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<(), ImageError> {
        require_type(self, image, reporter)?;
        let Some(img) = image.pixels().as_gray16() else {
            return Err(ImageError::UnsupportedImageType {
                found: image.pixel_type(),
                expected: self.accepts(),
            });
        };
        let samples: Vec<u16> = img
            .rows()
            .flat_map(|row| row.iter().map(|p| p.value()))
            .collect();
        let (min, max) = u16::range();
        let (intercept, slope) = (self.options.intercept, self.options.slope);
        let range = self
            .options
            .compute(&samples)
            .and_then(|wl| wl.to_raw(intercept, slope))
            .and_then(|wl| wl.clip_range(min, max));
        if let Some((lo, hi)) = range {
            image.set_display_range(f64::from(lo), f64::from(hi));
        }
        Ok(())
    }
}
