//! Host image handle.
//!
//! [`ImageHandle`] is the image a host passes to a command: the pixel data, the
//! color model it is displayed through, and the display range. Commands
//! replace the pixel representation through [`ImageHandle::replace_pixels`].

use alloc::sync::Arc;
use alloc::vec::Vec;

use imgref::ImgVec;
use rgb::Gray;

use crate::color::ColorModel;
use crate::convert::check_dimensions;
use crate::error::ImageError;
use crate::pixel::{PixelData, PixelType};

/// An image owned by the host.
#[derive(Debug)]
pub struct ImageHandle {
    pixels: PixelData,
    color_model: Option<Arc<ColorModel>>,
    display_range: Option<(f64, f64)>,
}

impl ImageHandle {
    /// Wrap pixel data with no color model and the default display range.
    pub fn new(pixels: PixelData) -> Self {
        Self {
            pixels,
            color_model: None,
            display_range: None,
        }
    }

    /// Wrap a row-major float buffer as a `GrayF32` image.
    ///
    /// Fails with [`ImageError::InvalidDimensions`] when `width × height`
    /// does not equal `data.len()` or either dimension is zero.
    pub fn from_gray_f32(data: Vec<f32>, width: usize, height: usize) -> Result<Self, ImageError> {
        check_dimensions(data.len(), width, height)?;
        let buf = data.into_iter().map(Gray::new).collect();
        Ok(Self::new(PixelData::GrayF32(ImgVec::new(buf, width, height))))
    }

    /// Attach a color model.
    pub fn with_color_model(mut self, color_model: Arc<ColorModel>) -> Self {
        self.color_model = Some(color_model);
        self
    }

    /// Set the display range.
    pub fn with_display_range(mut self, min: f64, max: f64) -> Self {
        self.display_range = Some((min, max));
        self
    }

    /// Representation tag of the current pixel data.
    pub fn pixel_type(&self) -> PixelType {
        self.pixels.pixel_type()
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Current pixel data.
    pub fn pixels(&self) -> &PixelData {
        &self.pixels
    }

    /// Mutable access to the current pixel data.
    pub fn pixels_mut(&mut self) -> &mut PixelData {
        &mut self.pixels
    }

    /// Color model the image is displayed through, if any.
    pub fn color_model(&self) -> Option<&Arc<ColorModel>> {
        self.color_model.as_ref()
    }

    /// Sample values mapped to the ends of the lookup table, if set.
    ///
    /// `None` means the host picks a default for the pixel type.
    pub fn display_range(&self) -> Option<(f64, f64)> {
        self.display_range
    }

    /// Set the display range.
    pub fn set_display_range(&mut self, min: f64, max: f64) {
        self.display_range = Some((min, max));
    }

    /// Install a new pixel representation and color model, returning the old pixels.
    ///
    /// The display range is cleared, since it was expressed in the old
    /// representation's sample values.
    pub fn replace_pixels(
        &mut self,
        pixels: PixelData,
        color_model: Option<Arc<ColorModel>>,
    ) -> PixelData {
        self.color_model = color_model;
        self.display_range = None;
        core::mem::replace(&mut self.pixels, pixels)
    }
}
