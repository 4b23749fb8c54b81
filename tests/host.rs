//! Host-side use of the commands: parallel conversions, error wrapping,
//! untouched images on rejection.

use std::sync::Arc;

use cast16::{
    CastToGray16, ColorModel, Gray, ImageCommand, ImageError, ImageHandle, ImgVec, PixelData,
    PixelType, Rgb, cast_sample, cast_to_u16,
};
use rayon::prelude::*;

#[derive(Debug, thiserror::Error)]
enum ViewerError {
    #[error("command failed: {0}")]
    Command(#[from] ImageError),
}

fn open_and_cast(image: &mut ImageHandle) -> Result<(), ViewerError> {
    let mut messages: Vec<String> = Vec::new();
    CastToGray16::new().run(image, &mut messages)?;
    Ok(())
}

#[test]
fn parallel_conversions_do_not_interfere() {
    let buffers: Vec<Vec<f32>> = (0..64)
        .map(|seed| (0..1024).map(|i| (seed * 1000 + i) as f32 - 0.25).collect())
        .collect();

    let converted: Vec<Vec<u16>> = buffers
        .par_iter()
        .map(|buf| cast_to_u16(buf, 32, 32).unwrap())
        .collect();

    for (input, output) in buffers.iter().zip(&converted) {
        assert_eq!(input.len(), output.len());
        for (&v, &o) in input.iter().zip(output) {
            assert_eq!(o, cast_sample(v));
        }
    }
}

#[test]
fn every_output_in_range() {
    let input: Vec<f32> = (-2000..2000)
        .map(|i| i as f32 * 37.3)
        .chain([f32::NAN, f32::INFINITY, f32::NEG_INFINITY, f32::MIN, f32::MAX])
        .collect();
    let out = cast_to_u16(&input, input.len(), 1).unwrap();
    assert_eq!(out.len(), input.len());
    for (&v, &o) in input.iter().zip(&out) {
        if v.is_finite() && v >= 0.0 && v <= 65535.0 {
            assert!((f64::from(o) - f64::from(v)).abs() <= 0.5, "{v} -> {o}");
        }
    }
}

#[test]
fn errors_wrap_into_caller_types() {
    let mut image = ImageHandle::new(PixelData::Gray8(ImgVec::new(vec![Gray::new(3u8); 6], 3, 2)));
    let err = open_and_cast(&mut image).unwrap_err();
    assert_eq!(
        err.to_string(),
        "command failed: unsupported image type 8-bit grayscale, expected 32-bit float grayscale"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn rejected_image_keeps_buffer_and_color_model() {
    let cm = Arc::new(ColorModel::grayscale());
    let pixels = vec![Rgb { r: 10u8, g: 20, b: 30 }; 6];
    let ptr = pixels.as_ptr();
    let mut image = ImageHandle::new(PixelData::Rgb8(ImgVec::new(pixels, 3, 2)))
        .with_color_model(cm.clone())
        .with_display_range(0.0, 255.0);

    let mut messages: Vec<String> = Vec::new();
    let err = CastToGray16::new()
        .run(&mut image, &mut messages)
        .unwrap_err();

    assert!(matches!(err, ImageError::UnsupportedImageType { found: PixelType::Rgb8, .. }));
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Cast to 16-bit"));
    let PixelData::Rgb8(img) = image.pixels() else {
        panic!("pixels replaced");
    };
    assert_eq!(img.buf().as_ptr(), ptr);
    assert!(img.buf().iter().all(|p| *p == Rgb { r: 10, g: 20, b: 30 }));
    assert!(Arc::ptr_eq(image.color_model().unwrap(), &cm));
    assert_eq!(image.display_range(), Some((0.0, 255.0)));
}

#[test]
fn converted_image_is_row_major() {
    let (w, h) = (5usize, 4usize);
    let data: Vec<f32> = (0..w * h).map(|i| (i as f32) * 1.5).collect();
    let mut image = ImageHandle::from_gray_f32(data.clone(), w, h).unwrap();
    open_and_cast(&mut image).unwrap();

    let img = image.pixels().as_gray16().unwrap();
    for (y, row) in img.rows().enumerate() {
        for (x, px) in row.iter().enumerate() {
            assert_eq!(px.value(), cast_sample(data[y * w + x]));
        }
    }
}
