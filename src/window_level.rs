//! Automatic window/level from a 16-bit histogram.
//!
//! The level is the mean of the populated histogram bins and the window spans
//! the lowest to the highest of them. Bins holding only a few stray samples
//! (padding, burned-in text) are ignored, and a large gap between populated
//! bins either drops a small leading cluster or ends the walk.
//!
//! After clipping to the window, [`rebin_in_place`] and [`offset_to_zero`]
//! compress the remaining intensities and move them to start at 0.

use alloc::vec;

/// A 16-bit sample that can be binned into a 65536-entry histogram.
pub trait HistogramSample: Copy {
    /// Whether negative values exist. Signed bins are walked from the most
    /// negative value upward.
    const SIGNED: bool;

    /// Histogram bin (the raw 16-bit pattern).
    fn bin(self) -> u16;

    /// Numeric value.
    fn value(self) -> i32;

    /// Numeric value of a bin.
    fn bin_value(bin: u16) -> i32;

    /// Smallest and largest representable values.
    fn range() -> (i32, i32);
}

impl HistogramSample for u16 {
    const SIGNED: bool = false;

    #[inline]
    fn bin(self) -> u16 {
        self
    }
    #[inline]
    fn value(self) -> i32 {
        i32::from(self)
    }
    #[inline]
    fn bin_value(bin: u16) -> i32 {
        i32::from(bin)
    }
    fn range() -> (i32, i32) {
        (0, i32::from(u16::MAX))
    }
}

impl HistogramSample for i16 {
    const SIGNED: bool = true;

    #[inline]
    fn bin(self) -> u16 {
        self as u16
    }
    #[inline]
    fn value(self) -> i32 {
        i32::from(self)
    }
    #[inline]
    fn bin_value(bin: u16) -> i32 {
        i32::from(bin as i16)
    }
    fn range() -> (i32, i32) {
        (i32::from(i16::MIN), i32::from(i16::MAX))
    }
}

/// Settings for [`WindowLevelOptions::compute`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct WindowLevelOptions {
    /// Added to the level after scaling.
    pub intercept: f64,
    /// Multiplies the level and window.
    pub slope: f64,
    /// Sample value to leave out of the histogram.
    pub padding: Option<i32>,
    /// A bin is populated only when it holds more than this many samples.
    pub min_count: u32,
    /// Largest step between consecutive populated bins that is not a gap.
    pub max_gap: i32,
    /// Inclusive range; samples outside it are left out of the histogram.
    pub value_range: Option<(i32, i32)>,
}

impl Default for WindowLevelOptions {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            slope: 1.0,
            padding: None,
            min_count: 2,
            max_gap: 1000,
            value_range: None,
        }
    }
}

impl WindowLevelOptions {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rescale intercept and slope.
    pub fn with_rescale(mut self, intercept: f64, slope: f64) -> Self {
        self.intercept = intercept;
        self.slope = slope;
        self
    }

    /// Leave samples equal to `value` out of the histogram.
    pub fn with_padding(mut self, value: i32) -> Self {
        self.padding = Some(value);
        self
    }

    /// Set the populated-bin threshold.
    pub fn with_min_count(mut self, count: u32) -> Self {
        self.min_count = count;
        self
    }

    /// Set the gap size.
    pub fn with_max_gap(mut self, gap: i32) -> Self {
        self.max_gap = gap;
        self
    }

    /// Only count samples in `min..=max`.
    pub fn with_value_range(mut self, min: i32, max: i32) -> Self {
        self.value_range = Some((min, max));
        self
    }

    /// Compute window and level for `pixels`.
    ///
    /// Returns `None` for an empty slice and when no bin is populated.
    pub fn compute<T: HistogramSample>(&self, pixels: &[T]) -> Option<WindowLevel> {
        if pixels.is_empty() {
            return None;
        }

        let mut histogram = vec![0u32; 1 << 16];
        let mut populated: u32 = 0;
        for &px in pixels {
            let value = px.value();
            if self.padding == Some(value) {
                continue;
            }
            if let Some((min, max)) = self.value_range
                && (value < min || value > max)
            {
                continue;
            }
            let count = &mut histogram[usize::from(px.bin())];
            if *count == self.min_count {
                populated += 1;
            }
            *count = count.saturating_add(1);
        }

        let offset: u16 = if T::SIGNED { 0x8000 } else { 0 };
        let mut prev = if T::SIGNED { -i32::from(u16::MAX) } else { 0 };
        let (mut low, mut high) = (0, 0);
        let mut valid: u32 = 0;
        let mut sum: i64 = 0;

        for index in 0..=u16::MAX {
            let bin = index.wrapping_add(offset);
            if histogram[usize::from(bin)] <= self.min_count {
                continue;
            }
            let value = T::bin_value(bin);
            if value - prev > self.max_gap && valid > 0 {
                if valid * 100 / populated < 10 {
                    // Small leading cluster: start over from here.
                    valid = 0;
                    sum = 0;
                } else {
                    break;
                }
            }
            if valid == 0 {
                low = value;
            }
            valid += 1;
            sum += i64::from(value);
            prev = value;
            high = value;
        }

        if valid == 0 {
            log::debug!("window/level: no populated bins in {} samples", pixels.len());
            return None;
        }
        let mean = sum / i64::from(valid);
        // Truncation toward zero, saturating.
        let level = ((mean as f64) * self.slope) as i64 as f64 + self.intercept;
        let span = f64::from(high - low);
        let mut window = (span * self.slope) as i64 as f64;
        if window <= 0.0 {
            window = span;
        }
        log::debug!(
            "window/level over {} samples: {populated} populated bins, window={window} level={level}",
            pixels.len()
        );
        Some(WindowLevel { window, level })
    }
}

/// Display window (width of the shown intensity range) and level (its center).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowLevel {
    /// Width of the displayed range.
    pub window: f64,
    /// Center of the displayed range.
    pub level: f64,
}

impl WindowLevel {
    /// Map a window/level computed with `intercept` and `slope` back to raw
    /// sample units.
    ///
    /// `None` when `slope` is zero or not finite.
    pub fn to_raw(&self, intercept: f64, slope: f64) -> Option<WindowLevel> {
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        Some(WindowLevel {
            window: self.window / slope.abs(),
            level: (self.level - intercept) / slope,
        })
    }

    /// Inclusive sample range covered by the window, clamped to `min..=max`.
    ///
    /// `None` for a window of 1 or less (or NaN), which carries no usable range.
    pub fn clip_range(&self, min: i32, max: i32) -> Option<(i32, i32)> {
        if self.window.is_nan() || self.window <= 1.0 {
            return None;
        }
        let half = (self.window - 1.0) / 2.0;
        let lo = (self.level - 0.5 - half).max(f64::from(min));
        // One past the upper edge: the clip is inclusive of the last bin.
        let hi = (self.level - 0.5 + half + 1.0).min(f64::from(max));
        Some((lo as i32, hi as i32))
    }

    /// Clamp 16-bit pixels to the window in place.
    ///
    /// Leaves the pixels unchanged when [`clip_range`](Self::clip_range) is `None`.
    pub fn clip_in_place(&self, pixels: &mut [u16]) {
        let (min, max) = u16::range();
        let Some((lo, hi)) = self.clip_range(min, max) else {
            return;
        };
        let lo = lo.clamp(0, i32::from(u16::MAX)) as u16;
        let hi = hi.clamp(i32::from(lo), i32::from(u16::MAX)) as u16;
        for px in pixels {
            *px = (*px).clamp(lo, hi);
        }
    }
}

/// Spread the pixels over half as many intensity levels as they span.
///
/// With `min` and `max` the current extremes, each pixel becomes
/// `(px - min) / delta` truncated, where
/// `delta = (max - min) / ((max - min + 1) / 2)`. Flat input is left as is.
pub fn rebin_in_place(pixels: &mut [u16]) {
    let Some((min, max)) = extremes(pixels) else {
        return;
    };
    if min == max {
        return;
    }
    let span = f64::from(max - min);
    let bins = (span + 1.0) / 2.0;
    let delta = span / bins;
    for px in pixels {
        *px = (f64::from(*px - min) / delta) as u16;
    }
}

/// Shift the pixels down so the smallest becomes 0.
pub fn offset_to_zero(pixels: &mut [u16]) {
    let Some((min, _)) = extremes(pixels) else {
        return;
    };
    for px in pixels {
        *px -= min;
    }
}

fn extremes(pixels: &[u16]) -> Option<(u16, u16)> {
    let min = pixels.iter().copied().min()?;
    let max = pixels.iter().copied().max()?;
    Some((min, max))
}

/// Compute window and level with default options.
pub fn auto_window_level<T: HistogramSample>(pixels: &[T]) -> Option<WindowLevel> {
    WindowLevelOptions::default().compute(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn repeat(values: &[u16], times: usize) -> Vec<u16> {
        values
            .iter()
            .flat_map(|&v| core::iter::repeat_n(v, times))
            .collect()
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(auto_window_level::<u16>(&[]), None);
    }

    #[test]
    fn mean_and_span_of_populated_bins() {
        let pixels = repeat(&[100, 200, 300], 5);
        let wl = auto_window_level(&pixels).unwrap();
        assert_eq!(wl.level, 200.0);
        assert_eq!(wl.window, 200.0);
    }

    #[test]
    fn sparse_bins_are_ignored() {
        // 5000 appears only twice, not more than min_count.
        let mut pixels = repeat(&[100, 110, 120], 4);
        pixels.extend([5000, 5000]);
        let wl = auto_window_level(&pixels).unwrap();
        assert_eq!(wl.level, 110.0);
        assert_eq!(wl.window, 20.0);
    }

    #[test]
    fn gap_after_majority_stops_walk() {
        // 20 populated bins below 100, then one far away.
        let low: Vec<u16> = (0..20).collect();
        let mut pixels = repeat(&low, 3);
        pixels.extend(repeat(&[5000], 3));
        let wl = auto_window_level(&pixels).unwrap();
        assert_eq!(wl.window, 19.0);
        // (0 + 1 + ... + 19) / 20 = 9 (integer mean)
        assert_eq!(wl.level, 9.0);
    }

    #[test]
    fn gap_after_small_leading_cluster_restarts() {
        // One populated bin at 10 (1 of 20 = 5%) before a gap, then 19 bins.
        let mut values: Vec<u16> = vec![10];
        values.extend(3000..3019);
        let pixels = repeat(&values, 3);
        let wl = auto_window_level(&pixels).unwrap();
        assert_eq!(wl.window, 18.0);
        assert_eq!(wl.level, 3009.0);
    }

    #[test]
    fn padding_is_excluded() {
        let pixels = repeat(&[0, 400, 600], 5);
        let wl = WindowLevelOptions::new()
            .with_padding(0)
            .compute(&pixels)
            .unwrap();
        assert_eq!(wl.level, 500.0);
        assert_eq!(wl.window, 200.0);
    }

    #[test]
    fn value_range_filters() {
        let pixels = repeat(&[10, 20, 30, 60000], 4);
        let wl = WindowLevelOptions::new()
            .with_value_range(0, 1000)
            .compute(&pixels)
            .unwrap();
        assert_eq!(wl.level, 20.0);
        assert_eq!(wl.window, 20.0);
    }

    #[test]
    fn slope_and_intercept() {
        let pixels = repeat(&[100, 300], 3);
        let wl = WindowLevelOptions::new()
            .with_rescale(-1024.0, 2.0)
            .compute(&pixels)
            .unwrap();
        assert_eq!(wl.level, 200.0 * 2.0 - 1024.0);
        assert_eq!(wl.window, 400.0);
    }

    #[test]
    fn negative_slope_falls_back_to_span() {
        let pixels = repeat(&[100, 300], 3);
        let wl = WindowLevelOptions::new()
            .with_rescale(0.0, -1.0)
            .compute(&pixels)
            .unwrap();
        assert_eq!(wl.window, 200.0);
    }

    #[test]
    fn nothing_populated_is_none() {
        assert_eq!(auto_window_level(&[42u16, 7, 9]), None);
        let gradient: Vec<u16> = (1000..1256).collect();
        assert_eq!(auto_window_level(&gradient), None);
    }

    #[test]
    fn fractional_slope_truncates() {
        // mean (101 + 102) / 2 = 101, 101 * 1.5 = 151.5, span 1 * 1.5 = 1.5
        let pixels = repeat(&[101, 102], 3);
        let wl = WindowLevelOptions::new()
            .with_rescale(0.0, 1.5)
            .compute(&pixels)
            .unwrap();
        assert_eq!(wl.level, 151.0);
        assert_eq!(wl.window, 1.0);

        let wl = WindowLevelOptions::new()
            .with_rescale(0.0, -1.5)
            .compute(&pixels)
            .unwrap();
        // -151.5 truncates toward zero
        assert_eq!(wl.level, -151.0);
    }

    #[test]
    fn uniform_image_has_no_clip_range() {
        let wl = auto_window_level(&[500u16; 16]).unwrap();
        assert_eq!(wl.window, 0.0);
        assert_eq!(wl.clip_range(0, 65535), None);
    }

    #[test]
    fn raw_units_undo_rescale() {
        let wl = WindowLevel {
            window: 400.0,
            level: -624.0,
        };
        let raw = wl.to_raw(-1024.0, 2.0).unwrap();
        assert_eq!(raw, WindowLevel { window: 200.0, level: 200.0 });
        assert_eq!(wl.to_raw(0.0, 0.0), None);
    }

    #[test]
    fn rebin_halves_levels() {
        // span 200 over 100.5 bins: delta = 200 / 100.5
        let mut pixels = [100u16, 200, 300, 100];
        rebin_in_place(&mut pixels);
        assert_eq!(pixels, [0, 50, 100, 0]);

        let mut flat = [7u16; 3];
        rebin_in_place(&mut flat);
        assert_eq!(flat, [7, 7, 7]);
        rebin_in_place(&mut []);
    }

    #[test]
    fn offset_moves_minimum_to_zero() {
        let mut pixels = [40u16, 45, 1040];
        offset_to_zero(&mut pixels);
        assert_eq!(pixels, [0, 5, 1000]);
        offset_to_zero(&mut []);
    }

    #[test]
    fn signed_samples_walk_negative_first() {
        let values: [i16; 3] = [-100, 0, 100];
        let pixels: Vec<i16> = values
            .iter()
            .flat_map(|&v| core::iter::repeat_n(v, 3))
            .collect();
        let wl = auto_window_level(&pixels).unwrap();
        assert_eq!(wl.level, 0.0);
        assert_eq!(wl.window, 200.0);
    }

    #[test]
    fn clip_range_from_window() {
        let wl = WindowLevel {
            window: 201.0,
            level: 200.5,
        };
        // lo = 200.5 - 0.5 - 100 = 100, hi = 200.5 - 0.5 + 100 + 1 = 301
        assert_eq!(wl.clip_range(0, 65535), Some((100, 301)));

        let wl = WindowLevel {
            window: 1000.0,
            level: 100.0,
        };
        assert_eq!(wl.clip_range(0, 65535), Some((0, 600)));
        assert_eq!(wl.clip_range(-32768, 32767), Some((-400, 600)));

        for window in [1.0, 0.0, -3.0, f64::NAN] {
            let wl = WindowLevel {
                window,
                level: 50.0,
            };
            assert_eq!(wl.clip_range(0, 65535), None);
        }
    }

    #[test]
    fn clip_in_place_clamps() {
        let wl = WindowLevel {
            window: 201.0,
            level: 200.5,
        };
        let mut pixels = [0u16, 100, 250, 301, 302, 65535];
        wl.clip_in_place(&mut pixels);
        assert_eq!(pixels, [100, 100, 250, 301, 301, 301]);

        let unit = WindowLevel {
            window: 1.0,
            level: 0.0,
        };
        let mut untouched = [5u16, 6];
        unit.clip_in_place(&mut untouched);
        assert_eq!(untouched, [5, 6]);
    }
}
